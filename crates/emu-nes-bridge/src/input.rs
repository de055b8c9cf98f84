//! NES joypad buttons → host button ids.
//!
//! The core reports buttons by their shift-register position (A first,
//! Right last). Hosts number their joypad buttons differently; the mapper
//! translates through a fixed table and forwards the query unchanged.

use emu_core::Device;

/// Logical button on the NES controller, in shift-register order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NesButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl NesButton {
    /// All buttons in core index order.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::Select,
        Self::Start,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
    ];

    /// Index the core uses for this button.
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Button at core index `index`, if valid.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Host-side joypad id.
    #[must_use]
    pub const fn host_id(self) -> u32 {
        HOST_BUTTON_IDS[self as usize]
    }

    /// Label shown by hosts that list controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::Select => "Select",
            Self::Start => "Start",
            Self::Up => "D-Pad Up",
            Self::Down => "D-Pad Down",
            Self::Left => "D-Pad Left",
            Self::Right => "D-Pad Right",
        }
    }
}

/// Host joypad ids.
pub mod host_id {
    pub const B: u32 = 0;
    pub const SELECT: u32 = 2;
    pub const START: u32 = 3;
    pub const UP: u32 = 4;
    pub const DOWN: u32 = 5;
    pub const LEFT: u32 = 6;
    pub const RIGHT: u32 = 7;
    pub const A: u32 = 8;
}

/// Host device class for a standard joypad.
pub const HOST_DEVICE_JOYPAD: u32 = 1;

/// Core button index → host joypad id.
pub const HOST_BUTTON_IDS: [u32; 8] = [
    host_id::A,
    host_id::B,
    host_id::SELECT,
    host_id::START,
    host_id::UP,
    host_id::DOWN,
    host_id::LEFT,
    host_id::RIGHT,
];

/// Order in which buttons are announced to the host.
const DESCRIPTOR_ORDER: [NesButton; 8] = [
    NesButton::Left,
    NesButton::Up,
    NesButton::Down,
    NesButton::Right,
    NesButton::B,
    NesButton::A,
    NesButton::Select,
    NesButton::Start,
];

/// Ports announced to hosts that accept descriptors.
pub const DESCRIBED_PORTS: u32 = 4;

/// One control the host may show to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDescriptor {
    pub port: u32,
    pub device: u32,
    pub index: u32,
    pub id: u32,
    pub description: &'static str,
}

/// Descriptors for every button on `ports` joypads.
#[must_use]
pub fn input_descriptors(ports: u32) -> Vec<InputDescriptor> {
    (0..ports)
        .flat_map(|port| {
            DESCRIPTOR_ORDER.iter().map(move |&button| InputDescriptor {
                port,
                device: HOST_DEVICE_JOYPAD,
                index: 0,
                id: button.host_id(),
                description: button.label(),
            })
        })
        .collect()
}

/// Source of host button state.
///
/// Arguments are `(port, device, index, id)` in host numbering.
pub trait InputState {
    fn input_state(&mut self, port: u32, device: u32, index: u32, id: u32) -> i16;
}

impl<F> InputState for F
where
    F: FnMut(u32, u32, u32, u32) -> i16,
{
    fn input_state(&mut self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        self(port, device, index, id)
    }
}

/// Stateless translation of core button queries into host queries.
#[derive(Debug, Clone, Copy)]
pub struct InputMapper {
    ids: &'static [u32; 8],
    device: u32,
}

impl InputMapper {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: &HOST_BUTTON_IDS,
            device: HOST_DEVICE_JOYPAD,
        }
    }

    /// Host id for core button `index`.
    #[inline]
    #[must_use]
    pub fn host_id(&self, index: u32) -> u32 {
        debug_assert!(index < 8, "button index {index} out of range");
        self.ids[index as usize & 7]
    }

    /// Ask `state` for core button `index` on `port`.
    ///
    /// Port validity is the host's concern; whatever it returns is passed
    /// through unchanged.
    #[inline]
    pub fn poll<S: InputState + ?Sized>(
        &self,
        state: &mut S,
        port: u32,
        device: Device,
        index: u32,
    ) -> i16 {
        match device {
            Device::None => 0,
            Device::Joypad => state.input_state(port, self.device, 0, self.host_id(index)),
        }
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}
