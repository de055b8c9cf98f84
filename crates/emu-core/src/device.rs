//! Controller devices and memory regions exposed by a core.

/// Device plugged into a controller port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Nothing connected; every button reads as released.
    None,
    /// Standard 8-button joypad.
    #[default]
    Joypad,
}

/// Memory region a host may read or persist directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryKind {
    /// Battery-backed cartridge RAM.
    SaveRam,
    /// Real-time clock registers (never present on this console).
    Rtc,
    /// Console work RAM.
    SystemRam,
    /// Video RAM.
    VideoRam,
}
