//! The frontend side of the adapter: sinks, input queries and ABI facts.

use serde::{Deserialize, Serialize};

use crate::config::Region;
use crate::input::{DESCRIBED_PORTS, InputDescriptor, InputState, input_descriptors};
use crate::video::VideoFrame;

/// Everything the adapter calls on the frontend.
///
/// All calls happen synchronously inside a core callback.
pub trait Host {
    /// A finished presentation frame.
    fn video_refresh(&mut self, frame: VideoFrame<'_>);

    /// One stereo output frame.
    fn audio_sample(&mut self, left: i16, right: i16);

    /// Signalled once per video frame, after [`Host::video_refresh`].
    fn input_poll(&mut self);

    /// Button state in host numbering.
    fn input_state(&mut self, port: u32, device: u32, index: u32, id: u32) -> i16;

    /// Announce the controls the game uses. Hosts that have no use for the
    /// list can ignore it.
    fn set_input_descriptors(&mut self, descriptors: &[InputDescriptor]) {
        let _ = descriptors;
    }
}

/// Adapter that lets the input mapper query a [`Host`] directly.
pub(crate) struct HostInput<'a, H: ?Sized>(pub &'a mut H);

impl<H: Host + ?Sized> InputState for HostInput<'_, H> {
    fn input_state(&mut self, port: u32, device: u32, index: u32, id: u32) -> i16 {
        self.0.input_state(port, device, index, id)
    }
}

/// Plugin ABI flavour the adapter is presenting through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostAbi {
    /// 256-pixel stride; announces input descriptors.
    #[default]
    Retro,
    /// 1024-pixel stride; no descriptors.
    Snes,
}

impl HostAbi {
    /// Row stride of the presentation frame, in pixels.
    #[must_use]
    pub const fn stride(self) -> usize {
        match self {
            Self::Retro => 256,
            Self::Snes => 1024,
        }
    }

    /// Descriptors to announce on cartridge load.
    #[must_use]
    pub fn input_descriptors(self) -> Vec<InputDescriptor> {
        match self {
            Self::Retro => input_descriptors(DESCRIBED_PORTS),
            Self::Snes => Vec::new(),
        }
    }

    /// Identity reported to the host.
    #[must_use]
    pub const fn system_info(self) -> SystemInfo {
        match self {
            Self::Retro => SystemInfo {
                library_name: "bnes",
                library_version: "v083",
                valid_extensions: "nes",
                need_fullpath: false,
                block_extract: false,
                revision: None,
            },
            Self::Snes => SystemInfo {
                library_name: "bNES v083",
                library_version: "v083",
                valid_extensions: "nes",
                need_fullpath: false,
                block_extract: false,
                revision: Some((1, 3)),
            },
        }
    }
}

/// Static identity of the core as a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    pub library_name: &'static str,
    pub library_version: &'static str,
    /// `|`-separated list of file extensions.
    pub valid_extensions: &'static str,
    pub need_fullpath: bool,
    pub block_extract: bool,
    /// Plugin interface revision (major, minor), for hosts that check one.
    pub revision: Option<(u32, u32)>,
}

/// Frame geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub base_width: u32,
    pub base_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub aspect_ratio: f32,
}

/// Output timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub fps: f64,
    pub sample_rate: f64,
}

/// Audio/video parameters for the host to configure its outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvInfo {
    pub geometry: Geometry,
    pub timing: Timing,
}

impl AvInfo {
    #[must_use]
    pub fn new(region: Region, sample_rate: f64) -> Self {
        let (w, h) = (emu_core::FRAME_WIDTH as u32, emu_core::FRAME_HEIGHT as u32);
        Self {
            geometry: Geometry {
                base_width: w,
                base_height: h,
                max_width: w,
                max_height: h,
                aspect_ratio: 4.0 / 3.0,
            },
            timing: Timing {
                fps: region.fps(),
                sample_rate,
            },
        }
    }
}
