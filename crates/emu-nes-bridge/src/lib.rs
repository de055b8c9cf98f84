//! Presentation adapter between a cycle-accurate NES core and a host
//! frontend.
//!
//! The core hands over one frame of 9-bit palette indices per video frame,
//! one raw mono sample per audio tick at the CPU clock (1,789,772 Hz NTSC),
//! and asks for button state by controller bit position. The adapter turns
//! those into what a plugin host expects:
//!
//! - [`palette`]: 64 measured hues × 8 emphasis combinations.
//! - [`video`]: palette lookup and 15/16-bit packing into a fixed-stride
//!   buffer reused every frame.
//! - [`resampler`]: windowed-sinc conversion to the host rate, mono to
//!   duplicated stereo.
//! - [`input`]: core button index → host button id.
//! - [`Session`]: owns the core and the bridge for one session.
//!
//! Everything runs synchronously on the caller's thread inside the core's
//! callbacks.

pub mod bridge;
#[cfg(feature = "capture")]
pub mod capture;
pub mod config;
pub mod host;
pub mod input;
pub mod palette;
pub mod resampler;
pub mod session;
pub mod video;

pub use bridge::Bridge;
pub use config::{AdapterConfig, ConfigError, Region};
pub use host::{AvInfo, Host, HostAbi, SystemInfo};
pub use input::{InputDescriptor, InputMapper, NesButton};
pub use palette::Palette;
pub use resampler::Resampler;
pub use session::Session;
pub use video::{FrameConverter, PixelFormat, VideoFrame};
