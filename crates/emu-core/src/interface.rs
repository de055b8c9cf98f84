//! Callbacks from a running core to whatever presents its output.

use crate::Device;

/// Console-native frame width in pixels.
pub const FRAME_WIDTH: usize = 256;

/// Console-native frame height in pixels.
pub const FRAME_HEIGHT: usize = 240;

/// Receiver of a core's per-frame, per-sample and per-poll callbacks.
///
/// A core calls these synchronously from inside [`crate::EmulationCore::run`].
/// Implementations must answer before returning and must not call back into
/// the core.
pub trait Interface {
    /// One completed frame of 9-bit palette indices, row-major,
    /// [`FRAME_WIDTH`] × [`FRAME_HEIGHT`] entries with no padding.
    ///
    /// Bits 0-5 select the hue, bits 6-8 carry the colour emphasis bits.
    fn video_refresh(&mut self, frame: &[u16]);

    /// One raw mono sample per audio tick of the console clock.
    fn audio_sample(&mut self, sample: i16);

    /// State of `id` (0 = A, 1 = B, 2 = Select, 3 = Start, 4 = Up,
    /// 5 = Down, 6 = Left, 7 = Right) on the `device` plugged into `port`.
    fn input_poll(&mut self, port: u32, device: Device, id: u32) -> i16;
}
