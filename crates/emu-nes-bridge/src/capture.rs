//! Headless capture: PNG frames and WAV audio.
//!
//! [`CaptureHost`] is a complete [`Host`] for running a session without a
//! window or audio device, e.g. for regression tests and recordings.

#![allow(clippy::cast_possible_truncation)]

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::host::Host;
use crate::input::{InputDescriptor, NesButton};
use crate::video::{PixelFormat, VideoFrame};

/// Errors from writing capture files.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("no frame has been presented yet")]
    NoFrame,
}

/// Decode the logical area of a frame into packed RGB8 rows.
#[must_use]
pub fn frame_to_rgb(frame: &VideoFrame<'_>) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.width as usize * frame.height as usize * 3);
    for y in 0..frame.height as usize {
        for &pixel in frame.row(y) {
            let colour = frame.format.unpack(pixel);
            rgb.extend_from_slice(&[(colour >> 16) as u8, (colour >> 8) as u8, colour as u8]);
        }
    }
    rgb
}

/// Save the logical area of a presentation frame as an RGB PNG.
pub fn save_png(frame: &VideoFrame<'_>, path: &Path) -> Result<(), CaptureError> {
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame_to_rgb(frame))?;
    Ok(())
}

/// Streams stereo 16-bit frames to a WAV file.
pub struct WavRecorder {
    writer: hound::WavWriter<BufWriter<fs::File>>,
    frames: u64,
}

impl WavRecorder {
    /// Create `path` for `sample_rate` Hz stereo output.
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self, CaptureError> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        Ok(Self {
            writer: hound::WavWriter::create(path, spec)?,
            frames: 0,
        })
    }

    pub fn write(&mut self, left: i16, right: i16) -> Result<(), CaptureError> {
        self.writer.write_sample(left)?;
        self.writer.write_sample(right)?;
        self.frames += 1;
        Ok(())
    }

    /// Stereo frames written so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Flush and patch the header.
    pub fn finish(self) -> Result<(), CaptureError> {
        self.writer.finalize()?;
        Ok(())
    }
}

/// Copy of the last presented frame, compacted to its logical width.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub pixels: Vec<u16>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl CapturedFrame {
    #[must_use]
    pub fn view(&self) -> VideoFrame<'_> {
        VideoFrame {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
            stride: self.width as usize,
            format: self.format,
        }
    }
}

/// Host that keeps the last frame, optionally records audio, and answers
/// input from a scripted per-port button mask.
#[derive(Default)]
pub struct CaptureHost {
    last_frame: Option<CapturedFrame>,
    frames_presented: u64,
    polls: u64,
    audio: Option<WavRecorder>,
    audio_error: Option<CaptureError>,
    samples: u64,
    buttons: [u8; 4],
    descriptors: Vec<InputDescriptor>,
}

impl CaptureHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every audio frame to `path`.
    pub fn record_audio(&mut self, path: &Path, sample_rate: u32) -> Result<(), CaptureError> {
        self.audio = Some(WavRecorder::create(path, sample_rate)?);
        Ok(())
    }

    /// Finish the WAV file, reporting the first write error if one occurred.
    pub fn finish_audio(&mut self) -> Result<(), CaptureError> {
        if let Some(err) = self.audio_error.take() {
            self.audio = None;
            return Err(err);
        }
        match self.audio.take() {
            Some(recorder) => recorder.finish(),
            None => Ok(()),
        }
    }

    /// Press or release `button` on `port` (0-3). Other ports are ignored.
    pub fn set_button(&mut self, port: usize, button: NesButton, pressed: bool) {
        let bit = 1u8 << button.index();
        let Some(mask) = self.buttons.get_mut(port) else {
            return;
        };
        if pressed {
            *mask |= bit;
        } else {
            *mask &= !bit;
        }
    }

    /// Save the last presented frame.
    pub fn save_screenshot(&self, path: &Path) -> Result<(), CaptureError> {
        let frame = self.last_frame.as_ref().ok_or(CaptureError::NoFrame)?;
        save_png(&frame.view(), path)
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&CapturedFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    #[must_use]
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Stereo audio frames received.
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    #[must_use]
    pub fn descriptors(&self) -> &[InputDescriptor] {
        &self.descriptors
    }
}

impl Host for CaptureHost {
    fn video_refresh(&mut self, frame: VideoFrame<'_>) {
        let captured = self.last_frame.get_or_insert_with(|| CapturedFrame {
            pixels: Vec::with_capacity(frame.width as usize * frame.height as usize),
            width: frame.width,
            height: frame.height,
            format: frame.format,
        });
        captured.pixels.clear();
        for y in 0..frame.height as usize {
            captured.pixels.extend_from_slice(frame.row(y));
        }
        captured.width = frame.width;
        captured.height = frame.height;
        captured.format = frame.format;
        self.frames_presented += 1;
    }

    fn audio_sample(&mut self, left: i16, right: i16) {
        self.samples += 1;
        if let Some(recorder) = &mut self.audio {
            if let Err(err) = recorder.write(left, right) {
                tracing::warn!(%err, "audio capture stopped");
                self.audio = None;
                self.audio_error = Some(err);
            }
        }
    }

    fn input_poll(&mut self) {
        self.polls += 1;
    }

    fn input_state(&mut self, port: u32, _device: u32, _index: u32, id: u32) -> i16 {
        let Some(&mask) = self.buttons.get(port as usize) else {
            return 0;
        };
        NesButton::ALL
            .iter()
            .find(|button| button.host_id() == id)
            .map_or(0, |button| i16::from(mask & (1 << button.index()) != 0))
    }

    fn set_input_descriptors(&mut self, descriptors: &[InputDescriptor]) {
        self.descriptors = descriptors.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_buttons_answer_host_ids() {
        let mut host = CaptureHost::new();
        host.set_button(1, NesButton::Start, true);
        assert_eq!(host.input_state(1, 1, 0, NesButton::Start.host_id()), 1);
        assert_eq!(host.input_state(0, 1, 0, NesButton::Start.host_id()), 0);
        assert_eq!(host.input_state(9, 1, 0, NesButton::Start.host_id()), 0);
        host.set_button(1, NesButton::Start, false);
        assert_eq!(host.input_state(1, 1, 0, NesButton::Start.host_id()), 0);
    }

    #[test]
    fn out_of_range_port_is_ignored() {
        let mut host = CaptureHost::new();
        host.set_button(4, NesButton::A, true);
        host.set_button(usize::MAX, NesButton::A, false);
        for port in 0..8 {
            assert_eq!(host.input_state(port, 1, 0, NesButton::A.host_id()), 0);
        }
    }

    #[test]
    fn screenshot_without_frame_fails() {
        let host = CaptureHost::new();
        let dir = tempfile::tempdir().expect("tempdir");
        let err = host.save_screenshot(&dir.path().join("none.png")).unwrap_err();
        assert!(matches!(err, CaptureError::NoFrame));
    }

    #[test]
    fn frame_to_rgb_skips_padding() {
        let pixels = [0x7FFF, 0x1234, 0x0000, 0x1234];
        let frame = VideoFrame {
            pixels: &pixels,
            width: 1,
            height: 2,
            stride: 2,
            format: PixelFormat::Xrgb1555,
        };
        assert_eq!(frame_to_rgb(&frame), vec![0xFF, 0xFF, 0xFF, 0, 0, 0]);
    }
}
