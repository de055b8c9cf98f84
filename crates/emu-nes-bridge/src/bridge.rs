//! Core callbacks → converter, resampler and mapper → host.

use emu_core::{Device, Interface};

use crate::config::AdapterConfig;
use crate::host::{Host, HostInput};
use crate::input::InputMapper;
use crate::palette::Palette;
use crate::resampler::Resampler;
use crate::video::FrameConverter;

/// Receives core output and forwards it, converted, to a [`Host`].
pub struct Bridge<H> {
    video: FrameConverter,
    audio: Resampler,
    input: InputMapper,
    host: H,
}

impl<H: Host> Bridge<H> {
    /// Build the palette and size every buffer for `config`.
    ///
    /// `config` is assumed valid; see [`AdapterConfig::validate`].
    pub fn new(config: &AdapterConfig, host: H) -> Self {
        let video = FrameConverter::new(Palette::build(), config.abi.stride(), config.pixel_format);
        let audio = Resampler::new(config.source_rate(), config.target_rate, config.zero_crossings);
        Self {
            video,
            audio,
            input: InputMapper::new(),
            host,
        }
    }

    /// Start a new audio session: drop filter history and queued output.
    pub fn reset_audio(&mut self) {
        self.audio.reset();
        tracing::debug!("audio history cleared");
    }

    /// Retarget the resampler, e.g. after the host changes output device.
    pub fn set_audio_rates(&mut self, source_rate: f64, target_rate: f64) {
        self.audio.set_rates(source_rate, target_rate);
        self.audio.reset();
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    #[must_use]
    pub fn converter(&self) -> &FrameConverter {
        &self.video
    }

    #[must_use]
    pub fn resampler(&self) -> &Resampler {
        &self.audio
    }
}

impl<H: Host> Interface for Bridge<H> {
    fn video_refresh(&mut self, frame: &[u16]) {
        self.video.convert(frame);
        self.host.video_refresh(self.video.frame());
        self.host.input_poll();
    }

    fn audio_sample(&mut self, sample: i16) {
        self.audio.feed(sample);
        while let Some((left, right)) = self.audio.pop() {
            self.host.audio_sample(left, right);
        }
    }

    fn input_poll(&mut self, port: u32, device: Device, id: u32) -> i16 {
        self.input.poll(&mut HostInput(&mut self.host), port, device, id)
    }
}
