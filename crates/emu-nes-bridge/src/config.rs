//! Adapter configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::HostAbi;
use crate::video::PixelFormat;

/// Video region. Determines the audio clock and frame rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// NTSC: ~60.1 Hz, 1,789,772 Hz audio clock.
    #[default]
    Ntsc,
    /// PAL: ~50.0 Hz, 1,662,607 Hz audio clock.
    Pal,
}

impl Region {
    /// Rate at which the core emits raw audio samples, in Hz.
    #[must_use]
    pub const fn audio_clock_hz(self) -> f64 {
        match self {
            Self::Ntsc => 1_789_772.0,
            Self::Pal => 1_662_607.0,
        }
    }

    /// Nominal frame rate.
    #[must_use]
    pub fn fps(self) -> f64 {
        match self {
            Self::Ntsc => 1_008_307_711.0 / 16_777_215.0,
            // 3.2 PPU dots per CPU cycle, 341 × 312 dots per frame
            Self::Pal => 1_662_607.0 * 3.2 / (341.0 * 312.0),
        }
    }
}

/// Errors from loading or validating an [`AdapterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("target sample rate must be a positive finite number, got {0}")]
    TargetRate(f64),

    #[error("zero crossings must be within {min}..={max}, got {value}")]
    ZeroCrossings { value: usize, min: usize, max: usize },
}

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Host plugin ABI; selects the frame stride and descriptor behaviour.
    pub abi: HostAbi,
    /// Console region; selects the audio clock.
    pub region: Region,
    /// Host audio output rate in Hz.
    pub target_rate: f64,
    /// Packed pixel layout handed to the host.
    pub pixel_format: PixelFormat,
    /// Resampler kernel half-width in zero crossings.
    pub zero_crossings: usize,
}

impl AdapterConfig {
    pub const MIN_ZERO_CROSSINGS: usize = 2;
    pub const MAX_ZERO_CROSSINGS: usize = 64;

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_rate.is_finite() || self.target_rate <= 0.0 {
            return Err(ConfigError::TargetRate(self.target_rate));
        }
        if !(Self::MIN_ZERO_CROSSINGS..=Self::MAX_ZERO_CROSSINGS).contains(&self.zero_crossings) {
            return Err(ConfigError::ZeroCrossings {
                value: self.zero_crossings,
                min: Self::MIN_ZERO_CROSSINGS,
                max: Self::MAX_ZERO_CROSSINGS,
            });
        }
        Ok(())
    }

    /// Audio clock of the configured region.
    #[must_use]
    pub const fn source_rate(&self) -> f64 {
        self.region.audio_clock_hz()
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            abi: HostAbi::Retro,
            region: Region::Ntsc,
            target_rate: 32_000.0,
            pixel_format: PixelFormat::Xrgb1555,
            zero_crossings: 8,
        }
    }
}
