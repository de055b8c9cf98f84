//! NES colour table with emphasis variants.
//!
//! The 2C02 outputs 64 hues. PPUMASK bits 5-7 (emphasis) tint the whole
//! picture, so the table carries all eight emphasis combinations: entry
//! `e * 64 + n` is hue `n` rendered with emphasis `e`.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::unreadable_literal
)]

/// Number of base hues.
pub const HUES: usize = 64;

/// Number of emphasis combinations (3 bits).
pub const EMPHASIS_LEVELS: usize = 8;

/// Total table entries; also the exclusive upper bound of a palette index.
pub const PALETTE_SIZE: usize = HUES * EMPHASIS_LEVELS;

/// Measured base hues as 0xRRGGBB.
pub const BASE_COLOURS: [u32; HUES] = [
    0x7c7c7c, 0x0000fc, 0x0000bc, 0x4428bc, 0x940084, 0xa80020, 0xa81000, 0x881400,
    0x503000, 0x007800, 0x006800, 0x005800, 0x004058, 0x000000, 0x000000, 0x000000,
    0xbcbcbc, 0x0078f8, 0x0058f8, 0x6844fc, 0xd800cc, 0xe40058, 0xf83800, 0xe45c10,
    0xac7c00, 0x00b800, 0x00a800, 0x00a844, 0x008888, 0x000000, 0x000000, 0x000000,
    0xf8f8f8, 0x3cbcfc, 0x6888fc, 0x9878f8, 0xf878f8, 0xf85898, 0xf87858, 0xfca044,
    0xf8b800, 0xb8f818, 0x58d854, 0x58f898, 0x00e8d8, 0x787878, 0x000000, 0x000000,
    0xfcfcfc, 0xa4e4fc, 0xb8b8b8, 0xd8d8f8, 0xf8b8f8, 0xf8a4c0, 0xf0d0b0, 0xfce0a8,
    0xf8d878, 0xd8f878, 0xb8f8b8, 0xb8f8d8, 0x00fcfc, 0xf8d8f8, 0x000000, 0x000000,
];

/// Per-emphasis gain for the red channel. Calibration data, keep as-is.
pub const RED_FACTORS: [f64; EMPHASIS_LEVELS] =
    [1.000, 1.239, 0.794, 1.019, 0.905, 1.023, 0.741, 0.750];

/// Per-emphasis gain for the green channel.
pub const GREEN_FACTORS: [f64; EMPHASIS_LEVELS] =
    [1.000, 0.915, 1.086, 0.980, 1.026, 0.908, 0.987, 0.750];

/// Per-emphasis gain for the blue channel.
pub const BLUE_FACTORS: [f64; EMPHASIS_LEVELS] =
    [1.000, 0.743, 0.882, 0.653, 1.277, 0.979, 0.101, 0.750];

/// Scale one 8-bit channel, saturating at 255.
#[must_use]
pub fn scale_channel(channel: u8, factor: f64) -> u8 {
    (f64::from(channel) * factor).round().clamp(0.0, 255.0) as u8
}

/// Split 0xRRGGBB into its channels.
#[must_use]
pub const fn channels(rgb: u32) -> (u8, u8, u8) {
    ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Immutable 512-entry colour table.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Box<[u32; PALETTE_SIZE]>,
}

impl Palette {
    /// Synthesize the full table from the base hues and emphasis gains.
    #[must_use]
    pub fn build() -> Self {
        let mut colours = Box::new([0u32; PALETTE_SIZE]);
        colours[..HUES].copy_from_slice(&BASE_COLOURS);

        for e in 1..EMPHASIS_LEVELS {
            for n in 0..HUES {
                let (r, g, b) = channels(BASE_COLOURS[n]);
                let r = scale_channel(r, RED_FACTORS[e]);
                let g = scale_channel(g, GREEN_FACTORS[e]);
                let b = scale_channel(b, BLUE_FACTORS[e]);
                colours[e * HUES + n] =
                    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
            }
        }

        tracing::debug!(entries = PALETTE_SIZE, "palette built");
        Self { colours }
    }

    /// Colour for a 9-bit palette index (emphasis in bits 6-8).
    #[inline]
    #[must_use]
    pub fn get(&self, index: u16) -> u32 {
        debug_assert!(
            usize::from(index) < PALETTE_SIZE,
            "palette index {index:#x} exceeds 9 bits"
        );
        self.colours[usize::from(index) & (PALETTE_SIZE - 1)]
    }

    /// The whole table.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.colours[..]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::build()
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("entries", &self.colours.len())
            .finish()
    }
}
