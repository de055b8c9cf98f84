//! Palette-indexed console frame → packed 16-bit presentation frame.
//!
//! The converter owns one output buffer sized once for `stride × height`
//! and overwrites it every frame. Columns past the logical width in each row
//! are never written.

use emu_core::{FRAME_HEIGHT, FRAME_WIDTH};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// 16-bit packed pixel layouts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// `0RRRRRGGGGGBBBBB`.
    #[default]
    Xrgb1555,
    /// `RRRRRGGGGGGBBBBB`.
    Rgb565,
}

impl PixelFormat {
    /// Pack 0xRRGGBB by keeping the high bits of each channel.
    #[inline]
    #[must_use]
    pub const fn pack(self, rgb: u32) -> u16 {
        let packed = match self {
            Self::Xrgb1555 => {
                ((rgb & 0xF8_0000) >> 9) | ((rgb & 0x00_F800) >> 6) | ((rgb & 0x00_00F8) >> 3)
            }
            Self::Rgb565 => {
                ((rgb & 0xF8_0000) >> 8) | ((rgb & 0x00_FC00) >> 5) | ((rgb & 0x00_00F8) >> 3)
            }
        };
        packed as u16
    }

    /// Expand a packed pixel back to 0xRRGGBB, replicating high bits into
    /// the truncated low bits.
    #[must_use]
    pub const fn unpack(self, pixel: u16) -> u32 {
        let p = pixel as u32;
        let (r5, g, g_bits, b5) = match self {
            Self::Xrgb1555 => ((p >> 10) & 0x1F, (p >> 5) & 0x1F, 5, p & 0x1F),
            Self::Rgb565 => ((p >> 11) & 0x1F, (p >> 5) & 0x3F, 6, p & 0x1F),
        };
        let r = (r5 << 3) | (r5 >> 2);
        let g = if g_bits == 5 {
            (g << 3) | (g >> 2)
        } else {
            (g << 2) | (g >> 4)
        };
        let b = (b5 << 3) | (b5 >> 2);
        (r << 16) | (g << 8) | b
    }
}

/// A borrowed view of a finished presentation frame.
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    /// `stride × height` pixels; only the first `width` of each row are valid.
    pub pixels: &'a [u16],
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Distance between row starts, in pixels.
    pub stride: usize,
    /// Layout of each pixel.
    pub format: PixelFormat,
}

impl VideoFrame<'_> {
    /// Distance between row starts in bytes.
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.stride * std::mem::size_of::<u16>()
    }

    /// Logical pixels of row `y`.
    #[must_use]
    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.stride;
        &self.pixels[start..start + self.width as usize]
    }
}

/// Converts console frames using a fixed palette, stride and pack format.
pub struct FrameConverter {
    palette: Palette,
    format: PixelFormat,
    stride: usize,
    frame: Vec<u16>,
}

impl FrameConverter {
    /// Create a converter writing rows `stride` pixels apart.
    ///
    /// `stride` must be at least the console width.
    #[must_use]
    pub fn new(palette: Palette, stride: usize, format: PixelFormat) -> Self {
        assert!(
            stride >= FRAME_WIDTH,
            "stride {stride} is narrower than the {FRAME_WIDTH}-pixel frame"
        );
        Self {
            palette,
            format,
            stride,
            frame: vec![0; stride * FRAME_HEIGHT],
        }
    }

    /// Convert one console frame in place.
    ///
    /// `console` holds `FRAME_WIDTH × FRAME_HEIGHT` 9-bit palette indices.
    pub fn convert(&mut self, console: &[u16]) {
        debug_assert!(
            console.len() >= FRAME_WIDTH * FRAME_HEIGHT,
            "console frame has {} pixels, expected {}",
            console.len(),
            FRAME_WIDTH * FRAME_HEIGHT
        );

        let palette = &self.palette;
        let format = self.format;
        for (src, dst) in console
            .chunks_exact(FRAME_WIDTH)
            .zip(self.frame.chunks_exact_mut(self.stride))
        {
            for (&index, out) in src.iter().zip(&mut dst[..FRAME_WIDTH]) {
                *out = format.pack(palette.get(index));
            }
        }
    }

    /// The most recently converted frame.
    #[must_use]
    pub fn frame(&self) -> VideoFrame<'_> {
        VideoFrame {
            pixels: &self.frame,
            width: FRAME_WIDTH as u32,
            height: FRAME_HEIGHT as u32,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Colour table used for lookups.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }
}
