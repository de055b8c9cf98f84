//! Windowed-sinc resampler from the console audio clock to a host rate.
//!
//! Mono `i16` in, duplicated stereo `i16` out. The input clock is fast
//! (~1.79 MHz NTSC) and the output slow (tens of kHz), so most `feed` calls
//! produce nothing; when upsampling a single input can produce several
//! outputs. Callers drain with [`Resampler::pending`] / [`Resampler::pop`]
//! after every [`Resampler::feed`].
//!
//! ## Timing
//! `delay` tracks how far, in input samples, the next output instant lies
//! behind the newest input. Each input moves it one further back; once it is
//! at least `half_width` samples behind, the kernel has all the neighbours
//! it needs on both sides and one output is produced, after which the next
//! output instant is `step` (= source / target) samples later.
//!
//! The history starts primed with `half_width` samples of silence and the
//! phase one `step` short of the first output instant, so after `n` inputs
//! exactly `floor(n × target / source)` outputs have been produced, at the
//! cost of a fixed group delay of `half_width` input samples.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::collections::VecDeque;
use std::f64::consts::PI;

/// Kernel table entries per input sample.
const TABLE_OVERSAMPLE: usize = 64;

/// Passband edge as a fraction of the lower Nyquist frequency.
const ROLLOFF: f64 = 0.945;

/// One output frame: left, right.
pub type StereoFrame = (i16, i16);

/// Stateful sinc resampler with an output queue.
pub struct Resampler {
    source_rate: f64,
    target_rate: f64,
    zero_crossings: usize,

    /// Input samples per output sample.
    step: f64,
    /// Normalised cutoff (1.0 = input Nyquist).
    cutoff: f64,
    /// Kernel half-width in input samples.
    half_width: usize,
    /// `h(x)` for `x = i / TABLE_OVERSAMPLE`, `0 <= x <= half_width`.
    kernel: Vec<f32>,

    /// Ring of recent inputs; `history[head]` is the newest.
    history: Vec<f32>,
    head: usize,
    delay: f64,

    queue: VecDeque<StereoFrame>,
    /// Set by a rate change until the next `reset`.
    stale: bool,
}

impl Resampler {
    /// Create a resampler converting `source_rate` Hz to `target_rate` Hz.
    ///
    /// `zero_crossings` is the kernel half-width measured in zero crossings
    /// of the low-pass sinc.
    #[must_use]
    pub fn new(source_rate: f64, target_rate: f64, zero_crossings: usize) -> Self {
        let mut resampler = Self {
            source_rate: 0.0,
            target_rate: 0.0,
            zero_crossings,
            step: 1.0,
            cutoff: 1.0,
            half_width: 0,
            kernel: Vec::new(),
            history: Vec::new(),
            head: 0,
            delay: 0.0,
            queue: VecDeque::new(),
            stale: false,
        };
        resampler.set_rates(source_rate, target_rate);
        resampler.reset();
        resampler
    }

    /// Change the conversion ratio.
    ///
    /// Rebuilds the kernel. History sized for the old kernel is meaningless
    /// afterwards, so [`Resampler::reset`] must be called before the next
    /// [`Resampler::feed`].
    pub fn set_rates(&mut self, source_rate: f64, target_rate: f64) {
        assert!(
            source_rate.is_finite() && source_rate > 0.0,
            "invalid source rate {source_rate}"
        );
        assert!(
            target_rate.is_finite() && target_rate > 0.0,
            "invalid target rate {target_rate}"
        );
        assert!(self.zero_crossings > 0, "kernel needs at least one zero crossing");

        self.source_rate = source_rate;
        self.target_rate = target_rate;
        self.step = source_rate / target_rate;
        self.cutoff = (target_rate / source_rate).min(1.0) * ROLLOFF;
        self.half_width = (self.zero_crossings as f64 / self.cutoff).ceil() as usize;
        self.kernel = build_kernel(self.cutoff, self.half_width);

        let max_burst = (target_rate / source_rate).ceil() as usize + 1;
        self.queue = VecDeque::with_capacity(max_burst.max(2));
        self.stale = true;

        tracing::debug!(
            source_rate,
            target_rate,
            taps = 2 * self.half_width,
            "resampler configured"
        );
    }

    /// Clear history, phase and queued output.
    pub fn reset(&mut self) {
        // Taps reach from delay - half_width to delay + half_width, with
        // half_width <= delay < half_width + 1. Output k lands `(k + 1) * step`
        // inputs after reset.
        self.history.clear();
        self.history.resize(2 * self.half_width + 2, 0.0);
        self.head = 0;
        self.delay = self.half_width as f64 - self.step;
        self.queue.clear();
        self.stale = false;
    }

    /// Consume one input sample.
    pub fn feed(&mut self, sample: i16) {
        debug_assert!(!self.stale, "resampler fed after a rate change without reset");
        if self.stale {
            self.reset();
        }

        self.head = if self.head == 0 {
            self.history.len() - 1
        } else {
            self.head - 1
        };
        self.history[self.head] = f32::from(sample);
        self.delay += 1.0;

        let threshold = self.half_width as f64;
        while self.delay >= threshold {
            let value = self.interpolate(self.delay);
            let out = to_i16(value);
            self.queue.push_back((out, out));
            self.delay -= self.step;
        }
    }

    /// Number of output frames ready to pop.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the oldest ready output frame.
    pub fn pop(&mut self) -> Option<StereoFrame> {
        self.queue.pop_front()
    }

    /// Iterate over and remove every ready output frame.
    pub fn drain(&mut self) -> impl Iterator<Item = StereoFrame> + '_ {
        self.queue.drain(..)
    }

    #[must_use]
    pub fn source_rate(&self) -> f64 {
        self.source_rate
    }

    #[must_use]
    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    /// Fixed latency in input samples.
    #[must_use]
    pub fn group_delay(&self) -> usize {
        self.half_width
    }

    /// Filter the history at an instant `delay` samples behind the newest.
    fn interpolate(&self, delay: f64) -> f64 {
        let len = self.history.len();
        let hw = self.half_width as f64;
        let first = (delay - hw).ceil().max(0.0) as usize;
        let last = ((delay + hw).floor() as usize).min(len - 1);

        let mut acc = 0.0f64;
        for j in first..=last {
            let x = (j as f64 - delay).abs();
            let weight = self.kernel_at(x);
            acc += f64::from(weight) * f64::from(self.history[(self.head + j) % len]);
        }
        acc * self.cutoff
    }

    /// Linear interpolation into the kernel table.
    #[inline]
    fn kernel_at(&self, x: f64) -> f32 {
        let pos = x * TABLE_OVERSAMPLE as f64;
        let index = pos as usize;
        if index + 1 >= self.kernel.len() {
            return 0.0;
        }
        let frac = (pos - index as f64) as f32;
        let a = self.kernel[index];
        let b = self.kernel[index + 1];
        a + (b - a) * frac
    }
}

impl std::fmt::Debug for Resampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resampler")
            .field("source_rate", &self.source_rate)
            .field("target_rate", &self.target_rate)
            .field("half_width", &self.half_width)
            .field("pending", &self.queue.len())
            .finish_non_exhaustive()
    }
}

/// Tabulate `sinc(cutoff · x) · blackman(x / half_width)` for `x >= 0`.
fn build_kernel(cutoff: f64, half_width: usize) -> Vec<f32> {
    let entries = half_width * TABLE_OVERSAMPLE + 1;
    let hw = half_width as f64;
    (0..entries)
        .map(|i| {
            let x = i as f64 / TABLE_OVERSAMPLE as f64;
            (sinc(cutoff * x) * blackman(x / hw)) as f32
        })
        .collect()
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Symmetric Blackman window over `-1..=1`, zero outside.
fn blackman(u: f64) -> f64 {
    if u.abs() >= 1.0 {
        return 0.0;
    }
    // Centre at u = 0
    let t = PI * (u + 1.0);
    0.42 - 0.5 * t.cos() + 0.08 * (2.0 * t).cos()
}

fn to_i16(value: f64) -> i16 {
    value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC_CLOCK: f64 = 1_789_772.0;

    fn feed_all(r: &mut Resampler, input: impl IntoIterator<Item = i16>) -> Vec<StereoFrame> {
        let mut out = Vec::new();
        for sample in input {
            r.feed(sample);
            while r.pending() > 0 {
                out.extend(r.pop());
            }
        }
        out
    }

    fn noise(len: usize) -> Vec<i16> {
        let mut state = 0x1234_5678u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 16) as i16
            })
            .collect()
    }

    #[test]
    fn downsampled_count_tracks_ratio() {
        let mut r = Resampler::new(NTSC_CLOCK, 32_000.0, 8);
        for n in [1usize, 1_000, 55_930, 200_000] {
            r.reset();
            let out = feed_all(&mut r, std::iter::repeat_n(0, n));
            let expected = n as f64 * 32_000.0 / NTSC_CLOCK;
            assert!(
                (out.len() as f64 - expected).abs() <= 2.0,
                "n={n}: got {} expected {expected:.2}",
                out.len()
            );
        }
    }

    #[test]
    fn count_tracks_ratio_in_both_directions() {
        let rates = [
            (NTSC_CLOCK, 48_000.0),
            (48_000.0, 8_000.0),
            (32_000.0, 48_000.0),
            (11_025.0, 44_100.0),
            (22_050.0, 96_000.0),
            (8_000.0, 96_000.0),
        ];
        for (source, target) in rates {
            let mut r = Resampler::new(source, target, 8);
            for n in [1usize, 37, 10_000] {
                r.reset();
                let out = feed_all(&mut r, std::iter::repeat_n(0, n));
                let expected = n as f64 * target / source;
                assert!(
                    (out.len() as f64 - expected).abs() <= 2.0,
                    "{source}->{target} n={n}: got {} expected {expected:.2}",
                    out.len()
                );
            }
        }
    }

    #[test]
    fn first_input_emits_a_full_burst() {
        let mut r = Resampler::new(8_000.0, 96_000.0, 8);
        r.feed(0);
        assert!(r.pending() >= 11, "pending {}", r.pending());
        assert!(r.pending() <= 12, "pending {}", r.pending());
    }

    #[test]
    fn upsampled_bursts_stay_bounded() {
        let mut r = Resampler::new(32_000.0, 48_000.0, 8);
        let mut max_burst = 0;
        let mut total = 0;
        for _ in 0..10_000 {
            r.feed(100);
            max_burst = max_burst.max(r.pending());
            total += r.drain().count();
        }
        assert!((total as f64 - 15_000.0).abs() <= 2.0, "total {total}");
        assert!(max_burst <= 2, "burst {max_burst}");
    }

    #[test]
    fn dc_passes_at_unity_gain() {
        let mut r = Resampler::new(NTSC_CLOCK, 32_000.0, 8);
        let out = feed_all(&mut r, std::iter::repeat_n(10_000, 100_000));
        // Skip the primed-silence warm-up.
        let settled = &out[out.len() / 2..];
        for &(l, rr) in settled {
            assert_eq!(l, rr);
            assert!((i32::from(l) - 10_000).abs() <= 50, "sample {l}");
        }
    }

    #[test]
    fn silence_stays_silent() {
        let mut r = Resampler::new(NTSC_CLOCK, 44_100.0, 8);
        let out = feed_all(&mut r, std::iter::repeat_n(0, 20_000));
        assert!(out.iter().all(|&f| f == (0, 0)));
    }

    #[test]
    fn full_scale_saturates_without_wrapping() {
        // Low-passing a full-scale square wave leaves its fundamental, whose
        // peaks exceed full scale.
        const PERIOD: usize = 64;
        let mut r = Resampler::new(48_000.0, 8_000.0, 8);
        let input = (0..20_000).map(|i| if i % PERIOD < PERIOD / 2 { i16::MAX } else { i16::MIN });
        let out = feed_all(&mut r, input);

        assert!(out.iter().any(|&(l, _)| l == i16::MAX));
        assert!(out.iter().any(|&(l, _)| l == i16::MIN));

        // Output k sits (k + 1) * step - 1 - half_width inputs into the stream.
        let step = 48_000.0 / 8_000.0;
        let offset = 1.0 + r.group_delay() as f64;
        let mut checked = 0;
        for (k, &(l, rr)) in out.iter().enumerate() {
            assert_eq!(l, rr);
            let t = (k + 1) as f64 * step - offset;
            if t < 2.0 * PERIOD as f64 {
                continue;
            }
            let phase = t.rem_euclid(PERIOD as f64);
            if (phase - 15.5).abs() <= 8.0 {
                assert!(l > 0, "output {k} at {t} should be positive, got {l}");
                checked += 1;
            } else if (phase - 47.5).abs() <= 8.0 {
                assert!(l < 0, "output {k} at {t} should be negative, got {l}");
                checked += 1;
            }
        }
        assert!(checked > 1_000, "checked {checked}");
    }

    #[test]
    fn reset_reproduces_output() {
        let input = noise(60_000);
        let mut r = Resampler::new(NTSC_CLOCK, 32_000.0, 8);
        let first = feed_all(&mut r, input.iter().copied());
        r.reset();
        let second = feed_all(&mut r, input.iter().copied());
        assert_eq!(first, second);
    }

    #[test]
    fn reset_discards_pending_output() {
        let mut r = Resampler::new(32_000.0, 96_000.0, 4);
        r.feed(1_000);
        assert!(r.pending() > 0);
        r.reset();
        assert_eq!(r.pending(), 0);
        assert_eq!(r.pop(), None);
    }

    #[test]
    fn rate_change_then_reset_uses_new_ratio() {
        let mut r = Resampler::new(NTSC_CLOCK, 32_000.0, 8);
        r.set_rates(NTSC_CLOCK, 48_000.0);
        r.reset();
        let out = feed_all(&mut r, std::iter::repeat_n(0, 100_000));
        let expected = 100_000.0 * 48_000.0 / NTSC_CLOCK;
        assert!((out.len() as f64 - expected).abs() <= 2.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without reset")]
    fn feed_after_rate_change_without_reset_fails_fast() {
        let mut r = Resampler::new(NTSC_CLOCK, 32_000.0, 8);
        r.set_rates(NTSC_CLOCK, 44_100.0);
        r.feed(0);
    }

    #[test]
    fn kernel_is_one_at_centre_and_zero_at_edge() {
        let kernel = build_kernel(0.5, 16);
        assert!((kernel[0] - 1.0).abs() < 1e-6);
        assert!(kernel[kernel.len() - 1].abs() < 1e-6);
    }
}
