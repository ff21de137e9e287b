//! Dominant-color estimation.
//!
//! Reduces a pixel buffer to a single RGB triple by averaging a
//! subsampled set of pixels. A pure function of its input — no side
//! effects, deterministic for a fixed buffer.

use crate::color::ColorSample;
use crate::frame::PixelBuffer;

/// Default subsampling stride: roughly every 10th pixel.
pub const DEFAULT_SAMPLE_STRIDE: usize = 10;

// ── DominantColorEstimator ───────────────────────────────────────

/// Averages every `sample_stride`-th pixel of a frame.
///
/// The stride is a performance tuning, not a correctness requirement:
/// any stride ≥ 1 yields a deterministic estimate, and the first pixel
/// is always sampled, so the divisor is never zero for a non-degenerate
/// frame.
#[derive(Debug, Clone)]
pub struct DominantColorEstimator {
    sample_stride: usize,
}

impl DominantColorEstimator {
    /// Estimator with the default stride.
    pub fn new() -> Self {
        Self::with_stride(DEFAULT_SAMPLE_STRIDE)
    }

    /// Estimator with an explicit stride (clamped to ≥ 1).
    pub fn with_stride(sample_stride: usize) -> Self {
        Self {
            sample_stride: sample_stride.max(1),
        }
    }

    /// The configured subsampling stride.
    pub fn sample_stride(&self) -> usize {
        self.sample_stride
    }

    /// Estimate the dominant color of `frame`.
    ///
    /// Returns [`ColorSample::BLACK`] for a zero-dimension buffer — the
    /// defined degenerate case for a source that has no frame yet, not a
    /// failure.
    pub fn estimate(&self, frame: &PixelBuffer) -> ColorSample {
        if frame.is_degenerate() {
            return ColorSample::BLACK;
        }

        let (ro, go, bo) = frame.format.rgb_offsets();
        let width = frame.width as usize;
        let total = frame.pixel_count();

        let mut sum_r: u64 = 0;
        let mut sum_g: u64 = 0;
        let mut sum_b: u64 = 0;
        let mut count: u64 = 0;

        let mut index = 0usize;
        while index < total {
            let x = (index % width) as u32;
            let y = (index / width) as u32;
            let px = frame.pixel(x, y);
            sum_r += px[ro] as u64;
            sum_g += px[go] as u64;
            sum_b += px[bo] as u64;
            count += 1;
            index += self.sample_stride;
        }

        ColorSample {
            r: round_channel(sum_r, count),
            g: round_channel(sum_g, count),
            b: round_channel(sum_b, count),
        }
    }
}

impl Default for DominantColorEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Average rounded to the nearest integer (half away from zero).
///
/// `sum / count` is at most 255, so the cast never truncates.
fn round_channel(sum: u64, count: u64) -> u8 {
    (sum as f64 / count as f64).round() as u8
}

// ── Tests ────────────────────────────────────────────────────────
