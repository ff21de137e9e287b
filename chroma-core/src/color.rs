//! Color sample type and the shared "current color" slot.
//!
//! A [`ColorSample`] is immutable once created: new estimates replace,
//! never mutate, the value held by the [`ColorCell`]. The cell packs the
//! three channels into a single atomic word so the capture loop (the only
//! writer) never blocks readers, and readers may observe a value that is
//! superseded before they use it — the loop optimizes for freshness, not
//! per-sample consistency.

use std::sync::atomic::{AtomicU32, Ordering};

// ── ColorSample ──────────────────────────────────────────────────

/// An RGB triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSample {
    /// Red channel, 0–255.
    pub r: u8,
    /// Green channel, 0–255.
    pub g: u8,
    /// Blue channel, 0–255.
    pub b: u8,
}

impl ColorSample {
    /// Black — the degenerate estimate for a frame with no pixels.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Create a sample from explicit channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for ColorSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

// ── ColorCell ────────────────────────────────────────────────────

/// Lock-free slot holding the most recent dominant-color estimate.
///
/// Single logical writer (the capture loop); any number of readers
/// (manual sends, the auto-mode timer). Channels are packed as
/// `0x00RRGGBB`.
#[derive(Debug, Default)]
pub struct ColorCell(AtomicU32);

impl ColorCell {
    /// Create a cell initialised to black.
    pub fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Replace the current sample.
    pub fn store(&self, sample: ColorSample) {
        let packed =
            (sample.r as u32) << 16 | (sample.g as u32) << 8 | sample.b as u32;
        self.0.store(packed, Ordering::SeqCst);
    }

    /// Read the current sample.
    pub fn load(&self) -> ColorSample {
        let packed = self.0.load(Ordering::SeqCst);
        ColorSample {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
