//! Synthetic frame sources.
//!
//! Deterministic stand-ins for camera hardware, used by the agent's
//! built-in catalog and by tests. Each grab produces an RGBA buffer;
//! the moving pattern advances by one step per grab.

use async_trait::async_trait;

use crate::color::ColorSample;
use crate::error::ChromaError;
use crate::frame::{PixelBuffer, PixelFormat};
use crate::source::{FrameSource, SourceCatalog, SourceDescriptor};

// ── SyntheticPattern ─────────────────────────────────────────────

/// What a [`SyntheticSource`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticPattern {
    /// Every pixel is the same color.
    Uniform(ColorSample),
    /// Red ramps left→right, blue ramps right→left, green fixed.
    HorizontalGradient,
    /// 16×16 blocks cycling through red/green/blue, shifting each grab.
    MovingBlocks,
}

// ── SyntheticSource ──────────────────────────────────────────────

/// A deterministic frame generator.
#[derive(Debug)]
pub struct SyntheticSource {
    descriptor: SourceDescriptor,
    pattern: SyntheticPattern,
    width: u32,
    height: u32,
    /// Grabs to answer with the degenerate empty frame before the
    /// source reports real dimensions (models camera warm-up).
    warmup_grabs: u32,
    grabs: u64,
}

impl SyntheticSource {
    /// Create a source drawing `pattern` at `width × height`.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        pattern: SyntheticPattern,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            descriptor: SourceDescriptor {
                id: id.into(),
                label: label.into(),
            },
            pattern,
            width,
            height,
            warmup_grabs: 0,
            grabs: 0,
        }
    }

    /// Answer the first `grabs` reads with an empty frame.
    pub fn with_warmup(mut self, grabs: u32) -> Self {
        self.warmup_grabs = grabs;
        self
    }

    fn render(&self) -> PixelBuffer {
        let mut data =
            Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let (r, g, b) = match self.pattern {
                    SyntheticPattern::Uniform(c) => (c.r, c.g, c.b),
                    SyntheticPattern::HorizontalGradient => {
                        let ramp = if self.width > 1 {
                            (x * 255 / (self.width - 1)) as u8
                        } else {
                            0
                        };
                        (ramp, 128, 255 - ramp)
                    }
                    SyntheticPattern::MovingBlocks => {
                        let block = (x / 16) as u64 + (y / 16) as u64 + self.grabs;
                        match block % 3 {
                            0 => (255, 0, 0),
                            1 => (0, 255, 0),
                            _ => (0, 0, 255),
                        }
                    }
                };
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        // Geometry is generated to match, so this cannot fail.
        PixelBuffer::new(self.width, self.height, PixelFormat::Rgba8, data)
            .unwrap_or_else(|_| PixelBuffer::empty())
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn grab(&mut self) -> Result<PixelBuffer, ChromaError> {
        if self.grabs < self.warmup_grabs as u64 {
            self.grabs += 1;
            return Ok(PixelBuffer::empty());
        }
        let frame = self.render();
        self.grabs += 1;
        Ok(frame)
    }
}

// ── Built-in catalog ─────────────────────────────────────────────

/// Register the built-in synthetic sources on `catalog`.
pub fn register_builtins(catalog: &mut SourceCatalog, width: u32, height: u32) {
    catalog.register("gray", Some("Uniform gray".into()), move || {
        Ok(Box::new(SyntheticSource::new(
            "gray",
            "Uniform gray",
            SyntheticPattern::Uniform(ColorSample::new(128, 128, 128)),
            width,
            height,
        )))
    });
    catalog.register("gradient", Some("Horizontal gradient".into()), move || {
        Ok(Box::new(SyntheticSource::new(
            "gradient",
            "Horizontal gradient",
            SyntheticPattern::HorizontalGradient,
            width,
            height,
        )))
    });
    catalog.register("blocks", Some("Moving blocks".into()), move || {
        Ok(Box::new(SyntheticSource::new(
            "blocks",
            "Moving blocks",
            SyntheticPattern::MovingBlocks,
            width,
            height,
        )))
    });
}

// ── Tests ────────────────────────────────────────────────────────
