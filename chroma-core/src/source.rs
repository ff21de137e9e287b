//! Frame-source abstraction and catalog.
//!
//! The acquisition mechanism is opaque to the core: a [`FrameSource`]
//! only has to produce the current frame as a [`PixelBuffer`] on demand.
//! The [`SourceCatalog`] covers enumeration and selection — stable ids,
//! human-readable labels (with a `"Camera N"` fallback for unlabeled
//! devices), and retryable instantiation.

use async_trait::async_trait;

use crate::error::ChromaError;
use crate::frame::PixelBuffer;

// ── SourceDescriptor ─────────────────────────────────────────────

/// Stable identifier plus display label for an available frame source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Stable identifier, used for selection.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl std::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

// ── FrameSource ──────────────────────────────────────────────────

/// An opaque provider of successive video frames.
///
/// `grab` returns the *current* frame; a source that has not produced
/// one yet returns the degenerate [`PixelBuffer::empty`] rather than an
/// error. Acquisition failures are recoverable — the capture loop logs
/// and retries on its next tick.
#[async_trait]
pub trait FrameSource: Send + Sync + std::fmt::Debug {
    /// Descriptor for this source instance.
    fn descriptor(&self) -> &SourceDescriptor;

    /// Read the current frame.
    async fn grab(&mut self) -> Result<PixelBuffer, ChromaError>;
}

// ── SourceCatalog ────────────────────────────────────────────────

type SourceBuilder =
    Box<dyn Fn() -> Result<Box<dyn FrameSource>, ChromaError> + Send + Sync>;

/// Enumeration and instantiation of available frame sources.
///
/// Selection failures leave the catalog untouched, so the caller can
/// retry or pick another source.
#[derive(Default)]
pub struct SourceCatalog {
    entries: Vec<(SourceDescriptor, SourceBuilder)>,
}

impl SourceCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `id`.
    ///
    /// A `None` label gets the `"Camera N"` fallback, numbered by
    /// catalog position (1-based).
    pub fn register<F>(&mut self, id: impl Into<String>, label: Option<String>, builder: F)
    where
        F: Fn() -> Result<Box<dyn FrameSource>, ChromaError> + Send + Sync + 'static,
    {
        let label = label.unwrap_or_else(|| format!("Camera {}", self.entries.len() + 1));
        let descriptor = SourceDescriptor {
            id: id.into(),
            label,
        };
        self.entries.push((descriptor, Box::new(builder)));
    }

    /// Descriptors of every registered source, in registration order.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        self.entries.iter().map(|(d, _)| d.clone()).collect()
    }

    /// Instantiate the source registered under `id`.
    pub fn open(&self, id: &str) -> Result<Box<dyn FrameSource>, ChromaError> {
        let (_, builder) = self
            .entries
            .iter()
            .find(|(d, _)| d.id == id)
            .ok_or_else(|| ChromaError::UnknownSource(id.to_string()))?;
        builder()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no sources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{SyntheticPattern, SyntheticSource};

    fn gray_builder() -> Result<Box<dyn FrameSource>, ChromaError> {
        Ok(Box::new(SyntheticSource::new(
            "gray",
            "Uniform gray",
            SyntheticPattern::Uniform(crate::color::ColorSample::new(128, 128, 128)),
            8,
            8,
        )))
    }

    #[test]
    fn unlabeled_sources_get_camera_n_fallback() {
        let mut catalog = SourceCatalog::new();
        catalog.register("a", None, gray_builder);
        catalog.register("b", Some("Front door".into()), gray_builder);
        catalog.register("c", None, gray_builder);

        let labels: Vec<String> =
            catalog.descriptors().into_iter().map(|d| d.label).collect();
        assert_eq!(labels, ["Camera 1", "Front door", "Camera 3"]);
    }

    #[test]
    fn open_unknown_id_fails_but_catalog_survives() {
        let mut catalog = SourceCatalog::new();
        catalog.register("a", None, gray_builder);

        let err = catalog.open("nope").unwrap_err();
        assert!(matches!(err, ChromaError::UnknownSource(_)));

        // Selection is retryable after a failure.
        assert!(catalog.open("a").is_ok());
    }

    #[test]
    fn builder_failure_propagates() {
        let mut catalog = SourceCatalog::new();
        catalog.register("flaky", None, || {
            Err(ChromaError::SourceUnavailable("device busy".into()))
        });
        let err = catalog.open("flaky").unwrap_err();
        assert!(matches!(err, ChromaError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn opened_source_produces_frames() {
        let mut catalog = SourceCatalog::new();
        catalog.register("a", None, gray_builder);
        let mut source = catalog.open("a").unwrap();
        let frame = source.grab().await.unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 8);
    }
}
