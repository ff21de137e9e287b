//! Domain-specific error types for the capture loop.
//!
//! All fallible operations return `Result<T, ChromaError>`.
//! No panics on invalid input — every error is typed and recoverable.
//!
//! Transmission outcomes are deliberately *not* errors: a failed send is
//! encoded in [`TransmissionResult`](crate::transmit::TransmissionResult)
//! and surfaced through the feedback channel, so the loops that produced
//! it keep running.

use thiserror::Error;

/// The canonical error type for the capture loop.
#[derive(Debug, Error)]
pub enum ChromaError {
    // ── Frame source errors ──────────────────────────────────────
    /// Source enumeration or acquisition failed. The catalog remains
    /// usable and selection can be retried.
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),

    /// No catalog entry matches the requested source id.
    #[error("unknown source id: {0}")]
    UnknownSource(String),

    // ── Frame errors ─────────────────────────────────────────────
    /// The pixel data does not match the declared frame geometry.
    #[error("invalid frame data length: expected {expected}, got {actual}")]
    InvalidFrameLength { expected: usize, actual: usize },

    /// The row stride is too small for the declared width and format.
    #[error("invalid frame stride: {stride} bytes for {row_bytes}-byte rows")]
    InvalidStride { stride: usize, row_bytes: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = ChromaError::UnknownSource("cam7".into());
        assert!(e.to_string().contains("cam7"));

        let e = ChromaError::InvalidFrameLength {
            expected: 1200,
            actual: 800,
        };
        assert!(e.to_string().contains("1200"));
        assert!(e.to_string().contains("800"));
    }

    #[test]
    fn source_unavailable_is_descriptive() {
        let e = ChromaError::SourceUnavailable("device busy".into());
        assert!(e.to_string().contains("device busy"));
    }
}
