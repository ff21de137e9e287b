//! # chroma-core
//!
//! Core library for the Chroma color capture & synchronization loop.
//!
//! This crate contains:
//! - **Color**: `ColorSample` and the lock-free `ColorCell` holding the
//!   latest estimate
//! - **Frames**: `PixelBuffer` / `PixelFormat` raw frame representation
//! - **Estimator**: `DominantColorEstimator` — subsampled channel average
//! - **Sources**: the `FrameSource` trait, `SourceCatalog` enumeration,
//!   and deterministic synthetic sources
//! - **Capture**: `CaptureService` — the fixed-cadence estimation loop
//! - **Transmit**: `TransmissionClient` for the remote color endpoint,
//!   with latency-budget accounting, behind the `ColorSink` seam
//! - **Auto mode**: `AutoModeController` — periodic retransmission with
//!   idempotent toggle semantics
//! - **Feedback**: `FeedbackChannel` — the single user-visible error slot
//! - **Error**: `ChromaError` — typed, `thiserror`-based error hierarchy

pub mod auto_mode;
pub mod capture;
pub mod color;
pub mod error;
pub mod estimator;
pub mod feedback;
pub mod frame;
pub mod source;
pub mod synthetic;
pub mod transmit;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use auto_mode::{AutoModeConfig, AutoModeController, AutoModePhase};
pub use capture::{CaptureConfig, CaptureService};
pub use color::{ColorCell, ColorSample};
pub use error::ChromaError;
pub use estimator::{DEFAULT_SAMPLE_STRIDE, DominantColorEstimator};
pub use feedback::FeedbackChannel;
pub use frame::{PixelBuffer, PixelFormat};
pub use source::{FrameSource, SourceCatalog, SourceDescriptor};
pub use synthetic::{SyntheticPattern, SyntheticSource, register_builtins};
pub use transmit::{
    ColorRequest, ColorResponse, ColorSink, TransmissionClient, TransmissionResult,
    TransmitConfig, send_and_report,
};
