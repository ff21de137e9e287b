//! Capture scheduling.
//!
//! Polls the active frame source at a fixed cadence, estimates the
//! dominant color of each frame, and publishes the result into the
//! shared [`ColorCell`]. One service instance runs per active source;
//! replacing the source means stopping this service and starting a new
//! one — no two capture loops may run concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::color::ColorCell;
use crate::estimator::{DEFAULT_SAMPLE_STRIDE, DominantColorEstimator};
use crate::source::FrameSource;

// ── CaptureConfig ────────────────────────────────────────────────

/// Configuration for [`CaptureService`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Estimation cadence.
    pub period: Duration,
    /// Estimator subsampling stride.
    pub sample_stride: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(100),
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

// ── CaptureService ───────────────────────────────────────────────

/// The capture loop for one frame source.
///
/// # Lifetime
///
/// Call [`run`](Self::run) to start the loop. It runs until
/// [`stop`](Self::stop) is called (or the owning task is aborted when
/// the source is replaced). Frame-read failures are recoverable: the
/// tick is skipped and the loop retries at the next period.
pub struct CaptureService {
    source: Box<dyn FrameSource>,
    estimator: DominantColorEstimator,
    cell: Arc<ColorCell>,
    running: Arc<AtomicBool>,
    config: CaptureConfig,
}

impl CaptureService {
    /// Service with the default config.
    pub fn new(source: Box<dyn FrameSource>, cell: Arc<ColorCell>) -> Self {
        Self::with_config(source, cell, CaptureConfig::default())
    }

    /// Service with explicit configuration.
    pub fn with_config(
        source: Box<dyn FrameSource>,
        cell: Arc<ColorCell>,
        config: CaptureConfig,
    ) -> Self {
        let estimator = DominantColorEstimator::with_stride(config.sample_stride);
        Self {
            source,
            estimator,
            cell,
            running: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// A cloneable handle that can stop the loop from another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Signal the loop to stop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the capture loop.
    ///
    /// Intended to be spawned on the Tokio runtime:
    ///
    /// ```no_run
    /// # use chroma_core::capture::CaptureService;
    /// # async fn example(mut svc: CaptureService) {
    /// let handle = svc.stop_handle();
    /// tokio::spawn(async move { svc.run().await });
    /// // … later …
    /// handle.store(false, std::sync::atomic::Ordering::SeqCst);
    /// # }
    /// ```
    pub async fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);

        while self.running.load(Ordering::SeqCst) {
            let tick_start = Instant::now();

            match self.source.grab().await {
                Ok(frame) => {
                    // Degenerate frames estimate to black; the source is
                    // simply not ready yet.
                    let sample = self.estimator.estimate(&frame);
                    self.cell.store(sample);
                }
                Err(e) => {
                    warn!(
                        source = %self.source.descriptor().id,
                        "frame grab failed: {e}"
                    );
                }
            }

            Self::pace(tick_start, self.config.period).await;
        }
    }

    /// Sleep for the remainder of the capture period. Overrunning ticks
    /// are coalesced — there is no queue and no backpressure.
    async fn pace(tick_start: Instant, period: Duration) {
        let elapsed = tick_start.elapsed();
        if elapsed < period {
            tokio::time::sleep(period - elapsed).await;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
