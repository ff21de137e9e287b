//! Agent core wiring.
//!
//! Owns the shared color/error slots, the source catalog, the active
//! capture loop, the transmission client, and the auto-mode controller,
//! and exposes the operations the console adapter maps user commands
//! onto. Replacing the source always stops the previous capture loop
//! first, so at most one loop runs at any time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use chroma_core::auto_mode::{AutoModeController, AutoModePhase};
use chroma_core::capture::CaptureService;
use chroma_core::color::{ColorCell, ColorSample};
use chroma_core::error::ChromaError;
use chroma_core::feedback::FeedbackChannel;
use chroma_core::source::{SourceCatalog, SourceDescriptor};
use chroma_core::synthetic::register_builtins;
use chroma_core::transmit::{TransmissionClient, TransmissionResult, send_and_report};

use crate::config::AgentConfig;

// ── ChromaApp ────────────────────────────────────────────────────

/// Top-level application state.
pub struct ChromaApp {
    config: AgentConfig,
    catalog: SourceCatalog,
    cell: Arc<ColorCell>,
    feedback: Arc<FeedbackChannel>,
    client: Arc<TransmissionClient>,
    auto: AutoModeController,
    capture_stop: Option<Arc<AtomicBool>>,
    capture_task: Option<JoinHandle<()>>,
    active_source: Option<SourceDescriptor>,
}

impl ChromaApp {
    /// Build the app from configuration, with the built-in sources
    /// registered.
    pub fn new(config: AgentConfig) -> Self {
        let mut catalog = SourceCatalog::new();
        register_builtins(&mut catalog, config.capture.width, config.capture.height);

        let cell = Arc::new(ColorCell::new());
        let feedback = Arc::new(FeedbackChannel::new());
        let client = Arc::new(TransmissionClient::with_config(config.to_transmit_config()));
        let sink: Arc<dyn chroma_core::transmit::ColorSink> = client.clone();
        let auto = AutoModeController::with_config(
            Arc::clone(&cell),
            sink,
            Arc::clone(&feedback),
            config.to_auto_config(),
        );

        Self {
            config,
            catalog,
            cell,
            feedback,
            client,
            auto,
            capture_stop: None,
            capture_task: None,
            active_source: None,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Descriptors of every selectable source.
    pub fn sources(&self) -> Vec<SourceDescriptor> {
        self.catalog.descriptors()
    }

    /// Select and start a frame source.
    ///
    /// The previous capture loop (if any) is stopped first and its
    /// pending timer discarded; on success the active error is cleared.
    /// On failure the previous state is already torn down but selection
    /// remains retryable.
    pub fn select_source(&mut self, id: &str) -> Result<(), ChromaError> {
        let source = self.catalog.open(id)?;
        let descriptor = source.descriptor().clone();

        self.stop_capture();

        let mut svc = CaptureService::with_config(
            source,
            Arc::clone(&self.cell),
            self.config.to_capture_config(),
        );
        self.capture_stop = Some(svc.stop_handle());
        self.capture_task = Some(tokio::spawn(async move { svc.run().await }));

        self.feedback.clear();
        info!(source = %descriptor, "capture started");
        self.active_source = Some(descriptor);
        Ok(())
    }

    /// Manual trigger: send the current color exactly once and report.
    pub async fn send_now(&self) -> TransmissionResult {
        send_and_report(&self.cell, self.client.as_ref(), &self.feedback).await
    }

    /// Edge-triggered auto-mode toggle. Returns whether the phase
    /// changed (redundant toggles are no-ops).
    pub fn set_auto(&mut self, enabled: bool) -> bool {
        self.auto.set_enabled(enabled)
    }

    /// Whether auto mode is currently enabled.
    pub fn auto_enabled(&self) -> bool {
        self.auto.is_enabled()
    }

    /// The auto-mode phase.
    pub fn auto_phase(&self) -> AutoModePhase {
        self.auto.phase()
    }

    /// The latest dominant-color estimate.
    pub fn current_color(&self) -> ColorSample {
        self.cell.load()
    }

    /// The currently displayed error, if any.
    pub fn active_error(&self) -> Option<String> {
        self.feedback.active_error()
    }

    /// Descriptor of the active source, if one is selected.
    pub fn active_source(&self) -> Option<&SourceDescriptor> {
        self.active_source.as_ref()
    }

    /// Stop the capture loop and disable auto mode.
    pub fn shutdown(&mut self) {
        self.auto.disable();
        self.stop_capture();
        info!("agent stopped");
    }

    // ── Internal ─────────────────────────────────────────────────

    fn stop_capture(&mut self) {
        if let Some(stop) = self.capture_stop.take() {
            stop.store(false, Ordering::SeqCst);
        }
        if let Some(task) = self.capture_task.take() {
            // Discard the pending tick rather than waiting a period out.
            task.abort();
        }
        if let Some(old) = self.active_source.take() {
            debug!(source = %old, "capture stopped");
        }
    }
}

impl Drop for ChromaApp {
    fn drop(&mut self) {
        self.stop_capture();
    }
}

// ── Tests ────────────────────────────────────────────────────────
