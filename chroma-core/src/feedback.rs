//! User-visible transmission feedback.
//!
//! Holds the single active error message. Both the manual and the
//! auto-mode transmission paths report here, so the two race for the
//! same displayed state — last writer wins, with no ordering guarantee
//! beyond natural completion order.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::transmit::TransmissionResult;

// ── FeedbackChannel ──────────────────────────────────────────────

/// The single slot through which transmission outcomes become visible.
///
/// A failure replaces any prior message; a success clears it. Observers
/// subscribe with [`watch`](FeedbackChannel::watch) to update a display
/// as soon as the slot changes.
#[derive(Debug)]
pub struct FeedbackChannel {
    tx: watch::Sender<Option<String>>,
}

impl FeedbackChannel {
    /// Channel with no active error.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Record a transmission outcome.
    pub fn report(&self, result: &TransmissionResult) {
        if result.success {
            debug!(elapsed_ms = result.elapsed_ms(), "transmission accepted");
            self.clear();
        } else {
            let message = result
                .message
                .clone()
                .unwrap_or_else(|| "transmission failed".to_string());
            warn!(elapsed_ms = result.elapsed_ms(), %message, "transmission failed");
            self.tx.send_replace(Some(message));
        }
    }

    /// Clear the active error (also used when a source starts cleanly).
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// The currently displayed error, if any.
    pub fn active_error(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Subscribe to error-slot changes.
    pub fn watch(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

impl Default for FeedbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────
