//! Transmission of color samples to the remote endpoint.
//!
//! # Wire protocol
//!
//! ```text
//! POST {base_url}{path}
//!   Body:     {"red": 255, "green": 0, "blue": 0}
//!   Response: {"success": true}
//!             {"success": false, "message": "Bulb offline"}
//! ```
//!
//! At-most-once delivery per call — no retries, no idempotency keys.
//! Application-level rejections arrive with any HTTP status (the
//! endpoint pairs `success: false` bodies with 5xx); the body, not the
//! status line, is authoritative.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{ColorCell, ColorSample};
use crate::feedback::FeedbackChannel;

/// Latency budget on a successful round trip. Exceeding it is a
/// monitored property, never a failure: the send still succeeded.
pub const DEFAULT_LATENCY_BUDGET: Duration = Duration::from_millis(2000);

/// Path the remote endpoint accepts color updates on.
pub const COLOR_ENDPOINT_PATH: &str = "/api/color";

// ── Wire types ───────────────────────────────────────────────────

/// JSON request body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorRequest {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl From<ColorSample> for ColorRequest {
    fn from(c: ColorSample) -> Self {
        Self {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

/// JSON response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── TransmissionResult ───────────────────────────────────────────

/// Outcome of a single transmission attempt.
///
/// Consumed immediately by the feedback channel; not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionResult {
    /// Whether the endpoint accepted the color.
    pub success: bool,
    /// Failure description; `None` on success.
    pub message: Option<String>,
    /// Wall-clock time from request issuance to response or failure.
    pub elapsed: Duration,
}

impl TransmissionResult {
    /// Accepted by the endpoint.
    pub fn accepted(elapsed: Duration) -> Self {
        Self {
            success: true,
            message: None,
            elapsed,
        }
    }

    /// Rejected at the application level; `message` is the endpoint's
    /// text, verbatim.
    pub fn rejected(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            elapsed,
        }
    }

    /// Transport-level failure (unreachable, timeout, malformed body).
    pub fn transport_failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            elapsed,
        }
    }

    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

// ── ColorSink ────────────────────────────────────────────────────

/// The seam between timer-driven senders and the concrete transport.
///
/// Production uses [`TransmissionClient`]; tests substitute counting or
/// scripted sinks.
#[async_trait]
pub trait ColorSink: Send + Sync {
    /// Send one color; the outcome is encoded, never an `Err`.
    async fn send(&self, color: ColorSample) -> TransmissionResult;
}

// ── TransmitConfig ───────────────────────────────────────────────

/// Configuration for [`TransmissionClient`].
#[derive(Debug, Clone)]
pub struct TransmitConfig {
    /// Endpoint base URL (scheme + host + port).
    pub base_url: String,
    /// Path appended to the base URL.
    pub path: String,
    /// Successful round trips slower than this log a diagnostic.
    pub latency_budget: Duration,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            path: COLOR_ENDPOINT_PATH.into(),
            latency_budget: DEFAULT_LATENCY_BUDGET,
        }
    }
}

impl TransmitConfig {
    /// The full request URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

// ── TransmissionClient ───────────────────────────────────────────

/// HTTP client for the remote color endpoint.
#[derive(Debug, Clone)]
pub struct TransmissionClient {
    http: reqwest::Client,
    config: TransmitConfig,
}

impl TransmissionClient {
    /// Client with default configuration.
    pub fn new() -> Self {
        Self::with_config(TransmitConfig::default())
    }

    /// Client with explicit configuration.
    pub fn with_config(config: TransmitConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The configured request URL.
    pub fn url(&self) -> String {
        self.config.url()
    }

    async fn send_inner(&self, color: ColorSample) -> TransmissionResult {
        let started = Instant::now();

        let response = match self
            .http
            .post(self.config.url())
            .json(&ColorRequest::from(color))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return TransmissionResult::transport_failure(
                    format!("Cannot connect to server: {e}"),
                    started.elapsed(),
                );
            }
        };

        // The body is authoritative even on non-2xx statuses.
        let body: ColorResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                return TransmissionResult::transport_failure(
                    format!("Malformed response from server: {e}"),
                    started.elapsed(),
                );
            }
        };

        let elapsed = started.elapsed();
        if body.success {
            if elapsed > self.config.latency_budget {
                // Diagnostic only; the transmission itself succeeded.
                warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = self.config.latency_budget.as_millis() as u64,
                    "color change exceeded latency budget"
                );
            }
            TransmissionResult::accepted(elapsed)
        } else {
            TransmissionResult::rejected(
                body.message
                    .unwrap_or_else(|| "request rejected".to_string()),
                elapsed,
            )
        }
    }
}

impl Default for TransmissionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ColorSink for TransmissionClient {
    async fn send(&self, color: ColorSample) -> TransmissionResult {
        self.send_inner(color).await
    }
}

// ── Shared send path ─────────────────────────────────────────────

/// Send the cell's current color and report the outcome.
///
/// This is the single path used by both the manual trigger and the
/// auto-mode timer: the color is read at send time (never frozen
/// earlier), and the result lands in the shared feedback slot.
pub async fn send_and_report(
    cell: &ColorCell,
    sink: &dyn ColorSink,
    feedback: &FeedbackChannel,
) -> TransmissionResult {
    let color = cell.load();
    let result = sink.send(color).await;
    feedback.report(&result);
    result
}

/// Spawn [`send_and_report`] as its own task.
///
/// Fire-and-forget: cancelling the caller (e.g. the auto-mode timer)
/// leaves an already-issued send to run to completion and still report.
pub fn spawn_send(
    cell: Arc<ColorCell>,
    sink: Arc<dyn ColorSink>,
    feedback: Arc<FeedbackChannel>,
) -> tokio::task::JoinHandle<TransmissionResult> {
    tokio::spawn(async move { send_and_report(&cell, sink.as_ref(), &feedback).await })
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_color_field_names() {
        let req = ColorRequest::from(ColorSample::new(255, 10, 0));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["red"], 255);
        assert_eq!(json["green"], 10);
        assert_eq!(json["blue"], 0);
    }

    #[test]
    fn response_message_is_optional() {
        let ok: ColorResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.message, None);

        let rejected: ColorResponse =
            serde_json::from_str(r#"{"success":false,"message":"Bulb offline"}"#).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.message.as_deref(), Some("Bulb offline"));
    }

    #[test]
    fn config_url_joins_without_double_slash() {
        let config = TransmitConfig {
            base_url: "http://10.0.0.5:80/".into(),
            ..Default::default()
        };
        assert_eq!(config.url(), "http://10.0.0.5:80/api/color");
    }

    #[test]
    fn result_constructors() {
        let ok = TransmissionResult::accepted(Duration::from_millis(42));
        assert!(ok.success);
        assert_eq!(ok.message, None);
        assert_eq!(ok.elapsed_ms(), 42);

        let rejected = TransmissionResult::rejected("X", Duration::ZERO);
        assert!(!rejected.success);
        assert_eq!(rejected.message.as_deref(), Some("X"));
    }

    #[test]
    fn shared_send_path_reads_at_send_time() {
        struct Recorder(std::sync::Mutex<Vec<ColorSample>>);

        #[async_trait]
        impl ColorSink for Recorder {
            async fn send(&self, color: ColorSample) -> TransmissionResult {
                self.0.lock().unwrap().push(color);
                TransmissionResult::accepted(Duration::ZERO)
            }
        }

        tokio_test::block_on(async {
            let cell = ColorCell::new();
            let sink = Recorder(std::sync::Mutex::new(Vec::new()));
            let feedback = FeedbackChannel::new();

            cell.store(ColorSample::new(1, 1, 1));
            send_and_report(&cell, &sink, &feedback).await;
            cell.store(ColorSample::new(2, 2, 2));
            send_and_report(&cell, &sink, &feedback).await;

            let seen = sink.0.lock().unwrap().clone();
            assert_eq!(
                seen,
                vec![ColorSample::new(1, 1, 1), ColorSample::new(2, 2, 2)]
            );
        });
    }
}
