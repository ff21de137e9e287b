//! Auto-mode periodic retransmission.
//!
//! A two-state controller that, while enabled, resends the latest
//! dominant color at a fixed period without user action. Each firing
//! reads the [`ColorCell`] at that moment — never a value frozen at
//! enable time — and runs the send as its own task, so disabling
//! cancels only the timer: an in-flight send completes and still
//! reports through the feedback channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::color::ColorCell;
use crate::feedback::FeedbackChannel;
use crate::transmit::{ColorSink, spawn_send};

// ── AutoModePhase ────────────────────────────────────────────────

/// The controller's state. Transitions are driven only by explicit
/// user toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoModePhase {
    /// No timer armed. Initial state.
    #[default]
    Disabled,
    /// Recurring timer armed; sends fire at the configured period.
    Enabled,
}

impl std::fmt::Display for AutoModePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "off"),
            Self::Enabled => write!(f, "on"),
        }
    }
}

// ── AutoModeConfig ───────────────────────────────────────────────

/// Configuration for [`AutoModeController`].
#[derive(Debug, Clone)]
pub struct AutoModeConfig {
    /// Retransmission period.
    pub period: Duration,
}

impl Default for AutoModeConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(3000),
        }
    }
}

// ── AutoModeController ───────────────────────────────────────────

/// Periodic resender of the latest estimate.
///
/// At most one timer exists at any time; redundant toggles are no-ops.
/// A failed automatic send never stops the timer — retries are governed
/// purely by the fixed period, with no backoff.
pub struct AutoModeController {
    cell: Arc<ColorCell>,
    sink: Arc<dyn ColorSink>,
    feedback: Arc<FeedbackChannel>,
    config: AutoModeConfig,
    timer: Option<JoinHandle<()>>,
}

impl AutoModeController {
    /// Controller with the default period.
    pub fn new(
        cell: Arc<ColorCell>,
        sink: Arc<dyn ColorSink>,
        feedback: Arc<FeedbackChannel>,
    ) -> Self {
        Self::with_config(cell, sink, feedback, AutoModeConfig::default())
    }

    /// Controller with explicit configuration.
    pub fn with_config(
        cell: Arc<ColorCell>,
        sink: Arc<dyn ColorSink>,
        feedback: Arc<FeedbackChannel>,
        config: AutoModeConfig,
    ) -> Self {
        Self {
            cell,
            sink,
            feedback,
            config,
            timer: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> AutoModePhase {
        if self.timer.is_some() {
            AutoModePhase::Enabled
        } else {
            AutoModePhase::Disabled
        }
    }

    /// Whether the recurring timer is armed.
    pub fn is_enabled(&self) -> bool {
        self.timer.is_some()
    }

    /// Enable auto mode: one immediate send, then one per period.
    ///
    /// Returns `false` (and arms nothing) if already enabled — a
    /// redundant toggle must not create a duplicate timer.
    pub fn enable(&mut self) -> bool {
        if self.timer.is_some() {
            return false;
        }

        info!(period_ms = self.config.period.as_millis() as u64, "auto mode enabled");

        // Immediate send on the transition.
        spawn_send(
            Arc::clone(&self.cell),
            Arc::clone(&self.sink),
            Arc::clone(&self.feedback),
        );

        let cell = Arc::clone(&self.cell);
        let sink = Arc::clone(&self.sink);
        let feedback = Arc::clone(&self.feedback);
        let period = self.config.period;

        self.timer = Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                debug!("auto mode tick");
                // Fire-and-forget: aborting this timer task leaves an
                // issued send to complete and report.
                spawn_send(
                    Arc::clone(&cell),
                    Arc::clone(&sink),
                    Arc::clone(&feedback),
                );
            }
        }));

        true
    }

    /// Disable auto mode: cancel the timer, schedule nothing further.
    ///
    /// Returns `false` if already disabled. In-flight sends are not
    /// cancelled, only not-rescheduled.
    pub fn disable(&mut self) -> bool {
        match self.timer.take() {
            Some(handle) => {
                handle.abort();
                info!("auto mode disabled");
                true
            }
            None => false,
        }
    }

    /// Edge-triggered toggle target. Returns whether the phase changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if enabled { self.enable() } else { self.disable() }
    }
}

impl Drop for AutoModeController {
    fn drop(&mut self) {
        // Teardown destroys the timer handle.
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSample;
    use crate::transmit::TransmissionResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Sink that records every send and can be scripted to fail or stall.
    struct RecordingSink {
        sent: Mutex<Vec<ColorSample>>,
        fail: AtomicBool,
        delay: Duration,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
                delay: Duration::ZERO,
            })
        }

        fn with_delay(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
                delay,
            })
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ColorSink for RecordingSink {
        async fn send(&self, color: ColorSample) -> TransmissionResult {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.sent.lock().unwrap().push(color);
            if self.fail.load(Ordering::SeqCst) {
                TransmissionResult::rejected("Bulb offline", Duration::ZERO)
            } else {
                TransmissionResult::accepted(Duration::ZERO)
            }
        }
    }

    fn controller(
        sink: Arc<RecordingSink>,
        period: Duration,
    ) -> (AutoModeController, Arc<ColorCell>, Arc<FeedbackChannel>) {
        let cell = Arc::new(ColorCell::new());
        let feedback = Arc::new(FeedbackChannel::new());
        let ctrl = AutoModeController::with_config(
            Arc::clone(&cell),
            sink,
            Arc::clone(&feedback),
            AutoModeConfig { period },
        );
        (ctrl, cell, feedback)
    }

    const PERIOD: Duration = Duration::from_millis(3000);

    #[tokio::test(start_paused = true)]
    async fn enable_sends_immediately_then_once_per_tick() {
        let sink = RecordingSink::new();
        let (mut ctrl, _cell, _feedback) = controller(Arc::clone(&sink), PERIOD);

        assert!(ctrl.enable());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(sink.count(), 1, "one immediate send on enable");

        // Three timer ticks → four sends total.
        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(10)).await;
        assert_eq!(sink.count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn disable_prevents_further_sends() {
        let sink = RecordingSink::new();
        let (mut ctrl, _cell, _feedback) = controller(Arc::clone(&sink), PERIOD);

        ctrl.enable();
        tokio::time::sleep(PERIOD * 2 + Duration::from_millis(10)).await;
        let before = sink.count();
        assert_eq!(before, 3);

        assert!(ctrl.disable());
        tokio::time::sleep(PERIOD * 3).await;
        assert_eq!(sink.count(), before, "no sends after disable");
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_enable_does_not_duplicate_the_timer() {
        let sink = RecordingSink::new();
        let (mut ctrl, _cell, _feedback) = controller(Arc::clone(&sink), PERIOD);

        assert!(ctrl.enable());
        assert!(!ctrl.enable());
        assert!(ctrl.is_enabled());

        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        // One immediate + one tick; a duplicate timer would add more.
        assert_eq!(sink.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_disable_is_a_noop() {
        let sink = RecordingSink::new();
        let (mut ctrl, _cell, _feedback) = controller(sink, PERIOD);

        assert!(!ctrl.disable());
        assert_eq!(ctrl.phase(), AutoModePhase::Disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_send_completes_after_disable() {
        let sink = RecordingSink::with_delay(Duration::from_millis(500));
        let (mut ctrl, _cell, feedback) = controller(Arc::clone(&sink), PERIOD);

        ctrl.enable();
        // The immediate send is now sleeping inside the sink.
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctrl.disable();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.count(), 1, "issued send ran to completion");
        assert_eq!(feedback.active_error(), None, "and still reported");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_sends_do_not_stop_the_timer() {
        let sink = RecordingSink::new();
        sink.fail.store(true, Ordering::SeqCst);
        let (mut ctrl, _cell, feedback) = controller(Arc::clone(&sink), PERIOD);

        ctrl.enable();
        tokio::time::sleep(PERIOD * 2 + Duration::from_millis(10)).await;
        assert_eq!(sink.count(), 3, "timer kept firing through failures");
        assert_eq!(feedback.active_error().as_deref(), Some("Bulb offline"));

        // Recovery on a later tick clears the error.
        sink.fail.store(false, Ordering::SeqCst);
        tokio::time::sleep(PERIOD).await;
        assert_eq!(feedback.active_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_read_the_cell_at_fire_time() {
        let sink = RecordingSink::new();
        let (mut ctrl, cell, _feedback) = controller(Arc::clone(&sink), PERIOD);

        cell.store(ColorSample::new(10, 0, 0));
        ctrl.enable();
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Update between ticks: the next firing must see the new value.
        cell.store(ColorSample::new(20, 0, 0));
        tokio::time::sleep(PERIOD).await;

        let sent = sink.sent.lock().unwrap().clone();
        assert_eq!(sent[0], ColorSample::new(10, 0, 0));
        assert_eq!(sent[1], ColorSample::new(20, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_tears_the_timer_down() {
        let sink = RecordingSink::new();
        let (mut ctrl, _cell, _feedback) = controller(Arc::clone(&sink), PERIOD);

        ctrl.enable();
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(ctrl);

        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(sink.count(), 1, "only the immediate send happened");
    }
}
