//! Configuration for the Chroma agent.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use chroma_core::auto_mode::AutoModeConfig;
use chroma_core::capture::CaptureConfig;
use chroma_core::transmit::TransmitConfig;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Remote color endpoint settings.
    pub endpoint: EndpointConfig,
    /// Capture loop settings.
    pub capture: CaptureSection,
    /// Auto-mode settings.
    pub auto_mode: AutoModeSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the color-receiving service.
    pub base_url: String,
    /// Request path on the service.
    pub path: String,
    /// Latency budget in milliseconds (diagnostic only).
    pub latency_budget_ms: u64,
}

/// Capture loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Estimation cadence in milliseconds.
    pub period_ms: u64,
    /// Estimator subsampling stride (every Nth pixel).
    pub sample_stride: usize,
    /// Id of the source to select on startup.
    pub source: String,
    /// Frame width for the built-in synthetic sources.
    pub width: u32,
    /// Frame height for the built-in synthetic sources.
    pub height: u32,
}

/// Auto-mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoModeSection {
    /// Retransmission period in milliseconds.
    pub period_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            capture: CaptureSection::default(),
            auto_mode: AutoModeSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            path: "/api/color".into(),
            latency_budget_ms: 2000,
        }
    }
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            period_ms: 100,
            sample_stride: 10,
            source: "gradient".into(),
            width: 640,
            height: 480,
        }
    }
}

impl Default for AutoModeSection {
    fn default() -> Self {
        Self { period_ms: 3000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl AgentConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Capture settings as a core config.
    pub fn to_capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            period: Duration::from_millis(self.capture.period_ms.max(10)),
            sample_stride: self.capture.sample_stride.max(1),
        }
    }

    /// Endpoint settings as a core config.
    pub fn to_transmit_config(&self) -> TransmitConfig {
        TransmitConfig {
            base_url: self.endpoint.base_url.clone(),
            path: self.endpoint.path.clone(),
            latency_budget: Duration::from_millis(self.endpoint.latency_budget_ms),
        }
    }

    /// Auto-mode settings as a core config.
    pub fn to_auto_config(&self) -> AutoModeConfig {
        AutoModeConfig {
            period: Duration::from_millis(self.auto_mode.period_ms.max(100)),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = AgentConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("base_url"));
        assert!(text.contains("period_ms"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = AgentConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AgentConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.endpoint.latency_budget_ms, 2000);
        assert_eq!(parsed.capture.period_ms, 100);
        assert_eq!(parsed.auto_mode.period_ms, 3000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: AgentConfig =
            toml::from_str("[endpoint]\nbase_url = \"http://10.0.0.9\"\n").unwrap();
        assert_eq!(parsed.endpoint.base_url, "http://10.0.0.9");
        assert_eq!(parsed.endpoint.path, "/api/color");
        assert_eq!(parsed.capture.source, "gradient");
    }

    #[test]
    fn conversions_clamp_degenerate_values() {
        let mut cfg = AgentConfig::default();
        cfg.capture.period_ms = 0;
        cfg.capture.sample_stride = 0;
        cfg.auto_mode.period_ms = 0;

        assert_eq!(cfg.to_capture_config().period, Duration::from_millis(10));
        assert_eq!(cfg.to_capture_config().sample_stride, 1);
        assert_eq!(cfg.to_auto_config().period, Duration::from_millis(100));
    }
}
