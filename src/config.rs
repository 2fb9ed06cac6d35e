use std::env;
use std::time::Duration;

use crate::error::{Result, VgenError};
use crate::models::ModelKind;

/// Connection settings for the generation service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub fast_endpoint: String,
    pub quality_endpoint: String,
    pub health_endpoint: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8000".to_string(),
            fast_endpoint: "/api/v1/generate/fast".to_string(),
            quality_endpoint: "/api/v1/generate/quality".to_string(),
            health_endpoint: "/health".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var("VGEN_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(endpoint) = env::var("VGEN_FAST_ENDPOINT") {
            config.fast_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("VGEN_QUALITY_ENDPOINT") {
            config.quality_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("VGEN_HEALTH_ENDPOINT") {
            config.health_endpoint = endpoint;
        }
        if let Some(secs) = env::var("VGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_endpoint(mut self, kind: ModelKind, endpoint: impl Into<String>) -> Self {
        match kind {
            ModelKind::Fast => self.fast_endpoint = endpoint.into(),
            ModelKind::Quality => self.quality_endpoint = endpoint.into(),
        }
        self
    }

    pub fn with_health_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.health_endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the endpoint path for a model kind. An empty endpoint means
    /// the deployment does not serve that profile.
    pub fn endpoint_for(&self, kind: ModelKind) -> Result<&str> {
        let endpoint = match kind {
            ModelKind::Fast => &self.fast_endpoint,
            ModelKind::Quality => &self.quality_endpoint,
        };
        if endpoint.is_empty() {
            return Err(VgenError::ConfigError(format!(
                "no endpoint configured for model kind \"{}\"",
                kind.as_str()
            )));
        }
        Ok(endpoint)
    }

    pub fn url_for(&self, kind: ModelKind) -> Result<String> {
        Ok(format!("{}{}", self.base_url, self.endpoint_for(kind)?))
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_endpoint)
    }
}

/// Per-controller presentation settings: trigger label and the shape of the
/// simulated progress ramp. The ramp is cosmetic; it carries no information
/// about actual server progress.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub kind: ModelKind,
    pub label: String,
    pub step_percent: u8,
    pub tick_interval: Duration,
    pub ceiling: u8,
}

impl ControllerConfig {
    /// Fast profile: large steps, few nominal ticks.
    pub fn fast() -> Self {
        ControllerConfig {
            kind: ModelKind::Fast,
            label: "Fast Model".to_string(),
            step_percent: 10,
            tick_interval: Duration::from_millis(400),
            ceiling: 90,
        }
    }

    /// Quality profile: small steps, many nominal ticks.
    pub fn quality() -> Self {
        ControllerConfig {
            kind: ModelKind::Quality,
            label: "Quality Model".to_string(),
            step_percent: 3,
            tick_interval: Duration::from_millis(500),
            ceiling: 90,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_ramp(mut self, step_percent: u8, tick_interval: Duration) -> Self {
        self.step_percent = step_percent;
        self.tick_interval = tick_interval;
        self
    }

    /// The simulator must never reach 100 on its own; completion is signaled
    /// by the controller once the response actually arrives.
    pub fn clamped_ceiling(&self) -> u8 {
        self.ceiling.min(99)
    }
}
