pub mod generate;
pub mod placeholder;

use crate::config::ApiConfig;
use crate::error::{Result, VgenError};
use crate::models::{GenerationRequest, GenerationResult};

/// Client for the generation service. Holds one connection pool shared by
/// every controller instance.
#[derive(Clone)]
pub struct StudioClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl StudioClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VgenError::InternalError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Submits one generation request. Asynchronous, single attempt, no
    /// automatic retry.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        generate::submit_generation(&self.http, &self.config, request).await
    }

    /// Real reachability check: only a 2xx from the health endpoint counts as
    /// up. Any transport error or non-success status is down.
    pub async fn health(&self) -> bool {
        match self.http.get(self.config.health_url()).send().await {
            Ok(response) => {
                let up = response.status().is_success();
                if !up {
                    log::warn!("Health check returned {}", response.status());
                }
                up
            }
            Err(e) => {
                log::warn!("Service is not reachable: {}", e);
                false
            }
        }
    }
}
