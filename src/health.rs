//! Liveness probe for the processing service (`GET /health`).

use crate::config::ClientConfig;
use crate::error::ReaderError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body of a successful health response, e.g. `{"status":"ok"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Ask the service whether it is up.
///
/// A non-success status is reported as [`ReaderError::RequestFailed`], an
/// unreachable host or unparsable body as [`ReaderError::Transport`].
pub async fn health_check(config: &ClientConfig) -> Result<HealthStatus, ReaderError> {
    let url = config.health_url();
    debug!("Probing {}", url);

    let response = config.http_client()?.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ReaderError::RequestFailed {
            status: status.as_u16(),
        });
    }
    Ok(response.json::<HealthStatus>().await?)
}
