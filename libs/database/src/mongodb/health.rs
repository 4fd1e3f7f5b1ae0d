use mongodb::Client;
use std::time::Instant;

use super::connector::ping;

/// Result of a MongoDB health probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the server and report latency and any error.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

impl HealthStatus {
    /// `Err` with the driver message when unhealthy
    pub fn into_result(self) -> Result<(), String> {
        if self.healthy {
            Ok(())
        } else {
            Err(self.message.unwrap_or_else(|| "MongoDB did not answer".to_string()))
        }
    }
}
