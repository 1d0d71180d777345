use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Body POSTed to a follower's `/replicate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicateRequest {
    pub key: String,
    pub value: String,
}

/// Acknowledgement a follower returns for an applied replication request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplicateAck {
    pub success: bool,
}

/// Client for a single remote follower.
///
/// The per-attempt timeout is baked into the underlying HTTP client at
/// construction; every call through this type is bounded by it.
#[derive(Debug, Clone)]
pub struct ReplicaClient {
    base_url: String,
    http: reqwest::Client,
}

impl ReplicaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::Result<ReplicaClient> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::Error::InvalidConfig(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(ReplicaClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push one write to this follower.
    ///
    /// `Ok(true)` means the follower took the write: a 2xx status with an
    /// acknowledging body. A non-2xx status is an ordinary `Ok(false)`;
    /// transport errors and timeouts surface as `Err` for the caller to
    /// count as failures.
    pub async fn replicate(&self, key: &str, value: &str) -> reqwest::Result<bool> {
        let response = self
            .http
            .post(format!("{}/replicate", self.base_url))
            .json(&ReplicateRequest {
                key: key.to_string(),
                value: value.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }
        let ack: ReplicateAck = response.json().await?;
        Ok(ack.success)
    }
}
