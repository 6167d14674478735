//! HTTP client for the principal's flag and data endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ReplicaConfig;
use crate::error::{ReplicationError, Result};
use crate::store::{ChangeCheck, Record};

/// Talks to one principal. Every request is bounded by the configured timeout.
#[derive(Clone)]
pub struct PrincipalClient {
    http: Client,
    users_url: String,
    check_url: String,
}

impl PrincipalClient {
    pub fn new(config: &ReplicaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReplicationError::from_reqwest(&config.principal_url, e))?;

        Ok(Self {
            http,
            users_url: config.users_url(),
            check_url: config.check_url(),
        })
    }

    /// Asks the principal whether anything changed. This consumes the principal's flag.
    pub async fn check_new(&self) -> Result<ChangeCheck> {
        self.get_json(&self.check_url).await
    }

    /// Fetches the full record set.
    pub async fn fetch_users(&self) -> Result<Vec<Record>> {
        self.get_json(&self.users_url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ReplicationError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReplicationError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ReplicationError::from_reqwest(url, e))?;
        debug!(url, bytes = body.len(), "Received principal response");

        serde_json::from_slice(&body).map_err(|e| ReplicationError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
