//! Configuration for the two services.
//!
//! Both structs can be built programmatically, deserialized, or assembled by the
//! binary's command line. Defaults match a local two-process setup:
//!
//! ```text
//! principal  0.0.0.0:8080
//! replica    0.0.0.0:8081  -> polls http://localhost:8080 every 5s
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PRINCIPAL_PORT: u16 = 8080;
pub const DEFAULT_REPLICA_PORT: u16 = 8081;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Settings for the principal service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
}

impl Default for PrincipalConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PRINCIPAL_PORT)),
        }
    }
}

/// Settings for the replication service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,

    /// Base URL of the principal, without a trailing slash.
    pub principal_url: String,

    /// Wait between the end of one poll cycle and the start of the next.
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,

    /// Upper bound on each request to the principal.
    #[serde(with = "duration_millis")]
    pub request_timeout: Duration,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_REPLICA_PORT)),
            principal_url: format!("http://localhost:{DEFAULT_PRINCIPAL_PORT}"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ReplicaConfig {
    /// A config pointing at `principal_url` with short timings, for tests.
    pub fn for_testing(principal_url: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            principal_url: principal_url.into(),
            poll_interval: Duration::from_millis(50),
            request_timeout: Duration::from_millis(500),
        }
    }

    /// Full-collection endpoint used by the long poll.
    pub fn users_url(&self) -> String {
        format!("{}/users", self.principal_url.trim_end_matches('/'))
    }

    /// Dirty-flag endpoint used by the short poll.
    pub fn check_url(&self) -> String {
        format!("{}/users/check-new", self.principal_url.trim_end_matches('/'))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplicaConfig::default();
        assert_eq!(config.bind.port(), 8081);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.check_url(), "http://localhost:8080/users/check-new");
        assert_eq!(PrincipalConfig::default().bind.port(), 8080);
    }

    #[test]
    fn test_urls_tolerate_trailing_slash() {
        let config = ReplicaConfig::for_testing("http://127.0.0.1:9000/");
        assert_eq!(config.users_url(), "http://127.0.0.1:9000/users");
        assert_eq!(config.check_url(), "http://127.0.0.1:9000/users/check-new");
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: ReplicaConfig = serde_json::from_str(
            r#"{
                "bind": "127.0.0.1:7001",
                "principal_url": "http://primary:7000",
                "poll_interval": 250,
                "request_timeout": 1000
            }"#,
        )
        .unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.users_url(), "http://primary:7000/users");
    }
}
