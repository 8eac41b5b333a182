// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos fail at startup
//! instead of silently falling back to defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskerConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener and API key.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Completion commit and score mirror tuning.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Prometheus metrics settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl TaskerConfig {
    /// A copy safe to print: the API key is replaced with a marker.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.server.api_key.is_some() {
            copy.server.api_key = Some("[redacted]".to_string());
        }
        copy
    }
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "tasker".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (0 picks an ephemeral port).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Static API key expected in the `x-api-key` header.
    /// `None` rejects every authenticated request.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tasker").join("tasker.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tasker.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Completion pipeline tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// How many times a completion re-reads and re-scores after losing a
    /// compare-and-swap race on the user record.
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,

    /// Background retries for a failed leaderboard score mirror.
    #[serde(default = "default_mirror_retry_attempts")]
    pub mirror_retry_attempts: u32,

    /// Linear backoff step between mirror retries, in milliseconds.
    #[serde(default = "default_mirror_retry_backoff_ms")]
    pub mirror_retry_backoff_ms: u64,

    /// Capacity of the pending mirror retry queue.
    #[serde(default = "default_mirror_queue_capacity")]
    pub mirror_queue_capacity: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: default_max_commit_attempts(),
            mirror_retry_attempts: default_mirror_retry_attempts(),
            mirror_retry_backoff_ms: default_mirror_retry_backoff_ms(),
            mirror_queue_capacity: default_mirror_queue_capacity(),
        }
    }
}

fn default_max_commit_attempts() -> u32 {
    5
}

fn default_mirror_retry_attempts() -> u32 {
    3
}

fn default_mirror_retry_backoff_ms() -> u64 {
    500
}

fn default_mirror_queue_capacity() -> usize {
    256
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `GET /metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

fn default_metrics_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = TaskerConfig::default();
        assert_eq!(config.service.name, "tasker");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.api_key.is_none());
        assert_eq!(config.scoring.max_commit_attempts, 5);
        assert!(config.storage.database_path.ends_with("tasker.db"));
        assert!(config.metrics.enabled);
    }

    #[test]
    fn server_debug_redacts_api_key() {
        let server = ServerConfig {
            api_key: Some("super-secret".to_string()),
            ..ServerConfig::default()
        };
        let debug = format!("{server:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn redacted_copy_hides_api_key() {
        let mut config = TaskerConfig::default();
        config.server.api_key = Some("super-secret".to_string());
        let toml = toml::to_string(&config.redacted()).unwrap();
        assert!(!toml.contains("super-secret"));
    }
}
