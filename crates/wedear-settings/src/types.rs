//! Settings types with compiled defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings object (`~/.wedear/settings.json`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WedearSettings {
    /// Realtime channel settings.
    pub realtime: RealtimeSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl WedearSettings {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.realtime.validate()
    }
}

/// Realtime connection and reconnection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeSettings {
    /// URL scheme. Only `ws` is supported.
    pub scheme: String,
    /// Message server host.
    pub host: String,
    /// Message server port.
    pub port: u16,
    /// Endpoint path.
    pub path: String,
    /// Consecutive automatic reconnection attempts before giving up.
    pub max_reconnect_attempts: u32,
    /// Fixed delay between reconnection attempts in milliseconds.
    pub reconnect_delay_ms: u64,
    /// Handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            scheme: "ws".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            path: "/ws".to_string(),
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 3000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl RealtimeSettings {
    /// Delay between reconnection attempts.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Handshake timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Reject settings that cannot form a connection target.
    ///
    /// Only plain `ws` is accepted: the transport is built without TLS.
    pub fn validate(&self) -> Result<()> {
        if self.scheme != "ws" {
            return Err(invalid(
                "realtime.scheme",
                format!("only ws is supported, got {:?}", self.scheme),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(invalid("realtime.host", "must not be empty".into()));
        }
        if self.port == 0 {
            return Err(invalid("realtime.port", "must be non-zero".into()));
        }
        if !self.path.starts_with('/') {
            return Err(invalid(
                "realtime.path",
                format!("must start with '/', got {:?}", self.path),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: String) -> SettingsError {
    SettingsError::InvalidValue { key, reason }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the compact format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
