use std::net::SocketAddr;

use serde::Deserialize;
use eventsocket_core::error::{EventSocketError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(EventSocketError::UnsupportedVersion);
        }
        self.gateway.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route prefix; `{path}` and `{path}/:param` accept upgrades.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Per-connection outbound queue capacity (messages).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    /// Text frames larger than this are dropped before parsing.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            outbound_queue: default_outbound_queue(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') || self.path.len() < 2 || self.path.ends_with('/') {
            return Err(EventSocketError::BadConfig(
                "gateway.path must start with '/', not end with '/', and not be just '/'".into(),
            ));
        }
        if !(50..=120000).contains(&self.ping_interval_ms) {
            return Err(EventSocketError::BadConfig(
                "gateway.ping_interval_ms must be between 50 and 120000".into(),
            ));
        }
        if !(100..=600000).contains(&self.idle_timeout_ms) {
            return Err(EventSocketError::BadConfig(
                "gateway.idle_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(EventSocketError::BadConfig(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(EventSocketError::BadConfig(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        if self.max_message_bytes == 0 {
            return Err(EventSocketError::BadConfig(
                "gateway.max_message_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            EventSocketError::BadConfig(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_path() -> String {
    "/ws".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_outbound_queue() -> usize {
    1024
}
fn default_max_message_bytes() -> usize {
    65536
}
