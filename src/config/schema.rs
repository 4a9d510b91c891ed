//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the REST gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ledger network settings.
    pub fabric: FabricConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Ledger network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FabricConfig {
    /// Path to the connection profile JSON.
    pub connection_profile: PathBuf,

    /// Path to the filesystem wallet directory.
    pub wallet_path: PathBuf,

    /// Wallet label of the identity to act as.
    pub identity: String,

    /// Channel to bind.
    pub channel: String,

    /// Chaincode name to resolve on the channel.
    pub chaincode: String,

    /// Enable service discovery.
    pub discovery: bool,

    /// Rewrite peer hosts to localhost (dockerized test networks).
    pub as_localhost: bool,

    /// Deadline in seconds for dialing and for each submission. The HTTP
    /// layer defines no timeout of its own.
    pub rpc_timeout_secs: u64,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            connection_profile: PathBuf::from("connection-org1.json"),
            wallet_path: PathBuf::from("wallet"),
            identity: "appUser".to_string(),
            channel: "mychannel".to_string(),
            chaincode: "mycontract".to_string(),
            discovery: true,
            as_localhost: true,
            rpc_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
