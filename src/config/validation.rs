//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Validation is a pure
//! function over the parsed config and reports every error, not just the
//! first. Request bodies are deliberately never validated anywhere in this
//! service; only operator-supplied configuration is.

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("'{}' is not a socket address", config.listener.bind_address),
        });
    }

    for (field, value) in [
        ("fabric.identity", &config.fabric.identity),
        ("fabric.channel", &config.fabric.channel),
        ("fabric.chaincode", &config.fabric.chaincode),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: "must not be empty".to_string(),
            });
        }
    }

    if config.fabric.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "fabric.rpc_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
