//! Fabric REST Gateway (v1)
//!
//! A REST façade over a permissioned-ledger gateway connection, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                REST GATEWAY                  │
//!                      │                                              │
//!   POST /createAccount│  ┌─────────┐     ┌──────────────────────┐   │
//!   ───────────────────┼─▶│  http   │────▶│  ledger::Contract     │   │
//!                      │  │ server  │     │  (session handle,     │   │
//!                      │  └─────────┘     │   created at boot)    │   │
//!                      │                  └──────────┬────────────┘   │
//!                      │                             │                │
//!   200 / flat 500     │                             ▼                │
//!   ◀──────────────────┼──────────────  gRPC submit to gateway peer   │
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns        │  │
//!                      │  │   ┌────────┐ ┌────────┐ ┌──────────┐  │  │
//!                      │  │   │ config │ │ wallet │ │observa-  │  │  │
//!                      │  │   │        │ │profile │ │ bility   │  │  │
//!                      │  │   └────────┘ └────────┘ └──────────┘  │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! # Boot order
//!
//! Wallet, profile and gateway session initialize before the listener binds.
//! Any initialization failure terminates the process; a partially-initialized
//! gateway never serves traffic.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use fabric_rest_gateway::config::loader::load_config;
use fabric_rest_gateway::config::GatewayConfig;
use fabric_rest_gateway::observability::{logging, metrics};
use fabric_rest_gateway::{ledger, HttpServer};

#[derive(Parser)]
#[command(name = "fabric-rest-gateway")]
#[command(about = "REST façade over a Fabric gateway connection", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when the file
    /// does not exist.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config first; the logger's level comes from it.
    let config = if cli.config.exists() {
        match load_config(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config '{}': {}", cli.config.display(), e);
                std::process::exit(1);
            }
        }
    } else {
        GatewayConfig::default()
    };

    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "fabric-rest-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        connection_profile = %config.fabric.connection_profile.display(),
        wallet_path = %config.fabric.wallet_path.display(),
        identity = %config.fabric.identity,
        channel = %config.fabric.channel,
        chaincode = %config.fabric.chaincode,
        "Configuration loaded"
    );

    // Gateway session: wallet → profile → connect → channel → contract.
    // A single failed attempt is fatal; the listener must never bind after
    // a failed initialization.
    let contract = match ledger::initialize(&config.fabric).await {
        Ok(contract) => contract,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to gateway");
            std::process::exit(1);
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener"
            );
            std::process::exit(1);
        }
    };
    match listener.local_addr() {
        Ok(addr) => tracing::info!(address = %addr, "Listening for connections"),
        Err(_) => tracing::info!("Listening for connections"),
    }

    let server = HttpServer::new(&config, contract);
    if let Err(e) = server.run(listener).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
