//! Fabric REST Gateway Library
//!
//! A thin REST façade over a permissioned-ledger network: one gateway
//! session opened at boot, one contract handle, one HTTP route that forwards
//! request fields into a transaction submission.

pub mod config;
pub mod http;
pub mod ledger;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use ledger::{Contract, Gateway, TransactionSubmitter};
