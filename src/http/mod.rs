//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, JSON body parsing)
//!     → create_account handler (field extraction, one submission)
//!     → ledger::Contract (shared handle, injected at startup)
//!     → fixed plain-text response (200 or flat 500)
//! ```

pub mod server;

pub use server::HttpServer;
