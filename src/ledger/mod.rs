//! Ledger client subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (once):
//!     wallet.rs   (open identity store, resolve identity label)
//!     profile.rs  (parse connection profile, pick client peer)
//!     gateway.rs  (connect session, resolve channel + contract)
//!         → transport.rs (dial peer, hold gRPC channel)
//!
//! Per request:
//!     Contract::submit_transaction
//!         → TransactionSubmitter seam
//!         → transport.rs (sign proposal, one unary Submit)
//! ```
//!
//! # Design Decisions
//! - Session objects are created once and shared via Arc, never mutated
//! - Failure during startup is fatal; there is no partial-service mode
//! - The submitter trait is the only surface tests need to mock

pub mod gateway;
pub mod profile;
pub mod transport;
pub mod types;
pub mod wallet;

pub use gateway::{initialize, ConnectOptions, Contract, Gateway, Network, TransactionSubmitter};
pub use profile::ConnectionProfile;
pub use types::{LedgerError, LedgerResult};
pub use wallet::Wallet;
