//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (submission counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event; no bare format strings for state
//! - Metrics are cheap (atomic increments) and disabled by default
//! - Request bodies and key material never appear in logs

pub mod logging;
pub mod metrics;
