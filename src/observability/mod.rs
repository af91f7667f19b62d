//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Store and source produce:
//!     → logging.rs (structured tracing events, one span per fetch)
//!     → metrics.rs (fetch counters, latency, list size, subscribers)
//!
//! Consumers:
//!     → stderr via tracing-subscriber
//!     → whatever `metrics` recorder the host installs (none by default)
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber or recorder itself
//! - Fetch ids flow through every event of a fetch via its span

pub mod logging;
pub mod metrics;
