//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Connection tasks and handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → tracing.rs (per-request spans carrying the request id)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
