//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (path, params, session)
//!     → router.rs (route lookup)
//!     → handlers (one per route)
//!     → Response, or GatewayError answered as a status line
//! ```

pub mod router;

pub use router::{gateway_pipeline, route_label, Route, Router};
