//! Route handlers.
//!
//! Each handler performs one linear request cycle against the session's
//! Miniflux client. Errors are returned as [`GatewayError`] and answered by
//! the router.
//!
//! [`GatewayError`]: crate::error::GatewayError

pub mod actions;
pub mod article;
pub mod listing;

pub use actions::{mark_as, refresh};
pub use article::entry;
pub use listing::home;
