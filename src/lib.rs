//! gemflux: a Gemini front end for Miniflux.
//!
//! Clients authenticate with a TLS client certificate whose fingerprint is
//! enrolled against a Miniflux account; every request is then translated
//! into Miniflux API calls and answered with gemtext.

pub mod articles;
pub mod config;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod lifecycle;
pub mod miniflux;
pub mod net;
pub mod observability;
pub mod render;
pub mod routing;
pub mod store;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use gemini::GeminiServer;
pub use lifecycle::Shutdown;
