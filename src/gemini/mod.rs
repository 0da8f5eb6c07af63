//! Gemini protocol layer.
//!
//! # Data Flow
//! ```text
//! TLS stream
//!     → request.rs (request line)
//!     → middleware/ (identity → session → router)
//!     → response.rs (header line + body)
//! ```
//!
//! server.rs owns the accept loop and per-connection deadlines.

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, RequestError};
pub use response::{Response, Status};
pub use server::GeminiServer;
