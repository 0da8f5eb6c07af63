//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, connection limits)
//!     → tls.rs (handshake, optional client certificate)
//!     → connection.rs (lifecycle tracking)
//!     → Hand off to the Gemini layer
//! ```

pub mod connection;
pub mod listener;
pub mod tls;
