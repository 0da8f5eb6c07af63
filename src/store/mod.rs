//! Credential storage subsystem.
//!
//! # Data Flow
//! ```text
//! client certificate (DER)
//!     → fingerprint.rs (SHA-256, lowercase hex)
//!     → credentials.rs (single-table SQLite lookup)
//!     → CredentialRecord { instance, token }
//! ```
//!
//! # Design Decisions
//! - The fingerprint is the only lookup key
//! - "Unknown certificate" (`Ok(None)`) is distinct from a storage fault (`Err`)
//! - Schema is created if absent at open; there are no migrations

pub mod credentials;
pub mod fingerprint;

pub use credentials::{CredentialRecord, CredentialStore, StoreError};
pub use fingerprint::Fingerprint;
