//! Certificate fingerprints.

use sha2::{Digest, Sha256};

/// Number of hex characters in a SHA-256 fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a DER-encoded certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint the raw encoded bytes of a certificate.
    pub fn of_certificate(der: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(der)))
    }

    /// Parse an administrator-supplied fingerprint.
    ///
    /// Accepts upper or lower case and `:` separators (as printed by
    /// `openssl x509 -fingerprint -sha256`).
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != ':')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if normalized.len() == FINGERPRINT_HEX_LEN && normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
