// crates/tojson-core/src/core/hashing.rs
// ============================================================================
// Module: Tojson Canonical Hashing
// Description: Content hashes for dispatch payloads and output delimiters.
// Purpose: Provide deterministic hashes for dispatch payloads and output delimiters.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Dispatch payloads are hashed over their RFC 8785 (JCS) canonical form so
//! receipts carry a digest that does not depend on key order or whitespace.
//! Raw bytes are hashed directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Algorithms and Digests
// ============================================================================

/// Digest algorithm recorded next to every payload hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the algorithm label used in receipts and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Algorithm used for payload content hashes.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// Payload content hash carried by receipts and run events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Algorithm that produced `value`.
    pub algorithm: HashAlgorithm,
    /// Digest as lowercase hex.
    pub value: String,
}

impl HashDigest {
    /// Wraps raw digest output.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        let value = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        Self {
            algorithm,
            value,
        }
    }

    /// Returns at most the first `len` hex characters.
    #[must_use]
    pub fn prefix(&self, len: usize) -> &str {
        self.value.get(..len).unwrap_or(self.value.as_str())
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.label(), self.value)
    }
}

/// Payload hashing failures.
#[derive(Debug, Error)]
pub enum HashError {
    /// The value has no canonical JSON form.
    #[error("payload is not canonicalizable: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Serializes `value` as RFC 8785 canonical JSON.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when `value` cannot be serialized.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes the canonical JSON form of `value`, so key order and whitespace
/// never change the digest.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when `value` cannot be serialized.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    canonical_json_bytes(value).map(|bytes| hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    let digest = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(bytes),
    };
    HashDigest::new(algorithm, &digest)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
