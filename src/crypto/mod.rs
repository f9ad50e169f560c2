//! Cryptographic primitives for the execution core.
//!
//! The core consumes hashing as an opaque boundary primitive: BLAKE3
//! digests of contract source bytes become contract identifiers. Key
//! material, signatures, and commitment schemes belong to the host layers
//! that sequence and authenticate calls.

mod hash;

pub use hash::{hash_data, Hash};

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid hash format
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

/// Result type for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;
