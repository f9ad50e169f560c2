//! Content hashing.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CryptoError;

/// A 32-byte BLAKE3 digest.
///
/// Digests are compared, hashed, and copied freely; construction from
/// arbitrary data goes through [`hash_data`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The all-zero digest (used as a placeholder, never produced by hashing)
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a digest from raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string
    ///
    /// # Errors
    /// Returns an error if the input is not 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidHash("expected 32 bytes".to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Abbreviated form for logs; use to_hex() for the full digest.
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Hash arbitrary bytes with BLAKE3
#[must_use]
pub fn hash_data(data: &[u8]) -> Hash {
    Hash(*blake3::hash(data).as_bytes())
}
