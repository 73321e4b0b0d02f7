//! Cache key derivation.
//!
//! Keys are the SHA-256 digest of the URL text exactly as received. They
//! depend only on the input string, so they are stable across processes.
//! Two URLs that serve identical bytes still get distinct keys.

use std::fmt;

use sha2::{Digest, Sha256};

/// Length of a cache key in bytes.
pub const CACHE_KEY_LEN: usize = 32;

/// Fixed-size identifier for a cached conversion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; CACHE_KEY_LEN]);

impl CacheKey {
    /// Derive the key for a source URL.
    ///
    /// Any string maps to a key, including the empty string. URL validation
    /// happens later, in the transcoder.
    pub fn derive(url: &str) -> Self {
        let digest = Sha256::digest(url.as_bytes());
        let mut bytes = [0u8; CACHE_KEY_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Lowercase hex rendering, as reported by cache statistics.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.to_hex())
    }
}

impl serde::Serialize for CacheKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Derive the cache key for `url`.
#[inline]
pub fn derive_key(url: &str) -> CacheKey {
    CacheKey::derive(url)
}
