//! FNV-1a hashing for case and distribution fingerprints.
//!
//! Fingerprints let callers recognise an identical computation (same
//! head-counts, same doctrine, same result) without comparing whole tables.
//! Fields are fed little-endian into a streaming [`Fingerprint`], so no
//! intermediate buffer is built.

use crate::quota::Quota;

const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash of `data`.
pub fn fnv1a(data: &[u8]) -> u64 {
    Fingerprint::new().bytes(data).finish()
}

/// Streaming FNV-1a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// State seeded with the FNV offset basis.
    pub fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    /// Fold `data` in byte by byte.
    #[inline(always)]
    pub fn bytes(mut self, data: &[u8]) -> Self {
        for &b in data {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(PRIME);
        }
        self
    }

    pub fn byte(self, b: u8) -> Self {
        self.bytes(&[b])
    }

    /// A head-count, little-endian.
    pub fn count(self, n: u32) -> Self {
        self.bytes(&n.to_le_bytes())
    }

    /// Numerator then denominator of the reduced fraction.
    pub fn quota(self, q: Quota) -> Self {
        self.bytes(&q.numer().to_le_bytes())
            .bytes(&q.denom().to_le_bytes())
    }

    /// The 64-bit digest.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
