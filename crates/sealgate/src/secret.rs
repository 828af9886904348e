//! the protected master secret
//!
//! lives only in memory, is never serialized, and is zeroized when dropped.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// master secret length in bytes
pub const MASTER_SECRET_LEN: usize = 32;

/// truncated digest appended to the secret before splitting
pub const CHECKSUM_LEN: usize = 16;

const CHECKSUM_DOMAIN: &[u8] = b"sealgate:master_checksum:v1";

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret([u8; MASTER_SECRET_LEN]);

impl MasterSecret {
    /// draw a fresh secret from the thread rng
    pub fn generate() -> Self {
        let mut bytes = [0u8; MASTER_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MASTER_SECRET_LEN] {
        &self.0
    }

    /// checksum bound into every share set split from this secret
    pub(crate) fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        checksum(&self.0)
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

impl PartialEq for MasterSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for MasterSecret {}

pub(crate) fn checksum(secret: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(CHECKSUM_DOMAIN);
    hasher.update(secret);
    let digest = hasher.finalize();

    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// constant-time check of a reconstructed `secret || checksum` payload
pub(crate) fn verify_checksum(secret: &[u8], expected: &[u8]) -> bool {
    checksum(secret)[..].ct_eq(expected).into()
}
