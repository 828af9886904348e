//! share types and structural validation
//!
//! a share is the evaluation of the framed master secret polynomial at one
//! point, laid out as `y-values || x`. the trailing byte is the non-zero
//! x-coordinate, the leading bytes are one y-value per payload byte.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::secret::{CHECKSUM_LEN, MASTER_SECRET_LEN};
use crate::{Error, Result};

/// length of the framed payload (secret plus checksum)
pub const PAYLOAD_LEN: usize = MASTER_SECRET_LEN + CHECKSUM_LEN;

/// encoded length of one share
pub const SHARE_LEN: usize = PAYLOAD_LEN + 1;

/// one fragment of the master secret
///
/// shares compare by exact byte equality and are wiped when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    bytes: Vec<u8>,
}

impl Share {
    /// validate raw bytes as a share
    ///
    /// only structure is checked here. whether the share belongs to the
    /// current seal is only known once a full threshold set is combined.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SHARE_LEN {
            return Err(Error::InvalidShareEncoding(format!(
                "expected {} bytes, got {}",
                SHARE_LEN,
                bytes.len()
            )));
        }
        if bytes[SHARE_LEN - 1] == 0 {
            return Err(Error::InvalidShareEncoding("zero x-coordinate".into()));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// decode from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidShareEncoding(format!("invalid hex: {}", e)))?;
        let share = Self::from_bytes(&bytes);
        bytes.zeroize();
        share
    }

    /// encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// build from parts produced by the splitter, skipping validation
    pub(crate) fn from_parts(y_values: Vec<u8>, x: u8) -> Self {
        let mut bytes = y_values;
        bytes.push(x);
        Self { bytes }
    }

    /// evaluation point
    pub fn x(&self) -> u8 {
        self.bytes[self.bytes.len() - 1]
    }

    /// evaluations, one per payload byte
    pub fn y_values(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.bytes.capacity()
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x())
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_share(x: u8) -> Vec<u8> {
        let mut bytes = vec![7u8; PAYLOAD_LEN];
        bytes.push(x);
        bytes
    }

    #[test]
    fn test_accepts_well_formed() {
        let share = Share::from_bytes(&raw_share(3)).unwrap();
        assert_eq!(share.x(), 3);
        assert_eq!(share.y_values().len(), PAYLOAD_LEN);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            Share::from_bytes(&[1, 2, 3]),
            Err(Error::InvalidShareEncoding(_))
        ));
        let mut long = raw_share(1);
        long.push(9);
        assert!(Share::from_bytes(&long).is_err());
        assert!(Share::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_rejects_zero_coordinate() {
        assert!(matches!(
            Share::from_bytes(&raw_share(0)),
            Err(Error::InvalidShareEncoding(_))
        ));
    }

    #[test]
    fn test_hex() {
        let share = Share::from_bytes(&raw_share(9)).unwrap();
        let parsed = Share::from_hex(&share.to_hex()).unwrap();
        assert_eq!(share, parsed);

        assert!(matches!(
            Share::from_hex("not hex"),
            Err(Error::InvalidShareEncoding(_))
        ));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let share = Share::from_bytes(&raw_share(5)).unwrap();
        let printed = format!("{:?}", share);
        assert!(printed.contains("x: 5"));
        assert!(!printed.contains("7, 7"));
    }
}
