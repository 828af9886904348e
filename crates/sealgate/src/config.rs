//! threshold parameters for the seal

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// largest share count: x-coordinates are the non-zero elements of GF(256)
pub const MAX_SHARES: u8 = 255;

/// threshold scheme parameters, fixed at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSealConfig", into = "RawSealConfig")]
pub struct SealConfig {
    threshold: u8,
    total_shares: u8,
}

impl SealConfig {
    /// validate and build a config requiring `threshold` of `total_shares`
    pub fn new(threshold: usize, total_shares: usize) -> Result<Self> {
        if threshold < 1 {
            return Err(Error::InvalidConfig("threshold must be at least 1".into()));
        }
        if threshold > total_shares {
            return Err(Error::InvalidConfig(format!(
                "threshold {} exceeds total shares {}",
                threshold, total_shares
            )));
        }
        if total_shares > MAX_SHARES as usize {
            return Err(Error::InvalidConfig(format!(
                "at most {} shares supported, got {}",
                MAX_SHARES, total_shares
            )));
        }

        Ok(Self {
            threshold: threshold as u8,
            total_shares: total_shares as u8,
        })
    }

    /// shares required to unseal (T)
    pub fn threshold(&self) -> usize {
        self.threshold as usize
    }

    /// shares produced at initialization (N)
    pub fn total_shares(&self) -> usize {
        self.total_shares as usize
    }
}

/// wire shape, checked on the way in
#[derive(Serialize, Deserialize)]
struct RawSealConfig {
    secret_threshold: usize,
    secret_shares: usize,
}

impl TryFrom<RawSealConfig> for SealConfig {
    type Error = Error;

    fn try_from(raw: RawSealConfig) -> Result<Self> {
        Self::new(raw.secret_threshold, raw.secret_shares)
    }
}

impl From<SealConfig> for RawSealConfig {
    fn from(config: SealConfig) -> Self {
        Self {
            secret_threshold: config.threshold(),
            secret_shares: config.total_shares(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_configs() {
        let config = SealConfig::new(3, 5).unwrap();
        assert_eq!(config.threshold(), 3);
        assert_eq!(config.total_shares(), 5);

        assert!(SealConfig::new(1, 1).is_ok());
        assert!(SealConfig::new(1, 5).is_ok());
        assert!(SealConfig::new(255, 255).is_ok());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(SealConfig::new(0, 3), Err(Error::InvalidConfig(_))));
        assert!(matches!(SealConfig::new(4, 3), Err(Error::InvalidConfig(_))));
        assert!(matches!(SealConfig::new(2, 256), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_serde_shape() {
        let config = SealConfig::new(2, 3).unwrap();
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["secret_threshold"], 2);
        assert_eq!(json["secret_shares"], 3);

        let parsed: SealConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);

        let bad = serde_json::json!({ "secret_threshold": 5, "secret_shares": 3 });
        assert!(serde_json::from_value::<SealConfig>(bad).is_err());
    }
}
