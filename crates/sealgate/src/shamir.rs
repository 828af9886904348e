//! threshold secret sharing over GF(256)
//!
//! the master secret is framed with a checksum before splitting, so a
//! combine over shares from different splits (or a tampered share) is
//! detected instead of silently yielding garbage.

use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::config::SealConfig;
use crate::error::CombineError;
use crate::secret::{verify_checksum, MasterSecret, MASTER_SECRET_LEN};
use crate::share::{Share, PAYLOAD_LEN, SHARE_LEN};

/// GF(256) multiplication using AES polynomial (x^8 + x^4 + x^3 + x + 1),
/// the same field as the rijndael byte arithmetic
fn gf256_mul(a: u8, b: u8) -> u8 {
    let mut result = 0u8;
    let mut a = a;
    let mut b = b;

    while b != 0 {
        if b & 1 != 0 {
            result ^= a;
        }
        let hi = a & 0x80;
        a <<= 1;
        if hi != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    result
}

/// GF(256) multiplicative inverse, a^254 = a^(-1)
fn gf256_inv(a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let mut result = a;
    for _ in 0..6 {
        result = gf256_mul(result, result);
        result = gf256_mul(result, a);
    }
    gf256_mul(result, result)
}

fn gf256_div(a: u8, b: u8) -> u8 {
    gf256_mul(a, gf256_inv(b))
}

/// evaluate polynomial (constant term first) at x
fn poly_eval(coeffs: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    for &coeff in coeffs.iter().rev() {
        result = gf256_mul(result, x) ^ coeff;
    }
    result
}

/// lagrange basis values L_i(0) for the given x-coordinates
///
/// coordinates must be distinct and non-zero.
fn lagrange_basis_at_zero(xs: &[u8]) -> Vec<u8> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let mut num = 1u8;
            let mut den = 1u8;
            for (j, &xj) in xs.iter().enumerate() {
                if i != j {
                    // (0 - xj) = xj and (xi - xj) = xi ^ xj in GF(256)
                    num = gf256_mul(num, xj);
                    den = gf256_mul(den, xi ^ xj);
                }
            }
            gf256_div(num, den)
        })
        .collect()
}

/// split a master secret into `total_shares` shares, any `threshold` of
/// which reconstruct it. x-coordinates are 1..=N.
pub fn split(secret: &MasterSecret, config: &SealConfig) -> Vec<Share> {
    let threshold = config.threshold();
    let total = config.total_shares();

    let mut payload = Zeroizing::new([0u8; PAYLOAD_LEN]);
    payload[..MASTER_SECRET_LEN].copy_from_slice(secret.as_bytes());
    payload[MASTER_SECRET_LEN..].copy_from_slice(&secret.checksum());

    let mut rng = rand::thread_rng();
    let mut coeffs = Zeroizing::new(vec![0u8; threshold]);
    // room for the trailing x byte, so appending it never reallocates
    let mut ys: Vec<Vec<u8>> = (0..total)
        .map(|_| {
            let mut y = Vec::with_capacity(SHARE_LEN);
            y.resize(PAYLOAD_LEN, 0);
            y
        })
        .collect();

    for (i, &byte) in payload.iter().enumerate() {
        // f(x) = byte + c1*x + ... + c_{t-1}*x^{t-1}
        coeffs[0] = byte;
        rng.fill_bytes(&mut coeffs[1..]);

        for (k, y) in ys.iter_mut().enumerate() {
            y[i] = poly_eval(&coeffs, (k + 1) as u8);
        }
    }

    ys.into_iter()
        .enumerate()
        .map(|(k, y)| Share::from_parts(y, (k + 1) as u8))
        .collect()
}

/// reconstruct the master secret from exactly `threshold` shares
///
/// pure: holds no state between calls and performs no i/o.
pub fn combine(shares: &[Share], config: &SealConfig) -> Result<MasterSecret, CombineError> {
    let need = config.threshold();
    if shares.len() != need {
        return Err(CombineError::WrongShareCount {
            have: shares.len(),
            need,
        });
    }

    let mut seen = [false; 256];
    for share in shares {
        let len = share.as_bytes().len();
        if len != SHARE_LEN {
            return Err(CombineError::LengthMismatch {
                expected: SHARE_LEN,
                got: len,
            });
        }
        let x = share.x();
        if x == 0 {
            return Err(CombineError::ZeroCoordinate);
        }
        if seen[x as usize] {
            return Err(CombineError::DuplicateCoordinate(x));
        }
        seen[x as usize] = true;
    }

    let xs: Vec<u8> = shares.iter().map(Share::x).collect();
    let mut basis = lagrange_basis_at_zero(&xs);

    let mut payload = Zeroizing::new([0u8; PAYLOAD_LEN]);
    for (i, out) in payload.iter_mut().enumerate() {
        *out = shares
            .iter()
            .zip(basis.iter())
            .fold(0u8, |acc, (share, &l)| acc ^ gf256_mul(share.y_values()[i], l));
    }
    basis.zeroize();

    let (secret, sum) = payload.split_at(MASTER_SECRET_LEN);
    if !verify_checksum(secret, sum) {
        return Err(CombineError::ChecksumMismatch);
    }

    let mut bytes = [0u8; MASTER_SECRET_LEN];
    bytes.copy_from_slice(secret);
    let master = MasterSecret::from_bytes(bytes);
    bytes.zeroize();
    Ok(master)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(t: usize, n: usize) -> SealConfig {
        SealConfig::new(t, n).unwrap()
    }

    #[test]
    fn test_gf256_ops() {
        assert_eq!(gf256_mul(0, 0), 0);
        assert_eq!(gf256_mul(1, 1), 1);
        assert_eq!(gf256_mul(2, 2), 4);
        // aes test vector: {57} * {83} = {c1}
        assert_eq!(gf256_mul(0x57, 0x83), 0xc1);

        for a in 1..=255u8 {
            let inv = gf256_inv(a);
            assert_eq!(gf256_mul(a, inv), 1, "inverse failed for {}", a);
        }
    }

    #[test]
    fn test_poly_eval() {
        // f(x) = 5 + 3x over GF(256): f(2) = 5 ^ (3*2) = 5 ^ 6 = 3
        assert_eq!(poly_eval(&[5, 3], 2), 3);
        assert_eq!(poly_eval(&[9], 200), 9);
    }

    #[test]
    fn test_split_shape() {
        let secret = MasterSecret::generate();
        let shares = split(&secret, &config(3, 5));
        assert_eq!(shares.len(), 5);
        for (k, share) in shares.iter().enumerate() {
            assert_eq!(share.x() as usize, k + 1);
            assert_eq!(share.as_bytes().len(), SHARE_LEN);
            assert_eq!(share.capacity(), SHARE_LEN);
        }
    }

    #[test]
    fn test_any_threshold_subset_combines() {
        let secret = MasterSecret::generate();
        let cfg = config(3, 5);
        let shares = split(&secret, &cfg);

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    let recovered = combine(&subset, &cfg).unwrap();
                    assert_eq!(recovered, secret);
                }
            }
        }
    }

    #[test]
    fn test_threshold_one() {
        let secret = MasterSecret::generate();
        let cfg = config(1, 4);
        let shares = split(&secret, &cfg);
        for share in &shares {
            assert_eq!(combine(&[share.clone()], &cfg).unwrap(), secret);
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let secret = MasterSecret::generate();
        let cfg = config(2, 3);
        let shares = split(&secret, &cfg);
        let recovered = combine(&[shares[2].clone(), shares[0].clone()], &cfg).unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn test_wrong_count() {
        let secret = MasterSecret::generate();
        let cfg = config(3, 5);
        let shares = split(&secret, &cfg);

        let result = combine(&shares[..2], &cfg);
        assert_eq!(result, Err(CombineError::WrongShareCount { have: 2, need: 3 }));

        let result = combine(&shares[..4], &cfg);
        assert_eq!(result, Err(CombineError::WrongShareCount { have: 4, need: 3 }));
    }

    #[test]
    fn test_mixed_splits_fail_checksum() {
        let cfg = config(3, 5);
        let first = split(&MasterSecret::generate(), &cfg);
        let second = split(&MasterSecret::generate(), &cfg);

        let mixed = [first[0].clone(), first[1].clone(), second[3].clone()];
        assert_eq!(combine(&mixed, &cfg), Err(CombineError::ChecksumMismatch));
    }

    #[test]
    fn test_tampered_share_fails_checksum() {
        let secret = MasterSecret::generate();
        let cfg = config(2, 3);
        let shares = split(&secret, &cfg);

        let mut bytes = shares[1].as_bytes().to_vec();
        bytes[0] ^= 0x01;
        let tampered = Share::from_bytes(&bytes).unwrap();

        assert_eq!(
            combine(&[shares[0].clone(), tampered], &cfg),
            Err(CombineError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_duplicate_coordinate() {
        let cfg = config(2, 3);
        let first = split(&MasterSecret::generate(), &cfg);
        let second = split(&MasterSecret::generate(), &cfg);

        // same x, different bytes: distinct shares, unusable together
        let result = combine(&[first[0].clone(), second[0].clone()], &cfg);
        assert_eq!(result, Err(CombineError::DuplicateCoordinate(1)));
    }
}
