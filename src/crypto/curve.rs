//! Affine arithmetic over the secp256k1 curve
//!
//! Implements the short-Weierstrass curve `y^2 = x^3 + 7` used by the
//! wallet engine: point addition (including doubling), double-and-add
//! scalar multiplication, and on-curve validation. Field arithmetic is
//! modulo the curve prime `p`; scalar arithmetic is modulo the group
//! order `N`.
//!
//! `add` and `scalar_multiply` assume their operands are valid curve
//! points. Callers holding untrusted points must run
//! [`CurvePoint::validate`] before doing arithmetic with them.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when checking untrusted curve points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("point is not on the curve")]
    InvalidPoint,
    #[error("invalid point encoding")]
    InvalidEncoding,
}

/// secp256k1 field prime `p`
pub fn field_prime() -> BigUint {
    BigUint::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        16,
    )
    .expect("valid curve constant")
}

/// secp256k1 group order `N`
pub fn group_order() -> BigUint {
    BigUint::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        16,
    )
    .expect("valid curve constant")
}

/// The secp256k1 base point `G`
pub fn generator() -> CurvePoint {
    CurvePoint {
        x: BigUint::parse_bytes(
            b"79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
            16,
        )
        .expect("valid curve constant"),
        y: BigUint::parse_bytes(
            b"483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
            16,
        )
        .expect("valid curve constant"),
    }
}

/// A point on the curve, or the identity element
///
/// Coordinates are canonical in `[0, p)`. The identity is the sentinel
/// `(0, 0)`, which never satisfies the curve equation, so the encoding
/// is unambiguous. Every non-identity value produced by this module
/// satisfies `y^2 = x^3 + 7 (mod p)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl CurvePoint {
    /// The identity (point at infinity) sentinel
    pub fn identity() -> Self {
        Self {
            x: BigUint::zero(),
            y: BigUint::zero(),
        }
    }

    /// Check whether this point is the identity sentinel
    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Check whether a non-identity point satisfies the curve equation
    pub fn is_on_curve(&self) -> bool {
        if self.is_identity() {
            return false;
        }
        let p = field_prime();
        if self.x >= p || self.y >= p {
            return false;
        }
        let y_sq = (&self.y * &self.y) % &p;
        let x_cubed = ((&self.x * &self.x) % &p) * &self.x % &p;
        y_sq == (x_cubed + 7u32) % p
    }

    /// Validate an untrusted point at a trust boundary
    ///
    /// Rejects the identity and anything off-curve.
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.is_on_curve() {
            Ok(())
        } else {
            Err(CurveError::InvalidPoint)
        }
    }

    /// The additive inverse `(x, -y)`
    pub fn negate(&self) -> CurvePoint {
        if self.is_identity() {
            return CurvePoint::identity();
        }
        let p = field_prime();
        CurvePoint {
            x: self.x.clone(),
            y: (&p - &self.y) % p,
        }
    }

    /// Both coordinates as fixed-width big-endian bytes (32 + 32)
    pub fn coordinate_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        let x = self.x.to_bytes_be();
        let y = self.y.to_bytes_be();
        out[32 - x.len()..32].copy_from_slice(&x);
        out[64 - y.len()..].copy_from_slice(&y);
        out
    }

    /// Parse a point from hex-encoded coordinates and validate it
    pub fn from_hex(x_hex: &str, y_hex: &str) -> Result<CurvePoint, CurveError> {
        let x = BigUint::parse_bytes(x_hex.as_bytes(), 16).ok_or(CurveError::InvalidEncoding)?;
        let y = BigUint::parse_bytes(y_hex.as_bytes(), 16).ok_or(CurveError::InvalidEncoding)?;
        let point = CurvePoint { x, y };
        point.validate()?;
        Ok(point)
    }

    /// Hex-encoded `(x, y)` coordinates
    pub fn to_hex(&self) -> (String, String) {
        let bytes = self.coordinate_bytes();
        (hex::encode(&bytes[..32]), hex::encode(&bytes[32..]))
    }
}

/// Modular inverse via Fermat's little theorem (`m` is prime)
fn mod_inverse(a: &BigUint, m: &BigUint) -> BigUint {
    a.modpow(&(m - 2u32), m)
}

/// Affine point addition, covering identity, doubling, and inverse cases
///
/// Operands must be valid curve points or the identity; this is not
/// re-checked here.
pub fn add(p1: &CurvePoint, p2: &CurvePoint) -> CurvePoint {
    if p1.is_identity() {
        return p2.clone();
    }
    if p2.is_identity() {
        return p1.clone();
    }

    let p = field_prime();
    let lambda = if p1.x == p2.x {
        if p1.y == p2.y && !p1.y.is_zero() {
            // Tangent slope: 3x^2 / 2y
            let numer = ((&p1.x * &p1.x) % &p) * 3u32 % &p;
            let denom = (&p1.y * 2u32) % &p;
            numer * mod_inverse(&denom, &p) % &p
        } else {
            // P + (-P), or doubling a point with y = 0
            return CurvePoint::identity();
        }
    } else {
        // Chord slope: (y2 - y1) / (x2 - x1)
        let numer = (&p2.y + &p - &p1.y) % &p;
        let denom = (&p2.x + &p - &p1.x) % &p;
        numer * mod_inverse(&denom, &p) % &p
    };

    let x3 = ((&lambda * &lambda) % &p + &p + &p - &p1.x - &p2.x) % &p;
    let y3 = (&lambda * ((&p1.x + &p - &x3) % &p) % &p + &p - &p1.y) % &p;
    CurvePoint { x: x3, y: y3 }
}

/// Double-and-add scalar multiplication of `k mod N` against `point`
///
/// `scalar_multiply(0, P)` yields the identity.
pub fn scalar_multiply(k: &BigUint, point: &CurvePoint) -> CurvePoint {
    let k = k % group_order();
    let mut result = CurvePoint::identity();
    if k.is_zero() || point.is_identity() {
        return result;
    }

    let mut addend = point.clone();
    for byte in k.to_bytes_le() {
        for bit in 0..8 {
            if (byte >> bit) & 1 == 1 {
                result = add(&result, &addend);
            }
            addend = add(&addend, &addend);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_generator_is_on_curve() {
        assert!(generator().is_on_curve());
        assert!(generator().validate().is_ok());
    }

    #[test]
    fn test_identity_is_not_a_curve_solution() {
        let identity = CurvePoint::identity();
        assert!(identity.is_identity());
        assert!(!identity.is_on_curve());
        assert_eq!(identity.validate(), Err(CurveError::InvalidPoint));
    }

    #[test]
    fn test_add_identity() {
        let g = generator();
        let identity = CurvePoint::identity();
        assert_eq!(add(&g, &identity), g);
        assert_eq!(add(&identity, &g), g);
        assert_eq!(add(&identity, &identity), identity);
    }

    #[test]
    fn test_add_inverse_yields_identity() {
        let g = generator();
        assert_eq!(add(&g, &g.negate()), CurvePoint::identity());
    }

    #[test]
    fn test_doubling_matches_scalar_multiply() {
        let g = generator();
        let doubled = add(&g, &g);
        assert!(doubled.is_on_curve());
        assert_eq!(doubled, scalar_multiply(&BigUint::from(2u32), &g));
    }

    #[test]
    fn test_scalar_multiply_small_cases() {
        let g = generator();
        assert_eq!(
            scalar_multiply(&BigUint::zero(), &g),
            CurvePoint::identity()
        );
        assert_eq!(scalar_multiply(&BigUint::one(), &g), g);

        // 2G + 3G == 5G
        let two_g = scalar_multiply(&BigUint::from(2u32), &g);
        let three_g = scalar_multiply(&BigUint::from(3u32), &g);
        let five_g = scalar_multiply(&BigUint::from(5u32), &g);
        assert_eq!(add(&two_g, &three_g), five_g);
    }

    #[test]
    fn test_scalar_multiply_reduces_mod_group_order() {
        let g = generator();
        let n = group_order();

        assert_eq!(scalar_multiply(&n, &g), CurvePoint::identity());
        assert_eq!(
            scalar_multiply(&(&n + 5u32), &g),
            scalar_multiply(&BigUint::from(5u32), &g)
        );
        // (N - 1)G == -G
        assert_eq!(scalar_multiply(&(&n - 1u32), &g), g.negate());
    }

    #[test]
    fn test_validate_rejects_off_curve_point() {
        let bogus = CurvePoint {
            x: BigUint::one(),
            y: BigUint::one(),
        };
        assert_eq!(bogus.validate(), Err(CurveError::InvalidPoint));
    }

    #[test]
    fn test_coordinate_bytes_fixed_width() {
        let g = generator();
        let bytes = g.coordinate_bytes();
        assert_eq!(BigUint::from_bytes_be(&bytes[..32]), g.x);
        assert_eq!(BigUint::from_bytes_be(&bytes[32..]), g.y);
    }

    #[test]
    fn test_hex_round_trip() {
        let g = generator();
        let (x_hex, y_hex) = g.to_hex();
        let parsed = CurvePoint::from_hex(&x_hex, &y_hex).unwrap();
        assert_eq!(parsed, g);

        assert!(CurvePoint::from_hex("01", "01").is_err());
        assert!(CurvePoint::from_hex("zz", "01").is_err());
    }
}
