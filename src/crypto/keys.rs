//! Owner key management
//!
//! Provides key pair generation and hex import/export over the
//! engine's own secp256k1 arithmetic. The public key is the curve
//! point `sk * G` for a secret scalar `sk` in `[1, N)`.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use super::curve::{self, CurveError, CurvePoint};

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Curve error: {0}")]
    CurveError(#[from] CurveError),
}

/// A key pair consisting of a secret scalar and its public curve point
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret_key: BigUint,
    public_key: CurvePoint,
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Samples 32 bytes from the OS RNG and rejects values outside
    /// `[1, N)`.
    pub fn generate() -> Self {
        let n = curve::group_order();
        loop {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            let candidate = BigUint::from_bytes_be(&bytes);
            if !candidate.is_zero() && candidate < n {
                return Self::from_secret_key(candidate);
            }
        }
    }

    /// Create a key pair from an existing secret scalar
    ///
    /// The scalar is reduced modulo the group order.
    pub fn from_secret_key(secret_key: BigUint) -> Self {
        let secret_key = secret_key % curve::group_order();
        let public_key = curve::scalar_multiply(&secret_key, &curve::generator());
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded secret key
    pub fn from_secret_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let secret = BigUint::parse_bytes(hex_key.as_bytes(), 16)
            .ok_or(KeyError::InvalidPrivateKey)?;
        if secret.is_zero() {
            return Err(KeyError::InvalidPrivateKey);
        }
        Ok(Self::from_secret_key(secret))
    }

    /// The secret scalar
    pub fn secret_key(&self) -> &BigUint {
        &self.secret_key
    }

    /// The public curve point
    pub fn public_key(&self) -> &CurvePoint {
        &self.public_key
    }

    /// Get the secret key as a hex string
    pub fn secret_key_hex(&self) -> String {
        format!("{:064x}", self.secret_key)
    }

    /// Get the public key as hex-encoded `(x, y)` coordinates
    pub fn public_key_hex(&self) -> (String, String) {
        self.public_key.to_hex()
    }
}

/// Parse and validate a public key from hex coordinates
pub fn public_key_from_hex(x_hex: &str, y_hex: &str) -> Result<CurvePoint, KeyError> {
    CurvePoint::from_hex(x_hex, y_hex).map_err(|_| KeyError::InvalidPublicKey)
}
