//! Aggregate Schnorr signatures over the owner coalition
//!
//! Key aggregation under the naive and MuSig schemes, the n-of-n
//! signing rounds with nonce commit-reveal, and signature
//! verification.
//!
//! # Example
//!
//! ```ignore
//! use schnorr_multisig::crypto::KeyPair;
//! use schnorr_multisig::schnorr::{aggregate_keys, cohort_sign, verify, AggregationScheme};
//!
//! let owners: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let public_keys: Vec<_> = owners.iter().map(|kp| kp.public_key().clone()).collect();
//!
//! let x = aggregate_keys(AggregationScheme::MuSig, &public_keys);
//! let signature = cohort_sign(AggregationScheme::MuSig, &owners, b"message")?;
//! assert!(verify(&signature, &x, b"message"));
//! ```

pub mod keyagg;
pub mod signing;

pub use keyagg::{aggregate_keys, musig_coefficients, AggregationScheme};
pub use signing::{
    aggregate_nonces, aggregate_responses, challenge, cohort_sign, verify, EphemeralNonce,
    SchnorrError, Signature,
};
