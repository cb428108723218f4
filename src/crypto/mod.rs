//! Cryptographic primitives for the wallet engine
//!
//! Curve arithmetic over secp256k1, SHA-256 hashing helpers, and
//! owner key management.

pub mod curve;
pub mod hash;
pub mod keys;

pub use curve::{add, generator, group_order, scalar_multiply, CurveError, CurvePoint};
pub use hash::{sha256, sha256_concat, sha256_hex};
pub use keys::{public_key_from_hex, KeyError, KeyPair};
