//! Schnorr aggregate-signature multisig wallet engine
//!
//! This crate implements a shared account that authorizes payments and
//! arbitrary external calls only when the full fixed coalition of
//! key-holders endorses the action with a single aggregate Schnorr
//! signature. It provides:
//! - Affine secp256k1 arithmetic (point addition, double-and-add
//!   scalar multiplication, on-curve validation)
//! - Public key aggregation under a naive additive scheme and a
//!   MuSig-style coefficient-weighted scheme
//! - The n-of-n off-chain signing rounds, hardened with a nonce
//!   commit-reveal round
//! - Canonical, injective action message encoding with an embedded
//!   replay counter
//! - The verifier/executor wallet: Schnorr verification followed by an
//!   atomically applied (or fully rolled back) state change
//!
//! # Example
//!
//! ```rust
//! use schnorr_multisig::crypto::KeyPair;
//! use schnorr_multisig::schnorr::{cohort_sign, AggregationScheme};
//! use schnorr_multisig::wallet::{encode_action, Action, Address, SchnorrWallet};
//!
//! // Three owners fix their keys before deployment
//! let owners: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let owner_keys: Vec<_> = owners.iter().map(|kp| kp.public_key().clone()).collect();
//!
//! let mut wallet = SchnorrWallet::new(owner_keys, AggregationScheme::MuSig).unwrap();
//! wallet.deposit(1000);
//!
//! // The full coalition signs the action for the current counter
//! let recipient = Address([0x42; 20]);
//! let action = Action::Pay { amount: 1000, recipient };
//! let message = encode_action(&action, wallet.counter());
//! let signature = cohort_sign(AggregationScheme::MuSig, &owners, &message).unwrap();
//!
//! // Anyone may submit the signature; the wallet verifies and executes
//! wallet.pay(1000, recipient, &signature).unwrap();
//! assert_eq!(wallet.balance(), 0);
//! assert_eq!(wallet.counter(), 1);
//! ```

pub mod crypto;
pub mod schnorr;
pub mod wallet;

// Re-export commonly used types
pub use crypto::{CurveError, CurvePoint, KeyError, KeyPair};
pub use schnorr::{AggregationScheme, SchnorrError, Signature};
pub use wallet::{Action, Address, CallError, CallTarget, SchnorrWallet, WalletError};
