//! The multisig wallet: canonical action messages plus the
//! verifier/executor state machine
//!
//! # Example
//!
//! ```ignore
//! use schnorr_multisig::schnorr::AggregationScheme;
//! use schnorr_multisig::wallet::{Action, Address, SchnorrWallet};
//!
//! let mut wallet = SchnorrWallet::new(owner_keys, AggregationScheme::MuSig)?;
//! wallet.deposit(1000);
//!
//! // The coalition signs the encoded action off-chain, then anyone
//! // submits the aggregate signature.
//! wallet.pay(1000, recipient, &signature)?;
//! ```

pub mod message;
pub mod wallet;

pub use message::{encode_action, Action, Address, AddressError};
pub use wallet::{CallError, CallTarget, SchnorrWallet, WalletError};
