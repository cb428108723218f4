//! Schnorr multisig wallet: the on-chain verifier and executor
//!
//! Holds the aggregated owner key fixed at construction, the replay
//! counter, and the native-currency balance. Every `pay` and
//! `external_call` recomputes the challenge over the action and the
//! current counter, checks `s*G == R + c*X`, and only then applies the
//! effect inside a scoped state change that rolls back counter and
//! balance together if the effect fails.
//!
//! Verification always completes before any external interaction, so a
//! reentrant callee can never replay a signature against a stale
//! counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::curve::{CurveError, CurvePoint};
use crate::schnorr::keyagg::{aggregate_keys, AggregationScheme};
use crate::schnorr::signing::{verify, Signature};
use crate::wallet::message::{encode_action, Action, Address};

/// Errors surfaced by wallet operations
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No owner keys provided")]
    NoOwners,
    #[error("Invalid curve point: {0}")]
    InvalidPoint(#[from] CurveError),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: u128, requested: u128 },
    #[error("External call failed: {0}")]
    ExternalCallFailure(#[from] CallError),
}

/// Failure reported by a forwarded-call target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CallError(pub String);

/// An arbitrary callee for `external_call`
///
/// The wallet assumes nothing about the target beyond an address and a
/// willingness to accept call data with an optional attached value.
pub trait CallTarget {
    /// The target address baked into the signed message
    fn address(&self) -> Address;

    /// Handle the forwarded call data and value
    fn call(&mut self, call_data: &[u8], value: u128) -> Result<(), CallError>;
}

/// A Schnorr aggregate-signature multisig wallet
///
/// The aggregated key is computed once from the ordered owner keys and
/// never changes. The replay counter starts at 0 and advances by
/// exactly 1 per successful authorization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchnorrWallet {
    owner_keys: Vec<CurvePoint>,
    scheme: AggregationScheme,
    aggregated_key: CurvePoint,
    counter: u64,
    balance: u128,
    created_at: DateTime<Utc>,
}

/// Scoped counter/balance change, rolled back on drop unless committed
struct StateChange<'a> {
    wallet: &'a mut SchnorrWallet,
    prior_counter: u64,
    prior_balance: u128,
    committed: bool,
}

impl<'a> StateChange<'a> {
    /// Snapshot the wallet state and advance the replay counter
    fn begin(wallet: &'a mut SchnorrWallet) -> Self {
        let prior_counter = wallet.counter;
        let prior_balance = wallet.balance;
        wallet.counter += 1;
        Self {
            wallet,
            prior_counter,
            prior_balance,
            committed: false,
        }
    }

    fn debit(&mut self, amount: u128) -> Result<(), WalletError> {
        if self.wallet.balance < amount {
            return Err(WalletError::InsufficientBalance {
                available: self.wallet.balance,
                requested: amount,
            });
        }
        self.wallet.balance -= amount;
        Ok(())
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StateChange<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.wallet.counter = self.prior_counter;
            self.wallet.balance = self.prior_balance;
        }
    }
}

impl SchnorrWallet {
    /// Create a wallet from the ordered owner keys under the given
    /// aggregation scheme
    ///
    /// Every key is validated on-curve; the aggregated key is fixed
    /// here for the lifetime of the wallet.
    pub fn new(
        owner_keys: Vec<CurvePoint>,
        scheme: AggregationScheme,
    ) -> Result<Self, WalletError> {
        if owner_keys.is_empty() {
            return Err(WalletError::NoOwners);
        }
        for key in &owner_keys {
            key.validate()?;
        }

        let aggregated_key = aggregate_keys(scheme, &owner_keys);
        log::info!(
            "Created {:?} wallet with {} owners",
            scheme,
            owner_keys.len()
        );

        Ok(Self {
            owner_keys,
            scheme,
            aggregated_key,
            counter: 0,
            balance: 0,
            created_at: Utc::now(),
        })
    }

    /// Accept native-currency value; no authorization required
    pub fn deposit(&mut self, amount: u128) {
        self.balance += amount;
        log::debug!("Deposited {}; balance now {}", amount, self.balance);
    }

    /// Verify a signature over the action at the current counter
    fn authorize(&self, action: &Action, signature: &Signature) -> Result<(), WalletError> {
        signature.r.validate()?;
        let message = encode_action(action, self.counter);
        if !verify(signature, &self.aggregated_key, &message) {
            return Err(WalletError::InvalidSignature);
        }
        Ok(())
    }

    /// Pay `amount` to `recipient` if the coalition authorized it
    pub fn pay(
        &mut self,
        amount: u128,
        recipient: Address,
        signature: &Signature,
    ) -> Result<(), WalletError> {
        let action = Action::Pay { amount, recipient };
        self.authorize(&action, signature)?;

        let mut change = StateChange::begin(self);
        change.debit(amount)?;
        change.commit();

        log::info!(
            "Paid {} to {}; counter advanced to {}",
            amount,
            recipient,
            self.counter
        );
        Ok(())
    }

    /// Forward `call_data` and `value` to `target` if the coalition
    /// authorized it
    ///
    /// The callee's failure rolls back the counter and balance; the
    /// attempt leaves no trace.
    pub fn external_call(
        &mut self,
        target: &mut dyn CallTarget,
        call_data: &[u8],
        value: u128,
        signature: &Signature,
    ) -> Result<(), WalletError> {
        let action = Action::ExternalCall {
            target: target.address(),
            call_data: call_data.to_vec(),
            value,
        };
        self.authorize(&action, signature)?;

        let mut change = StateChange::begin(self);
        change.debit(value)?;
        target.call(call_data, value)?;
        change.commit();

        log::info!(
            "Forwarded {} bytes with value {} to {}; counter advanced to {}",
            call_data.len(),
            value,
            target.address(),
            self.counter
        );
        Ok(())
    }

    /// The aggregated public key `X`
    pub fn aggregated_key(&self) -> &CurvePoint {
        &self.aggregated_key
    }

    /// The ordered owner public keys
    pub fn owner_keys(&self) -> &[CurvePoint] {
        &self.owner_keys
    }

    /// Number of owners in the coalition
    pub fn owner_count(&self) -> usize {
        self.owner_keys.len()
    }

    /// The aggregation scheme fixed at construction
    pub fn scheme(&self) -> AggregationScheme {
        self.scheme
    }

    /// Current replay counter
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Current native-currency balance
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
