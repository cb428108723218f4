//! Canonical action message encoding
//!
//! Every authorization attempt signs a deterministic byte string
//! derived from the action kind, its parameters, and the wallet's
//! current replay counter. The layout is injective: a discriminator
//! byte per action kind, fixed-width big-endian integers, 20-byte
//! addresses, and a length prefix on variable-length call data, so no
//! two distinct `(kind, parameters, counter)` tuples encode
//! identically.
//!
//! The counter is always supplied by the wallet at verification time,
//! never by the caller; that is what limits a signature to exactly one
//! authorization.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when decoding addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address encoding")]
    InvalidEncoding,
}

/// A 20-byte account address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Parse an address from a hex string, with or without `0x`
    pub fn from_hex(hex_str: &str) -> Result<Self, AddressError> {
        let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(trimmed).map_err(|_| AddressError::InvalidEncoding)?;
        let array: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidEncoding)?;
        Ok(Self(array))
    }

    /// Hex encoding with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

const PAY_TAG: u8 = 0x01;
const EXTERNAL_CALL_TAG: u8 = 0x02;

/// An action the owner coalition can authorize
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Transfer `amount` of the wallet's native balance to `recipient`
    Pay { amount: u128, recipient: Address },
    /// Forward `call_data` and `value` to the `target` callee
    ExternalCall {
        target: Address,
        call_data: Vec<u8>,
        value: u128,
    },
}

/// Encode an action and the current replay counter into the message
/// the coalition signs
pub fn encode_action(action: &Action, counter: u64) -> Vec<u8> {
    let mut out = Vec::new();
    match action {
        Action::Pay { amount, recipient } => {
            out.push(PAY_TAG);
            out.extend_from_slice(&amount.to_be_bytes());
            out.extend_from_slice(&recipient.0);
        }
        Action::ExternalCall {
            target,
            call_data,
            value,
        } => {
            out.push(EXTERNAL_CALL_TAG);
            out.extend_from_slice(&target.0);
            out.extend_from_slice(&(call_data.len() as u32).to_be_bytes());
            out.extend_from_slice(call_data);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
    out.extend_from_slice(&counter.to_be_bytes());
    out
}
