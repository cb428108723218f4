//! Off-chain aggregate signature generation and verification
//!
//! Implements the n-of-n signing rounds whose output the wallet
//! executor verifies: every owner contributes a nonce and a response,
//! and the coalition produces a single `(R, s)` pair.
//!
//! Nonce exchange is hardened with a commit-reveal round: each owner
//! first publishes a blinded hash commitment to its nonce point and
//! only reveals the point once all commitments are in. A nonce point
//! that does not match its commitment aborts the session before any
//! challenge is computed, which blocks adaptive nonce-grinding across
//! concurrent sessions.
//!
//! Verification is `s*G == R + c*X` with
//! `c = H(X || R || message) mod N`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::curve::{self, CurvePoint};
use crate::crypto::hash::sha256_concat;
use crate::crypto::keys::KeyPair;
use crate::schnorr::keyagg::{self, AggregationScheme};

/// Errors raised during a signing session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchnorrError {
    #[error("Nonce commitment mismatch")]
    NonceCommitmentMismatch,
    #[error("No signers provided")]
    NoSigners,
}

/// An aggregate Schnorr signature: nonce point `R` and response `s`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub r: CurvePoint,
    pub s: BigUint,
}

/// One owner's ephemeral nonce for a single signing session
///
/// Holds the secret nonce `r_i`, its public point `R_i = r_i * G`, and
/// a blinded commitment `H(R_i || blind)` published before the point
/// itself.
#[derive(Clone, Debug)]
pub struct EphemeralNonce {
    secret: BigUint,
    public_point: CurvePoint,
    blind_factor: [u8; 32],
    commitment: [u8; 32],
}

impl EphemeralNonce {
    /// Sample a fresh nonce and commit to its public point
    pub fn generate() -> Self {
        let nonce_key = KeyPair::generate();
        let secret = nonce_key.secret_key().clone();
        let public_point = nonce_key.public_key().clone();

        let mut blind_factor = [0u8; 32];
        OsRng.fill_bytes(&mut blind_factor);
        let commitment = Self::commit(&public_point, &blind_factor);

        Self {
            secret,
            public_point,
            blind_factor,
            commitment,
        }
    }

    fn commit(point: &CurvePoint, blind_factor: &[u8; 32]) -> [u8; 32] {
        let digest = sha256_concat(&[&point.coordinate_bytes(), blind_factor]);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    /// The nonce point `R_i`, revealed after all commitments are in
    pub fn public_point(&self) -> &CurvePoint {
        &self.public_point
    }

    /// The published commitment `H(R_i || blind)`
    pub fn commitment(&self) -> &[u8; 32] {
        &self.commitment
    }

    /// The blind factor disclosed together with the nonce point
    pub fn blind_factor(&self) -> &[u8; 32] {
        &self.blind_factor
    }

    /// Check a revealed nonce point against its earlier commitment
    pub fn verify_commitment(
        point: &CurvePoint,
        blind_factor: &[u8; 32],
        commitment: &[u8; 32],
    ) -> bool {
        Self::commit(point, blind_factor) == *commitment
    }

    /// This owner's response `s_i = sk * c * a + r_i (mod N)`
    ///
    /// `coefficient` is 1 under the naive scheme and the owner's MuSig
    /// coefficient otherwise.
    pub fn respond(
        &self,
        secret_key: &BigUint,
        challenge: &BigUint,
        coefficient: &BigUint,
    ) -> BigUint {
        let n = curve::group_order();
        (secret_key * challenge % &n * coefficient + &self.secret) % n
    }
}

/// Aggregate nonce `R = sum(R_i)`; additive under both schemes
pub fn aggregate_nonces(nonce_points: &[CurvePoint]) -> CurvePoint {
    nonce_points
        .iter()
        .fold(CurvePoint::identity(), |acc, r| curve::add(&acc, r))
}

/// Challenge `c = H(X || R || message) mod N`
pub fn challenge(
    aggregated_key: &CurvePoint,
    nonce_point: &CurvePoint,
    message: &[u8],
) -> BigUint {
    let digest = sha256_concat(&[
        &aggregated_key.coordinate_bytes(),
        &nonce_point.coordinate_bytes(),
        message,
    ]);
    BigUint::from_bytes_be(&digest) % curve::group_order()
}

/// Aggregate response `s = sum(s_i) mod N`
pub fn aggregate_responses(responses: &[BigUint]) -> BigUint {
    let n = curve::group_order();
    responses.iter().fold(BigUint::zero(), |acc, s| (acc + s) % &n)
}

/// Verify `s*G == R + c*X` for the given aggregated key and message
///
/// The nonce point is not validated here; the wallet checks untrusted
/// points before calling in.
pub fn verify(signature: &Signature, aggregated_key: &CurvePoint, message: &[u8]) -> bool {
    let c = challenge(aggregated_key, &signature.r, message);
    let lhs = curve::scalar_multiply(&signature.s, &curve::generator());
    let rhs = curve::add(
        &signature.r,
        &curve::scalar_multiply(&c, aggregated_key),
    );
    lhs == rhs
}

/// Run the full signing rounds locally for the whole coalition
///
/// Mirrors the owner protocol: nonce commitments, reveal and
/// commitment checks, nonce aggregation, challenge, per-owner
/// responses, response aggregation. Every owner must participate;
/// there is no threshold subset.
pub fn cohort_sign(
    scheme: AggregationScheme,
    keypairs: &[KeyPair],
    message: &[u8],
) -> Result<Signature, SchnorrError> {
    if keypairs.is_empty() {
        return Err(SchnorrError::NoSigners);
    }

    let public_keys: Vec<CurvePoint> =
        keypairs.iter().map(|kp| kp.public_key().clone()).collect();

    // Round 1: every owner commits to its nonce point.
    let nonces: Vec<EphemeralNonce> = keypairs.iter().map(|_| EphemeralNonce::generate()).collect();

    // Round 2: points are revealed and checked against the commitments.
    for nonce in &nonces {
        if !EphemeralNonce::verify_commitment(
            nonce.public_point(),
            nonce.blind_factor(),
            nonce.commitment(),
        ) {
            return Err(SchnorrError::NonceCommitmentMismatch);
        }
    }

    let nonce_points: Vec<CurvePoint> =
        nonces.iter().map(|n| n.public_point().clone()).collect();
    let r = aggregate_nonces(&nonce_points);

    let coefficients = match scheme {
        AggregationScheme::Naive => vec![BigUint::one(); keypairs.len()],
        AggregationScheme::MuSig => keyagg::musig_coefficients(&public_keys),
    };

    // Round 3: challenge and per-owner responses.
    let aggregated_key = keyagg::aggregate_keys(scheme, &public_keys);
    let c = challenge(&aggregated_key, &r, message);

    let responses: Vec<BigUint> = keypairs
        .iter()
        .zip(&nonces)
        .zip(&coefficients)
        .map(|((kp, nonce), a)| nonce.respond(kp.secret_key(), &c, a))
        .collect();

    Ok(Signature {
        r,
        s: aggregate_responses(&responses),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schnorr::keyagg::aggregate_keys;

    fn coalition(count: usize) -> (Vec<KeyPair>, Vec<CurvePoint>) {
        let keypairs: Vec<KeyPair> = (0..count).map(|_| KeyPair::generate()).collect();
        let public_keys = keypairs.iter().map(|kp| kp.public_key().clone()).collect();
        (keypairs, public_keys)
    }

    #[test]
    fn test_sign_and_verify_naive() {
        let (keypairs, public_keys) = coalition(3);
        let x = aggregate_keys(AggregationScheme::Naive, &public_keys);

        let signature = cohort_sign(AggregationScheme::Naive, &keypairs, b"pay rent").unwrap();
        assert!(verify(&signature, &x, b"pay rent"));
    }

    #[test]
    fn test_sign_and_verify_musig() {
        let (keypairs, public_keys) = coalition(3);
        let x = aggregate_keys(AggregationScheme::MuSig, &public_keys);

        let signature = cohort_sign(AggregationScheme::MuSig, &keypairs, b"pay rent").unwrap();
        assert!(verify(&signature, &x, b"pay rent"));
    }

    #[test]
    fn test_single_owner_coalition() {
        let (keypairs, public_keys) = coalition(1);
        let x = aggregate_keys(AggregationScheme::MuSig, &public_keys);

        let signature = cohort_sign(AggregationScheme::MuSig, &keypairs, b"solo").unwrap();
        assert!(verify(&signature, &x, b"solo"));
    }

    #[test]
    fn test_tampered_message_fails() {
        let (keypairs, public_keys) = coalition(2);
        let x = aggregate_keys(AggregationScheme::Naive, &public_keys);

        let signature = cohort_sign(AggregationScheme::Naive, &keypairs, b"original").unwrap();
        assert!(!verify(&signature, &x, b"tampered"));
    }

    #[test]
    fn test_tampered_response_fails() {
        let (keypairs, public_keys) = coalition(2);
        let x = aggregate_keys(AggregationScheme::Naive, &public_keys);

        let mut signature = cohort_sign(AggregationScheme::Naive, &keypairs, b"message").unwrap();
        signature.s = (signature.s + 1u32) % curve::group_order();
        assert!(!verify(&signature, &x, b"message"));
    }

    #[test]
    fn test_missing_owner_invalidates_signature() {
        let (keypairs, public_keys) = coalition(3);
        let x = aggregate_keys(AggregationScheme::Naive, &public_keys);

        // Only two of the three owners sign; the key stays aggregated
        // over all three, so the result must not verify.
        let signature = cohort_sign(AggregationScheme::Naive, &keypairs[..2], b"m").unwrap();
        assert!(!verify(&signature, &x, b"m"));
    }

    #[test]
    fn test_empty_coalition_rejected() {
        assert_eq!(
            cohort_sign(AggregationScheme::Naive, &[], b"m"),
            Err(SchnorrError::NoSigners)
        );
    }

    #[test]
    fn test_nonce_commitment_round_trip() {
        let nonce = EphemeralNonce::generate();
        assert!(EphemeralNonce::verify_commitment(
            nonce.public_point(),
            nonce.blind_factor(),
            nonce.commitment()
        ));

        // A different point must not satisfy the same commitment.
        let other = EphemeralNonce::generate();
        assert!(!EphemeralNonce::verify_commitment(
            other.public_point(),
            nonce.blind_factor(),
            nonce.commitment()
        ));
    }

    #[test]
    fn test_verification_equation_holds_componentwise() {
        let (keypairs, public_keys) = coalition(2);
        let x = aggregate_keys(AggregationScheme::Naive, &public_keys);
        let signature = cohort_sign(AggregationScheme::Naive, &keypairs, b"eq").unwrap();

        let c = challenge(&x, &signature.r, b"eq");
        let lhs = curve::scalar_multiply(&signature.s, &curve::generator());
        let rhs = curve::add(&signature.r, &curve::scalar_multiply(&c, &x));
        assert_eq!(lhs, rhs);
    }
}
