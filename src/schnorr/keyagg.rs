//! Public key aggregation
//!
//! Maps the ordered list of owner public keys to the single aggregated
//! key the verifier checks against. Two schemes are supported, fixed at
//! wallet construction:
//!
//! - **Naive**: `X = sum(PK_i)`. Cheap, but an owner who announces
//!   their key last can pick it as a function of the other announced
//!   keys and seize sole control of `X` (rogue-key attack).
//! - **MuSig**: `X = sum(a_i * PK_i)` with
//!   `a_i = H(PK_list || PK_i) mod N`. Changing any key in the list
//!   changes every coefficient, which defeats the rogue-key
//!   substitution.
//!
//! Aggregation is pure and runs exactly once per wallet; callers must
//! validate untrusted keys before aggregating.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::crypto::curve::{self, CurvePoint};
use crate::crypto::hash::sha256_concat;

/// The key-aggregation scheme, chosen once per wallet deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationScheme {
    /// Plain key sum; vulnerable to rogue-key substitution
    Naive,
    /// Coefficient-weighted sum binding each key to the full list
    MuSig,
}

/// MuSig coefficients `a_i = H(all keys || PK_i) mod N` for each owner
///
/// The full ordered key list is hashed into every coefficient, so no
/// single key can be swapped without changing all of them.
pub fn musig_coefficients(public_keys: &[CurvePoint]) -> Vec<BigUint> {
    let n = curve::group_order();
    let key_list: Vec<u8> = public_keys
        .iter()
        .flat_map(|pk| pk.coordinate_bytes())
        .collect();

    public_keys
        .iter()
        .map(|pk| {
            let digest = sha256_concat(&[&key_list, &pk.coordinate_bytes()]);
            BigUint::from_bytes_be(&digest) % &n
        })
        .collect()
}

/// Aggregate the ordered owner keys under the given scheme
///
/// Keys are assumed valid curve points; an empty list yields the
/// identity.
pub fn aggregate_keys(scheme: AggregationScheme, public_keys: &[CurvePoint]) -> CurvePoint {
    match scheme {
        AggregationScheme::Naive => public_keys
            .iter()
            .fold(CurvePoint::identity(), |acc, pk| curve::add(&acc, pk)),
        AggregationScheme::MuSig => {
            let coefficients = musig_coefficients(public_keys);
            public_keys
                .iter()
                .zip(&coefficients)
                .fold(CurvePoint::identity(), |acc, (pk, a)| {
                    curve::add(&acc, &curve::scalar_multiply(a, pk))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn sample_keys(count: usize) -> Vec<CurvePoint> {
        (0..count)
            .map(|_| KeyPair::generate().public_key().clone())
            .collect()
    }

    #[test]
    fn test_naive_aggregation_is_key_sum() {
        let keys = sample_keys(3);
        let expected = curve::add(&curve::add(&keys[0], &keys[1]), &keys[2]);
        assert_eq!(aggregate_keys(AggregationScheme::Naive, &keys), expected);
    }

    #[test]
    fn test_musig_aggregation_is_weighted_sum() {
        let keys = sample_keys(3);
        let coefficients = musig_coefficients(&keys);

        let mut expected = CurvePoint::identity();
        for (pk, a) in keys.iter().zip(&coefficients) {
            expected = curve::add(&expected, &curve::scalar_multiply(a, pk));
        }
        assert_eq!(aggregate_keys(AggregationScheme::MuSig, &keys), expected);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let keys = sample_keys(3);
        for scheme in [AggregationScheme::Naive, AggregationScheme::MuSig] {
            assert_eq!(aggregate_keys(scheme, &keys), aggregate_keys(scheme, &keys));
        }
    }

    #[test]
    fn test_changing_one_key_changes_every_coefficient() {
        let mut keys = sample_keys(3);
        let before = musig_coefficients(&keys);

        keys[1] = KeyPair::generate().public_key().clone();
        let after = musig_coefficients(&keys);

        for i in 0..keys.len() {
            assert_ne!(before[i], after[i]);
        }
    }

    #[test]
    fn test_rogue_key_controls_naive_but_not_musig() {
        // Two honest owners announce first.
        let honest = sample_keys(2);
        let honest_sum = curve::add(&honest[0], &honest[1]);

        // The last owner wants X to equal a key it alone controls, so
        // it announces T - (PK_1 + PK_2) for its own target T = t*G.
        let attacker = KeyPair::generate();
        let target = attacker.public_key().clone();
        let rogue = curve::add(&target, &honest_sum.negate());

        let keys = vec![honest[0].clone(), honest[1].clone(), rogue];

        // Naive aggregation collapses to the attacker's target.
        assert_eq!(aggregate_keys(AggregationScheme::Naive, &keys), target);

        // The MuSig coefficients re-weight every term, so the same
        // substitution no longer lands on T.
        assert_ne!(aggregate_keys(AggregationScheme::MuSig, &keys), target);
    }
}
