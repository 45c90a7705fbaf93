//! Definitions used in tests for this crate.

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::group::{ModPGroup, ModPGroupElement, ZqElement};
use crate::schnorr_protocol::SchnorrProof;

/// Safe prime `p = 2q + 1` with `q = 1019`, generated by `4`.
pub fn toy_group() -> ModPGroup {
    ModPGroup::new(BigUint::from(2039u32), BigUint::from(4u32))
        .expect("2039 is a safe prime and 4 a quadratic residue")
}

/// A 256-bit safe prime group, generated by `4`.
pub fn test_group() -> ModPGroup {
    let p = BigUint::parse_bytes(
        b"57896044618658097711785492504343953926635050804471868147038165440888616002523",
        10,
    )
    .expect("valid decimal");
    ModPGroup::new(p, BigUint::from(4u32)).expect("valid group parameters")
}

/// Reproducible RNG for tests.
pub fn deterministic_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Exponential ElGamal ciphertext `(g^r, h^r * g^m)`.
pub fn elgamal_encrypt(
    public_key: &ModPGroupElement,
    message: &ZqElement,
    randomness: &ZqElement,
) -> (ModPGroupElement, ModPGroupElement) {
    let group = public_key.group();
    let alpha = group.exp_generator(randomness);
    let beta = &public_key.exp(randomness) * &group.exp_generator(message);
    (alpha, beta)
}

/// Statements "`(alpha, beta)` encrypts `v`" for each candidate `v`.
///
/// Returns one DLEQ protocol over the bases `(g, h)` per candidate, and the matching
/// instances `(alpha, beta * g^{-v})`. The randomness `r` is a witness for the
/// candidate that was actually encrypted.
pub fn elgamal_candidates(
    public_key: &ModPGroupElement,
    (alpha, beta): &(ModPGroupElement, ModPGroupElement),
    candidates: &[ZqElement],
) -> (Vec<SchnorrProof>, Vec<Vec<ModPGroupElement>>) {
    let group = public_key.group();
    let protocol =
        SchnorrProof::dleq(group, public_key.clone()).expect("public key is in the group");
    let instances = candidates
        .iter()
        .map(|v| vec![alpha.clone(), beta * &group.exp_generator(&-v)])
        .collect();
    (vec![protocol; candidates.len()], instances)
}
