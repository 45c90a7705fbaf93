//! Implementation of the Schnorr Sigma Protocol over a [`ModPGroup`].
//!
//! This module defines the [`SchnorrProof`] structure, which proves knowledge of a
//! single exponent `x` such that `y_i = b_i^x` for every fixed base `b_i`. With one
//! base this is the classic Schnorr proof of a discrete logarithm; with two bases it
//! is a proof of discrete logarithm equality, which is how knowledge of the
//! randomness of an ElGamal ciphertext is shown.
//!
//! The instance is the tuple `(y_0, ..., y_{n-1})`; its arity must match the bases.
//! Its hashed encoding also carries the group parameters and the bases, so a
//! proof is bound to the full relation and not only to its image.

use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::byte_tree::ByteTree;
use crate::errors::{Error, InvalidInstance};
use crate::group::serialization::{deserialize_elements, serialize_elements};
use crate::group::{ModPGroup, ModPGroupElement, ZqElement, ZqRing};
use crate::traits::{pad_identifier, SigmaProtocol, SigmaProtocolSimulator};

const SCHNORR_PROTOCOL_ID: [u8; 32] = pad_identifier(b"modp-schnorr-exponent-tuple/v1");

/// Proof of knowledge of a common exponent of a tuple of group elements.
#[derive(Clone, Debug)]
pub struct SchnorrProof {
    group: ModPGroup,
    bases: Vec<ModPGroupElement>,
}

impl SchnorrProof {
    /// Create a protocol for the relation `y_i = bases_i^x`.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if `bases` is empty or mixes groups.
    pub fn new(bases: Vec<ModPGroupElement>) -> Result<Self, Error> {
        let group = bases
            .first()
            .map(|b| b.group().clone())
            .ok_or_else(|| InvalidInstance::new("at least one base is required"))?;
        if bases.iter().any(|b| b.group() != &group) {
            return Err(InvalidInstance::new("bases belong to different groups").into());
        }
        Ok(Self { group, bases })
    }

    /// Knowledge of `x` with `y = g^x` for the group generator `g`.
    pub fn discrete_logarithm(group: &ModPGroup) -> Self {
        Self {
            group: group.clone(),
            bases: vec![group.generator()],
        }
    }

    /// Knowledge of `x` with `y_0 = g^x` and `y_1 = h^x`.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if `h` is not in `group`.
    pub fn dleq(group: &ModPGroup, h: ModPGroupElement) -> Result<Self, Error> {
        Self::new(vec![group.generator(), h])
    }

    pub fn group(&self) -> &ModPGroup {
        &self.group
    }

    pub fn bases(&self) -> &[ModPGroupElement] {
        &self.bases
    }

    /// Number of elements in an instance.
    pub fn arity(&self) -> usize {
        self.bases.len()
    }

    /// The instance `(b_0^x, ..., b_{n-1}^x)` for exponent `x`.
    pub fn image(&self, exponent: &ZqElement) -> Vec<ModPGroupElement> {
        self.bases.iter().map(|b| b.exp(exponent)).collect()
    }

    fn group_label(&self) -> ByteTree {
        ByteTree::node([
            ByteTree::leaf(self.group.modulus().to_bytes_be()),
            self.group.generator().to_byte_tree(),
        ])
    }

    fn check_instance(&self, instance: &[ModPGroupElement]) -> Result<(), InvalidInstance> {
        if instance.len() != self.arity() {
            return Err(InvalidInstance::new(format!(
                "expected {} elements, found {}",
                self.arity(),
                instance.len()
            )));
        }
        if instance.iter().any(|y| y.group() != &self.group) {
            return Err(InvalidInstance::new("instance element from another group"));
        }
        Ok(())
    }
}

impl SigmaProtocol for SchnorrProof {
    type Instance = Vec<ModPGroupElement>;
    type Witness = ZqElement;
    type Commitment = Vec<ModPGroupElement>;
    type ProverState = (ZqElement, ZqElement);
    type Response = ZqElement;

    fn challenge_space(&self) -> &ZqRing {
        self.group.scalar_ring()
    }

    /// Prover's first message: commits to a random nonce `r` as `(b_i^r)_i`.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if the instance has the wrong arity or group.
    /// - [`Error::InvalidInstanceWitnessPair`] if `y_i != b_i^x` for some `i`.
    #[instrument(skip_all, fields(arity = self.arity()))]
    fn prover_commit(
        &self,
        instance: &Self::Instance,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState), Error> {
        self.check_instance(instance)?;
        if &self.image(witness) != instance {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let nonce = self.challenge_space().random(rng);
        let commitment = self.image(&nonce);
        Ok((commitment, (nonce, witness.clone())))
    }

    /// Computes the response `z = r + c * x`.
    #[instrument(skip_all)]
    fn prover_response(
        &self,
        (nonce, witness): Self::ProverState,
        challenge: &ZqElement,
    ) -> Result<Self::Response, Error> {
        Ok(&nonce + &(&witness * challenge))
    }

    /// Checks `b_i^z == a_i * y_i^c` for every base.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if the instance has the wrong arity or group.
    /// - [`Error::InvalidInstanceWitnessPair`] if the commitment has the wrong length.
    /// - [`Error::VerificationFailure`] if an equation does not hold.
    #[instrument(skip_all, fields(arity = self.arity()))]
    fn verifier(
        &self,
        instance: &Self::Instance,
        commitment: &Self::Commitment,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<(), Error> {
        self.check_instance(instance)?;
        if commitment.len() != self.arity() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let holds = self
            .bases
            .iter()
            .zip(instance)
            .zip(commitment)
            .all(|((b, y), a)| b.exp(response) == a * &y.exp(challenge));
        if holds {
            Ok(())
        } else {
            debug!("schnorr verification equation failed");
            Err(Error::VerificationFailure)
        }
    }

    /// `Node[Node[p, g], bases, instance]`, so the hash binds the whole relation.
    fn instance_to_byte_tree(&self, instance: &Self::Instance) -> Result<ByteTree, Error> {
        self.check_instance(instance)?;
        Ok(ByteTree::node([
            self.group_label(),
            serialize_elements(&self.bases),
            serialize_elements(instance),
        ]))
    }

    fn commitment_to_byte_tree(&self, commitment: &Self::Commitment) -> ByteTree {
        serialize_elements(commitment)
    }

    fn commitment_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Commitment, Error> {
        deserialize_elements(&self.group, tree, self.arity())
    }

    fn response_to_byte_tree(&self, response: &Self::Response) -> ByteTree {
        response.to_byte_tree()
    }

    fn response_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Response, Error> {
        self.challenge_space().from_byte_tree(tree)
    }

    fn protocol_identifier(&self) -> [u8; 32] {
        SCHNORR_PROTOCOL_ID
    }
}

impl SigmaProtocolSimulator for SchnorrProof {
    fn simulate_response(&self, rng: &mut (impl RngCore + CryptoRng)) -> Self::Response {
        self.challenge_space().random(rng)
    }

    /// Recomputes `a_i = b_i^z * (y_i^c)^{-1}`.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if the instance has the wrong arity or group.
    fn simulate_commitment(
        &self,
        instance: &Self::Instance,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<Self::Commitment, Error> {
        self.check_instance(instance)?;
        let commitment = self
            .bases
            .iter()
            .zip(instance)
            .map(|(b, y)| &b.exp(response) * &y.exp(challenge).inverse())
            .collect();
        Ok(commitment)
    }

    fn simulate_transcript(
        &self,
        instance: &Self::Instance,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, ZqElement, Self::Response), Error> {
        let challenge = self.challenge_space().random(rng);
        let response = self.simulate_response(rng);
        let commitment = self.simulate_commitment(instance, &challenge, &response)?;
        Ok((commitment, challenge, response))
    }
}
