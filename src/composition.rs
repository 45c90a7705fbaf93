//! # Disjunctive (OR) Composition of Sigma Protocols
//!
//! This module defines [`OrProof`], which combines `K >= 1` Sigma protocols sharing
//! one challenge space into a single protocol proving knowledge of a witness for
//! at least one branch, without revealing which.
//!
//! The prover runs the real protocol on the branch it has a witness for and
//! simulates every other branch. The verifier's challenge `c` is split into shares
//! `c_0, ..., c_{K-1}` with `c_0 + ... + c_{K-1} = c`: simulated shares are chosen
//! first, the real share is whatever is left.
//!
//! ## Instance encoding
//!
//! The only part that cannot be inferred from the branches is how the `K`
//! instances are encoded into the Fiat-Shamir hash input. It is an explicit
//! [`InstanceEncoding`] strategy:
//! - [`positional_instance_encoding`] (the default) encodes every instance, in branch order.
//! - [`representative_instance_encoding`] encodes only instance 0 with branch 0's
//!   encoder, after checking that all instances share its shape. This is only sound
//!   when the other instances are a public function of instance 0, e.g. the
//!   "ciphertext encrypts `v_i`" statements of an election ballot.

use core::fmt;
use core::marker::PhantomData;

use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::byte_tree::ByteTree;
use crate::duplex_sponge::shake::ShakeDuplexSponge;
use crate::duplex_sponge::DuplexSpongeInterface;
use crate::errors::{Error, InvalidInstance};
use crate::fiat_shamir::{challenges_match, Nizk, Transcript};
use crate::group::serialization::{deserialize_scalars, serialize_scalars};
use crate::group::{ZqElement, ZqRing};
use crate::traits::{pad_identifier, SigmaProtocol, SigmaProtocolSimulator};

const OR_PROTOCOL_ID: [u8; 32] = pad_identifier(b"sigma-or-composition/v1");

/// Strategy turning the `K` branch instances into the Fiat-Shamir instance encoding.
///
/// Receives the branch protocols and the instances, both in branch order.
pub type InstanceEncoding<P> =
    fn(&[P], &[<P as SigmaProtocol>::Instance]) -> Result<ByteTree, Error>;

fn check_branch_count(branches: usize, instances: usize) -> Result<(), InvalidInstance> {
    if branches == 0 || branches != instances {
        return Err(InvalidInstance::new(format!(
            "expected {branches} instances, found {instances}"
        )));
    }
    Ok(())
}

/// Encode every instance with its own branch encoder, as a node in branch order.
///
/// # Errors
/// - [`Error::MalformedInstance`] if the number of instances differs from the number
///   of branches; leaf encoder errors are propagated unchanged.
pub fn positional_instance_encoding<P: SigmaProtocol>(
    proofs: &[P],
    instances: &[P::Instance],
) -> Result<ByteTree, Error> {
    check_branch_count(proofs.len(), instances.len())?;
    let encoded = proofs
        .iter()
        .zip(instances)
        .map(|(proof, instance)| proof.instance_to_byte_tree(instance))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ByteTree::Node(encoded))
}

/// Encode only `instances[0]`, with the first branch's encoder.
///
/// The result depends on instance 0 alone and is therefore the same for any number
/// of branches. Every other instance is still encoded by its own branch, and must
/// produce a byte tree of the same shape as instance 0.
///
/// # Errors
/// - [`Error::MalformedInstance`] if the number of instances differs from the number
///   of branches, or some instance differs in shape from instance 0.
/// - Leaf encoder errors are propagated unchanged.
pub fn representative_instance_encoding<P: SigmaProtocol>(
    proofs: &[P],
    instances: &[P::Instance],
) -> Result<ByteTree, Error> {
    check_branch_count(proofs.len(), instances.len())?;
    let representative = proofs[0].instance_to_byte_tree(&instances[0])?;
    for (index, (proof, instance)) in proofs.iter().zip(instances).enumerate().skip(1) {
        if !proof
            .instance_to_byte_tree(instance)?
            .same_shape(&representative)
        {
            return Err(InvalidInstance::new(format!(
                "instance {index} does not have the shape of instance 0"
            ))
            .into());
        }
    }
    Ok(representative)
}

/// The witness of an OR proof: the index of the true branch and its witness.
#[derive(Clone, Debug)]
pub struct OrWitness<W> {
    pub branch: usize,
    pub witness: W,
}

impl<W> OrWitness<W> {
    pub fn new(branch: usize, witness: W) -> Self {
        Self { branch, witness }
    }
}

/// The response of an OR proof: one challenge share and one response per branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrResponse<R> {
    pub challenges: Vec<ZqElement>,
    pub responses: Vec<R>,
}

/// Prover state between commitment and response.
///
/// Holds the real branch's state and the already fixed shares and responses of the
/// simulated branches.
pub struct OrProverState<P: SigmaProtocol> {
    real_state: P::ProverState,
    simulated: Vec<Option<(ZqElement, P::Response)>>,
}

/// A disjunction of Sigma protocols over one challenge space.
pub struct OrProof<P: SigmaProtocol> {
    challenge_space: ZqRing,
    proofs: Vec<P>,
    instance_encoding: InstanceEncoding<P>,
}

impl<P: SigmaProtocol> OrProof<P> {
    /// Compose `proofs`, in order, using the positional instance encoding.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if `proofs` is empty.
    /// - [`Error::ChallengeSpaceMismatch`] if some branch draws challenges from
    ///   another ring than `challenge_space`.
    pub fn new(challenge_space: ZqRing, proofs: Vec<P>) -> Result<Self, Error> {
        if proofs.is_empty() {
            return Err(InvalidInstance::new("an OR proof needs at least one branch").into());
        }
        if proofs
            .iter()
            .any(|proof| proof.challenge_space() != &challenge_space)
        {
            return Err(Error::ChallengeSpaceMismatch);
        }
        Ok(Self {
            challenge_space,
            proofs,
            instance_encoding: positional_instance_encoding::<P>,
        })
    }

    /// Replace the instance encoding strategy.
    pub fn with_instance_encoding(mut self, instance_encoding: InstanceEncoding<P>) -> Self {
        self.instance_encoding = instance_encoding;
        self
    }

    pub fn proofs(&self) -> &[P] {
        &self.proofs
    }

    /// Number of branches; never zero.
    pub fn len(&self) -> usize {
        self.proofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofs.is_empty()
    }

    fn sum_challenges<'a>(&self, shares: impl IntoIterator<Item = &'a ZqElement>) -> ZqElement {
        shares
            .into_iter()
            .fold(self.challenge_space.zero(), |acc, share| &acc + share)
    }
}

impl<P> Clone for OrProof<P>
where
    P: SigmaProtocol + Clone,
{
    fn clone(&self) -> Self {
        Self {
            challenge_space: self.challenge_space.clone(),
            proofs: self.proofs.clone(),
            instance_encoding: self.instance_encoding,
        }
    }
}

impl<P> fmt::Debug for OrProof<P>
where
    P: SigmaProtocol + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrProof")
            .field("challenge_space", &self.challenge_space)
            .field("proofs", &self.proofs)
            .finish_non_exhaustive()
    }
}

impl<P: SigmaProtocolSimulator> SigmaProtocol for OrProof<P> {
    type Instance = Vec<P::Instance>;
    type Witness = OrWitness<P::Witness>;
    type Commitment = Vec<P::Commitment>;
    type ProverState = OrProverState<P>;
    type Response = OrResponse<P::Response>;

    fn challenge_space(&self) -> &ZqRing {
        &self.challenge_space
    }

    /// Commits on the real branch and simulates every other branch.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if there is not one instance per branch.
    /// - [`Error::InvalidInstanceWitnessPair`] if the branch index is out of range or
    ///   the witness does not satisfy that branch.
    #[instrument(skip_all, fields(branches = self.len()))]
    fn prover_commit(
        &self,
        instances: &Self::Instance,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState), Error> {
        check_branch_count(self.len(), instances.len())?;
        if witness.branch >= self.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let mut commitments = Vec::with_capacity(self.len());
        let mut simulated = Vec::with_capacity(self.len());
        let mut real_state = None;
        for (index, (proof, instance)) in self.proofs.iter().zip(instances).enumerate() {
            if index == witness.branch {
                let (commitment, state) = proof.prover_commit(instance, &witness.witness, rng)?;
                commitments.push(commitment);
                simulated.push(None);
                real_state = Some(state);
            } else {
                let (commitment, challenge, response) = proof.simulate_transcript(instance, rng)?;
                commitments.push(commitment);
                simulated.push(Some((challenge, response)));
            }
        }
        let real_state = real_state.ok_or(Error::InvalidInstanceWitnessPair)?;
        Ok((
            commitments,
            OrProverState {
                real_state,
                simulated,
            },
        ))
    }

    /// Derives the real branch's share as `c` minus the simulated shares.
    #[instrument(skip_all, fields(branches = self.len()))]
    fn prover_response(
        &self,
        state: Self::ProverState,
        challenge: &ZqElement,
    ) -> Result<Self::Response, Error> {
        let OrProverState {
            real_state,
            simulated,
        } = state;
        let branch = simulated
            .iter()
            .position(Option::is_none)
            .ok_or(Error::InvalidInstanceWitnessPair)?;
        let simulated_sum =
            self.sum_challenges(simulated.iter().flatten().map(|(share, _)| share));
        let real_challenge = challenge - &simulated_sum;
        let mut real_response =
            Some(self.proofs[branch].prover_response(real_state, &real_challenge)?);

        let mut challenges = Vec::with_capacity(self.len());
        let mut responses = Vec::with_capacity(self.len());
        for entry in simulated {
            match entry {
                Some((share, response)) => {
                    challenges.push(share);
                    responses.push(response);
                }
                None => {
                    challenges.push(real_challenge.clone());
                    responses.push(
                        real_response
                            .take()
                            .ok_or(Error::InvalidInstanceWitnessPair)?,
                    );
                }
            }
        }
        Ok(OrResponse {
            challenges,
            responses,
        })
    }

    /// Checks that the shares sum to `challenge` and that every branch verifies.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if there is not one instance per branch.
    /// - [`Error::InvalidInstanceWitnessPair`] if the transcript has the wrong number
    ///   of commitments, shares, or responses.
    /// - [`Error::VerificationFailure`] if the shares do not sum to `challenge` or a
    ///   branch rejects.
    #[instrument(skip_all, fields(branches = self.len()))]
    fn verifier(
        &self,
        instances: &Self::Instance,
        commitment: &Self::Commitment,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<(), Error> {
        check_branch_count(self.len(), instances.len())?;
        if commitment.len() != self.len()
            || response.challenges.len() != self.len()
            || response.responses.len() != self.len()
        {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        if !challenges_match(&self.sum_challenges(&response.challenges), challenge) {
            debug!("challenge shares do not sum to the challenge");
            return Err(Error::VerificationFailure);
        }

        for (index, proof) in self.proofs.iter().enumerate() {
            proof
                .verifier(
                    &instances[index],
                    &commitment[index],
                    &response.challenges[index],
                    &response.responses[index],
                )
                .inspect_err(|_| debug!(branch = index, "branch rejected"))?;
        }
        Ok(())
    }

    fn instance_to_byte_tree(&self, instances: &Self::Instance) -> Result<ByteTree, Error> {
        (self.instance_encoding)(&self.proofs, instances)
    }

    fn commitment_to_byte_tree(&self, commitment: &Self::Commitment) -> ByteTree {
        ByteTree::node(
            self.proofs
                .iter()
                .zip(commitment)
                .map(|(proof, commitment)| proof.commitment_to_byte_tree(commitment)),
        )
    }

    fn commitment_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Commitment, Error> {
        self.proofs
            .iter()
            .zip(tree.expect_node(self.len())?)
            .map(|(proof, child)| proof.commitment_from_byte_tree(child))
            .collect()
    }

    fn response_to_byte_tree(&self, response: &Self::Response) -> ByteTree {
        ByteTree::node([
            serialize_scalars(&response.challenges),
            ByteTree::node(
                self.proofs
                    .iter()
                    .zip(&response.responses)
                    .map(|(proof, response)| proof.response_to_byte_tree(response)),
            ),
        ])
    }

    fn response_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Response, Error> {
        let [challenges, responses] = tree.expect_node(2)? else {
            unreachable!("expect_node checked the arity");
        };
        let challenges = deserialize_scalars(&self.challenge_space, challenges, self.len())?;
        let responses = self
            .proofs
            .iter()
            .zip(responses.expect_node(self.len())?)
            .map(|(proof, child)| proof.response_from_byte_tree(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrResponse {
            challenges,
            responses,
        })
    }

    fn protocol_identifier(&self) -> [u8; 32] {
        OR_PROTOCOL_ID
    }
}

impl<P: SigmaProtocolSimulator> SigmaProtocolSimulator for OrProof<P> {
    fn simulate_response(&self, rng: &mut (impl RngCore + CryptoRng)) -> Self::Response {
        let challenges = (0..self.len())
            .map(|_| self.challenge_space.random(rng))
            .collect();
        let responses = self
            .proofs
            .iter()
            .map(|proof| proof.simulate_response(rng))
            .collect();
        OrResponse {
            challenges,
            responses,
        }
    }

    /// Recomputes every branch commitment from its share and response.
    ///
    /// # Errors
    /// - [`Error::InvalidInstanceWitnessPair`] if the response has the wrong length.
    /// - [`Error::VerificationFailure`] if the shares do not sum to `challenge`.
    fn simulate_commitment(
        &self,
        instances: &Self::Instance,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<Self::Commitment, Error> {
        check_branch_count(self.len(), instances.len())?;
        if response.challenges.len() != self.len() || response.responses.len() != self.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }
        if !challenges_match(&self.sum_challenges(&response.challenges), challenge) {
            return Err(Error::VerificationFailure);
        }
        self.proofs
            .iter()
            .zip(instances)
            .zip(response.challenges.iter().zip(&response.responses))
            .map(|((proof, instance), (share, response))| {
                proof.simulate_commitment(instance, share, response)
            })
            .collect()
    }

    fn simulate_transcript(
        &self,
        instances: &Self::Instance,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, ZqElement, Self::Response), Error> {
        let response = self.simulate_response(rng);
        let challenge = self.sum_challenges(&response.challenges);
        let commitment = self.simulate_commitment(instances, &challenge, &response)?;
        Ok((commitment, challenge, response))
    }
}

/// Non-interactive OR proofs over a fixed challenge space and session.
///
/// The instance encoding strategy is an explicit parameter of both
/// [`SigmaComposer::prove_or`] and [`SigmaComposer::verify_or`].
pub struct SigmaComposer<H: DuplexSpongeInterface = ShakeDuplexSponge> {
    session_id: Vec<u8>,
    challenge_space: ZqRing,
    _sponge: PhantomData<H>,
}

impl<H: DuplexSpongeInterface> SigmaComposer<H> {
    pub fn new(session_identifier: &[u8], challenge_space: ZqRing) -> Self {
        Self {
            session_id: session_identifier.to_vec(),
            challenge_space,
            _sponge: PhantomData,
        }
    }

    fn nizk<P>(
        &self,
        proofs: &[P],
        encoding: InstanceEncoding<P>,
    ) -> Result<Nizk<OrProof<P>, H>, Error>
    where
        P: SigmaProtocolSimulator + Clone,
    {
        let or_proof = OrProof::new(self.challenge_space.clone(), proofs.to_vec())?
            .with_instance_encoding(encoding);
        Ok(Nizk::new(&self.session_id, or_proof))
    }

    /// Prove knowledge of a witness for branch `witness.branch` of `proofs`.
    ///
    /// # Errors
    /// - Construction errors of [`OrProof::new`], and the errors of
    ///   [`OrProof`]'s commitment step and of `encoding`.
    pub fn prove_or<P>(
        &self,
        proofs: &[P],
        encoding: InstanceEncoding<P>,
        instances: &[P::Instance],
        witness: &OrWitness<P::Witness>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Transcript<OrProof<P>>, Error>
    where
        P: SigmaProtocolSimulator + Clone,
        P::Instance: Clone,
    {
        self.nizk(proofs, encoding)?
            .prove(&instances.to_vec(), witness, rng)
    }

    /// Verify a transcript produced by [`SigmaComposer::prove_or`].
    ///
    /// # Errors
    /// - [`Error::VerificationFailure`] if the transcript does not verify.
    pub fn verify_or<P>(
        &self,
        proofs: &[P],
        encoding: InstanceEncoding<P>,
        instances: &[P::Instance],
        transcript: &Transcript<OrProof<P>>,
    ) -> Result<(), Error>
    where
        P: SigmaProtocolSimulator + Clone,
        P::Instance: Clone,
    {
        self.nizk(proofs, encoding)?
            .verify(&instances.to_vec(), transcript)
    }
}
