//! Fiat-Shamir transformation for [`SigmaProtocol`]s.
//!
//! This module defines [`Nizk`], a generic non-interactive Sigma protocol wrapper,
//! based on applying the Fiat-Shamir heuristic using a duplex sponge.
//!
//! It transforms an interactive [`SigmaProtocol`] into a non-interactive one,
//! by deriving challenges deterministically from previous protocol messages.
//! The hash input is the canonical byte tree
//! `Node[instance_to_byte_tree(instance), commitment_to_byte_tree(commitment)]`,
//! preceded by the length-prefixed session identifier.
//!
//! # Usage
//! This struct is generic over:
//! - `P`: the underlying Sigma protocol ([`SigmaProtocol`] trait).
//! - `H`: the duplex sponge, [`ShakeDuplexSponge`] by default.

use core::fmt;
use core::marker::PhantomData;

use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, instrument};

use crate::byte_tree::ByteTree;
use crate::duplex_sponge::shake::ShakeDuplexSponge;
use crate::duplex_sponge::DuplexSpongeInterface;
use crate::errors::Error;
use crate::group::ZqElement;
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator};

/// A complete non-interactive transcript `(commitment, challenge, response)`.
///
/// Produced by [`Nizk::prove`]; the fields cannot be changed afterwards.
pub struct Transcript<P: SigmaProtocol> {
    commitment: P::Commitment,
    challenge: ZqElement,
    response: P::Response,
}

impl<P: SigmaProtocol> Transcript<P> {
    /// Reassemble a transcript received from a prover, e.g. for [`Nizk::verify`].
    pub fn from_parts(
        commitment: P::Commitment,
        challenge: ZqElement,
        response: P::Response,
    ) -> Self {
        Self {
            commitment,
            challenge,
            response,
        }
    }

    pub fn commitment(&self) -> &P::Commitment {
        &self.commitment
    }

    pub fn challenge(&self) -> &ZqElement {
        &self.challenge
    }

    pub fn response(&self) -> &P::Response {
        &self.response
    }

    pub fn into_parts(self) -> (P::Commitment, ZqElement, P::Response) {
        (self.commitment, self.challenge, self.response)
    }
}

impl<P> Clone for Transcript<P>
where
    P: SigmaProtocol,
    P::Commitment: Clone,
    P::Response: Clone,
{
    fn clone(&self) -> Self {
        Self {
            commitment: self.commitment.clone(),
            challenge: self.challenge.clone(),
            response: self.response.clone(),
        }
    }
}

impl<P> fmt::Debug for Transcript<P>
where
    P: SigmaProtocol,
    P::Commitment: fmt::Debug,
    P::Response: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("commitment", &self.commitment)
            .field("challenge", &self.challenge)
            .field("response", &self.response)
            .finish()
    }
}

/// A Fiat-Shamir transformation of a [`SigmaProtocol`] into a non-interactive proof.
///
/// [`Nizk`] wraps an interactive Sigma protocol `P` and a duplex sponge `H`, to
/// produce non-interactive proofs bound to a session identifier.
///
/// # Type Parameters
/// - `P`: the Sigma protocol implementation.
/// - `H`: the duplex sponge used for Fiat-Shamir.
pub struct Nizk<P, H = ShakeDuplexSponge>
where
    P: SigmaProtocol,
    H: DuplexSpongeInterface,
{
    /// Domain separator for this use of the protocol.
    pub session_id: Vec<u8>,
    /// Underlying interactive proof.
    pub interactive_proof: P,
    _sponge: PhantomData<H>,
}

impl<P, H> Nizk<P, H>
where
    P: SigmaProtocol,
    H: DuplexSpongeInterface,
{
    /// Constructs a new [`Nizk`] instance.
    ///
    /// # Parameters
    /// - `session_identifier`: Domain separation tag (e.g., election or ballot context).
    /// - `interactive_proof`: An instance of the interactive Sigma protocol.
    pub fn new(session_identifier: &[u8], interactive_proof: P) -> Self {
        Self {
            session_id: session_identifier.to_vec(),
            interactive_proof,
            _sponge: PhantomData,
        }
    }

    /// The canonical hash input for `instance` and `commitment`.
    ///
    /// # Errors
    /// - Propagates the protocol's instance encoding errors unchanged.
    pub fn challenge_input(
        &self,
        instance: &P::Instance,
        commitment: &P::Commitment,
    ) -> Result<ByteTree, Error> {
        Ok(ByteTree::node([
            self.interactive_proof.instance_to_byte_tree(instance)?,
            self.interactive_proof.commitment_to_byte_tree(commitment),
        ]))
    }

    /// The Fiat-Shamir challenge for `instance` and `commitment` in this session.
    ///
    /// # Errors
    /// - Propagates the protocol's instance encoding errors unchanged.
    pub fn challenge(
        &self,
        instance: &P::Instance,
        commitment: &P::Commitment,
    ) -> Result<ZqElement, Error> {
        Ok(self.derive_challenge(&self.challenge_input(instance, commitment)?))
    }

    fn derive_challenge(&self, hash_input: &ByteTree) -> ZqElement {
        let ring = self.interactive_proof.challenge_space();
        let mut sponge = H::new(self.interactive_proof.protocol_identifier());
        absorb_len_prefixed(&mut sponge, &self.session_id);
        sponge.absorb(&hash_input.to_bytes());
        ring.from_uniform_bytes(&sponge.squeeze(ring.uniform_bytes_len()))
    }

    /// Generates a non-interactive transcript.
    ///
    /// # Parameters
    /// - `instance`: The public statement.
    /// - `witness`: The secret witness.
    /// - `rng`: A cryptographically secure random number generator.
    ///
    /// # Errors
    /// - Propagates errors of the instance encoding, commitment and response steps.
    #[instrument(skip_all)]
    pub fn prove(
        &self,
        instance: &P::Instance,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Transcript<P>, Error> {
        let (commitment, state) = self
            .interactive_proof
            .prover_commit(instance, witness, rng)?;
        let challenge = self.challenge(instance, &commitment)?;
        let response = self.interactive_proof.prover_response(state, &challenge)?;
        Ok(Transcript {
            commitment,
            challenge,
            response,
        })
    }

    /// Verifies a transcript produced by [`Nizk::prove`].
    ///
    /// # Errors
    /// - [`Error::VerificationFailure`] if the challenge is not the hash of instance and
    ///   commitment, or the protocol's verifier rejects.
    #[instrument(skip_all)]
    pub fn verify(&self, instance: &P::Instance, transcript: &Transcript<P>) -> Result<(), Error> {
        let expected = self.challenge(instance, &transcript.commitment)?;
        if !challenges_match(&expected, &transcript.challenge) {
            debug!("challenge does not match the transcript hash");
            return Err(Error::VerificationFailure);
        }
        self.interactive_proof.verifier(
            instance,
            &transcript.commitment,
            &transcript.challenge,
            &transcript.response,
        )
    }

    /// Generates a batchable, serialized non-interactive proof.
    ///
    /// The proof is the serialized byte tree `Node[commitment, response]`; the
    /// challenge is recomputed by the verifier.
    pub fn prove_batchable(
        &self,
        instance: &P::Instance,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>, Error> {
        let transcript = self.prove(instance, witness, rng)?;
        let tree = ByteTree::node([
            self.interactive_proof
                .commitment_to_byte_tree(&transcript.commitment),
            self.interactive_proof
                .response_to_byte_tree(&transcript.response),
        ]);
        Ok(tree.to_bytes())
    }

    /// Verifies a batchable non-interactive proof.
    ///
    /// # Errors
    /// - [`Error::MalformedByteTree`] or [`Error::ElementConstruction`] if the proof
    ///   cannot be decoded.
    /// - [`Error::VerificationFailure`] if the decoded proof does not verify.
    pub fn verify_batchable(&self, instance: &P::Instance, proof: &[u8]) -> Result<(), Error> {
        let tree = ByteTree::from_bytes(proof)?;
        let [commitment, response] = tree.expect_node(2)? else {
            unreachable!("expect_node checked the arity");
        };
        let commitment = self
            .interactive_proof
            .commitment_from_byte_tree(commitment)?;
        let response = self.interactive_proof.response_from_byte_tree(response)?;
        let challenge = self.challenge(instance, &commitment)?;
        self.interactive_proof
            .verifier(instance, &commitment, &challenge, &response)
    }
}

impl<P, H> Nizk<P, H>
where
    P: SigmaProtocolSimulator,
    H: DuplexSpongeInterface,
{
    /// Generates a compact serialized proof `Node[challenge, response]`.
    ///
    /// The commitment is omitted and recomputed by the verifier.
    pub fn prove_compact(
        &self,
        instance: &P::Instance,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>, Error> {
        let transcript = self.prove(instance, witness, rng)?;
        let tree = ByteTree::node([
            transcript.challenge.to_byte_tree(),
            self.interactive_proof
                .response_to_byte_tree(&transcript.response),
        ]);
        Ok(tree.to_bytes())
    }

    /// Verifies a compact proof.
    ///
    /// Recomputes the commitment from the challenge and response, then checks that
    /// the challenge is the hash of the instance and that commitment.
    ///
    /// # Errors
    /// - [`Error::MalformedByteTree`] or [`Error::ElementConstruction`] if the proof
    ///   cannot be decoded.
    /// - [`Error::VerificationFailure`] if the recomputed challenge differs.
    pub fn verify_compact(&self, instance: &P::Instance, proof: &[u8]) -> Result<(), Error> {
        let tree = ByteTree::from_bytes(proof)?;
        let [challenge, response] = tree.expect_node(2)? else {
            unreachable!("expect_node checked the arity");
        };
        let challenge = self
            .interactive_proof
            .challenge_space()
            .from_byte_tree(challenge)?;
        let response = self.interactive_proof.response_from_byte_tree(response)?;
        let commitment =
            self.interactive_proof
                .simulate_commitment(instance, &challenge, &response)?;
        let expected = self.challenge(instance, &commitment)?;
        if !challenges_match(&expected, &challenge) {
            debug!("compact proof challenge does not match the recomputed commitment");
            return Err(Error::VerificationFailure);
        }
        self.interactive_proof
            .verifier(instance, &commitment, &challenge, &response)
    }
}

pub(crate) fn challenges_match(a: &ZqElement, b: &ZqElement) -> bool {
    let a = a.to_byte_tree();
    let b = b.to_byte_tree();
    a.as_leaf().unwrap_or_default().ct_eq(b.as_leaf().unwrap_or_default()).into()
}

fn length_to_bytes(x: usize) -> [u8; 4] {
    (x as u32).to_be_bytes()
}

fn absorb_len_prefixed<H: DuplexSpongeInterface>(sponge: &mut H, data: &[u8]) {
    sponge.absorb(&length_to_bytes(data.len()));
    sponge.absorb(data);
}
