//! Generic interface for 3-message Sigma protocols.
//!
//! This module defines the [`SigmaProtocol`] and [`SigmaProtocolSimulator`] traits,
//! used to describe interactive zero-knowledge proofs of knowledge,
//! such as Schnorr proofs, that follow the 3-message Sigma protocol structure.
//!
//! The public statement (the *instance*) is passed to every call rather than stored
//! in the protocol, so one protocol value can be reused across statements of the
//! same shape. Challenges live in a [`ZqRing`].

use crate::byte_tree::ByteTree;
use crate::errors::Error;
use crate::group::{ZqElement, ZqRing};
use rand::{CryptoRng, RngCore};

/// A trait defining the behavior of a generic Sigma protocol.
///
/// A Sigma protocol is a 3-message proof protocol where a prover can convince
/// a verifier of knowledge of a witness for a given public statement
/// without revealing the witness.
///
/// ## Associated Types
/// - `Instance`: The public statement.
/// - `Witness`: The prover's secret knowledge.
/// - `Commitment`: The prover's initial commitment.
/// - `ProverState`: The prover's internal state needed to compute a response.
/// - `Response`: The prover's response to a verifier's challenge.
///
/// The challenge is always an element of [`SigmaProtocol::challenge_space`].
///
/// ## Minimal Implementation
/// Types implementing [`SigmaProtocol`] must define:
/// - `prover_commit`: Generates a commitment and internal state.
/// - `prover_response`: Computes a response to a challenge.
/// - `verifier`: Verifies a full transcript `(commitment, challenge, response)`.
///
/// ## Serialization
/// Every message has a canonical [`ByteTree`] form, which is what gets hashed by
/// the Fiat-Shamir transform and what gets transmitted:
/// - `instance_to_byte_tree`
/// - `commitment_to_byte_tree` / `commitment_from_byte_tree`
/// - `response_to_byte_tree` / `response_from_byte_tree`
///
/// ## Identification
/// - `protocol_identifier`: A fixed identifier of the protocol, used for domain separation.
pub trait SigmaProtocol {
    type Instance;
    type Witness;
    type Commitment;
    type ProverState;
    type Response;

    /// The ring challenges and responses are drawn from.
    fn challenge_space(&self) -> &ZqRing;

    /// First step of the protocol. Given the instance, the witness and RNG, this generates:
    /// - A public commitment to send to the verifier.
    /// - The internal state to use when computing the response.
    fn prover_commit(
        &self,
        instance: &Self::Instance,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState), Error>;

    /// Computes the prover's response to a challenge based on the prover state.
    fn prover_response(
        &self,
        state: Self::ProverState,
        challenge: &ZqElement,
    ) -> Result<Self::Response, Error>;

    /// Final step of the protocol: checks that the commitment, challenge, and response
    /// form a valid transcript for `instance`.
    ///
    /// Returns:
    /// - `Ok(())` if the transcript is valid.
    /// - `Err(Error::VerificationFailure)` otherwise.
    fn verifier(
        &self,
        instance: &Self::Instance,
        commitment: &Self::Commitment,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<(), Error>;

    /// Canonical encoding of an instance, bound into the Fiat-Shamir challenge.
    ///
    /// # Errors
    /// - [`Error::MalformedInstance`] if the instance does not have the expected shape.
    fn instance_to_byte_tree(&self, instance: &Self::Instance) -> Result<ByteTree, Error>;

    fn commitment_to_byte_tree(&self, commitment: &Self::Commitment) -> ByteTree;

    fn commitment_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Commitment, Error>;

    fn response_to_byte_tree(&self, response: &Self::Response) -> ByteTree;

    fn response_from_byte_tree(&self, tree: &ByteTree) -> Result<Self::Response, Error>;

    fn protocol_identifier(&self) -> [u8; 32];
}

/// A trait defining the behavior of a Sigma protocol for which simulation of transcripts is necessary.
///
/// Every Sigma protocol can be simulated, but in practice, this is primarily used
/// for proving security properties (zero-knowledge, soundness, etc.).
///
/// OR compositions require simulation capabilities during actual proof generation:
/// every branch the prover has no witness for is simulated.
///
/// ## Minimal Implementation
/// Types implementing [`SigmaProtocolSimulator`] must define:
/// - `simulate_response`
/// - `simulate_commitment`
/// - `simulate_transcript`
#[allow(clippy::type_complexity)]
pub trait SigmaProtocolSimulator: SigmaProtocol {
    /// Generates a random response (e.g. for simulation or OR composition).
    fn simulate_response(&self, rng: &mut (impl RngCore + CryptoRng)) -> Self::Response;

    /// Computes the commitment for which `(commitment, challenge, response)` is a valid
    /// transcript for `instance`.
    ///
    /// This function allows to omit commitment in compact proofs of the type ('challenge', 'response').
    fn simulate_commitment(
        &self,
        instance: &Self::Instance,
        challenge: &ZqElement,
        response: &Self::Response,
    ) -> Result<Self::Commitment, Error>;

    /// Generates a full simulated transcript (commitment, challenge, response)
    /// without requiring knowledge of a witness.
    fn simulate_transcript(
        &self,
        instance: &Self::Instance,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, ZqElement, Self::Response), Error>;
}

/// Zero-pad a short label into a 32-byte protocol identifier.
///
/// Labels longer than 32 bytes are cut at 32 bytes.
pub const fn pad_identifier(label: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < label.len() && i < out.len() {
        out[i] = label[i];
        i += 1;
    }
    out
}
