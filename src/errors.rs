//! # Error: Error Types for Disjunctive Sigma Proofs.
//!
//! This module defines the [`Error`] enum, which enumerates the possible failure modes
//! encountered while encoding statement values, decoding group elements, or running
//! interactive and non-interactive Sigma protocols.
//!
//! These errors include:
//! - Failed proof verification,
//! - Decimal values too large for the requested fixed-width encoding,
//! - Byte strings that do not denote a valid group element,
//! - Structurally malformed instances or byte trees.

/// Represents an invalid instance error.
#[derive(Debug, thiserror::Error)]
#[error("Invalid instance: {message}")]
pub struct InvalidInstance {
    /// The error message describing what's invalid about the instance.
    pub message: String,
}

impl InvalidInstance {
    /// Create a new InvalidInstance error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<InvalidInstance> for Error {
    fn from(err: InvalidInstance) -> Self {
        Error::MalformedInstance {
            message: err.message,
        }
    }
}

/// The reason a correctly framed byte string was refused as a group element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementConstructionError {
    /// The byte tree is a node, not a leaf.
    #[error("expected a byte tree leaf")]
    NotALeaf,
    /// The leaf does not have the group's element byte length.
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    /// The integer is not smaller than the modulus.
    #[error("value is not smaller than the modulus")]
    OutOfRange,
    /// Zero is never a unit.
    #[error("zero is not a group element")]
    Zero,
    /// The integer is a unit but not a quadratic residue.
    #[error("value is not in the prime-order subgroup")]
    NotInSubgroup,
}

/// Represents an error encountered while encoding values or executing a Sigma protocol.
///
/// This may occur during statement decoding, proof generation, response computation,
/// or verification.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proof is invalid: verification failed.
    #[error("Verification failed.")]
    VerificationFailure,
    /// Indicates an invalid statement/witness pair
    #[error("Invalid instance/witness pair.")]
    InvalidInstanceWitnessPair,
    /// The instance does not have the shape the protocol expects.
    #[error("Malformed instance: {message}")]
    MalformedInstance {
        /// What is wrong with the instance.
        message: String,
    },
    /// The minimal big-endian encoding of a value is longer than the requested width.
    #[error("Number is too big for encoding: needs {length} bytes, target is {target}")]
    Oversize {
        /// Bytes needed by the minimal encoding.
        length: usize,
        /// Requested fixed width.
        target: usize,
    },
    /// A byte string of the right framing does not denote a group element.
    #[error("Invalid group element: {0}")]
    ElementConstruction(#[from] ElementConstructionError),
    /// The text is not an unsigned decimal integer.
    #[error("Not an unsigned decimal integer: {input:?}")]
    InvalidDecimal {
        /// The rejected input.
        input: String,
    },
    /// A serialized byte tree could not be parsed.
    #[error("Malformed byte tree: {message}")]
    MalformedByteTree {
        /// Where parsing stopped.
        message: String,
    },
    /// The modulus or generator do not describe a usable group.
    #[error("Invalid group parameters: {message}")]
    InvalidGroupParameters {
        /// What is wrong with the parameters.
        message: String,
    },
    /// Composed protocols must draw challenges from one ring.
    #[error("Sub-protocols do not share a challenge space.")]
    ChallengeSpaceMismatch,
}

impl Error {
    pub(crate) fn malformed_tree(message: impl Into<String>) -> Self {
        Error::MalformedByteTree {
            message: message.into(),
        }
    }
}
