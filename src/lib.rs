//! # Disjunctive Sigma Proofs over `Z_p^*`
//!
//! This crate proves, in zero knowledge, that a prover knows a witness for at least
//! one of several Schnorr-type statements, without revealing which one. A typical
//! use is showing that an ElGamal ciphertext encrypts `0` or `1`.
//!
//! The building blocks are:
//! - [`ByteTree`]: the canonical tree encoding of all hashed and transmitted values.
//! - [`encoding`]: decimal statement values to hex, bytes, byte trees and group elements.
//! - [`group`]: a safe-prime group [`ModPGroup`] and its exponent ring [`ZqRing`].
//! - [`SchnorrProof`]: proofs of a common exponent of a tuple of group elements.
//! - [`OrProof`]: the disjunction of any number of simulatable Sigma protocols.
//! - [`Nizk`]: the Fiat-Shamir transform over a [`duplex_sponge`].
//!
//! ```rust
//! use num_bigint::BigUint;
//! use rand::rngs::OsRng;
//! use sigma_or_proofs::{
//!     positional_instance_encoding, ModPGroup, OrWitness, SchnorrProof, SigmaComposer,
//! };
//!
//! let group = ModPGroup::new(BigUint::from(2039u32), BigUint::from(4u32)).unwrap();
//! let ring = group.scalar_ring();
//! let x = ring.random(&mut OsRng);
//!
//! let proofs = vec![SchnorrProof::discrete_logarithm(&group); 2];
//! let instances = vec![
//!     vec![group.exp_generator(&ring.random(&mut OsRng))],
//!     vec![group.exp_generator(&x)],
//! ];
//!
//! let composer: SigmaComposer = SigmaComposer::new(b"example session", ring.clone());
//! let witness = OrWitness::new(1, x);
//! let transcript = composer
//!     .prove_or(&proofs, positional_instance_encoding, &instances, &witness, &mut OsRng)
//!     .unwrap();
//! composer
//!     .verify_or(&proofs, positional_instance_encoding, &instances, &transcript)
//!     .unwrap();
//! ```

pub mod byte_tree;
pub mod composition;
pub mod duplex_sponge;
pub mod encoding;
pub mod errors;
pub mod fiat_shamir;
pub mod group;
pub mod schnorr_protocol;
pub mod traits;

#[doc(hidden)]
pub mod test_utils;

pub use byte_tree::ByteTree;
pub use composition::{
    positional_instance_encoding, representative_instance_encoding, InstanceEncoding, OrProof,
    OrResponse, OrWitness, SigmaComposer,
};
pub use encoding::{
    decimal_to_bytes, decimal_to_fixed_byte_tree, decimal_to_group_element, decimal_to_hex,
    strip_whitespace, DecimalInput,
};
pub use errors::{ElementConstructionError, Error};
pub use fiat_shamir::{Nizk, Transcript};
pub use group::{ModPGroup, ModPGroupElement, PGroup, ZqElement, ZqRing};
pub use schnorr_protocol::SchnorrProof;
pub use traits::{SigmaProtocol, SigmaProtocolSimulator};
