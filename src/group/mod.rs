//! Arithmetic provider: a prime-order subgroup of `Z_p^*` and its exponent ring.

use crate::byte_tree::ByteTree;
use crate::errors::Error;

/// Multiplicative subgroup of `Z_p^*` for a safe prime modulus.
pub mod modp;

/// The ring `Z_q` of exponents, used as challenge space.
pub mod ring;

/// Implementation of batch serialization functions for scalars and elements.
pub mod serialization;

pub use modp::{ModPGroup, ModPGroupElement};
pub use ring::{ZqElement, ZqRing};

/// The capability a group must offer to turn fixed-width byte strings into elements.
///
/// ## Minimal Implementation
/// - `modulus_byte_length`: width in bytes of a canonical element encoding.
/// - `to_element`: decode a leaf of exactly that width, or fail.
pub trait PGroup {
    type Element;

    /// Number of bytes needed to hold the modulus, and thus any element.
    fn modulus_byte_length(&self) -> usize;

    /// Interpret a byte tree leaf as a group element.
    ///
    /// # Errors
    /// - [`Error::ElementConstruction`] if the bytes do not denote an element.
    fn to_element(&self, tree: &ByteTree) -> Result<Self::Element, Error>;
}
