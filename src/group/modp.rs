use core::fmt;
use core::ops::Mul;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use super::ring::{fixed_width_be, ZqElement, ZqRing};
use super::PGroup;
use crate::byte_tree::ByteTree;
use crate::errors::{ElementConstructionError, Error};

#[derive(Debug)]
struct GroupParams {
    modulus: BigUint,
    generator: BigUint,
    byte_length: usize,
    exponents: ZqRing,
}

/// The subgroup of quadratic residues of `Z_p^*`, for a safe prime `p = 2q + 1`.
///
/// The subgroup has prime order `q`; its exponent ring `Z_q` is the challenge
/// space of every Sigma protocol over it. Cloning is cheap: parameters are shared.
#[derive(Clone, Debug)]
pub struct ModPGroup(Arc<GroupParams>);

impl PartialEq for ModPGroup {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.modulus == other.0.modulus && self.0.generator == other.0.generator)
    }
}

impl Eq for ModPGroup {}

impl ModPGroup {
    /// Build the group from a safe prime modulus and a generator of the residue subgroup.
    ///
    /// Primality of `p` and `q` is trusted, not tested.
    ///
    /// # Errors
    /// - [`Error::InvalidGroupParameters`] if `p` is not an odd integer above 5 of the
    ///   form `2q + 1`, or `generator` is not a non-trivial quadratic residue.
    pub fn new(modulus: BigUint, generator: BigUint) -> Result<Self, Error> {
        let invalid = |message: &str| Error::InvalidGroupParameters {
            message: message.into(),
        };
        if modulus <= BigUint::from(5u8) || (&modulus % 2u32).is_zero() {
            return Err(invalid("modulus must be an odd prime above 5"));
        }
        let order: BigUint = (&modulus - 1u32) >> 1usize;
        if generator <= BigUint::one() || generator >= modulus {
            return Err(invalid("generator out of range"));
        }
        if !generator.modpow(&order, &modulus).is_one() {
            return Err(invalid("generator is not a quadratic residue"));
        }
        let byte_length = (modulus.bits() as usize).div_ceil(8);
        let exponents = ZqRing::new(order)?;
        Ok(Self(Arc::new(GroupParams {
            modulus,
            generator,
            byte_length,
            exponents,
        })))
    }

    pub fn modulus(&self) -> &BigUint {
        &self.0.modulus
    }

    /// Order `q` of the subgroup.
    pub fn order(&self) -> &BigUint {
        self.0.exponents.order()
    }

    /// The exponent ring `Z_q`, which doubles as challenge space.
    pub fn scalar_ring(&self) -> &ZqRing {
        &self.0.exponents
    }

    pub fn generator(&self) -> ModPGroupElement {
        self.wrap(self.0.generator.clone())
    }

    pub fn identity(&self) -> ModPGroupElement {
        self.wrap(BigUint::one())
    }

    /// `g^exponent`.
    pub fn exp_generator(&self, exponent: &ZqElement) -> ModPGroupElement {
        self.generator().exp(exponent)
    }

    /// Check that `value` is a subgroup element and wrap it.
    ///
    /// # Errors
    /// - [`Error::ElementConstruction`] if `value` is zero, not below `p`, or not a
    ///   quadratic residue.
    pub fn element(&self, value: BigUint) -> Result<ModPGroupElement, Error> {
        if value.is_zero() {
            return Err(ElementConstructionError::Zero.into());
        }
        if &value >= self.modulus() {
            return Err(ElementConstructionError::OutOfRange.into());
        }
        if !value.modpow(self.order(), self.modulus()).is_one() {
            return Err(ElementConstructionError::NotInSubgroup.into());
        }
        Ok(self.wrap(value))
    }

    fn wrap(&self, value: BigUint) -> ModPGroupElement {
        ModPGroupElement {
            value,
            group: self.clone(),
        }
    }
}

impl PGroup for ModPGroup {
    type Element = ModPGroupElement;

    fn modulus_byte_length(&self) -> usize {
        self.0.byte_length
    }

    fn to_element(&self, tree: &ByteTree) -> Result<ModPGroupElement, Error> {
        let bytes = tree.as_leaf().ok_or(ElementConstructionError::NotALeaf)?;
        if bytes.len() != self.modulus_byte_length() {
            debug!(
                expected = self.modulus_byte_length(),
                actual = bytes.len(),
                "rejecting element of wrong width"
            );
            return Err(ElementConstructionError::WrongLength {
                expected: self.modulus_byte_length(),
                actual: bytes.len(),
            }
            .into());
        }
        self.element(BigUint::from_bytes_be(bytes))
    }
}

/// An element of a [`ModPGroup`].
#[derive(Clone, PartialEq, Eq)]
pub struct ModPGroupElement {
    value: BigUint,
    group: ModPGroup,
}

impl ModPGroupElement {
    /// The integer representative in `[1, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn group(&self) -> &ModPGroup {
        &self.group
    }

    pub fn is_identity(&self) -> bool {
        self.value.is_one()
    }

    /// `self^exponent`.
    pub fn exp(&self, exponent: &ZqElement) -> ModPGroupElement {
        self.group
            .wrap(self.value.modpow(exponent.value(), self.group.modulus()))
    }

    /// Multiplicative inverse, computed as `self^(q-1)`.
    pub fn inverse(&self) -> ModPGroupElement {
        let exponent = self.group.order() - 1u32;
        self.group
            .wrap(self.value.modpow(&exponent, self.group.modulus()))
    }

    /// Fixed-width big-endian leaf, decodable by [`PGroup::to_element`].
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::Leaf(fixed_width_be(&self.value, self.group.modulus_byte_length()))
    }
}

impl fmt::Debug for ModPGroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModPGroupElement({:#x})", self.value)
    }
}

impl Mul<&ModPGroupElement> for &ModPGroupElement {
    type Output = ModPGroupElement;

    fn mul(self, rhs: &ModPGroupElement) -> ModPGroupElement {
        debug_assert!(self.group == rhs.group);
        self.group
            .wrap((&self.value * &rhs.value) % self.group.modulus())
    }
}

impl Mul<ModPGroupElement> for ModPGroupElement {
    type Output = ModPGroupElement;

    fn mul(self, rhs: ModPGroupElement) -> ModPGroupElement {
        &self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> ModPGroup {
        ModPGroup::new(BigUint::from(2039u32), BigUint::from(4u32)).unwrap()
    }

    #[test]
    fn parameters() {
        let g = group();
        assert_eq!(g.order(), &BigUint::from(1019u32));
        assert_eq!(g.modulus_byte_length(), 2);
        assert_eq!(g.scalar_ring().byte_length(), 2);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(ModPGroup::new(BigUint::from(2040u32), BigUint::from(4u32)).is_err());
        assert!(ModPGroup::new(BigUint::from(2039u32), BigUint::from(7u32)).is_err());
        assert!(ModPGroup::new(BigUint::from(2039u32), BigUint::one()).is_err());
    }

    #[test]
    fn exponent_laws() {
        let g = group();
        let ring = g.scalar_ring();
        let a = ring.element(BigUint::from(123u32));
        let b = ring.element(BigUint::from(900u32));
        let lhs = g.exp_generator(&(&a + &b));
        let rhs = &g.exp_generator(&a) * &g.exp_generator(&b);
        assert_eq!(lhs, rhs);
        let x = g.exp_generator(&a);
        assert!((&x * &x.inverse()).is_identity());
    }

    #[test]
    fn decoding_errors_are_typed() {
        let g = group();
        let err = |bytes: Vec<u8>| match g.to_element(&ByteTree::leaf(bytes)) {
            Err(Error::ElementConstruction(kind)) => kind,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(err(vec![0x00, 0x00]), ElementConstructionError::Zero);
        assert_eq!(err(vec![0x07, 0xf7]), ElementConstructionError::OutOfRange);
        assert_eq!(err(vec![0x00, 0x07]), ElementConstructionError::NotInSubgroup);
        assert_eq!(
            err(vec![0x04]),
            ElementConstructionError::WrongLength {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(g.to_element(&ByteTree::leaf(vec![0x00, 0x04])).unwrap(), g.generator());
    }
}
