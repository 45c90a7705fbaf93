use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::byte_tree::ByteTree;
use crate::errors::{ElementConstructionError, Error};

/// Extra bytes squeezed before reduction so that the result is statistically close to uniform.
const REDUCTION_SLACK: usize = 16;

#[derive(Debug)]
struct RingParams {
    order: BigUint,
    byte_length: usize,
}

/// The ring of integers modulo `q`.
///
/// Cloning is cheap: the parameters are shared.
#[derive(Clone, Debug)]
pub struct ZqRing(Arc<RingParams>);

impl PartialEq for ZqRing {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.order == other.0.order
    }
}

impl Eq for ZqRing {}

impl ZqRing {
    /// Create the ring `Z_q`.
    ///
    /// # Errors
    /// - [`Error::InvalidGroupParameters`] if `order < 2`.
    pub fn new(order: BigUint) -> Result<Self, Error> {
        if order < BigUint::from(2u8) {
            return Err(Error::InvalidGroupParameters {
                message: "ring order must be at least 2".into(),
            });
        }
        let byte_length = (order.bits() as usize).div_ceil(8);
        Ok(Self(Arc::new(RingParams { order, byte_length })))
    }

    pub fn order(&self) -> &BigUint {
        &self.0.order
    }

    /// Width in bytes of a canonical element encoding.
    pub fn byte_length(&self) -> usize {
        self.0.byte_length
    }

    pub fn zero(&self) -> ZqElement {
        self.element(BigUint::zero())
    }

    pub fn one(&self) -> ZqElement {
        self.element(BigUint::one())
    }

    /// The residue class of `value`.
    pub fn element(&self, value: BigUint) -> ZqElement {
        ZqElement {
            value: value % self.order(),
            ring: self.clone(),
        }
    }

    /// Reduce a big-endian byte string modulo `q`.
    pub fn from_uniform_bytes(&self, bytes: &[u8]) -> ZqElement {
        self.element(BigUint::from_bytes_be(bytes))
    }

    /// Number of uniform bytes to feed [`ZqRing::from_uniform_bytes`].
    pub fn uniform_bytes_len(&self) -> usize {
        self.byte_length() + REDUCTION_SLACK
    }

    /// Sample a uniformly random element.
    pub fn random(&self, rng: &mut (impl RngCore + CryptoRng)) -> ZqElement {
        let mut bytes = vec![0u8; self.uniform_bytes_len()];
        rng.fill_bytes(&mut bytes);
        self.from_uniform_bytes(&bytes)
    }

    /// Decode a canonical leaf produced by [`ZqElement::to_byte_tree`].
    ///
    /// # Errors
    /// - [`Error::ElementConstruction`] for nodes, wrong widths, or non-reduced values.
    pub fn from_byte_tree(&self, tree: &ByteTree) -> Result<ZqElement, Error> {
        let bytes = tree.as_leaf().ok_or(ElementConstructionError::NotALeaf)?;
        if bytes.len() != self.byte_length() {
            return Err(ElementConstructionError::WrongLength {
                expected: self.byte_length(),
                actual: bytes.len(),
            }
            .into());
        }
        let value = BigUint::from_bytes_be(bytes);
        if &value >= self.order() {
            return Err(ElementConstructionError::OutOfRange.into());
        }
        Ok(ZqElement {
            value,
            ring: self.clone(),
        })
    }
}

/// An element of [`ZqRing`].
#[derive(Clone, PartialEq, Eq)]
pub struct ZqElement {
    value: BigUint,
    ring: ZqRing,
}

impl ZqElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn ring(&self) -> &ZqRing {
        &self.ring
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Fixed-width big-endian leaf.
    pub fn to_byte_tree(&self) -> ByteTree {
        ByteTree::Leaf(fixed_width_be(&self.value, self.ring.byte_length()))
    }
}

impl fmt::Debug for ZqElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZqElement({:#x})", self.value)
    }
}

/// Big-endian bytes of `value`, left-padded with zeros to `width`.
///
/// The caller guarantees that `value` fits.
pub(crate) fn fixed_width_be(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    };
    debug_assert!(bytes.len() <= width);
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

impl Add<&ZqElement> for &ZqElement {
    type Output = ZqElement;

    fn add(self, rhs: &ZqElement) -> ZqElement {
        debug_assert!(self.ring == rhs.ring);
        self.ring.element(&self.value + &rhs.value)
    }
}

impl Sub<&ZqElement> for &ZqElement {
    type Output = ZqElement;

    fn sub(self, rhs: &ZqElement) -> ZqElement {
        debug_assert!(self.ring == rhs.ring);
        // Both operands are reduced, so adding q keeps the difference non-negative.
        self.ring
            .element(&self.value + self.ring.order() - &rhs.value)
    }
}

impl Mul<&ZqElement> for &ZqElement {
    type Output = ZqElement;

    fn mul(self, rhs: &ZqElement) -> ZqElement {
        debug_assert!(self.ring == rhs.ring);
        self.ring.element(&self.value * &rhs.value)
    }
}

impl Neg for &ZqElement {
    type Output = ZqElement;

    fn neg(self) -> ZqElement {
        &self.ring.zero() - self
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait<ZqElement> for ZqElement {
            type Output = ZqElement;

            fn $method(self, rhs: ZqElement) -> ZqElement {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&ZqElement> for ZqElement {
            type Output = ZqElement;

            fn $method(self, rhs: &ZqElement) -> ZqElement {
                (&self).$method(rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> ZqRing {
        ZqRing::new(BigUint::from(1019u32)).unwrap()
    }

    #[test]
    fn arithmetic_wraps() {
        let r = ring();
        let a = r.element(BigUint::from(1000u32));
        let b = r.element(BigUint::from(30u32));
        assert_eq!((&a + &b).value(), &BigUint::from(11u32));
        assert_eq!((&b - &a).value(), &BigUint::from(49u32));
        assert_eq!((&a * &b).value(), &BigUint::from(30000u32 % 1019));
        assert!((&a + &(-&a)).is_zero());
    }

    #[test]
    fn byte_tree_round_trip() {
        let r = ring();
        let a = r.element(BigUint::from(5u32));
        let tree = a.to_byte_tree();
        assert_eq!(tree.as_leaf().unwrap(), &[0x00, 0x05]);
        assert_eq!(r.from_byte_tree(&tree).unwrap(), a);
    }

    #[test]
    fn from_byte_tree_rejects_unreduced() {
        let r = ring();
        let err = r.from_byte_tree(&ByteTree::leaf(vec![0x03, 0xfb])).unwrap_err();
        assert!(matches!(
            err,
            Error::ElementConstruction(ElementConstructionError::OutOfRange)
        ));
        assert!(r.from_byte_tree(&ByteTree::leaf(vec![0x01])).is_err());
    }

    #[test]
    fn rejects_trivial_order() {
        assert!(ZqRing::new(BigUint::one()).is_err());
    }
}
