//! # Encoding: decimal statement values to bytes and group elements.
//!
//! Statement values often arrive as decimal text (e.g. from an election record).
//! This module converts them, deterministically and without loss, into:
//! - lowercase hexadecimal text ([`decimal_to_hex`]),
//! - a minimal big-endian byte string ([`decimal_to_bytes`]),
//! - a fixed-width byte tree leaf ([`decimal_to_fixed_byte_tree`]),
//! - an element of a group ([`decimal_to_group_element`]).
//!
//! Values that do not fit the requested width are refused with
//! [`Error::Oversize`]; they are never truncated.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::byte_tree::ByteTree;
use crate::errors::Error;
use crate::group::PGroup;

/// A non-negative integer given either as decimal text or as a native integer.
pub trait DecimalInput {
    /// Parse or convert the value.
    ///
    /// # Errors
    /// - [`Error::InvalidDecimal`] if text is not an unsigned decimal integer.
    fn to_biguint(&self) -> Result<BigUint, Error>;
}

impl DecimalInput for &str {
    fn to_biguint(&self) -> Result<BigUint, Error> {
        parse_decimal(self)
    }
}

impl DecimalInput for String {
    fn to_biguint(&self) -> Result<BigUint, Error> {
        parse_decimal(self)
    }
}

impl DecimalInput for &String {
    fn to_biguint(&self) -> Result<BigUint, Error> {
        parse_decimal(self)
    }
}

impl DecimalInput for BigUint {
    fn to_biguint(&self) -> Result<BigUint, Error> {
        Ok(self.clone())
    }
}

impl DecimalInput for &BigUint {
    fn to_biguint(&self) -> Result<BigUint, Error> {
        Ok((*self).clone())
    }
}

macro_rules! impl_decimal_input_for_uint {
    ($($t:ty),*) => {$(
        impl DecimalInput for $t {
            fn to_biguint(&self) -> Result<BigUint, Error> {
                Ok(BigUint::from(*self))
            }
        }
    )*};
}

impl_decimal_input_for_uint!(u8, u16, u32, u64, u128, usize);

/// Parse unsigned decimal text.
///
/// The empty string denotes zero. Signs, whitespace, radix prefixes and
/// fractional parts are rejected; see [`strip_whitespace`] for normalizing input.
///
/// # Errors
/// - [`Error::InvalidDecimal`] if `text` contains anything but ASCII digits.
pub fn parse_decimal(text: &str) -> Result<BigUint, Error> {
    if text.is_empty() {
        return Ok(BigUint::zero());
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidDecimal {
            input: text.to_owned(),
        });
    }
    BigUint::parse_bytes(text.as_bytes(), 10).ok_or_else(|| Error::InvalidDecimal {
        input: text.to_owned(),
    })
}

/// Lowercase hexadecimal digits of `value`, without sign or leading zeros.
///
/// Zero is `"0"`.
pub fn decimal_to_hex(value: impl DecimalInput) -> Result<String, Error> {
    Ok(value.to_biguint()?.to_str_radix(16))
}

/// Minimal big-endian bytes of `value`; zero is the single byte `0x00`.
pub fn decimal_to_bytes(value: impl DecimalInput) -> Result<Vec<u8>, Error> {
    let mut digits = decimal_to_hex(value)?;
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    hex::decode(&digits).map_err(|_| Error::InvalidDecimal { input: digits })
}

/// Encode `value` as a byte tree leaf of exactly `target_length` bytes.
///
/// The encoding is big-endian, left-padded with zero bytes. A value whose minimal
/// encoding is exactly `target_length` bytes long is accepted.
///
/// # Errors
/// - [`Error::InvalidDecimal`] if `value` is not an unsigned decimal integer.
/// - [`Error::Oversize`] if the minimal encoding needs more than `target_length` bytes.
pub fn decimal_to_fixed_byte_tree(
    value: impl DecimalInput,
    target_length: usize,
) -> Result<ByteTree, Error> {
    let bytes = decimal_to_bytes(value)?;
    if bytes.len() > target_length {
        debug!(
            length = bytes.len(),
            target = target_length,
            "value too large for fixed-width encoding"
        );
        return Err(Error::Oversize {
            length: bytes.len(),
            target: target_length,
        });
    }
    let mut padded = vec![0u8; target_length - bytes.len()];
    padded.extend_from_slice(&bytes);
    Ok(ByteTree::Leaf(padded))
}

/// Decode `value` as an element of `group`.
///
/// The value is first encoded at the group's modulus byte length, then handed to
/// [`PGroup::to_element`].
///
/// # Errors
/// - [`Error::InvalidDecimal`] if `value` is not an unsigned decimal integer.
/// - [`Error::Oversize`] if `value` needs more bytes than the modulus.
/// - [`Error::ElementConstruction`] if the padded bytes are not a group element.
pub fn decimal_to_group_element<G: PGroup>(
    value: impl DecimalInput,
    group: &G,
) -> Result<G::Element, Error> {
    let tree = decimal_to_fixed_byte_tree(value, group.modulus_byte_length())?;
    group.to_element(&tree).inspect_err(|err| {
        debug!(%err, "decimal value is not a group element");
    })
}

/// Remove every space, tab and newline from `text`.
pub fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n'))
        .collect()
}
