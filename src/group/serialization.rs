//! Serialization and deserialization utilities for group elements and scalars.
//!
//! This module converts slices of group elements and ring elements to and from
//! byte tree nodes holding one fixed-width leaf per value.

use super::{ModPGroup, ModPGroupElement, PGroup, ZqElement, ZqRing};
use crate::byte_tree::ByteTree;
use crate::errors::Error;

/// Serialize group elements into a node of fixed-width leaves.
///
/// # Parameters
/// - `elements`: the group elements to serialize, in order.
///
/// # Returns
/// - A [`ByteTree::Node`] with one leaf per element.
pub fn serialize_elements<'a>(
    elements: impl IntoIterator<Item = &'a ModPGroupElement>,
) -> ByteTree {
    ByteTree::node(elements.into_iter().map(ModPGroupElement::to_byte_tree))
}

/// Deserialize a node of `count` leaves into group elements.
///
/// # Parameters
/// - `group`: the group the elements belong to.
/// - `tree`: a node produced by [`serialize_elements`].
/// - `count`: the number of elements expected.
///
/// # Errors
/// - [`Error::MalformedByteTree`] if `tree` is not a node of `count` children.
/// - [`Error::ElementConstruction`] if any leaf is not a group element.
pub fn deserialize_elements(
    group: &ModPGroup,
    tree: &ByteTree,
    count: usize,
) -> Result<Vec<ModPGroupElement>, Error> {
    tree.expect_node(count)?
        .iter()
        .map(|leaf| group.to_element(leaf))
        .collect()
}

/// Serialize scalars into a node of fixed-width leaves.
pub fn serialize_scalars<'a>(scalars: impl IntoIterator<Item = &'a ZqElement>) -> ByteTree {
    ByteTree::node(scalars.into_iter().map(ZqElement::to_byte_tree))
}

/// Deserialize a node of `count` leaves into scalars.
///
/// # Errors
/// - [`Error::MalformedByteTree`] if `tree` is not a node of `count` children.
/// - [`Error::ElementConstruction`] if any leaf is not a reduced scalar.
pub fn deserialize_scalars(
    ring: &ZqRing,
    tree: &ByteTree,
    count: usize,
) -> Result<Vec<ZqElement>, Error> {
    tree.expect_node(count)?
        .iter()
        .map(|leaf| ring.from_byte_tree(leaf))
        .collect()
}
