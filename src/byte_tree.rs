//! # ByteTree: canonical recursive byte encoding.
//!
//! A [`ByteTree`] is either a leaf holding a byte string or a node holding an
//! ordered list of byte trees. It is the canonical input to the Fiat-Shamir hash,
//! so both the bytes and the nesting are significant.
//!
//! The wire format is the one used by Verificatum-style verifiers:
//! - leaf: `0x01 || len (u32, big-endian) || bytes`
//! - node: `0x00 || count (u32, big-endian) || child_0 || ... || child_{count-1}`

use crate::errors::Error;

const NODE_TAG: u8 = 0x00;
const LEAF_TAG: u8 = 0x01;
const HEADER_LEN: usize = 5;
const MAX_DEPTH: usize = 64;

/// A leaf of bytes or an ordered node of sub-trees.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ByteTree {
    Leaf(Vec<u8>),
    Node(Vec<ByteTree>),
}

impl ByteTree {
    /// Create a leaf holding `data`.
    pub fn leaf(data: impl Into<Vec<u8>>) -> Self {
        ByteTree::Leaf(data.into())
    }

    /// Create a node from the given children, in order.
    pub fn node(children: impl IntoIterator<Item = ByteTree>) -> Self {
        ByteTree::Node(children.into_iter().collect())
    }

    /// Returns the bytes of a leaf, or `None` for a node.
    pub fn as_leaf(&self) -> Option<&[u8]> {
        match self {
            ByteTree::Leaf(data) => Some(data),
            ByteTree::Node(_) => None,
        }
    }

    /// Returns the children of a node, or `None` for a leaf.
    pub fn children(&self) -> Option<&[ByteTree]> {
        match self {
            ByteTree::Leaf(_) => None,
            ByteTree::Node(children) => Some(children),
        }
    }

    /// Returns the children of a node that must have exactly `count` children.
    ///
    /// # Errors
    /// - [`Error::MalformedByteTree`] if `self` is a leaf or has another arity.
    pub fn expect_node(&self, count: usize) -> Result<&[ByteTree], Error> {
        match self {
            ByteTree::Node(children) if children.len() == count => Ok(children),
            ByteTree::Node(children) => Err(Error::malformed_tree(format!(
                "expected {count} children, found {}",
                children.len()
            ))),
            ByteTree::Leaf(_) => Err(Error::malformed_tree("expected a node, found a leaf")),
        }
    }

    /// Returns true when both trees have the same nesting and the same leaf lengths.
    ///
    /// Leaf contents are ignored: two encodings of different group elements of the
    /// same group have the same shape.
    pub fn same_shape(&self, other: &ByteTree) -> bool {
        match (self, other) {
            (ByteTree::Leaf(a), ByteTree::Leaf(b)) => a.len() == b.len(),
            (ByteTree::Node(a), ByteTree::Node(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }

    /// Number of bytes of the serialized form.
    pub fn encoded_len(&self) -> usize {
        match self {
            ByteTree::Leaf(data) => HEADER_LEN + data.len(),
            ByteTree::Node(children) => {
                HEADER_LEN + children.iter().map(ByteTree::encoded_len).sum::<usize>()
            }
        }
    }

    /// Serialize the tree into its canonical byte representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut Vec<u8>) {
        match self {
            ByteTree::Leaf(data) => {
                out.push(LEAF_TAG);
                out.extend_from_slice(&(data.len() as u32).to_be_bytes());
                out.extend_from_slice(data);
            }
            ByteTree::Node(children) => {
                out.push(NODE_TAG);
                out.extend_from_slice(&(children.len() as u32).to_be_bytes());
                for child in children {
                    child.write_into(out);
                }
            }
        }
    }

    /// Parse a complete serialized byte tree.
    ///
    /// # Errors
    /// - [`Error::MalformedByteTree`] on unknown tags, truncated input, nesting deeper
    ///   than the supported limit, or trailing bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut cursor = data;
        let tree = Self::read_from(&mut cursor, 0)?;
        if !cursor.is_empty() {
            return Err(Error::malformed_tree(format!(
                "{} trailing bytes",
                cursor.len()
            )));
        }
        Ok(tree)
    }

    fn read_from(cursor: &mut &[u8], depth: usize) -> Result<Self, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::malformed_tree("nesting too deep"));
        }
        let header = cursor
            .split_off(..HEADER_LEN)
            .ok_or_else(|| Error::malformed_tree("truncated header"))?;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&header[1..]);
        let len = u32::from_be_bytes(len_bytes) as usize;

        match header[0] {
            LEAF_TAG => {
                let data = cursor
                    .split_off(..len)
                    .ok_or_else(|| Error::malformed_tree("truncated leaf"))?;
                Ok(ByteTree::Leaf(data.to_vec()))
            }
            NODE_TAG => {
                // Every child takes at least a header, which bounds the allocation.
                let mut children = Vec::with_capacity(len.min(cursor.len() / HEADER_LEN));
                for _ in 0..len {
                    children.push(Self::read_from(cursor, depth + 1)?);
                }
                Ok(ByteTree::Node(children))
            }
            tag => Err(Error::malformed_tree(format!("unknown tag {tag:#04x}"))),
        }
    }

    /// Lowercase hex of the serialized form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl From<Vec<u8>> for ByteTree {
    fn from(value: Vec<u8>) -> Self {
        ByteTree::Leaf(value)
    }
}

impl From<Vec<ByteTree>> for ByteTree {
    fn from(value: Vec<ByteTree>) -> Self {
        ByteTree::Node(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn leaf_layout() {
        let tree = ByteTree::leaf(vec![0x00, 0xff]);
        assert_eq!(tree.to_bytes(), hex!("01 00000002 00ff"));
    }

    #[test]
    fn node_layout() {
        let tree = ByteTree::node([ByteTree::leaf(vec![0xab]), ByteTree::node([])]);
        assert_eq!(tree.to_bytes(), hex!("00 00000002 01 00000001 ab 00 00000000"));
        assert_eq!(tree.encoded_len(), tree.to_bytes().len());
    }

    #[test]
    fn parse_nested() {
        let tree = ByteTree::node([
            ByteTree::leaf(vec![1, 2, 3]),
            ByteTree::node([ByteTree::leaf(vec![]), ByteTree::leaf(vec![4])]),
        ]);
        assert_eq!(ByteTree::from_bytes(&tree.to_bytes()).unwrap(), tree);
    }

    #[test]
    fn parse_rejects_trailing_and_truncated() {
        let mut bytes = ByteTree::leaf(vec![7, 7]).to_bytes();
        bytes.push(0);
        assert!(matches!(
            ByteTree::from_bytes(&bytes),
            Err(Error::MalformedByteTree { .. })
        ));
        assert!(ByteTree::from_bytes(&bytes[..4]).is_err());
        assert!(ByteTree::from_bytes(&bytes[..6]).is_err());
        assert!(ByteTree::from_bytes(&hex!("02 00000000")).is_err());
    }

    #[test]
    fn shape_ignores_contents() {
        let a = ByteTree::node([ByteTree::leaf(vec![1, 2]), ByteTree::leaf(vec![3])]);
        let b = ByteTree::node([ByteTree::leaf(vec![9, 9]), ByteTree::leaf(vec![0])]);
        let c = ByteTree::node([ByteTree::leaf(vec![9, 9])]);
        let d = ByteTree::node([ByteTree::leaf(vec![9]), ByteTree::leaf(vec![0])]);
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
        assert!(!a.same_shape(&d));
        assert!(!a.same_shape(&ByteTree::leaf(vec![])));
    }
}
