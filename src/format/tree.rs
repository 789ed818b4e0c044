//! ipdb Search Tree Traversal
//!
//! The tree is a flat table of `node_count` entries, each holding two
//! 4-byte big-endian branch targets. A target is interpreted as:
//! - `< node_count`: another node (continue traversal)
//! - `== node_count`: still an index; descent reads through it
//! - `> node_count`: a leaf reference into the record blob
//!
//! The whole IPv6 space is indexed from node 0. IPv4 addresses live under
//! `::ffff:0:0/96`, so the node at the end of that prefix is located once
//! at load time and IPv4 lookups start from there.

use super::types::{
    BRANCH_BYTES, NODE_BYTES, V4_MAPPED_PREFIX_BITS, V4_MAPPED_ZERO_BITS,
};
use crate::error::IpdbError;
use zerocopy::byteorder::big_endian::U32;
use zerocopy::FromBytes;

/// A leaf found while enumerating the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLeaf {
    /// Network bits, right-aligned within the enumerated bit width
    pub bits: u128,
    /// Number of leading bits that identify the network
    pub prefix_len: u8,
    /// Leaf reference (always `> node_count`)
    pub leaf: u32,
}

/// Search tree over the data region (node table followed by record blob)
#[derive(Debug, Clone, Copy)]
pub struct SearchTree<'a> {
    data: &'a [u8],
    node_count: u32,
    v4_root: u32,
}

impl<'a> SearchTree<'a> {
    /// Build a tree and locate the IPv4 start node
    ///
    /// `data` must start at the node table. When `ipv4` is false the
    /// IPv4 root stays at node 0.
    pub fn load(data: &'a [u8], node_count: u32, ipv4: bool) -> Result<Self, IpdbError> {
        let mut tree = Self::with_v4_root(data, node_count, 0);
        if ipv4 {
            tree.v4_root = tree.find_ipv4_start_node()?;
        }
        Ok(tree)
    }

    /// Rebuild a tree whose IPv4 start node is already known
    pub fn with_v4_root(data: &'a [u8], node_count: u32, v4_root: u32) -> Self {
        Self {
            data,
            node_count,
            v4_root,
        }
    }

    /// Node where IPv4 lookups begin
    pub fn v4_root(&self) -> u32 {
        self.v4_root
    }

    /// Number of entries in the node table
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    /// Whether a branch target points into the record blob
    pub fn is_leaf(&self, node: u32) -> bool {
        node > self.node_count
    }

    /// Read the branch target of `node` for `branch` (0 or 1)
    pub fn read_node(&self, node: u32, branch: u8) -> Result<u32, IpdbError> {
        let offset = (node as usize)
            .checked_mul(NODE_BYTES)
            .and_then(|o| o.checked_add(branch as usize * BRANCH_BYTES))
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!("node {} offset overflows", node))
            })?;

        let raw = self
            .data
            .get(offset..offset + BRANCH_BYTES)
            .and_then(|bytes| U32::read_from_bytes(bytes).ok())
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!(
                    "node {} branch {} at offset {} exceeds data size {}",
                    node,
                    branch,
                    offset,
                    self.data.len()
                ))
            })?;

        Ok(node_value(raw.get()))
    }

    /// Walk the tree for a 4- or 16-byte big-endian address
    ///
    /// Returns the leaf reference, or `None` when the bits run out before
    /// the walk crosses into the record blob.
    pub fn descend(&self, address: &[u8]) -> Result<Option<u32>, IpdbError> {
        let bit_count = address.len() * 8;
        let mut node = if bit_count == 32 { self.v4_root } else { 0 };

        for i in 0..bit_count {
            if self.is_leaf(node) {
                break;
            }
            let bit = (address[i / 8] >> (7 - (i % 8))) & 1;
            node = self.read_node(node, bit)?;
        }

        if self.is_leaf(node) {
            log::trace!("descend: leaf {} for {:02x?}", node, address);
            Ok(Some(node))
        } else {
            Ok(None)
        }
    }

    /// Enumerate every leaf reachable from `root` within `bit_width` bits
    ///
    /// Leaves come back in ascending network order. Targets equal to
    /// `node_count` mark empty branches and are skipped.
    ///
    /// Shared subtrees are walked once per path that reaches them, up to
    /// `node_count * bit_width` node expansions in total. A table that
    /// needs more than that (branches pointing back at ancestors) is
    /// `InvalidFormat`.
    pub fn leaves(&self, root: u32, bit_width: u8) -> Result<Vec<TreeLeaf>, IpdbError> {
        let mut out = Vec::new();
        let mut stack: Vec<(u32, u128, u8)> = vec![(root, 0, 0)];
        let budget = u64::from(self.node_count.max(1)) * u64::from(bit_width);
        let mut expanded = 0u64;

        while let Some((node, bits, depth)) = stack.pop() {
            if self.is_leaf(node) {
                out.push(TreeLeaf {
                    bits,
                    prefix_len: depth,
                    leaf: node,
                });
                continue;
            }
            if node == self.node_count || depth >= bit_width {
                continue;
            }

            expanded += 1;
            if expanded > budget {
                return Err(IpdbError::InvalidFormat(format!(
                    "tree walk from node {} exceeded {} node visits, node table has cycles",
                    root, budget
                )));
            }

            let one = bits | (1u128 << (bit_width - 1 - depth));
            stack.push((self.read_node(node, 1)?, one, depth + 1));
            stack.push((self.read_node(node, 0)?, bits, depth + 1));
        }

        Ok(out)
    }

    /// Skip the `::ffff:0:0/96` prefix: 80 zero bits then 16 one bits
    fn find_ipv4_start_node(&self) -> Result<u32, IpdbError> {
        let mut node = 0u32;

        for i in 0..V4_MAPPED_PREFIX_BITS {
            if node >= self.node_count {
                break;
            }
            let branch = if i >= V4_MAPPED_ZERO_BITS { 1 } else { 0 };
            node = self.read_node(node, branch)?;
        }

        Ok(node)
    }
}

/// Compose a branch target from its raw bit pattern
///
/// The low 31 bits are taken as-is and the top bit is OR'd back in, so
/// the result is the full unsigned value.
fn node_value(raw: u32) -> u32 {
    let mut value = raw & 0x7fff_ffff;
    if raw & 0x8000_0000 != 0 {
        value |= 0x8000_0000;
    }
    value
}
