//! Array-backed binary radix trie over 32-bit addresses.
//!
//! Nodes live in an arena and point at each other with integer indices, so
//! the arena can reallocate as it grows without invalidating anything a
//! caller holds. `u32::MAX` is the "no child" sentinel; the root is always
//! index 0. A tree is built through `put` calls and then frozen for
//! `lookup`/iteration; it has no removal.

use crate::cidr::Ipv4Block;
use crate::record::GeoRecord;

/// Sentinel index for an absent child.
const NULL: u32 = u32::MAX;

/// Highest-order bit of an address, where every walk starts.
const TOP_BIT: u32 = 0x8000_0000;

#[derive(Debug, Clone)]
struct Node {
    left: u32,
    right: u32,
    value: Option<GeoRecord>,
}

impl Node {
    fn empty() -> Self {
        Node {
            left: NULL,
            right: NULL,
            value: None,
        }
    }
}

/// Binary radix trie mapping CIDR blocks to [`GeoRecord`]s with
/// longest-prefix-match lookup.
#[derive(Debug, Clone)]
pub struct Ipv4RadixTree {
    nodes: Vec<Node>,
}

impl Ipv4RadixTree {
    /// Create an empty tree with the default arena capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create an empty tree sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::empty());
        Ipv4RadixTree { nodes }
    }

    /// Number of allocated nodes (not the number of stored prefixes).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of prefixes currently holding a value.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.value.is_some()).count()
    }

    /// Whether any prefix holds a value.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.value.is_none())
    }

    /// Store `value` under `block`, overwriting any previous value there.
    ///
    /// Walks `prefix_len` bits of the base MSB-first, reusing the existing
    /// path and allocating nodes only for the unexplored suffix. Re-inserting
    /// a prefix is an upsert, never an error.
    pub fn put(&mut self, block: Ipv4Block, value: GeoRecord) {
        let base = block.base();
        let mut node = 0usize;
        let mut bit = TOP_BIT;

        for _ in 0..block.prefix_len() {
            let next = if base & bit != 0 {
                self.nodes[node].right
            } else {
                self.nodes[node].left
            };
            let next = if next == NULL {
                let idx = self.nodes.len() as u32;
                self.nodes.push(Node::empty());
                if base & bit != 0 {
                    self.nodes[node].right = idx;
                } else {
                    self.nodes[node].left = idx;
                }
                idx
            } else {
                next
            };
            node = next as usize;
            bit >>= 1;
        }

        self.nodes[node].value = Some(value);
    }

    /// Longest-prefix-match lookup.
    ///
    /// Walks toward `addr`, remembering the deepest value seen, and stops at
    /// the first absent child. Returns `None` when no stored prefix covers
    /// the address.
    pub fn lookup(&self, addr: u32) -> Option<&GeoRecord> {
        let mut best = None;
        let mut node = 0usize;
        let mut bit = TOP_BIT;

        loop {
            if let Some(value) = &self.nodes[node].value {
                best = Some(value);
            }
            let next = if addr & bit != 0 {
                self.nodes[node].right
            } else {
                self.nodes[node].left
            };
            if next == NULL {
                break;
            }
            node = next as usize;
            bit >>= 1;
        }
        best
    }

    /// Iterate all stored `(block, record)` pairs in ascending base-address
    /// order.
    ///
    /// The traversal is explicitly left-before-right, so the order is a
    /// guarantee of this API, not an accident of node allocation; a prefix
    /// is yielded before any of its stored sub-prefixes.
    pub fn iter(&self) -> RecordIter<'_> {
        RecordIter {
            tree: self,
            stack: vec![(0, 0, 0)],
        }
    }
}

impl Default for Ipv4RadixTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over stored prefixes, see [`Ipv4RadixTree::iter`].
pub struct RecordIter<'a> {
    tree: &'a Ipv4RadixTree,
    /// Pending nodes as (index, base accumulated so far, depth).
    stack: Vec<(u32, u32, u8)>,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = (Ipv4Block, &'a GeoRecord);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, base, depth)) = self.stack.pop() {
            let node = &self.tree.nodes[idx as usize];
            if depth < 32 {
                let bit = TOP_BIT >> depth;
                // Right pushed first so the left child pops first.
                if node.right != NULL {
                    self.stack.push((node.right, base | bit, depth + 1));
                }
                if node.left != NULL {
                    self.stack.push((node.left, base, depth + 1));
                }
            }
            if let Some(value) = &node.value {
                return Some((Ipv4Block::new(base, depth), value));
            }
        }
        None
    }
}
