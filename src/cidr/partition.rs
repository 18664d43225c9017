//! Binary CIDR exclusion.
//!
//! Splitting a block around a contained sub-block is what lets arbitrary
//! ranges be re-expressed as aligned blocks: the target is bisected one bit
//! at a time, and at every level the half that does not contain the
//! exclusion is emitted whole.

use super::block::Ipv4Block;
use crate::error::{Error, Result};

/// Result of excluding a sub-block from a target block.
///
/// `below`, `matched` and `above` are pairwise disjoint, each internally in
/// ascending address order, and their union is exactly the target's range.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Blocks of the target entirely below the exclusion.
    pub below: Vec<Ipv4Block>,
    /// The exclusion itself (always a single block when it overlaps).
    pub matched: Vec<Ipv4Block>,
    /// Blocks of the target entirely above the exclusion.
    pub above: Vec<Ipv4Block>,
}

/// Split `target` into the parts below, equal to, and above `sub`.
///
/// When the blocks are disjoint the target is returned whole, bucketed by
/// the side the exclusion lies on. When they overlap, `sub` must be a
/// sub-block of `target`; a wider or straddling exclusion has no meaningful
/// partition and is rejected with [`Error::NotSubBlock`].
pub fn exclude(target: Ipv4Block, sub: Ipv4Block) -> Result<Partition> {
    if sub.start() >= target.end() {
        return Ok(Partition {
            above: vec![target],
            ..Partition::default()
        });
    }
    if sub.end() <= target.start() {
        return Ok(Partition {
            below: vec![target],
            ..Partition::default()
        });
    }
    if !target.contains(&sub) {
        return Err(Error::NotSubBlock {
            target: target.to_string(),
            exclude: sub.to_string(),
        });
    }

    let mut part = Partition::default();
    let mut cur = target;
    while cur.prefix_len() < sub.prefix_len() {
        let (lo, hi) = cur.halves();
        if sub.base() < hi.base() {
            part.above.push(hi);
            cur = lo;
        } else {
            part.below.push(lo);
            cur = hi;
        }
    }
    // The bisection collects `above` from the top down.
    part.above.reverse();
    part.matched.push(cur);
    Ok(part)
}
