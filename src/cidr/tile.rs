//! Tiling arbitrary address ranges with aligned CIDR blocks.

use super::block::{spanning_block, AddressRange, Ipv4Block};
use super::partition::exclude;
use crate::error::Result;

/// Largest aligned block starting exactly at `addr` that fits in `within`.
///
/// `addr` must lie inside `within`; the alignment of `addr` then bounds the
/// block size, so the result is always a sub-block of `within`.
fn anchored_sub(addr: u64, within: &Ipv4Block) -> Ipv4Block {
    debug_assert!(addr >= within.start() && addr < within.end());
    let align = addr.trailing_zeros().min(31) as u8;
    let prefix_len = (32 - align).max(within.prefix_len());
    Ipv4Block::new(addr as u32, prefix_len)
}

/// Re-express a range as the minimal ordered list of aligned blocks.
///
/// The result is disjoint, contiguous, and covers exactly
/// `[range.start, range.end)`. An empty range tiles to nothing.
///
/// The spanning block may overhang the range on either side (its end is
/// anchored at `range.end`, its base at an alignment boundary); both
/// overhangs are cut away with an exclusion partition, keeping the blocks
/// above the low cut and below the high cut.
pub fn tile(range: &AddressRange) -> Result<Vec<Ipv4Block>> {
    if range.is_empty() {
        return Ok(Vec::new());
    }

    let span = spanning_block(range, range.hint);

    // Cut the overhang below range.start: keep the block anchored at the
    // start plus everything above it.
    let mut candidates = vec![span];
    if span.start() < range.start {
        let cut = anchored_sub(range.start, &span);
        let part = exclude(span, cut)?;
        candidates = part.matched;
        candidates.extend(part.above);
    }

    // Any overhang above range.end is confined to the last candidate,
    // because the spanning block is minimal.
    let mut out = Vec::new();
    if let Some(last) = candidates.pop() {
        out.extend(candidates);
        if last.end() > range.end {
            let cut = anchored_sub(range.end, &last);
            let part = exclude(last, cut)?;
            out.extend(part.below);
        } else {
            out.push(last);
        }
    }
    Ok(out)
}
