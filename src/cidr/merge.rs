//! Merging CIDR lists into minimal covering sets.

use super::block::{AddressRange, Ipv4Block};
use super::tile::tile;
use crate::error::Result;

/// Sort ranges and coalesce every overlapping or adjacent run.
///
/// Sorting is by start ascending, then end descending, so a range fully
/// containing another sorts first and swallows it. A merged run loses its
/// exact CIDR text: the union is generally not a single aligned block.
fn coalesce(mut ranges: Vec<AddressRange>) -> Vec<AddressRange> {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut runs: Vec<AddressRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match runs.last_mut() {
            Some(run) if r.start <= run.end => {
                run.end = run.end.max(r.end);
                run.cidr = None;
            }
            _ => runs.push(r),
        }
    }
    runs
}

/// Merge a list of CIDR strings into a minimal covering list.
///
/// The output covers exactly the union of the inputs, is disjoint and in
/// ascending address order, and uses as few blocks as CIDR alignment
/// allows. Runs that never merged keep their original (normalized) text;
/// everything else is re-tiled.
pub fn merge_cidrs<S: AsRef<str>>(cidrs: &[S]) -> Result<Vec<String>> {
    let ranges = cidrs
        .iter()
        .map(|s| Ipv4Block::parse(s.as_ref()).map(|b| AddressRange::from_block(&b)))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::new();
    for run in coalesce(ranges) {
        match run.cidr {
            Some(text) => out.push(text),
            None => out.extend(tile(&run)?.iter().map(|b| b.to_string())),
        }
    }
    Ok(out)
}

/// Block-level variant of [`merge_cidrs`], bypassing text parsing.
///
/// Used by compaction, where merged runs can grow past the text format's
/// /8 policy floor.
pub fn merge_blocks(blocks: &[Ipv4Block]) -> Result<Vec<Ipv4Block>> {
    let ranges = blocks.iter().map(AddressRange::from_block).collect();

    let mut out = Vec::new();
    for run in coalesce(ranges) {
        out.extend(tile(&run)?);
    }
    Ok(out)
}
