//! CIDR block arithmetic, exclusion partitioning, range tiling and merging.
//!
//! Everything in this module is pure address arithmetic: no IO, no state.
//! Blocks are half-open numeric ranges `[base, base + 2^(32-n))` carried as
//! `u64` so that arithmetic at the top of the IPv4 space cannot overflow.

mod block;
mod merge;
mod partition;
mod tile;

pub use block::{
    format_addr, parse_addr, prefix_len_for_count, spanning_block, AddressRange, Ipv4Block,
    MIN_PREFIX_LEN,
};
pub use merge::{merge_blocks, merge_cidrs};
pub use partition::{exclude, Partition};
pub use tile::tile;
