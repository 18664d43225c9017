//! IPv4 block and range arithmetic.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Shortest prefix length accepted from text input.
///
/// Real-world registry allocations never go above a /8, so the dump format
/// rejects anything shorter. This is a policy floor, not a mathematical
/// requirement; blocks constructed internally (bisection, tiling) are not
/// subject to it.
pub const MIN_PREFIX_LEN: u8 = 8;

/// One past the highest IPv4 address, as a half-open range bound.
const ADDRESS_SPACE_END: u64 = 1 << 32;

/// Netmask for a prefix length, valid for the whole `0..=32` range.
fn netmask_of(prefix_len: u8) -> u32 {
    debug_assert!(prefix_len <= 32);
    ((!0u64) << (32 - prefix_len as u32)) as u32
}

/// An aligned IPv4 CIDR block: `base/prefix_len` with `base & !netmask == 0`.
///
/// The numeric range it covers is half-open: `[base, base + 2^(32-n))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Block {
    base: u32,
    prefix_len: u8,
}

impl Ipv4Block {
    /// Create a block, aligning `base` down to the block boundary.
    ///
    /// Panics if `prefix_len > 32`; callers computing prefix lengths keep
    /// them in range by construction.
    pub fn new(base: u32, prefix_len: u8) -> Self {
        assert!(prefix_len <= 32, "prefix length {prefix_len} out of range");
        Self {
            base: base & netmask_of(prefix_len),
            prefix_len,
        }
    }

    /// Parse `a.b.c.d/n` text.
    ///
    /// Fails unless the address has exactly four in-range octets and
    /// `n` is within `MIN_PREFIX_LEN..=32`. A base that is not aligned to
    /// the block boundary is aligned down, matching how the original dumps
    /// were normalized.
    pub fn parse(text: &str) -> Result<Self> {
        let (addr_part, len_part) = text
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidCidr(text.to_string()))?;
        let base = parse_addr(addr_part)?;
        let prefix_len: u8 = len_part
            .parse()
            .map_err(|_| Error::InvalidCidr(text.to_string()))?;
        if !(MIN_PREFIX_LEN..=32).contains(&prefix_len) {
            return Err(Error::InvalidPrefixLen { got: prefix_len });
        }
        Ok(Self::new(base, prefix_len))
    }

    /// Aligned base address.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Number of addresses in the block: `2^(32-n)`.
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix_len as u32)
    }

    /// Inclusive start of the covered range.
    pub fn start(&self) -> u64 {
        self.base as u64
    }

    /// Exclusive end of the covered range.
    pub fn end(&self) -> u64 {
        self.base as u64 + self.size()
    }

    /// Dotted netmask text, e.g. `255.255.255.0` for a /24.
    pub fn netmask(&self) -> String {
        format_addr(netmask_of(self.prefix_len))
    }

    /// Highest address in the block.
    pub fn broadcast(&self) -> u32 {
        (self.end() - 1) as u32
    }

    /// Whether `addr` falls inside the block.
    pub fn contains_addr(&self, addr: u32) -> bool {
        addr & netmask_of(self.prefix_len) == self.base
    }

    /// Whether `other` is a (not necessarily proper) sub-block.
    pub fn contains(&self, other: &Ipv4Block) -> bool {
        other.prefix_len >= self.prefix_len && self.contains_addr(other.base)
    }

    /// Split into the two half-size sub-blocks.
    ///
    /// Only meaningful while `prefix_len < 32`.
    pub fn halves(&self) -> (Ipv4Block, Ipv4Block) {
        debug_assert!(self.prefix_len < 32);
        let child_len = self.prefix_len + 1;
        let lo = Ipv4Block::new(self.base, child_len);
        let hi = Ipv4Block::new(self.base | (1u32 << (32 - child_len as u32)), child_len);
        (lo, hi)
    }
}

impl fmt::Display for Ipv4Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_addr(self.base), self.prefix_len)
    }
}

impl FromStr for Ipv4Block {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a dotted IPv4 address to its numeric form.
pub fn parse_addr(text: &str) -> Result<u32> {
    text.trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| Error::InvalidAddress(text.to_string()))
}

/// Format a numeric address as dotted text.
pub fn format_addr(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Prefix length whose block holds exactly `count` addresses.
///
/// `count` must be a power of two within `1..=2^32`; anything else cannot
/// correspond to a whole CIDR block and is rejected.
pub fn prefix_len_for_count(count: u64) -> Result<u8> {
    if count == 0 || count > ADDRESS_SPACE_END || !count.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(count));
    }
    Ok(32 - count.trailing_zeros() as u8)
}

/// A half-open numeric address range, not necessarily block-aligned.
///
/// `cidr` carries the exact text form when the range is known to be a single
/// aligned block; it is dropped as soon as the range is merged with another.
/// `hint` seeds the spanning-block search with a plausible prefix length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    /// Inclusive start address.
    pub start: u64,
    /// Exclusive end address.
    pub end: u64,
    /// Exact CIDR text, if the range is a single aligned block.
    pub cidr: Option<String>,
    /// Advisory prefix length for spanning-block search.
    pub hint: u8,
}

impl AddressRange {
    /// Range covered by a single block, remembering its exact text.
    pub fn from_block(block: &Ipv4Block) -> Self {
        Self {
            start: block.start(),
            end: block.end(),
            cidr: Some(block.to_string()),
            hint: block.prefix_len(),
        }
    }

    /// Number of addresses in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the range covers no addresses.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Aligned block of size `2^(32-n)` whose range reaches up to cover `end`.
fn end_anchored(prefix_len: u8, end: u64) -> Ipv4Block {
    let size = 1u64 << (32 - prefix_len as u32);
    let base = (end - 1) & !(size - 1);
    Ipv4Block::new(base as u32, prefix_len)
}

/// Smallest aligned block that spans the whole range, anchored at its end.
///
/// Starting from `hint`, the prefix length shrinks (the block grows) until
/// the end-anchored block reaches back to `range.start`, then tightens if
/// the hint overshot. The base is the largest block-aligned address below
/// `range.end`, so the block always covers `range.end - 1` but may extend
/// below `range.start`; tiling trims the excess afterwards.
pub fn spanning_block(range: &AddressRange, hint: u8) -> Ipv4Block {
    debug_assert!(range.start < range.end);
    let covers = |n: u8| end_anchored(n, range.end).start() <= range.start;

    let mut n = hint.min(32);
    while n > 0 && !covers(n) {
        n -= 1;
    }
    while n < 32 && covers(n + 1) {
        n += 1;
    }
    end_anchored(n, range.end)
}
