//! ipdb - IPv4 prefix-to-location database builder.
//!
//! This crate stores `(CIDR block, geo/ISP attributes)` pairs in a binary
//! radix trie, answers longest-prefix-match lookups against it, and
//! compacts the stored prefixes into a minimal set of disjoint CIDR blocks
//! with identical attributes.
//!
//! # Features
//!
//! - **Radix-trie storage**: arena-backed binary trie over 32-bit
//!   addresses, O(32) insert and lookup
//! - **Longest-prefix match**: more specific stored prefixes shadow
//!   shorter ones
//! - **CIDR arithmetic**: spanning blocks, binary exclusion partitioning,
//!   tiling of arbitrary ranges with aligned blocks
//! - **Compaction**: adjacent attribute-equal prefixes collapse into the
//!   fewest covering CIDR blocks
//! - **Text dumps**: load and persist `network;country;province;city;isp;ip;count`
//!   line records
//!
//! # Quick Start
//!
//! ```
//! use ipdb::{Compactor, GeoRecord, Ipv4Block, Ipv4RadixTree};
//!
//! let mut tree = Ipv4RadixTree::new();
//! let record = GeoRecord {
//!     country: "中国".into(),
//!     province: "福建省".into(),
//!     city: "福州市".into(),
//!     isp: "电信".into(),
//!     sample_ip: "1.0.1.53".into(),
//!     ip_count: 256,
//! };
//! tree.put(Ipv4Block::parse("1.0.1.0/24").unwrap(), record.clone());
//! tree.put(Ipv4Block::parse("1.0.0.0/24").unwrap(), record);
//!
//! let compacted = Compactor::new().compact(&tree).unwrap();
//! assert_eq!(compacted[0].0, "1.0.0.0/23");
//! ```
//!
//! The tree is built by a single owner through `put` calls and then frozen;
//! it supports no concurrent mutation and no removal. A rebuild constructs
//! a fresh tree.

mod compact;
mod error;
mod record;
mod trie;

pub mod cidr;
pub mod dump;

// Re-export core types
pub use compact::{Compactor, DEFAULT_COARSE_COUNTRY};
pub use error::{Error, Result};
pub use record::GeoRecord;
pub use trie::{Ipv4RadixTree, RecordIter};

// Re-export the CIDR toolkit at the crate root for convenience
pub use cidr::{merge_cidrs, AddressRange, Ipv4Block};
