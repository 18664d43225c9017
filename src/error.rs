//! Error types for ipdb.

use thiserror::Error;

/// Error type for ipdb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed dotted IPv4 address
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// Malformed CIDR notation
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),

    /// Prefix length outside the accepted range
    #[error("prefix length out of range ({min}..={max}): {got}", min = crate::cidr::MIN_PREFIX_LEN, max = 32)]
    InvalidPrefixLen {
        /// The rejected prefix length
        got: u8,
    },

    /// Address count that does not correspond to a whole CIDR block
    #[error("address count is not a power of two: {0}")]
    NotPowerOfTwo(u64),

    /// Exclusion block is not contained in the partition target
    #[error("exclusion {exclude} is not a sub-block of {target}")]
    NotSubBlock {
        /// CIDR text of the partition target
        target: String,
        /// CIDR text of the offending exclusion
        exclude: String,
    },

    /// Malformed record line in a database dump
    #[error("malformed record line: {0}")]
    InvalidRecordLine(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ipdb operations.
pub type Result<T> = std::result::Result<T, Error>;
