//! Geo/ISP attribute records attached to prefixes.

use std::fmt;

/// Attributes stored for one network block.
///
/// `sample_ip` is one concrete address inside the block that the attributes
/// were observed at; `ip_count` is the block's address count and is
/// recomputed whenever the block changes shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRecord {
    pub country: String,
    pub province: String,
    pub city: String,
    pub isp: String,
    pub sample_ip: String,
    pub ip_count: u64,
}

impl GeoRecord {
    /// Attribute equality: country, province, city and ISP.
    ///
    /// The sample address and count are per-block bookkeeping, not
    /// attributes, and are ignored here.
    pub fn attrs_eq(&self, other: &GeoRecord) -> bool {
        self.country == other.country
            && self.province == other.province
            && self.city == other.city
            && self.isp == other.isp
    }

    /// Dump-format line for this record under the given network.
    pub fn to_line(&self, network: &str) -> String {
        format!(
            "{};{};{};{};{};{};{}",
            network, self.country, self.province, self.city, self.isp, self.sample_ip, self.ip_count
        )
    }
}

impl fmt::Display for GeoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{} ({} x{})",
            self.country, self.province, self.city, self.isp, self.sample_ip, self.ip_count
        )
    }
}
