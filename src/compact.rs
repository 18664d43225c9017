//! Trie compaction: collapse attribute-equal leaf runs into minimal CIDR sets.

use log::debug;

use crate::cidr::{merge_blocks, Ipv4Block};
use crate::error::Result;
use crate::record::GeoRecord;
use crate::trie::Ipv4RadixTree;

/// Country whose records merge on country alone by default.
///
/// The source data is overwhelmingly fine-grained Chinese allocations, and
/// the reference database folds them together regardless of province, city
/// or ISP.
pub const DEFAULT_COARSE_COUNTRY: &str = "中国";

/// Compacts a frozen [`Ipv4RadixTree`] into a minimal `(cidr, record)` list.
///
/// Consecutive records (in ascending address order) that are attribute-equal
/// are batched, each batch's blocks are merged into the fewest covering
/// CIDR blocks, and one output record is emitted per merged block carrying
/// the batch's attributes and a recomputed address count.
pub struct Compactor {
    coarse_country: Option<String>,
}

impl Compactor {
    /// Compactor with the default coarse-country rule.
    pub fn new() -> Self {
        Compactor {
            coarse_country: Some(DEFAULT_COARSE_COUNTRY.to_string()),
        }
    }

    /// Compactor that coarsens a different country, or none.
    ///
    /// Two records whose country both equal the coarse country batch
    /// together even when their province, city or ISP differ.
    pub fn with_coarse_country(coarse_country: Option<String>) -> Self {
        Compactor { coarse_country }
    }

    /// Whether two adjacent records may share a batch.
    fn mergeable(&self, a: &GeoRecord, b: &GeoRecord) -> bool {
        if a.attrs_eq(b) {
            return true;
        }
        match &self.coarse_country {
            Some(country) => a.country == *country && b.country == *country,
            None => false,
        }
    }

    /// Compact the tree into a minimal covering record list.
    ///
    /// The output's union of ranges equals the union of all inserted block
    /// ranges; every output record carries the attributes of the first
    /// record of its batch.
    pub fn compact(&self, tree: &Ipv4RadixTree) -> Result<Vec<(String, GeoRecord)>> {
        let mut out = Vec::new();
        let mut batch_blocks: Vec<Ipv4Block> = Vec::new();
        let mut batch_head: Option<GeoRecord> = None;
        let mut batch_tail: Option<GeoRecord> = None;

        for (block, rec) in tree.iter() {
            let closes = match &batch_tail {
                Some(prev) => !self.mergeable(prev, rec),
                None => false,
            };
            if closes {
                Self::flush(&mut batch_blocks, batch_head.take(), &mut out)?;
            }
            if batch_blocks.is_empty() {
                batch_head = Some(rec.clone());
            }
            batch_blocks.push(block);
            batch_tail = Some(rec.clone());
        }
        Self::flush(&mut batch_blocks, batch_head.take(), &mut out)?;

        debug!("compacted tree with {} nodes into {} records", tree.node_count(), out.len());
        Ok(out)
    }

    /// Merge one batch and emit a record per merged block.
    fn flush(
        blocks: &mut Vec<Ipv4Block>,
        head: Option<GeoRecord>,
        out: &mut Vec<(String, GeoRecord)>,
    ) -> Result<()> {
        let Some(head) = head else {
            return Ok(());
        };
        for merged in merge_blocks(blocks)? {
            let mut rec = head.clone();
            rec.ip_count = merged.size();
            out.push((merged.to_string(), rec));
        }
        blocks.clear();
        Ok(())
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr::parse_addr;

    fn record(country: &str, province: &str, isp: &str) -> GeoRecord {
        GeoRecord {
            country: country.to_string(),
            province: province.to_string(),
            city: String::new(),
            isp: isp.to_string(),
            sample_ip: "0.0.0.0".to_string(),
            ip_count: 0,
        }
    }

    fn block(s: &str) -> Ipv4Block {
        Ipv4Block::parse(s).unwrap()
    }

    #[test]
    fn test_compact_merges_equal_neighbors() {
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("1.0.0.0/25"), record("澳大利亚", "", "x"));
        tree.put(block("1.0.0.128/25"), record("澳大利亚", "", "x"));

        let out = Compactor::new().compact(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "1.0.0.0/24");
        assert_eq!(out[0].1.ip_count, 256);
        assert_eq!(out[0].1.country, "澳大利亚");
    }

    #[test]
    fn test_compact_respects_attribute_boundaries() {
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("1.0.0.0/24"), record("日本", "", "a"));
        tree.put(block("1.0.1.0/24"), record("韩国", "", "a"));

        let out = Compactor::new().compact(&tree).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "1.0.0.0/24");
        assert_eq!(out[0].1.country, "日本");
        assert_eq!(out[1].0, "1.0.1.0/24");
        assert_eq!(out[1].1.country, "韩国");
    }

    #[test]
    fn test_compact_coarse_country_rule() {
        // Different provinces and ISPs, same coarse country: must merge.
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("1.0.2.0/24"), record("中国", "福建省", "电信"));
        tree.put(block("1.0.3.0/24"), record("中国", "浙江省", "联通"));

        let out = Compactor::new().compact(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "1.0.2.0/23");
        // Attributes come from the first record of the batch.
        assert_eq!(out[0].1.province, "福建省");
        assert_eq!(out[0].1.ip_count, 512);
    }

    #[test]
    fn test_compact_configurable_coarse_country() {
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("1.0.2.0/24"), record("China", "Fujian", ""));
        tree.put(block("1.0.3.0/24"), record("China", "Zhejiang", ""));

        let coarsened = Compactor::with_coarse_country(Some("China".to_string()))
            .compact(&tree)
            .unwrap();
        assert_eq!(coarsened.len(), 1);
        assert_eq!(coarsened[0].0, "1.0.2.0/23");

        let strict = Compactor::with_coarse_country(None).compact(&tree).unwrap();
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn test_compact_singleton_batch_passes_through() {
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("9.0.0.0/16"), record("美国", "", ""));

        let out = Compactor::new().compact(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "9.0.0.0/16");
        assert_eq!(out[0].1.ip_count, 1 << 16);
    }

    #[test]
    fn test_compact_empty_tree() {
        let tree = Ipv4RadixTree::new();
        assert!(Compactor::new().compact(&tree).unwrap().is_empty());
    }

    #[test]
    fn test_compact_preserves_coverage() {
        let mut tree = Ipv4RadixTree::new();
        let inputs = [
            ("1.0.0.0/24", record("中国", "北京", "联通")),
            ("1.0.1.0/24", record("中国", "上海", "电信")),
            ("1.0.2.0/24", record("中国", "广东", "移动")),
            ("1.0.3.0/24", record("日本", "", "")),
            ("1.0.4.0/24", record("日本", "", "")),
        ];
        for (cidr, rec) in inputs.iter() {
            tree.put(block(cidr), rec.clone());
        }

        let out = Compactor::new().compact(&tree).unwrap();
        let total: u64 = out.iter().map(|(_, r)| r.ip_count).sum();
        assert_eq!(total, 5 * 256);

        // Every original sample address still resolves to a covering block
        // with attributes taken from some original record in its range.
        for (cidr, _) in inputs.iter() {
            let b = block(cidr);
            let covered = out.iter().any(|(c, _)| {
                let m = block(c);
                m.start() <= b.start() && m.end() >= b.end()
            });
            assert!(covered, "{cidr} lost coverage");
        }
        // The three Chinese /24s collapse to /23 + /24; the Japanese pair
        // is contiguous but not alignable as one block.
        let cidrs: Vec<&str> = out.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            cidrs,
            vec!["1.0.0.0/23", "1.0.2.0/24", "1.0.3.0/24", "1.0.4.0/24"]
        );
    }

    #[test]
    fn test_compact_gap_not_bridged() {
        let mut tree = Ipv4RadixTree::new();
        tree.put(block("1.0.0.0/24"), record("泰国", "", ""));
        tree.put(block("1.0.7.0/24"), record("泰国", "", ""));

        let out = Compactor::new().compact(&tree).unwrap();
        let cidrs: Vec<&str> = out.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cidrs, vec!["1.0.0.0/24", "1.0.7.0/24"]);
        assert!(out
            .iter()
            .all(|(c, _)| !block(c).contains_addr(parse_addr("1.0.3.0").unwrap())));
    }
}
