//! Text-dump boundary: `network;country;province;city;isp;sample_ip;ip_count`.
//!
//! One record per line, fields separated by `;`. The same format carries
//! both uncompacted dumps (one line per inserted prefix) and compacted
//! output, and loading a dump is just one `put` per line.

use std::io::{BufRead, BufReader, Read, Write};

use log::{info, warn};

use crate::cidr::Ipv4Block;
use crate::error::{Error, Result};
use crate::record::GeoRecord;
use crate::trie::Ipv4RadixTree;

/// Parse one dump line into its block and record.
pub fn parse_line(line: &str) -> Result<(Ipv4Block, GeoRecord)> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 7 {
        return Err(Error::InvalidRecordLine(line.to_string()));
    }
    let block = Ipv4Block::parse(fields[0])?;
    let ip_count: u64 = fields[6]
        .trim()
        .parse()
        .map_err(|_| Error::InvalidRecordLine(line.to_string()))?;
    Ok((
        block,
        GeoRecord {
            country: fields[1].to_string(),
            province: fields[2].to_string(),
            city: fields[3].to_string(),
            isp: fields[4].to_string(),
            sample_ip: fields[5].to_string(),
            ip_count,
        },
    ))
}

/// Load a whole dump into a fresh tree.
///
/// Blank lines and `#` comment lines are skipped; malformed record lines
/// are logged and skipped rather than aborting the load.
pub fn read_tree<R: Read>(reader: R) -> Result<Ipv4RadixTree> {
    let mut tree = Ipv4RadixTree::new();
    let mut loaded = 0usize;

    for (lineno, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok((block, record)) => {
                tree.put(block, record);
                loaded += 1;
            }
            Err(e) => warn!("skipping line {}: {}", lineno + 1, e),
        }
    }

    info!("loaded {} records into {} trie nodes", loaded, tree.node_count());
    Ok(tree)
}

/// Write a compacted `(cidr, record)` list as a dump.
pub fn write_records<W: Write>(mut writer: W, records: &[(String, GeoRecord)]) -> Result<()> {
    for (network, record) in records {
        writeln!(writer, "{}", record.to_line(network))?;
    }
    Ok(())
}

/// Dump every stored prefix of a tree, in ascending address order.
pub fn write_tree<W: Write>(mut writer: W, tree: &Ipv4RadixTree) -> Result<()> {
    for (block, record) in tree.iter() {
        writeln!(writer, "{}", record.to_line(&block.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr::parse_addr;

    const SAMPLE: &str = "\
1.0.0.0/24;澳大利亚;;;;223.255.255.111;256
1.0.1.0/24;中国;福建省;福州市;电信;1.0.1.53;256
";

    #[test]
    fn test_parse_line() {
        let (block, rec) = parse_line("1.0.1.0/24;中国;福建省;福州市;电信;1.0.1.53;256").unwrap();
        assert_eq!(block.to_string(), "1.0.1.0/24");
        assert_eq!(rec.country, "中国");
        assert_eq!(rec.province, "福建省");
        assert_eq!(rec.city, "福州市");
        assert_eq!(rec.isp, "电信");
        assert_eq!(rec.sample_ip, "1.0.1.53");
        assert_eq!(rec.ip_count, 256);
    }

    #[test]
    fn test_parse_line_empty_fields() {
        let (_, rec) = parse_line("1.0.0.0/24;澳大利亚;;;;223.255.255.111;256").unwrap();
        assert_eq!(rec.province, "");
        assert_eq!(rec.city, "");
        assert_eq!(rec.isp, "");
    }

    #[test]
    fn test_parse_line_rejects_malformed() {
        assert!(parse_line("").is_err());
        assert!(parse_line("1.0.0.0/24;只有两个字段").is_err());
        assert!(parse_line("1.0.0.0/24;a;b;c;d;e;f;extra").is_err());
        assert!(parse_line("not-a-cidr;a;b;c;d;e;256").is_err());
        assert!(parse_line("1.0.0.0/24;a;b;c;d;e;not-a-number").is_err());
    }

    #[test]
    fn test_read_tree() {
        let tree = read_tree(SAMPLE.as_bytes()).unwrap();
        assert_eq!(tree.len(), 2);
        let rec = tree.lookup(parse_addr("1.0.1.53").unwrap()).unwrap();
        assert_eq!(rec.country, "中国");
        let rec = tree.lookup(parse_addr("1.0.0.9").unwrap()).unwrap();
        assert_eq!(rec.country, "澳大利亚");
    }

    #[test]
    fn test_read_tree_skips_junk() {
        let text = "# header comment\n\nbroken line\n1.0.0.0/24;a;b;c;d;1.0.0.1;256\n";
        let tree = read_tree(text.as_bytes()).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_write_tree_round_trip() {
        let tree = read_tree(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_tree(&mut buf, &tree).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), SAMPLE);
    }

    #[test]
    fn test_write_records() {
        let records = vec![(
            "1.0.1.0/24".to_string(),
            GeoRecord {
                country: "中国".into(),
                province: "福建省".into(),
                city: "福州市".into(),
                isp: "电信".into(),
                sample_ip: "1.0.1.53".into(),
                ip_count: 256,
            },
        )];
        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1.0.1.0/24;中国;福建省;福州市;电信;1.0.1.53;256\n"
        );
    }
}
