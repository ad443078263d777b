use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::protocol::normalize_protocol;
use crate::record::TaggedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortProtocolCount {
    pub dst_port: String,
    pub protocol: String,
    pub count: u64,
}

/// Occurrence counter that remembers the order keys were first seen in.
#[derive(Debug)]
struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    counts: Vec<(K, u64)>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            counts: Vec::new(),
        }
    }

    fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    fn into_counts(self) -> Vec<(K, u64)> {
        self.counts
    }
}

/// Counts every tag occurrence: a record carrying N tags contributes N.
pub fn count_tags(records: &[TaggedRecord]) -> Vec<TagCount> {
    let mut counter = OrderedCounter::new();
    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        counter.add(tag.as_str());
    }

    counter
        .into_counts()
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect()
}

/// Counts (dstport, protocol) pairs once per record, regardless of tag count.
pub fn count_port_protocols(records: &[TaggedRecord]) -> Vec<PortProtocolCount> {
    let mut counter = OrderedCounter::new();
    for tagged in records {
        let protocol = normalize_protocol(&tagged.record.protocol);
        counter.add((tagged.record.dst_port.as_str(), protocol));
    }

    counter
        .into_counts()
        .into_iter()
        .map(|((dst_port, protocol), count)| PortProtocolCount {
            dst_port: dst_port.to_string(),
            protocol,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub tag_counts: Vec<TagCount>,
    pub port_protocol_counts: Vec<PortProtocolCount>,
}

pub fn aggregate(records: &[TaggedRecord]) -> Aggregates {
    Aggregates {
        tag_counts: count_tags(records),
        port_protocol_counts: count_port_protocols(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlowLogRecord;

    fn tagged(dst_port: &str, protocol: &str, tags: &[&str]) -> TaggedRecord {
        let line = format!(
            "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 {dst_port} 49153 {protocol} 25 20000 1620140761 1620140821 ACCEPT OK"
        );
        TaggedRecord {
            record: FlowLogRecord::parse(&line).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sample() -> Vec<TaggedRecord> {
        vec![
            tagged("80", "6", &["web", "http-alt"]),
            tagged("443", "6", &["Untagged"]),
            tagged("80", "6", &["web", "http-alt"]),
            tagged("53", "17", &["dns"]),
            tagged("443", "6", &["Untagged"]),
        ]
    }

    #[test]
    fn tag_counts_follow_first_seen_order() {
        let counts = count_tags(&sample());
        let rows: Vec<(&str, u64)> = counts.iter().map(|c| (c.tag.as_str(), c.count)).collect();

        assert_eq!(
            rows,
            [("web", 2), ("http-alt", 2), ("Untagged", 2), ("dns", 1)]
        );
    }

    #[test]
    fn tag_total_equals_record_tag_pairs() {
        let records = sample();
        let total: u64 = count_tags(&records).iter().map(|c| c.count).sum();
        let pairs: usize = records.iter().map(|r| r.tags.len()).sum();

        assert_eq!(total, pairs as u64);
        assert_eq!(total, 7);
    }

    #[test]
    fn port_protocol_counts_once_per_record() {
        let records = sample();
        let counts = count_port_protocols(&records);
        let rows: Vec<(&str, &str, u64)> = counts
            .iter()
            .map(|c| (c.dst_port.as_str(), c.protocol.as_str(), c.count))
            .collect();

        assert_eq!(rows, [("80", "tcp", 2), ("443", "tcp", 2), ("53", "udp", 1)]);
        assert_eq!(
            counts.iter().map(|c| c.count).sum::<u64>(),
            records.len() as u64
        );
    }

    #[test]
    fn stray_numeric_protocol_is_renormalized() {
        let mut record = tagged("22", "6", &["ssh"]);
        record.record.protocol = "6".to_string();
        let records = vec![record, tagged("22", "6", &["ssh"])];

        let counts = count_port_protocols(&records);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].protocol, "tcp");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert_eq!(aggregate(&[]), Aggregates::default());
    }
}
