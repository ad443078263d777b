use crate::protocol::normalize_protocol;

/// Column order of a version 2 flow log line.
pub const FLOW_LOG_FIELDS: [&str; 14] = [
    "version",
    "account_id",
    "interface_id",
    "srcaddr",
    "dstaddr",
    "dstport",
    "srcport",
    "protocol",
    "packets",
    "bytes",
    "start",
    "end",
    "action",
    "log_status",
];

pub const UNTAGGED: &str = "Untagged";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLogRecord {
    pub version: String,
    pub account_id: String,
    pub interface_id: String,
    pub src_addr: String,
    pub dst_addr: String,
    pub dst_port: String,
    pub src_port: String,
    /// Canonical lowercase name, see [`normalize_protocol`].
    pub protocol: String,
    pub packets: String,
    pub bytes: String,
    pub start: String,
    pub end: String,
    pub action: String,
    pub log_status: String,
}

impl FlowLogRecord {
    /// Parses one whitespace-delimited line. Returns `None` unless the line holds exactly
    /// one token per column; such lines are skipped rather than treated as errors.
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != FLOW_LOG_FIELDS.len() {
            return None;
        }
        let [version, account_id, interface_id, src_addr, dst_addr, dst_port, src_port, protocol, packets, bytes, start, end, action, log_status] =
            tokens.as_slice()
        else {
            return None;
        };

        Some(Self {
            version: version.to_string(),
            account_id: account_id.to_string(),
            interface_id: interface_id.to_string(),
            src_addr: src_addr.to_string(),
            dst_addr: dst_addr.to_string(),
            dst_port: dst_port.to_string(),
            src_port: src_port.to_string(),
            protocol: normalize_protocol(protocol),
            packets: packets.to_string(),
            bytes: bytes.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            action: action.to_string(),
            log_status: log_status.to_string(),
        })
    }
}

/// A record with the tags its (port, protocol) key resolved to. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    pub record: FlowLogRecord,
    pub tags: Vec<String>,
}

impl TaggedRecord {
    pub fn untagged(record: FlowLogRecord) -> Self {
        Self {
            record,
            tags: vec![UNTAGGED.to_string()],
        }
    }
}

/// Parses a batch of raw lines, dropping malformed ones. Returns the records and
/// the number of lines dropped.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> (Vec<FlowLogRecord>, usize) {
    let records: Vec<FlowLogRecord> = lines
        .iter()
        .filter_map(|line| FlowLogRecord::parse(line.as_ref()))
        .collect();
    let skipped = lines.len() - records.len();
    (records, skipped)
}
