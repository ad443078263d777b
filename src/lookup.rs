use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{FlowTagError, Result};

const LOOKUP_COLUMNS: usize = 3;

/// Destination port plus lowercase protocol name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub dst_port: String,
    pub protocol: String,
}

impl LookupKey {
    pub fn new(dst_port: &str, protocol: &str) -> Self {
        Self {
            dst_port: dst_port.to_string(),
            protocol: protocol.to_lowercase(),
        }
    }
}

fn parse_row(line: &str) -> csv::Result<StringRecord> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    rdr.read_record(&mut record)?;
    Ok(record)
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dst_port, self.protocol)
    }
}

/// Tag assignments keyed on (port, protocol). A key keeps every tag it was given,
/// duplicates included, in file order.
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    entries: HashMap<LookupKey, Vec<String>>,
}

impl LookupTable {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FlowTagError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| FlowTagError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    /// Parses `dstport,protocol,tag` rows, one per line. There is no header row and every
    /// line is data, so a blank line fails the load. `source` only labels errors.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let load_failure = |row: u64, reason: String| FlowTagError::LoadFailure {
            path: source.to_path_buf(),
            row,
            reason,
        };

        let mut table = Self::default();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let row = index as u64 + 1;
            let line = line.map_err(|e| load_failure(row, e.to_string()))?;
            if line.trim().is_empty() {
                return Err(load_failure(row, "blank row".to_string()));
            }

            let record = parse_row(&line).map_err(|e| load_failure(row, e.to_string()))?;
            if record.len() != LOOKUP_COLUMNS {
                return Err(load_failure(
                    row,
                    format!(
                        "expected {} columns, found {}",
                        LOOKUP_COLUMNS,
                        record.len()
                    ),
                ));
            }

            table.insert(&record[0], &record[1], &record[2]);
        }

        Ok(table)
    }

    pub fn insert(&mut self, dst_port: &str, protocol: &str, tag: &str) {
        self.entries
            .entry(LookupKey::new(dst_port, protocol))
            .or_default()
            .push(tag.to_string());
    }

    pub fn get(&self, dst_port: &str, protocol: &str) -> Option<&[String]> {
        self.entries
            .get(&LookupKey::new(dst_port, protocol))
            .map(Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tag assignments across all keys.
    pub fn tag_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> Result<LookupTable> {
        LookupTable::from_reader(content.as_bytes(), Path::new("lookup.csv"))
    }

    #[test]
    fn keeps_every_tag_in_file_order() {
        let table = parse("80,tcp,web\n22,tcp,ssh\n80,tcp,http-alt\n80,tcp,web\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.tag_count(), 4);
        assert_eq!(
            table.get("80", "tcp").unwrap(),
            ["web", "http-alt", "web"]
        );
        assert_eq!(table.get("22", "tcp").unwrap(), ["ssh"]);
    }

    #[test]
    fn protocol_is_case_insensitive() {
        let table = parse("443,TCP,https\n53,Udp,dns\n").unwrap();

        assert_eq!(table.get("443", "tcp").unwrap(), ["https"]);
        assert_eq!(table.get("443", "TcP").unwrap(), ["https"]);
        assert_eq!(table.get("53", "UDP").unwrap(), ["dns"]);
    }

    #[test]
    fn first_row_is_data() {
        let table = parse("dstport,protocol,tag\n25,tcp,smtp\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("dstport", "protocol").unwrap(), ["tag"]);
    }

    #[test]
    fn missing_key_is_none() {
        let table = parse("25,tcp,smtp\n").unwrap();

        assert!(table.get("25", "udp").is_none());
        assert!(table.get("443", "tcp").is_none());
    }

    #[test]
    fn wrong_column_count_fails() {
        let err = parse("25,tcp,smtp\n110,tcp\n").unwrap_err();

        match err {
            FlowTagError::LoadFailure { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_row_fails() {
        let err = parse("25,tcp,smtp\n\n110,tcp,email\n").unwrap_err();

        match err {
            FlowTagError::LoadFailure { row, reason, .. } => {
                assert_eq!(row, 2);
                assert_eq!(reason, "blank row");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trailing_blank_line_fails() {
        let err = parse("25,tcp,smtp\n\n").unwrap_err();
        assert!(matches!(err, FlowTagError::LoadFailure { row: 2, .. }));
    }

    #[test]
    fn quoted_fields_are_unquoted() {
        let table = parse("8080,tcp,\"proxy, internal\"\n").unwrap();
        assert_eq!(table.get("8080", "tcp").unwrap(), ["proxy, internal"]);
    }

    #[test]
    fn empty_source_is_empty_table() {
        let table = parse("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = LookupTable::load(Path::new("/nonexistent/lookup_table.csv")).unwrap_err();

        assert!(matches!(err, FlowTagError::MissingFile { .. }));
        assert!(err.to_string().contains("/nonexistent/lookup_table.csv"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "25,tcp,sv_P1").unwrap();
        writeln!(file, "68, udp , sv_P2").unwrap();

        let table = LookupTable::load(file.path()).unwrap();

        assert_eq!(table.get("25", "tcp").unwrap(), ["sv_P1"]);
        assert_eq!(table.get("68", "udp").unwrap(), ["sv_P2"]);
    }

    #[test]
    fn key_displays_joined() {
        assert_eq!(LookupKey::new("80", "TCP").to_string(), "80_tcp");
    }
}
