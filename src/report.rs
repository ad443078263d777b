use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::aggregate::{PortProtocolCount, TagCount};
use crate::error::{FlowTagError, Result};

pub const TAG_COUNTS_HEADER: [&str; 2] = ["Tag", "Count"];
pub const PORT_PROTOCOL_COUNTS_HEADER: [&str; 3] = ["dstport", "protocol", "count"];

/// Writes `header` followed by one CSV line per row, even when there are no rows.
/// Missing parent directories are created.
pub fn write_report<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let write_failure = |source: csv::Error| FlowTagError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_failure(e.into()))?;
    }

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_failure)?;
    wtr.write_record(header).map_err(write_failure)?;
    for row in rows {
        wtr.serialize(row).map_err(write_failure)?;
    }
    wtr.flush().map_err(|e| write_failure(e.into()))?;
    Ok(())
}

pub fn write_tag_counts(path: &Path, counts: &[TagCount]) -> Result<()> {
    write_report(path, &TAG_COUNTS_HEADER, counts)
}

pub fn write_port_protocol_counts(path: &Path, counts: &[PortProtocolCount]) -> Result<()> {
    write_report(path, &PORT_PROTOCOL_COUNTS_HEADER, counts)
}
