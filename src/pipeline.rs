use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::aggregate::{aggregate, Aggregates, PortProtocolCount, TagCount};
use crate::config::PipelineConfig;
use crate::error::{FlowTagError, Result};
use crate::lookup::LookupTable;
use crate::observer::RunObserver;
use crate::reader::ChunkedLogReader;
use crate::record::{parse_lines, TaggedRecord};
use crate::report;
use crate::tagger::Tagger;
use crate::utils::{format_number, validate_config};

/// Tagged records accumulated over every chunk of a log file, in file order.
#[derive(Debug, Default)]
pub struct ProcessedLogs {
    pub records: Vec<TaggedRecord>,
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub chunks: usize,
}

#[derive(Debug)]
pub struct PipelineSummary {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub lines_skipped: usize,
    pub chunks: usize,
    pub tag_counts: Vec<TagCount>,
    pub port_protocol_counts: Vec<PortProtocolCount>,
    pub tag_counts_path: PathBuf,
    pub port_protocol_counts_path: PathBuf,
}

/// Reads, parses and tags a log file one chunk at a time. Each chunk is tagged before
/// the next is read.
pub fn process_logs(
    path: &Path,
    chunk_size: usize,
    tagger: &Tagger<'_>,
    observer: &dyn RunObserver,
) -> Result<ProcessedLogs> {
    let reader = ChunkedLogReader::open(path, chunk_size)?;
    let mut processed = ProcessedLogs::default();

    for batch in reader {
        let lines = batch.map_err(|source| FlowTagError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let (records, skipped) = parse_lines(&lines);
        let parsed = records.len();

        processed.records.extend(tagger.tag(records));
        processed.lines_read += lines.len();
        processed.lines_skipped += skipped;
        processed.chunks += 1;

        observer.chunk_processed(processed.chunks, lines.len(), parsed, skipped);
    }

    observer.logs_processed(
        processed.records.len(),
        processed.lines_skipped,
        processed.chunks,
    );
    Ok(processed)
}

/// Validate the config, load, tag chunk by chunk, aggregate, then write both reports.
/// Progress is reported only through `observer`.
pub fn run_pipeline(config: &PipelineConfig, observer: &dyn RunObserver) -> Result<PipelineSummary> {
    validate_config(config)?;
    let total_start_time = Instant::now();
    observer.run_started();

    let load_start_time = Instant::now();
    observer.lookup_loading(&config.lookup_path);
    let table = LookupTable::load(&config.lookup_path)?;
    observer.lookup_loaded(
        &config.lookup_path,
        table.len(),
        table.tag_count(),
        load_start_time.elapsed(),
    );

    let tagger = Tagger::with_workers(&table, config.workers)?;
    observer.tagger_configured(tagger.worker_count());
    let processed = process_logs(&config.flow_logs_path, config.chunk_size, &tagger, observer)?;

    let Aggregates {
        tag_counts,
        port_protocol_counts,
    } = aggregate(&processed.records);

    let write_start_time = Instant::now();
    report::write_tag_counts(&config.tag_counts_path, &tag_counts)?;
    observer.report_written(&config.tag_counts_path, tag_counts.len(), write_start_time.elapsed());

    let write_start_time = Instant::now();
    report::write_port_protocol_counts(&config.port_protocol_counts_path, &port_protocol_counts)?;
    observer.report_written(
        &config.port_protocol_counts_path,
        port_protocol_counts.len(),
        write_start_time.elapsed(),
    );

    observer.run_completed(total_start_time.elapsed());

    Ok(PipelineSummary {
        lines_read: processed.lines_read,
        records_parsed: processed.records.len(),
        lines_skipped: processed.lines_skipped,
        chunks: processed.chunks,
        tag_counts,
        port_protocol_counts,
        tag_counts_path: config.tag_counts_path.clone(),
        port_protocol_counts_path: config.port_protocol_counts_path.clone(),
    })
}

pub fn print_summary(summary: &PipelineSummary, top: usize) {
    println!("\n--- Flow Log Tagging Summary ---");
    println!(
        "Lines read: {} ({} chunks)",
        format_number(summary.lines_read as u64),
        format_number(summary.chunks as u64)
    );
    println!(
        "Records tagged: {}",
        format_number(summary.records_parsed as u64)
    );
    println!(
        "Lines skipped (malformed): {}",
        format_number(summary.lines_skipped as u64)
    );
    println!(
        "Distinct tags: {}, distinct port/protocol pairs: {}",
        format_number(summary.tag_counts.len() as u64),
        format_number(summary.port_protocol_counts.len() as u64)
    );

    if top > 0 && !summary.tag_counts.is_empty() {
        let mut sorted: Vec<&TagCount> = summary.tag_counts.iter().collect();
        // Stable, so ties keep first-seen order.
        sorted.sort_by(|a, b| b.count.cmp(&a.count));

        println!(
            "\nTop {} tags:",
            std::cmp::min(top, sorted.len())
        );
        for tag in sorted.iter().take(top) {
            println!("- {}: {}", tag.tag, format_number(tag.count));
        }
    }

    println!("\nTag counts saved to {}", summary.tag_counts_path.display());
    println!(
        "Port-protocol counts saved to {}",
        summary.port_protocol_counts_path.display()
    );
}
