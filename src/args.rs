use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "flowtag",
    about = "Tag flow log records by destination port and protocol, then count tags and port/protocol pairs",
    version,
    long_about = None
)]
pub struct Args {
    /// Directory holding the lookup table and flow logs
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Lookup table CSV (dstport,protocol,tag)
    #[arg(short, long)]
    pub lookup: Option<PathBuf>,

    /// Flow log file
    #[arg(long)]
    pub logs: Option<PathBuf>,

    /// Tag count report path
    #[arg(long)]
    pub tag_output: Option<PathBuf>,

    /// Port/protocol count report path
    #[arg(long)]
    pub port_protocol_output: Option<PathBuf>,

    /// Number of log lines read per chunk
    #[arg(short, long)]
    pub chunk_size: Option<usize>,

    /// Number of tagging worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Number of top tags to print in the summary
    #[arg(short, long, default_value_t = 10)]
    pub top: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
