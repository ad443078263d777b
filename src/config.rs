use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::reader::DEFAULT_CHUNK_SIZE;
use crate::tagger::default_worker_count;

pub const DATA_DIR: &str = "data";
pub const OUTPUT_DIR: &str = "output";
pub const LOOKUP_FILE: &str = "lookup_table.csv";
pub const FLOW_LOGS_FILE: &str = "logs.txt";
pub const TAG_COUNTS_FILE: &str = "tag_counts.csv";
pub const PORT_PROTOCOL_COUNTS_FILE: &str = "port_protocol_counts.csv";

/// Fully resolved inputs and outputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub lookup_path: PathBuf,
    pub flow_logs_path: PathBuf,
    pub tag_counts_path: PathBuf,
    pub port_protocol_counts_path: PathBuf,
    pub chunk_size: usize,
    pub workers: usize,
}

impl PipelineConfig {
    /// Default file layout under `base`: `data/` for inputs, `output/` for reports.
    pub fn with_base_dir(base: &Path) -> Self {
        let data_dir = base.join(DATA_DIR);
        let output_dir = base.join(OUTPUT_DIR);
        Self {
            lookup_path: data_dir.join(LOOKUP_FILE),
            flow_logs_path: data_dir.join(FLOW_LOGS_FILE),
            tag_counts_path: output_dir.join(TAG_COUNTS_FILE),
            port_protocol_counts_path: output_dir.join(PORT_PROTOCOL_COUNTS_FILE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: default_worker_count(),
        }
    }

    /// Explicit file paths win over directory overrides, which win over defaults.
    pub fn from_args(args: &Args) -> Self {
        let defaults = Self::with_base_dir(Path::new("."));

        let data_dir = args.data_dir.as_deref();
        let output_dir = args.output_dir.as_deref();
        let resolve = |explicit: &Option<PathBuf>, dir: Option<&Path>, file: &str, fallback: PathBuf| {
            explicit
                .clone()
                .or_else(|| dir.map(|d| d.join(file)))
                .unwrap_or(fallback)
        };

        Self {
            lookup_path: resolve(&args.lookup, data_dir, LOOKUP_FILE, defaults.lookup_path),
            flow_logs_path: resolve(&args.logs, data_dir, FLOW_LOGS_FILE, defaults.flow_logs_path),
            tag_counts_path: resolve(
                &args.tag_output,
                output_dir,
                TAG_COUNTS_FILE,
                defaults.tag_counts_path,
            ),
            port_protocol_counts_path: resolve(
                &args.port_protocol_output,
                output_dir,
                PORT_PROTOCOL_COUNTS_FILE,
                defaults.port_protocol_counts_path,
            ),
            chunk_size: args.chunk_size.unwrap_or(defaults.chunk_size),
            workers: args.workers.unwrap_or(defaults.workers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_data_and_output_layout() {
        let config = PipelineConfig::from_args(&Args::default());

        assert_eq!(config.lookup_path, Path::new("./data/lookup_table.csv"));
        assert_eq!(config.flow_logs_path, Path::new("./data/logs.txt"));
        assert_eq!(config.tag_counts_path, Path::new("./output/tag_counts.csv"));
        assert_eq!(
            config.port_protocol_counts_path,
            Path::new("./output/port_protocol_counts.csv")
        );
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.workers >= 1);
    }

    #[test]
    fn directory_overrides_apply_to_unset_paths() {
        let args = Args {
            data_dir: Some(PathBuf::from("/srv/in")),
            output_dir: Some(PathBuf::from("/srv/out")),
            logs: Some(PathBuf::from("/var/log/flows.log")),
            chunk_size: Some(500),
            workers: Some(2),
            ..Args::default()
        };

        let config = PipelineConfig::from_args(&args);

        assert_eq!(config.lookup_path, Path::new("/srv/in/lookup_table.csv"));
        assert_eq!(config.flow_logs_path, Path::new("/var/log/flows.log"));
        assert_eq!(config.tag_counts_path, Path::new("/srv/out/tag_counts.csv"));
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.workers, 2);
    }
}
