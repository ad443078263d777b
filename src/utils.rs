use time::macros::format_description;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::config::PipelineConfig;
use crate::error::{FlowTagError, Result};

/// `RUST_LOG` wins when set; otherwise `--verbose` selects info and the default is warn.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    num.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.chunk_size == 0 {
        return Err(FlowTagError::InvalidConfig(
            "--chunk-size must be greater than 0".to_string(),
        ));
    }

    if config.workers == 0 {
        return Err(FlowTagError::InvalidConfig(
            "--workers must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn rejects_zero_chunk_size_and_workers() {
        let mut config = PipelineConfig::with_base_dir(Path::new("."));
        assert!(validate_config(&config).is_ok());

        config.chunk_size = 0;
        assert!(validate_config(&config).is_err());

        config.chunk_size = 10;
        config.workers = 0;
        assert!(validate_config(&config).is_err());
    }
}
