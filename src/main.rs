use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use flowtag::{utils, Args, PipelineConfig, TracingObserver};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    // Config validation runs inside the pipeline, so every fatal error ends up here.
    let config = PipelineConfig::from_args(&args);
    match flowtag::run_pipeline(&config, &TracingObserver).context("Flow log tagging failed") {
        Ok(summary) => {
            flowtag::print_summary(&summary, args.top);
            Ok(())
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(action = "abort", component = "pipeline", error = %message, "Run aborted");
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    }
}
