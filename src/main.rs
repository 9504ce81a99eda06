//! StreamCopy CLI - timed single, sequential and parallel file copies

use clap::Parser;
use streamcopy::config::{BenchConfig, CliArgs, OutputFormat};
use streamcopy::core::run_all;
use streamcopy::error::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = BenchConfig::from_cli(args)?;
    tracing::info!(
        "Copying files under {} with {} workers",
        config.base_dir.display(),
        config.workers
    );

    let report = run_all(&config);

    if config.output_format == OutputFormat::Json {
        println!("{}", report.to_json()?);
    }

    Ok(())
}
