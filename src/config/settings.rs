//! Configuration settings for StreamCopy
//!
//! Defines the CLI arguments, the fixed file names and the run
//! configuration built from them.

use crate::core::CopyTask;
use crate::error::{Result, StreamCopyError};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the input and output files
pub const DEFAULT_DIR: &str = "src";
/// Source of the single copy
pub const SOURCE_FILE: &str = "source.txt";
/// Destination of the single copy
pub const DESTINATION_FILE: &str = "destination.txt";
/// Source of the first paired copy
pub const SOURCE_FILE_1: &str = "sFile1.txt";
/// Destination of the first paired copy
pub const DEST_FILE_1: &str = "dFile1.txt";
/// Source of the second paired copy
pub const SOURCE_FILE_2: &str = "sFile2.txt";
/// Destination of the second paired copy
pub const DEST_FILE_2: &str = "dFile2.txt";
/// Worker threads in the parallel scenario
pub const DEFAULT_WORKERS: usize = 2;

/// StreamCopy - time buffered file copies run singly, sequentially and in parallel
#[derive(Parser, Debug, Clone)]
#[command(name = "streamcopy")]
#[command(author = "StreamCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Time buffered file copies: single, sequential and parallel")]
#[command(long_about = r#"
StreamCopy copies files through a 1 KiB buffer and reports elapsed time
in nanoseconds for three scenarios:

  1. source.txt -> destination.txt
  2. sFile1.txt -> dFile1.txt, then sFile2.txt -> dFile2.txt
  3. the same two copies on a two-worker pool

Examples:
  streamcopy                     # Files under ./src
  streamcopy --dir data          # Files under ./data
  streamcopy --output-format json
"#)]
pub struct CliArgs {
    /// Directory containing the source and destination files
    #[arg(short = 'd', long, default_value = DEFAULT_DIR, value_name = "PATH")]
    pub dir: PathBuf,

    /// Number of worker threads for the parallel copy
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub workers: usize,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Default log filter directive when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Directory prefix for every file
    pub base_dir: PathBuf,
    /// Worker threads for the parallel copy
    pub workers: usize,
    /// How results are printed
    pub output_format: OutputFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_DIR),
            workers: DEFAULT_WORKERS,
            output_format: OutputFormat::Text,
        }
    }
}

impl BenchConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let config = Self {
            base_dir: args.dir.clone(),
            workers: args.workers,
            output_format: args.output_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config rooted at `dir` with default settings
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Check settings that would make a run impossible
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(StreamCopyError::config("--workers must be at least 1"));
        }
        Ok(())
    }

    /// The single top-level copy
    pub fn single_task(&self) -> CopyTask {
        CopyTask::new(
            self.base_dir.join(SOURCE_FILE),
            self.base_dir.join(DESTINATION_FILE),
        )
    }

    /// The two copies used by the sequential and parallel scenarios
    pub fn paired_tasks(&self) -> Vec<CopyTask> {
        vec![
            CopyTask::new(
                self.base_dir.join(SOURCE_FILE_1),
                self.base_dir.join(DEST_FILE_1),
            ),
            CopyTask::new(
                self.base_dir.join(SOURCE_FILE_2),
                self.base_dir.join(DEST_FILE_2),
            ),
        ]
    }
}
