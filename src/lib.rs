//! # StreamCopy - timed buffered file copies
//!
//! StreamCopy copies files through a fixed 1 KiB buffer and measures how
//! long three scenarios take: one copy, two copies back-to-back, and the same
//! two copies on a two-worker thread pool.
//!
//! ## Quick Start
//!
//! ```no_run
//! use streamcopy::config::BenchConfig;
//! use streamcopy::core::run_all;
//!
//! let config = BenchConfig::in_dir("src");
//! let report = run_all(&config);
//!
//! println!("{}", report.to_json().unwrap());
//! ```
//!
//! ## Copying With the Pool
//!
//! ```no_run
//! use streamcopy::core::{CopyTask, WorkerPool};
//!
//! let mut pool = WorkerPool::new(2).unwrap();
//! pool.submit(CopyTask::new("src/sFile1.txt", "src/dFile1.txt")).unwrap();
//! pool.submit(CopyTask::new("src/sFile2.txt", "src/dFile2.txt")).unwrap();
//!
//! let mut outcomes = Vec::new();
//! pool.wait_all(&mut outcomes, None).unwrap();
//! pool.shutdown();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod report;

// Re-export commonly used types
pub use crate::config::BenchConfig;
pub use crate::core::{CopyTask, WorkerPool};
pub use crate::error::{Result, StreamCopyError};
pub use crate::report::{RunReport, ScenarioReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
