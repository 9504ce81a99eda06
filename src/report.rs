//! Scenario reports
//!
//! Each scenario produces a [`ScenarioReport`]. Text output is the one-line
//! timing message per scenario; JSON output serializes the whole
//! [`RunReport`].

use crate::core::{CopyTask, TimingSample};
use crate::error::{Result, StreamCopyError};
use crate::fs::CopyStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The measured scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// One copy on the calling thread
    Single,
    /// Copies one after another on the calling thread
    Sequential,
    /// Copies submitted to the worker pool
    Parallel,
}

/// A task that failed, with its error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    /// Source path of the failed task
    pub source: PathBuf,
    /// Destination path of the failed task
    pub destination: PathBuf,
    /// Error message
    pub error: String,
}

impl TaskFailure {
    /// Record a failure of `task`
    pub fn new(task: &CopyTask, error: &StreamCopyError) -> Self {
        Self {
            source: task.source.clone(),
            destination: task.destination.clone(),
            error: error.to_string(),
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Which scenario ran
    pub scenario: Scenario,
    /// Wall-clock start time
    pub started_at: DateTime<Utc>,
    /// Elapsed monotonic time in nanoseconds
    pub elapsed_ns: u64,
    /// Files copied successfully
    pub files_copied: u64,
    /// Bytes copied successfully
    pub bytes_copied: u64,
    /// Failed tasks
    pub failures: Vec<TaskFailure>,
    /// Tasks never started because an earlier one failed
    pub skipped: usize,
    /// The wait for pool results was interrupted
    pub interrupted: bool,
}

impl ScenarioReport {
    /// Start an empty report for `scenario`
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            started_at: Utc::now(),
            elapsed_ns: 0,
            files_copied: 0,
            bytes_copied: 0,
            failures: Vec::new(),
            skipped: 0,
            interrupted: false,
        }
    }

    /// Count a successful copy
    pub fn record_success(&mut self, stats: &CopyStats) {
        self.files_copied += 1;
        self.bytes_copied += stats.bytes_copied;
    }

    /// Count a failed copy
    pub fn record_failure(&mut self, task: &CopyTask, error: &StreamCopyError) {
        self.failures.push(TaskFailure::new(task, error));
    }

    /// Set the elapsed time from a timing sample
    pub fn finish(&mut self, timing: TimingSample) {
        self.elapsed_ns = timing.elapsed_nanos();
    }

    /// Check if every task copied without error or interruption
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0 && !self.interrupted
    }

    /// The line printed to standard output for this scenario.
    ///
    /// A failed single copy prints nothing; its diagnostic is the error log.
    pub fn summary_line(&self) -> Option<String> {
        match self.scenario {
            Scenario::Single if self.is_success() => Some(format!(
                "File copied successfully. Copy time: {} ns",
                self.elapsed_ns
            )),
            Scenario::Single => None,
            Scenario::Sequential => Some(format!("Sequential copy time: {} ns", self.elapsed_ns)),
            Scenario::Parallel => Some(format!("Parallel copy time: {} ns", self.elapsed_ns)),
        }
    }

    /// Print the summary line, if any
    pub fn print_line(&self) {
        if let Some(line) = self.summary_line() {
            println!("{}", line);
        }
    }
}

/// Reports for a full run, in execution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Top-level single copy
    pub single: ScenarioReport,
    /// Sequential copies
    pub sequential: ScenarioReport,
    /// Pooled parallel copies
    pub parallel: ScenarioReport,
}

impl RunReport {
    /// Scenario reports in execution order
    pub fn scenarios(&self) -> [&ScenarioReport; 3] {
        [&self.single, &self.sequential, &self.parallel]
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
