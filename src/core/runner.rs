//! Timed copy scenarios
//!
//! A single copy and the sequential scenario run on the calling thread. The
//! parallel scenario hands every task to a [`WorkerPool`]. Copy failures are
//! logged and recorded in the returned report; they never abort the run.

use crate::config::{BenchConfig, OutputFormat};
use crate::core::{CopyTask, TimingSample, WaitInterrupt, WorkerPool};
use crate::report::{RunReport, Scenario, ScenarioReport};
use std::time::Instant;

/// Copy one file and time it
pub fn single_copy(task: &CopyTask) -> ScenarioReport {
    let mut report = ScenarioReport::new(Scenario::Single);
    let start = Instant::now();

    match task.run() {
        Ok(stats) => report.record_success(&stats),
        Err(e) => report.record_failure(task, &e),
    }

    report.finish(TimingSample::since(start));
    report
}

/// Copy every task in order on the calling thread.
///
/// The first failure stops the sequence; later tasks are counted as skipped.
pub fn sequential_copy(tasks: &[CopyTask]) -> ScenarioReport {
    let mut report = ScenarioReport::new(Scenario::Sequential);
    let start = Instant::now();

    for (index, task) in tasks.iter().enumerate() {
        match task.run() {
            Ok(stats) => report.record_success(&stats),
            Err(e) => {
                report.record_failure(task, &e);
                report.skipped = tasks.len() - index - 1;
                if report.skipped > 0 {
                    tracing::warn!(
                        "Sequential copy stopped, skipping {} remaining task(s)",
                        report.skipped
                    );
                }
                break;
            }
        }
    }

    report.finish(TimingSample::since(start));
    report
}

/// Copy every task concurrently on a pool of `workers` threads
pub fn parallel_copy(tasks: &[CopyTask], workers: usize) -> ScenarioReport {
    parallel_copy_interruptible(tasks, workers, &WaitInterrupt::new())
}

/// Like [`parallel_copy`], but the wait for results ends early when
/// `interrupt` fires.
///
/// Tasks are independent: one failure does not cancel the others. The pool
/// is shut down before returning, whatever happened to the tasks or the wait.
pub fn parallel_copy_interruptible(
    tasks: &[CopyTask],
    workers: usize,
    interrupt: &WaitInterrupt,
) -> ScenarioReport {
    let mut report = ScenarioReport::new(Scenario::Parallel);
    let start = Instant::now();

    let mut pool = match WorkerPool::new(workers) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Could not start worker pool: {}", e);
            for task in tasks {
                report.record_failure(task, &e);
            }
            report.finish(TimingSample::since(start));
            return report;
        }
    };

    for task in tasks {
        if let Err(e) = pool.submit(task.clone()) {
            tracing::error!("Could not submit {}: {}", task.source.display(), e);
            report.record_failure(task, &e);
        }
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    if let Err(e) = pool.wait_all(&mut outcomes, Some(interrupt)) {
        tracing::error!("Parallel copy: {}", e);
        report.interrupted = true;
    }

    report.finish(TimingSample::since(start));
    pool.shutdown();
    // Tasks that finished after an interrupted wait still report
    pool.drain_outcomes(&mut outcomes);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(stats) => report.record_success(stats),
            Err(e) => report.record_failure(&outcome.task, e),
        }
    }

    report
}

/// Run the single, sequential and parallel scenarios in order.
///
/// With text output each scenario's line is printed as soon as it finishes.
pub fn run_all(config: &BenchConfig) -> RunReport {
    let print = config.output_format == OutputFormat::Text;
    let pairs = config.paired_tasks();

    let single = single_copy(&config.single_task());
    if print {
        single.print_line();
    }

    let sequential = sequential_copy(&pairs);
    if print {
        sequential.print_line();
    }

    let parallel = parallel_copy(&pairs, config.workers);
    if print {
        parallel.print_line();
    }

    RunReport {
        single,
        sequential,
        parallel,
    }
}
