//! Copy tasks and the fixed-size worker pool
//!
//! Tasks are handed to workers over a crossbeam channel and every worker
//! sends back one [`TaskOutcome`] per task. A failed copy is an `Err` inside
//! the outcome, never a lost result. Dropping the pool closes the job queue
//! and joins every worker thread.

use crate::error::{Result, StreamCopyError};
use crate::fs::{copy_file_using_stream, CopyStats};
use crossbeam::channel::{never, select, unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Signature of the function a worker runs for each task
pub type CopyFn = fn(&Path, &Path) -> Result<CopyStats>;

/// A single source-to-destination copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyTask {
    /// File to read
    pub source: PathBuf,
    /// File to create or truncate
    pub destination: PathBuf,
}

impl CopyTask {
    /// Create a new copy task
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Run the copy on the calling thread
    pub fn run(&self) -> Result<CopyStats> {
        copy_file_using_stream(&self.source, &self.destination)
    }
}

/// Result of a task executed by the pool
#[derive(Debug)]
pub struct TaskOutcome {
    /// Task ID assigned at submission
    pub task_id: u64,
    /// The task that ran
    pub task: CopyTask,
    /// Success or failure
    pub result: Result<CopyStats>,
}

impl TaskOutcome {
    /// Check if the task copied its file
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

struct Job {
    id: u64,
    task: CopyTask,
}

/// Handle used to interrupt a thread blocked in [`WorkerPool::wait_all`].
///
/// Interrupting only ends the wait. Tasks already submitted keep running.
#[derive(Debug, Clone)]
pub struct WaitInterrupt {
    sender: Sender<()>,
    receiver: Receiver<()>,
}

impl WaitInterrupt {
    /// Create a new, untriggered interrupt handle
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Interrupt the waiting thread
    pub fn interrupt(&self) {
        let _ = self.sender.send(());
    }
}

impl Default for WaitInterrupt {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts a worker as live for as long as its thread runs, panics included
struct LiveWorker(Arc<AtomicUsize>);

impl LiveWorker {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LiveWorker {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fixed-size pool of copy workers
pub struct WorkerPool {
    /// Job sender, `None` once the pool is shut down
    job_sender: Option<Sender<Job>>,
    /// Outcomes sent back by workers
    result_receiver: Receiver<TaskOutcome>,
    /// Worker threads
    handles: Vec<thread::JoinHandle<()>>,
    /// Number of worker threads currently running
    live_workers: Arc<AtomicUsize>,
    /// Next task ID
    next_task_id: u64,
    /// Outcomes still owed to the waiter
    pending: usize,
}

impl WorkerPool {
    /// Create a pool of `workers` threads running the stream copier
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_copier(workers, copy_file_using_stream)
    }

    /// Create a pool of `workers` threads running `copier` for each task
    pub fn with_copier(workers: usize, copier: CopyFn) -> Result<Self> {
        if workers == 0 {
            return Err(StreamCopyError::ThreadPoolError(
                "worker count must be at least 1".to_string(),
            ));
        }

        let (job_sender, job_receiver) = unbounded::<Job>();
        let (result_sender, result_receiver) = unbounded::<TaskOutcome>();

        let mut pool = Self {
            job_sender: Some(job_sender),
            result_receiver,
            handles: Vec::with_capacity(workers),
            live_workers: Arc::new(AtomicUsize::new(0)),
            next_task_id: 0,
            pending: 0,
        };

        for worker_id in 0..workers {
            let jobs = job_receiver.clone();
            let results = result_sender.clone();
            let live = Arc::clone(&pool.live_workers);

            let handle = thread::Builder::new()
                .name(format!("copy-worker-{}", worker_id))
                .spawn(move || {
                    let _live = LiveWorker::enter(live);
                    worker_loop(worker_id, copier, jobs, results);
                })
                .map_err(|e| {
                    StreamCopyError::ThreadPoolError(format!(
                        "failed to spawn worker {}: {}",
                        worker_id, e
                    ))
                })?;

            pool.handles.push(handle);
        }

        tracing::debug!("Started worker pool with {} workers", workers);
        Ok(pool)
    }

    /// Number of worker threads the pool was started with
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Shared counter of worker threads still running
    pub fn live_workers(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_workers)
    }

    /// Submit a task
    pub fn submit(&mut self, task: CopyTask) -> Result<u64> {
        let sender = self.job_sender.as_ref().ok_or_else(|| {
            StreamCopyError::ThreadPoolError("pool is shut down".to_string())
        })?;

        let id = self.next_task_id;
        sender
            .send(Job { id, task })
            .map_err(|_| StreamCopyError::ThreadPoolError("Failed to submit task".to_string()))?;

        self.next_task_id += 1;
        self.pending += 1;
        Ok(id)
    }

    /// Block until every submitted task has reported, appending outcomes in
    /// completion order.
    ///
    /// Returns [`StreamCopyError::InterruptedWait`] if `interrupt` fires or
    /// the workers disappear before all outcomes arrive. Outcomes received up
    /// to that point are kept in `outcomes`.
    pub fn wait_all(
        &mut self,
        outcomes: &mut Vec<TaskOutcome>,
        interrupt: Option<&WaitInterrupt>,
    ) -> Result<()> {
        let expected = self.pending;
        let mut received = 0;
        let results = self.result_receiver.clone();
        let stop = interrupt
            .map(|i| i.receiver.clone())
            .unwrap_or_else(never);

        while self.pending > 0 {
            if stop.try_recv().is_ok() {
                return Err(StreamCopyError::InterruptedWait { received, expected });
            }

            select! {
                recv(results) -> msg => match msg {
                    Ok(outcome) => {
                        self.pending -= 1;
                        received += 1;
                        outcomes.push(outcome);
                    }
                    Err(_) => {
                        return Err(StreamCopyError::InterruptedWait { received, expected });
                    }
                },
                recv(stop) -> _ => {
                    return Err(StreamCopyError::InterruptedWait { received, expected });
                }
            }
        }

        Ok(())
    }

    /// Move outcomes that are already available into `outcomes` without
    /// blocking. Returns how many were collected.
    ///
    /// After [`shutdown`](Self::shutdown) this picks up every task that
    /// finished after an interrupted [`wait_all`](Self::wait_all).
    pub fn drain_outcomes(&mut self, outcomes: &mut Vec<TaskOutcome>) -> usize {
        let before = outcomes.len();
        outcomes.extend(self.result_receiver.try_iter());

        let drained = outcomes.len() - before;
        self.pending = self.pending.saturating_sub(drained);
        drained
    }

    /// Close the job queue and join every worker.
    ///
    /// Queued tasks still run before the workers exit. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.job_sender.take().is_none() && self.handles.is_empty() {
            return;
        }

        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Copy worker exited with a panic");
            }
        }

        tracing::debug!("Worker pool shut down");
    }

    /// Check if shutdown has completed
    pub fn is_shutdown(&self) -> bool {
        self.job_sender.is_none() && self.handles.is_empty()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    worker_id: usize,
    copier: CopyFn,
    jobs: Receiver<Job>,
    results: Sender<TaskOutcome>,
) {
    for job in jobs.iter() {
        tracing::trace!("Worker {} running task {}", worker_id, job.id);

        let result = catch_unwind(AssertUnwindSafe(|| {
            copier(&job.task.source, &job.task.destination)
        }))
        .unwrap_or_else(|_| {
            tracing::error!("Task {} panicked on worker {}", job.id, worker_id);
            Err(StreamCopyError::ThreadPoolError(format!(
                "task {} panicked on worker {}",
                job.id, worker_id
            )))
        });

        if result.is_err() {
            tracing::debug!("Task {} failed on worker {}", job.id, worker_id);
        }

        let outcome = TaskOutcome {
            task_id: job.id,
            task: job.task,
            result,
        };

        if results.send(outcome).is_err() {
            break;
        }
    }

    tracing::debug!("Worker {} shutting down", worker_id);
}
