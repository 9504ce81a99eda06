//! Core copy scenarios
//!
//! Provides the copy task, the fixed-size worker pool, timing samples
//! and the single, sequential and parallel runners.

mod runner;
mod scheduler;
mod timing;

pub use runner::*;
pub use scheduler::*;
pub use timing::*;
