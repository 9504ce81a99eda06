//! File system operations module
//!
//! Provides the buffered stream copy used by every scenario.

mod operations;

pub use operations::*;
