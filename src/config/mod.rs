//! Configuration module for StreamCopy
//!
//! Provides the CLI arguments, fixed file names and run settings.

mod settings;

pub use settings::*;
