//! Core types, config, and errors for codeprobe.

pub mod config;
pub mod error;

pub use error::{CodeprobeError, Result};
