//! Browser-driven JavaScript error collector.
//!
//! Loads a local HTML file in a headless Chromium page and records console
//! errors, uncaught exceptions, and unhandled promise rejections observed
//! during a bounded window. Requires Chrome/Chromium installed.

pub mod inspector;
pub mod record;

pub use inspector::Inspector;
pub use record::JsError;
