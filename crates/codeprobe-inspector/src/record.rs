//! Error records collected during an inspection run.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// A single JavaScript error observed while a page was loaded.
///
/// Immutable after creation; one record per console-error or
/// uncaught-exception event, plus a synthetic record for load failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsError {
    pub message: String,
    /// 1-based line number, 0 when unknown.
    pub line_number: u64,
    /// 1-based column number, 0 when unknown.
    pub column_number: u64,
    /// Path of the inspected file.
    pub source_url: String,
    /// Verbatim stack trace, empty when none was available.
    pub stack_trace: String,
}

impl JsError {
    /// Record for a console message of severity "error". Console errors
    /// carry no position or stack information.
    pub fn console_error(message: String, source_url: String) -> Self {
        Self {
            message,
            line_number: 0,
            column_number: 0,
            source_url,
            stack_trace: String::new(),
        }
    }

    /// Record for an uncaught page exception. Line and column come from the
    /// first `:<line>:<column>` pattern in the stack text, if any.
    pub fn page_error(message: String, stack_trace: String, source_url: String) -> Self {
        let (line_number, column_number) = extract_line_column(&stack_trace);
        Self {
            message,
            line_number,
            column_number,
            source_url,
            stack_trace,
        }
    }

    /// Synthetic record for a navigation that failed or timed out. The
    /// message prefix distinguishes it from in-page errors.
    pub fn load_failure(detail: String, source_url: String) -> Self {
        Self {
            message: format!("page load error: {detail}"),
            line_number: 0,
            column_number: 0,
            source_url,
            stack_trace: String::new(),
        }
    }
}

/// Scan a stack trace for the first `:<line>:<column>` occurrence.
///
/// Deliberately naive: the first match anywhere in the trace wins, which
/// may not be the throw site. Returns (0, 0) when nothing matches or a
/// number overflows.
pub fn extract_line_column(stack: &str) -> (u64, u64) {
    static LINE_COL: OnceLock<Regex> = OnceLock::new();
    let re = LINE_COL.get_or_init(|| Regex::new(r":(\d+):(\d+)").unwrap());

    let Some(caps) = re.captures(stack) else {
        return (0, 0);
    };
    let line = caps[1].parse().unwrap_or(0);
    let column = caps[2].parse().unwrap_or(0);
    (line, column)
}
