use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeprobeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Base64 decode error: {0}")]
    Decode(String),

    #[error("merge requires an output path")]
    MissingOutput,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Inspector is closed")]
    InspectorClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CodeprobeError>;
