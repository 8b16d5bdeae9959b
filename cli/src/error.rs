use std::path::PathBuf;

use thiserror::Error;
use uplink_core::UplinkError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Uplink(#[from] UplinkError),

    #[error("input and output filenames are the same: {}", .0.display())]
    SamePath(PathBuf),
}

pub type Result<T> = std::result::Result<T, CliError>;
