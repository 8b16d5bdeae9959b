use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UplinkError {
    #[error("CRC residual 0x{residual:04X} instead of 0")]
    ChecksumMismatch { residual: u16 },

    #[error("only {written} of {expected} serial bytes written")]
    ShortWrite { written: usize, expected: usize },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, UplinkError>;
