//! Error types shared across ftdcview crates.

use std::path::PathBuf;

/// Top-level error type for ftdcview operations.
#[derive(Debug, thiserror::Error)]
pub enum FtdcViewError {
    /// The capture file could not be decoded. Decoding never yields partial results.
    #[error("Decode error at line {line}: {message}")]
    Decode { line: usize, message: String },

    /// A series store or script file could not be created or written.
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FtdcViewError.
pub type FtdcViewResult<T> = Result<T, FtdcViewError>;

impl FtdcViewError {
    pub fn decode(line: usize, msg: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: msg.into(),
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_line() {
        let err = FtdcViewError::decode(7, "expected value");
        assert_eq!(err.to_string(), "Decode error at line 7: expected value");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
        let err: FtdcViewError = io.into();
        assert_eq!(err.to_string(), "no access");
    }
}
