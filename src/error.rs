//! Crate-wide error type.
//!
//! Every failure in the pipeline is a hard stop. The `ErrorKind` decides the
//! process exit code so scripts can tell an input problem from a fit failure.

use std::path::Path;

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input file, missing column, or malformed value.
    InputSchema,
    /// Regression did not converge or had nothing to fit.
    Fitting,
    /// Degenerate input to a correlation test.
    Statistics,
    /// Output directory or file could not be created/written.
    Io,
    /// Checksum manifest does not match the files on disk.
    Verification,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InputSchema => 2,
            ErrorKind::Fitting => 3,
            ErrorKind::Statistics => 4,
            ErrorKind::Io => 5,
            ErrorKind::Verification => 6,
        }
    }
}

#[derive(Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn input_schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputSchema, message)
    }

    pub fn fitting(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fitting, message)
    }

    pub fn statistics(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Statistics, message)
    }

    /// I/O failure tied to a concrete path.
    pub fn io(action: &str, path: &Path, err: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::Io,
            format!("Failed to {action} '{}': {err}", path.display()),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}
