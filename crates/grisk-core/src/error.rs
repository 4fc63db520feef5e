//! Unified error type for the grisk workspace
//!
//! Sampling never fails: out-of-domain draws are clamped where they are drawn
//! and empty products collapse to the multiplicative identity. What remains
//! are boundary failures (configuration, table export and reload, statistics
//! on degenerate samples) and they all funnel into [`GriskError`].
//!
//! # Example
//!
//! ```ignore
//! use grisk_core::{GriskError, GriskResult};
//!
//! fn export(path: &Path) -> GriskResult<()> {
//!     let file = File::create(path).map_err(|source| GriskError::io("creating table", path, source))?;
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unified error type for all grisk operations.
#[derive(Error, Debug)]
pub enum GriskError {
    /// File access failures, tagged with the operation and path that failed
    #[error("I/O error while {operation} '{}': {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tabular encode/decode failures on the results table
    #[error("table error while {operation} '{}': {message}", .path.display())]
    Table {
        operation: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Degenerate input to a statistical routine
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Remote dataset retrieval errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl GriskError {
    pub fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        GriskError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn table(operation: &'static str, path: &Path, message: impl ToString) -> Self {
        GriskError::Table {
            operation,
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Convenience type alias for Results using GriskError.
pub type GriskResult<T> = Result<T, GriskError>;

impl From<anyhow::Error> for GriskError {
    fn from(err: anyhow::Error) -> Self {
        GriskError::Other(err.to_string())
    }
}

impl From<String> for GriskError {
    fn from(s: String) -> Self {
        GriskError::Other(s)
    }
}

impl From<&str> for GriskError {
    fn from(s: &str) -> Self {
        GriskError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GriskError {
    fn from(err: serde_json::Error) -> Self {
        GriskError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_operation_and_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = GriskError::io("appending results to", Path::new("/tmp/out.csv"), io_err);
        let msg = err.to_string();
        assert!(msg.contains("appending results to"));
        assert!(msg.contains("/tmp/out.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_table_error_display() {
        let err = GriskError::table("reading", Path::new("results.csv"), "bad row 3");
        assert!(err.to_string().contains("bad row 3"));
        assert!(matches!(err, GriskError::Table { .. }));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GriskResult<()> {
            Err(GriskError::Validation("test".into()))
        }

        fn outer() -> GriskResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: GriskError = anyhow::anyhow!("wrapped").into();
        assert!(matches!(err, GriskError::Other(ref s) if s == "wrapped"));
    }
}
