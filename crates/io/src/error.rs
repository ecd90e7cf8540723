//! Error types for aepsel-io.

use std::path::PathBuf;

use aepsel_events::EventError;
use aepsel_ifd::IfdError;
use aepsel_select::SelectError;

/// Error type for all fallible operations in the aepsel-io crate.
///
/// Covers file-system failures, JSON decoding problems, structural
/// validation of decoded files, and errors raised while turning decoded
/// files into domain types.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a file-system failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps a JSON encoding or decoding failure.
    #[error("json error in {}: {reason}", path.display())]
    Json {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Event catalog or tensor construction error.
    #[error(transparent)]
    Event(#[from] EventError),

    /// IFD table construction error.
    #[error(transparent)]
    Ifd(#[from] IfdError),

    /// Target table or report error.
    #[error(transparent)]
    Select(#[from] SelectError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.json");
    }

    #[test]
    fn display_json() {
        let err = IoError::Json {
            path: PathBuf::from("levels.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "json error in levels.json: expected value at line 1 column 1"
        );
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "sites must be > 0; values has 3 entries, expected 4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): sites must be > 0; values has 3 entries, expected 4"
        );
    }

    #[test]
    fn from_event_error() {
        let err: IoError = EventError::UnknownDurationClass { hours: 6 }.into();
        assert!(matches!(err, IoError::Event(_)));
        assert_eq!(err.to_string(), "unknown duration class: 6 h");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
