use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish a clean run from one where
/// some workers failed but an inventory was still produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every worker completed without error
    Success = 0,
    /// At least one worker failed; the inventory contains the remaining output
    PartialFailure = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (I/O error, decode error, invalid configuration, etc.)
    ApplicationError = 3,
    /// The run was interrupted before all workers completed
    Cancelled = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PartialFailure => write!(f, "Partial Failure (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::Cancelled => write!(f, "Cancelled (130)"),
        }
    }
}

/// Errors surfaced by the cataloging core.
///
/// Per-location and per-relationship problems are recovered where they
/// happen and only logged; the variants here are the ones that reach a
/// caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cataloging was cancelled before all workers completed")]
    Cancelled,

    #[error("{failed} of {total} workers failed: {details}")]
    WorkersFailed {
        failed: usize,
        total: usize,
        details: String,
    },

    #[error("Package identity invariant violated for {id}: {details}")]
    InvariantViolation { id: String, details: String },

    #[error("Failed to read location: {path}\nDetails: {details}")]
    LocationRead { path: String, details: String },

    #[error("Invalid source path: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing directory to scan")]
    InvalidSourcePath { path: PathBuf, reason: String },

    #[error("Failed to decode {format} document\nDetails: {details}\n\n💡 Hint: Please verify that the input is a supported inventory document")]
    Decode { format: String, details: String },

    #[error("Unknown output format: {name}\n\n💡 Hint: Supported formats are: {supported}")]
    UnknownFormat { name: String, supported: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration: {field}: {reason}")]
    Config { field: String, reason: String },
}

impl CatalogError {
    /// Maps an error to the process exit code the CLI should use.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CatalogError::Cancelled => ExitCode::Cancelled,
            CatalogError::WorkersFailed { .. } => ExitCode::PartialFailure,
            _ => ExitCode::ApplicationError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::PartialFailure.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
        assert_eq!(ExitCode::Cancelled.as_i32(), 130);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::PartialFailure),
            "Partial Failure (1)"
        );
        assert_eq!(format!("{}", ExitCode::Cancelled), "Cancelled (130)");
    }

    #[test]
    fn test_workers_failed_display() {
        let error = CatalogError::WorkersFailed {
            failed: 1,
            total: 3,
            details: "rpm-db-cataloger: corrupt header".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.starts_with("1 of 3 workers failed"));
        assert!(display.contains("rpm-db-cataloger"));
    }

    #[test]
    fn test_cancelled_is_distinguishable() {
        let error = CatalogError::Cancelled;
        assert_eq!(error.exit_code(), ExitCode::Cancelled);

        let wrapped: anyhow::Error = CatalogError::Cancelled.into();
        assert!(matches!(
            wrapped.downcast_ref::<CatalogError>(),
            Some(CatalogError::Cancelled)
        ));
    }

    #[test]
    fn test_invalid_source_path_display() {
        let error = CatalogError::InvalidSourcePath {
            path: PathBuf::from("/invalid/path"),
            reason: "Directory does not exist".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid source path"));
        assert!(display.contains("/invalid/path"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_decode_error_display() {
        let error = CatalogError::Decode {
            format: "bomtrace-json".to_string(),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("bomtrace-json"));
        assert!(display.contains("expected value"));
        assert_eq!(error.exit_code(), ExitCode::ApplicationError);
    }

    #[test]
    fn test_invariant_violation_display() {
        let error = CatalogError::InvariantViolation {
            id: "abc123".to_string(),
            details: "version differs".to_string(),
        };
        assert!(error.to_string().contains("abc123"));
    }
}
