//! Top-level error types for the release CLI.
//!
//! [`ReleaseError`] wraps everything that can stop a run: bad arguments, an
//! unusable configuration file, or a failed pipeline stage. Each variant maps
//! to a process exit code through [`ReleaseError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: i32 = 1;

/// Main error type for the release CLI
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// Configuration file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Configuration file is not valid
    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// IO errors outside the pipeline (terminal output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline stage failed
    #[error("{0}")]
    Pipeline(#[from] crate::pipeline::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl ReleaseError {
    /// Process exit code reporting this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pipeline(e) => e.exit_code(),
            Self::Cli(_) | Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::Io(_) => {
                EXIT_USAGE
            }
        }
    }

    /// Whether this error is about how the program was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Cli(_))
    }

    /// Name of the stage that failed, if a stage failed.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Pipeline(e) => e.stage(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Error;

    #[test]
    fn usage_errors_exit_with_one() {
        let err = ReleaseError::from(CliError::MissingArgument {
            argument: "PLATFORM".into(),
        });
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.is_usage());
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn stage_failures_keep_tool_exit_code() {
        let err = ReleaseError::from(
            Error::ToolFailed {
                program: "npm".into(),
                code: Some(2),
            }
            .in_stage("build gui"),
        );
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.stage(), Some("build gui"));
        assert!(!err.is_usage());
    }
}
