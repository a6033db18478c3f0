//! Error types for pipeline stages.
//!
//! Every failure raised while a stage runs ends up as an [`Error`]. The
//! orchestrator wraps it in [`Error::InStage`] so the final diagnostic always
//! names the stage that stopped the run.

use std::{
    fmt::Display,
    io,
    path::{PathBuf, StripPrefixError},
};
use thiserror::Error as DeriveError;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code reported when a tool cannot be located or launched.
pub const EXIT_TOOL_UNAVAILABLE: i32 = 127;

/// Pipeline error.
#[derive(Debug, DeriveError)]
pub enum Error {
    /// Free-form error, usually raised through [`crate::bail!`].
    #[error("{0}")]
    GenericError(String),

    /// Error annotated with extra context.
    #[error("{0}: {1}")]
    Context(String, Box<Error>),

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying IO error
        error: io::Error,
    },

    /// Manifest (de)serialization error.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal error.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix computation error.
    #[error("{0}")]
    StripPrefix(#[from] StripPrefixError),

    /// The program could not be resolved on the stage's `PATH`.
    #[error("`{program}` not found on PATH")]
    ToolNotFound {
        /// Program name as configured
        program: String,
    },

    /// The program was found but could not be spawned.
    #[error("failed to launch `{program}`: {error}")]
    Spawn {
        /// Program name as configured
        program: String,
        /// Underlying IO error
        error: io::Error,
    },

    /// A tool ran and reported failure.
    #[error("`{program}` {}", describe_exit(.code))]
    ToolFailed {
        /// Program name as configured
        program: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Any of the above, raised while the named stage was running.
    #[error("stage '{stage}' failed: {source}")]
    InStage {
        /// Stage name
        stage: &'static str,
        /// Underlying error
        source: Box<Error>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl Error {
    /// Attaches the stage name to this error.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            Self::InStage { .. } => self,
            other => Self::InStage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Name of the stage this error was raised in, if known.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::InStage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit code that reports this error to the caller.
    ///
    /// A failed tool propagates its own exit code. Missing tools map to 127
    /// like a shell would report them; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            Self::ToolNotFound { .. } | Self::Spawn { .. } => EXIT_TOOL_UNAVAILABLE,
            Self::InStage { source, .. } | Self::Context(_, source) => source.exit_code(),
            _ => 1,
        }
    }
}

/// Adds context to results and options.
pub trait Context<T> {
    /// Wraps the error (or `None`) with the given context message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Lazily evaluated variant of [`Context::context`].
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Filesystem context for IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::Error::GenericError(format!($($arg)*)))
    };
}
