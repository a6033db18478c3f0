//! Linux Debian installer pipeline for the Hydrangea blockchain client
//!
//! This library drives the external tools that turn a release checkout into
//! a `.deb`:
//! - freezes the Python daemon with PyInstaller
//! - builds the Electron GUI and packages it with electron-packager
//! - wraps the packaged app with electron-installer-debian
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
