//! Command line argument parsing and validation.

use crate::error::CliError;
use crate::pipeline::Platform;
use clap::Parser;
use std::path::PathBuf;

/// Linux Debian installer pipeline for the Hydrangea desktop client
#[derive(Parser, Debug)]
#[command(
    name = "hydrangea_bundler_deb",
    version,
    about = "Builds the Hydrangea Linux .deb installer",
    long_about = "Builds the Hydrangea blockchain Linux .deb installer.

Freezes the Python daemon, builds the GUI, packages the desktop app and wraps it
in a Debian package. Run from the build_scripts directory of a release checkout
(or pass --build-scripts-dir).

Usage:
  hydrangea_bundler_deb amd64
  HYDRANGEA_INSTALLER_VERSION=1.2.3 hydrangea_bundler_deb arm64

The installer is written to final_installer/."
)]
pub struct Args {
    /// Target platform: amd64 or arm64
    #[arg(value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Directory every relative path is resolved against
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        env = "HYDRANGEA_BUILD_SCRIPTS_DIR",
        default_value = "."
    )]
    pub build_scripts_dir: PathBuf,

    /// TOML file overriding paths, tool names, product metadata and version source
    #[arg(short = 'c', long, value_name = "FILE", env = "HYDRANGEA_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Validates the platform selector.
    ///
    /// Runs before anything touches the filesystem or spawns a tool.
    pub fn validate(&self) -> Result<&'static Platform, CliError> {
        let selectors = Platform::selectors().join("|");

        let Some(selector) = self.platform.as_deref() else {
            return Err(CliError::MissingArgument {
                argument: format!("PLATFORM ({selectors})"),
            });
        };

        Platform::lookup(selector).ok_or_else(|| CliError::InvalidArguments {
            reason: format!("unsupported platform '{selector}', expected one of: {selectors}"),
        })
    }

    /// Output manager for the requested verbosity.
    pub fn output(&self) -> super::OutputManager {
        super::OutputManager::new(self.verbose, self.quiet)
    }
}
