//! Release pipeline for the Linux Debian installer.
//!
//! Resolves the installer version, then runs a fixed list of stages: install
//! the packaging tools, freeze the Python daemon, build the GUI, package the
//! desktop app and wrap it into a `.deb`. The first failing stage stops the
//! run.

pub mod artifacts;
pub mod command;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod platform;
pub mod settings;
pub mod stages;
pub mod utils;
pub mod version;

pub use artifacts::Artifact;
pub use command::{CapturedOutput, CommandRunner, ProcessRunner, ToolCommand, ToolStatus};
pub use error::{Context, Error, ErrorExt, Result};
pub use manifest::ManifestGuard;
pub use orchestrator::{Pipeline, PipelineReport};
pub use platform::{PLATFORMS, Platform};
pub use settings::{
    Layout, ProductSettings, ReleaseConfig, ReleaseConfigBuilder, ToolSettings, VersionSettings,
};
pub use stages::{Stage, StageAction, plan};
pub use version::{ResolvedVersion, VersionSource, resolve_version};
