//! Command line interface for the release pipeline.
//!
//! Parses and validates arguments, assembles the [`ReleaseConfig`], runs the
//! pipeline with real processes and turns the outcome into an exit code.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::config::load_release_file;
use crate::error::{CliError, EXIT_USAGE, ReleaseError, Result};
use crate::pipeline::{
    Pipeline, PipelineReport, Platform, ProcessRunner, ReleaseConfig, ReleaseConfigBuilder,
};
use clap::Parser;
use std::ffi::OsString;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version end up here too
            e.print()?;
            return Ok(if e.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };

    let output = args.output();
    match execute(&args, &output).await {
        Ok(report) => {
            log::info!(
                "Built {} installer {} ({} artifact(s))",
                report.platform,
                report.version,
                report.artifacts.len()
            );
            Ok(0)
        }
        Err(e) => {
            report_error(&e, &output);
            Ok(e.exit_code())
        }
    }
}

/// Validates `args`, builds the config and runs every stage.
///
/// The platform is checked before anything else, so an invalid selector
/// never touches the filesystem or spawns a tool.
pub async fn execute(args: &Args, output: &OutputManager) -> Result<PipelineReport> {
    let platform = args.validate()?;
    let config = load_config(args, platform)?;

    let env_var = &config.versioning().env_var;
    let env_version = version_from_env(env_var, std::env::var_os(env_var))?;
    let pipeline = Pipeline::new(config, ProcessRunner::new(*output), *output);

    Ok(pipeline.run(env_version.as_deref()).await?)
}

/// Converts the raw value of the version variable.
///
/// A value that is not UTF-8 is rejected rather than treated as unset.
pub fn version_from_env(
    name: &str,
    value: Option<OsString>,
) -> std::result::Result<Option<String>, CliError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .into_string()
            .map(Some)
            .map_err(|value| CliError::InvalidArguments {
                reason: format!(
                    "{name} is set but is not valid UTF-8 ({})",
                    value.to_string_lossy()
                ),
            }),
    }
}

/// Builds the release config from arguments and the optional config file.
pub fn load_config(args: &Args, platform: &'static Platform) -> Result<ReleaseConfig> {
    let mut builder = ReleaseConfigBuilder::new()
        .platform(platform)
        .build_scripts_dir(&args.build_scripts_dir);

    if let Some(path) = &args.config {
        builder = load_release_file(path)?.apply(builder);
    }

    Ok(builder.build()?)
}

fn report_error(error: &ReleaseError, output: &OutputManager) {
    output.error(&error.to_string());

    if error.is_usage() {
        eprintln!(
            "Usage: hydrangea_bundler_deb <{}>",
            Platform::selectors().join("|")
        );
    } else if let Some(stage) = error.stage() {
        log::debug!("Run aborted at stage '{}'", stage);
    }
}
