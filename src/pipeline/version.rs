//! Installer version resolution.

use crate::cli::OutputManager;
use crate::pipeline::{
    CommandRunner, ReleaseConfig, Result, ToolCommand,
    settings::DEFAULT_VERSION,
};

/// Stage name used in diagnostics.
pub const STAGE_RESOLVE_VERSION: &str = "resolve version";

/// Where the resolved version came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionSource {
    /// The configured environment variable
    Environment,
    /// The configured version command
    Command,
    /// Nothing yielded a version; [`DEFAULT_VERSION`] was substituted
    Default,
}

/// Version threaded through every stage of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Version text, passed to tools unchanged
    pub value: String,
    /// Where the value came from
    pub source: VersionSource,
}

impl ResolvedVersion {
    /// Whether the default was substituted.
    pub fn is_fallback(&self) -> bool {
        self.source == VersionSource::Default
    }
}

impl std::fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Resolves the version from the environment value alone.
///
/// Unset and empty both count as missing. Any other value is used verbatim.
pub fn resolve_from_env(env_value: Option<&str>) -> ResolvedVersion {
    match env_value {
        Some(value) if !value.is_empty() => ResolvedVersion {
            value: value.to_string(),
            source: VersionSource::Environment,
        },
        _ => ResolvedVersion {
            value: DEFAULT_VERSION.to_string(),
            source: VersionSource::Default,
        },
    }
}

/// Resolves the installer version.
///
/// Order: the environment value, then the configured version command (after
/// installing its requirements), then [`DEFAULT_VERSION`]. Falling back to
/// the default prints a warning but is not an error.
pub async fn resolve_version<R: CommandRunner>(
    config: &ReleaseConfig,
    env_value: Option<&str>,
    runner: &R,
    output: &OutputManager,
) -> Result<ResolvedVersion> {
    let versioning = config.versioning();

    let mut resolved = resolve_from_env(env_value);
    if resolved.is_fallback() {
        if let Some(command) = &versioning.command {
            if let Some(value) = run_version_command(config, command, runner).await? {
                resolved = ResolvedVersion {
                    value,
                    source: VersionSource::Command,
                };
            }
        }
    }

    if resolved.is_fallback() {
        log::debug!("{} unset, using {}", versioning.env_var, DEFAULT_VERSION);
        output.warn(&format!(
            "No environment variable {} set. Using {}.",
            versioning.env_var, DEFAULT_VERSION
        ));
    }

    output.info(&format!("Installer version is: {}", resolved.value));
    Ok(resolved)
}

async fn run_version_command<R: CommandRunner>(
    config: &ReleaseConfig,
    command: &[String],
    runner: &R,
) -> Result<Option<String>> {
    let Some((program, args)) = command.split_first() else {
        return Ok(None);
    };
    let cwd = config.layout().build_scripts_dir();
    let versioning = config.versioning();

    let tool = |program: &str| {
        let command = ToolCommand::new(program, cwd);
        match config.base_search_path() {
            Some(path) => command.search_path(path.clone()),
            None => command,
        }
    };

    if !versioning.command_requirements.is_empty() {
        let install = tool(&config.tools().pip)
            .arg("install")
            .args(&versioning.command_requirements);
        runner.run(&install).await?.check(&install)?;
    }

    let query = tool(program).args(args);
    let captured = runner.capture(&query).await?;
    captured.status.check(&query)?;

    let value = captured.stdout.trim_end_matches(['\r', '\n']).to_string();
    Ok((!value.is_empty()).then_some(value))
}
