//! Main pipeline orchestration.
//!
//! This module provides the [`Pipeline`] that resolves the version, builds
//! the stage list and executes it in order, stopping at the first failure.

use crate::bail;
use crate::cli::OutputManager;
use crate::pipeline::{
    Artifact, CommandRunner, ManifestGuard, Platform, ReleaseConfig, ResolvedVersion, Result,
    artifacts::list_artifacts,
    stages::{Stage, StageAction, plan},
    utils::fs,
    version::{STAGE_RESOLVE_VERSION, resolve_version},
};

/// Outcome of a successful run.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    /// Platform the installer was built for
    pub platform: &'static Platform,
    /// Version used throughout the run
    pub version: ResolvedVersion,
    /// Name of the packaged app directory under `dist/`
    pub output_dir_name: String,
    /// Contents of the installer directory
    pub artifacts: Vec<Artifact>,
}

/// Release pipeline runner.
///
/// Stages run strictly in order. Any failure aborts the run with an error
/// naming the stage; nothing is retried and, apart from the manifest
/// rewrite, nothing is cleaned up, so the tree can be inspected afterwards.
///
/// # Examples
///
/// ```no_run
/// use hydrangea_bundler_deb::cli::OutputManager;
/// use hydrangea_bundler_deb::pipeline::{Pipeline, Platform, ProcessRunner, ReleaseConfigBuilder};
///
/// # async fn example() -> hydrangea_bundler_deb::pipeline::Result<()> {
/// let config = ReleaseConfigBuilder::new()
///     .platform(Platform::lookup("amd64").unwrap())
///     .build()?;
/// let output = OutputManager::new(false, false);
/// let pipeline = Pipeline::new(config, ProcessRunner::new(output.clone()), output);
///
/// let report = pipeline.run(std::env::var("HYDRANGEA_INSTALLER_VERSION").ok().as_deref()).await?;
/// for artifact in &report.artifacts {
///     println!("{} ({} bytes)", artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<R> {
    config: ReleaseConfig,
    runner: R,
    output: OutputManager,
}

impl<R: CommandRunner> Pipeline<R> {
    /// Creates a pipeline for `config` that runs tools through `runner`.
    pub fn new(config: ReleaseConfig, runner: R, output: OutputManager) -> Self {
        Self {
            config,
            runner,
            output,
        }
    }

    /// Configuration of this pipeline.
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Runner tools are executed with.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs every stage.
    ///
    /// `env_version` is the value of the version environment variable, read
    /// by the caller.
    pub async fn run(&self, env_version: Option<&str>) -> Result<PipelineReport> {
        let platform = self.config.platform();
        self.output.section(&format!(
            "Building {} installer for {}",
            self.config.product().name,
            platform
        ));

        let version = resolve_version(&self.config, env_version, &self.runner, &self.output)
            .await
            .map_err(|e| e.in_stage(STAGE_RESOLVE_VERSION))?;

        let stages = plan(&self.config, &version);
        let total = stages.len();
        let mut artifacts = Vec::new();

        for (index, stage) in stages.iter().enumerate() {
            self.output
                .progress(&format!("[{}/{}] {}", index + 1, total, stage.name));

            match self.execute(stage).await {
                Ok(Some(listed)) => artifacts = listed,
                Ok(None) => {}
                Err(e) => {
                    log::debug!("Stage '{}' failed: {:?}", stage.name, e);
                    return Err(e.in_stage(stage.name));
                }
            }
        }

        self.output.success(&format!(
            "Created {} artifact(s) in {}",
            artifacts.len(),
            self.config.layout().final_installer_dir().display()
        ));

        Ok(PipelineReport {
            platform,
            version,
            output_dir_name: self.config.output_dir_name(),
            artifacts,
        })
    }

    /// Executes one stage. Returns the artifact list for the listing stage.
    async fn execute(&self, stage: &Stage) -> Result<Option<Vec<Artifact>>> {
        match &stage.action {
            StageAction::Run(command) => {
                self.runner.run(command).await?.check(command)?;
            }
            StageAction::Freeze {
                locate_spec,
                freeze,
            } => {
                let captured = self.runner.capture(locate_spec).await?;
                captured.status.check(locate_spec)?;

                let spec = captured.stdout.trim();
                if spec.is_empty() {
                    bail!("`{}` printed no freezer spec path", locate_spec);
                }
                log::info!("Freezer spec file: {}", spec);

                let freeze = freeze.clone().arg(spec);
                self.runner.run(&freeze).await?.check(&freeze)?;
            }
            StageAction::RecreateDir(path) => fs::recreate_dir(path).await?,
            StageAction::CopyDir { from, to } => {
                fs::remove_dir_all(to).await?;
                fs::copy_dir(from, to).await?;
            }
            StageAction::MoveDir { from, to } => fs::move_dir(from, to).await?,
            StageAction::Package {
                manifest,
                version,
                command,
            } => {
                let guard = ManifestGuard::acquire(manifest, version).await?;
                let outcome = match self.runner.run(command).await {
                    Ok(status) => status.check(command),
                    Err(e) => Err(e),
                };
                let restored = guard.restore().await;

                match (outcome, restored) {
                    (Err(e), Err(restore_err)) => {
                        log::error!("{}", restore_err);
                        return Err(e);
                    }
                    (Err(e), Ok(())) => return Err(e),
                    (Ok(()), restored) => restored?,
                }
            }
            StageAction::ListArtifacts(dir) => {
                let artifacts = list_artifacts(dir).await?;
                if artifacts.is_empty() {
                    self.output.warn(&format!("{} is empty", dir.display()));
                }
                for artifact in &artifacts {
                    self.output.indent(&format!(
                        "{}  {} bytes  sha256:{}",
                        artifact.file_name(),
                        artifact.size,
                        artifact.checksum
                    ));
                }
                return Ok(Some(artifacts));
            }
        }
        Ok(None)
    }
}
