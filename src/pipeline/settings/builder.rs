//! Builder for constructing ReleaseConfig.

use super::{
    Layout, ProductSettings, ReleaseConfig, ToolSettings, VersionSettings,
    layout::{DEFAULT_GUI_DIR, DEFAULT_GUI_PACKAGE_DIR, DEFAULT_LICENSE, DEFAULT_NPM_TOOLING_DIR},
};
use crate::pipeline::{
    Platform,
    error::{Context, ErrorExt},
};
use path_absolutize::Absolutize;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Builder for constructing [`ReleaseConfig`].
///
/// Relative paths are resolved against the build-scripts directory, which is
/// itself resolved against the current directory.
///
/// # Examples
///
/// ```no_run
/// use hydrangea_bundler_deb::pipeline::{Platform, ReleaseConfigBuilder};
///
/// # fn example() -> hydrangea_bundler_deb::pipeline::Result<()> {
/// let config = ReleaseConfigBuilder::new()
///     .platform(Platform::lookup("arm64").unwrap())
///     .build_scripts_dir("/src/hydrangea-blockchain/build_scripts")
///     .gui_dir("../gui")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ReleaseConfigBuilder {
    platform: Option<&'static Platform>,
    build_scripts_dir: Option<PathBuf>,
    npm_tooling_dir: Option<PathBuf>,
    gui_dir: Option<PathBuf>,
    gui_package_dir: Option<PathBuf>,
    license: Option<PathBuf>,
    tools: ToolSettings,
    product: ProductSettings,
    versioning: VersionSettings,
    search_path: Option<OsString>,
}

impl ReleaseConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the target platform.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn platform(mut self, platform: &'static Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the directory the pipeline runs from.
    ///
    /// Default: current directory
    pub fn build_scripts_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_scripts_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the packaging-tool workspace.
    ///
    /// Default: `npm_linux_deb`
    pub fn npm_tooling_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.npm_tooling_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the GUI monorepo root.
    ///
    /// Default: `../hydrangea-blockchain-gui`
    pub fn gui_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.gui_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the GUI package directory, relative to the GUI monorepo root.
    ///
    /// Default: `packages/gui`
    pub fn gui_package_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.gui_package_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the license file shipped in the package.
    ///
    /// Default: `../LICENSE`
    pub fn license<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.license = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets external tool names.
    pub fn tools(mut self, tools: ToolSettings) -> Self {
        self.tools = tools;
        self
    }

    /// Sets product metadata.
    pub fn product(mut self, product: ProductSettings) -> Self {
        self.product = product;
        self
    }

    /// Sets the version source.
    pub fn versioning(mut self, versioning: VersionSettings) -> Self {
        self.versioning = versioning;
        self
    }

    /// Sets the `PATH` tools are resolved against.
    ///
    /// If not set, the `PATH` environment variable is read once at build time.
    pub fn search_path(mut self, path: OsString) -> Self {
        self.search_path = Some(path);
        self
    }

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is missing, the current directory
    /// cannot be determined, or the packaging-tool bin directory cannot be
    /// placed on `PATH`.
    pub fn build(self) -> crate::pipeline::Result<ReleaseConfig> {
        let platform = self.platform.context("platform is required")?;

        let cwd = std::env::current_dir().fs_context("reading current directory", ".")?;
        let build_scripts_dir = absolutize_from(
            self.build_scripts_dir.as_deref().unwrap_or(Path::new(".")),
            &cwd,
        )?;

        let resolve = |value: Option<PathBuf>, default: &str| -> crate::pipeline::Result<PathBuf> {
            let path = value.unwrap_or_else(|| PathBuf::from(default));
            absolutize_from(&path, &build_scripts_dir)
        };

        let npm_tooling_dir = resolve(self.npm_tooling_dir, DEFAULT_NPM_TOOLING_DIR)?;
        let gui_dir = resolve(self.gui_dir, DEFAULT_GUI_DIR)?;
        let license = resolve(self.license, DEFAULT_LICENSE)?;
        let gui_package_dir = absolutize_from(
            &self
                .gui_package_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GUI_PACKAGE_DIR)),
            &gui_dir,
        )?;

        let search_path = self.search_path.or_else(|| std::env::var_os("PATH"));

        ReleaseConfig::new(
            platform,
            Layout::new(
                build_scripts_dir,
                npm_tooling_dir,
                gui_dir,
                gui_package_dir,
                license,
            ),
            self.tools,
            self.product,
            self.versioning,
            search_path,
        )
    }
}

fn absolutize_from(path: &Path, base: &Path) -> crate::pipeline::Result<PathBuf> {
    Ok(path
        .absolutize_from(base)
        .fs_context("resolving path", path)?
        .into_owned())
}
