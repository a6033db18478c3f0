//! Core ReleaseConfig struct and implementations.

use super::{Layout, ProductSettings, ToolSettings, VersionSettings};
use crate::pipeline::{Error, Platform};
use std::{ffi::OsString, path::PathBuf};

/// Everything a pipeline run needs, captured once up front.
///
/// Constructed via [`ReleaseConfigBuilder`](super::ReleaseConfigBuilder).
/// Stages read their paths, tool names and environment from here instead of
/// from process-global state.
///
/// # Examples
///
/// ```no_run
/// use hydrangea_bundler_deb::pipeline::{Platform, ReleaseConfigBuilder};
///
/// # fn example() -> hydrangea_bundler_deb::pipeline::Result<()> {
/// let config = ReleaseConfigBuilder::new()
///     .platform(Platform::lookup("amd64").unwrap())
///     .build_scripts_dir("build_scripts")
///     .build()?;
/// assert_eq!(config.output_dir_name(), "hydrangea-blockchain-linux-x64");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ReleaseConfig {
    platform: &'static Platform,
    layout: Layout,
    tools: ToolSettings,
    product: ProductSettings,
    versioning: VersionSettings,
    /// `PATH` captured when the config was built.
    search_path: Option<OsString>,
    /// `search_path` with the packaging-tool bin directory in front.
    tool_search_path: OsString,
}

impl ReleaseConfig {
    /// Target platform.
    pub fn platform(&self) -> &'static Platform {
        self.platform
    }

    /// Filesystem layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// External tool names.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Product metadata.
    pub fn product(&self) -> &ProductSettings {
        &self.product
    }

    /// Version source configuration.
    pub fn versioning(&self) -> &VersionSettings {
        &self.versioning
    }

    /// Directory name the desktop packager produces for this platform.
    pub fn output_dir_name(&self) -> String {
        self.platform.output_dir_name(&self.product.name)
    }

    /// `PATH` as it was when the config was built.
    pub fn base_search_path(&self) -> Option<&OsString> {
        self.search_path.as_ref()
    }

    /// `PATH` for stages that run after the packaging tools are installed.
    ///
    /// The packaging-tool bin directory comes first so `lerna`,
    /// `electron-packager` and `electron-installer-debian` resolve to the
    /// versions pinned in that workspace.
    pub fn tool_search_path(&self) -> OsString {
        self.tool_search_path.clone()
    }

    pub(super) fn new(
        platform: &'static Platform,
        layout: Layout,
        tools: ToolSettings,
        product: ProductSettings,
        versioning: VersionSettings,
        search_path: Option<OsString>,
    ) -> crate::pipeline::Result<Self> {
        let mut dirs: Vec<PathBuf> = vec![layout.tool_bin_dir()];
        if let Some(path) = &search_path {
            dirs.extend(std::env::split_paths(path));
        }
        let tool_search_path = std::env::join_paths(&dirs).map_err(|e| {
            Error::GenericError(format!(
                "cannot put {} on PATH: {}",
                layout.tool_bin_dir().display(),
                e
            ))
        })?;

        Ok(Self {
            platform,
            layout,
            tools,
            product,
            versioning,
            search_path,
            tool_search_path,
        })
    }
}
