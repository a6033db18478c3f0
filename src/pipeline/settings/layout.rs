//! Filesystem layout of a release checkout.

use std::path::{Path, PathBuf};

/// Default packaging-tool workspace, relative to the build-scripts directory.
pub const DEFAULT_NPM_TOOLING_DIR: &str = "npm_linux_deb";
/// Default GUI monorepo root, relative to the build-scripts directory.
pub const DEFAULT_GUI_DIR: &str = "../hydrangea-blockchain-gui";
/// Default GUI package, relative to the GUI monorepo root.
pub const DEFAULT_GUI_PACKAGE_DIR: &str = "packages/gui";
/// Default license file, relative to the build-scripts directory.
pub const DEFAULT_LICENSE: &str = "../LICENSE";

/// Absolute paths every stage works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    build_scripts_dir: PathBuf,
    npm_tooling_dir: PathBuf,
    gui_dir: PathBuf,
    gui_package_dir: PathBuf,
    license: PathBuf,
}

impl Layout {
    pub(super) fn new(
        build_scripts_dir: PathBuf,
        npm_tooling_dir: PathBuf,
        gui_dir: PathBuf,
        gui_package_dir: PathBuf,
        license: PathBuf,
    ) -> Self {
        Self {
            build_scripts_dir,
            npm_tooling_dir,
            gui_dir,
            gui_package_dir,
            license,
        }
    }

    /// Directory the pipeline runs from.
    pub fn build_scripts_dir(&self) -> &Path {
        &self.build_scripts_dir
    }

    /// Workspace holding the packaging tools' `package.json`.
    pub fn npm_tooling_dir(&self) -> &Path {
        &self.npm_tooling_dir
    }

    /// Binaries installed into the packaging-tool workspace.
    pub fn tool_bin_dir(&self) -> PathBuf {
        self.npm_tooling_dir.join("node_modules").join(".bin")
    }

    /// GUI monorepo root.
    pub fn gui_dir(&self) -> &Path {
        &self.gui_dir
    }

    /// GUI package the desktop packager runs in.
    pub fn gui_package_dir(&self) -> &Path {
        &self.gui_package_dir
    }

    /// Manifest rewritten with the installer version.
    pub fn gui_manifest(&self) -> PathBuf {
        self.gui_package_dir.join("package.json")
    }

    /// License shipped in the Debian package.
    pub fn license(&self) -> &Path {
        &self.license
    }

    /// Ephemeral build output, recreated on every run.
    pub fn dist_dir(&self) -> PathBuf {
        self.build_scripts_dir.join("dist")
    }

    /// Frozen daemon tree produced by the freezer.
    pub fn frozen_daemon_dir(&self) -> PathBuf {
        self.dist_dir().join("daemon")
    }

    /// Final installer output, recreated on every run.
    pub fn final_installer_dir(&self) -> PathBuf {
        self.build_scripts_dir.join("final_installer")
    }
}
