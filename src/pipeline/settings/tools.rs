//! External tool names.

/// Program names for every external tool the pipeline invokes.
///
/// Each entry is resolved on the stage's `PATH`, so it can be a bare name or
/// an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Python interpreter used to query the freezer spec path
    pub python: String,
    /// Python package installer
    pub pip: String,
    /// JS package manager
    pub npm: String,
    /// JS monorepo manager
    pub lerna: String,
    /// Python application freezer
    pub pyinstaller: String,
    /// Pinned freezer version installed before freezing
    pub pyinstaller_version: String,
    /// Python module that exposes `PYINSTALLER_SPEC_PATH`
    pub freezer_module: String,
    /// Desktop application packager
    pub electron_packager: String,
    /// Debian package generator
    pub electron_installer_debian: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            python: "python".into(),
            pip: "pip".into(),
            npm: "npm".into(),
            lerna: "lerna".into(),
            pyinstaller: "pyinstaller".into(),
            pyinstaller_version: "4.9".into(),
            freezer_module: "hydrangea".into(),
            electron_packager: "electron-packager".into(),
            electron_installer_debian: "electron-installer-debian".into(),
        }
    }
}
