//! Where the installer version comes from.

/// Environment variable consulted for the installer version.
pub const DEFAULT_VERSION_ENV: &str = "HYDRANGEA_INSTALLER_VERSION";

/// Version used when no source yields one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Version source configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSettings {
    /// Environment variable holding the version.
    pub env_var: String,

    /// Command whose trimmed stdout is the version, tried when the
    /// environment variable is unset or empty. Runs in the build-scripts
    /// directory.
    ///
    /// Default: None
    pub command: Option<Vec<String>>,

    /// Python packages installed before `command` runs.
    pub command_requirements: Vec<String>,
}

impl Default for VersionSettings {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_VERSION_ENV.into(),
            command: None,
            command_requirements: vec!["setuptools_scm".into()],
        }
    }
}
