//! Release configuration file.
//!
//! An optional TOML file overrides the built-in layout, tool names, product
//! metadata and version source. Every key is optional; missing keys keep
//! their defaults. Relative paths resolve against the build-scripts
//! directory, except `gui_package_dir` which resolves against `gui_dir`.
//!
//! ```toml
//! [paths]
//! gui_dir = "../hydrangea-blockchain-gui"
//!
//! [product]
//! app_bundle_id = "net.hydrangea.blockchain"
//!
//! [tools]
//! pyinstaller_version = "4.9"
//!
//! [version]
//! env_var = "HYDRANGEA_INSTALLER_VERSION"
//! command = ["python", "installer-version.py"]
//! ```

use crate::error::{ReleaseError, Result};
use crate::pipeline::{ProductSettings, ReleaseConfigBuilder, ToolSettings, VersionSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed configuration file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseFile {
    /// Filesystem layout overrides
    #[serde(default)]
    pub paths: PathsSection,
    /// Product metadata overrides
    #[serde(default)]
    pub product: ProductSection,
    /// Tool name overrides
    #[serde(default)]
    pub tools: ToolsSection,
    /// Version source overrides
    #[serde(default)]
    pub version: VersionSection,
}

/// `[paths]`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub npm_tooling_dir: Option<PathBuf>,
    pub gui_dir: Option<PathBuf>,
    pub gui_package_dir: Option<PathBuf>,
    pub license: Option<PathBuf>,
}

/// `[product]`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProductSection {
    pub name: Option<String>,
    pub app_bundle_id: Option<String>,
    pub icon: Option<String>,
    pub executable_name: Option<String>,
    pub asar_unpack: Option<String>,
}

/// `[tools]`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    pub python: Option<String>,
    pub pip: Option<String>,
    pub npm: Option<String>,
    pub lerna: Option<String>,
    pub pyinstaller: Option<String>,
    pub pyinstaller_version: Option<String>,
    pub freezer_module: Option<String>,
    pub electron_packager: Option<String>,
    pub electron_installer_debian: Option<String>,
}

/// `[version]`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VersionSection {
    pub env_var: Option<String>,
    pub command: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
}

/// Reads and parses a configuration file.
pub fn load_release_file(path: &Path) -> Result<ReleaseFile> {
    let contents = std::fs::read_to_string(path).map_err(|source| ReleaseError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let file: ReleaseFile =
        toml::from_str(&contents).map_err(|source| ReleaseError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Loaded release config from {}", path.display());
    Ok(file)
}

impl ReleaseFile {
    /// Applies the overrides to `builder`.
    pub fn apply(self, mut builder: ReleaseConfigBuilder) -> ReleaseConfigBuilder {
        let paths = self.paths;
        if let Some(dir) = paths.npm_tooling_dir {
            builder = builder.npm_tooling_dir(dir);
        }
        if let Some(dir) = paths.gui_dir {
            builder = builder.gui_dir(dir);
        }
        if let Some(dir) = paths.gui_package_dir {
            builder = builder.gui_package_dir(dir);
        }
        if let Some(license) = paths.license {
            builder = builder.license(license);
        }

        builder
            .product(self.product.into_settings())
            .tools(self.tools.into_settings())
            .versioning(self.version.into_settings())
    }
}

impl ProductSection {
    fn into_settings(self) -> ProductSettings {
        let defaults = ProductSettings::default();
        ProductSettings {
            name: self.name.unwrap_or(defaults.name),
            app_bundle_id: self.app_bundle_id.unwrap_or(defaults.app_bundle_id),
            icon: self.icon.unwrap_or(defaults.icon),
            executable_name: self.executable_name.unwrap_or(defaults.executable_name),
            asar_unpack: self.asar_unpack.unwrap_or(defaults.asar_unpack),
        }
    }
}

impl ToolsSection {
    fn into_settings(self) -> ToolSettings {
        let defaults = ToolSettings::default();
        ToolSettings {
            python: self.python.unwrap_or(defaults.python),
            pip: self.pip.unwrap_or(defaults.pip),
            npm: self.npm.unwrap_or(defaults.npm),
            lerna: self.lerna.unwrap_or(defaults.lerna),
            pyinstaller: self.pyinstaller.unwrap_or(defaults.pyinstaller),
            pyinstaller_version: self
                .pyinstaller_version
                .unwrap_or(defaults.pyinstaller_version),
            freezer_module: self.freezer_module.unwrap_or(defaults.freezer_module),
            electron_packager: self.electron_packager.unwrap_or(defaults.electron_packager),
            electron_installer_debian: self
                .electron_installer_debian
                .unwrap_or(defaults.electron_installer_debian),
        }
    }
}

impl VersionSection {
    fn into_settings(self) -> VersionSettings {
        let defaults = VersionSettings::default();
        VersionSettings {
            env_var: self.env_var.unwrap_or(defaults.env_var),
            command: self.command.filter(|c| !c.is_empty()).or(defaults.command),
            command_requirements: self.requirements.unwrap_or(defaults.command_requirements),
        }
    }
}
