//! The ordered stage list for one release run.
//!
//! [`plan`] turns a [`ReleaseConfig`] and a resolved version into the full
//! list of stages. Nothing runs here; the orchestrator executes the list in
//! order and stops at the first failure.

use crate::pipeline::{ReleaseConfig, ResolvedVersion, ToolCommand};
use std::path::PathBuf;

pub const STAGE_INSTALL_PACKAGING_TOOLS: &str = "install packaging tools";
pub const STAGE_PREPARE_DIST: &str = "prepare dist directory";
pub const STAGE_INSTALL_FREEZER: &str = "install freezer";
pub const STAGE_FREEZE: &str = "freeze executables";
pub const STAGE_STAGE_DAEMON: &str = "stage daemon into gui";
pub const STAGE_CLEAN_GUI: &str = "clean gui workspace";
pub const STAGE_INSTALL_GUI_DEPS: &str = "install gui dependencies";
pub const STAGE_BUILD_GUI: &str = "build gui";
pub const STAGE_PACKAGE_APP: &str = "package desktop app";
pub const STAGE_COLLECT_APP: &str = "collect packaged app";
pub const STAGE_PREPARE_INSTALLER_DIR: &str = "prepare installer directory";
pub const STAGE_BUILD_DEB: &str = "build debian package";
pub const STAGE_LIST_ARTIFACTS: &str = "list installer artifacts";

/// One named step of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    /// Name used in progress output and failure diagnostics
    pub name: &'static str,
    /// What the stage does
    pub action: StageAction,
}

/// What a stage does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageAction {
    /// Run one tool.
    Run(ToolCommand),

    /// Ask the Python module for its freezer spec path, then run the freezer
    /// with that path appended.
    Freeze {
        /// Prints the spec path on stdout
        locate_spec: ToolCommand,
        /// Freezer invocation without the spec argument
        freeze: ToolCommand,
    },

    /// Remove a directory if present and create it empty.
    RecreateDir(PathBuf),

    /// Replace `to` with a recursive copy of `from`.
    CopyDir {
        /// Source tree
        from: PathBuf,
        /// Destination, removed first if present
        to: PathBuf,
    },

    /// Move `from` to `to`, replacing `to`.
    MoveDir {
        /// Source tree
        from: PathBuf,
        /// Destination, removed first if present
        to: PathBuf,
    },

    /// Run the desktop packager with the manifest version set to `version`.
    /// The manifest is restored afterwards whatever the outcome.
    Package {
        /// Manifest rewritten for the duration of the stage
        manifest: PathBuf,
        /// Version written into the manifest
        version: String,
        /// Packager invocation
        command: ToolCommand,
    },

    /// List the installer directory.
    ListArtifacts(PathBuf),
}

/// Builds the stage list for one run.
pub fn plan(config: &ReleaseConfig, version: &ResolvedVersion) -> Vec<Stage> {
    let layout = config.layout();
    let tools = config.tools();
    let product = config.product();
    let platform = config.platform();
    let output_dir_name = config.output_dir_name();

    let build_scripts = layout.build_scripts_dir();
    let tool_path = config.tool_search_path();

    let mut install_tools = ToolCommand::new(&tools.npm, layout.npm_tooling_dir()).arg("ci");
    if let Some(path) = config.base_search_path() {
        install_tools = install_tools.search_path(path.clone());
    }

    // Every tool after the packaging-tool install sees its bin directory first
    let tool = |program: &str, cwd: PathBuf| {
        ToolCommand::new(program, cwd).search_path(tool_path.clone())
    };

    vec![
        Stage {
            name: STAGE_INSTALL_PACKAGING_TOOLS,
            action: StageAction::Run(install_tools),
        },
        Stage {
            name: STAGE_PREPARE_DIST,
            action: StageAction::RecreateDir(layout.dist_dir()),
        },
        Stage {
            name: STAGE_INSTALL_FREEZER,
            action: StageAction::Run(
                tool(&tools.pip, build_scripts.to_path_buf())
                    .arg("install")
                    .arg(format!("pyinstaller=={}", tools.pyinstaller_version)),
            ),
        },
        Stage {
            name: STAGE_FREEZE,
            action: StageAction::Freeze {
                locate_spec: tool(&tools.python, build_scripts.to_path_buf()).arg("-c").arg(
                    format!(
                        "import {0}; print({0}.PYINSTALLER_SPEC_PATH)",
                        tools.freezer_module
                    ),
                ),
                freeze: tool(&tools.pyinstaller, build_scripts.to_path_buf())
                    .arg("--log-level=INFO"),
            },
        },
        Stage {
            name: STAGE_STAGE_DAEMON,
            action: StageAction::CopyDir {
                from: layout.frozen_daemon_dir(),
                to: layout.gui_package_dir().join("daemon"),
            },
        },
        Stage {
            name: STAGE_CLEAN_GUI,
            action: StageAction::Run(
                tool(&tools.lerna, layout.gui_dir().to_path_buf()).args(["clean", "-y"]),
            ),
        },
        Stage {
            name: STAGE_INSTALL_GUI_DEPS,
            action: StageAction::Run(tool(&tools.npm, layout.gui_dir().to_path_buf()).arg("ci")),
        },
        Stage {
            name: STAGE_BUILD_GUI,
            action: StageAction::Run(
                tool(&tools.npm, layout.gui_dir().to_path_buf()).args(["run", "build"]),
            ),
        },
        Stage {
            name: STAGE_PACKAGE_APP,
            action: StageAction::Package {
                manifest: layout.gui_manifest(),
                version: version.value.clone(),
                command: tool(&tools.electron_packager, layout.gui_package_dir().to_path_buf())
                    .arg(".")
                    .arg(&product.name)
                    .arg(format!("--asar.unpack={}", product.asar_unpack))
                    .arg("--platform=linux")
                    .arg(format!("--arch={}", platform.packager_arch))
                    .arg(format!("--icon={}", product.icon))
                    .arg("--overwrite")
                    .arg(format!("--app-bundle-id={}", product.app_bundle_id))
                    .arg(format!("--appVersion={}", version.value))
                    .arg(format!("--executable-name={}", product.executable_name)),
            },
        },
        Stage {
            name: STAGE_COLLECT_APP,
            action: StageAction::MoveDir {
                from: layout.gui_package_dir().join(&output_dir_name),
                to: layout.dist_dir().join(&output_dir_name),
            },
        },
        Stage {
            name: STAGE_PREPARE_INSTALLER_DIR,
            action: StageAction::RecreateDir(layout.final_installer_dir()),
        },
        Stage {
            name: STAGE_BUILD_DEB,
            action: StageAction::Run(
                tool(&tools.electron_installer_debian, build_scripts.to_path_buf())
                    .arg("--src")
                    .arg(layout.dist_dir().join(&output_dir_name))
                    .arg("--dest")
                    .arg(layout.final_installer_dir())
                    .arg("--arch")
                    .arg(platform.deb_arch)
                    .arg("--options.version")
                    .arg(&version.value)
                    .arg("--license")
                    .arg(layout.license()),
            ),
        },
        Stage {
            name: STAGE_LIST_ARTIFACTS,
            action: StageAction::ListArtifacts(layout.final_installer_dir()),
        },
    ]
}
