//! Shared fixtures for pipeline integration tests.
#![allow(dead_code)]

use hydrangea_bundler_deb::cli::OutputManager;
use hydrangea_bundler_deb::pipeline::{
    CapturedOutput, CommandRunner, Platform, ReleaseConfig, ReleaseConfigBuilder, Result,
    ToolCommand, ToolStatus,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const MANIFEST: &str = r#"{
  "name": "hydrangea-blockchain",
  "productName": "Hydrangea Blockchain",
  "version": "1.0.0",
  "main": "build/electron/main.js",
  "scripts": {
    "build": "webpack"
  }
}
"#;

/// Release checkout laid out the way the pipeline expects it:
///
/// ```text
/// <root>/LICENSE
/// <root>/build_scripts/npm_linux_deb/package.json
/// <root>/hydrangea-blockchain-gui/packages/gui/package.json
/// ```
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let base = root.path();

        std::fs::write(base.join("LICENSE"), "Apache-2.0\n").unwrap();
        std::fs::create_dir_all(base.join("build_scripts/npm_linux_deb")).unwrap();
        std::fs::write(
            base.join("build_scripts/npm_linux_deb/package.json"),
            "{\"name\": \"npm_linux_deb\"}\n",
        )
        .unwrap();
        std::fs::create_dir_all(base.join("hydrangea-blockchain-gui/packages/gui")).unwrap();
        std::fs::write(
            base.join("hydrangea-blockchain-gui/packages/gui/package.json"),
            MANIFEST,
        )
        .unwrap();

        Self { root }
    }

    pub fn build_scripts(&self) -> PathBuf {
        self.root.path().join("build_scripts")
    }

    pub fn gui_package(&self) -> PathBuf {
        self.root.path().join("hydrangea-blockchain-gui/packages/gui")
    }

    pub fn manifest(&self) -> PathBuf {
        self.gui_package().join("package.json")
    }

    pub fn manifest_text(&self) -> String {
        std::fs::read_to_string(self.manifest()).unwrap()
    }

    pub fn config(&self, selector: &str) -> ReleaseConfig {
        ReleaseConfigBuilder::new()
            .platform(Platform::lookup(selector).unwrap())
            .build_scripts_dir(self.build_scripts())
            .search_path(OsString::from("/usr/bin"))
            .build()
            .unwrap()
    }
}

pub fn quiet() -> OutputManager {
    OutputManager::new(false, true)
}

/// One recorded tool invocation.
#[derive(Clone, Debug)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Manifest `version` at the time the call was made
    pub manifest_version: Option<String>,
}

/// Runner that records invocations and fakes the files each tool produces.
pub struct RecordingRunner {
    manifest: PathBuf,
    spec_path: String,
    fail: Option<(String, i32)>,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingRunner {
    pub fn new(fixture: &Fixture) -> Self {
        Self {
            manifest: fixture.manifest(),
            spec_path: "/venv/lib/hydrangea/pyinstaller.spec\n".to_string(),
            fail: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes `program` exit with `code` without producing anything.
    pub fn failing(mut self, program: &str, code: i32) -> Self {
        self.fail = Some((program.to_string(), code));
        self
    }

    /// Sets what the spec-path query prints.
    pub fn spec_path(mut self, stdout: &str) -> Self {
        self.spec_path = stdout.to_string();
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }

    pub fn call(&self, program: &str) -> Option<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.program == program)
            .cloned()
    }

    fn record(&self, command: &ToolCommand) -> Call {
        let manifest_version = std::fs::read(&self.manifest)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
            .and_then(|v| v["version"].as_str().map(str::to_string));

        let call = Call {
            program: command.program().to_string(),
            args: command.args_lossy(),
            cwd: command.cwd().to_path_buf(),
            manifest_version,
        };
        self.calls.lock().unwrap().push(call.clone());
        call
    }

    fn simulate(&self, call: &Call) {
        match call.program.as_str() {
            "pyinstaller" => {
                let daemon = call.cwd.join("dist/daemon");
                std::fs::create_dir_all(daemon.join("lib")).unwrap();
                std::fs::write(daemon.join("hydrangea"), "#!frozen\n").unwrap();
                std::fs::write(daemon.join("lib/libpython.so"), "elf").unwrap();
            }
            "electron-packager" => {
                let arch = call
                    .args
                    .iter()
                    .find_map(|a| a.strip_prefix("--arch="))
                    .unwrap_or("x64");
                let packaged = call.cwd.join(format!("{}-linux-{}", call.args[1], arch));
                std::fs::create_dir_all(&packaged).unwrap();
                std::fs::write(packaged.join(&call.args[1]), "electron").unwrap();
            }
            "electron-installer-debian" => {
                let dest = value_after(&call.args, "--dest");
                let arch = value_after(&call.args, "--arch");
                let version = value_after(&call.args, "--options.version");
                std::fs::write(
                    Path::new(&dest).join(format!("hydrangea-blockchain_{version}_{arch}.deb")),
                    "!<arch>\n",
                )
                .unwrap();
            }
            _ => {}
        }
    }
}

pub fn value_after(args: &[String], flag: &str) -> String {
    let at = args.iter().position(|a| a == flag).unwrap();
    args[at + 1].clone()
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolStatus> {
        let call = self.record(command);
        if let Some((program, code)) = &self.fail {
            if program == &call.program {
                return Ok(ToolStatus::exited(*code));
            }
        }
        self.simulate(&call);
        Ok(ToolStatus::SUCCESS)
    }

    async fn capture(&self, command: &ToolCommand) -> Result<CapturedOutput> {
        self.record(command);
        Ok(CapturedOutput {
            status: ToolStatus::SUCCESS,
            stdout: self.spec_path.clone(),
        })
    }
}
