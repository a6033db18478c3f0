//! External tool invocation.
//!
//! A [`ToolCommand`] describes one invocation: program, arguments, working
//! directory and environment overrides. A [`CommandRunner`] executes it.
//! [`ProcessRunner`] is the real implementation; tests substitute a recording
//! runner.

use crate::cli::OutputManager;
use crate::pipeline::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// One external tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    cwd: PathBuf,
    search_path: Option<OsString>,
}

impl ToolCommand {
    /// Creates a command running `program` in `cwd`.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            search_path: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Sets the `PATH` the program is resolved against and runs with.
    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Program name as configured.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments converted lossily to UTF-8.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// `PATH` override, if any.
    pub fn get_search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Completion status of a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolStatus {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolStatus {
    /// Successful completion.
    pub const SUCCESS: Self = Self { code: Some(0) };

    /// Status with the given exit code.
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the tool reported success.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a failed status into [`Error::ToolFailed`].
    pub fn check(self, command: &ToolCommand) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(Error::ToolFailed {
                program: command.program().to_string(),
                code: self.code,
            })
        }
    }
}

impl From<std::process::ExitStatus> for ToolStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Status and stdout of a tool whose output is consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Completion status
    pub status: ToolStatus,
    /// Captured standard output
    pub stdout: String,
}

/// Executes tool commands.
///
/// Implementations must block (await) until the tool exits. No timeout is
/// applied: a hung tool hangs the pipeline.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Runs the command, streaming its output to the terminal.
    async fn run(&self, command: &ToolCommand) -> Result<ToolStatus>;

    /// Runs the command and captures its standard output.
    async fn capture(&self, command: &ToolCommand) -> Result<CapturedOutput>;
}

/// Runs tools as child processes.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    output: OutputManager,
}

impl ProcessRunner {
    /// Creates a runner that streams tool output through `output`.
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }

    /// Builds the tokio command, resolving the program on the effective `PATH`.
    fn prepare(&self, command: &ToolCommand) -> Result<Command> {
        let search_path = command
            .get_search_path()
            .map(OsStr::to_os_string)
            .or_else(|| std::env::var_os("PATH"));

        let program = which::which_in(command.program(), search_path.as_ref(), command.cwd())
            .map_err(|e| {
                log::debug!("Failed to resolve {}: {}", command.program(), e);
                Error::ToolNotFound {
                    program: command.program().to_string(),
                }
            })?;
        self.output.verbose(&format!(
            "Resolved {} to {}",
            command.program(),
            program.display()
        ));

        let mut cmd = Command::new(program);
        cmd.args(command.get_args())
            .current_dir(command.cwd())
            .stdin(Stdio::null());
        if let Some(path) = command.get_search_path() {
            cmd.env("PATH", path);
        }
        Ok(cmd)
    }
}

/// Reads `reader` to EOF, handing each line to `emit`.
///
/// Lines are decoded lossily. The reader always drains to EOF, whatever the
/// bytes are.
async fn forward_lines<R: AsyncRead + Unpin>(reader: R, mut emit: impl FnMut(&str)) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                emit(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                log::debug!("Stopped reading tool output: {}", e);
                break;
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolStatus> {
        self.output.verbose(&format!(
            "Running `{}` in {}",
            command,
            command.cwd().display()
        ));

        let mut cmd = self.prepare(command)?;
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| Error::Spawn {
                program: command.program().to_string(),
                error,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both streams before waiting so a full pipe cannot stall the tool
        tokio::join!(
            async {
                if let Some(stdout) = stdout {
                    forward_lines(stdout, |line| self.output.indent(line)).await;
                }
            },
            async {
                if let Some(stderr) = stderr {
                    forward_lines(stderr, |line| self.output.indent_err(line)).await;
                }
            }
        );

        let status = child.wait().await.map_err(|error| Error::Spawn {
            program: command.program().to_string(),
            error,
        })?;

        log::debug!("`{}` exited with {:?}", command.program(), status.code());
        Ok(status.into())
    }

    async fn capture(&self, command: &ToolCommand) -> Result<CapturedOutput> {
        self.output.verbose(&format!(
            "Capturing `{}` in {}",
            command,
            command.cwd().display()
        ));

        let mut cmd = self.prepare(command)?;
        let child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|error| Error::Spawn {
                program: command.program().to_string(),
                error,
            })?;

        let output = child.wait_with_output().await.map_err(|error| Error::Spawn {
            program: command.program().to_string(),
            error,
        })?;

        Ok(CapturedOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = ToolCommand::new("npm", "/work")
            .arg("run")
            .arg("build");
        assert_eq!(cmd.to_string(), "npm run build");
        assert_eq!(cmd.args_lossy(), vec!["run", "build"]);
    }

    #[test]
    fn failed_status_names_program() {
        let cmd = ToolCommand::new("lerna", "/work").args(["clean", "-y"]);
        let err = ToolStatus::exited(2).check(&cmd).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(ToolStatus::SUCCESS.check(&cmd).is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_reports_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new(OutputManager::new(false, true));

        let ok = ToolCommand::new("sh", dir.path()).args(["-c", "exit 0"]);
        assert!(runner.run(&ok).await.unwrap().success());

        let failing = ToolCommand::new("sh", dir.path()).args(["-c", "echo oops >&2; exit 4"]);
        assert_eq!(runner.run(&failing).await.unwrap(), ToolStatus::exited(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_captures_stdout_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("VERSION"), "1.4.0\n").unwrap();
        let runner = ProcessRunner::new(OutputManager::new(false, true));

        let cmd = ToolCommand::new("cat", dir.path()).arg("VERSION");
        let output = runner.capture(&cmd).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "1.4.0\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_drains_output_that_is_not_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new(OutputManager::new(false, true));

        // Enough trailing output to overflow the pipe buffer on both streams
        let script = "printf 'caf\\351\\n'; printf 'caf\\351\\n' >&2; \
                      i=0; while [ $i -lt 20000 ]; do echo \"line $i\"; echo \"err $i\" >&2; i=$((i+1)); done; \
                      exit 0";
        let cmd = ToolCommand::new("sh", dir.path()).args(["-c", script]);

        assert_eq!(runner.run(&cmd).await.unwrap(), ToolStatus::SUCCESS);
    }

    #[tokio::test]
    async fn missing_tool_is_reported_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new(OutputManager::new(false, true));

        let cmd = ToolCommand::new("definitely-not-a-release-tool", dir.path())
            .search_path(dir.path().as_os_str());
        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }
}
