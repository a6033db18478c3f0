//! Terminal output for pipeline progress.
//!
//! All user-facing text goes through [`OutputManager`], which honors the
//! verbose and quiet flags. Errors are always printed. Write failures on the
//! terminal are ignored.

use colored::Colorize;
use std::io::Write;

/// Colored terminal output honoring verbosity flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager. `quiet` wins over `verbose`.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose: verbose && !quiet,
            quiet,
        }
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether only errors are printed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Detail shown only with `--verbose`.
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.out(&message.dimmed().to_string());
        }
    }

    /// Plain informational line.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.out(message);
        }
    }

    /// Warning on stderr.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            self.err(&format!("{} {}", "warning:".yellow().bold(), message));
        }
    }

    /// Error on stderr, printed even when quiet.
    pub fn error(&self, message: &str) {
        self.err(&format!("{} {}", "error:".red().bold(), message));
    }

    /// Success line.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.out(&format!("{} {}", "✓".green().bold(), message));
        }
    }

    /// Stage progress line.
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            self.out(&format!("{} {}", "==>".cyan().bold(), message.bold()));
        }
    }

    /// Section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.out("");
            self.out(&title.bold().underline().to_string());
        }
    }

    /// Indented line, used for tool stdout and artifact listings.
    pub fn indent(&self, message: &str) {
        if !self.quiet {
            self.out(&format!("    {message}"));
        }
    }

    /// Indented line on stderr, used for tool stderr.
    pub fn indent_err(&self, message: &str) {
        if !self.quiet {
            self.err(&format!("    {message}"));
        }
    }

    fn out(&self, line: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }

    fn err(&self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}
