//! External command execution.
//!
//! Every invocation prints a one-line description of what is about to run,
//! so CI logs show the operation alongside the exact command. Mutating git
//! commands are suppressed under dry-run; read-only ones always run.

use std::process::{Command, Stdio};

use crate::error::{ReleaseError, Result};
use crate::ui;

#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    pub dry_run: bool,
    pub quiet: bool,
}

impl Runner {
    pub fn new(dry_run: bool, quiet: bool) -> Self {
        Runner { dry_run, quiet }
    }

    fn announce(&self, description: &str, program: &str, args: &[&str]) {
        if !self.quiet {
            ui::status(&format!("{}: {} {}", description, program, args.join(" ")));
        }
    }

    /// Run a git command that mutates state; skipped under dry-run.
    pub fn git(&self, description: &str, args: &[&str]) -> Result<()> {
        self.git_optional(description, self.dry_run, args)
    }

    /// Run a git command regardless of dry-run (fetching, listing).
    pub fn git_always(&self, description: &str, args: &[&str]) -> Result<()> {
        self.git_optional(description, false, args)
    }

    fn git_optional(&self, description: &str, skip: bool, args: &[&str]) -> Result<()> {
        self.announce(description, "git", args);
        if skip {
            return Ok(());
        }
        let status = Command::new("git")
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ReleaseError::command(description, e.to_string()))?;
        if !status.success() {
            return Err(ReleaseError::command(description, status.to_string()));
        }
        Ok(())
    }

    /// Run any program, inheriting stdout/stderr.
    pub fn run(&self, description: &str, program: &str, args: &[&str]) -> Result<()> {
        self.announce(description, program, args);

        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // jfrog would otherwise prompt for interactive setup on first use,
        // and uploads must not happen during a dry run
        if program == "jfrog" {
            command.env("JFROG_CLI_OFFER_CONFIG", "false");
            if self.dry_run {
                return Ok(());
            }
        }

        let status = command
            .status()
            .map_err(|e| ReleaseError::command(description, e.to_string()))?;
        if !status.success() {
            return Err(ReleaseError::command(description, status.to_string()));
        }
        Ok(())
    }

    /// Run a program capturing stdout as non-empty lines. Stderr passes
    /// through to the caller's stderr.
    pub fn output_lines(
        &self,
        description: &str,
        program: &str,
        args: &[&str],
    ) -> Result<Vec<String>> {
        self.announce(description, program, args);
        let output = Command::new(program)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| ReleaseError::command(description, e.to_string()))?;
        if !output.status.success() {
            return Err(ReleaseError::command(description, output.status.to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).replace("\r\n", "\n");
        Ok(text
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    /// Run a program expecting exactly one line of output.
    pub fn output_line(&self, description: &str, program: &str, args: &[&str]) -> Result<String> {
        let lines = self.output_lines(description, program, args)?;
        if lines.len() != 1 {
            return Err(ReleaseError::command(
                description,
                format!(
                    "expected 1 line of output from {} {}, got {}",
                    program,
                    args.join(" "),
                    lines.len()
                ),
            ));
        }
        Ok(lines.into_iter().next().unwrap_or_default())
    }
}
