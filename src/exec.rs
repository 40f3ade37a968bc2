//! External command execution behind a mockable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::io::Write as _;
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution so that tool selection, the
/// credential store, and toggle daemons can be tested without spawning
/// real programs.
pub trait Executor: std::fmt::Debug + Send + Sync {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with `input` written to its stdin. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult>;

    /// Run a command with `input` written to its stdin, allowing failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_unchecked_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<ExecResult>;

    /// Start a detached process with null stdio and return its PID.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    fn spawn(&self, program: &str, args: &[&str]) -> Result<u32>;

    /// Check if a program is available on PATH.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str, input: Option<&str>) -> Result<ExecResult> {
    let result = execute(&mut cmd, label, input)?;
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

fn execute(cmd: &mut Command, label: &str, input: Option<&str>) -> Result<ExecResult> {
    let Some(input) = input else {
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {label}"))?;
        return Ok(ExecResult::from(output));
    };

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to execute: {label}"))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .with_context(|| format!("failed to write stdin of {label}"))?;
    }
    let output = child
        .wait_with_output()
        .with_context(|| format!("failed to wait for {label}"))?;
    Ok(ExecResult::from(output))
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program, None)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        execute(Command::new(program).args(args), program, None)
    }

    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program, Some(input))
    }

    fn run_unchecked_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<ExecResult> {
        execute(Command::new(program).args(args), program, Some(input))
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<u32> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // Own process group so terminal signals aimed at us skip the daemon.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn: {program}"))?;
        Ok(child.id())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
