//! # Command Execution
//!
//! Every external process sprig starts goes through a [`CommandRunner`]. The
//! operations only ever see [`Invocation`]s and [`CommandOutput`]s, so a
//! recording runner can stand in for `git` and `gh` in tests.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

/// The external tool an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
  Git,
  Gh,
}

impl fmt::Display for Tool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Git => f.write_str("git"),
      Self::Gh => f.write_str("gh"),
    }
  }
}

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub tool: Tool,
  /// Executable to spawn (may differ from the tool name via configuration).
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
  /// Inherit the terminal instead of capturing output.
  pub interactive: bool,
}

impl Invocation {
  pub fn new<I, S>(tool: Tool, program: &str, cwd: &Path, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      tool,
      program: program.to_string(),
      args: args.into_iter().map(Into::into).collect(),
      cwd: cwd.to_path_buf(),
      interactive: false,
    }
  }

  pub fn interactive(mut self) -> Self {
    self.interactive = true;
    self
  }

  /// The invocation as the user would type it, e.g. `git push -u origin main`.
  pub fn command_line(&self) -> String {
    let mut line = self.tool.to_string();
    for arg in &self.args {
      line.push(' ');
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        line.push('"');
        line.push_str(arg);
        line.push('"');
      } else {
        line.push_str(arg);
      }
    }
    line
  }
}

/// Result of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, `None` when the process was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(stdout: impl Into<String>) -> Self {
    Self {
      code: Some(0),
      stdout: stdout.into(),
      stderr: String::new(),
    }
  }

  pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
    Self {
      code: Some(code),
      stdout: String::new(),
      stderr: stderr.into(),
    }
  }

  pub const fn succeeded(&self) -> bool {
    matches!(self.code, Some(0))
  }

  /// First line of stdout, trimmed.
  pub fn first_line(&self) -> &str {
    self.stdout.lines().next().unwrap_or("").trim()
  }

  /// Combined stdout and stderr text.
  pub fn combined(&self) -> String {
    let mut combined = String::new();
    if !self.stdout.trim().is_empty() {
      combined.push_str(self.stdout.trim_end());
    }
    if !self.stderr.trim().is_empty() {
      if !combined.is_empty() {
        combined.push('\n');
      }
      combined.push_str(self.stderr.trim_end());
    }
    combined
  }
}

/// Synchronous command execution.
///
/// Implementations block until the child exits. A spawn failure (for
/// example the executable is not on `PATH`) is an `Err`; a non-zero exit is
/// an `Ok` output with the exit code set.
pub trait CommandRunner {
  fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// Runner that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
    debug!(command = %invocation.command_line(), cwd = %invocation.cwd.display(), "running");

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args).current_dir(&invocation.cwd);

    if invocation.tool == Tool::Gh {
      apply_gh_env(&mut command, invocation.interactive);
    }

    let output = if invocation.interactive {
      let status = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
      CommandOutput {
        code: status.code(),
        ..CommandOutput::default()
      }
    } else {
      let output = command.stdin(Stdio::null()).output()?;
      CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }
    };

    debug!(command = %invocation.command_line(), code = ?output.code, "finished");
    trace!(stdout = %output.stdout, stderr = %output.stderr, "captured output");

    Ok(output)
  }
}

/// Keep captured `gh` output plain and free of pagers or prompts.
fn apply_gh_env(command: &mut Command, interactive: bool) {
  command.env("GH_PAGER", "cat");
  if !interactive {
    command.env("GH_PROMPT_DISABLED", "1");
    command.env("NO_COLOR", "1");
    command.env("CLICOLOR", "0");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_line_quotes_arguments_with_spaces() {
    let invocation = Invocation::new(Tool::Git, "git", Path::new("."), ["commit", "-m", "fix the thing"]);
    assert_eq!(invocation.command_line(), "git commit -m \"fix the thing\"");
  }

  #[test]
  fn command_line_uses_tool_name_not_program_path() {
    let invocation = Invocation::new(Tool::Gh, "/opt/homebrew/bin/gh", Path::new("."), ["auth", "status"]);
    assert_eq!(invocation.command_line(), "gh auth status");
  }

  #[test]
  fn combined_output_joins_streams() {
    let output = CommandOutput {
      code: Some(1),
      stdout: "On branch main\n".to_string(),
      stderr: "nothing to commit\n".to_string(),
    };
    assert_eq!(output.combined(), "On branch main\nnothing to commit");
    assert!(!output.succeeded());
  }

  #[test]
  fn signal_termination_is_not_success() {
    let output = CommandOutput {
      code: None,
      ..CommandOutput::default()
    };
    assert!(!output.succeeded());
  }

  #[test]
  fn system_runner_reports_missing_executable() {
    let runner = SystemRunner;
    let invocation = Invocation::new(
      Tool::Gh,
      "sprig-definitely-not-installed",
      &std::env::temp_dir(),
      ["--version"],
    );
    let err = runner.run(&invocation).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }
}
