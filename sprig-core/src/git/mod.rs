//! # Git Facade
//!
//! Thin wrappers over the `git` commands sprig chains together. Queries return
//! parsed values; steps return `Ok(())` or a [`ErrorKind::Step`] error carrying
//! git's own output.
//!
//! [`ErrorKind::Step`]: crate::error::ErrorKind::Step

mod detection;

use std::io;
use std::path::Path;

pub use detection::detect_working_tree;
use tracing::info;

use crate::error::{Result, SprigError};
use crate::exec::{CommandOutput, CommandRunner, Invocation, Tool};

/// Handle to the `git` executable for one working directory.
pub struct Git<'a> {
  runner: &'a dyn CommandRunner,
  program: &'a str,
  cwd: &'a Path,
}

impl<'a> Git<'a> {
  pub fn new(runner: &'a dyn CommandRunner, program: &'a str, cwd: &'a Path) -> Self {
    Self { runner, program, cwd }
  }

  fn run(&self, args: &[&str]) -> Result<CommandOutput> {
    let invocation = Invocation::new(Tool::Git, self.program, self.cwd, args.iter().copied());
    self.runner.run(&invocation).map_err(|err| {
      if err.kind() == io::ErrorKind::NotFound {
        SprigError::environment(format!("git executable '{}' is not installed or not on PATH", self.program))
      } else {
        SprigError::environment(format!("failed to start '{}'", invocation.command_line())).with_details(err.to_string())
      }
    })
  }

  /// Run a mutating step; a non-zero exit aborts with `what` in the message.
  fn step(&self, what: &str, args: &[&str]) -> Result<CommandOutput> {
    info!(step = what, "git step");
    let output = self.run(args)?;
    if output.succeeded() {
      Ok(output)
    } else {
      Err(SprigError::step(format!("{what} failed")).with_details(output.combined()))
    }
  }

  pub fn version(&self) -> Result<String> {
    let output = self.step("git --version", &["--version"])?;
    Ok(output.first_line().to_string())
  }

  /// Name of the checked-out branch, `None` on a detached HEAD.
  pub fn current_branch(&self) -> Result<Option<String>> {
    let output = self.step("reading the current branch", &["branch", "--show-current"])?;
    let branch = output.first_line();
    Ok((!branch.is_empty()).then(|| branch.to_string()))
  }

  /// Like [`Git::current_branch`] but a detached HEAD is an error.
  pub fn require_current_branch(&self) -> Result<String> {
    self
      .current_branch()?
      .ok_or_else(|| SprigError::step("HEAD is detached; check out a branch first"))
  }

  /// Upstream tracking reference of the current branch, if configured.
  pub fn upstream(&self) -> Result<Option<String>> {
    let output = self.run(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])?;
    let upstream = output.first_line();
    Ok((output.succeeded() && !upstream.is_empty()).then(|| upstream.to_string()))
  }

  pub fn branch_exists(&self, name: &str) -> Result<bool> {
    let reference = format!("refs/heads/{name}");
    let output = self.run(&["show-ref", "--verify", "--quiet", &reference])?;
    match output.code {
      Some(0) => Ok(true),
      Some(1) => Ok(false),
      _ => Err(SprigError::step(format!("checking for branch '{name}' failed")).with_details(output.combined())),
    }
  }

  /// URL configured for `remote`.
  pub fn remote_url(&self, remote: &str) -> Result<String> {
    let output = self.run(&["remote", "get-url", remote])?;
    let url = output.first_line();
    if output.succeeded() && !url.is_empty() {
      Ok(url.to_string())
    } else {
      Err(
        SprigError::identity(format!("could not determine owner/name: no URL for remote '{remote}'"))
          .with_details(output.combined()),
      )
    }
  }

  pub fn init(&self) -> Result<()> {
    self.step("git init", &["init"]).map(drop)
  }

  pub fn stage_all(&self) -> Result<()> {
    self.step("staging changes", &["add", "-A"]).map(drop)
  }

  pub fn commit(&self, message: &str) -> Result<()> {
    self.step("commit", &["commit", "-m", message]).map(drop)
  }

  /// Push the current branch. With `set_upstream`, push to `(remote, branch)`
  /// and record it as the upstream.
  pub fn push(&self, set_upstream: Option<(&str, &str)>) -> Result<()> {
    match set_upstream {
      Some((remote, branch)) => self.step("push", &["push", "--set-upstream", remote, branch]).map(drop),
      None => self.step("push", &["push"]).map(drop),
    }
  }

  /// Pull into the current branch, from `(remote, branch)` when given.
  pub fn pull(&self, source: Option<(&str, &str)>) -> Result<()> {
    match source {
      Some((remote, branch)) => self.step("pull", &["pull", remote, branch]).map(drop),
      None => self.step("pull", &["pull"]).map(drop),
    }
  }

  pub fn switch(&self, name: &str) -> Result<()> {
    self.step(&format!("switching to '{name}'"), &["switch", name]).map(drop)
  }

  /// Create `name` at the current position and check it out.
  pub fn create_and_switch(&self, name: &str) -> Result<()> {
    self
      .step(&format!("creating branch '{name}'"), &["switch", "--create", name])
      .map(drop)
  }

  pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
    let flag = if force { "-D" } else { "-d" };
    self
      .step(&format!("deleting local branch '{name}'"), &["branch", flag, name])
      .map(drop)
  }

  pub fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
    self
      .step(
        &format!("deleting '{name}' on '{remote}'"),
        &["push", remote, "--delete", name],
      )
      .map(drop)
  }
}
