//! # Execution Context
//!
//! Everything an operation would otherwise read from ambient state: the
//! working directory, the working tree it belongs to, settings, and the
//! runner and prompter capabilities.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::error::{Result, SprigError};
use crate::exec::CommandRunner;
use crate::gh::Gh;
use crate::git::{Git, detect_working_tree};
use crate::identity::RepoIdentity;
use crate::prompts::Prompter;

pub struct ExecutionContext<'a> {
  cwd: PathBuf,
  repo_root: Option<PathBuf>,
  settings: &'a Settings,
  runner: &'a dyn CommandRunner,
  prompter: &'a dyn Prompter,
}

impl<'a> ExecutionContext<'a> {
  /// Build a context for `cwd`, discovering its working tree.
  pub fn new(cwd: PathBuf, settings: &'a Settings, runner: &'a dyn CommandRunner, prompter: &'a dyn Prompter) -> Self {
    let repo_root = detect_working_tree(&cwd);
    debug!(cwd = %cwd.display(), repo_root = ?repo_root, "execution context");
    Self {
      cwd,
      repo_root,
      settings,
      runner,
      prompter,
    }
  }

  /// Override the discovered working tree.
  pub fn with_repo_root(mut self, repo_root: Option<PathBuf>) -> Self {
    self.repo_root = repo_root;
    self
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  pub fn repo_root(&self) -> Option<&Path> {
    self.repo_root.as_deref()
  }

  pub const fn settings(&self) -> &Settings {
    self.settings
  }

  pub fn prompter(&self) -> &dyn Prompter {
    self.prompter
  }

  /// Directory external commands run in: the working tree root when known.
  pub fn command_dir(&self) -> &Path {
    self.repo_root.as_deref().unwrap_or(&self.cwd)
  }

  pub fn git(&self) -> Git<'_> {
    Git::new(self.runner, &self.settings.tools.git, self.command_dir())
  }

  pub fn gh(&self) -> Gh<'_> {
    Gh::new(
      self.runner,
      &self.settings.tools.gh,
      self.command_dir(),
      &self.settings.hostname,
    )
  }

  /// The GitHub CLI is installed and can be started.
  pub fn require_gh(&self) -> Result<()> {
    let version = self.gh().version()?;
    debug!(%version, "gh available");
    Ok(())
  }

  /// The GitHub CLI holds a session for the configured host.
  pub fn require_auth(&self) -> Result<()> {
    if self.gh().is_authenticated()? {
      Ok(())
    } else {
      Err(
        SprigError::authentication(format!("not logged in to {}", self.settings.hostname))
          .with_details("Run 'gh auth login' or 'sprig reauth' to sign in"),
      )
    }
  }

  /// The current directory lies inside a working tree.
  pub fn require_working_tree(&self) -> Result<&Path> {
    self.repo_root.as_deref().ok_or_else(|| {
      SprigError::environment(format!("not inside a git working tree: {}", self.cwd.display()))
        .with_details("Run this command from a repository checkout, or use 'git init' first")
    })
  }

  /// Owner and name of the repository behind the configured remote.
  pub fn resolve_identity(&self) -> Result<RepoIdentity> {
    let url = self.git().remote_url(&self.settings.remote)?;
    let identity = RepoIdentity::parse_for_host(&url, &self.settings.hostname)?;
    debug!(%identity, %url, "resolved repository identity");
    Ok(identity)
  }

  /// gh installed, then authenticated.
  pub fn hosted_preflight(&self) -> Result<()> {
    self.require_gh()?;
    self.require_auth()
  }

  /// gh installed, authenticated, inside a working tree, identity resolved.
  pub fn remote_preflight(&self) -> Result<RepoIdentity> {
    self.hosted_preflight()?;
    self.require_working_tree()?;
    self.resolve_identity()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use crate::exec::{CommandOutput, Tool};
  use crate::testing::{ScriptedPrompter, ScriptedRunner};

  fn context<'a>(
    settings: &'a Settings,
    runner: &'a ScriptedRunner,
    prompter: &'a ScriptedPrompter,
    repo_root: Option<&str>,
  ) -> ExecutionContext<'a> {
    ExecutionContext::new(PathBuf::from("/work/widgets"), settings, runner, prompter)
      .with_repo_root(repo_root.map(PathBuf::from))
  }

  #[test]
  fn missing_gh_is_an_environment_error() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().missing(Tool::Gh);
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, Some("/work/widgets"));

    let err = ctx.remote_preflight().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Environment);
    assert!(err.message().contains("not installed"));
    // Nothing after the first failing check runs
    assert_eq!(runner.calls().len(), 1);
  }

  #[test]
  fn unauthenticated_stops_before_working_tree_check() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(Tool::Gh, &["auth", "status"], CommandOutput::failure(1, "not logged in"));
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, None);

    let err = ctx.remote_preflight().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
  }

  #[test]
  fn outside_working_tree_is_an_environment_error() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, None);

    let err = ctx.remote_preflight().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Environment);
    assert!(err.message().contains("working tree"));
    assert_eq!(runner.count(Tool::Git, &[]), 0);
  }

  #[test]
  fn unparseable_remote_is_an_identity_error() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(
      Tool::Git,
      &["remote", "get-url"],
      CommandOutput::success("/srv/git/widgets.git\n"),
    );
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, Some("/work/widgets"));

    let err = ctx.remote_preflight().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Identity);
  }

  #[test]
  fn missing_remote_is_an_identity_error() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(
      Tool::Git,
      &["remote", "get-url"],
      CommandOutput::failure(2, "error: No such remote 'origin'"),
    );
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, Some("/work/widgets"));

    assert_eq!(ctx.resolve_identity().unwrap_err().kind(), ErrorKind::Identity);
  }

  #[test]
  fn preflight_resolves_identity_with_configured_remote() {
    let mut settings = Settings::default();
    settings.remote = "upstream".to_string();
    let runner = ScriptedRunner::new().on(
      Tool::Git,
      &["remote", "get-url", "upstream"],
      CommandOutput::success("git@github.com:acme/widgets.git\n"),
    );
    let prompter = ScriptedPrompter::new();
    let ctx = context(&settings, &runner, &prompter, Some("/work/widgets"));

    let identity = ctx.remote_preflight().unwrap();
    assert_eq!(identity.full_name(), "acme/widgets");
    assert_eq!(
      runner.command_lines(),
      vec![
        "gh --version",
        "gh auth status --hostname github.com",
        "git remote get-url upstream",
      ]
    );
  }
}
