//! Wiring of the real runner, prompter, and settings for one invocation.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sprig_core::{ExecutionContext, Settings, SystemRunner, TerminalPrompter};

/// Everything an [`ExecutionContext`] borrows, owned for the duration of a
/// command.
pub struct Session {
  settings: Settings,
  cwd: PathBuf,
  runner: SystemRunner,
  prompter: TerminalPrompter,
}

impl Session {
  /// Read settings and the current directory.
  pub fn load() -> Result<Self> {
    let settings = Settings::load()?;
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    Ok(Self::new(settings, cwd))
  }

  pub fn new(settings: Settings, cwd: PathBuf) -> Self {
    Self {
      settings,
      cwd,
      runner: SystemRunner,
      prompter: TerminalPrompter,
    }
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn context(&self) -> ExecutionContext<'_> {
    ExecutionContext::new(self.cwd.clone(), &self.settings, &self.runner, &self.prompter)
  }
}

/// Run `f` against a freshly loaded session.
///
/// Handlers check their arguments before calling this, so a broken settings
/// file never masks a validation error.
pub fn with_context<T, F>(f: F) -> Result<T>
where
  F: FnOnce(&ExecutionContext<'_>) -> sprig_core::Result<T>,
{
  let session = Session::load()?;
  Ok(f(&session.context())?)
}
