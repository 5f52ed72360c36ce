//! Re-authentication with the GitHub CLI.

use tracing::warn;

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::output::{print_info, print_success, print_warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthOutcome {
  /// Logged out and logged back in.
  LoggedIn,
  /// Logged out; the user chose not to log in again.
  LoggedOut,
}

/// Log out of the configured host, then log in again if the user agrees.
///
/// A failed logout (usually because no session existed) is reported as a
/// warning and does not stop the flow.
pub fn reauthenticate(ctx: &ExecutionContext<'_>) -> Result<ReauthOutcome> {
  ctx.require_gh()?;
  let gh = ctx.gh();
  let host = &ctx.settings().hostname;

  match gh.logout() {
    Ok(()) => print_success(&format!("Logged out of {host}")),
    Err(err) => {
      warn!(kind = %err.kind(), "logout failed");
      print_warning(&format!("Logout did not complete: {}", err.message()));
    }
  }

  if !ctx.prompter().confirm(&format!("Log in to {host} again now?"), true)? {
    print_info("Staying logged out. Run 'sprig reauth' or 'gh auth login' when ready");
    return Ok(ReauthOutcome::LoggedOut);
  }

  gh.login()?;
  print_success(&format!("Logged in to {host}"));
  Ok(ReauthOutcome::LoggedIn)
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::config::Settings;
  use crate::error::ErrorKind;
  use crate::exec::{CommandOutput, Tool};
  use crate::testing::{ScriptedPrompter, ScriptedRunner};

  fn ctx<'a>(settings: &'a Settings, runner: &'a ScriptedRunner, prompter: &'a ScriptedPrompter) -> ExecutionContext<'a> {
    ExecutionContext::new(PathBuf::from("/tmp"), settings, runner, prompter).with_repo_root(None)
  }

  #[test]
  fn logs_out_then_in_when_confirmed() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new().with_confirm(true);

    let outcome = reauthenticate(&ctx(&settings, &runner, &prompter)).unwrap();

    assert_eq!(outcome, ReauthOutcome::LoggedIn);
    assert_eq!(
      runner.command_lines(),
      vec![
        "gh --version",
        "gh auth logout --hostname github.com",
        "gh auth login --hostname github.com",
      ]
    );
    assert!(runner.calls()[2].interactive);
  }

  #[test]
  fn declining_skips_login() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new().with_confirm(false);

    let outcome = reauthenticate(&ctx(&settings, &runner, &prompter)).unwrap();

    assert_eq!(outcome, ReauthOutcome::LoggedOut);
    assert_eq!(runner.count(Tool::Gh, &["auth", "login"]), 0);
  }

  #[test]
  fn failed_logout_still_offers_login() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(
      Tool::Gh,
      &["auth", "logout"],
      CommandOutput::failure(1, "not logged in to any hosts"),
    );
    let prompter = ScriptedPrompter::new().with_confirm(true);

    assert_eq!(
      reauthenticate(&ctx(&settings, &runner, &prompter)).unwrap(),
      ReauthOutcome::LoggedIn
    );
    assert_eq!(runner.count(Tool::Gh, &["auth", "login"]), 1);
  }

  #[test]
  fn missing_gh_stops_before_logout() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().missing(Tool::Gh);
    let prompter = ScriptedPrompter::new();

    let err = reauthenticate(&ctx(&settings, &runner, &prompter)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Environment);
    assert_eq!(runner.calls().len(), 1);
    assert!(prompter.asked().is_empty());
  }

  #[test]
  fn failed_login_is_a_step_error() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(Tool::Gh, &["auth", "login"], CommandOutput::failure(1, ""));
    let prompter = ScriptedPrompter::new().with_confirm(true);

    let err = reauthenticate(&ctx(&settings, &runner, &prompter)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Step);
  }
}
