//! Adding and removing repository collaborators.
//!
//! Each username is handled on its own: a failure for one user is reported as
//! a warning and the loop moves on. Results come back in input order.

use std::collections::HashSet;

use tracing::warn;

use crate::context::ExecutionContext;
use crate::error::{ErrorKind, Result, SprigError, require_arg};
use crate::gh::Gh;
use crate::identity::RepoIdentity;
use crate::output::{format_repo_name, format_user, print_info, print_success, print_warning};
use crate::prompts::confirm_destructive;

/// Permission granted to new collaborators.
pub const COLLABORATOR_PERMISSION: &str = "push";

/// Outcome for every requested user, in input order.
#[derive(Debug, Default)]
pub struct CollaboratorReport {
  pub results: Vec<(String, Result<()>)>,
}

impl CollaboratorReport {
  pub fn succeeded(&self) -> usize {
    self.results.iter().filter(|(_, result)| result.is_ok()).count()
  }

  pub fn failures(&self) -> impl Iterator<Item = (&str, &SprigError)> {
    self
      .results
      .iter()
      .filter_map(|(login, result)| result.as_ref().err().map(|err| (login.as_str(), err)))
  }

  /// Fold per-user failures into one error carrying the first failure's kind.
  pub fn into_result(self, verb: &str) -> Result<()> {
    let total = self.results.len();
    let failed: Vec<(String, SprigError)> = self
      .results
      .into_iter()
      .filter_map(|(login, result)| result.err().map(|err| (login, err)))
      .collect();

    match failed.first() {
      None => Ok(()),
      Some((_, first)) => Err(
        SprigError::new(
          first.kind(),
          format!("{} of {total} users could not be {verb}", failed.len()),
        )
        .with_details(
          failed
            .iter()
            .map(|(login, err)| format!("{login}: {}", err.message()))
            .collect::<Vec<_>>()
            .join("\n"),
        ),
      ),
    }
  }
}

/// Split a comma-separated username list.
///
/// Entries are trimmed, a leading `@` is dropped, empties are skipped, and
/// repeats (ignoring case) keep their first position.
pub fn parse_usernames(raw: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  raw
    .split(',')
    .map(|user| user.trim().trim_start_matches('@').trim())
    .filter(|user| !user.is_empty())
    .filter(|user| seen.insert(user.to_ascii_lowercase()))
    .map(str::to_string)
    .collect()
}

pub fn require_usernames(users: Option<&str>) -> Result<Vec<String>> {
  let raw = require_arg(users, "usernames")?;
  let users = parse_usernames(raw);
  if users.is_empty() {
    return Err(SprigError::validation("usernames is required").with_details("Pass a comma-separated list, e.g. 'alice,bob'"));
  }
  Ok(users)
}

/// Grant push access on the current repository to each user.
pub fn add_collaborators(ctx: &ExecutionContext<'_>, users: Option<&str>) -> Result<CollaboratorReport> {
  let users = require_usernames(users)?;
  let repo = ctx.remote_preflight()?;
  let gh = ctx.gh();

  let mut report = CollaboratorReport::default();
  for user in users {
    let result = add_one(&gh, &repo, &user);
    match &result {
      Ok(()) => print_success(&format!(
        "Added {} to {} with {COLLABORATOR_PERMISSION} access",
        format_user(&user),
        format_repo_name(&repo.full_name())
      )),
      Err(err) => skip(&user, err),
    }
    report.results.push((user, result));
  }

  summarize(&report, "added");
  Ok(report)
}

fn add_one(gh: &Gh<'_>, repo: &RepoIdentity, user: &str) -> Result<()> {
  let login = match gh.user_login(user) {
    Ok(login) => login,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      return Err(SprigError::new(ErrorKind::NotFound, format!("user '{user}' does not exist")));
    }
    Err(err) => return Err(err),
  };

  if gh.is_collaborator(repo, &login)? {
    return Err(SprigError::new(
      ErrorKind::Conflict,
      format!("'{login}' is already a collaborator on {repo}"),
    ));
  }

  gh.add_collaborator(repo, &login, COLLABORATOR_PERMISSION)
}

/// Revoke each user's collaborator access on the current repository.
///
/// Unless `confirmed`, the user must type the confirmation word first.
pub fn remove_collaborators(ctx: &ExecutionContext<'_>, users: Option<&str>, confirmed: bool) -> Result<CollaboratorReport> {
  let users = require_usernames(users)?;
  let repo = ctx.remote_preflight()?;

  let what = format!("Removing {} from {}", users.join(", "), repo.full_name());
  if !confirmed && !confirm_destructive(ctx.prompter(), &what)? {
    return Err(SprigError::cancelled("collaborator removal cancelled; nothing was changed"));
  }

  let gh = ctx.gh();
  let mut report = CollaboratorReport::default();
  for user in users {
    let result = remove_one(&gh, &repo, &user);
    match &result {
      Ok(()) => print_success(&format!(
        "Removed {} from {}",
        format_user(&user),
        format_repo_name(&repo.full_name())
      )),
      Err(err) => skip(&user, err),
    }
    report.results.push((user, result));
  }

  summarize(&report, "removed");
  Ok(report)
}

fn remove_one(gh: &Gh<'_>, repo: &RepoIdentity, user: &str) -> Result<()> {
  if !gh.is_collaborator(repo, user)? {
    return Err(SprigError::new(
      ErrorKind::NotFound,
      format!("'{user}' is not a collaborator on {repo}"),
    ));
  }
  gh.remove_collaborator(repo, user)
}

fn skip(user: &str, err: &SprigError) {
  warn!(user, kind = %err.kind(), "skipping user");
  print_warning(&format!("Skipped {}: {}", format_user(user), err.message()));
}

fn summarize(report: &CollaboratorReport, verb: &str) {
  let failed = report.results.len() - report.succeeded();
  if failed > 0 {
    print_info(&format!("{} {verb}, {failed} skipped", report.succeeded()));
  }
}
