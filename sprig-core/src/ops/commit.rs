//! Commit, pull, and push operations.

use tracing::info;

use crate::context::ExecutionContext;
use crate::error::{Result, require_arg};
use crate::git::Git;
use crate::output::{format_branch, print_info, print_success};

/// What a push did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSummary {
  pub branch: String,
  /// The branch had no upstream and one was configured by this push.
  pub set_upstream: bool,
}

/// Reject a missing or blank commit message.
pub fn require_commit_message(message: Option<&str>) -> Result<&str> {
  require_arg(message, "commit message")
}

/// Stage everything, commit with `message`, and push the current branch.
pub fn commit_and_push(ctx: &ExecutionContext<'_>, message: Option<&str>) -> Result<PushSummary> {
  let message = require_commit_message(message)?;
  ctx.require_working_tree()?;

  let git = ctx.git();
  commit_all(&git, message)?;
  push_current(ctx, &git)
}

/// Pull the current branch from its upstream (or the configured remote).
pub fn pull_latest(ctx: &ExecutionContext<'_>) -> Result<String> {
  ctx.require_working_tree()?;
  pull_current(ctx, &ctx.git())
}

/// Pull, then commit and push.
pub fn pull_commit_push(ctx: &ExecutionContext<'_>, message: Option<&str>) -> Result<PushSummary> {
  let message = require_commit_message(message)?;
  ctx.require_working_tree()?;

  let git = ctx.git();
  pull_current(ctx, &git)?;
  commit_all(&git, message)?;
  push_current(ctx, &git)
}

fn commit_all(git: &Git<'_>, message: &str) -> Result<()> {
  git.stage_all()?;
  git.commit(message)?;
  print_success(&format!("Committed: {message}"));
  Ok(())
}

fn push_current(ctx: &ExecutionContext<'_>, git: &Git<'_>) -> Result<PushSummary> {
  let branch = git.require_current_branch()?;
  let remote = &ctx.settings().remote;

  let set_upstream = match git.upstream()? {
    Some(upstream) => {
      info!(%branch, %upstream, "pushing to existing upstream");
      git.push(None)?;
      false
    }
    None => {
      print_info(&format!(
        "{} has no upstream yet; tracking {remote}/{branch}",
        format_branch(&branch)
      ));
      git.push(Some((remote, &branch)))?;
      true
    }
  };

  print_success(&format!("Pushed {} to {remote}", format_branch(&branch)));
  Ok(PushSummary { branch, set_upstream })
}

fn pull_current(ctx: &ExecutionContext<'_>, git: &Git<'_>) -> Result<String> {
  let branch = git.require_current_branch()?;

  match git.upstream()? {
    Some(upstream) => {
      info!(%branch, %upstream, "pulling from upstream");
      git.pull(None)?;
    }
    None => {
      let remote = &ctx.settings().remote;
      info!(%branch, %remote, "no upstream, pulling from remote");
      git.pull(Some((remote, &branch)))?;
    }
  }

  print_success(&format!("Pulled latest changes into {}", format_branch(&branch)));
  Ok(branch)
}
