//! Branch switching, deletion, and the hosted default branch.

use tracing::info;

use crate::context::ExecutionContext;
use crate::error::{Result, SprigError, require_arg};
use crate::output::{format_branch, format_repo_name, print_info, print_success};

/// How [`switch_or_create`] reached the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
  Existing,
  Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchSummary {
  /// Branch reported by git after switching.
  pub current: String,
  pub outcome: SwitchOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteBranchOptions {
  /// Leave the branch on the remote alone.
  pub local_only: bool,
  /// Delete even when the branch is not fully merged.
  pub force: bool,
}

/// Check if a branch name is valid
pub fn is_valid_branch_name(name: &str) -> bool {
  if name.is_empty() {
    return false;
  }

  if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
    return false;
  }

  if name.starts_with('-') || name.ends_with('.') || name.ends_with(".lock") || name.contains("..") {
    return false;
  }

  let invalid_chars = [' ', '~', '^', ':', '?', '*', '[', '\\'];
  if name.chars().any(|c| invalid_chars.contains(&c) || c.is_control()) {
    return false;
  }

  !name.contains("@{") && name != "@"
}

pub fn require_branch_name(name: Option<&str>) -> Result<&str> {
  let name = require_arg(name, "branch name")?;
  if is_valid_branch_name(name) {
    Ok(name)
  } else {
    Err(SprigError::validation(format!("'{name}' is not a valid branch name")))
  }
}

/// Switch to `name`, creating it from the current position when missing.
pub fn switch_or_create(ctx: &ExecutionContext<'_>, name: Option<&str>) -> Result<SwitchSummary> {
  let name = require_branch_name(name)?;
  ctx.require_working_tree()?;

  let git = ctx.git();
  let outcome = if git.branch_exists(name)? {
    info!(branch = name, "switching to existing branch");
    git.switch(name)?;
    SwitchOutcome::Existing
  } else {
    info!(branch = name, "creating branch");
    git.create_and_switch(name)?;
    SwitchOutcome::Created
  };

  let current = git.require_current_branch()?;
  match outcome {
    SwitchOutcome::Existing => print_success(&format!("Switched to {}", format_branch(&current))),
    SwitchOutcome::Created => print_success(&format!("Created and switched to {}", format_branch(&current))),
  }

  Ok(SwitchSummary { current, outcome })
}

/// Delete a local branch and, unless `local_only`, its remote counterpart.
pub fn delete_branch(ctx: &ExecutionContext<'_>, name: Option<&str>, options: DeleteBranchOptions) -> Result<()> {
  let name = require_branch_name(name)?;
  ctx.require_working_tree()?;

  let git = ctx.git();
  if git.current_branch()?.as_deref() == Some(name) {
    return Err(
      SprigError::validation(format!("cannot delete '{name}': it is the checked-out branch"))
        .with_details("Switch to another branch first, e.g. 'sprig switch main'"),
    );
  }

  git.delete_branch(name, options.force)?;
  print_success(&format!("Deleted local branch {}", format_branch(name)));

  if options.local_only {
    print_info("Remote branch left untouched (--local-only)");
    return Ok(());
  }

  let remote = &ctx.settings().remote;
  git.delete_remote_branch(remote, name)?;
  print_success(&format!("Deleted {} on {remote}", format_branch(name)));
  Ok(())
}

/// Make `name` the default branch of the hosted repository.
pub fn set_default_branch(ctx: &ExecutionContext<'_>, name: Option<&str>) -> Result<()> {
  let name = require_branch_name(name)?;
  let repo = ctx.remote_preflight()?;

  ctx.gh().set_default_branch(&repo, name)?;
  print_success(&format!(
    "Default branch of {} is now {}",
    format_repo_name(&repo.full_name()),
    format_branch(name)
  ));
  Ok(())
}
