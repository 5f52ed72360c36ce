//! # Operations
//!
//! One function per user-facing operation. Each validates its arguments
//! before touching anything, runs its preflight checks in order, then drives
//! `git`/`gh` through the [`ExecutionContext`](crate::context::ExecutionContext),
//! stopping at the first failed step.

pub mod auth;
pub mod branch;
pub mod collaborators;
pub mod commit;
pub mod repo;

pub use auth::{ReauthOutcome, reauthenticate};
pub use branch::{
  DeleteBranchOptions, SwitchOutcome, SwitchSummary, delete_branch, is_valid_branch_name, require_branch_name,
  set_default_branch, switch_or_create,
};
pub use collaborators::{
  CollaboratorReport, add_collaborators, parse_usernames, remove_collaborators, require_usernames,
};
pub use commit::{PushSummary, commit_and_push, pull_commit_push, pull_latest, require_commit_message};
pub use repo::{
  CreateRepoOptions, CreatedRepo, DeletedRepo, VisibilityChange, change_visibility, create_repository,
  delete_repository, list_repositories, render_repo_table, require_list_limit, require_repo_name,
  require_visibility,
};
