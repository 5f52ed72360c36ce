//! # Branch Commands
//!
//! `switch`, `delete-branch`, and `default-branch`.

use anyhow::Result;
use clap::Args;
use sprig_core::ops::{self, DeleteBranchOptions};

use crate::session::with_context;

#[derive(Args)]
pub struct SwitchArgs {
  /// Branch to switch to or create
  #[arg(value_name = "BRANCH")]
  pub name: Option<String>,
}

#[derive(Args)]
pub struct DeleteBranchArgs {
  /// Branch to delete
  #[arg(value_name = "BRANCH")]
  pub name: Option<String>,

  /// Only delete the local branch
  #[arg(long)]
  pub local_only: bool,

  /// Delete even if the branch is not fully merged
  #[arg(short, long)]
  pub force: bool,
}

#[derive(Args)]
pub struct DefaultBranchArgs {
  /// Branch to make the default
  #[arg(value_name = "BRANCH")]
  pub name: Option<String>,
}

pub(crate) fn handle_switch(args: SwitchArgs) -> Result<()> {
  ops::require_branch_name(args.name.as_deref())?;
  with_context(|ctx| ops::switch_or_create(ctx, args.name.as_deref())).map(drop)
}

pub(crate) fn handle_delete_branch(args: DeleteBranchArgs) -> Result<()> {
  ops::require_branch_name(args.name.as_deref())?;
  let options = DeleteBranchOptions {
    local_only: args.local_only,
    force: args.force,
  };
  with_context(|ctx| ops::delete_branch(ctx, args.name.as_deref(), options))
}

pub(crate) fn handle_default_branch(args: DefaultBranchArgs) -> Result<()> {
  ops::require_branch_name(args.name.as_deref())?;
  with_context(|ctx| ops::set_default_branch(ctx, args.name.as_deref()))
}
