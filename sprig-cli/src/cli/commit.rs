//! # Commit Commands
//!
//! `push`, `pull`, and `sync`.

use anyhow::Result;
use clap::Args;
use sprig_core::ops;

use crate::session::with_context;

#[derive(Args)]
pub struct MessageArgs {
  /// Commit message
  #[arg(value_name = "MESSAGE")]
  pub message: Option<String>,
}

pub(crate) fn handle_push(args: MessageArgs) -> Result<()> {
  ops::require_commit_message(args.message.as_deref())?;
  with_context(|ctx| ops::commit_and_push(ctx, args.message.as_deref())).map(drop)
}

pub(crate) fn handle_pull() -> Result<()> {
  with_context(ops::pull_latest).map(drop)
}

pub(crate) fn handle_sync(args: MessageArgs) -> Result<()> {
  ops::require_commit_message(args.message.as_deref())?;
  with_context(|ctx| ops::pull_commit_push(ctx, args.message.as_deref())).map(drop)
}
