//! # Collaborator Commands
//!
//! `collab add` and `collab remove`.

use anyhow::Result;
use clap::{Args, Subcommand};
use sprig_core::ops;

use crate::session::with_context;

#[derive(Args)]
pub struct CollabArgs {
  #[command(subcommand)]
  pub subcommand: CollabSubcommands,
}

#[derive(Subcommand)]
pub enum CollabSubcommands {
  /// Grant push access to one or more users
  #[command(long_about = "Grants push access on the current repository to each user in a\n\
            comma-separated list. Users that do not exist or already collaborate are\n\
            reported and skipped; the rest are still processed.")]
  Add(UsersArgs),

  /// Revoke access for one or more users
  #[command(alias = "rm")]
  Remove(RemoveArgs),
}

#[derive(Args)]
pub struct UsersArgs {
  /// Comma-separated GitHub usernames, e.g. alice,bob
  #[arg(value_name = "USERS")]
  pub users: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
  /// Comma-separated GitHub usernames, e.g. alice,bob
  #[arg(value_name = "USERS")]
  pub users: Option<String>,

  /// Skip the confirmation prompt
  #[arg(long)]
  pub yes: bool,
}

pub(crate) fn handle_collab_command(args: CollabArgs) -> Result<()> {
  match args.subcommand {
    CollabSubcommands::Add(add) => {
      ops::require_usernames(add.users.as_deref())?;
      with_context(|ctx| ops::add_collaborators(ctx, add.users.as_deref())?.into_result("added"))
    }
    CollabSubcommands::Remove(remove) => {
      ops::require_usernames(remove.users.as_deref())?;
      with_context(|ctx| ops::remove_collaborators(ctx, remove.users.as_deref(), remove.yes)?.into_result("removed"))
    }
  }
}
