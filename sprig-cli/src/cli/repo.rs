//! # Repository Commands
//!
//! `create-repo`, `delete-repo`, `list-repos`, and `visibility`.

use anyhow::Result;
use clap::Args;
use sprig_core::Visibility;
use sprig_core::ops::{self, CreateRepoOptions};

use crate::session::with_context;

#[derive(Args)]
pub struct CreateRepoArgs {
  /// Repository name, optionally OWNER/NAME
  #[arg(value_name = "NAME")]
  pub name: Option<String>,

  /// Message for the commit that is pushed (asked for when omitted)
  #[arg(short, long)]
  pub message: Option<String>,

  /// Create a public repository
  #[arg(long, conflicts_with = "private")]
  pub public: bool,

  /// Create a private repository
  #[arg(long)]
  pub private: bool,
}

impl CreateRepoArgs {
  fn visibility(&self) -> Option<Visibility> {
    match (self.public, self.private) {
      (true, _) => Some(Visibility::Public),
      (_, true) => Some(Visibility::Private),
      _ => None,
    }
  }
}

#[derive(Args)]
pub struct DeleteRepoArgs {
  /// Repository to delete, NAME or OWNER/NAME
  #[arg(value_name = "NAME")]
  pub name: Option<String>,

  /// Skip the confirmation prompt
  #[arg(long)]
  pub yes: bool,
}

#[derive(Args)]
pub struct ListReposArgs {
  /// User or organization (defaults to the authenticated user)
  #[arg(value_name = "OWNER")]
  pub owner: Option<String>,

  /// Maximum number of repositories to list
  #[arg(short = 'L', long)]
  pub limit: Option<u32>,
}

#[derive(Args)]
pub struct VisibilityArgs {
  /// Desired visibility: public or private
  #[arg(value_name = "VISIBILITY")]
  pub visibility: Option<String>,
}

pub(crate) fn handle_create_repo(args: CreateRepoArgs) -> Result<()> {
  ops::require_repo_name(args.name.as_deref())?;
  let options = CreateRepoOptions {
    message: args.message.clone(),
    visibility: args.visibility(),
  };
  with_context(|ctx| ops::create_repository(ctx, args.name.as_deref(), options)).map(drop)
}

pub(crate) fn handle_delete_repo(args: DeleteRepoArgs) -> Result<()> {
  ops::require_repo_name(args.name.as_deref())?;
  with_context(|ctx| ops::delete_repository(ctx, args.name.as_deref(), args.yes)).map(drop)
}

pub(crate) fn handle_list_repos(args: ListReposArgs) -> Result<()> {
  if let Some(limit) = args.limit {
    ops::require_list_limit(limit)?;
  }
  with_context(|ctx| ops::list_repositories(ctx, args.owner.as_deref(), args.limit)).map(drop)
}

pub(crate) fn handle_visibility(args: VisibilityArgs) -> Result<()> {
  ops::require_visibility(args.visibility.as_deref())?;
  with_context(|ctx| ops::change_visibility(ctx, args.visibility.as_deref())).map(drop)
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct Harness {
    #[command(flatten)]
    args: CreateRepoArgs,
  }

  #[test]
  fn visibility_flags_map_to_visibility() {
    let private = Harness::try_parse_from(["create-repo", "widgets", "--private"]).unwrap();
    assert_eq!(private.args.visibility(), Some(Visibility::Private));

    let neither = Harness::try_parse_from(["create-repo", "widgets", "-m", "first"]).unwrap();
    assert_eq!(neither.args.visibility(), None);
    assert_eq!(neither.args.message.as_deref(), Some("first"));
  }
}
