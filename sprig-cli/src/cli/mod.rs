//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches each subcommand to its handler.

mod auth;
mod branch;
mod collab;
mod commit;
mod completion;
mod init;
mod repo;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use sprig_core::output::{ColorMode, cli_styles};

use crate::diagnostics;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Top-level CLI command for sprig
#[derive(Parser)]
#[command(name = "sprig")]
#[command(display_name = "🌱 Sprig")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Everyday git and GitHub repository chores in one command")]
#[command(
  long_about = "Sprig chains git and the GitHub CLI (gh) for routine work: commit and push,\n\
        switch or delete branches, create and delete repositories, change visibility,\n\
        and manage collaborators.\n\n\
        Every command validates its arguments before running anything and stops at\n\
        the first failed step. The exit code tells what went wrong: 2 invalid input,\n\
        3 missing tool or not in a repository, 4 not logged in, 5 unknown remote,\n\
        6 failed git/gh step, 7 not found, 8 conflict, 9 permission denied,\n\
        10 cancelled."
)]
#[command(version = VERSION)]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = cli_styles())]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages (every git/gh invocation)\n\
             -vvv: Show trace level messages (captured command output)"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for sprig
#[derive(Subcommand)]
pub enum Commands {
  /// Stage everything, commit, and push the current branch
  #[command(long_about = "Stages all changes, commits them with the given message, and pushes the\n\
            current branch. On the first push of a branch its upstream is set to the\n\
            configured remote.")]
  #[command(alias = "p")]
  Push(commit::MessageArgs),

  /// Pull the latest changes into the current branch
  Pull,

  /// Pull, then commit and push
  #[command(long_about = "Pulls the current branch, then stages, commits, and pushes. If the pull\n\
            fails nothing is committed.")]
  Sync(commit::MessageArgs),

  /// Switch to a branch, creating it when it does not exist
  #[command(alias = "sw")]
  Switch(branch::SwitchArgs),

  /// Delete a branch locally and on the remote
  #[command(long_about = "Deletes a local branch and, unless --local-only is given, the branch of the\n\
            same name on the configured remote. The checked-out branch is never deleted.")]
  DeleteBranch(branch::DeleteBranchArgs),

  /// Set the default branch of the GitHub repository
  DefaultBranch(branch::DefaultBranchArgs),

  /// Manage repository collaborators
  #[command(arg_required_else_help = true)]
  Collab(collab::CollabArgs),

  /// Create a GitHub repository from the current directory
  #[command(long_about = "Creates a GitHub repository named NAME from the current directory and pushes\n\
            to it. The directory is initialized as a git repository when needed, and all\n\
            files are committed first. The commit message and visibility are asked for\n\
            unless given as options.")]
  CreateRepo(repo::CreateRepoArgs),

  /// Delete a GitHub repository
  #[command(long_about = "Deletes the GitHub repository NAME after you type 'yes' to confirm.\n\n\
            If gh lacks the delete_repo scope, sprig asks gh to request it and retries\n\
            once. When the current working tree's remote points at the deleted repository,\n\
            its local .git directory is removed as well.")]
  DeleteRepo(repo::DeleteRepoArgs),

  /// List repositories with their visibility
  #[command(alias = "ls")]
  ListRepos(repo::ListReposArgs),

  /// Make the current repository public or private
  Visibility(repo::VisibilityArgs),

  /// Log out of GitHub and optionally log back in
  Reauth,

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for sprig commands.\n\n\
            Supported shells: bash, zsh, fish, and powershell.")]
  Completion(completion::CompletionArgs),

  /// Check tools, authentication, configuration, and the current repository
  #[command(alias = "diag")]
  Diagnostics,

  /// Write a default configuration file
  Init,
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Push(args) => commit::handle_push(args),
    Commands::Pull => commit::handle_pull(),
    Commands::Sync(args) => commit::handle_sync(args),
    Commands::Switch(args) => branch::handle_switch(args),
    Commands::DeleteBranch(args) => branch::handle_delete_branch(args),
    Commands::DefaultBranch(args) => branch::handle_default_branch(args),
    Commands::Collab(args) => collab::handle_collab_command(args),
    Commands::CreateRepo(args) => repo::handle_create_repo(args),
    Commands::DeleteRepo(args) => repo::handle_delete_repo(args),
    Commands::ListRepos(args) => repo::handle_list_repos(args),
    Commands::Visibility(args) => repo::handle_visibility(args),
    Commands::Reauth => auth::handle_reauth(),
    Commands::Completion(args) => completion::handle_completion_command(args),
    Commands::Diagnostics => diagnostics::run_diagnostics(),
    Commands::Init => init::handle_init(),
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn verify_cli() {
    Cli::command().debug_assert();
  }

  #[test]
  fn required_values_are_optional_at_parse_time() {
    let cli = Cli::try_parse_from(["sprig", "push"]).unwrap();
    assert!(matches!(cli.command, Commands::Push(ref args) if args.message.is_none()));
  }

  #[test]
  fn verbosity_counts_and_is_global() {
    let cli = Cli::try_parse_from(["sprig", "pull", "-vv"]).unwrap();
    assert_eq!(cli.verbose, 2);
  }

  #[test]
  fn create_repo_visibility_flags_conflict() {
    assert!(Cli::try_parse_from(["sprig", "create-repo", "widgets", "--public", "--private"]).is_err());
  }
}
