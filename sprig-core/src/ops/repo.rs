//! Hosted repository lifecycle: create, delete, list, and visibility.

use std::path::{Path, PathBuf};

use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, error, info, warn};

use crate::consts::{DELETE_REPO_SCOPE, GIT_METADATA_DIR};
use crate::context::ExecutionContext;
use crate::error::{ErrorKind, Result, SprigError, require_arg};
use crate::gh::{RepoSummary, Visibility};
use crate::output::{format_path, format_repo_name, format_visibility, print_info, print_success, print_warning};
use crate::prompts::confirm_destructive;

/// Choices made up front; anything left `None` is asked for interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRepoOptions {
  pub message: Option<String>,
  pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepo {
  pub name: String,
  pub visibility: Visibility,
  /// A fresh `git init` was needed.
  pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedRepo {
  pub name: String,
  /// Local `.git` directory removed afterwards, if any.
  pub removed_metadata: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
  Unchanged(Visibility),
  Changed { from: Visibility, to: Visibility },
}

/// Repository names accepted by GitHub, optionally prefixed with an owner.
pub fn require_repo_name(name: Option<&str>) -> Result<&str> {
  let name = require_arg(name, "repository name")?;
  let valid_part =
    |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

  let valid = match name.split_once('/') {
    Some((owner, repo)) => valid_part(owner) && valid_part(repo),
    None => valid_part(name),
  };
  if valid && name != "." && name != ".." {
    Ok(name)
  } else {
    Err(
      SprigError::validation(format!("'{name}' is not a valid repository name"))
        .with_details("Use letters, digits, '-', '_' or '.', optionally as OWNER/NAME"),
    )
  }
}

/// A visibility a repository can be switched to: `public` or `private`.
pub fn require_visibility(requested: Option<&str>) -> Result<Visibility> {
  match require_arg(requested, "visibility")?.parse()? {
    Visibility::Internal => Err(SprigError::validation(
      "visibility 'internal' cannot be requested (expected 'public' or 'private')",
    )),
    visibility => Ok(visibility),
  }
}

/// `gh repo list` needs at least one row.
pub fn require_list_limit(limit: u32) -> Result<u32> {
  if limit == 0 {
    Err(SprigError::validation("limit must be at least 1"))
  } else {
    Ok(limit)
  }
}

/// Create a hosted repository from the current directory and push to it.
pub fn create_repository(ctx: &ExecutionContext<'_>, name: Option<&str>, options: CreateRepoOptions) -> Result<CreatedRepo> {
  let name = require_repo_name(name)?;
  ctx.hosted_preflight()?;

  let settings = ctx.settings();
  let message = match options.message.filter(|m| !m.trim().is_empty()) {
    Some(message) => message,
    None => ctx
      .prompter()
      .input("Commit message", Some(settings.default_commit_message.as_str()))?,
  };
  let message = require_arg(Some(message.as_str()), "commit message")?.to_string();

  let visibility = match options.visibility {
    Some(visibility) => visibility,
    None => {
      let choices = [Visibility::Public, Visibility::Private];
      let default = choices
        .iter()
        .position(|v| *v == settings.default_visibility)
        .unwrap_or_default();
      let labels: Vec<&str> = choices.iter().map(|v| v.as_str()).collect();
      choices[ctx.prompter().select("Visibility", &labels, default)?]
    }
  };

  let git = ctx.git();
  let initialized = ctx.repo_root().is_none();
  if initialized {
    info!(dir = %ctx.cwd().display(), "initializing working tree");
    git.init()?;
  }
  git.stage_all()?;
  git.commit(&message)?;

  ctx.gh().create_repo(name, visibility, &settings.remote)?;
  print_success(&format!(
    "Created {} repository {} and pushed to {}",
    format_visibility(visibility.as_str()),
    format_repo_name(name),
    settings.remote
  ));

  Ok(CreatedRepo {
    name: name.to_string(),
    visibility,
    initialized,
  })
}

/// Delete a hosted repository.
///
/// A permission failure triggers one interactive request for the
/// `delete_repo` scope followed by one retry. Whatever the remote outcome,
/// the current working tree's `.git` directory is removed when its remote
/// names the deleted repository.
pub fn delete_repository(ctx: &ExecutionContext<'_>, name: Option<&str>, confirmed: bool) -> Result<DeletedRepo> {
  let name = require_repo_name(name)?;
  ctx.hosted_preflight()?;

  if !confirmed && !confirm_destructive(ctx.prompter(), &format!("Deleting repository {name}"))? {
    return Err(SprigError::cancelled(format!("deletion of {name} cancelled; nothing was changed")));
  }

  let local_metadata = local_metadata_for(ctx, name);
  let remote = delete_with_scope_refresh(ctx, name);
  match &remote {
    Ok(()) => print_success(&format!("Deleted repository {}", format_repo_name(name))),
    Err(err) => warn!(repo = name, kind = %err.kind(), "remote deletion failed"),
  }

  let removed_metadata = match local_metadata {
    Some(path) => {
      std::fs::remove_dir_all(&path).map_err(|e| removal_failure(&path, &e, remote.as_ref().err()))?;
      print_info(&format!(
        "Removed local repository metadata at {}",
        format_path(&path.display().to_string())
      ));
      Some(path)
    }
    None => None,
  };

  remote.map(|()| DeletedRepo {
    name: name.to_string(),
    removed_metadata,
  })
}

/// Error for a failed `.git` removal that keeps any remote failure visible.
fn removal_failure(path: &Path, err: &std::io::Error, remote: Option<&SprigError>) -> SprigError {
  let mut details = err.to_string();
  if let Some(remote) = remote {
    error!(kind = %remote.kind(), message = %remote.message(), "remote deletion failed before local cleanup");
    details.push_str(&format!("\nRemote deletion also failed ({}): {}", remote.kind(), remote.message()));
  }
  SprigError::step(format!("could not remove {}", path.display())).with_details(details)
}

fn delete_with_scope_refresh(ctx: &ExecutionContext<'_>, name: &str) -> Result<()> {
  let gh = ctx.gh();
  match gh.delete_repo(name) {
    Err(err) if err.kind() == ErrorKind::PermissionDenied => {
      print_warning(&format!(
        "Deleting repositories needs the '{DELETE_REPO_SCOPE}' scope; requesting it now"
      ));
      gh.refresh_scopes(&[DELETE_REPO_SCOPE])?;
      gh.delete_repo(name)
    }
    other => other,
  }
}

/// The `.git` directory of the current working tree, when its remote points
/// at `name` (bare or `owner/name`).
fn local_metadata_for(ctx: &ExecutionContext<'_>, name: &str) -> Option<PathBuf> {
  let root = ctx.repo_root()?;
  let identity = match ctx.resolve_identity() {
    Ok(identity) => identity,
    Err(err) => {
      debug!(error = %err, "working tree identity unknown; keeping local metadata");
      return None;
    }
  };

  let matches = name.eq_ignore_ascii_case(&identity.name) || name.eq_ignore_ascii_case(&identity.full_name());
  matches.then(|| root.join(GIT_METADATA_DIR)).filter(|path| path.is_dir())
}

/// List repositories of `owner` (or the authenticated user) and print them.
pub fn list_repositories(ctx: &ExecutionContext<'_>, owner: Option<&str>, limit: Option<u32>) -> Result<Vec<RepoSummary>> {
  let limit = require_list_limit(limit.unwrap_or(ctx.settings().list_limit))?;
  let owner = owner.map(str::trim).filter(|o| !o.is_empty());
  ctx.hosted_preflight()?;

  let repos = ctx.gh().list_repos(owner, limit)?;
  if repos.is_empty() {
    print_info("No repositories found");
  } else {
    println!("{}", render_repo_table(&repos));
  }
  Ok(repos)
}

/// Render repositories as a name/visibility table.
pub fn render_repo_table(repos: &[RepoSummary]) -> String {
  #[derive(Tabled)]
  struct RepoRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Visibility")]
    visibility: String,
  }

  let rows = repos.iter().map(|repo| RepoRow {
    name: repo.name.clone(),
    visibility: repo.visibility.to_string(),
  });
  Table::new(rows).with(Style::sharp()).to_string()
}

/// Set the visibility of the current repository, skipping the call when it
/// already matches.
pub fn change_visibility(ctx: &ExecutionContext<'_>, requested: Option<&str>) -> Result<VisibilityChange> {
  let requested = require_visibility(requested)?;
  let repo = ctx.remote_preflight()?;
  let gh = ctx.gh();

  let current = gh.visibility(&repo)?;
  if current == requested {
    print_info(&format!(
      "{} is already {}; nothing to change",
      format_repo_name(&repo.full_name()),
      format_visibility(current.as_str())
    ));
    return Ok(VisibilityChange::Unchanged(current));
  }

  gh.set_visibility(&repo, requested)?;
  print_success(&format!(
    "{} is now {}",
    format_repo_name(&repo.full_name()),
    format_visibility(requested.as_str())
  ));
  Ok(VisibilityChange::Changed {
    from: current,
    to: requested,
  })
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;
  use crate::config::Settings;
  use crate::exec::{CommandOutput, Tool};
  use crate::testing::{ScriptedPrompter, ScriptedRunner};

  fn ctx<'a>(
    settings: &'a Settings,
    runner: &'a ScriptedRunner,
    prompter: &'a ScriptedPrompter,
    root: Option<&Path>,
  ) -> ExecutionContext<'a> {
    ExecutionContext::new(PathBuf::from("/work/widgets"), settings, runner, prompter)
      .with_repo_root(root.map(Path::to_path_buf))
  }

  fn with_remote(runner: ScriptedRunner, url: &str) -> ScriptedRunner {
    runner.on(Tool::Git, &["remote", "get-url"], CommandOutput::success(format!("{url}\n")))
  }

  #[test_case("widgets", true ; "plain")]
  #[test_case("acme/widgets", true ; "owner prefixed")]
  #[test_case("my_repo.rs", true ; "underscore and dot")]
  #[test_case("bad name", false ; "space")]
  #[test_case("a/b/c", false ; "too many slashes")]
  #[test_case("..", false ; "dot dot")]
  fn validates_repository_names(name: &str, valid: bool) {
    assert_eq!(require_repo_name(Some(name)).is_ok(), valid);
  }

  #[test_case("public", Some(Visibility::Public) ; "public")]
  #[test_case(" PRIVATE ", Some(Visibility::Private) ; "private any case")]
  #[test_case("internal", None ; "internal is read only")]
  #[test_case("secret", None ; "unknown")]
  fn only_public_and_private_can_be_requested(requested: &str, expected: Option<Visibility>) {
    assert_eq!(require_visibility(Some(requested)).ok(), expected);
  }

  #[test]
  fn internal_visibility_makes_no_edit_call() {
    let settings = Settings::default();
    let runner = with_remote(ScriptedRunner::new(), "https://github.com/acme/widgets").on(
      Tool::Gh,
      &["repo", "view"],
      CommandOutput::success(r#"{"visibility":"PUBLIC"}"#),
    );
    let prompter = ScriptedPrompter::new();
    let ctx = ctx(&settings, &runner, &prompter, Some(Path::new("/work/widgets")));

    let err = change_visibility(&ctx, Some("internal")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.message().contains("'public' or 'private'"));
    assert!(runner.calls().is_empty());
  }

  #[test]
  fn failed_cleanup_keeps_the_remote_failure() {
    let remote = SprigError::new(ErrorKind::NotFound, "could not delete repository 'widgets': Not Found (HTTP 404)");
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");

    let err = removal_failure(Path::new("/work/widgets/.git"), &io_err, Some(&remote));

    assert_eq!(err.kind(), ErrorKind::Step);
    assert_eq!(err.message(), "could not remove /work/widgets/.git");
    let details = err.details().unwrap();
    assert!(details.contains("Permission denied"));
    assert!(details.contains("Remote deletion also failed (not found)"));
    assert!(details.contains("HTTP 404"));

    let alone = removal_failure(Path::new("/work/widgets/.git"), &io_err, None);
    assert_eq!(alone.details(), Some("Permission denied"));
  }

  #[test]
  fn missing_arguments_run_nothing() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new();
    let ctx = ctx(&settings, &runner, &prompter, Some(Path::new("/work/widgets")));

    assert_eq!(
      create_repository(&ctx, None, CreateRepoOptions::default()).unwrap_err().kind(),
      ErrorKind::Validation
    );
    assert_eq!(delete_repository(&ctx, Some(" "), true).unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(change_visibility(&ctx, None).unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(change_visibility(&ctx, Some("secret")).unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(change_visibility(&ctx, Some("internal")).unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(list_repositories(&ctx, None, Some(0)).unwrap_err().kind(), ErrorKind::Validation);
    assert!(runner.calls().is_empty());
    assert!(prompter.asked().is_empty());
  }

  #[test]
  fn create_prompts_and_initializes_outside_a_working_tree() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new().with_input("").with_select(1);

    let created = create_repository(
      &ctx(&settings, &runner, &prompter, None),
      Some("widgets"),
      CreateRepoOptions::default(),
    )
    .unwrap();

    assert!(created.initialized);
    assert_eq!(created.visibility, Visibility::Private);
    assert_eq!(
      runner.command_lines(),
      vec![
        "gh --version",
        "gh auth status --hostname github.com",
        "git init",
        "git add -A",
        "git commit -m \"Initial commit\"",
        "gh repo create widgets --private --source . --remote origin --push",
      ]
    );
  }

  #[test]
  fn create_with_flags_asks_nothing() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new();
    let options = CreateRepoOptions {
      message: Some("first".to_string()),
      visibility: Some(Visibility::Public),
    };

    let created = create_repository(
      &ctx(&settings, &runner, &prompter, Some(Path::new("/work/widgets"))),
      Some("widgets"),
      options,
    )
    .unwrap();

    assert!(!created.initialized);
    assert!(prompter.asked().is_empty());
    assert_eq!(runner.count(Tool::Git, &["init"]), 0);
    assert_eq!(runner.count(Tool::Gh, &["repo", "create", "widgets", "--public"]), 1);
  }

  #[test]
  fn failed_commit_skips_repo_creation() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(Tool::Git, &["commit"], CommandOutput::failure(1, "nothing to commit"));
    let prompter = ScriptedPrompter::new();
    let options = CreateRepoOptions {
      message: Some("first".to_string()),
      visibility: Some(Visibility::Public),
    };

    let err = create_repository(
      &ctx(&settings, &runner, &prompter, Some(Path::new("/work/widgets"))),
      Some("widgets"),
      options,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Step);
    assert_eq!(runner.count(Tool::Gh, &["repo", "create"]), 0);
  }

  #[test_case("y" ; "single letter")]
  #[test_case("YES" ; "uppercase")]
  #[test_case("" ; "empty")]
  fn delete_without_exact_yes_is_cancelled(answer: &str) {
    let settings = Settings::default();
    let runner = ScriptedRunner::new();
    let prompter = ScriptedPrompter::new().with_input(answer);

    let err = delete_repository(&ctx(&settings, &runner, &prompter, None), Some("widgets"), false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(runner.count(Tool::Gh, &["repo", "delete"]), 0);
  }

  #[test]
  fn delete_refreshes_scope_and_retries_once() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new().on(
      Tool::Gh,
      &["repo", "delete"],
      CommandOutput::failure(1, "HTTP 403: Must have admin rights to Repository."),
    );
    let prompter = ScriptedPrompter::new().with_input("yes");

    let err = delete_repository(&ctx(&settings, &runner, &prompter, None), Some("widgets"), false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(runner.count(Tool::Gh, &["repo", "delete", "widgets", "--yes"]), 2);
    assert_eq!(
      runner.count(
        Tool::Gh,
        &["auth", "refresh", "--hostname", "github.com", "--scopes", "delete_repo"]
      ),
      1
    );
    let refresh = runner
      .calls()
      .into_iter()
      .find(|call| call.args.first().map(String::as_str) == Some("auth") && call.args[1] == "refresh")
      .unwrap();
    assert!(refresh.interactive);
  }

  #[test]
  fn delete_succeeds_after_scope_refresh() {
    let settings = Settings::default();
    let runner = ScriptedRunner::new()
      .on(Tool::Gh, &["repo", "delete"], CommandOutput::failure(1, "HTTP 403: forbidden"))
      .on(Tool::Gh, &["repo", "delete"], CommandOutput::success(""));
    let prompter = ScriptedPrompter::new();

    let deleted = delete_repository(&ctx(&settings, &runner, &prompter, None), Some("widgets"), true).unwrap();

    assert_eq!(deleted.name, "widgets");
    assert_eq!(deleted.removed_metadata, None);
    assert_eq!(runner.count(Tool::Gh, &["repo", "delete"]), 2);
  }

  #[test]
  fn delete_removes_matching_local_metadata_even_when_remote_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join(".git")).unwrap();
    let settings = Settings::default();
    let runner = with_remote(ScriptedRunner::new(), "https://github.com/acme/widgets.git").on(
      Tool::Gh,
      &["repo", "delete"],
      CommandOutput::failure(1, "gh: Not Found (HTTP 404)"),
    );
    let prompter = ScriptedPrompter::new();

    let err = delete_repository(
      &ctx(&settings, &runner, &prompter, Some(temp.path())),
      Some("acme/widgets"),
      true,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!temp.path().join(".git").exists());
  }

  #[test]
  fn delete_keeps_metadata_of_unrelated_working_tree() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join(".git")).unwrap();
    let settings = Settings::default();
    let runner = with_remote(ScriptedRunner::new(), "git@github.com:acme/gadgets.git");
    let prompter = ScriptedPrompter::new();

    let deleted = delete_repository(&ctx(&settings, &runner, &prompter, Some(temp.path())), Some("widgets"), true).unwrap();

    assert_eq!(deleted.removed_metadata, None);
    assert!(temp.path().join(".git").is_dir());
  }

  #[test]
  fn lists_repositories_with_configured_limit() {
    let mut settings = Settings::default();
    settings.list_limit = 5;
    let runner = ScriptedRunner::new().on(
      Tool::Gh,
      &["repo", "list"],
      CommandOutput::success(r#"[{"name":"widgets","visibility":"PUBLIC"}]"#),
    );
    let prompter = ScriptedPrompter::new();

    let repos = list_repositories(&ctx(&settings, &runner, &prompter, None), Some(" acme "), None).unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(
      runner.count(
        Tool::Gh,
        &["repo", "list", "acme", "--json", "name,visibility", "--limit", "5"]
      ),
      1
    );
  }

  #[test]
  fn repo_table_has_headers_and_rows() {
    let table = render_repo_table(&[RepoSummary {
      name: "widgets".to_string(),
      visibility: Visibility::Private,
    }]);
    assert!(table.contains("Name"));
    assert!(table.contains("Visibility"));
    assert!(table.contains("widgets"));
    assert!(table.contains("private"));
  }

  #[test]
  fn visibility_change_twice_mutates_once() {
    let settings = Settings::default();
    let runner = with_remote(ScriptedRunner::new(), "https://github.com/acme/widgets")
      .on(
        Tool::Gh,
        &["repo", "view"],
        CommandOutput::success(r#"{"visibility":"PRIVATE"}"#),
      )
      .on(
        Tool::Gh,
        &["repo", "view"],
        CommandOutput::success(r#"{"visibility":"PUBLIC"}"#),
      );
    let prompter = ScriptedPrompter::new();
    let ctx = ctx(&settings, &runner, &prompter, Some(Path::new("/work/widgets")));

    let first = change_visibility(&ctx, Some("public")).unwrap();
    let second = change_visibility(&ctx, Some("public")).unwrap();

    assert_eq!(
      first,
      VisibilityChange::Changed {
        from: Visibility::Private,
        to: Visibility::Public,
      }
    );
    assert_eq!(second, VisibilityChange::Unchanged(Visibility::Public));
    assert_eq!(runner.count(Tool::Gh, &["repo", "edit"]), 1);
    assert_eq!(
      runner.count(
        Tool::Gh,
        &[
          "repo",
          "edit",
          "acme/widgets",
          "--visibility",
          "public",
          "--accept-visibility-change-consequences"
        ]
      ),
      1
    );
  }
}
