//! Throwaway git repositories for tests
//!
//! Repositories are created with git2 in a temporary directory that is
//! removed when the guard drops. The process working directory is never
//! changed, so tests using these guards can run in parallel; pass
//! [`GitRepoTestGuard::path`] explicitly to whatever is under test.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use git2::{BranchType, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// Branch checked out in every fresh test repository.
pub const INITIAL_BRANCH: &str = "main";

/// A temporary git repository with a test identity configured.
pub struct GitRepoTestGuard {
  /// Keeps the directory alive for the guard's lifetime
  pub temp_dir: TempDir,
  pub repo: Repository,
}

impl GitRepoTestGuard {
  /// Empty repository on [`INITIAL_BRANCH`] with no commits.
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let mut options = RepositoryInitOptions::new();
    options.initial_head(INITIAL_BRANCH);
    let repo = Repository::init_opts(temp_dir.path(), &options).expect("Failed to initialize git repository");

    {
      let mut config = repo.config().expect("Failed to get repository config");
      config
        .set_str("user.name", "Sprig Test User")
        .expect("Failed to set user.name");
      config
        .set_str("user.email", "sprig-test@example.com")
        .expect("Failed to set user.email");
      config
        .set_bool("commit.gpgsign", false)
        .expect("Failed to disable commit signing");
    }

    Self { temp_dir, repo }
  }

  /// Repository with one commit on [`INITIAL_BRANCH`], so branches can be
  /// created from HEAD.
  pub fn with_initial_commit() -> Self {
    let guard = Self::new();
    create_commit(&guard.repo, "README.md", "# test\n", "Initial commit").expect("Failed to create initial commit");
    guard
  }

  /// Get the path to the working tree
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Add a remote named `name` pointing at `url`.
  pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
    self
      .repo
      .remote(name, url)
      .with_context(|| format!("Failed to add remote '{name}'"))?;
    Ok(())
  }

  /// Local branch names, sorted.
  pub fn branches(&self) -> Vec<String> {
    branch_names(&self.repo).expect("Failed to list branches")
  }

  /// Short name of the branch HEAD points at.
  pub fn head_branch(&self) -> Option<String> {
    self.repo.head().ok().and_then(|head| head.shorthand().map(str::to_string))
  }
}

impl Default for GitRepoTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

/// Write `file_name` and commit it on HEAD.
pub fn create_commit(repo: &Repository, file_name: &str, content: &str, message: &str) -> Result<()> {
  let workdir = repo.workdir().context("Repository has no working tree")?;
  fs::write(workdir.join(file_name), content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree = repo.find_tree(index.write_tree()?)?;
  let signature = Signature::now("Sprig Test User", "sprig-test@example.com")?;

  let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
  let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
  repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

  Ok(())
}

/// Create a local branch at `start_point` (a local branch) or HEAD.
pub fn create_branch(repo: &Repository, branch_name: &str, start_point: Option<&str>) -> Result<()> {
  let target = match start_point {
    Some(start) => repo
      .find_branch(start, BranchType::Local)?
      .into_reference()
      .peel_to_commit()?,
    None => repo.head()?.peel_to_commit()?,
  };

  repo.branch(branch_name, &target, false)?;
  Ok(())
}

/// Check out an existing local branch.
pub fn checkout_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  let reference = format!("refs/heads/{branch_name}");
  let commit = repo.revparse_single(&reference)?.peel_to_commit()?;

  repo.checkout_tree(commit.as_object(), None)?;
  repo.set_head(&reference)?;
  Ok(())
}

/// Names of all local branches, sorted.
pub fn branch_names(repo: &Repository) -> Result<Vec<String>> {
  let mut names = Vec::new();
  for branch in repo.branches(Some(BranchType::Local))? {
    let (branch, _) = branch?;
    if let Some(name) = branch.name()? {
      names.push(name.to_string());
    }
  }
  names.sort();
  Ok(names)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_repository_starts_on_main_without_commits() {
    let guard = GitRepoTestGuard::new();
    assert!(guard.path().join(".git").is_dir());
    assert!(guard.branches().is_empty());
  }

  #[test]
  fn initial_commit_creates_main() {
    let guard = GitRepoTestGuard::with_initial_commit();
    assert_eq!(guard.branches(), vec!["main"]);
    assert_eq!(guard.head_branch().as_deref(), Some("main"));
  }

  #[test]
  fn branches_can_be_created_and_checked_out() {
    let guard = GitRepoTestGuard::with_initial_commit();
    create_branch(&guard.repo, "feature", None).unwrap();
    checkout_branch(&guard.repo, "feature").unwrap();

    assert_eq!(guard.branches(), vec!["feature", "main"]);
    assert_eq!(guard.head_branch().as_deref(), Some("feature"));
  }

  #[test]
  fn remotes_are_recorded() {
    let guard = GitRepoTestGuard::new();
    guard.add_remote("origin", "git@github.com:acme/widgets.git").unwrap();

    let remote = guard.repo.find_remote("origin").unwrap();
    assert_eq!(remote.url(), Some("git@github.com:acme/widgets.git"));
  }
}
