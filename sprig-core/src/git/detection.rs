//! Working-tree discovery helpers.

use std::path::{Path, PathBuf};

use git2::Repository;

/// Root of the working tree containing `path`, if any.
///
/// Bare repositories have no working tree and yield `None`.
pub fn detect_working_tree<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
  match Repository::discover(path.as_ref()) {
    Ok(repo) => repo.workdir().map(Path::to_path_buf),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use sprig_test_utils::GitRepoTestGuard;
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn plain_directory_is_not_a_working_tree() {
    let temp_dir = TempDir::new().unwrap();
    assert!(detect_working_tree(temp_dir.path()).is_none());
  }

  #[test]
  fn nested_directory_resolves_to_root() {
    let guard = GitRepoTestGuard::new();
    let nested = guard.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();

    let root = detect_working_tree(&nested).unwrap();
    assert_eq!(
      std::fs::canonicalize(root).unwrap(),
      std::fs::canonicalize(guard.path()).unwrap()
    );
  }

  #[test]
  fn bare_repository_has_no_working_tree() {
    let temp_dir = TempDir::new().unwrap();
    Repository::init_bare(temp_dir.path()).unwrap();
    assert!(detect_working_tree(temp_dir.path()).is_none());
  }
}
