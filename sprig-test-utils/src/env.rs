//! Isolated configuration directories for spawned binaries
//!
//! Rather than mutating the test process environment (which races between
//! parallel tests), [`XdgSandbox`] hands out the variables to set on a child
//! process so it resolves its XDG and HOME directories inside a temporary
//! directory.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

pub struct XdgSandbox {
  pub temp_dir: TempDir,
}

impl Default for XdgSandbox {
  fn default() -> Self {
    Self::new()
  }
}

impl XdgSandbox {
  /// XDG environment variable names
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const XDG_DATA_HOME: &'static str = "XDG_DATA_HOME";
  pub const XDG_CACHE_HOME: &'static str = "XDG_CACHE_HOME";

  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    for dir in ["config", "data", "cache", "home"] {
      fs::create_dir_all(temp_dir.path().join(dir)).expect("Failed to create sandbox directory");
    }
    Self { temp_dir }
  }

  pub fn config_home(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  pub fn home(&self) -> PathBuf {
    self.temp_dir.path().join("home")
  }

  /// Where an application named `app` keeps its configuration on Linux.
  pub fn app_config_dir(&self, app: &str) -> PathBuf {
    self.config_home().join(app)
  }

  /// Write `contents` to `<config_home>/<app>/config.toml`.
  pub fn write_config(&self, app: &str, contents: &str) -> Result<PathBuf> {
    let dir = self.app_config_dir(app);
    fs::create_dir_all(&dir)?;
    let path = dir.join("config.toml");
    fs::write(&path, contents)?;
    Ok(path)
  }

  /// Variables to set on a child process.
  pub fn envs(&self) -> Vec<(&'static str, PathBuf)> {
    vec![
      (Self::XDG_CONFIG_HOME, self.config_home()),
      (Self::XDG_DATA_HOME, self.temp_dir.path().join("data")),
      (Self::XDG_CACHE_HOME, self.temp_dir.path().join("cache")),
      ("HOME", self.home()),
    ]
  }
}
