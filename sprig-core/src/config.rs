//! # Configuration Management
//!
//! Optional settings read from `config.toml` in sprig's XDG config directory,
//! with environment variable overrides on top. Nothing is ever written back
//! except by `sprig init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
  DEFAULT_COMMIT_MESSAGE, DEFAULT_HOSTNAME, DEFAULT_LIST_LIMIT, DEFAULT_REMOTE, ENV_GH, ENV_GIT, ENV_HOSTNAME,
  ENV_REMOTE, GH_EXECUTABLE, GIT_EXECUTABLE,
};
use crate::gh::Visibility;

/// Represents the configuration directories for the sprig application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "sprig").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the path to the settings file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }

  /// Write the default settings file if it does not exist yet.
  ///
  /// Returns `true` when a new file was written.
  pub fn init(&self) -> Result<bool> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;

    let config_path = self.config_path();
    if config_path.exists() {
      return Ok(false);
    }

    fs::write(&config_path, DEFAULT_CONFIG_TOML)
      .with_context(|| format!("Failed to write settings to {}", config_path.display()))?;
    Ok(true)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

const DEFAULT_CONFIG_TOML: &str = r#"# sprig settings. Every key is optional.

# Remote used for identity resolution, push, and pull
remote = "origin"

# Host the gh CLI talks to; remotes must point at it
hostname = "github.com"

# Suggested message for the first commit of a new repository
default_commit_message = "Initial commit"

# Suggested visibility for new repositories: "public" or "private"
default_visibility = "public"

# Maximum number of repositories shown by `sprig list-repos`
list_limit = 100

[tools]
git = "git"
gh = "gh"
"#;

/// Executables used for the wrapped tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
  pub git: String,
  pub gh: String,
}

impl Default for Tools {
  fn default() -> Self {
    Self {
      git: GIT_EXECUTABLE.to_string(),
      gh: GH_EXECUTABLE.to_string(),
    }
  }
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub remote: String,
  pub hostname: String,
  pub default_commit_message: String,
  pub default_visibility: Visibility,
  pub list_limit: u32,
  pub tools: Tools,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      remote: DEFAULT_REMOTE.to_string(),
      hostname: DEFAULT_HOSTNAME.to_string(),
      default_commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
      default_visibility: Visibility::Public,
      list_limit: DEFAULT_LIST_LIMIT,
      tools: Tools::default(),
    }
  }
}

impl Settings {
  /// Load settings from the default location, then apply environment
  /// overrides.
  pub fn load() -> Result<Self> {
    let dirs = get_config_dirs()?;
    let mut settings = Self::load_from(&dirs.config_path())?;
    settings.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(settings)
  }

  /// Load settings from `path`, falling back to defaults when it is absent.
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No settings file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    if settings.default_visibility == Visibility::Internal {
      bail!(
        "Invalid default_visibility in {}: expected \"public\" or \"private\"",
        path.display()
      );
    }

    debug!("Loaded settings from {}", path.display());
    Ok(settings)
  }

  /// Apply `SPRIG_*` overrides. Blank values are ignored.
  pub fn apply_env_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(git) = get(ENV_GIT) {
      self.tools.git = git;
    }
    if let Some(gh) = get(ENV_GH) {
      self.tools.gh = gh;
    }
    if let Some(remote) = get(ENV_REMOTE) {
      self.remote = remote;
    }
    if let Some(hostname) = get(ENV_HOSTNAME) {
      self.hostname = hostname;
    }
  }
}
