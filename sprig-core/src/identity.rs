//! Repository identity parsing.
//!
//! Turns a remote URL into the `(owner, name)` pair the hosted service knows
//! the repository by. HTTPS, `ssh://`, and SCP-style (`git@host:owner/name`)
//! remotes are accepted, with or without a trailing `.git`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::consts::DEFAULT_HOSTNAME;
use crate::error::{Result, SprigError};

static GITHUB_REMOTE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| remote_regex(DEFAULT_HOSTNAME).expect("Failed to compile GitHub remote regex"));

/// Build the remote pattern for `host`: `host[:port][/:]<owner>/<name>[.git][/]`.
fn remote_regex(host: &str) -> std::result::Result<Regex, regex::Error> {
  Regex::new(&format!(
    r"(?:^|[@/]){}(?::\d+)?[/:](?P<owner>[^/:\s]+)/(?P<name>[^/\s]+?)(?:\.git)?/?$",
    regex::escape(host)
  ))
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
  /// Repository owner (user or organization)
  pub owner: String,
  /// Repository name
  pub name: String,
}

impl RepoIdentity {
  /// Parse a github.com remote URL.
  pub fn parse(url: &str) -> Result<Self> {
    Self::from_regex(&GITHUB_REMOTE_REGEX, url)
  }

  /// Parse a remote URL for an arbitrary host (e.g. GitHub Enterprise).
  pub fn parse_for_host(url: &str, host: &str) -> Result<Self> {
    if host.eq_ignore_ascii_case(DEFAULT_HOSTNAME) {
      return Self::parse(url);
    }
    let regex = remote_regex(host)
      .map_err(|e| SprigError::identity(format!("invalid hostname '{host}'")).with_details(e.to_string()))?;
    Self::from_regex(&regex, url)
  }

  fn from_regex(regex: &Regex, url: &str) -> Result<Self> {
    let url = url.trim();
    regex
      .captures(url)
      .and_then(|captures| {
        let owner = captures.name("owner")?.as_str();
        let name = captures.name("name")?.as_str();
        (!owner.is_empty() && !name.is_empty()).then(|| Self {
          owner: owner.to_string(),
          name: name.to_string(),
        })
      })
      .ok_or_else(|| SprigError::identity(format!("could not determine owner/name from remote URL '{url}'")))
  }

  /// Returns the full repository path as `owner/name`.
  pub fn full_name(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }
}

impl fmt::Display for RepoIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}
