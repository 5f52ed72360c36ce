//! # GitHub CLI Facade
//!
//! Typed wrappers over the `gh` commands sprig relies on. Failures are
//! classified from the structured signals `gh` exposes: the `HTTP <code>`
//! status it prints for API errors and its dedicated exit code for missing
//! authentication.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::consts::GH_EXIT_AUTH_REQUIRED;
use crate::error::{ErrorKind, Result, SprigError};
use crate::exec::{CommandOutput, CommandRunner, Invocation, Tool};
use crate::identity::RepoIdentity;

static HTTP_STATUS_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bHTTP (\d{3})\b").expect("Failed to compile HTTP status regex"));

/// Visibility of a hosted repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
  Public,
  Private,
  Internal,
}

impl Visibility {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Public => "public",
      Self::Private => "private",
      Self::Internal => "internal",
    }
  }
}

impl fmt::Display for Visibility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Visibility {
  type Err = SprigError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "public" => Ok(Self::Public),
      "private" => Ok(Self::Private),
      "internal" => Ok(Self::Internal),
      other => Err(SprigError::validation(format!(
        "unknown visibility '{other}' (expected 'public' or 'private')"
      ))),
    }
  }
}

impl Serialize for Visibility {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

// `gh` reports `PUBLIC`, config files use `public`.
impl<'de> Deserialize<'de> for Visibility {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// One row of `gh repo list --json name,visibility`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
  pub name: String,
  pub visibility: Visibility,
}

#[derive(Debug, Deserialize)]
struct RepoVisibility {
  visibility: Visibility,
}

#[derive(Debug, Deserialize)]
struct UserLogin {
  login: String,
}

/// Extract the HTTP status `gh` reports for a failed API request.
pub fn http_status(text: &str) -> Option<u16> {
  HTTP_STATUS_REGEX
    .captures(text)
    .and_then(|captures| captures.get(1))
    .and_then(|code| code.as_str().parse().ok())
}

/// Map a failed `gh` invocation onto an [`ErrorKind`].
pub fn classify(output: &CommandOutput) -> ErrorKind {
  if output.code == Some(GH_EXIT_AUTH_REQUIRED) {
    return ErrorKind::Authentication;
  }

  match http_status(&output.stderr).or_else(|| http_status(&output.stdout)) {
    Some(401) => ErrorKind::Authentication,
    Some(403) => ErrorKind::PermissionDenied,
    Some(404) => ErrorKind::NotFound,
    Some(422) => ErrorKind::Conflict,
    _ => ErrorKind::Step,
  }
}

/// Build the error for a failed `gh` call attempting `action`.
pub fn failure(action: &str, output: &CommandOutput) -> SprigError {
  let kind = classify(output);
  let reason = output
    .stderr
    .lines()
    .map(|line| line.trim().trim_start_matches("gh: ").trim())
    .find(|line| !line.is_empty())
    .map_or_else(|| kind.label().to_string(), str::to_string);

  SprigError::new(kind, format!("could not {action}: {reason}")).with_details(output.combined())
}

/// Handle to the `gh` executable for one working directory.
pub struct Gh<'a> {
  runner: &'a dyn CommandRunner,
  program: &'a str,
  cwd: &'a Path,
  hostname: &'a str,
}

impl<'a> Gh<'a> {
  pub fn new(runner: &'a dyn CommandRunner, program: &'a str, cwd: &'a Path, hostname: &'a str) -> Self {
    Self {
      runner,
      program,
      cwd,
      hostname,
    }
  }

  fn spawn(&self, invocation: &Invocation) -> Result<CommandOutput> {
    self.runner.run(invocation).map_err(|err| {
      if err.kind() == io::ErrorKind::NotFound {
        SprigError::environment(format!(
          "GitHub CLI '{}' is not installed or not on PATH",
          self.program
        ))
        .with_details("Install it from https://cli.github.com/")
      } else {
        SprigError::environment(format!("failed to start '{}'", invocation.command_line())).with_details(err.to_string())
      }
    })
  }

  fn run(&self, args: &[&str]) -> Result<CommandOutput> {
    self.spawn(&Invocation::new(Tool::Gh, self.program, self.cwd, args.iter().copied()))
  }

  fn run_checked(&self, action: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = self.run(args)?;
    if output.succeeded() {
      Ok(output)
    } else {
      Err(failure(action, &output))
    }
  }

  fn run_interactive(&self, action: &str, args: &[&str]) -> Result<()> {
    let invocation = Invocation::new(Tool::Gh, self.program, self.cwd, args.iter().copied()).interactive();
    let output = self.spawn(&invocation)?;
    if output.succeeded() {
      Ok(())
    } else {
      Err(SprigError::step(format!("could not {action}")).with_details(format!(
        "'{}' exited with {}",
        invocation.command_line(),
        output.code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
      )))
    }
  }

  /// First line of `gh --version`; fails when gh cannot be spawned.
  pub fn version(&self) -> Result<String> {
    let output = self.run_checked("query the GitHub CLI version", &["--version"])?;
    Ok(output.first_line().to_string())
  }

  pub fn is_authenticated(&self) -> Result<bool> {
    let output = self.run(&["auth", "status", "--hostname", self.hostname])?;
    debug!(host = self.hostname, authenticated = output.succeeded(), "gh auth status");
    Ok(output.succeeded())
  }

  pub fn logout(&self) -> Result<()> {
    self
      .run_checked(
        &format!("log out of {}", self.hostname),
        &["auth", "logout", "--hostname", self.hostname],
      )
      .map(drop)
  }

  pub fn login(&self) -> Result<()> {
    self.run_interactive(
      &format!("log in to {}", self.hostname),
      &["auth", "login", "--hostname", self.hostname],
    )
  }

  /// Ask gh to add OAuth scopes to the current session (interactive).
  pub fn refresh_scopes(&self, scopes: &[&str]) -> Result<()> {
    let scopes = scopes.join(",");
    self.run_interactive(
      &format!("grant the '{scopes}' scope"),
      &["auth", "refresh", "--hostname", self.hostname, "--scopes", &scopes],
    )
  }

  /// Login of the authenticated user.
  pub fn current_login(&self) -> Result<String> {
    let output = self.run_checked("look up the authenticated user", &["api", "user"])?;
    parse_json::<UserLogin>("gh api user", &output.stdout).map(|user| user.login)
  }

  /// Confirm that `login` exists, returning its canonical spelling.
  pub fn user_login(&self, login: &str) -> Result<String> {
    let output = self.run_checked(&format!("find user '{login}'"), &["api", &format!("users/{login}")])?;
    parse_json::<UserLogin>("gh api users", &output.stdout).map(|user| user.login)
  }

  /// Whether `login` is already a collaborator on `repo`.
  pub fn is_collaborator(&self, repo: &RepoIdentity, login: &str) -> Result<bool> {
    let endpoint = collaborator_endpoint(repo, login);
    match self.run_checked(&format!("check collaborator '{login}'"), &["api", &endpoint]) {
      Ok(_) => Ok(true),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
      Err(err) => Err(err),
    }
  }

  pub fn add_collaborator(&self, repo: &RepoIdentity, login: &str, permission: &str) -> Result<()> {
    let endpoint = collaborator_endpoint(repo, login);
    let permission = format!("permission={permission}");
    self
      .run_checked(
        &format!("add '{login}' to {repo}"),
        &["api", "--method", "PUT", &endpoint, "-f", &permission],
      )
      .map(drop)
  }

  pub fn remove_collaborator(&self, repo: &RepoIdentity, login: &str) -> Result<()> {
    let endpoint = collaborator_endpoint(repo, login);
    self
      .run_checked(
        &format!("remove '{login}' from {repo}"),
        &["api", "--method", "DELETE", &endpoint],
      )
      .map(drop)
  }

  /// Create `name` from the local working tree and push it.
  pub fn create_repo(&self, name: &str, visibility: Visibility, remote: &str) -> Result<()> {
    let visibility_flag = format!("--{visibility}");
    self
      .run_checked(
        &format!("create repository '{name}'"),
        &[
          "repo",
          "create",
          name,
          &visibility_flag,
          "--source",
          ".",
          "--remote",
          remote,
          "--push",
        ],
      )
      .map(drop)
  }

  pub fn delete_repo(&self, name: &str) -> Result<()> {
    self
      .run_checked(&format!("delete repository '{name}'"), &["repo", "delete", name, "--yes"])
      .map(drop)
  }

  pub fn list_repos(&self, owner: Option<&str>, limit: u32) -> Result<Vec<RepoSummary>> {
    let limit = limit.to_string();
    let mut args = vec!["repo", "list"];
    if let Some(owner) = owner {
      args.push(owner);
    }
    args.extend(["--json", "name,visibility", "--limit", limit.as_str()]);

    let output = self.run_checked("list repositories", &args)?;
    parse_json("gh repo list", &output.stdout)
  }

  pub fn visibility(&self, repo: &RepoIdentity) -> Result<Visibility> {
    let full_name = repo.full_name();
    let output = self.run_checked(
      &format!("read the visibility of {repo}"),
      &["repo", "view", &full_name, "--json", "visibility"],
    )?;
    parse_json::<RepoVisibility>("gh repo view", &output.stdout).map(|view| view.visibility)
  }

  pub fn set_visibility(&self, repo: &RepoIdentity, visibility: Visibility) -> Result<()> {
    let full_name = repo.full_name();
    self
      .run_checked(
        &format!("make {repo} {visibility}"),
        &[
          "repo",
          "edit",
          &full_name,
          "--visibility",
          visibility.as_str(),
          "--accept-visibility-change-consequences",
        ],
      )
      .map(drop)
  }

  pub fn set_default_branch(&self, repo: &RepoIdentity, branch: &str) -> Result<()> {
    let full_name = repo.full_name();
    self
      .run_checked(
        &format!("set the default branch of {repo} to '{branch}'"),
        &["repo", "edit", &full_name, "--default-branch", branch],
      )
      .map(drop)
  }
}

fn collaborator_endpoint(repo: &RepoIdentity, login: &str) -> String {
  format!("repos/{}/{}/collaborators/{login}", repo.owner, repo.name)
}

fn parse_json<T: serde::de::DeserializeOwned>(source: &str, text: &str) -> Result<T> {
  serde_json::from_str(text)
    .map_err(|e| SprigError::step(format!("unexpected output from '{source}'")).with_details(e.to_string()))
}
