//! # Error Kinds
//!
//! Every failure an operation can surface is a [`SprigError`] tagged with an
//! [`ErrorKind`]. Callers branch on the kind instead of parsing message text,
//! and the CLI maps each kind to a distinct process exit code.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error};

use crate::output::{print_error, print_info};

/// Category of a failed or aborted operation, ordered as the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// A required argument was missing, empty, or malformed.
  Validation,
  /// A required tool is missing or the directory is not a working tree.
  Environment,
  /// The hosted service reports no authenticated session.
  Authentication,
  /// The owner/name pair could not be derived from the remote URL.
  Identity,
  /// An external command exited unsuccessfully.
  Step,
  /// The hosted service answered 404 for the target.
  NotFound,
  /// The hosted service answered 422, or the target already exists.
  Conflict,
  /// The hosted service refused the action (401/403).
  PermissionDenied,
  /// The user declined a confirmation prompt.
  Cancelled,
}

impl ErrorKind {
  /// Process exit code used when this kind terminates the program.
  pub const fn exit_code(self) -> i32 {
    match self {
      Self::Validation => 2,
      Self::Environment => 3,
      Self::Authentication => 4,
      Self::Identity => 5,
      Self::Step => 6,
      Self::NotFound => 7,
      Self::Conflict => 8,
      Self::PermissionDenied => 9,
      Self::Cancelled => 10,
    }
  }

  /// Short human label for the kind.
  pub const fn label(self) -> &'static str {
    match self {
      Self::Validation => "validation error",
      Self::Environment => "environment error",
      Self::Authentication => "authentication error",
      Self::Identity => "identity-resolution error",
      Self::Step => "command failed",
      Self::NotFound => "not found",
      Self::Conflict => "conflict",
      Self::PermissionDenied => "permission denied",
      Self::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A classified failure with an optional detail block (usually the captured
/// output of the command that failed).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SprigError {
  kind: ErrorKind,
  message: String,
  details: Option<String>,
}

pub type Result<T, E = SprigError> = std::result::Result<T, E>;

impl SprigError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      details: None,
    }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Validation, message)
  }

  pub fn environment(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Environment, message)
  }

  pub fn authentication(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Authentication, message)
  }

  pub fn identity(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Identity, message)
  }

  pub fn step(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Step, message)
  }

  pub fn cancelled(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Cancelled, message)
  }

  /// Attach detail text. Blank details are dropped.
  pub fn with_details(mut self, details: impl Into<String>) -> Self {
    let details = details.into();
    let trimmed = details.trim();
    if !trimmed.is_empty() {
      self.details = Some(trimmed.to_string());
    }
    self
  }

  pub const fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn details(&self) -> Option<&str> {
    self.details.as_deref()
  }

  pub const fn exit_code(&self) -> i32 {
    self.kind.exit_code()
  }

  /// Print the error and its details to the terminal.
  pub fn display(&self) {
    error!(kind = ?self.kind, message = %self.message, "operation failed");

    print_error(&format!("{}: {}", capitalize(self.kind.label()), self.message));

    if let Some(details) = &self.details {
      debug!("Error details: {}", details);
      print_info(&format!("Details: {details}"));
    }
  }
}

fn capitalize(label: &str) -> String {
  let mut chars = label.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Reject a missing or blank argument before anything else runs.
pub fn require_arg<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
  match value.map(str::trim) {
    Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
    _ => Err(SprigError::validation(format!("{name} is required"))),
  }
}
