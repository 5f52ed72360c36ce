//! # Output Formatting
//!
//! Provides formatted output functions with colors, emojis, and consistent
//! styling for user-facing messages and terminal output.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply the mode as a global override for `owo-colors`.
  pub fn apply(self) {
    match self {
      Self::Always | Self::Yes => owo_colors::set_override(true),
      Self::Never | Self::No => owo_colors::set_override(false),
      // Leave terminal auto-detection in charge
      Self::Auto => {}
    }
  }
}

/// Clap help styling shared by every sprig binary.
pub fn cli_styles() -> Styles {
  Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format a filesystem path
pub fn format_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a repository name or `owner/name` pair
pub fn format_repo_name(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format a branch name
pub fn format_branch(name: &str) -> String {
  name.magenta().bold().to_string()
}

/// Format a GitHub login
pub fn format_user(login: &str) -> String {
  login.cyan().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

/// Format a repository visibility label
pub fn format_visibility(visibility: &str) -> String {
  match visibility.to_ascii_lowercase().as_str() {
    "public" => visibility.green().to_string(),
    "private" => visibility.yellow().to_string(),
    "internal" => visibility.blue().to_string(),
    _ => visibility.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    let result = get_emoji_or_default("check_mark", "✓");
    assert!(!result.is_empty());

    let result = get_emoji_or_default("nonexistent_emoji", "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  fn test_format_functions() {
    assert!(format_path("/tmp/widgets").contains("/tmp/widgets"));
    assert!(format_repo_name("acme/widgets").contains("acme/widgets"));
    assert!(format_branch("feature/login").contains("feature/login"));
    assert!(format_user("octocat").contains("octocat"));
    assert!(format_command("gh auth login").contains("gh auth login"));
  }

  #[test]
  fn test_visibility_formatting_keeps_text() {
    for label in ["public", "PRIVATE", "internal", "unknown"] {
      assert!(format_visibility(label).contains(label));
    }
  }
}
