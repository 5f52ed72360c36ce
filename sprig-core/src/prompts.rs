//! # Prompts Module
//!
//! The [`Prompter`] capability is the only way operations ask the user
//! anything. The CLI supplies [`TerminalPrompter`]; tests supply a scripted
//! implementation.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{Result, SprigError};

/// Returns a custom dialoguer theme matching sprig's color palette.
///
/// Features:
/// - Cyan bold prompt text
/// - Green `❯` prefix on active item
/// - Green highlight on active item text
pub fn sprig_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    ..ColorfulTheme::default()
  }
}

/// Narrow interface for interactive questions.
pub trait Prompter {
  /// Ask a yes/no question.
  fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

  /// Ask for free text. An empty answer yields `default` when one is given.
  fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

  /// Pick one of `items`, returning its index.
  fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// Prompter backed by dialoguer on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
  fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&sprig_theme())
      .with_prompt(prompt)
      .default(default)
      .interact()
      .map_err(prompt_failed)
  }

  fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
    let theme = sprig_theme();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt).allow_empty(true);
    if let Some(default) = default {
      input = input.default(default.to_string());
    }
    let answer = input.interact_text().map_err(prompt_failed)?;

    match (answer.trim().is_empty(), default) {
      (true, Some(default)) => Ok(default.to_string()),
      _ => Ok(answer),
    }
  }

  fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
    Select::with_theme(&sprig_theme())
      .with_prompt(prompt)
      .items(items)
      .default(default)
      .interact()
      .map_err(prompt_failed)
  }
}

fn prompt_failed(err: dialoguer::Error) -> SprigError {
  SprigError::cancelled("no answer was given at the prompt").with_details(err.to_string())
}

/// Ask the user to type the confirmation word for a destructive action.
///
/// Only the exact literal counts; `y`, `YES`, or an empty answer decline.
pub fn confirm_destructive(prompter: &dyn Prompter, what: &str) -> Result<bool> {
  let answer = prompter.input(
    &format!(
      "{what} cannot be undone. Type '{}' to continue",
      crate::consts::CONFIRMATION_WORD
    ),
    None,
  )?;
  Ok(is_confirmation(&answer))
}

/// Exact-match check for the destructive confirmation word.
pub fn is_confirmation(answer: &str) -> bool {
  answer == crate::consts::CONFIRMATION_WORD
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test_case("yes", true ; "exact literal")]
  #[test_case("y", false ; "single letter")]
  #[test_case("YES", false ; "uppercase")]
  #[test_case("", false ; "empty")]
  #[test_case(" yes", false ; "leading space")]
  #[test_case("yes please", false ; "extra words")]
  fn confirmation_requires_exact_literal(answer: &str, expected: bool) {
    assert_eq!(is_confirmation(answer), expected);
  }
}
