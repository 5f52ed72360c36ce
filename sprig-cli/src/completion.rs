//! # Shell Completion
//!
//! Generates shell completion scripts for bash, zsh, fish, and PowerShell.

use std::io::Write;

use anyhow::Result;
use clap::{CommandFactory, ValueEnum};
use clap_complete::generate;

use crate::cli::Cli;

/// Shell with auto-generated completion script available.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
  /// Bourne Again `SHell` (bash)
  Bash,
  /// Friendly Interactive `SHell` (fish)
  Fish,
  /// `PowerShell`
  #[value(name = "powershell")]
  PowerShell,
  /// Z `SHell` (zsh)
  Zsh,
}

impl From<Shell> for clap_complete::Shell {
  fn from(shell: Shell) -> Self {
    match shell {
      Shell::Bash => Self::Bash,
      Shell::Fish => Self::Fish,
      Shell::PowerShell => Self::PowerShell,
      Shell::Zsh => Self::Zsh,
    }
  }
}

/// Write the completion script for `shell` to `out`.
pub fn generate_completions(shell: clap_complete::Shell, out: &mut dyn Write) -> Result<()> {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(shell, &mut cmd, app_name, out);

  Ok(())
}
