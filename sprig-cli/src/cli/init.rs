//! # Init Command
//!
//! Writes the default configuration file.

use anyhow::Result;
use sprig_core::config::get_config_dirs;
use sprig_core::output::{format_path, print_info, print_success};

pub(crate) fn handle_init() -> Result<()> {
  let config_dirs = get_config_dirs()?;
  let path = config_dirs.config_path();

  if config_dirs.init()? {
    print_success(&format!(
      "Wrote default settings to {}",
      format_path(&path.display().to_string())
    ));
  } else {
    print_info(&format!(
      "Settings already exist at {}; left unchanged",
      format_path(&path.display().to_string())
    ));
  }
  Ok(())
}
