//! # Diagnostics
//!
//! Reports what sprig sees: tool versions, GitHub authentication, settings,
//! and the current working tree. Missing pieces are reported, never fatal.

use std::env;

use anyhow::Result;
use sprig_core::config::get_config_dirs;
use sprig_core::output::{
  format_command, format_path, format_repo_name, print_header, print_info, print_success, print_warning,
};
use sprig_core::{ExecutionContext, Settings};

use crate::session::Session;

/// Run all diagnostic checks
pub fn run_diagnostics() -> Result<()> {
  print_header("Sprig Diagnostics");

  let settings = load_settings();
  let cwd = env::current_dir()?;
  let session = Session::new(settings, cwd);
  let ctx = session.context();

  check_system_info(&ctx);
  check_configuration(session.settings());
  let gh_ok = check_tools(&ctx);
  if gh_ok {
    check_authentication(&ctx);
  }
  check_repository(&ctx);

  println!();
  print_success("Diagnostics complete!");
  Ok(())
}

fn load_settings() -> Settings {
  Settings::load().unwrap_or_else(|e| {
    print_warning(&format!("Could not load settings, using defaults: {e:#}"));
    Settings::default()
  })
}

fn check_system_info(ctx: &ExecutionContext<'_>) {
  print_header("System Information:");
  println!("  Operating System: {} ({})", env::consts::OS, env::consts::ARCH);
  println!(
    "  Current Directory: {}",
    format_path(&ctx.cwd().display().to_string())
  );
}

fn check_configuration(settings: &Settings) {
  print_header("Configuration:");

  match get_config_dirs() {
    Ok(dirs) => {
      let path = dirs.config_path();
      let state = if path.exists() { "" } else { " (not created yet)" };
      println!("  Settings File: {}{state}", format_path(&path.display().to_string()));
    }
    Err(e) => println!("  Settings File: Error - {e}"),
  }

  println!("  Remote: {}", settings.remote);
  println!("  Host: {}", settings.hostname);
  println!("  git executable: {}", settings.tools.git);
  println!("  gh executable: {}", settings.tools.gh);
}

/// Returns whether `gh` is usable.
fn check_tools(ctx: &ExecutionContext<'_>) -> bool {
  print_header("Tools:");

  match ctx.git().version() {
    Ok(version) => println!("  git: {version}"),
    Err(e) => print_warning(&format!("git: {}", e.message())),
  }

  match ctx.gh().version() {
    Ok(version) => {
      println!("  gh: {version}");
      true
    }
    Err(e) => {
      print_warning(&format!("gh: {}", e.message()));
      false
    }
  }
}

fn check_authentication(ctx: &ExecutionContext<'_>) {
  print_header("Authentication:");

  let host = &ctx.settings().hostname;
  match ctx.gh().is_authenticated() {
    Ok(true) => match ctx.gh().current_login() {
      Ok(login) => println!("  {host}: logged in as {login}"),
      Err(_) => println!("  {host}: logged in"),
    },
    Ok(false) => print_warning(&format!(
      "{host}: not logged in (run {})",
      format_command("sprig reauth")
    )),
    Err(e) => print_warning(&format!("{host}: {}", e.message())),
  }
}

fn check_repository(ctx: &ExecutionContext<'_>) {
  print_header("Repository:");

  let Some(root) = ctx.repo_root() else {
    print_info("Not inside a git working tree");
    return;
  };
  println!("  Working Tree: {}", format_path(&root.display().to_string()));

  match ctx.git().current_branch() {
    Ok(Some(branch)) => println!("  Branch: {branch}"),
    Ok(None) => println!("  Branch: (detached HEAD)"),
    Err(e) => print_warning(&format!("Branch: {}", e.message())),
  }

  match ctx.resolve_identity() {
    Ok(identity) => println!("  GitHub Repository: {}", format_repo_name(&identity.full_name())),
    Err(e) => print_warning(&format!("GitHub Repository: {}", e.message())),
  }
}
