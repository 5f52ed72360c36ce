//! Test utilities shared across the sprig workspace
//!
//! - Throwaway git repositories ([`GitRepoTestGuard`])
//! - Isolated XDG/HOME directories for spawned binaries ([`XdgSandbox`])
//!
//! The dead_code lint is disabled for this crate because not every test
//! binary uses every helper.

#![allow(dead_code)]

pub mod env;
pub mod git;

pub use env::XdgSandbox;
pub use git::{GitRepoTestGuard, branch_names, checkout_branch, create_branch, create_commit};
