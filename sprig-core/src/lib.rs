//! # Sprig Core Library
//!
//! Everything sprig does short of parsing command lines: the error kinds, the
//! command runner and prompt capabilities, thin `git`/`gh` facades, remote
//! identity parsing, configuration, and the operations built on top of them.

pub mod config;
pub mod consts;
pub mod context;
pub mod error;
pub mod exec;
pub mod gh;
pub mod git;
pub mod identity;
pub mod ops;
pub mod output;
pub mod prompts;
pub mod testing;

pub use config::{ConfigDirs, Settings, get_config_dirs};
pub use context::ExecutionContext;
pub use error::{ErrorKind, Result, SprigError};
pub use exec::{CommandOutput, CommandRunner, Invocation, SystemRunner, Tool};
pub use gh::Visibility;
pub use identity::RepoIdentity;
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use prompts::{Prompter, TerminalPrompter};
