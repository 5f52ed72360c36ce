//! Constants shared across sprig
//!
//! Environment variable names, executable names, and the default values used
//! when no configuration file overrides them.

/// Platform-specific Git executable name
#[cfg(windows)]
pub const GIT_EXECUTABLE: &str = "git.exe";

/// Platform-specific Git executable name
#[cfg(not(windows))]
pub const GIT_EXECUTABLE: &str = "git";

/// Platform-specific GitHub CLI executable name
#[cfg(windows)]
pub const GH_EXECUTABLE: &str = "gh.exe";

/// Platform-specific GitHub CLI executable name
#[cfg(not(windows))]
pub const GH_EXECUTABLE: &str = "gh";

/// Environment variable overriding the git executable
pub const ENV_GIT: &str = "SPRIG_GIT";

/// Environment variable overriding the gh executable
pub const ENV_GH: &str = "SPRIG_GH";

/// Environment variable overriding the remote name
pub const ENV_REMOTE: &str = "SPRIG_REMOTE";

/// Environment variable overriding the GitHub hostname
pub const ENV_HOSTNAME: &str = "SPRIG_HOSTNAME";

pub const DEFAULT_REMOTE: &str = "origin";

pub const DEFAULT_HOSTNAME: &str = "github.com";

pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Directory holding a working tree's repository metadata
pub const GIT_METADATA_DIR: &str = ".git";

/// Exit code `gh` uses when the command requires authentication
pub const GH_EXIT_AUTH_REQUIRED: i32 = 4;

/// OAuth scope `gh` needs before it may delete a repository
pub const DELETE_REPO_SCOPE: &str = "delete_repo";

/// Literal the user must type to confirm a destructive operation
pub const CONFIRMATION_WORD: &str = "yes";
