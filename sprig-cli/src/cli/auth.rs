//! # Auth Command
//!
//! `reauth`: log out of GitHub and optionally back in.

use anyhow::Result;
use sprig_core::ops;

use crate::session::with_context;

pub(crate) fn handle_reauth() -> Result<()> {
  with_context(ops::reauthenticate).map(drop)
}
