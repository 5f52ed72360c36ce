//! # Sprig CLI Library
//!
//! The clap command tree and the handlers that translate parsed arguments
//! into `sprig_core` operations.

pub mod cli;
pub mod completion;
pub mod diagnostics;
pub mod session;
