//! relbump command line library.
//!
//! The binary in `main.rs` only parses arguments, installs logging and
//! prints; [`release::execute_release`] does the work.

#![warn(missing_docs)]

pub mod cli;
pub mod release;

pub use cli::Cli;
pub use release::{ReleaseOutcome, execute_release};
