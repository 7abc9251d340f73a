//! Tooling & Integration Layer
//!
//! Command-line front end over the listing codec, the walker, and the
//! reconciler.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
