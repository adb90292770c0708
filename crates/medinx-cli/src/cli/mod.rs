//! # CLI Behavior
//!
//! This is **one possible UI client** for medinx, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, log
//! output and output formatting.
//!
//! For the overall architecture, see the crate-level documentation of `medinx`.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling constants

mod commands;
mod print;
pub mod setup;
mod styles;

pub use commands::run;
