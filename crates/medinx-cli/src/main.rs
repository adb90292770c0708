//! # Medinx CLI
//!
//! The binary is thin: the CLI lives in `src/cli/`, and this file only invokes
//! `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/medinx/` - Core library: documents, registry, queries, side-car store
//! - `crates/medinx-cli/` - This CLI tool, depends on the `medinx` library
//!
//! ## Commands
//!
//! ```text
//! medinx [--root DIR] [-v] list [QUERY...]
//! medinx [--root DIR] [-v] show PATH
//! medinx [--root DIR] [-v] attrs
//! medinx [--root DIR] [-v] set PATH ATTRIBUTE VALUES
//! medinx [--root DIR] [-v] check
//! ```
//!
//! Query words are joined with single spaces, so `medinx list author=me
//! 'rating>=4'` runs the query `author=me rating>=4`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
