use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "medinx",
    bin_name = "medinx",
    version,
    disable_help_subcommand = true,
    after_help = "Query syntax:\n  author=me rating>=4.5 !draft\n  attribute predicates: ATTR OP VALUE, OP one of = != < > <= >=\n  value predicates: VALUE or !VALUE, matched against text values"
)]
#[command(about = "Index files and folders by their side-car metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root folder of the indexed tree
    #[arg(long, global = true, default_value = ".", help_heading = "Options")]
    pub root: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List indexed paths matching a query
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Query predicates; no predicate lists everything
        query: Vec<String>,
    },

    /// Show the metadata of one path
    #[command(display_order = 2)]
    Show {
        /// Path relative to the root
        path: PathBuf,
    },

    /// List every attribute with its type
    #[command(display_order = 3)]
    Attrs,

    /// Replace the values of one attribute
    #[command(display_order = 4)]
    Set {
        /// Path relative to the root
        path: PathBuf,

        /// Attribute name
        attribute: String,

        /// Values, e.g. "[nobody, them]" or "[]"
        values: String,
    },

    /// Validate every side-car and report all problems
    #[command(display_order = 5)]
    Check,
}
