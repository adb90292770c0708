//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Uses `std::process::exit`
//! - Installs a log subscriber
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Load configuration and open the side-car store
//! 3. **Dispatch**: Route commands to handlers
//! 4. **Error Handling**: Errors bubble up to `main`, which prints them and exits 1

use std::path::{Component, Path, PathBuf};

use clap::Parser;
use medinx::codec::{infer_variant, unformat_values};
use medinx::config::MedinxConfig;
use medinx::store::SidecarStore;
use medinx::{MedinxError, Result, Variant};
use tracing_subscriber::EnvFilter;

use super::print::{
    print_hint, print_success, render_attribute_types, render_document, render_files,
    render_problems,
};
use super::setup::{Cli, Commands};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = MedinxConfig::load(&cli.root)?;
    let store = SidecarStore::from_config(&cli.root, &config);

    match cli.command {
        Commands::List { query } => handle_list(&store, &query),
        Commands::Show { path } => handle_show(&store, &path),
        Commands::Attrs => handle_attrs(&store),
        Commands::Set {
            path,
            attribute,
            values,
        } => handle_set(&store, &path, &attribute, &values),
        Commands::Check => handle_check(&store),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_list(store: &SidecarStore, query: &[String]) -> Result<()> {
    let index = store.load_index()?;
    let view = index.filter(&query.join(" "))?;
    print!("{}", render_files(&view.files()));
    Ok(())
}

fn handle_show(store: &SidecarStore, path: &Path) -> Result<()> {
    let index = store.load_index()?;
    let path = normalize(path);
    let document = index
        .document(&path)
        .ok_or_else(|| MedinxError::NotFound(path.clone()))?;
    print!("{}", render_document(&path, &document.borrow()));
    Ok(())
}

fn handle_attrs(store: &SidecarStore) -> Result<()> {
    let index = store.load_index()?;
    let types = index.attribute_types();
    if types.is_empty() {
        print_hint("No attributes found.");
        return Ok(());
    }
    print!("{}", render_attribute_types(&types));
    Ok(())
}

fn handle_set(store: &SidecarStore, path: &Path, attribute: &str, text: &str) -> Result<()> {
    let index = store.load_index()?;
    let path = normalize(path);

    let variant = match index.attribute_type(attribute) {
        Some(variant) => variant,
        None => infer_variant(text)?.unwrap_or(Variant::Text),
    };
    let values = unformat_values(text, variant)?;
    index.set_attribute(&path, attribute, values)?;

    if let Some(document) = index.document(&path) {
        store.write(&path, &document.borrow())?;
    }
    print_success(&format!("Updated {} of {}", attribute, path.display()));
    Ok(())
}

fn handle_check(store: &SidecarStore) -> Result<()> {
    let problems = store.validate()?;
    if problems.is_empty() {
        print_success("All side-cars are valid.");
        return Ok(());
    }
    print!("{}", render_problems(&problems));
    std::process::exit(1);
}

/// Index paths are relative to the root and never start with `./`.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
