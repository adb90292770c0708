//! # Medinx Architecture
//!
//! Medinx indexes files and folders by the typed metadata kept in side-car
//! documents, and answers queries such as `author=me rating>=4.5` over that
//! index. It is a library first; the `medinx` binary is one client of it.
//!
//! ## Data Flow
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Store (store.rs)                                             │
//! │  - Finds side-cars below a root, reads them, writes them back │
//! └───────────────────────────────────────────────────────────────┘
//!                              │ (path, raw text)
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Documents (document.rs, value.rs, timestamp.rs)              │
//! │  - Shape, names, value grammar, duplicates, homogeneity       │
//! └───────────────────────────────────────────────────────────────┘
//!                              │ (path, Document)
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Index (index.rs, registry.rs)                                │
//! │  - One variant per attribute across the whole index           │
//! │  - Filtered views share documents and registry                │
//! └───────────────────────────────────────────────────────────────┘
//!                              │ query text
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Query (predicate.rs, filter.rs)                              │
//! │  - Parse the whole query, then evaluate per entry             │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Edits go the other way: text from a user is read with [`codec`], applied
//! with [`index::MetadataIndex::set_attribute`] and persisted by [`store`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Everything except [`store`] and [`config`] works on in-memory text and
//! never touches the file system. No module writes to stdout/stderr or exits
//! the process; diagnostics go through `tracing`.
//!
//! ## Module Overview
//!
//! - [`value`]: The four value variants and their ordering
//! - [`timestamp`]: ISO-8601 parsing and rendering
//! - [`syntax`]: Attribute name and value grammars
//! - [`document`]: Side-car loading and validation
//! - [`registry`]: Attribute type registry
//! - [`predicate`]: Query language parser
//! - [`filter`]: Predicate evaluation
//! - [`index`]: The metadata index and its views
//! - [`codec`]: Editable `[v1, v2]` text form
//! - [`store`]: Side-car scanning and writing
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod index;
pub mod predicate;
pub mod registry;
pub mod store;
pub mod syntax;
pub mod timestamp;
pub mod value;

pub use document::{load_document, Document};
pub use error::{MedinxError, Result};
pub use index::MetadataIndex;
pub use value::{Value, ValueList, Variant};
