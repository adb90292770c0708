//! # Metadata Index
//!
//! A [`MetadataIndex`] is an insertion-ordered list of `(path, document)`
//! entries plus the [`TypeRegistry`] derived from them.
//!
//! ## Views Share Documents
//!
//! [`MetadataIndex::filter`] returns a new index over the matching entries.
//! The new index holds the *same* documents, not copies, and the same
//! registry:
//!
//! ```text
//! index ──┬── a.doc ──► Document ◄──┬── view (author=me)
//!         ├── b.doc ──► Document    │
//!         └── c.doc ──► Document ◄──┘
//! ```
//!
//! An edit made through any view is visible through every other view holding
//! that document, and the one-type-per-attribute rule is enforced against the
//! whole index, not only the view.
//!
//! Everything here is single-threaded: documents are shared through
//! `Rc<RefCell<_>>`, and callers serialize access to an index.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::document::{load_document, Document};
use crate::error::{MedinxError, Result};
use crate::filter::matches_all;
use crate::predicate::parse_query;
use crate::registry::TypeRegistry;
use crate::syntax::{validate_attribute_name, validate_value_literal};
use crate::value::{Value, ValueList, Variant};

/// A document shared between an index and its filtered views.
pub type SharedDocument = Rc<RefCell<Document>>;

/// One indexed path and its metadata.
///
/// The path names the described file or folder, not its side-car.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub path: PathBuf,
    pub document: SharedDocument,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: Vec<IndexEntry>,
    registry: Rc<RefCell<TypeRegistry>>,
}

impl MetadataIndex {
    /// Builds an index, deriving the type registry from every entry.
    pub fn build(entries: Vec<(PathBuf, Document)>) -> Result<Self> {
        let registry = TypeRegistry::from_entries(
            entries
                .iter()
                .map(|(path, document)| (path.as_path(), document)),
        )?;
        let entries = entries
            .into_iter()
            .map(|(path, document)| IndexEntry {
                path,
                document: Rc::new(RefCell::new(document)),
            })
            .collect();
        Ok(Self {
            entries,
            registry: Rc::new(RefCell::new(registry)),
        })
    }

    /// Loads every `(path, raw text)` pair and builds the index.
    ///
    /// A load failure is reported with the path it came from.
    pub fn from_sources<I, P, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let entries = sources
            .into_iter()
            .map(|(path, raw)| {
                let path = path.into();
                match load_document(raw.as_ref()) {
                    Ok(document) => Ok((path, document)),
                    Err(e) => Err(MedinxError::InvalidDocument {
                        path,
                        source: Box::new(e),
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Self::build(entries)
    }

    /// Returns a view over the entries satisfying every predicate of `query`.
    ///
    /// The query is parsed before any entry is looked at; a malformed query
    /// fails with [`MedinxError::PredicateFormat`] and yields no view.
    pub fn filter(&self, query: &str) -> Result<MetadataIndex> {
        let predicates = parse_query(query)?;

        let entries = self
            .entries
            .iter()
            .filter(|entry| {
                let matched = matches_all(&predicates, &entry.document.borrow());
                tracing::debug!(path = %entry.path.display(), matched, "scanned entry");
                matched
            })
            .cloned()
            .collect();

        Ok(Self {
            entries,
            registry: Rc::clone(&self.registry),
        })
    }

    /// Indexed paths, in insertion order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    /// A snapshot of the metadata of `path`; empty when `path` is not indexed.
    pub fn metadata(&self, path: impl AsRef<Path>) -> Document {
        self.document(path)
            .map(|document| document.borrow().clone())
            .unwrap_or_default()
    }

    /// The shared document of `path` (first match).
    pub fn document(&self, path: impl AsRef<Path>) -> Option<SharedDocument> {
        let path = path.as_ref();
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| Rc::clone(&entry.document))
    }

    /// Every registered attribute name, sorted.
    pub fn attribute_names(&self) -> Vec<String> {
        self.registry.borrow().attribute_names()
    }

    /// Registered variant of every attribute; `None` when still unknown.
    pub fn attribute_types(&self) -> BTreeMap<String, Option<Variant>> {
        self.registry.borrow().types().clone()
    }

    /// Registered variant of one attribute.
    pub fn attribute_type(&self, attribute: &str) -> Option<Variant> {
        self.registry.borrow().variant(attribute)
    }

    /// Attributes whose variant is still unknown.
    pub fn unknown_attributes(&self) -> Vec<String> {
        self.registry.borrow().unknown()
    }

    /// Replaces the values of `attribute` in the document of `path`.
    ///
    /// Fails, without touching the document, when:
    /// - `path` is not indexed ([`MedinxError::NotFound`])
    /// - `attribute` is not a valid name
    /// - `values` mix variants ([`MedinxError::TypeHomogeneity`])
    /// - `values` disagree with the registered variant
    ///   ([`MedinxError::TypeConsistency`])
    /// - a text value does not follow the value grammar, or a number is not
    ///   finite ([`MedinxError::ValueFormat`])
    ///
    /// A new attribute is registered with the variant of `values`.
    pub fn set_attribute(
        &self,
        path: impl AsRef<Path>,
        attribute: &str,
        values: ValueList,
    ) -> Result<()> {
        let path = path.as_ref();
        let document = self
            .document(path)
            .ok_or_else(|| MedinxError::NotFound(path.to_path_buf()))?;

        if validate_attribute_name(attribute).is_err() {
            return Err(MedinxError::AttributeFormat(attribute.to_string()));
        }

        let mut registry = self.registry.borrow_mut();
        let variant = registry.check_values(path, attribute, &values)?;
        for value in &values {
            validate_storable(value)?;
        }

        registry.register(attribute, variant);
        tracing::debug!(path = %path.display(), %attribute, count = values.len(), "setting attribute");
        document.borrow_mut().set(attribute, values);
        Ok(())
    }

    /// Attribute names used by this view's documents that start with `prefix`.
    pub fn complete_attributes(&self, prefix: &str) -> Vec<String> {
        let mut names = BTreeSet::new();
        for entry in &self.entries {
            let document = entry.document.borrow();
            names.extend(
                document
                    .attribute_names()
                    .filter(|name| name.starts_with(prefix))
                    .map(str::to_string),
            );
        }
        names.into_iter().collect()
    }

    /// Displayed values in this view that start with `prefix`, sorted and
    /// without repeats. With `attribute`, only that attribute is searched.
    pub fn complete_values(&self, prefix: &str, attribute: Option<&str>) -> Vec<String> {
        let mut found = BTreeSet::new();
        for entry in &self.entries {
            let document = entry.document.borrow();
            for (name, values) in document.iter() {
                if attribute.map_or(false, |wanted| wanted != name) {
                    continue;
                }
                found.extend(
                    values
                        .iter()
                        .map(Value::to_string)
                        .filter(|shown| shown.starts_with(prefix)),
                );
            }
        }
        found.into_iter().collect()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values must be loadable again once written: text follows the value
/// grammar without a `#` marker, and numbers are finite.
fn validate_storable(value: &Value) -> Result<()> {
    match value {
        Value::Text(text) if text.starts_with('#') || validate_value_literal(text).is_err() => {
            Err(MedinxError::ValueFormat(text.clone()))
        }
        Value::Number(n) if !n.is_finite() => Err(MedinxError::ValueFormat(n.to_string())),
        _ => Ok(()),
    }
}
