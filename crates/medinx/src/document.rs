//! # Side-car Documents
//!
//! A side-car document is a flat JSON object mapping attribute names to arrays
//! of scalars:
//!
//! ```json
//! {
//!     "author": ["olivier_james", "paul_franklin"],
//!     "publication_date": ["#2015-03"],
//!     "reviewed": [false],
//!     "impact": [5.6]
//! }
//! ```
//!
//! ## Loading Pipeline
//!
//! [`load_document`] turns raw text into a typed [`Document`]:
//!
//! 1. **Shape**: the text must be a JSON object whose values are arrays of
//!    numbers, strings or booleans. Anything else fails immediately with a
//!    structural error.
//! 2. **Names**: every key must be a valid attribute name and appear once.
//!    Duplicates are detected on the raw key sequence, before any map exists.
//! 3. **Values**: strings must match the value grammar; a `#`-prefixed string
//!    must hold an ISO-8601 timestamp and becomes a `Timestamp`. Integers
//!    become floats.
//! 4. **Homogeneity**: all values of one attribute share a variant.
//!
//! Steps 2-4 collect every problem of the document. One problem is returned as
//! is; several are returned together as [`MedinxError::Aggregate`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{MedinxError, Result};
use crate::syntax::{validate_attribute_name, validate_value_literal};
use crate::timestamp::parse_timestamp;
use crate::value::{common_variant, Value, ValueList};

/// Typed metadata of one indexed path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    attributes: BTreeMap<String, ValueList>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str) -> Option<&ValueList> {
        self.attributes.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Replaces the values of `attribute`.
    ///
    /// No validation happens here; mutation of indexed documents goes through
    /// [`MetadataIndex::set_attribute`](crate::index::MetadataIndex::set_attribute).
    pub fn set(&mut self, attribute: impl Into<String>, values: ValueList) -> Option<ValueList> {
        self.attributes.insert(attribute.into(), values)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueList)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Serializes back to side-car text; [`load_document`] reads it back to
    /// an equal document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<K: Into<String>> FromIterator<(K, ValueList)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, ValueList)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Parses and validates side-car text.
pub fn load_document(raw: &str) -> Result<Document> {
    let raw: RawDocument =
        serde_json::from_str(raw).map_err(|e| MedinxError::Structural(e.to_string()))?;

    let mut errors = Vec::new();
    let mut attributes = BTreeMap::new();

    for (attribute, raw_values) in raw.entries {
        if let Err(e) = validate_attribute_name(&attribute) {
            tracing::debug!(%attribute, reason = %e, "rejecting attribute name");
            errors.push(MedinxError::AttributeFormat(attribute.clone()));
        }
        if attributes.contains_key(&attribute) {
            errors.push(MedinxError::DuplicateAttribute(attribute.clone()));
        }

        let mut values = Vec::with_capacity(raw_values.len());
        for raw_value in raw_values {
            match convert_scalar(raw_value) {
                Ok(value) => values.push(value),
                Err(e) => errors.push(e),
            }
        }

        if let Err((first, other)) = common_variant(&values) {
            errors.push(MedinxError::TypeHomogeneity {
                attribute: attribute.clone(),
                first,
                other,
            });
        }

        attributes.insert(attribute, values);
    }

    match MedinxError::from_errors(errors) {
        Some(err) => Err(err),
        None => Ok(Document { attributes }),
    }
}

fn convert_scalar(raw: RawScalar) -> Result<Value> {
    match raw {
        RawScalar::Number(n) => Ok(Value::Number(n)),
        RawScalar::Boolean(b) => Ok(Value::Boolean(b)),
        RawScalar::Text(s) => {
            if validate_value_literal(&s).is_err() {
                return Err(MedinxError::ValueFormat(s));
            }
            match s.strip_prefix('#') {
                Some(payload) => parse_timestamp(payload).map(Value::Timestamp),
                None => Ok(Value::Text(s)),
            }
        }
    }
}

/// A scalar as found in the raw text, before value validation.
#[derive(Debug)]
enum RawScalar {
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl RawScalar {
    fn from_json(attribute: &str, value: JsonValue) -> std::result::Result<Self, String> {
        match value {
            JsonValue::Bool(b) => Ok(RawScalar::Boolean(b)),
            JsonValue::String(s) => Ok(RawScalar::Text(s)),
            JsonValue::Number(n) => n
                .as_f64()
                .map(RawScalar::Number)
                .ok_or_else(|| format!("number out of range for attribute {}", attribute)),
            other => Err(format!(
                "attribute {} holds {} where only numbers, strings and booleans are allowed",
                attribute,
                json_kind(&other)
            )),
        }
    }
}

/// Key/array pairs in source order, duplicates included.
struct RawDocument {
    entries: Vec<(String, Vec<RawScalar>)>,
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawDocumentVisitor)
    }
}

struct RawDocumentVisitor;

impl<'de> Visitor<'de> for RawDocumentVisitor {
    type Value = RawDocument;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object mapping attribute names to arrays of scalars")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some((attribute, value)) = map.next_entry::<String, JsonValue>()? {
            let JsonValue::Array(items) = value else {
                return Err(de::Error::custom(format!(
                    "attribute {} must hold an array, found {}",
                    attribute,
                    json_kind(&value)
                )));
            };
            let scalars = items
                .into_iter()
                .map(|item| RawScalar::from_json(&attribute, item))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(de::Error::custom)?;
            entries.push((attribute, scalars));
        }
        Ok(RawDocument { entries })
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
