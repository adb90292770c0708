//! Attribute type registry.
//!
//! One attribute holds one variant across a whole index. The registry records,
//! per attribute name, the variant fixed by the first non-empty value list
//! observed. An attribute only ever seen with empty lists is registered with
//! an unknown variant (`None`) until a value arrives.

use std::collections::BTreeMap;
use std::path::Path;

use crate::document::Document;
use crate::error::{MedinxError, Result};
use crate::value::{common_variant, Value, Variant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeMap<String, Option<Variant>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a registry from every entry, failing on the first attribute
    /// whose variant disagrees with the registered one.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a Path, &'a Document)>,
    {
        let mut registry = Self::new();
        for (path, document) in entries {
            for (attribute, values) in document.iter() {
                registry.observe(path, attribute, values)?;
            }
        }
        for attribute in registry.unknown() {
            tracing::warn!(%attribute, "attribute has no values anywhere in the index; its type is unknown");
        }
        Ok(registry)
    }

    /// Checks `values` of `attribute` found at `path` against the registry,
    /// registering the attribute when it has no variant yet.
    ///
    /// The caller guarantees `values` is homogeneous.
    pub fn observe(&mut self, path: &Path, attribute: &str, values: &[Value]) -> Result<()> {
        let found = values.first().map(Value::variant);
        self.check(path, attribute, found)?;
        self.register(attribute, found);
        Ok(())
    }

    /// Validates a replacement list without registering anything.
    ///
    /// Returns the variant of `values` (`None` when empty).
    pub fn check_values(
        &self,
        path: &Path,
        attribute: &str,
        values: &[Value],
    ) -> Result<Option<Variant>> {
        let found = common_variant(values).map_err(|(first, other)| {
            MedinxError::TypeHomogeneity {
                attribute: attribute.to_string(),
                first,
                other,
            }
        })?;
        self.check(path, attribute, found)?;
        Ok(found)
    }

    fn check(&self, path: &Path, attribute: &str, found: Option<Variant>) -> Result<()> {
        match (self.variant(attribute), found) {
            (Some(registered), Some(found)) if registered != found => {
                Err(MedinxError::TypeConsistency {
                    attribute: attribute.to_string(),
                    path: path.to_path_buf(),
                    registered,
                    found,
                })
            }
            _ => Ok(()),
        }
    }

    /// Records `attribute`. A known variant is never replaced.
    pub fn register(&mut self, attribute: &str, variant: Option<Variant>) {
        match self.types.get_mut(attribute) {
            Some(slot) => {
                if slot.is_none() && variant.is_some() {
                    tracing::debug!(%attribute, ?variant, "registering attribute type");
                    *slot = variant;
                }
            }
            None => {
                tracing::debug!(%attribute, ?variant, "registering attribute");
                self.types.insert(attribute.to_string(), variant);
            }
        }
    }

    /// The registered variant of `attribute`, if it is known.
    pub fn variant(&self, attribute: &str) -> Option<Variant> {
        self.types.get(attribute).copied().flatten()
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.types.contains_key(attribute)
    }

    /// Attribute names in sorted order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    pub fn types(&self) -> &BTreeMap<String, Option<Variant>> {
        &self.types
    }

    /// Attributes registered without a variant.
    pub fn unknown(&self) -> Vec<String> {
        self.types
            .iter()
            .filter(|(_, variant)| variant.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }
}
