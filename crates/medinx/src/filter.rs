//! Predicate evaluation against a single document.
//!
//! An attribute predicate holds when *any* value of the attribute compares
//! true against the literal; the literal is read in the variant of the
//! attribute's first value. A value predicate holds when any text value of
//! the document equals the literal (or, negated, when none does).

use std::cmp::Ordering;

use crate::document::Document;
use crate::predicate::{Operator, Predicate};
use crate::value::Value;

impl Operator {
    /// Applies the operator to `value` (left) and `literal` (right).
    pub fn holds(&self, value: &Value, literal: &Value) -> bool {
        match self {
            Operator::Eq => value == literal,
            Operator::Ne => value != literal,
            Operator::Lt => value.compare(literal) == Some(Ordering::Less),
            Operator::Gt => value.compare(literal) == Some(Ordering::Greater),
            Operator::Le => matches!(
                value.compare(literal),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Ge => matches!(
                value.compare(literal),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl Predicate {
    /// Check if this predicate is satisfied by `document`.
    ///
    /// Returns `false` if the attribute doesn't exist, its list is empty, or
    /// the literal has no reading in the attribute's variant.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Predicate::Attribute {
                attribute,
                op,
                literal,
            } => {
                let Some(values) = document.get(attribute) else {
                    return false;
                };
                let Some(first) = values.first() else {
                    return false;
                };
                let Some(literal) = Value::from_literal(literal, first.variant()) else {
                    tracing::debug!(%attribute, %literal, variant = %first.variant(), "literal has no reading in attribute type");
                    return false;
                };
                values.iter().any(|value| op.holds(value, &literal))
            }
            Predicate::Value { negated, literal } => {
                let found = document
                    .iter()
                    .flat_map(|(_, values)| values.iter())
                    .any(|value| value.as_text() == Some(literal.as_str()));
                found != *negated
            }
        }
    }
}

/// Check if every predicate is satisfied, stopping at the first failure.
pub fn matches_all(predicates: &[Predicate], document: &Document) -> bool {
    predicates.iter().all(|predicate| {
        let matched = predicate.matches(document);
        tracing::trace!(%predicate, matched, "predicate evaluated");
        matched
    })
}
