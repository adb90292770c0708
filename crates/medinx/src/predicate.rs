//! # Query Language
//!
//! A query is a conjunction of predicates separated by single spaces:
//!
//! ```text
//! author=me doctype=letter rating>=4.5 !draft
//! ```
//!
//! ## Grammar
//!
//! ```text
//! query           := "" | predicate (" " predicate)*
//! predicate       := attr_predicate | value_predicate
//! attr_predicate  := ATTR OP VALUE        OP in = != > < >= <=
//! value_predicate := ["!"] VALUE
//! ATTR            := letter or "_", then word characters
//! VALUE           := ["#"] [A-Za-z0-9_+-:.@]+
//! ```
//!
//! A token that does not match, or any stray space, rejects the whole query.
//! Parsing is done once, up front, so a bad query never yields a partial
//! result.
//!
//! ## Predicates
//!
//! - [`Predicate::Attribute`]: compares the values of one attribute with a
//!   literal, e.g. `rating<5`.
//! - [`Predicate::Value`]: looks for a literal among the text values of every
//!   attribute, e.g. `specification`. With `!`, the literal must appear in no
//!   text value.

use std::fmt;
use std::str::FromStr;

use crate::error::{MedinxError, Result};
use crate::syntax::{is_attribute_start, is_word_char, validate_value_literal};

/// Comparison operator of an attribute predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    /// Reads the operator at the start of `text`, returning it with the
    /// remaining text. Two-character operators win over their prefixes.
    fn split_prefix(text: &str) -> Option<(Operator, &str)> {
        const OPERATORS: [(&str, Operator); 6] = [
            ("!=", Operator::Ne),
            (">=", Operator::Ge),
            ("<=", Operator::Le),
            ("=", Operator::Eq),
            ("<", Operator::Lt),
            (">", Operator::Gt),
        ];
        OPERATORS
            .iter()
            .find_map(|(token, op)| text.strip_prefix(token).map(|rest| (*op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic condition of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `attribute op literal`
    Attribute {
        attribute: String,
        op: Operator,
        literal: String,
    },
    /// `[!]literal`, matched against text values of any attribute
    Value { negated: bool, literal: String },
}

impl Predicate {
    pub fn attribute(attribute: impl Into<String>, op: Operator, literal: impl Into<String>) -> Self {
        Predicate::Attribute {
            attribute: attribute.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn value(literal: impl Into<String>) -> Self {
        Predicate::Value {
            negated: false,
            literal: literal.into(),
        }
    }

    pub fn not_value(literal: impl Into<String>) -> Self {
        Predicate::Value {
            negated: true,
            literal: literal.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Attribute {
                attribute,
                op,
                literal,
            } => write!(f, "{}{}{}", attribute, op, literal),
            Predicate::Value { negated, literal } => {
                write!(f, "{}{}", if *negated { "!" } else { "" }, literal)
            }
        }
    }
}

impl FromStr for Predicate {
    type Err = MedinxError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = || MedinxError::PredicateFormat(token.to_string());

        // Attribute-bound: an identifier immediately followed by an operator
        let name_len = attribute_prefix_len(token);
        if name_len > 0 {
            if let Some((op, literal)) = Operator::split_prefix(&token[name_len..]) {
                validate_value_literal(literal).map_err(|_| invalid())?;
                return Ok(Predicate::attribute(&token[..name_len], op, literal));
            }
        }

        let (negated, literal) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        validate_value_literal(literal).map_err(|_| invalid())?;
        Ok(Predicate::Value {
            negated,
            literal: literal.to_string(),
        })
    }
}

/// Byte length of the attribute name opening `token`, 0 if there is none.
fn attribute_prefix_len(token: &str) -> usize {
    let mut chars = token.char_indices();
    match chars.next() {
        Some((_, first)) if is_attribute_start(first) => {}
        _ => return 0,
    }
    chars
        .find(|(_, ch)| !is_word_char(*ch))
        .map(|(pos, _)| pos)
        .unwrap_or(token.len())
}

/// Parses a whole query into its predicates, in query order.
///
/// The empty query is the empty conjunction.
pub fn parse_query(query: &str) -> Result<Vec<Predicate>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    query
        .split(' ')
        .map(|token| {
            if token.is_empty() {
                Err(MedinxError::PredicateFormat(format!(
                    "unexpected space in \"{}\"",
                    query
                )))
            } else {
                token.parse()
            }
        })
        .collect()
}
