//! Lexical rules shared by side-car documents and queries.
//!
//! Attribute names:
//! - Unicode word characters only (letters, digits, underscore)
//! - Must not start with a digit
//!
//! Value literals:
//! - An optional leading `#` (marks a timestamp payload)
//! - Then one or more of `A-Z a-z 0-9 _ + - : . @`

/// Validates an attribute name.
///
/// # Examples
/// ```
/// use medinx::syntax::validate_attribute_name;
///
/// assert!(validate_attribute_name("author").is_ok());
/// assert!(validate_attribute_name("_private").is_ok());
/// assert!(validate_attribute_name("année").is_ok());
///
/// assert!(validate_attribute_name("").is_err());
/// assert!(validate_attribute_name("2nd").is_err());
/// assert!(validate_attribute_name("doc-type").is_err());
/// ```
pub fn validate_attribute_name(name: &str) -> Result<(), SyntaxError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(SyntaxError::Empty);
    };
    if !is_attribute_start(first) {
        return Err(SyntaxError::InvalidStart(first));
    }
    match chars.find(|ch| !is_word_char(*ch)) {
        Some(ch) => Err(SyntaxError::InvalidCharacter(ch)),
        None => Ok(()),
    }
}

/// Validates a raw value literal, including the optional `#` marker.
pub fn validate_value_literal(literal: &str) -> Result<(), SyntaxError> {
    let body = literal.strip_prefix('#').unwrap_or(literal);
    if body.is_empty() {
        return Err(SyntaxError::Empty);
    }
    match body.chars().find(|ch| !is_value_char(*ch)) {
        Some(ch) => Err(SyntaxError::InvalidCharacter(ch)),
        None => Ok(()),
    }
}

pub fn is_attribute_name(name: &str) -> bool {
    validate_attribute_name(name).is_ok()
}

pub fn is_value_literal(literal: &str) -> bool {
    validate_value_literal(literal).is_ok()
}

/// A word character that may open an attribute name.
pub(crate) fn is_attribute_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub(crate) fn is_value_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-' | ':' | '.' | '@')
}

/// Error type for lexical validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Nothing to validate
    Empty,
    /// Attribute name starts with a character that is not a letter or underscore
    InvalidStart(char),
    /// A character outside the allowed set
    InvalidCharacter(char),
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::Empty => write!(f, "cannot be empty"),
            SyntaxError::InvalidStart(ch) => {
                write!(f, "must start with a letter or underscore, found '{}'", ch)
            }
            SyntaxError::InvalidCharacter(ch) => write!(f, "contains invalid character '{}'", ch),
        }
    }
}

impl std::error::Error for SyntaxError {}
