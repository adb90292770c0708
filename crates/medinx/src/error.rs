use std::path::PathBuf;

use thiserror::Error;

use crate::value::Variant;

#[derive(Error, Debug)]
pub enum MedinxError {
    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Invalid attribute name: \"{0}\"")]
    AttributeFormat(String),

    #[error("Duplicate attribute: \"{0}\"")]
    DuplicateAttribute(String),

    #[error("Invalid value: {0}")]
    ValueFormat(String),

    #[error("Value type is not homogeneous for attribute {attribute}: found {first} and {other}")]
    TypeHomogeneity {
        attribute: String,
        first: Variant,
        other: Variant,
    },

    #[error(
        "Inconsistent type for attribute {attribute} in {}: registered as {registered}, found {found}",
        .path.display()
    )]
    TypeConsistency {
        attribute: String,
        path: PathBuf,
        registered: Variant,
        found: Variant,
    },

    #[error("Invalid filter criteria: {0}")]
    PredicateFormat(String),

    #[error("Entry not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Errors in metadata content: {}", join_errors(.0))]
    Aggregate(Vec<MedinxError>),

    #[error("Invalid metadata file {}: {source}", .path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: Box<MedinxError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl MedinxError {
    /// Collapses the errors gathered while loading one document.
    ///
    /// No error gives `None`, a single error is returned as is, and two or
    /// more are wrapped in [`MedinxError::Aggregate`].
    pub fn from_errors(mut errors: Vec<MedinxError>) -> Option<MedinxError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(MedinxError::Aggregate(errors)),
        }
    }

    /// The individual errors carried by this error: the aggregated list, or
    /// the error itself.
    pub fn errors(&self) -> Vec<&MedinxError> {
        match self {
            MedinxError::Aggregate(errors) => errors.iter().collect(),
            MedinxError::InvalidDocument { source, .. } => source.errors(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[MedinxError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, MedinxError>;
