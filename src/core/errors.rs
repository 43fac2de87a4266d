//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// A Swift type string the front end could not turn into a `SemanticType`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse type `{input}` at offset {offset}: {message}")]
pub struct TypeParseError {
    pub input: String,
    pub offset: usize,
    pub message: String,
}

impl TypeParseError {
    pub fn new(input: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            offset,
            message: message.into(),
        }
    }
}

/// Generator-time fault for one interface member.
///
/// Every variant names the offending member so that, in isolate mode, the
/// collected failures can be reported next to the partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A type cannot be represented or is not supported by the spy model
    #[error("unsupported type in `{member}`: {detail}")]
    UnsupportedType { member: String, detail: String },

    /// Function-level generic shadows an interface-level one
    #[error("generic parameter `{name}` of `{member}` collides with an interface-level generic parameter")]
    GenericNameCollision { member: String, name: String },

    /// Placeholder that the member does not declare
    #[error("`{member}` references undeclared generic placeholder `{name}`")]
    UnknownGenericPlaceholder { member: String, name: String },

    /// Two generated names inside one member block coincide
    #[error("`{member}` would generate the field `{field}` more than once")]
    DuplicateFieldName { member: String, field: String },

    /// Swift forbids setters on effectful subscripts
    #[error("`{member}` is async or throwing and therefore cannot be settable")]
    EffectfulSettableSubscript { member: String },

    /// Structural problems with the interface itself
    #[error("invalid interface: {0}")]
    InvalidInterface(String),
}

impl GenerationError {
    pub fn unsupported(member: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedType {
            member: member.into(),
            detail: detail.into(),
        }
    }

    /// Member the error refers to, if it is member specific.
    pub fn member(&self) -> Option<&str> {
        match self {
            Self::UnsupportedType { member, .. }
            | Self::GenericNameCollision { member, .. }
            | Self::UnknownGenericPlaceholder { member, .. }
            | Self::DuplicateFieldName { member, .. }
            | Self::EffectfulSettableSubscript { member } => Some(member),
            Self::InvalidInterface(_) => None,
        }
    }
}

/// Main error type for spygen operations
#[derive(Debug, Error)]
pub enum Error {
    /// Generation errors
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Type expression errors
    #[error(transparent)]
    TypeParse(#[from] TypeParseError),

    /// Interface document errors
    #[error("Invalid interface document {path}: {message}")]
    Document { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a document error with path context
    pub fn document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Document {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_names_member() {
        let err = GenerationError::unsupported("fetch(id:)", "inout parameters are not supported");
        assert_eq!(err.member(), Some("fetch(id:)"));
        assert_eq!(
            err.to_string(),
            "unsupported type in `fetch(id:)`: inout parameters are not supported"
        );
        assert_eq!(GenerationError::InvalidInterface("x".into()).member(), None);
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::Configuration("bad indent".into()));
        let err = result.context("Loading .spygen.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Loading .spygen.toml: Configuration error: bad indent"
        );
    }
}
