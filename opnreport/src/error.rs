use thiserror::Error;

/// Fatal problems found while building the typed tree.
///
/// Any of these aborts the build; no partial document is returned. Unknown
/// tags and unresolvable references are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{path}: expected an integer, found {value:?}")]
    InvalidInteger { path: String, value: String },
    #[error("{path}: expected a Unix timestamp, found {value:?}")]
    InvalidTimestamp { path: String, value: String },
    #[error("{path}: invalid port string {value:?}")]
    InvalidPort { path: String, value: String },
}

impl BuildError {
    /// Dotted location of the offending field, list positions as `[i]`.
    pub fn path(&self) -> &str {
        match self {
            BuildError::InvalidInteger { path, .. }
            | BuildError::InvalidTimestamp { path, .. }
            | BuildError::InvalidPort { path, .. } => path,
        }
    }

    /// Raw text that failed conversion.
    pub fn value(&self) -> &str {
        match self {
            BuildError::InvalidInteger { value, .. }
            | BuildError::InvalidTimestamp { value, .. }
            | BuildError::InvalidPort { value, .. } => value,
        }
    }
}
