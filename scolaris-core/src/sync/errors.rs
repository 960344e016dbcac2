//! Error types for list synchronization

use thiserror::Error;

/// Result type for manager operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type for data source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Failure reported by a data source.
///
/// Network, validation and not-found failures are not distinguished; the
/// manager handles them all the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The underlying remote operation failed
    #[error("remote operation failed: {0}")]
    Remote(String),
}

impl SourceError {
    /// Build a remote failure from any displayable message
    pub fn remote(msg: impl Into<String>) -> Self {
        SourceError::Remote(msg.into())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Remote(e.to_string())
    }
}

impl From<PatchError> for SourceError {
    fn from(e: PatchError) -> Self {
        SourceError::Remote(e.to_string())
    }
}

/// Errors returned by [`ListManager`](super::ListManager) operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The data source rejected or failed the call
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The patch does not fit the entity shape; nothing was submitted
    #[error("invalid patch: {0}")]
    InvalidPatch(#[from] PatchError),
}

/// Errors raised while validating or applying a field-update patch
#[derive(Error, Debug)]
pub enum PatchError {
    /// Field name is not part of the entity
    #[error("unknown field `{field}` for {entity}")]
    UnknownField { field: String, entity: &'static str },

    /// Ids are assigned by the source and never patched
    #[error("`id` cannot be set through a patch")]
    IdNotPatchable,

    /// Merged value does not deserialize into the entity
    #[error("patch does not produce a valid {entity}: {source}")]
    Shape {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
