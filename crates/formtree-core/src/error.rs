use crate::{multiparam::MultiparameterAssignmentErrors, types::Key};
use thiserror::Error as ThisError;

///
/// FormError
///
/// Structural failures raised while building, submitting to, or saving a
/// form tree. These indicate a caller/schema mismatch or a persistence
/// failure, never bad user input: user input problems surface as
/// validation issues in an `ErrorMap`.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum FormError {
    #[error("entity mismatch: form expects '{expected}', record is '{found}'")]
    EntityMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid record id for '{association}': '{value}'")]
    InvalidKey {
        association: &'static str,
        value: String,
    },

    #[error("invalid positional key for '{association}': '{key}'")]
    InvalidPositionalKey {
        association: &'static str,
        key: String,
    },

    #[error("malformed multiparameter key '{key}'")]
    MalformedMultiparameterKey { key: String },

    #[error(transparent)]
    Multiparameter(#[from] MultiparameterAssignmentErrors),

    #[error("record not found: {entity} {key}")]
    RecordNotFound { entity: &'static str, key: Key },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unexpected nested payload for '{key}'")]
    UnexpectedNestedPayload { key: String },

    #[error("unexpected scalar payload for '{key}'")]
    UnexpectedScalarPayload { key: String },

    #[error("'{entity}' form has no association '{association}'")]
    UnknownAssociation {
        entity: &'static str,
        association: String,
    },

    #[error("'{entity}' has no attribute '{attribute}'")]
    UnknownAttribute {
        entity: &'static str,
        attribute: String,
    },

    #[error("'{association}' has no member with id {key}")]
    UnknownRecord {
        association: &'static str,
        key: Key,
    },
}

impl FormError {
    pub(crate) fn unknown_attribute(entity: &'static str, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            entity,
            attribute: attribute.into(),
        }
    }

    pub(crate) fn unknown_association(entity: &'static str, association: impl Into<String>) -> Self {
        Self::UnknownAssociation {
            entity,
            association: association.into(),
        }
    }
}

///
/// StoreError
///
/// Failures reported by a `Store` implementation. A failed commit leaves
/// the store exactly as it was before the batch was submitted.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum StoreError {
    #[error("row already exists: {entity} {key}")]
    Conflict { entity: &'static str, key: Key },

    #[error("insert without an allocated key: {entity}")]
    MissingKey { entity: &'static str },

    #[error("row not found: {entity} {key}")]
    NotFound { entity: &'static str, key: Key },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
