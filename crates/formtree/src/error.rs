use derive_more::Display;
use formtree_core::{
    error::{FormError, StoreError},
    form::DefinitionError,
    multiparam::MultiparameterAssignmentErrors,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable class + origin taxonomy.
///
/// User input problems are not errors: they are reported through the
/// tree's `ErrorMap` after validation.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        let message = err.to_string();

        match err {
            FormError::EntityMismatch { .. } => {
                Self::new(ErrorKind::Form(FormErrorKind::Mismatch), ErrorOrigin::Tree, message)
            }

            FormError::UnknownAssociation { .. } | FormError::UnknownAttribute { .. } => {
                Self::new(ErrorKind::Form(FormErrorKind::Undeclared), ErrorOrigin::Params, message)
            }

            FormError::InvalidKey { .. }
            | FormError::InvalidPositionalKey { .. }
            | FormError::MalformedMultiparameterKey { .. }
            | FormError::UnexpectedNestedPayload { .. }
            | FormError::UnexpectedScalarPayload { .. } => {
                Self::new(ErrorKind::Form(FormErrorKind::Malformed), ErrorOrigin::Params, message)
            }

            FormError::RecordNotFound { .. } => {
                Self::new(ErrorKind::Form(FormErrorKind::NotFound), ErrorOrigin::Store, message)
            }

            FormError::UnknownRecord { .. } => {
                Self::new(ErrorKind::Form(FormErrorKind::NotFound), ErrorOrigin::Collection, message)
            }

            FormError::Multiparameter(err) => err.into(),
            FormError::Store(err) => err.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::Conflict { .. } => StoreErrorKind::Conflict,
            StoreError::MissingKey { .. } | StoreError::NotFound { .. } => StoreErrorKind::NotFound,
            StoreError::Unavailable(_) => StoreErrorKind::Unavailable,
        };

        Self::new(ErrorKind::Store(kind), ErrorOrigin::Store, err.to_string())
    }
}

impl From<MultiparameterAssignmentErrors> for Error {
    fn from(err: MultiparameterAssignmentErrors) -> Self {
        Self::new(
            ErrorKind::Form(FormErrorKind::Multiparameter),
            ErrorOrigin::Multiparameter,
            err.to_string(),
        )
    }
}

impl From<DefinitionError> for Error {
    fn from(err: DefinitionError) -> Self {
        Self::new(ErrorKind::Definition, ErrorOrigin::Definition, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Form(FormErrorKind),
    Store(StoreErrorKind),

    /// A form declaration does not fit its entity model.
    Definition,
}

///
/// FormErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FormErrorKind {
    /// Submitted keys name nothing the form declares.
    Undeclared,

    /// Submitted keys or payload shapes cannot be read.
    Malformed,

    /// One or more multiparameter groups failed to assemble.
    Multiparameter,

    /// A referenced record does not exist.
    NotFound,

    /// The bound record is not of the form's entity.
    Mismatch,
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    Conflict,
    NotFound,
    Unavailable,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Collection,
    Definition,
    Multiparameter,
    Params,
    Store,
    Tree,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use formtree_core::types::Key;

    #[test]
    fn structural_errors_map_to_form_kinds() {
        let err: Error = FormError::UnknownRecord {
            association: "tasks",
            key: Key::new(9),
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Form(FormErrorKind::NotFound));
        assert_eq!(err.origin, ErrorOrigin::Collection);
        assert_eq!(err.to_string(), "'tasks' has no member with id 9");
    }

    #[test]
    fn wrapped_store_errors_keep_store_origin() {
        let err: Error = FormError::Store(StoreError::Unavailable("offline".to_string())).into();

        assert_eq!(err.kind, ErrorKind::Store(StoreErrorKind::Unavailable));
        assert_eq!(err.origin, ErrorOrigin::Store);
        assert_eq!(err.origin.to_string(), "Store");
    }

    #[test]
    fn definition_errors_are_their_own_kind() {
        let err: Error = DefinitionError::ReservedAttribute { attribute: "id" }.into();

        assert_eq!(err.kind, ErrorKind::Definition);
        assert_eq!(err.origin, ErrorOrigin::Definition);
    }
}
