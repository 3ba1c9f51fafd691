use crate::error::FormError;
use thiserror::Error as ThisError;

///
/// MultiparameterError
/// Why one fragment group could not be turned into a value.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum MultiparameterError {
    #[error("cannot build {type_name}: {reason}")]
    Construct {
        type_name: &'static str,
        reason: String,
    },

    #[error("invalid value '{value}' at position {position}")]
    InvalidComponent { position: usize, value: String },

    #[error("cannot read '{value}' at position {position} as {expected}")]
    InvalidFragment {
        position: usize,
        value: String,
        expected: &'static str,
    },

    #[error("Missing Parameter - {attribute}({position})")]
    MissingParameter { attribute: String, position: usize },

    #[error("{kind} attributes cannot be assembled from {parts} parts")]
    UnsupportedKind { kind: &'static str, parts: usize },
}

///
/// AttributeAssignmentError
/// One failed group: the attribute, its raw fragment values, and the cause.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("error on assignment {values:?} to {attribute} ({source})")]
pub struct AttributeAssignmentError {
    pub attribute: String,
    pub values: Vec<String>,
    #[source]
    pub source: MultiparameterError,
}

///
/// MultiparameterAssignmentErrors
///
/// Every group of one submission is attempted, in nested nodes too; all
/// failures are reported together through this aggregate.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, ThisError)]
#[error(
    "{} error(s) on assignment of multiparameter attributes [{}]",
    .errors.len(),
    joined(.errors)
)]
pub struct MultiparameterAssignmentErrors {
    pub errors: Vec<AttributeAssignmentError>,
}

impl MultiparameterAssignmentErrors {
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.attribute.as_str()).collect()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keep the failures of an assembly error and pass anything else on.
    pub(crate) fn absorb(&mut self, result: Result<(), FormError>) -> Result<(), FormError> {
        match result {
            Err(FormError::Multiparameter(failed)) => {
                self.errors.extend(failed.errors);
                Ok(())
            }
            other => other,
        }
    }

    pub(crate) fn into_result(self) -> Result<(), FormError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

fn joined(errors: &[AttributeAssignmentError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
