//! Core runtime for FormTree: entity models, records, params, multiparameter
//! assembly, form definitions and the nested form nodes built from them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod form;
pub mod model;
pub mod multiparam;
pub mod obs;
pub mod params;
pub mod record;
pub mod store;
pub mod types;
pub mod validate;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{FormError, StoreError};

///
/// CONSTANTS
///

/// Highest multiparameter position honoured for composite value types.
///
/// Fragments beyond this position are ignored when assembling.
pub const MAX_MULTIPARAMETER_POSITION: usize = 100;

/// Number of empty members pre-built for a collection on a new parent when
/// the declaration does not say otherwise.
pub const DEFAULT_INITIAL_COUNT: usize = 1;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No stores, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        form::{
            ChildForm, CollectionForm, DeclareValidation, FormDefinition, FormTree, SingularForm,
        },
        model::{AssociationKind, AssociationModel, Cardinality, EntityModel, FieldKind, FieldModel},
        params::{Param, Params},
        record::Record,
        types::Key,
        validate::{ErrorMap, Rule, ValidationContext},
        value::Value,
    };
}
