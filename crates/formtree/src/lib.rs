//! ## Crate layout
//! - `core`: runtime models, records, params, form nodes, stores and observability.
//! - `error`: stable public error taxonomy over every core failure.
//!
//! The `prelude` module mirrors the surface used by request handlers:
//! definitions, trees, params and the in-memory store.

pub use formtree_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        form::{
            ChildForm, CollectionForm, DeclareValidation as _, FormDefinition, FormTree,
            SingularForm,
        },
        model::{AssociationKind, EntityModel, FieldKind},
        params::{Param, Params},
        record::Record,
        store::{MemoryStore, Store as _},
        types::Key,
        validate::{ErrorMap, ValidationContext},
        value::Value,
    };
    pub use crate::error::{Error, ErrorKind};
}
