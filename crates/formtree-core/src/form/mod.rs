//! Form definitions and the nested form tree built from them.
//!
//! A `FormDefinition` is declared once and shared; a `FormTree` is built
//! per request from a definition and a record, submitted to, validated and
//! saved.

mod aggregate;
mod assign;
mod child;
mod collection;
mod definition;
mod save;
mod singular;
mod tree;


// re-exports
pub use child::ChildForm;
pub use collection::CollectionForm;
pub use definition::{
    AssociationDescriptor, AttributeDescriptor, DeclareValidation, DefinitionError, FormBuilder,
    FormDefinition,
};
pub use singular::SingularForm;
pub use tree::FormTree;
