//! Runtime data model definitions.
//!
//! Static tables describing entities, their fields, and their associations.
//! They stand in for ORM reflection: form declarations are checked against
//! these tables once, and nodes read association kinds from them instead of
//! probing models at runtime.
//!
//! In general:
//! - `model` defines *what exists*
//! - `form` defines *what is editable*
pub mod association;
pub mod entity;
pub mod field;

// re-exports
pub use association::{AssociationKind, AssociationModel, Cardinality};
pub use entity::{EntityModel, EntityValidator};
pub use field::{CompositeModel, FieldKind, FieldModel};
