//! Persistence boundary.
//!
//! Form nodes read related records through `Store` while they are built and
//! hand one `CommitBatch` to it on save. A store applies a batch entirely or
//! not at all.

mod batch;
mod memory;

use crate::{
    error::StoreError,
    model::{AssociationKind, AssociationModel, EntityModel},
    record::Record,
    types::Key,
    value::Value,
};

// re-exports
pub use batch::{CommitBatch, CommitCounts, CommitOp};
pub use memory::MemoryStore;

///
/// Store
///

pub trait Store {
    /// Load one row by key.
    fn load(&self, entity: &'static EntityModel, key: Key) -> Result<Option<Record>, StoreError>;

    /// Rows of a has-one / has-many target whose foreign key points at the
    /// parent, in key order. An unsaved parent has no related rows.
    fn load_many(
        &self,
        parent: &Record,
        association: &'static AssociationModel,
    ) -> Result<Vec<Record>, StoreError>;

    /// Reserve a key for a record that will be inserted by a later commit.
    fn allocate_key(&mut self, entity: &'static EntityModel) -> Key;

    /// Apply every operation of the batch, or none of them.
    fn commit(&mut self, batch: CommitBatch) -> Result<(), StoreError>;

    /// The single related record for a belongs-to or has-one association.
    fn load_one(
        &self,
        parent: &Record,
        association: &'static AssociationModel,
    ) -> Result<Option<Record>, StoreError> {
        match association.kind {
            AssociationKind::BelongsTo => {
                match parent.get(association.foreign_key).and_then(Value::as_key) {
                    Some(key) => self.load(association.target, key),
                    None => Ok(None),
                }
            }
            AssociationKind::HasOne | AssociationKind::HasMany => {
                Ok(self.load_many(parent, association)?.into_iter().next())
            }
        }
    }
}
