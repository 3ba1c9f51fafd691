//! Autosave: turn a validated tree into one commit batch.
//!
//! Per node: belongs-to targets first so their keys can be written into the
//! owner, then the owner itself, then has-one and has-many dependents with
//! the owner's key written into them, then deletions.

use crate::{
    error::FormError,
    form::{ChildForm, SingularForm},
    model::AssociationKind,
    record::Record,
    store::{CommitBatch, CommitOp, Store},
    types::Key,
};

/// Stage one record and its subtree. Returns the record's key, or `None`
/// when the record is being destroyed.
pub(crate) fn stage(
    record: &mut Record,
    children: &mut [ChildForm],
    store: &mut dyn Store,
    batch: &mut CommitBatch,
) -> Result<Option<Key>, FormError> {
    if record.is_marked_for_destruction() {
        delete(record, batch);
        return Ok(None);
    }

    for child in children.iter_mut() {
        match child {
            ChildForm::Single(node) if node.kind() == AssociationKind::BelongsTo => {
                stage_target(record, node, store, batch)?;
            }
            _ => {}
        }
    }

    let key = match record.key() {
        Some(key) => key,
        None => {
            let key = store.allocate_key(record.model());
            record.assign_key(key);
            key
        }
    };
    if !record.is_persisted() {
        batch.push(CommitOp::Insert(record.clone()));
    } else if record.is_changed() {
        batch.push(CommitOp::Update(record.clone()));
    }

    for child in children.iter_mut() {
        match child {
            ChildForm::Single(node) if node.kind() == AssociationKind::HasOne => {
                stage_dependent(key, node, store, batch)?;
            }
            ChildForm::Collection(collection) => {
                for member in collection.members_mut() {
                    stage_dependent(key, member, store, batch)?;
                }
                for member in collection.removed() {
                    delete(member.record(), batch);
                }
            }
            ChildForm::Single(_) => {}
        }
    }

    Ok(Some(key))
}

// Belongs-to: the owner holds the link.
fn stage_target(
    owner: &mut Record,
    node: &mut SingularForm,
    store: &mut dyn Store,
    batch: &mut CommitBatch,
) -> Result<(), FormError> {
    if !node.is_linked() {
        return Ok(());
    }

    let foreign_key = node.descriptor().foreign_key();
    let (record, children) = node.parts_mut();
    let key = stage(record, children, store, batch)?;

    owner.write_link(foreign_key, key)
}

// Has-one / has-many: the dependent holds the link.
fn stage_dependent(
    owner_key: Key,
    node: &mut SingularForm,
    store: &mut dyn Store,
    batch: &mut CommitBatch,
) -> Result<(), FormError> {
    let foreign_key = node.descriptor().foreign_key();
    let (record, children) = node.parts_mut();

    if !record.is_marked_for_destruction() {
        record.write_link(foreign_key, Some(owner_key))?;
    }
    stage(record, children, store, batch)?;

    Ok(())
}

fn delete(record: &Record, batch: &mut CommitBatch) {
    let Some(key) = record.key() else {
        return;
    };

    if record.is_persisted() && !batch.deletes(record.model(), key) {
        batch.push(CommitOp::Delete {
            entity: record.model(),
            key,
        });
    }
}
