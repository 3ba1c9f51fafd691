use crate::{model::EntityModel, record::Record, types::Key};

///
/// CommitOp
///

#[derive(Clone, Debug)]
pub enum CommitOp {
    Insert(Record),
    Update(Record),
    Delete {
        entity: &'static EntityModel,
        key: Key,
    },
}

impl CommitOp {
    #[must_use]
    pub const fn entity(&self) -> &'static EntityModel {
        match self {
            Self::Insert(record) | Self::Update(record) => record.model(),
            Self::Delete { entity, .. } => *entity,
        }
    }
}

///
/// CommitCounts
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommitCounts {
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
}

///
/// CommitBatch
///
/// Ordered operations produced by one save. Order matters only for
/// readability of the batch; a store applies it as one unit.
///

#[derive(Clone, Debug, Default)]
pub struct CommitBatch {
    ops: Vec<CommitOp>,
}

impl CommitBatch {
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: CommitOp) {
        self.ops.push(op);
    }

    /// True if the batch already deletes this row.
    #[must_use]
    pub fn deletes(&self, entity: &EntityModel, key: Key) -> bool {
        self.ops.iter().any(|op| {
            matches!(op, CommitOp::Delete { entity: e, key: k } if e.is(entity) && *k == key)
        })
    }

    #[must_use]
    pub fn counts(&self) -> CommitCounts {
        let mut counts = CommitCounts::default();
        for op in &self.ops {
            match op {
                CommitOp::Insert(_) => counts.inserts += 1,
                CommitOp::Update(_) => counts.updates += 1,
                CommitOp::Delete { .. } => counts.deletes += 1,
            }
        }

        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommitOp> {
        self.ops.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for CommitBatch {
    type Item = CommitOp;
    type IntoIter = std::vec::IntoIter<CommitOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
