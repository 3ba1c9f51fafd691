use crate::{
    error::StoreError,
    model::{AssociationModel, EntityModel},
    record::Record,
    store::{CommitBatch, CommitOp, Store},
    types::Key,
    value::Value,
};
use std::collections::BTreeMap;

type Rows = BTreeMap<&'static str, BTreeMap<Key, Record>>;

///
/// MemoryStore
///
/// In-memory rows keyed by entity path. Commits are staged on a copy and
/// swapped in only when every operation succeeded.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Rows,
    next_keys: BTreeMap<&'static str, u64>,
    fail_commits: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a persisted row directly, bypassing commits. Returns its key.
    pub fn seed(
        &mut self,
        entity: &'static EntityModel,
        values: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> Key {
        let key = self.allocate_key(entity);
        let record = Record::loaded(entity, key, values);
        self.rows.entry(entity.path).or_default().insert(key, record);

        key
    }

    /// Make every following commit fail with `StoreError::Unavailable`
    /// until cleared with `None`.
    pub fn fail_commits(&mut self, reason: Option<&str>) {
        self.fail_commits = reason.map(ToString::to_string);
    }

    #[must_use]
    pub fn get(&self, entity: &EntityModel, key: Key) -> Option<&Record> {
        self.rows.get(entity.path).and_then(|rows| rows.get(&key))
    }

    pub fn rows(&self, entity: &EntityModel) -> impl Iterator<Item = &Record> {
        self.rows.get(entity.path).into_iter().flat_map(BTreeMap::values)
    }

    #[must_use]
    pub fn len(&self, entity: &EntityModel) -> usize {
        self.rows.get(entity.path).map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.values().all(BTreeMap::is_empty)
    }

    fn apply(rows: &mut Rows, op: CommitOp) -> Result<(), StoreError> {
        let entity = op.entity();
        let table = rows.entry(entity.path).or_default();

        match op {
            CommitOp::Insert(record) => {
                let key = record.key().ok_or(StoreError::MissingKey {
                    entity: entity.entity_name,
                })?;
                if table.contains_key(&key) {
                    return Err(StoreError::Conflict {
                        entity: entity.entity_name,
                        key,
                    });
                }
                table.insert(key, record.stored());
            }
            CommitOp::Update(record) => {
                let key = record.key().ok_or(StoreError::MissingKey {
                    entity: entity.entity_name,
                })?;
                let slot = table.get_mut(&key).ok_or(StoreError::NotFound {
                    entity: entity.entity_name,
                    key,
                })?;
                *slot = record.stored();
            }
            CommitOp::Delete { key, .. } => {
                table.remove(&key).ok_or(StoreError::NotFound {
                    entity: entity.entity_name,
                    key,
                })?;
            }
        }

        Ok(())
    }
}

impl Store for MemoryStore {
    fn load(&self, entity: &'static EntityModel, key: Key) -> Result<Option<Record>, StoreError> {
        Ok(self.get(entity, key).cloned())
    }

    fn load_many(
        &self,
        parent: &Record,
        association: &'static AssociationModel,
    ) -> Result<Vec<Record>, StoreError> {
        let Some(parent_key) = parent.key().filter(|_| parent.is_persisted()) else {
            return Ok(Vec::new());
        };
        let link = Value::Key(parent_key);

        Ok(self
            .rows(association.target)
            .filter(|row| row.get(association.foreign_key) == Some(&link))
            .cloned()
            .collect())
    }

    fn allocate_key(&mut self, entity: &'static EntityModel) -> Key {
        let next = self.next_keys.entry(entity.path).or_insert(0);
        *next += 1;

        Key::new(*next)
    }

    fn commit(&mut self, batch: CommitBatch) -> Result<(), StoreError> {
        if let Some(reason) = &self.fail_commits {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        let mut staged = self.rows.clone();
        for op in batch {
            Self::apply(&mut staged, op)?;
        }
        self.rows = staged;

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{AUTHOR, BOOK};

    fn book(store: &mut MemoryStore, title: &str) -> Record {
        let mut record = Record::new(&BOOK);
        record.set("title", title).unwrap();
        record.assign_key(store.allocate_key(&BOOK));
        record
    }

    #[test]
    fn failed_op_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        let first = book(&mut store, "a");

        let mut batch = CommitBatch::new();
        batch.push(CommitOp::Insert(first));
        batch.push(CommitOp::Delete {
            entity: &BOOK,
            key: Key::new(99),
        });

        assert!(matches!(
            store.commit(batch),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.len(&BOOK), 0);
    }

    #[test]
    fn insert_without_key_is_rejected() {
        let mut store = MemoryStore::new();
        let mut batch = CommitBatch::new();
        batch.push(CommitOp::Insert(Record::new(&BOOK)));

        assert_eq!(
            store.commit(batch),
            Err(StoreError::MissingKey { entity: "book" })
        );
    }

    #[test]
    fn load_many_follows_foreign_key_in_key_order() {
        let mut store = MemoryStore::new();
        let author = store.seed(&AUTHOR, [("name", Value::from("Ann"))]);
        let other = store.seed(&AUTHOR, [("name", Value::from("Bea"))]);
        store.seed(&BOOK, [("title", "b".into()), ("author_id", author.into())]);
        store.seed(&BOOK, [("title", "x".into()), ("author_id", other.into())]);
        store.seed(&BOOK, [("title", "c".into()), ("author_id", author.into())]);

        let parent = store.get(&AUTHOR, author).cloned().unwrap();
        let books = store.load_many(&parent, &AUTHOR.associations[0]).unwrap();
        let titles = books
            .iter()
            .filter_map(|b| b.get("title").and_then(Value::as_text))
            .collect::<Vec<_>>();

        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn unsaved_parent_has_no_related_rows() {
        let store = MemoryStore::new();
        let parent = Record::new(&AUTHOR);

        assert!(store.load_many(&parent, &AUTHOR.associations[0]).unwrap().is_empty());
        assert!(store.load_one(&parent, &AUTHOR.associations[1]).unwrap().is_none());
    }

    #[test]
    fn commit_failure_switch_rejects_batches() {
        let mut store = MemoryStore::new();
        store.fail_commits(Some("disk full"));

        assert_eq!(
            store.commit(CommitBatch::new()),
            Err(StoreError::Unavailable("disk full".to_string()))
        );
    }
}
