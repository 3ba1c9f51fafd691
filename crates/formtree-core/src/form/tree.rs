use crate::{
    error::FormError,
    form::{
        AssociationDescriptor, ChildForm, CollectionForm, DeclareValidation, FormDefinition,
        SingularForm,
        aggregate::NodeValidation,
        assign,
        child::{self, build_children, carry_rules, fresh_children},
        save,
    },
    obs::{FormEvent, sink::record as emit},
    params::Params,
    record::Record,
    store::{CommitBatch, Store},
    types::Key,
    validate::{ErrorMap, Rule},
    value::Value,
};
use std::sync::Arc;

///
/// FormTree
///
/// The root form: one record plus a node per declared association.
/// Entry point for submit, validate and save.
///

#[derive(Debug)]
pub struct FormTree {
    definition: Arc<FormDefinition>,
    record: Record,
    children: Vec<ChildForm>,
    errors: ErrorMap,
    rules: Vec<Arc<dyn Rule>>,
}

impl FormTree {
    /// Bind an existing or new record. Related rows of a saved record are
    /// read from the store.
    pub fn new(
        definition: Arc<FormDefinition>,
        record: Record,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        let entity = definition.entity();
        if !record.model().is(entity) {
            return Err(FormError::EntityMismatch {
                expected: entity.entity_name,
                found: record.model().entity_name,
            });
        }

        let children = build_children(&definition, &record, store)?;

        Ok(Self::assemble(definition, record, children))
    }

    /// Bind a newly allocated record; no store access is needed.
    #[must_use]
    pub fn fresh(definition: Arc<FormDefinition>) -> Self {
        let record = Record::new(definition.entity());
        let children = fresh_children(&definition);

        Self::assemble(definition, record, children)
    }

    /// Load the root record by key and bind it.
    pub fn load(
        definition: Arc<FormDefinition>,
        key: Key,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        let entity = definition.entity();
        let record = store
            .load(entity, key)?
            .ok_or(FormError::RecordNotFound {
                entity: entity.entity_name,
                key,
            })?;

        Self::new(definition, record, store)
    }

    fn assemble(
        definition: Arc<FormDefinition>,
        record: Record,
        children: Vec<ChildForm>,
    ) -> Self {
        Self {
            definition,
            record,
            children,
            errors: ErrorMap::new(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.record.is_persisted()
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    #[must_use]
    pub fn children(&self) -> &[ChildForm] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Result<&Value, FormError> {
        assign::read_attribute(&self.definition, &self.record, name)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        assign::assign_attribute(&self.definition, &mut self.record, name, value.into())
    }

    #[must_use]
    pub fn association(&self, name: &str) -> Option<&ChildForm> {
        child::find(&self.children, name)
    }

    pub fn association_mut(&mut self, name: &str) -> Option<&mut ChildForm> {
        child::find_mut(&mut self.children, name)
    }

    #[must_use]
    pub fn single(&self, name: &str) -> Option<&SingularForm> {
        self.association(name).and_then(ChildForm::as_single)
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionForm> {
        self.association(name).and_then(ChildForm::as_collection)
    }

    pub fn single_mut(&mut self, name: &str) -> Option<&mut SingularForm> {
        self.association_mut(name).and_then(ChildForm::as_single_mut)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut CollectionForm> {
        self.association_mut(name).and_then(ChildForm::as_collection_mut)
    }

    /// A fresh, unattached member form for any association declared in
    /// this tree, for rendering an extra empty section.
    pub fn blank_form(&self, association: &str) -> Result<SingularForm, FormError> {
        let descriptor: &AssociationDescriptor = self
            .definition
            .find_association(association)
            .ok_or_else(|| {
                FormError::unknown_association(self.definition.entity().entity_name, association)
            })?;

        Ok(SingularForm::fresh(descriptor))
    }

    /// Push submitted params through the tree.
    pub fn submit(&mut self, params: &Params) -> Result<(), FormError> {
        emit(FormEvent::Submit {
            entity: self.definition.entity().entity_name,
            association: None,
            keys: params.len(),
        });

        assign::apply(&self.definition, &mut self.record, &mut self.children, params)
    }

    /// Validate every node and rebuild the merged error map.
    pub fn validate(&mut self) -> bool {
        let valid = NodeValidation {
            qualifier: None,
            definition: &self.definition,
            rules: &self.rules,
            record: &self.record,
            children: &mut self.children,
        }
        .run(&mut self.errors);

        emit(FormEvent::Validate {
            entity: self.definition.entity().entity_name,
            valid,
            errors: self.errors.message_count(),
        });

        valid
    }

    /// Validate, then persist the whole tree as one commit.
    ///
    /// Returns `Ok(false)` without touching the store when validation
    /// fails. After a successful commit every node is rebuilt from the
    /// store, keeping the rules declared on it.
    pub fn save(&mut self, store: &mut dyn Store) -> Result<bool, FormError> {
        if !self.validate() {
            return Ok(false);
        }

        let mut batch = CommitBatch::new();
        let key = save::stage(&mut self.record, &mut self.children, store, &mut batch)?;
        let counts = batch.counts();
        let entity = self.definition.entity().entity_name;

        if let Err(err) = store.commit(batch) {
            emit(FormEvent::CommitFailed {
                entity,
                reason: err.to_string(),
            });
            return Err(err.into());
        }

        emit(FormEvent::Save {
            entity,
            inserts: counts.inserts,
            updates: counts.updates,
            deletes: counts.deletes,
        });

        self.reload(key, store)?;

        Ok(true)
    }

    fn reload(&mut self, key: Option<Key>, store: &dyn Store) -> Result<(), FormError> {
        let entity = self.definition.entity();
        let loaded = match key {
            Some(key) => store.load(entity, key)?,
            None => None,
        };

        let (record, mut children) = match loaded {
            Some(record) => {
                let children = build_children(&self.definition, &record, store)?;
                (record, children)
            }
            None => (Record::new(entity), fresh_children(&self.definition)),
        };
        carry_rules(&mut children, &self.children);

        self.record = record;
        self.children = children;
        self.errors.clear();

        Ok(())
    }
}

impl DeclareValidation for FormTree {
    fn declare_validation(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }
}
