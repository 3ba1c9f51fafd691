use crate::{
    error::FormError,
    form::{
        AssociationDescriptor, ChildForm, CollectionForm, DeclareValidation,
        aggregate::NodeValidation,
        assign,
        child::{self, build_children, carry_rules, fresh_children},
    },
    model::AssociationKind,
    obs::{FormEvent, sink::record as emit},
    params::Params,
    record::Record,
    store::Store,
    validate::{ErrorMap, Rule},
    value::Value,
};
use std::sync::Arc;

///
/// SingularForm
///
/// Binds one related record (has-one, belongs-to, or one member of a
/// has-many collection) and owns the nodes for its own associations.
///

#[derive(Debug)]
pub struct SingularForm {
    descriptor: AssociationDescriptor,
    record: Record,
    children: Vec<ChildForm>,
    errors: ErrorMap,
    rules: Vec<Arc<dyn Rule>>,
    /// Whether saving the parent also saves this record. A belongs-to
    /// node starts unlinked when the parent points at nothing.
    linked: bool,
}

impl SingularForm {
    pub(crate) fn build(
        descriptor: &AssociationDescriptor,
        parent: &Record,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        match store.load_one(parent, descriptor.association)? {
            Some(record) => Self::with_record(descriptor, record, store),
            None => Ok(Self::fresh(descriptor)),
        }
    }

    /// Bind an existing record; its own associations are read from the store.
    pub(crate) fn with_record(
        descriptor: &AssociationDescriptor,
        record: Record,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        let children = build_children(&descriptor.nested, &record, store)?;

        Ok(Self {
            descriptor: descriptor.clone(),
            record,
            children,
            errors: ErrorMap::new(),
            rules: Vec::new(),
            linked: true,
        })
    }

    /// Bind a newly allocated, unsaved record.
    pub(crate) fn fresh(descriptor: &AssociationDescriptor) -> Self {
        Self {
            descriptor: descriptor.clone(),
            record: Record::new(descriptor.association.target),
            children: fresh_children(&descriptor.nested),
            errors: ErrorMap::new(),
            rules: Vec::new(),
            linked: descriptor.kind() != AssociationKind::BelongsTo,
        }
    }

    pub(crate) fn with_rules(mut self, rules: &[Arc<dyn Rule>]) -> Self {
        self.rules.extend(rules.iter().cloned());
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub const fn kind(&self) -> AssociationKind {
        self.descriptor.kind()
    }

    #[must_use]
    pub const fn descriptor(&self) -> &AssociationDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    #[must_use]
    pub fn children(&self) -> &[ChildForm] {
        &self.children
    }

    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.linked
    }

    #[must_use]
    pub const fn is_marked_for_destruction(&self) -> bool {
        self.record.is_marked_for_destruction()
    }

    pub fn attribute(&self, name: &str) -> Result<&Value, FormError> {
        assign::read_attribute(&self.descriptor.nested, &self.record, name)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        assign::assign_attribute(&self.descriptor.nested, &mut self.record, name, value.into())
    }

    #[must_use]
    pub fn association(&self, name: &str) -> Option<&ChildForm> {
        child::find(&self.children, name)
    }

    pub fn association_mut(&mut self, name: &str) -> Option<&mut ChildForm> {
        child::find_mut(&mut self.children, name)
    }

    #[must_use]
    pub fn single(&self, name: &str) -> Option<&Self> {
        self.association(name).and_then(ChildForm::as_single)
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionForm> {
        self.association(name).and_then(ChildForm::as_collection)
    }

    /// Apply submitted params.
    ///
    /// A belongs-to node swaps in a fresh record first unless the payload
    /// carries no data of its own, so each submission may name a new target.
    pub fn submit(&mut self, params: &Params) -> Result<(), FormError> {
        if self.kind() == AssociationKind::BelongsTo && !params.scalars_only().is_reject_payload() {
            self.rebuild();
        }

        emit(FormEvent::Submit {
            entity: self.record.model().entity_name,
            association: Some(self.descriptor.name),
            keys: params.len(),
        });

        assign::apply(
            &self.descriptor.nested,
            &mut self.record,
            &mut self.children,
            params,
        )
    }

    /// Defer destruction of the bound record to the next save. The node
    /// stays in place and inspectable.
    pub const fn delete(&mut self) {
        self.record.mark_for_destruction();
    }

    /// Recompute this node's errors; see `NodeValidation`.
    ///
    /// An unlinked belongs-to node is not part of the saved graph and
    /// always reports valid.
    pub fn validate(&mut self) -> bool {
        if !self.linked {
            self.errors.clear();
            return true;
        }

        NodeValidation {
            qualifier: Some(self.descriptor.name),
            definition: &self.descriptor.nested,
            rules: &self.rules,
            record: &self.record,
            children: &mut self.children,
        }
        .run(&mut self.errors)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Record, &mut [ChildForm]) {
        (&mut self.record, &mut self.children)
    }

    /// Take over the rules declared on a node this one replaces.
    pub(crate) fn inherit_rules(&mut self, previous: &Self) {
        self.rules.extend(previous.rules.iter().cloned());
        carry_rules(&mut self.children, &previous.children);
    }

    fn rebuild(&mut self) {
        let mut children = fresh_children(&self.descriptor.nested);
        carry_rules(&mut children, &self.children);

        self.record = Record::new(self.descriptor.association.target);
        self.children = children;
        self.linked = true;

        emit(FormEvent::BelongsToRebuilt {
            association: self.descriptor.name,
        });
    }
}

impl DeclareValidation for SingularForm {
    fn declare_validation(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }
}
