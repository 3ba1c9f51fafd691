use crate::{
    error::FormError,
    form::{AssociationDescriptor, CollectionForm, FormDefinition, SingularForm},
    model::Cardinality,
    params::Params,
    record::Record,
    store::Store,
    validate::ErrorMap,
};

///
/// ChildForm
/// A nested node, shaped after its association's cardinality.
///

#[derive(Debug)]
pub enum ChildForm {
    Single(SingularForm),
    Collection(CollectionForm),
}

impl ChildForm {
    /// Build against a parent record, reading related rows from the store.
    pub(crate) fn build(
        descriptor: &AssociationDescriptor,
        parent: &Record,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        match descriptor.cardinality() {
            Cardinality::Single => SingularForm::build(descriptor, parent, store).map(Self::Single),
            Cardinality::Collection => {
                CollectionForm::build(descriptor, parent, store).map(Self::Collection)
            }
        }
    }

    /// Build for a parent that has never been saved.
    pub(crate) fn fresh(descriptor: &AssociationDescriptor) -> Self {
        match descriptor.cardinality() {
            Cardinality::Single => Self::Single(SingularForm::fresh(descriptor)),
            Cardinality::Collection => Self::Collection(CollectionForm::fresh(descriptor)),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Single(form) => form.name(),
            Self::Collection(form) => form.name(),
        }
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        match self {
            Self::Single(form) => form.errors(),
            Self::Collection(form) => form.errors(),
        }
    }

    #[must_use]
    pub const fn as_single(&self) -> Option<&SingularForm> {
        match self {
            Self::Single(form) => Some(form),
            Self::Collection(_) => None,
        }
    }

    #[must_use]
    pub const fn as_collection(&self) -> Option<&CollectionForm> {
        match self {
            Self::Collection(form) => Some(form),
            Self::Single(_) => None,
        }
    }

    pub const fn as_single_mut(&mut self) -> Option<&mut SingularForm> {
        match self {
            Self::Single(form) => Some(form),
            Self::Collection(_) => None,
        }
    }

    pub const fn as_collection_mut(&mut self) -> Option<&mut CollectionForm> {
        match self {
            Self::Collection(form) => Some(form),
            Self::Single(_) => None,
        }
    }

    pub(crate) fn submit(&mut self, parent: &Record, params: &Params) -> Result<(), FormError> {
        match self {
            Self::Single(form) => form.submit(params),
            Self::Collection(form) => form.submit(parent, params),
        }
    }

    pub(crate) fn validate(&mut self) -> bool {
        match self {
            Self::Single(form) => form.validate(),
            Self::Collection(form) => form.validate(),
        }
    }

    fn inherit_rules(&mut self, previous: &Self) {
        match (self, previous) {
            (Self::Single(form), Self::Single(old)) => form.inherit_rules(old),
            (Self::Collection(form), Self::Collection(old)) => form.inherit_rules(old),
            _ => {}
        }
    }
}

pub(crate) fn build_children(
    definition: &FormDefinition,
    record: &Record,
    store: &dyn Store,
) -> Result<Vec<ChildForm>, FormError> {
    definition
        .associations()
        .iter()
        .map(|descriptor| ChildForm::build(descriptor, record, store))
        .collect()
}

pub(crate) fn fresh_children(definition: &FormDefinition) -> Vec<ChildForm> {
    definition
        .associations()
        .iter()
        .map(ChildForm::fresh)
        .collect()
}

/// Re-declare the instance rules of replaced nodes on their rebuilt
/// counterparts, matched by association name.
pub(crate) fn carry_rules(rebuilt: &mut [ChildForm], previous: &[ChildForm]) {
    for child in rebuilt {
        if let Some(old) = find(previous, child.name()) {
            child.inherit_rules(old);
        }
    }
}

/// Find a child by association name.
pub(crate) fn find<'a>(children: &'a [ChildForm], name: &str) -> Option<&'a ChildForm> {
    children.iter().find(|child| child.name() == name)
}

pub(crate) fn find_mut<'a>(children: &'a mut [ChildForm], name: &str) -> Option<&'a mut ChildForm> {
    children.iter_mut().find(|child| child.name() == name)
}
