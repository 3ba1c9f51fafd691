use crate::{
    model::{association::AssociationModel, field::FieldModel},
    record::Record,
    validate::ValidationContext,
};
use std::fmt::{self, Debug};

/// Entity-level validation hook. Must not recurse into related records.
pub type EntityValidator = fn(&Record, &mut dyn ValidationContext);

///
/// EntityModel
/// Static runtime model for one entity.
///

pub struct EntityModel {
    /// Fully-qualified path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name used in store routing.
    pub entity_name: &'static str,
    /// Ordered field list; the primary key is implicit and not listed.
    pub fields: &'static [FieldModel],
    /// Declared associations to other entities.
    pub associations: &'static [AssociationModel],
    /// The entity's own validation rules.
    pub validators: &'static [EntityValidator],
}

impl EntityModel {
    #[must_use]
    pub fn field(&'static self, name: &str) -> Option<&'static FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn association(&'static self, name: &str) -> Option<&'static AssociationModel> {
        self.associations.iter().find(|assoc| assoc.name == name)
    }

    /// Identity comparison; entity models are unique statics.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.path == other.path
    }
}

impl Debug for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityModel")
            .field("path", &self.path)
            .field("fields", &self.fields.len())
            .field("associations", &self.associations.len())
            .finish_non_exhaustive()
    }
}
