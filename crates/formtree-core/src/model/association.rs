use crate::model::entity::EntityModel;
use derive_more::Display;

///
/// AssociationKind
///
/// Which side stores the foreign key:
/// - BelongsTo: the owning record holds the target's key.
/// - HasOne / HasMany: the target record holds the owner's key.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum AssociationKind {
    BelongsTo,
    HasMany,
    HasOne,
}

impl AssociationKind {
    #[must_use]
    pub const fn cardinality(self) -> Cardinality {
        match self {
            Self::BelongsTo | Self::HasOne => Cardinality::Single,
            Self::HasMany => Cardinality::Collection,
        }
    }
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Cardinality {
    Single,
    Collection,
}

///
/// AssociationModel
///

#[derive(Debug)]
pub struct AssociationModel {
    pub name: &'static str,
    pub kind: AssociationKind,
    pub target: &'static EntityModel,
    /// Key field holding the link; lives on the owner for `BelongsTo`,
    /// on the target otherwise.
    pub foreign_key: &'static str,
}
