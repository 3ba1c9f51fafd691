use crate::{
    DEFAULT_INITIAL_COUNT,
    model::{AssociationKind, AssociationModel, Cardinality, EntityModel, FieldModel},
    params::{DESTROY_KEY, ID_KEY},
    validate::{Presence, Rule},
};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};
use thiserror::Error as ThisError;

/// Keys owned by the form layer itself; never declarable as attributes.
const RESERVED_ATTRIBUTES: [&str; 2] = [ID_KEY, DESTROY_KEY];

///
/// DefinitionError
/// A form declaration does not fit its entity model.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum DefinitionError {
    #[error("association '{association}' declared twice on '{entity}'")]
    DuplicateAssociation {
        entity: &'static str,
        association: &'static str,
    },

    #[error("attribute '{attribute}' declared twice on '{entity}'")]
    DuplicateAttribute {
        entity: &'static str,
        attribute: &'static str,
    },

    #[error("records count given for singular association '{association}'")]
    RecordsOnSingular { association: &'static str },

    #[error("'{attribute}' is reserved and cannot be declared as an attribute")]
    ReservedAttribute { attribute: &'static str },

    #[error("'{entity}' has no association '{association}'")]
    UnknownAssociation {
        entity: &'static str,
        association: &'static str,
    },

    #[error("'{entity}' has no attribute '{attribute}'")]
    UnknownAttribute {
        entity: &'static str,
        attribute: &'static str,
    },
}

///
/// DeclareValidation
///
/// Attach a validation rule. Builders add it to the definition; live nodes
/// add it to that one instance (collections to every member).
///

pub trait DeclareValidation {
    fn declare_validation(&mut self, rule: Arc<dyn Rule>);

    fn declare(&mut self, rule: impl Rule + 'static)
    where
        Self: Sized,
    {
        self.declare_validation(Arc::new(rule));
    }
}

///
/// AttributeDescriptor
///

#[derive(Clone, Copy, Debug)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub field: &'static FieldModel,
}

///
/// AssociationDescriptor
///
/// One nested association declared on a form. Shared read-only by every
/// node built from it.
///

#[derive(Clone, Debug)]
pub struct AssociationDescriptor {
    pub name: &'static str,
    pub association: &'static AssociationModel,
    /// Empty members pre-built for a new parent; collections only.
    pub initial_count: usize,
    pub nested: Arc<FormDefinition>,
}

impl AssociationDescriptor {
    #[must_use]
    pub const fn kind(&self) -> AssociationKind {
        self.association.kind
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.association.kind.cardinality()
    }

    #[must_use]
    pub const fn foreign_key(&self) -> &'static str {
        self.association.foreign_key
    }
}

///
/// FormDefinition
///
/// Immutable description of what a form over one entity may edit:
/// attributes, nested associations and validation rules.
///

pub struct FormDefinition {
    entity: &'static EntityModel,
    attributes: Vec<AttributeDescriptor>,
    associations: Vec<AssociationDescriptor>,
    rules: Vec<Arc<dyn Rule>>,
}

impl FormDefinition {
    #[must_use]
    pub fn builder(entity: &'static EntityModel) -> FormBuilder {
        FormBuilder::new(entity)
    }

    #[must_use]
    pub const fn entity(&self) -> &'static EntityModel {
        self.entity
    }

    #[must_use]
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn associations(&self) -> &[AssociationDescriptor] {
        &self.associations
    }

    #[must_use]
    pub fn association(&self, name: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Search this definition and every nested one, depth first.
    #[must_use]
    pub fn find_association(&self, name: &str) -> Option<&AssociationDescriptor> {
        self.association(name).or_else(|| {
            self.associations
                .iter()
                .find_map(|a| a.nested.find_association(name))
        })
    }

    #[must_use]
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }
}

impl Debug for FormDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDefinition")
            .field("entity", &self.entity.entity_name)
            .field("attributes", &self.attributes.iter().map(|a| a.name).collect::<Vec<_>>())
            .field("associations", &self.associations)
            .field("rules", &self.rules.len())
            .finish()
    }
}

///
/// FormBuilder
///

pub struct FormBuilder {
    entity: &'static EntityModel,
    attributes: Vec<&'static str>,
    associations: Vec<PendingAssociation>,
    rules: Vec<Arc<dyn Rule>>,
}

struct PendingAssociation {
    name: &'static str,
    records: Option<usize>,
    nested: Result<FormDefinition, DefinitionError>,
}

impl FormBuilder {
    const fn new(entity: &'static EntityModel) -> Self {
        Self {
            entity,
            attributes: Vec::new(),
            associations: Vec::new(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: &'static str) -> Self {
        self.attributes.push(name);
        self
    }

    #[must_use]
    pub fn attributes(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.attributes.extend(names);
        self
    }

    /// Declare attributes that must not be blank.
    #[must_use]
    pub fn required(mut self, names: impl IntoIterator<Item = &'static str> + Clone) -> Self {
        self.rules.push(Arc::new(Presence::new(names.clone())));
        self.attributes(names)
    }

    /// Declare a nested association. Collections get the default initial
    /// member count.
    #[must_use]
    pub fn association(self, name: &'static str, f: impl FnOnce(Self) -> Self) -> Self {
        self.push_association(name, None, f)
    }

    #[must_use]
    pub fn association_with_records(
        self,
        name: &'static str,
        records: usize,
        f: impl FnOnce(Self) -> Self,
    ) -> Self {
        self.push_association(name, Some(records), f)
    }

    #[must_use]
    pub fn validates(mut self, rule: impl Rule + 'static) -> Self {
        self.declare(rule);
        self
    }

    pub fn build(self) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.finish().map(Arc::new)
    }

    fn push_association(
        mut self,
        name: &'static str,
        records: Option<usize>,
        f: impl FnOnce(Self) -> Self,
    ) -> Self {
        let nested = match self.entity.association(name) {
            Some(association) => f(Self::new(association.target)).finish(),
            None => Err(DefinitionError::UnknownAssociation {
                entity: self.entity.entity_name,
                association: name,
            }),
        };

        self.associations.push(PendingAssociation {
            name,
            records,
            nested,
        });
        self
    }

    fn finish(self) -> Result<FormDefinition, DefinitionError> {
        let entity = self.entity;

        let mut attributes: Vec<AttributeDescriptor> = Vec::with_capacity(self.attributes.len());
        for name in self.attributes {
            if RESERVED_ATTRIBUTES.contains(&name) {
                return Err(DefinitionError::ReservedAttribute { attribute: name });
            }
            let field = entity
                .field(name)
                .ok_or(DefinitionError::UnknownAttribute {
                    entity: entity.entity_name,
                    attribute: name,
                })?;
            if attributes.iter().any(|a| a.name == name) {
                return Err(DefinitionError::DuplicateAttribute {
                    entity: entity.entity_name,
                    attribute: name,
                });
            }
            attributes.push(AttributeDescriptor { name, field });
        }

        let mut associations: Vec<AssociationDescriptor> =
            Vec::with_capacity(self.associations.len());
        for pending in self.associations {
            let nested = pending.nested?;
            let association =
                entity
                    .association(pending.name)
                    .ok_or(DefinitionError::UnknownAssociation {
                        entity: entity.entity_name,
                        association: pending.name,
                    })?;
            if associations.iter().any(|a| a.name == pending.name) {
                return Err(DefinitionError::DuplicateAssociation {
                    entity: entity.entity_name,
                    association: pending.name,
                });
            }

            let initial_count = match (association.kind.cardinality(), pending.records) {
                (Cardinality::Collection, records) => records.unwrap_or(DEFAULT_INITIAL_COUNT),
                (Cardinality::Single, None) => 0,
                (Cardinality::Single, Some(_)) => {
                    return Err(DefinitionError::RecordsOnSingular {
                        association: pending.name,
                    });
                }
            };

            associations.push(AssociationDescriptor {
                name: pending.name,
                association,
                initial_count,
                nested: Arc::new(nested),
            });
        }

        Ok(FormDefinition {
            entity,
            attributes,
            associations,
            rules: self.rules,
        })
    }
}

impl DeclareValidation for FormBuilder {
    fn declare_validation(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }
}

///
/// TESTS
///
