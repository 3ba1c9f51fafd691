//! Dynamic entity instances bound by form nodes.

use crate::{
    error::FormError,
    model::{EntityModel, FieldModel},
    types::Key,
    validate::ValidationContext,
    value::{CastError, Value, cast},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Record
///
/// One entity instance. Owned by exactly one form node (or by a store row).
/// Field values are always cast to the declared field kind; failed casts
/// keep the raw value and are reported by `validate`.
///

#[derive(Clone, Debug)]
pub struct Record {
    model: &'static EntityModel,
    key: Option<Key>,
    persisted: bool,
    values: BTreeMap<&'static str, Value>,
    invalid: BTreeMap<&'static str, CastError>,
    changed: BTreeSet<&'static str>,
    marked_for_destruction: bool,
}

impl Record {
    /// Allocate a new, unsaved instance with every field `Null`.
    #[must_use]
    pub fn new(model: &'static EntityModel) -> Self {
        Self {
            model,
            key: None,
            persisted: false,
            values: model.fields.iter().map(|f| (f.name, Value::Null)).collect(),
            invalid: BTreeMap::new(),
            changed: BTreeSet::new(),
            marked_for_destruction: false,
        }
    }

    /// Materialize a persisted instance, as a store does when loading a row.
    ///
    /// Values for undeclared fields are dropped; missing fields are `Null`.
    #[must_use]
    pub fn loaded(
        model: &'static EntityModel,
        key: Key,
        values: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> Self {
        let mut record = Self::new(model);
        for (name, value) in values {
            if let Some(slot) = record.values.get_mut(name) {
                *slot = value;
            }
        }
        record.key = Some(key);
        record.persisted = true;

        record
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        self.model
    }

    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        self.key
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Returns the field value, or `None` when the entity has no such field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterate declared fields and their current values in field order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.model
            .fields
            .iter()
            .filter_map(|field| self.values.get(field.name).map(|v| (field.name, v)))
    }

    /// Assign one field, casting to the declared kind.
    ///
    /// Unknown field names are a structural error. A failed cast is not:
    /// the raw value is kept and reported by `validate`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let field = self
            .model
            .field(name)
            .ok_or_else(|| FormError::unknown_attribute(self.model.entity_name, name))?;

        self.write(field, value.into());

        Ok(())
    }

    fn write(&mut self, field: &'static FieldModel, value: Value) {
        let value = match cast(&field.kind, value.clone()) {
            Ok(cast) => {
                self.invalid.remove(field.name);
                cast
            }
            Err(err) => {
                self.invalid.insert(field.name, err);
                value
            }
        };

        let slot = self.values.entry(field.name).or_insert(Value::Null);
        if *slot != value {
            *slot = value;
            self.changed.insert(field.name);
        }
    }

    /// True for new records and for persisted records with assigned changes.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.persisted || !self.changed.is_empty()
    }

    /// Names of fields assigned a different value since load.
    pub fn changed_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changed.iter().copied()
    }

    /// Defer destruction of this record to the next save.
    pub const fn mark_for_destruction(&mut self) {
        self.marked_for_destruction = true;
    }

    #[must_use]
    pub const fn is_marked_for_destruction(&self) -> bool {
        self.marked_for_destruction
    }

    /// Run the record's own validation: cast failures first, then the
    /// entity's declared validators.
    pub fn validate(&self, ctx: &mut dyn ValidationContext) {
        for (name, err) in &self.invalid {
            ctx.issue_at(name, format!("is not a valid {}", err.expected));
        }

        for validator in self.model.validators {
            validator(self, ctx);
        }
    }

    pub(crate) const fn assign_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    /// Write a link field. Link fields must be declared on the entity.
    pub(crate) fn write_link(&mut self, field: &str, key: Option<Key>) -> Result<(), FormError> {
        self.set(field, key)
    }

    /// The row image a store keeps after committing this record.
    #[must_use]
    pub(crate) fn stored(&self) -> Self {
        let mut row = self.clone();
        row.persisted = true;
        row.changed.clear();
        row.invalid.clear();
        row.marked_for_destruction = false;

        row
    }
}

///
/// TESTS
///
