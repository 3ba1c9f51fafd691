//! Attribute assignment shared by the root and every singular node.

use crate::{
    error::FormError,
    form::{ChildForm, FormDefinition},
    multiparam::{self, MultiparameterAssignmentErrors, group_fragments},
    params::{DESTROY_KEY, Fragment, ID_KEY, Param, Params, association_name, is_destroy_flag},
    record::Record,
    value::Value,
};

/// Push one parameter map onto a node's record and children.
///
/// Nested maps go to the named child; fragment keys are collected and
/// assembled after every other key has been applied. Assembly failures,
/// this node's and its children's, are gathered and returned together
/// once every key has been tried.
pub(crate) fn apply(
    definition: &FormDefinition,
    record: &mut Record,
    children: &mut [ChildForm],
    params: &Params,
) -> Result<(), FormError> {
    let entity = definition.entity().entity_name;
    let mut fragments = Vec::new();
    let mut failed = MultiparameterAssignmentErrors::default();

    for (key, param) in params.iter() {
        if Fragment::looks_like(key) {
            let fragment = Fragment::parse(key)?;
            if definition.attribute(&fragment.attribute).is_none() {
                return Err(FormError::unknown_attribute(entity, fragment.attribute));
            }
            let Param::Value(value) = param else {
                return Err(FormError::UnexpectedNestedPayload {
                    key: key.to_string(),
                });
            };
            fragments.push((fragment, value.clone()));

            continue;
        }

        match param {
            Param::Map(nested) => {
                let name = association_name(key).ok_or_else(|| FormError::UnexpectedNestedPayload {
                    key: key.to_string(),
                })?;
                let child = children
                    .iter_mut()
                    .find(|child| child.name() == name)
                    .ok_or_else(|| FormError::unknown_association(entity, name))?;

                failed.absorb(child.submit(record, nested))?;
            }
            Param::Value(value) => assign_scalar(definition, record, key, param, value)?,
        }
    }

    if !fragments.is_empty() {
        failed.absorb(multiparam::apply(record, group_fragments(fragments)))?;
    }

    failed.into_result()
}

fn assign_scalar(
    definition: &FormDefinition,
    record: &mut Record,
    key: &str,
    param: &Param,
    value: &Value,
) -> Result<(), FormError> {
    match key {
        ID_KEY => return Ok(()),
        DESTROY_KEY => {
            if is_destroy_flag(param) {
                record.mark_for_destruction();
            }
            return Ok(());
        }
        _ => {}
    }

    // A blank association field is what an empty form section submits.
    if association_name(key).is_some_and(|name| definition.association(name).is_some()) {
        return if value.is_blank() {
            Ok(())
        } else {
            Err(FormError::UnexpectedScalarPayload {
                key: key.to_string(),
            })
        };
    }

    assign_attribute(definition, record, key, value.clone())
}

/// Write one declared attribute.
pub(crate) fn assign_attribute(
    definition: &FormDefinition,
    record: &mut Record,
    name: &str,
    value: Value,
) -> Result<(), FormError> {
    if definition.attribute(name).is_none() {
        return Err(FormError::unknown_attribute(definition.entity().entity_name, name));
    }

    record.set(name, value)
}

/// Read one declared attribute.
pub(crate) fn read_attribute<'a>(
    definition: &FormDefinition,
    record: &'a Record,
    name: &str,
) -> Result<&'a Value, FormError> {
    definition
        .attribute(name)
        .and_then(|_| record.get(name))
        .ok_or_else(|| FormError::unknown_attribute(definition.entity().entity_name, name))
}
