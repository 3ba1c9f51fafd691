use crate::{
    error::FormError,
    form::{AssociationDescriptor, DeclareValidation, SingularForm},
    multiparam::MultiparameterAssignmentErrors,
    obs::{FormEvent, sink::record as emit},
    params::{DESTROY_KEY, ID_KEY, Param, Params},
    record::Record,
    store::Store,
    types::Key,
    validate::{ErrorMap, Rule},
};
use std::sync::Arc;

///
/// CollectionForm
///
/// Member forms for a has-many association.
///
/// Members removed by a submission move to `removed`: they no longer take
/// part in validation but their records are deleted on save.
///

#[derive(Debug)]
pub struct CollectionForm {
    descriptor: AssociationDescriptor,
    members: Vec<SingularForm>,
    removed: Vec<SingularForm>,
    errors: ErrorMap,
    rules: Vec<Arc<dyn Rule>>,
}

impl CollectionForm {
    /// One member per related row for a saved parent, otherwise
    /// `initial_count` empty members.
    pub(crate) fn build(
        descriptor: &AssociationDescriptor,
        parent: &Record,
        store: &dyn Store,
    ) -> Result<Self, FormError> {
        if !parent.is_persisted() {
            return Ok(Self::fresh(descriptor));
        }

        let members = store
            .load_many(parent, descriptor.association)?
            .into_iter()
            .map(|record| SingularForm::with_record(descriptor, record, store))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_members(descriptor, members))
    }

    pub(crate) fn fresh(descriptor: &AssociationDescriptor) -> Self {
        let members = (0..descriptor.initial_count)
            .map(|_| SingularForm::fresh(descriptor))
            .collect();

        Self::with_members(descriptor, members)
    }

    fn with_members(descriptor: &AssociationDescriptor, members: Vec<SingularForm>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            members,
            removed: Vec::new(),
            errors: ErrorMap::new(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub const fn descriptor(&self) -> &AssociationDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Active members in order.
    #[must_use]
    pub fn members(&self) -> &[SingularForm] {
        &self.members
    }

    #[must_use]
    pub fn member(&self, index: usize) -> Option<&SingularForm> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut SingularForm> {
        self.members.get_mut(index)
    }

    /// Members taken out of the active set, pending deletion.
    #[must_use]
    pub fn removed(&self) -> &[SingularForm] {
        &self.removed
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Records of the active members.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.members.iter().map(SingularForm::record)
    }

    /// Append an empty member and return it.
    pub fn add_member(&mut self) -> &mut SingularForm {
        let member = SingularForm::fresh(&self.descriptor).with_rules(&self.rules);
        self.push_member(member)
    }

    /// Apply a mapping of member payloads.
    ///
    /// A saved parent addresses members by `id`; an unsaved parent by
    /// position. Entries are processed in the order given, so positions
    /// refer to the member list as it stands when each entry is reached.
    ///
    /// A member is removed by a truthy `_destroy` marker: `"1"`, any true
    /// checkbox word such as `"true"` or `"yes"`, boolean `true`, or `1`.
    pub fn submit(&mut self, parent: &Record, params: &Params) -> Result<(), FormError> {
        emit(FormEvent::Submit {
            entity: self.descriptor.association.target.entity_name,
            association: Some(self.descriptor.name),
            keys: params.len(),
        });

        let mut failed = MultiparameterAssignmentErrors::default();
        for (key, param) in params.iter() {
            let Param::Map(attributes) = param else {
                return Err(FormError::UnexpectedScalarPayload {
                    key: format!("{}[{key}]", self.descriptor.name),
                });
            };

            let result = if parent.is_persisted() {
                self.submit_identified(attributes)
            } else {
                self.submit_positional(key, attributes)
            };
            failed.absorb(result)?;
        }

        failed.into_result()
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for member in &mut self.members {
            member.validate();
            self.errors.merge(member.errors());
        }

        self.errors.is_empty()
    }

    /// Take over the collection-wide rules of a node this one replaces.
    /// Rules declared on a single member stay with that member.
    pub(crate) fn inherit_rules(&mut self, previous: &Self) {
        for rule in &previous.rules {
            self.declare_validation(Arc::clone(rule));
        }
    }

    pub(crate) fn members_mut(&mut self) -> &mut [SingularForm] {
        &mut self.members
    }

    fn submit_identified(&mut self, attributes: &Params) -> Result<(), FormError> {
        let id = match attributes.get(ID_KEY) {
            Some(Param::Value(value)) if !value.is_blank() => value,
            Some(Param::Map(_)) => {
                return Err(FormError::UnexpectedNestedPayload {
                    key: ID_KEY.to_string(),
                });
            }
            _ => return self.append(attributes),
        };

        let association = self.descriptor.name;
        let key = Key::from_value(id).ok_or_else(|| FormError::InvalidKey {
            association,
            value: id.to_string(),
        })?;
        let index = self
            .members
            .iter()
            .position(|member| member.record().key() == Some(key))
            .ok_or(FormError::UnknownRecord { association, key })?;

        let result = self.members[index].submit(&attributes.without(&[ID_KEY, DESTROY_KEY]));

        if attributes.destroy_requested() {
            self.remove(index);
        }

        result
    }

    fn submit_positional(&mut self, key: &str, attributes: &Params) -> Result<(), FormError> {
        let index = key
            .trim()
            .parse::<usize>()
            .map_err(|_| FormError::InvalidPositionalKey {
                association: self.descriptor.name,
                key: key.to_string(),
            })?;

        if index >= self.members.len() {
            return self.append(attributes);
        }

        if attributes.is_reject_payload() {
            let member = self.remove(index);
            return member.submit(attributes);
        }

        self.members[index].submit(attributes)
    }

    fn append(&mut self, attributes: &Params) -> Result<(), FormError> {
        let mut member = SingularForm::fresh(&self.descriptor).with_rules(&self.rules);
        let result = member.submit(attributes);
        self.push_member(member);

        result
    }

    fn push_member(&mut self, member: SingularForm) -> &mut SingularForm {
        emit(FormEvent::MemberAdded {
            association: self.descriptor.name,
        });

        self.members.push(member);
        let last = self.members.len() - 1;

        &mut self.members[last]
    }

    /// Move a member out of the active set and mark its record.
    fn remove(&mut self, index: usize) -> &mut SingularForm {
        let mut member = self.members.remove(index);
        member.delete();

        emit(FormEvent::MemberRemoved {
            association: self.descriptor.name,
            persisted: member.record().is_persisted(),
        });

        self.removed.push(member);
        let last = self.removed.len() - 1;

        &mut self.removed[last]
    }
}

impl DeclareValidation for CollectionForm {
    fn declare_validation(&mut self, rule: Arc<dyn Rule>) {
        for member in &mut self.members {
            member.declare_validation(Arc::clone(&rule));
        }
        self.rules.push(rule);
    }
}
