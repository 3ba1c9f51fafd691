//! Error aggregation across one node and its children.

use crate::{
    form::{ChildForm, FormDefinition},
    record::Record,
    validate::{ErrorMap, QualifiedContext, Rule},
};
use std::sync::Arc;

///
/// NodeValidation
/// Everything one node contributes to validation.
///

pub(crate) struct NodeValidation<'a> {
    pub(crate) qualifier: Option<&'static str>,
    pub(crate) definition: &'a FormDefinition,
    pub(crate) rules: &'a [Arc<dyn Rule>],
    pub(crate) record: &'a Record,
    pub(crate) children: &'a mut [ChildForm],
}

impl NodeValidation<'_> {
    /// Rebuild `errors` from scratch: the record's own validation, the
    /// declared rules, then every child's already-qualified errors.
    ///
    /// Records marked for destruction are not validated.
    pub(crate) fn run(self, errors: &mut ErrorMap) -> bool {
        errors.clear();
        if self.record.is_marked_for_destruction() {
            return true;
        }

        {
            let mut ctx = QualifiedContext::new(self.qualifier, errors);
            self.record.validate(&mut ctx);
            for rule in self.definition.rules().iter().chain(self.rules) {
                rule.validate(self.record, &mut ctx);
            }
        }

        for child in self.children.iter_mut() {
            child.validate();
            errors.merge(child.errors());
        }

        errors.is_empty()
    }
}
