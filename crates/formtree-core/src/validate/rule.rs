use crate::{record::Record, validate::ValidationContext};
use std::fmt::{self, Debug};

///
/// Rule
///
/// A validation rule declared on a form node. Rules report issues through
/// the context and must not recurse into related records.
///

pub trait Rule: Debug + Send + Sync {
    fn validate(&self, record: &Record, ctx: &mut dyn ValidationContext);
}

///
/// Presence
///

#[derive(Clone, Debug)]
pub struct Presence {
    attributes: Vec<&'static str>,
}

impl Presence {
    #[must_use]
    pub fn new(attributes: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
        }
    }
}

impl Rule for Presence {
    fn validate(&self, record: &Record, ctx: &mut dyn ValidationContext) {
        for attribute in &self.attributes {
            if record.get(attribute).is_none_or(|v| v.is_blank()) {
                ctx.issue_at(attribute, "can't be blank");
            }
        }
    }
}

///
/// FnRule
/// Adapter for closure rules.
///

pub struct FnRule<F>(F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&Record, &mut dyn ValidationContext) + Send + Sync,
{
    fn validate(&self, record: &Record, ctx: &mut dyn ValidationContext) {
        (self.0)(record, ctx);
    }
}

impl<F> Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnRule")
    }
}

/// Wrap a closure as a `Rule`.
pub const fn rule_fn<F>(f: F) -> FnRule<F>
where
    F: Fn(&Record, &mut dyn ValidationContext) + Send + Sync,
{
    FnRule(f)
}
