//! Validation plumbing shared by every form node.
//!
//! Nodes never evaluate rules themselves: they hand a `ValidationContext`
//! to the record and to each declared `Rule`, and the context decides how
//! reported issues are keyed.

mod context;
mod errors;
mod rule;

pub use context::{BASE_KEY, Issue, QualifiedContext, ValidationContext, qualify};
pub use errors::ErrorMap;
pub use rule::{FnRule, Presence, Rule, rule_fn};
