use crate::validate::ErrorMap;

/// Key used for issues that concern the record as a whole.
pub const BASE_KEY: &str = "base";

///
/// ValidationContext
/// Narrow interface exposed to validators for reporting non-fatal issues.
/// Implemented by short-lived context objects owned by the form node.
///

pub trait ValidationContext {
    fn add_issue(&mut self, issue: Issue);
    fn add_issue_at(&mut self, attribute: &str, issue: Issue);
}

impl dyn ValidationContext + '_ {
    pub fn issue(&mut self, msg: impl Into<String>) {
        self.add_issue(Issue {
            message: msg.into(),
        });
    }

    pub fn issue_at(&mut self, attribute: &str, msg: impl Into<String>) {
        self.add_issue_at(
            attribute,
            Issue {
                message: msg.into(),
            },
        );
    }
}

///
/// Issue
///

#[derive(Clone, Debug, Default)]
pub struct Issue {
    pub message: String,
}

///
/// QualifiedContext
///
/// Writes issues into an `ErrorMap`, prefixing every key with the owning
/// association name when there is one. The root form has no qualifier.
///

pub struct QualifiedContext<'a> {
    qualifier: Option<&'a str>,
    errors: &'a mut ErrorMap,
}

impl<'a> QualifiedContext<'a> {
    #[must_use]
    pub const fn new(qualifier: Option<&'a str>, errors: &'a mut ErrorMap) -> Self {
        Self { qualifier, errors }
    }
}

impl ValidationContext for QualifiedContext<'_> {
    fn add_issue(&mut self, issue: Issue) {
        self.add_issue_at(BASE_KEY, issue);
    }

    fn add_issue_at(&mut self, attribute: &str, issue: Issue) {
        self.errors
            .add(qualify(self.qualifier, attribute), issue.message);
    }
}

/// Render an error key: `<association>.<attribute>`, or the bare attribute
/// for the root.
#[must_use]
pub fn qualify(qualifier: Option<&str>, attribute: &str) -> String {
    match qualifier {
        Some(q) if !q.is_empty() => format!("{q}.{attribute}"),
        _ => attribute.to_string(),
    }
}

///
/// TESTS
///
