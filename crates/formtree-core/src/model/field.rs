use crate::value::Value;
use std::fmt::{self, Debug};

///
/// FieldModel
/// Runtime field metadata used by assignment, casting, and multiparameter assembly.
///

#[derive(Debug)]
pub struct FieldModel {
    /// Field name as used in params and error keys.
    pub name: &'static str,
    /// Declared value shape.
    pub kind: FieldKind,
}

///
/// FieldKind
///
/// Time   → a time of day; the date part defaults to 1970-01-01.
/// Timestamp → a full date and time.
///

#[derive(Clone, Copy, Debug)]
#[remain::sorted]
pub enum FieldKind {
    Bool,
    Composite(&'static CompositeModel),
    Date,
    Float,
    Int,
    Key,
    Text,
    Time,
    Timestamp,
}

impl FieldKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Composite(model) => model.name,
            Self::Date => "date",
            Self::Float => "number",
            Self::Int => "integer",
            Self::Key => "id",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }
}

///
/// CompositeModel
///
/// A value type assembled from ordered parts. `construct` receives the
/// parts in position order (1-based positions, 0-based slice) and either
/// builds the value or explains why the parts are unusable.
///

pub struct CompositeModel {
    pub name: &'static str,
    pub construct: fn(&[Value]) -> Result<Value, String>,
}

impl Debug for CompositeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
