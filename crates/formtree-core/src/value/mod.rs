pub(crate) mod cast;

#[cfg(test)]
mod tests;

use crate::types::Key;
use std::fmt::{self, Display};
use time::{Date, PrimitiveDateTime};

// re-exports
pub use cast::{CastError, cast};

///
/// Value
/// One attribute value held by a record or submitted as a param.
///
/// Null      → the attribute has no value (SQL NULL / blank form field).
/// Composite → a value object assembled from ordered parts.
///

#[derive(Clone, Debug, PartialEq)]
#[remain::sorted]
pub enum Value {
    Bool(bool),
    Composite(CompositeValue),
    Date(Date),
    DateTime(PrimitiveDateTime),
    Float(f64),
    Int(i64),
    Key(Key),
    Null,
    Text(String),
}

impl Value {
    /// Blank values are `Null` and text that is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_key(&self) -> Option<Key> {
        match self {
            Self::Key(key) => Some(*key),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date_time(&self) -> Option<PrimitiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Stable label for the variant, used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Composite(_) => "composite",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Key(_) => "key",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Composite(c) => write!(f, "{c}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{} {}", dt.date(), dt.time()),
            Self::Float(x) => write!(f, "{x}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Key(k) => write!(f, "{k}"),
            Self::Null => f.write_str("nil"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<Date> for Value {
    fn from(date: Date) -> Self {
        Self::Date(date)
    }
}

impl From<PrimitiveDateTime> for Value {
    fn from(dt: PrimitiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<CompositeValue> for Value {
    fn from(c: CompositeValue) -> Self {
        Self::Composite(c)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

///
/// CompositeValue
///
/// Value object built from ordered parts (money, coordinates, ranges).
/// The owning `CompositeModel` decides how parts are checked.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompositeValue {
    pub type_name: &'static str,
    pub parts: Vec<Value>,
}

impl CompositeValue {
    #[must_use]
    pub const fn new(type_name: &'static str, parts: Vec<Value>) -> Self {
        Self { type_name, parts }
    }

    #[must_use]
    pub fn part(&self, index: usize) -> Option<&Value> {
        self.parts.get(index)
    }
}

impl Display for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str(")")
    }
}
