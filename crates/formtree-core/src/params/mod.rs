//! Submitted parameters.
//!
//! `Params` is the nested, ordered key/value tree a caller extracts from a
//! request. Order is kept exactly as delivered: positional collection
//! submissions depend on it.

mod key;

#[cfg(test)]
mod tests;

use crate::{
    types::Key,
    value::{Value, cast::parse_bool},
};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;
use time::{Date, PrimitiveDateTime};

// re-exports
pub use key::{ATTRIBUTES_SUFFIX, Fragment, FragmentCast, association_name};

/// Key carrying a record's identity inside a nested payload.
pub const ID_KEY: &str = "id";

/// Key flagging a nested record for destruction.
pub const DESTROY_KEY: &str = "_destroy";

///
/// Param
/// One submitted entry: a scalar value or a nested mapping.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    Value(Value),
    Map(Params),
}

impl Param {
    /// Scalars are blank per `Value::is_blank`; maps only when empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Value(value) => value.is_blank(),
            Self::Map(map) => map.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Map(_) => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Params> {
        match self {
            Self::Map(map) => Some(map),
            Self::Value(_) => None,
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! impl_param_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_param_from_scalar!(bool, i32, i64, f64, &str, String, Key, Date, PrimitiveDateTime);

impl From<Params> for Param {
    fn from(map: Params) -> Self {
        Self::Map(map)
    }
}

///
/// Params
///
/// Ordered mapping of submitted keys. Inserting an existing key replaces
/// its value in place and keeps its original position. Two mappings are
/// equal only when their entries match in order.
///

#[derive(Clone, Debug, Default)]
pub struct Params {
    entries: IndexMap<String, Param>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key; later entries keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Param> {
        self.entries.shift_remove(key)
    }

    /// Copy of this mapping minus the given keys.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        self.entries
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Copy holding only the scalar entries.
    #[must_use]
    pub fn scalars_only(&self) -> Self {
        self.entries
            .iter()
            .filter(|(_, v)| matches!(v, Param::Value(_)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry is either the destroy marker or blank.
    ///
    /// An empty mapping is a reject payload: it carries no data.
    #[must_use]
    pub fn is_reject_payload(&self) -> bool {
        self.entries
            .iter()
            .all(|(k, v)| k == DESTROY_KEY || v.is_blank())
    }

    /// True when the mapping carries a truthy `_destroy` marker.
    #[must_use]
    pub fn destroy_requested(&self) -> bool {
        self.get(DESTROY_KEY).is_some_and(is_destroy_flag)
    }

    /// Parse a JSON object into params, keeping key order.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<(String, Param)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, Param);
    type IntoIter = indexmap::map::IntoIter<String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Truthy destroy markers: `"1"`, `"true"` (any checkbox word), `true`, `1`.
#[must_use]
pub fn is_destroy_flag(param: &Param) -> bool {
    match param {
        Param::Value(Value::Bool(b)) => *b,
        Param::Value(Value::Int(n)) => *n == 1,
        Param::Value(Value::Text(s)) => parse_bool(s) == Some(true),
        _ => false,
    }
}

///
/// Deserialize
///
/// Maps become `Params` in delivery order; sequences become maps keyed
/// `"0"`, `"1"`, ... so positional submissions can arrive as arrays.
///

impl<'de> Deserialize<'de> for Param {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamVisitor)
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Param::deserialize(deserializer)? {
            Param::Map(map) => Ok(map),
            Param::Value(v) => Err(de::Error::custom(format!(
                "expected a parameter map, found {}",
                v.label()
            ))),
        }
    }
}

struct ParamVisitor;

impl<'de> Visitor<'de> for ParamVisitor {
    type Value = Param;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a parameter value or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Param, E> {
        Ok(Param::Value(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Param, E> {
        Ok(Param::Value(Value::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Param, E> {
        i64::try_from(v)
            .map(|n| Param::Value(Value::Int(n)))
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Param, E> {
        Ok(Param::Value(Value::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Param, E> {
        Ok(Param::Value(Value::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Param, E> {
        Ok(Param::Value(Value::Text(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Param, E> {
        Ok(Param::Value(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Param, E> {
        Ok(Param::Value(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Param, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Param, A::Error> {
        let mut params = Params::new();
        let mut index = 0usize;
        while let Some(item) = seq.next_element::<Param>()? {
            params.insert(index.to_string(), item);
            index += 1;
        }

        Ok(Param::Map(params))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Param, A::Error> {
        let mut params = Params {
            entries: IndexMap::with_capacity(map.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = map.next_entry::<String, Param>()? {
            params.insert(key, value);
        }

        Ok(Param::Map(params))
    }
}
