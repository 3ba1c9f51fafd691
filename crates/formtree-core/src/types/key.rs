use crate::value::Value;
use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// Key
///
/// Store-assigned record identity. Keys are allocated by the store before
/// a commit, so a record can carry its key before it is persisted.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Key(u64);

impl Key {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Read a key from a submitted value (`5`, `"5"`, or an existing key).
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Key(key) => Some(*key),
            Value::Int(n) => u64::try_from(*n).ok().map(Self),
            Value::Text(s) => s.trim().parse::<u64>().ok().map(Self),
            _ => None,
        }
    }
}

impl From<u64> for Key {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

///
/// TESTS
///
