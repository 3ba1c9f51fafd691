use crate::error::FormError;

/// Suffix marking a nested association payload: `tasks_attributes`.
pub const ATTRIBUTES_SUFFIX: &str = "_attributes";

/// Association name for a `<name>_attributes` key.
#[must_use]
pub fn association_name(key: &str) -> Option<&str> {
    key.strip_suffix(ATTRIBUTES_SUFFIX)
        .filter(|name| !name.is_empty())
}

///
/// FragmentCast
/// Type hint carried by a fragment key: `(1i)` or `(2f)`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FragmentCast {
    Int,
    Float,
}

///
/// Fragment
///
/// A parsed multiparameter key `name(position[i|f])`.
/// Positions are 1-based.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragment {
    pub attribute: String,
    pub position: usize,
    pub cast: Option<FragmentCast>,
}

impl Fragment {
    /// True when the key is shaped like a fragment at all.
    #[must_use]
    pub fn looks_like(key: &str) -> bool {
        key.contains('(')
    }

    /// Parse a fragment key. Anything that contains `(` but is not exactly
    /// `name(<digits>[i|f])` is malformed.
    pub fn parse(key: &str) -> Result<Self, FormError> {
        let malformed = || FormError::MalformedMultiparameterKey {
            key: key.to_string(),
        };

        let (attribute, rest) = key.split_once('(').ok_or_else(malformed)?;
        let inner = rest.strip_suffix(')').ok_or_else(malformed)?;
        if attribute.is_empty() || inner.contains(['(', ')']) {
            return Err(malformed());
        }

        let (digits, cast) = match inner.as_bytes().last() {
            Some(b'i') => (&inner[..inner.len() - 1], Some(FragmentCast::Int)),
            Some(b'f') => (&inner[..inner.len() - 1], Some(FragmentCast::Float)),
            _ => (inner, None),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let position = digits.parse::<usize>().map_err(|_| malformed())?;
        if position == 0 {
            return Err(malformed());
        }

        Ok(Self {
            attribute: attribute.to_string(),
            position,
            cast,
        })
    }
}

///
/// TESTS
///
