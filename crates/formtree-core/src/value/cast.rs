use crate::{model::FieldKind, types::Key, value::Value};
use std::sync::OnceLock;
use thiserror::Error as ThisError;
use time::{
    Date, PrimitiveDateTime, Time,
    format_description::{self, BorrowedFormatItem},
};

static DATE_FORMAT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();
static DATE_TIME_FORMATS: OnceLock<Vec<Vec<BorrowedFormatItem<'static>>>> = OnceLock::new();

const DATE_TIME_PATTERNS: [&str; 4] = [
    "[year]-[month]-[day] [hour]:[minute]:[second]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    "[year]-[month]-[day] [hour]:[minute]",
    "[year]-[month]-[day]T[hour]:[minute]",
];

const TRUE_WORDS: [&str; 5] = ["1", "true", "t", "on", "yes"];
const FALSE_WORDS: [&str; 5] = ["0", "false", "f", "off", "no"];

///
/// CastError
///
/// A submitted value could not be read as the declared field kind.
/// Recorded on the record and reported through validation.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("cannot read '{found}' as {expected}")]
pub struct CastError {
    pub expected: &'static str,
    pub found: String,
}

impl CastError {
    fn new(kind: &FieldKind, found: &Value) -> Self {
        Self {
            expected: kind.label(),
            found: found.to_string(),
        }
    }
}

/// Cast a submitted value to the declared field kind.
///
/// Blank text becomes `Null` for every kind except `Text`, which keeps the
/// submitted string as-is.
pub fn cast(kind: &FieldKind, value: Value) -> Result<Value, CastError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if value.is_blank() && !matches!(kind, FieldKind::Text) {
        return Ok(Value::Null);
    }

    let cast = match (kind, &value) {
        (FieldKind::Text, Value::Text(_)) => Some(value.clone()),
        (FieldKind::Text, Value::Composite(_)) => None,
        (FieldKind::Text, other) => Some(Value::Text(other.to_string())),

        (FieldKind::Int, Value::Int(_)) => Some(value.clone()),
        (FieldKind::Int, Value::Key(k)) => i64::try_from(k.get()).ok().map(Value::Int),
        (FieldKind::Int, Value::Float(x)) => float_to_int(*x).map(Value::Int),
        (FieldKind::Int, Value::Text(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

        (FieldKind::Float, Value::Float(_)) => Some(value.clone()),
        (FieldKind::Float, Value::Int(n)) => Some(Value::Float(int_to_float(*n))),
        (FieldKind::Float, Value::Text(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

        (FieldKind::Key, _) => Key::from_value(&value).map(Value::Key),

        (FieldKind::Bool, Value::Bool(_)) => Some(value.clone()),
        (FieldKind::Bool, Value::Int(0)) => Some(Value::Bool(false)),
        (FieldKind::Bool, Value::Int(1)) => Some(Value::Bool(true)),
        (FieldKind::Bool, Value::Text(s)) => parse_bool(s).map(Value::Bool),

        (FieldKind::Date, Value::Date(_)) => Some(value.clone()),
        (FieldKind::Date, Value::DateTime(dt)) => Some(Value::Date(dt.date())),
        (FieldKind::Date, Value::Text(s)) => parse_date(s).map(Value::Date),

        (FieldKind::Time | FieldKind::Timestamp, Value::DateTime(_)) => Some(value.clone()),
        (FieldKind::Time | FieldKind::Timestamp, Value::Date(d)) => {
            Some(Value::DateTime(PrimitiveDateTime::new(*d, Time::MIDNIGHT)))
        }
        (FieldKind::Time | FieldKind::Timestamp, Value::Text(s)) => {
            parse_date_time(s).map(Value::DateTime)
        }

        (FieldKind::Composite(model), Value::Composite(c)) if c.type_name == model.name => {
            Some(value.clone())
        }

        _ => None,
    };

    cast.ok_or_else(|| CastError::new(kind, &value))
}

/// Read a submitted boolean flag the way HTML forms send them.
#[must_use]
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim().to_ascii_lowercase();

    if TRUE_WORDS.contains(&s.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&s.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[expect(clippy::cast_precision_loss)]
pub(crate) const fn int_to_float(n: i64) -> f64 {
    n as f64
}

#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_int(x: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, which is already out of range.
    let in_range = x >= i64::MIN as f64 && x < i64::MAX as f64;

    (x.fract() == 0.0 && in_range).then_some(x as i64)
}

fn parse_date(s: &str) -> Option<Date> {
    let format = DATE_FORMAT.get_or_init(|| {
        format_description::parse("[year]-[month]-[day]").expect("static date format")
    });

    Date::parse(s.trim(), format).ok()
}

fn parse_date_time(s: &str) -> Option<PrimitiveDateTime> {
    let formats = DATE_TIME_FORMATS.get_or_init(|| {
        DATE_TIME_PATTERNS
            .into_iter()
            .map(|pattern| format_description::parse(pattern).expect("static datetime format"))
            .collect()
    });

    let s = s.trim();
    formats
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(s, format).ok())
        .or_else(|| parse_date(s).map(|d| PrimitiveDateTime::new(d, Time::MIDNIGHT)))
}
