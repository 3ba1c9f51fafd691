//! Multiparameter assembly.
//!
//! Form widgets may split one attribute over several keys, for example
//! `born_on(1i)`, `born_on(2i)`, `born_on(3i)`. Fragments are grouped by
//! attribute, then each group is assembled into one value according to the
//! declared field kind.

mod error;


use crate::{
    MAX_MULTIPARAMETER_POSITION,
    error::FormError,
    model::{CompositeModel, FieldKind},
    params::{Fragment, FragmentCast},
    record::Record,
    value::{Value, cast::int_to_float},
};
use std::{collections::BTreeMap, ops::RangeInclusive};
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

// re-exports
pub use error::{AttributeAssignmentError, MultiparameterAssignmentErrors, MultiparameterError};

/// Date parts assumed for time-only attributes.
const EPOCH_DATE: [i64; 3] = [1970, 1, 1];

/// Time-like values read at most year, month, day, hour, minute, second.
const TIME_MAX_POSITION: usize = 6;

const DATE_POSITIONS: RangeInclusive<usize> = 1..=3;

///
/// Part
///

#[derive(Clone, Debug, PartialEq)]
struct Part {
    value: Option<Value>,
    cast: Option<FragmentCast>,
}

///
/// FragmentGroup
///
/// All fragments submitted for one attribute, keyed by position.
/// A position that was submitted blank is present but holds no value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentGroup {
    attribute: String,
    parts: BTreeMap<usize, Part>,
}

impl FragmentGroup {
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            parts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Add one fragment. The first non-blank value for a position wins.
    pub fn push(&mut self, position: usize, cast: Option<FragmentCast>, value: Value) {
        let value = (!value.is_blank()).then_some(value);
        let part = self.parts.entry(position).or_insert(Part { value: None, cast });

        if part.value.is_none() {
            part.value = value;
            part.cast = cast;
        }
    }

    #[must_use]
    pub fn is_all_blank(&self) -> bool {
        self.parts.values().all(|part| part.value.is_none())
    }

    /// Submitted values in position order, `nil` for blank positions.
    #[must_use]
    pub fn raw_values(&self) -> Vec<String> {
        self.parts
            .values()
            .map(|part| part.value.as_ref().unwrap_or(&Value::Null).to_string())
            .collect()
    }

    fn value(&self, position: usize) -> Option<&Value> {
        self.parts.get(&position).and_then(|part| part.value.as_ref())
    }

    fn max_position(&self, cap: usize) -> usize {
        self.parts
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .min(cap)
    }

    fn any_blank(&self, positions: RangeInclusive<usize>) -> bool {
        positions.into_iter().any(|p| self.value(p).is_none())
    }

    fn require(&self, positions: RangeInclusive<usize>) -> Result<(), MultiparameterError> {
        match positions.into_iter().find(|p| !self.parts.contains_key(p)) {
            Some(position) => Err(MultiparameterError::MissingParameter {
                attribute: self.attribute.clone(),
                position,
            }),
            None => Ok(()),
        }
    }

    /// Integer component for date and time assembly.
    fn int_at(&self, position: usize) -> Result<Option<i64>, MultiparameterError> {
        let Some(value) = self.value(position) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Int(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed
            .map(Some)
            .ok_or_else(|| MultiparameterError::InvalidComponent {
                position,
                value: value.to_string(),
            })
    }

    /// Fragment value with its key's type hint applied.
    fn typed_at(&self, position: usize) -> Result<Value, MultiparameterError> {
        let Some(part) = self.parts.get(&position) else {
            return Ok(Value::Null);
        };
        let Some(value) = part.value.clone() else {
            return Ok(Value::Null);
        };

        let invalid = |expected| MultiparameterError::InvalidFragment {
            position,
            value: value.to_string(),
            expected,
        };

        match (part.cast, &value) {
            (None, _) | (Some(FragmentCast::Int), Value::Int(_)) => Ok(value.clone()),
            (Some(FragmentCast::Float), Value::Float(_)) => Ok(value.clone()),
            (Some(FragmentCast::Int), Value::Text(s)) => {
                s.trim().parse().map(Value::Int).map_err(|_| invalid("integer"))
            }
            (Some(FragmentCast::Float), Value::Text(s)) => {
                s.trim().parse().map(Value::Float).map_err(|_| invalid("float"))
            }
            (Some(FragmentCast::Float), Value::Int(n)) => Ok(Value::Float(int_to_float(*n))),
            (Some(FragmentCast::Int), _) => Err(invalid("integer")),
            (Some(FragmentCast::Float), _) => Err(invalid("float")),
        }
    }
}

/// Group fragments by attribute, keeping the order attributes first appear.
pub fn group_fragments(fragments: impl IntoIterator<Item = (Fragment, Value)>) -> Vec<FragmentGroup> {
    let mut groups: Vec<FragmentGroup> = Vec::new();

    for (fragment, value) in fragments {
        let index = match groups.iter().position(|g| g.attribute == fragment.attribute) {
            Some(index) => index,
            None => {
                groups.push(FragmentGroup::new(fragment.attribute.clone()));
                groups.len() - 1
            }
        };
        groups[index].push(fragment.position, fragment.cast, value);
    }

    groups
}

/// Assemble one group for the declared field kind.
///
/// `Ok(None)` means no value was supplied and the attribute stays untouched.
pub fn assemble(kind: &FieldKind, group: &FragmentGroup) -> Result<Option<Value>, MultiparameterError> {
    if group.is_all_blank() {
        return Ok(None);
    }

    match kind {
        FieldKind::Time => read_time(group, true),
        FieldKind::Timestamp => read_time(group, false),
        FieldKind::Date => read_date(group),
        FieldKind::Composite(model) => read_composite(model, group).map(Some),
        other => read_scalar(other, group),
    }
}

/// Assemble every group and assign the results to the record.
///
/// Each group is attempted; failures are collected and returned together
/// once all groups have been processed.
pub fn apply(record: &mut Record, groups: Vec<FragmentGroup>) -> Result<(), FormError> {
    let model = record.model();
    let mut failed = MultiparameterAssignmentErrors::default();

    for group in groups {
        let field = model
            .field(&group.attribute)
            .ok_or_else(|| FormError::unknown_attribute(model.entity_name, &group.attribute))?;

        match assemble(&field.kind, &group) {
            Ok(Some(value)) => record.set(field.name, value)?,
            Ok(None) => {}
            Err(source) => failed.errors.push(AttributeAssignmentError {
                values: group.raw_values(),
                attribute: group.attribute,
                source,
            }),
        }
    }

    failed.into_result()
}

fn read_time(group: &FragmentGroup, time_only: bool) -> Result<Option<Value>, MultiparameterError> {
    if !time_only {
        group.require(DATE_POSITIONS)?;
        if group.any_blank(DATE_POSITIONS) {
            return Ok(None);
        }
    }

    let mut date = EPOCH_DATE;
    for (slot, position) in date.iter_mut().zip(DATE_POSITIONS) {
        if let Some(n) = group.int_at(position)? {
            *slot = n;
        }
    }

    let max = group.max_position(TIME_MAX_POSITION);
    let mut clock = [0i64; 3];
    for (slot, position) in clock.iter_mut().zip(4..=max) {
        *slot = group.int_at(position)?.unwrap_or(0);
    }

    normalized(date, clock).map(|dt| Some(Value::DateTime(dt)))
}

fn read_date(group: &FragmentGroup) -> Result<Option<Value>, MultiparameterError> {
    if group.any_blank(DATE_POSITIONS) {
        return Ok(None);
    }

    let mut parts = [0i64; 3];
    for (slot, position) in parts.iter_mut().zip(DATE_POSITIONS) {
        *slot = group.int_at(position)?.unwrap_or(0);
    }

    let date = match calendar_date(parts) {
        Some(date) => date,
        None => normalized(parts, [0; 3])?.date(),
    };

    Ok(Some(Value::Date(date)))
}

fn read_composite(model: &CompositeModel, group: &FragmentGroup) -> Result<Value, MultiparameterError> {
    let max = group.max_position(MAX_MULTIPARAMETER_POSITION);
    group.require(1..=max)?;

    let parts = (1..=max)
        .map(|position| group.typed_at(position))
        .collect::<Result<Vec<_>, _>>()?;

    (model.construct)(&parts).map_err(|reason| MultiparameterError::Construct {
        type_name: model.name,
        reason,
    })
}

// Plain kinds take exactly one fragment; the record casts it on assignment.
fn read_scalar(kind: &FieldKind, group: &FragmentGroup) -> Result<Option<Value>, MultiparameterError> {
    let max = group.max_position(MAX_MULTIPARAMETER_POSITION);
    group.require(1..=max)?;

    if max != 1 {
        return Err(MultiparameterError::UnsupportedKind {
            kind: kind.label(),
            parts: max,
        });
    }

    group.typed_at(1).map(Some)
}

fn calendar_date([year, month, day]: [i64; 3]) -> Option<Date> {
    let year = i32::try_from(year).ok()?;
    let month = u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok())?;
    let day = u8::try_from(day).ok()?;

    Date::from_calendar_date(year, month, day).ok()
}

/// Build a timestamp, letting a day past the end of the month roll over
/// into the next month. Month and clock parts must still be in range.
fn normalized(
    [year, month, day]: [i64; 3],
    [hour, minute, second]: [i64; 3],
) -> Result<PrimitiveDateTime, MultiparameterError> {
    let component = |position: usize, value: i64| MultiparameterError::InvalidComponent {
        position,
        value: value.to_string(),
    };

    let month_of_year = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| component(2, month))?;
    if !(1..=31).contains(&day) {
        return Err(component(3, day));
    }

    let first = i32::try_from(year)
        .ok()
        .and_then(|y| Date::from_calendar_date(y, month_of_year, 1).ok())
        .ok_or_else(|| component(1, year))?;
    let date = first
        .checked_add(Duration::days(day - 1))
        .ok_or_else(|| component(3, day))?;

    let clock_part = |position: usize, value: i64, limit: u8| {
        u8::try_from(value)
            .ok()
            .filter(|v| *v < limit)
            .ok_or_else(|| component(position, value))
    };
    let time = Time::from_hms(
        clock_part(4, hour, 24)?,
        clock_part(5, minute, 60)?,
        clock_part(6, second, 60)?,
    )
    .map_err(|_| component(4, hour))?;

    Ok(PrimitiveDateTime::new(date, time))
}
