use crate::{
    model::{CompositeModel, FieldKind},
    types::Key,
    value::{CompositeValue, Value, cast},
};
use time::{Date, Month, PrimitiveDateTime, Time};

fn no_parts(_: &[Value]) -> Result<Value, String> {
    Err("unused".to_string())
}

static POINT: CompositeModel = CompositeModel {
    name: "Point",
    construct: no_parts,
};

#[test]
fn blankness_covers_null_and_whitespace_text() {
    assert!(Value::Null.is_blank());
    assert!(Value::from("").is_blank());
    assert!(Value::from("  \t").is_blank());
    assert!(!Value::from("x").is_blank());
    assert!(!Value::Int(0).is_blank());
    assert!(!Value::Bool(false).is_blank());
}

#[test]
fn text_kind_keeps_blank_strings() {
    let v = cast(&FieldKind::Text, Value::from("")).unwrap();
    assert_eq!(v, Value::from(""));
}

#[test]
fn blank_text_becomes_null_for_typed_kinds() {
    for kind in [
        FieldKind::Int,
        FieldKind::Float,
        FieldKind::Bool,
        FieldKind::Date,
        FieldKind::Timestamp,
        FieldKind::Key,
    ] {
        assert_eq!(cast(&kind, Value::from(" ")).unwrap(), Value::Null);
    }
}

#[test]
fn numeric_text_is_parsed() {
    assert_eq!(cast(&FieldKind::Int, Value::from("12")).unwrap(), Value::Int(12));
    assert_eq!(
        cast(&FieldKind::Float, Value::from("1.5")).unwrap(),
        Value::Float(1.5)
    );
    assert_eq!(
        cast(&FieldKind::Key, Value::from("3")).unwrap(),
        Value::Key(Key::new(3))
    );
}

#[test]
fn whole_floats_cast_to_int_within_range() {
    assert_eq!(cast(&FieldKind::Int, Value::Float(4.0)).unwrap(), Value::Int(4));
    assert_eq!(
        cast(&FieldKind::Int, Value::Float(-9_223_372_036_854_775_808.0)).unwrap(),
        Value::Int(i64::MIN)
    );

    assert!(cast(&FieldKind::Int, Value::Float(4.5)).is_err());
    assert!(cast(&FieldKind::Int, Value::Float(9_223_372_036_854_775_808.0)).is_err());
}

#[test]
fn bad_numeric_text_is_a_cast_error() {
    let err = cast(&FieldKind::Int, Value::from("twelve")).unwrap_err();
    assert_eq!(err.expected, "integer");
    assert_eq!(err.found, "twelve");
}

#[test]
fn checkbox_words_cast_to_bool() {
    assert_eq!(cast(&FieldKind::Bool, Value::from("1")).unwrap(), Value::Bool(true));
    assert_eq!(cast(&FieldKind::Bool, Value::from("off")).unwrap(), Value::Bool(false));
    assert!(cast(&FieldKind::Bool, Value::from("maybe")).is_err());
}

#[test]
fn dates_and_timestamps_parse_from_text() {
    let date = Date::from_calendar_date(2020, Month::March, 15).unwrap();
    assert_eq!(
        cast(&FieldKind::Date, Value::from("2020-03-15")).unwrap(),
        Value::Date(date)
    );

    let dt = PrimitiveDateTime::new(date, Time::from_hms(9, 30, 0).unwrap());
    assert_eq!(
        cast(&FieldKind::Timestamp, Value::from("2020-03-15 09:30")).unwrap(),
        Value::DateTime(dt)
    );
    assert_eq!(
        cast(&FieldKind::Timestamp, Value::from("2020-03-15T09:30:00")).unwrap(),
        Value::DateTime(dt)
    );
}

#[test]
fn composite_cast_requires_matching_type() {
    let point = Value::Composite(CompositeValue::new("Point", vec![Value::Int(1)]));
    let other = Value::Composite(CompositeValue::new("Money", vec![Value::Int(1)]));

    assert!(cast(&FieldKind::Composite(&POINT), point).is_ok());
    assert!(cast(&FieldKind::Composite(&POINT), other).is_err());
}

#[test]
fn display_renders_null_as_nil() {
    assert_eq!(Value::Null.to_string(), "nil");
    let money = CompositeValue::new("Money", vec![Value::Int(10), Value::from("EUR")]);
    assert_eq!(money.to_string(), "Money(10, EUR)");
}
