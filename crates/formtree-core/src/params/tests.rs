use super::*;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn json_objects_keep_key_order() {
    let params = Params::from_json(json!({
        "name": "Form",
        "tasks_attributes": { "1": { "name": "b" }, "0": { "name": "a" } },
    }))
    .unwrap();

    assert_eq!(params.keys().collect::<Vec<_>>(), vec!["name", "tasks_attributes"]);

    let tasks = params.get("tasks_attributes").and_then(Param::as_map).unwrap();
    assert_eq!(tasks.keys().collect::<Vec<_>>(), vec!["1", "0"]);
}

#[test]
fn json_arrays_become_positional_maps() {
    let params = Params::from_json(json!({ "tasks_attributes": [{ "name": "a" }, { "name": "b" }] }))
        .unwrap();

    let tasks = params.get("tasks_attributes").and_then(Param::as_map).unwrap();
    assert_eq!(tasks.keys().collect::<Vec<_>>(), vec!["0", "1"]);
}

#[test]
fn json_scalar_root_is_rejected() {
    assert!(Params::from_json(json!("name")).is_err());
}

#[test]
fn json_null_is_a_null_value() {
    let params = Params::from_json(json!({ "name": null })).unwrap();
    assert_eq!(params.get("name"), Some(&Param::Value(Value::Null)));
}

#[test]
fn insert_replaces_in_place() {
    let mut params = Params::new().with("a", 1).with("b", 2);
    params.insert("a", 3);

    assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(params.get("a"), Some(&Param::from(3)));
}

#[test]
fn remove_keeps_remaining_order() {
    let mut params = Params::new().with("a", 1).with("b", 2).with("c", 3);

    assert_eq!(params.remove("a"), Some(Param::from(1)));
    assert_eq!(params.remove("a"), None);
    assert_eq!(params.keys().collect::<Vec<_>>(), vec!["b", "c"]);
}

#[test]
fn equality_depends_on_order() {
    let ab = Params::new().with("a", 1).with("b", 2);
    let ba = Params::new().with("b", 2).with("a", 1);

    assert_ne!(ab, ba);
    assert_eq!(ab, Params::new().with("a", 1).with("b", 2));
}

#[test]
fn large_positional_payload_keeps_every_key() {
    let members = (0..5_000).map(|i| (i.to_string(), json!({ "name": i })));
    let params = Params::from_json(json!({
        "tasks_attributes": serde_json::Map::from_iter(members),
    }))
    .unwrap();

    let tasks = params.get("tasks_attributes").and_then(Param::as_map).unwrap();
    assert_eq!(tasks.len(), 5_000);
    assert_eq!(tasks.keys().next(), Some("0"));
    assert_eq!(tasks.keys().last(), Some("4999"));
}

#[test]
fn reject_payload_ignores_destroy_marker() {
    let blank = Params::new()
        .with("name", "")
        .with("description", "  ")
        .with(DESTROY_KEY, "0");
    assert!(blank.is_reject_payload());

    let filled = blank.clone().with("name", "a");
    assert!(!filled.is_reject_payload());

    let nested = Params::new().with("tags_attributes", Params::new().with("0", Params::new()));
    assert!(!nested.is_reject_payload());
}

#[test]
fn destroy_flag_accepts_checkbox_truthiness() {
    for flag in [Param::from("1"), Param::from("true"), Param::from(true), Param::from(1)] {
        assert!(is_destroy_flag(&flag));
    }
    for flag in [Param::from("0"), Param::from(""), Param::from(false), Param::from(2)] {
        assert!(!is_destroy_flag(&flag));
    }
}

#[test]
fn without_and_scalars_only_filter_copies() {
    let params = Params::new()
        .with(ID_KEY, 5)
        .with("name", "z")
        .with(DESTROY_KEY, "1")
        .with("tags_attributes", Params::new());

    assert_eq!(
        params.without(&[ID_KEY, DESTROY_KEY]).keys().collect::<Vec<_>>(),
        vec!["name", "tags_attributes"]
    );
    assert_eq!(params.scalars_only().len(), 3);
    assert!(params.destroy_requested());
}

proptest! {
    #[test]
    fn insertion_order_is_preserved(keys in prop::collection::vec("[a-z]{1,6}", 0..12)) {
        let mut params = Params::new();
        let mut expected: Vec<String> = Vec::new();
        for key in &keys {
            params.insert(key.clone(), key.as_str());
            if !expected.contains(key) {
                expected.push(key.clone());
            }
        }

        prop_assert_eq!(params.keys().map(str::to_string).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn whitespace_only_values_are_rejected(values in prop::collection::vec("[ \t]{0,4}", 0..6)) {
        let params: Params = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("field_{i}"), Param::from(v.as_str())))
            .collect();

        prop_assert!(params.is_reject_payload());
    }
}
