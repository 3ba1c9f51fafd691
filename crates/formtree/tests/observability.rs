use formtree::{
    core::obs::{EventSink, FormEvent, event_report, event_reset, with_event_sink},
    prelude::*,
};
use formtree_testing_fixtures::project_form;
use serde_json::json;
use std::{cell::RefCell, rc::Rc};

///
/// CaptureSink
///

#[derive(Default)]
struct CaptureSink {
    events: RefCell<Vec<FormEvent>>,
}

impl EventSink for CaptureSink {
    fn record(&self, event: &FormEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn submission() -> Params {
    Params::from_json(json!({
        "name": "Apollo",
        "owner_attributes": { "name": "Ann" },
        "tasks_attributes": { "0": { "name": "design", "sub_tasks_attributes": { "0": { "name": "" } } } },
        "contributors_attributes": { "0": { "name": "Bea" }, "1": { "name": "" } },
    }))
    .unwrap()
}

#[test]
fn scoped_sink_sees_tree_events_in_order() {
    let sink = Rc::new(CaptureSink::default());
    let mut store = MemoryStore::new();

    let saved = with_event_sink(sink.clone(), || {
        let mut tree = FormTree::fresh(project_form());
        tree.submit(&submission()).unwrap();
        tree.save(&mut store).unwrap()
    });
    assert!(saved);

    let events = sink.events.borrow();
    assert_eq!(
        events.first(),
        Some(&FormEvent::Submit {
            entity: "project",
            association: None,
            keys: 4,
        })
    );
    assert!(events.contains(&FormEvent::BelongsToRebuilt { association: "owner" }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, FormEvent::MemberRemoved { persisted: false, .. }))
            .count(),
        2
    );
    assert_eq!(
        events.last(),
        Some(&FormEvent::Save {
            entity: "project",
            inserts: 5,
            updates: 0,
            deletes: 0,
        })
    );
}

#[test]
fn default_sink_counts_per_thread() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    event_reset();

    let mut store = MemoryStore::new();
    let mut tree = FormTree::fresh(project_form());
    assert!(!tree.validate());
    tree.submit(&submission()).unwrap();
    assert!(tree.save(&mut store).unwrap());

    let report = event_report();
    assert_eq!(report.ops.submit_calls, 9);
    assert_eq!(report.ops.validate_calls, 2);
    assert_eq!(report.ops.invalid_validations, 1);
    assert_eq!(report.ops.save_calls, 1);
    assert_eq!(report.ops.rows_inserted, 5);
    assert_eq!(report.ops.belongs_to_rebuilds, 1);
    assert_eq!(report.entities["project"].save_calls, 1);

    event_reset();
    assert_eq!(event_report(), Default::default());
}

#[test]
fn failed_commits_are_reported() {
    let sink = Rc::new(CaptureSink::default());
    let mut store = MemoryStore::new();
    store.fail_commits(Some("offline"));

    let result = with_event_sink(sink.clone(), || {
        let mut tree = FormTree::fresh(project_form());
        tree.submit(&submission()).unwrap();
        tree.save(&mut store)
    });

    assert!(result.is_err());
    assert_eq!(
        sink.events.borrow().last(),
        Some(&FormEvent::CommitFailed {
            entity: "project",
            reason: "store unavailable: offline".to_string(),
        })
    );
}
