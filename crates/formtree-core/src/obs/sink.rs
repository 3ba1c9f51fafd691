//! Event sink boundary.
//!
//! Form code calls `record` and nothing else. The default sink writes a
//! structured `tracing` event and bumps the thread-local counters; tests can
//! swap it for the duration of a closure with `with_event_sink`.
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = const { RefCell::new(None) };
}

///
/// FormEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormEvent {
    Submit {
        entity: &'static str,
        association: Option<&'static str>,
        keys: usize,
    },
    Validate {
        entity: &'static str,
        valid: bool,
        errors: usize,
    },
    MemberAdded {
        association: &'static str,
    },
    MemberRemoved {
        association: &'static str,
        persisted: bool,
    },
    BelongsToRebuilt {
        association: &'static str,
    },
    Save {
        entity: &'static str,
        inserts: u64,
        updates: u64,
        deletes: u64,
    },
    CommitFailed {
        entity: &'static str,
        reason: String,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: &FormEvent);
}

/// GlobalEventSink
/// Default sink: one `tracing` event plus counter updates per form event.

pub(crate) struct GlobalEventSink;

impl EventSink for GlobalEventSink {
    fn record(&self, event: &FormEvent) {
        trace(event);

        metrics::with_state_mut(|m| match event {
            FormEvent::Submit { entity, .. } => {
                m.ops.submit_calls = m.ops.submit_calls.saturating_add(1);
                let entry = m.entities.entry((*entity).to_string()).or_default();
                entry.submit_calls = entry.submit_calls.saturating_add(1);
            }

            FormEvent::Validate { entity, valid, .. } => {
                m.ops.validate_calls = m.ops.validate_calls.saturating_add(1);
                if !valid {
                    m.ops.invalid_validations = m.ops.invalid_validations.saturating_add(1);
                }
                let entry = m.entities.entry((*entity).to_string()).or_default();
                entry.validate_calls = entry.validate_calls.saturating_add(1);
            }

            FormEvent::MemberAdded { .. } => {
                m.ops.members_added = m.ops.members_added.saturating_add(1);
            }

            FormEvent::MemberRemoved { .. } => {
                m.ops.members_removed = m.ops.members_removed.saturating_add(1);
            }

            FormEvent::BelongsToRebuilt { .. } => {
                m.ops.belongs_to_rebuilds = m.ops.belongs_to_rebuilds.saturating_add(1);
            }

            FormEvent::Save {
                entity,
                inserts,
                updates,
                deletes,
            } => {
                m.ops.save_calls = m.ops.save_calls.saturating_add(1);
                m.ops.rows_inserted = m.ops.rows_inserted.saturating_add(*inserts);
                m.ops.rows_updated = m.ops.rows_updated.saturating_add(*updates);
                m.ops.rows_deleted = m.ops.rows_deleted.saturating_add(*deletes);
                let entry = m.entities.entry((*entity).to_string()).or_default();
                entry.save_calls = entry.save_calls.saturating_add(1);
            }

            FormEvent::CommitFailed { .. } => {
                m.ops.commit_failures = m.ops.commit_failures.saturating_add(1);
            }
        });
    }
}

fn trace(event: &FormEvent) {
    match event {
        FormEvent::Submit {
            entity,
            association,
            keys,
        } => tracing::debug!(entity, association = association.unwrap_or(""), keys, "form submit"),
        FormEvent::Validate {
            entity,
            valid,
            errors,
        } => tracing::debug!(entity, valid, errors, "form validate"),
        FormEvent::MemberAdded { association } => {
            tracing::trace!(association, "collection member added");
        }
        FormEvent::MemberRemoved {
            association,
            persisted,
        } => tracing::trace!(association, persisted, "collection member removed"),
        FormEvent::BelongsToRebuilt { association } => {
            tracing::trace!(association, "belongs-to record rebuilt");
        }
        FormEvent::Save {
            entity,
            inserts,
            updates,
            deletes,
        } => tracing::info!(entity, inserts, updates, deletes, "form saved"),
        FormEvent::CommitFailed { entity, reason } => {
            tracing::warn!(entity, reason = reason.as_str(), "form commit failed");
        }
    }
}

pub(crate) const GLOBAL_EVENT_SINK: GlobalEventSink = GlobalEventSink;

pub(crate) fn record(event: FormEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(&event),
        None => GLOBAL_EVENT_SINK.record(&event),
    }
}

/// Snapshot the counters kept by the default sink on this thread.
#[must_use]
pub fn event_report() -> EventReport {
    metrics::report()
}

/// Reset the counters kept by the default sink on this thread.
pub fn event_reset() {
    metrics::reset();
}

/// Run a closure with a temporary event sink override.
pub fn with_event_sink<T>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn EventSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Capture(RefCell<Vec<FormEvent>>);

    impl EventSink for Capture {
        fn record(&self, event: &FormEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn override_captures_and_restores() {
        event_reset();
        let capture = Rc::new(Capture::default());

        with_event_sink(capture.clone(), || {
            record(FormEvent::MemberAdded { association: "tasks" });
        });
        record(FormEvent::MemberAdded { association: "tasks" });

        assert_eq!(capture.0.borrow().len(), 1);
        assert_eq!(event_report().ops.members_added, 1);
    }

    #[test]
    fn global_sink_counts_saves_per_entity() {
        event_reset();
        record(FormEvent::Save {
            entity: "project",
            inserts: 3,
            updates: 1,
            deletes: 2,
        });

        let report = event_report();
        assert_eq!(report.ops.rows_inserted, 3);
        assert_eq!(report.ops.rows_deleted, 2);
        assert_eq!(report.entities["project"].save_calls, 1);
    }
}
