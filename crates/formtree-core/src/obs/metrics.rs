use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for form operations on this thread.
///

#[derive(Clone, Debug, Default, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Entrypoints
    pub submit_calls: u64,
    pub validate_calls: u64,
    pub save_calls: u64,

    // Outcomes
    pub invalid_validations: u64,
    pub commit_failures: u64,

    // Tree shape changes
    pub members_added: u64,
    pub members_removed: u64,
    pub belongs_to_rebuilds: u64,

    // Rows written
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub rows_deleted: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub submit_calls: u64,
    pub validate_calls: u64,
    pub save_calls: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow counters immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        entities: m.entities.clone(),
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_state() {
        with_state_mut(|m| {
            m.ops.submit_calls = 3;
            m.entities.insert("project".to_string(), EntityCounters::default());
        });

        reset();

        let report = report();
        assert_eq!(report.ops, EventOps::default());
        assert!(report.entities.is_empty());
    }
}
