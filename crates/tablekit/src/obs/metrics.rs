use serde::Serialize;
use std::cell::RefCell;

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

///
/// EventState
///
/// Ephemeral counters for table data operations. Reset on demand;
/// never persisted.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub data_calls: u64,
    pub count_cache_hits: u64,
    pub count_cache_misses: u64,
    pub count_cache_writes: u64,
    pub rows_loaded: u64,
    pub fetch_all_entries: u64,
}

///
/// Event
///
/// One recorded pipeline event.
///

#[derive(Clone, Copy, Debug)]
pub enum Event {
    DataCall,
    CountCacheHit,
    CountCacheMiss,
    CountCacheWrite,
    RowsLoaded(u64),
    FetchAllEntered,
}

/// Record one event against the thread-local state.
pub(crate) fn record(event: Event) {
    STATE.with(|state| {
        let mut state = state.borrow_mut();

        match event {
            Event::DataCall => state.data_calls += 1,
            Event::CountCacheHit => state.count_cache_hits += 1,
            Event::CountCacheMiss => state.count_cache_misses += 1,
            Event::CountCacheWrite => state.count_cache_writes += 1,
            Event::RowsLoaded(rows) => state.rows_loaded += rows,
            Event::FetchAllEntered => state.fetch_all_entries += 1,
        }
    });
}

/// Snapshot the current counters.
#[must_use]
pub fn report() -> EventState {
    STATE.with(|state| state.borrow().clone())
}

/// Reset all counters to zero.
pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = EventState::default());
}
