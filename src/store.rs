//! Calendar State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::calendar::{merge_sources, CalendarView, ViewWindow};
use crate::models::{CalendarEntry, EntryKind};

/// Calendar state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct CalendarState {
    /// Entries of the assignment source for the current window
    pub assignments: Vec<CalendarEntry>,
    /// Entries of the event source for the current window
    pub events: Vec<CalendarEntry>,
    /// Visible date window
    pub window: ViewWindow,
    /// Sources still loading for the current window
    pub pending: u32,
}

impl CalendarState {
    pub fn new(window: ViewWindow) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }
}

pub type CalendarStore = Store<CalendarState>;

pub fn use_calendar_store() -> CalendarStore {
    expect_context::<CalendarStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the entries of one source
pub fn store_set_source(store: &CalendarStore, kind: EntryKind, entries: Vec<CalendarEntry>) {
    match kind {
        EntryKind::Assignment => store.assignments().set(entries),
        EntryKind::Event => store.events().set(entries),
    }
}

/// Both sources merged and sorted (reactive)
pub fn store_entries(store: &CalendarStore) -> Vec<CalendarEntry> {
    merge_sources(&store.assignments().read(), &store.events().read())
}

pub fn store_window(store: &CalendarStore) -> ViewWindow {
    store.window().get()
}

pub fn store_prev(store: &CalendarStore) {
    store.window().update(|w| *w = w.prev());
}

pub fn store_next(store: &CalendarStore) {
    store.window().update(|w| *w = w.next());
}

pub fn store_today(store: &CalendarStore) {
    store.window().update(|w| *w = w.today());
}

pub fn store_set_view(store: &CalendarStore, view: CalendarView) {
    store.window().update(|w| *w = w.with_view(view));
}

/// Switch to the day view of a date (month cell header click)
pub fn store_show_day(store: &CalendarStore, day: chrono::NaiveDate) {
    store.window().set(ViewWindow::new(CalendarView::Day, day));
}

pub fn store_pending(store: &CalendarStore) -> u32 {
    store.pending().get()
}

pub fn store_begin_load(store: &CalendarStore, sources: u32) {
    store.pending().set(sources);
}

pub fn store_finish_source(store: &CalendarStore) {
    store.pending().update(|p| *p = p.saturating_sub(1));
}
