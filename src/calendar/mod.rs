//! Calendar Orchestration
//!
//! View windows, grid layout, slot selections, entry click routing and
//! the two event sources.

mod layout;
mod window;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

use crate::commands::{ApiError, PlanningApi};
use crate::models::{CalendarEntry, EntryKind};

pub use layout::{
    all_day_by_day, entries_on_day, entry_span, is_all_day, merge_sources, place_timed, time_label, DayGrid, Placement,
};
pub use window::{day_label, is_weekend, CalendarView, ViewWindow, WEEKDAYS_SHORT};

/// Date (and optional time range) picked on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub date: NaiveDate,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl SlotSelection {
    /// Whole-day selection (month cell)
    pub fn day(date: NaiveDate) -> Self {
        Self { date, start: None, end: None }
    }

    /// Selection from a datetime range; a midnight-to-midnight range carries no times
    pub fn from_range(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start.time() == NaiveTime::MIN && end.time() == NaiveTime::MIN {
            return Self::day(start.date());
        }
        Self {
            date: start.date(),
            start: Some(start.time()),
            end: Some(end.time()),
        }
    }
}

/// What a click on an existing entry opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    ShowDetail(EntryKind, u32),
    EditAssignment(u32),
    EditEvent(u32),
}

/// Read-only viewers get the detail modal, editors the matching form
pub fn route_click(entry: &CalendarEntry, can_edit: bool) -> Option<EntryAction> {
    let id = entry.record_id()?;
    Some(match (can_edit, entry.kind()) {
        (false, kind) => EntryAction::ShowDetail(kind, id),
        (true, EntryKind::Assignment) => EntryAction::EditAssignment(id),
        (true, EntryKind::Event) => EntryAction::EditEvent(id),
    })
}

/// Fetch one source for a window; entries are stamped with the source kind
pub async fn load_source(
    api: &dyn PlanningApi,
    kind: EntryKind,
    window: &ViewWindow,
) -> Result<Vec<CalendarEntry>, ApiError> {
    let (start, end) = (window.start(), window.end());
    let mut entries = match kind {
        EntryKind::Assignment => api.assignments_in_range(start, end).await?,
        EntryKind::Event => api.events_in_range(start, end).await?,
    };
    for entry in &mut entries {
        entry.props.kind = kind;
    }
    debug!("{} {:?} entries for {} .. {}", entries.len(), kind, start, end);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::testing::FakeApi;
    use crate::models::EntryProps;

    fn entry(id: &str, kind: EntryKind) -> CalendarEntry {
        CalendarEntry {
            id: id.to_string(),
            title: "x".to_string(),
            start: "2024-03-01T09:00:00".to_string(),
            end: None,
            all_day: false,
            color: None,
            props: EntryProps { kind, ..Default::default() },
        }
    }

    #[test]
    fn test_selection_from_range() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let whole = SlotSelection::from_range(day.and_hms_opt(0, 0, 0).unwrap(), day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(whole, SlotSelection::day(day));

        let timed = SlotSelection::from_range(day.and_hms_opt(9, 0, 0).unwrap(), day.and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(timed.start, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(timed.end, NaiveTime::from_hms_opt(10, 30, 0));
    }

    #[test]
    fn test_route_click() {
        let assignment = entry("aff-3", EntryKind::Assignment);
        let event = entry("evt-8", EntryKind::Event);

        assert_eq!(route_click(&assignment, false), Some(EntryAction::ShowDetail(EntryKind::Assignment, 3)));
        assert_eq!(route_click(&event, false), Some(EntryAction::ShowDetail(EntryKind::Event, 8)));
        assert_eq!(route_click(&assignment, true), Some(EntryAction::EditAssignment(3)));
        assert_eq!(route_click(&event, true), Some(EntryAction::EditEvent(8)));
        assert_eq!(route_click(&entry("sans-id", EntryKind::Event), true), None);
    }

    #[tokio::test]
    async fn test_load_source_stamps_kind_and_uses_window_range() {
        let api = FakeApi::default();
        api.event_entries.borrow_mut().push(entry("12", EntryKind::Assignment));
        let window = ViewWindow::new(CalendarView::Week, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let entries = load_source(&api, EntryKind::Event, &window).await.unwrap();

        assert_eq!(entries[0].kind(), EntryKind::Event);
        assert_eq!(
            api.calls(),
            vec!["events_in_range 2024-02-26 2024-03-04".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_source_propagates_failure() {
        let api = FakeApi::default();
        *api.range_error.borrow_mut() = Some(ApiError::Decode("un tableau d'événements était attendu".into()));
        let window = ViewWindow::new(CalendarView::Day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let result = load_source(&api, EntryKind::Assignment, &window).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
