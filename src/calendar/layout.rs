//! Grid Layout
//!
//! Positions entries in the time grid (week/day views) and per-day lists
//! (month view and all-day strip).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::SlotSelection;
use crate::config::DisplayOptions;
use crate::datetime::{format_time, parse_datetime};
use crate::models::CalendarEntry;

/// Time grid geometry for one day column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayGrid {
    pub slot_minutes: u32,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for DayGrid {
    fn default() -> Self {
        Self::from_options(&DisplayOptions::default())
    }
}

impl DayGrid {
    pub fn from_options(options: &DisplayOptions) -> Self {
        let slot_minutes = match options.slot_minutes {
            m @ (5 | 10 | 15 | 20 | 30 | 60) => m,
            _ => 30,
        };
        let start_hour = options.day_start_hour.min(23);
        let end_hour = options.day_end_hour.clamp(start_hour + 1, 24);
        Self { slot_minutes, start_hour, end_hour }
    }

    pub fn slot_count(&self) -> u32 {
        (self.end_hour - self.start_hour) * 60 / self.slot_minutes
    }

    fn minutes_to_time(minutes: u32) -> NaiveTime {
        if minutes >= 24 * 60 {
            return NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
        }
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn slot_start(&self, slot: u32) -> NaiveTime {
        Self::minutes_to_time(self.start_hour * 60 + slot * self.slot_minutes)
    }

    pub fn slot_end(&self, slot: u32) -> NaiveTime {
        Self::minutes_to_time(self.start_hour * 60 + (slot + 1) * self.slot_minutes)
    }

    /// Row label (`HH:MM`) shown on full hours only
    pub fn slot_label(&self, slot: u32) -> Option<String> {
        let time = self.slot_start(slot);
        (time.minute() == 0).then(|| format_time(time))
    }

    /// Selection covering slots `first..=last` of `date`
    pub fn selection(&self, date: NaiveDate, first: u32, last: u32) -> SlotSelection {
        SlotSelection::from_range(date.and_time(self.slot_start(first)), date.and_time(self.slot_end(last)))
    }

    /// Offset of a time in slot units from the top of the column, clamped to the grid
    fn offset(&self, minutes_from_midnight: i64) -> f64 {
        let from_top = minutes_from_midnight - (self.start_hour as i64) * 60;
        let max = (self.slot_count() * self.slot_minutes) as i64;
        from_top.clamp(0, max) as f64 / self.slot_minutes as f64
    }
}

/// Start and end of an entry; missing end means one hour (timed) or one day (all-day)
pub fn entry_span(entry: &CalendarEntry) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_datetime(&entry.start)?;
    let default_length = if is_all_day(entry) { Duration::days(1) } else { Duration::hours(1) };
    let end = entry
        .end
        .as_deref()
        .and_then(parse_datetime)
        .filter(|end| *end > start)
        .unwrap_or(start + default_length);
    Some((start, end))
}

/// All-day flag or a date-only start
pub fn is_all_day(entry: &CalendarEntry) -> bool {
    entry.all_day || entry.start.trim().len() == 10
}

/// `09:00 - 10:30` for timed entries, empty for all-day ones
pub fn time_label(entry: &CalendarEntry) -> String {
    if is_all_day(entry) {
        return String::new();
    }
    match entry_span(entry) {
        Some((start, end)) => format!("{} - {}", format_time(start.time()), format_time(end.time())),
        None => String::new(),
    }
}

/// Both sources merged, ordered by start then title
pub fn merge_sources(assignments: &[CalendarEntry], events: &[CalendarEntry]) -> Vec<CalendarEntry> {
    let mut merged: Vec<CalendarEntry> = assignments.iter().chain(events.iter()).cloned().collect();
    merged.sort_by(|a, b| {
        let key_a = parse_datetime(&a.start);
        let key_b = parse_datetime(&b.start);
        key_a.cmp(&key_b).then_with(|| a.title.cmp(&b.title))
    });
    merged
}

/// Entries overlapping a given day, in input order
pub fn entries_on_day(entries: &[CalendarEntry], day: NaiveDate) -> Vec<CalendarEntry> {
    let Some(day_start) = day.and_hms_opt(0, 0, 0) else {
        return Vec::new();
    };
    let day_end = day_start + Duration::days(1);
    entries
        .iter()
        .filter(|entry| matches!(entry_span(entry), Some((start, end)) if start < day_end && end > day_start))
        .cloned()
        .collect()
}

/// All-day entries per visible day (strip above the time grid)
pub fn all_day_by_day(entries: &[CalendarEntry], days: &[NaiveDate]) -> Vec<Vec<CalendarEntry>> {
    let all_day: Vec<CalendarEntry> = entries.iter().filter(|e| is_all_day(e)).cloned().collect();
    days.iter().map(|day| entries_on_day(&all_day, *day)).collect()
}

/// Timed entry segment placed in a day column; `top`/`height` in slot units
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub entry: CalendarEntry,
    pub column: usize,
    pub top: f64,
    pub height: f64,
    pub lane: usize,
    pub lanes: usize,
}

/// Place timed entries in day columns, clipping multi-day spans per day and
/// splitting overlapping entries into side-by-side lanes
pub fn place_timed(entries: &[CalendarEntry], days: &[NaiveDate], grid: &DayGrid) -> Vec<Placement> {
    let mut placements = Vec::new();

    for (column, day) in days.iter().enumerate() {
        let Some(midnight) = day.and_hms_opt(0, 0, 0) else { continue };
        let mut segments: Vec<Placement> = entries
            .iter()
            .filter(|entry| !is_all_day(entry))
            .filter_map(|entry| {
                let (start, end) = entry_span(entry)?;
                let top = grid.offset((start - midnight).num_minutes());
                let bottom = grid.offset((end - midnight).num_minutes());
                (bottom > top).then(|| Placement {
                    entry: entry.clone(),
                    column,
                    top,
                    height: bottom - top,
                    lane: 0,
                    lanes: 1,
                })
            })
            .collect();

        segments.sort_by(|a, b| a.top.total_cmp(&b.top).then(b.height.total_cmp(&a.height)));
        assign_lanes(&mut segments);
        placements.extend(segments);
    }

    placements
}

/// Greedy lane assignment over clusters of transitively overlapping segments
fn assign_lanes(segments: &mut [Placement]) {
    let mut cluster_start = 0;
    let mut cluster_bottom = f64::MIN;
    let mut lane_bottoms: Vec<f64> = Vec::new();

    for i in 0..segments.len() {
        let top = segments[i].top;
        let bottom = top + segments[i].height;

        if top >= cluster_bottom && i > cluster_start {
            let lanes = lane_bottoms.len();
            segments[cluster_start..i].iter_mut().for_each(|s| s.lanes = lanes);
            cluster_start = i;
            lane_bottoms.clear();
        }

        let lane = match lane_bottoms.iter().position(|b| *b <= top) {
            Some(lane) => {
                lane_bottoms[lane] = bottom;
                lane
            }
            None => {
                lane_bottoms.push(bottom);
                lane_bottoms.len() - 1
            }
        };
        segments[i].lane = lane;
        cluster_bottom = if i == cluster_start { bottom } else { cluster_bottom.max(bottom) };
    }

    let lanes = lane_bottoms.len().max(1);
    segments[cluster_start..].iter_mut().for_each(|s| s.lanes = lanes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryKind, EntryProps};

    fn entry(id: &str, start: &str, end: Option<&str>) -> CalendarEntry {
        CalendarEntry {
            id: id.to_string(),
            title: format!("Entry {}", id),
            start: start.to_string(),
            end: end.map(str::to_string),
            all_day: false,
            color: None,
            props: EntryProps { kind: EntryKind::Assignment, ..Default::default() },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_geometry() {
        let grid = DayGrid::default();
        assert_eq!(grid.slot_count(), 32);
        assert_eq!(format_time(grid.slot_start(6)), "09:00");
        assert_eq!(format_time(grid.slot_end(8)), "10:30");
        assert_eq!(grid.slot_label(6).as_deref(), Some("09:00"));
        assert_eq!(grid.slot_label(7), None);
    }

    #[test]
    fn test_grid_options_are_sanitized() {
        let options = DisplayOptions { slot_minutes: 7, day_start_hour: 20, day_end_hour: 3, ..Default::default() };
        let grid = DayGrid::from_options(&options);
        assert_eq!(grid.slot_minutes, 30);
        assert_eq!(grid.end_hour, 21);
        assert_eq!(format_time(DayGrid { slot_minutes: 60, start_hour: 0, end_hour: 24 }.slot_end(23)), "23:59");
    }

    #[test]
    fn test_grid_selection_keeps_times() {
        let grid = DayGrid::default();
        let selection = grid.selection(date(2024, 3, 1), 6, 8);
        assert_eq!(selection.date, date(2024, 3, 1));
        assert_eq!(selection.start.map(format_time).as_deref(), Some("09:00"));
        assert_eq!(selection.end.map(format_time).as_deref(), Some("10:30"));
    }

    #[test]
    fn test_entry_span_defaults() {
        let timed = entry("1", "2024-03-01T09:00:00", None);
        let (start, end) = entry_span(&timed).unwrap();
        assert_eq!((end - start).num_minutes(), 60);
        assert_eq!(time_label(&timed), "09:00 - 10:00");

        let day = entry("2", "2024-03-01", None);
        assert!(is_all_day(&day));
        assert_eq!(time_label(&day), "");
        let (start, end) = entry_span(&day).unwrap();
        assert_eq!((end - start).num_hours(), 24);
    }

    #[test]
    fn test_merge_sorts_by_start() {
        let assignments = vec![entry("a", "2024-03-01T11:00:00", None)];
        let events = vec![entry("b", "2024-03-01T08:00:00", None)];
        let merged = merge_sources(&assignments, &events);
        assert_eq!(merged[0].id, "b");
        assert_eq!(merged[1].id, "a");
    }

    #[test]
    fn test_entries_on_day_include_spans() {
        let entries = vec![
            entry("1", "2024-02-29T22:00:00", Some("2024-03-01T02:00:00")),
            entry("2", "2024-03-02T09:00:00", None),
        ];
        let on_first = entries_on_day(&entries, date(2024, 3, 1));
        assert_eq!(on_first.len(), 1);
        assert_eq!(on_first[0].id, "1");
    }

    #[test]
    fn test_place_timed_positions() {
        let grid = DayGrid::default();
        let days = vec![date(2024, 3, 1), date(2024, 3, 2)];
        let entries = vec![entry("1", "2024-03-01T09:00:00", Some("2024-03-01T10:30:00"))];

        let placed = place_timed(&entries, &days, &grid);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].column, 0);
        assert_eq!(placed[0].top, 6.0);
        assert_eq!(placed[0].height, 3.0);
        assert_eq!(placed[0].lanes, 1);
    }

    #[test]
    fn test_place_timed_overlaps_get_lanes() {
        let grid = DayGrid::default();
        let days = vec![date(2024, 3, 1)];
        let entries = vec![
            entry("1", "2024-03-01T09:00:00", Some("2024-03-01T11:00:00")),
            entry("2", "2024-03-01T10:00:00", Some("2024-03-01T12:00:00")),
            entry("3", "2024-03-01T14:00:00", Some("2024-03-01T15:00:00")),
        ];

        let placed = place_timed(&entries, &days, &grid);
        let by_id = |id: &str| placed.iter().find(|p| p.entry.id == id).unwrap();
        assert_eq!((by_id("1").lane, by_id("1").lanes), (0, 2));
        assert_eq!((by_id("2").lane, by_id("2").lanes), (1, 2));
        assert_eq!((by_id("3").lane, by_id("3").lanes), (0, 1));
    }

    #[test]
    fn test_place_timed_clips_outside_hours() {
        let grid = DayGrid::default();
        let days = vec![date(2024, 3, 1)];
        let entries = vec![
            entry("night", "2024-03-01T01:00:00", Some("2024-03-01T03:00:00")),
            entry("late", "2024-03-01T21:00:00", Some("2024-03-01T23:30:00")),
        ];

        let placed = place_timed(&entries, &days, &grid);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].entry.id, "late");
        assert_eq!(placed[0].top, 30.0);
        assert_eq!(placed[0].height, 2.0);
    }

    #[test]
    fn test_all_day_strip() {
        let mut leave = entry("conge", "2024-03-01", Some("2024-03-03"));
        leave.all_day = true;
        let days = vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)];
        let strip = all_day_by_day(&[leave], &days);
        assert_eq!(strip.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 1, 0]);
    }
}
