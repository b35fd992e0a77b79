//! Visible Date Window
//!
//! Which days the calendar shows for a view mode and anchor date.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin",
    "juil.", "août", "sept.", "oct.", "nov.", "déc.",
];

pub const WEEKDAYS_SHORT: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];

const WEEKDAYS: [&str; 7] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];

/// Calendar view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[serde(alias = "dayGridMonth")]
    Month,
    #[default]
    #[serde(alias = "timeGridWeek")]
    Week,
    #[serde(alias = "timeGridDay")]
    Day,
}

impl CalendarView {
    pub const ALL: [CalendarView; 3] = [CalendarView::Month, CalendarView::Week, CalendarView::Day];

    pub fn label(&self) -> &'static str {
        match self {
            CalendarView::Month => "Mois",
            CalendarView::Week => "Semaine",
            CalendarView::Day => "Jour",
        }
    }

    /// Month view lists entries per day instead of a time grid
    pub fn is_time_grid(&self) -> bool {
        !matches!(self, CalendarView::Month)
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// View mode plus the date it is anchored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewWindow {
    pub view: CalendarView,
    pub anchor: NaiveDate,
}

impl ViewWindow {
    pub fn new(view: CalendarView, anchor: NaiveDate) -> Self {
        Self { view, anchor }
    }

    /// First visible day
    pub fn start(&self) -> NaiveDate {
        match self.view {
            CalendarView::Day => self.anchor,
            CalendarView::Week => monday_of(self.anchor),
            CalendarView::Month => monday_of(first_of_month(self.anchor)),
        }
    }

    /// Day after the last visible day
    pub fn end(&self) -> NaiveDate {
        match self.view {
            CalendarView::Day => self.anchor + Duration::days(1),
            CalendarView::Week => self.start() + Duration::days(7),
            CalendarView::Month => {
                let next_month = first_of_month(self.anchor)
                    .checked_add_months(Months::new(1))
                    .unwrap_or(self.anchor);
                let last_day = next_month - Duration::days(1);
                monday_of(last_day) + Duration::days(7)
            }
        }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        let end = self.end();
        self.start().iter_days().take_while(|d| *d < end).collect()
    }

    /// Visible days grouped by week (month view rows)
    pub fn weeks(&self) -> Vec<Vec<NaiveDate>> {
        self.days().chunks(7).map(|week| week.to_vec()).collect()
    }

    pub fn prev(&self) -> Self {
        let anchor = match self.view {
            CalendarView::Day => self.anchor - Duration::days(1),
            CalendarView::Week => self.anchor - Duration::days(7),
            CalendarView::Month => first_of_month(self.anchor)
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
        Self::new(self.view, anchor)
    }

    pub fn next(&self) -> Self {
        let anchor = match self.view {
            CalendarView::Day => self.anchor + Duration::days(1),
            CalendarView::Week => self.anchor + Duration::days(7),
            CalendarView::Month => first_of_month(self.anchor)
                .checked_add_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
        Self::new(self.view, anchor)
    }

    pub fn with_view(&self, view: CalendarView) -> Self {
        Self::new(view, self.anchor)
    }

    pub fn with_anchor(&self, anchor: NaiveDate) -> Self {
        Self::new(self.view, anchor)
    }

    /// Same view anchored on the local current date
    pub fn today(&self) -> Self {
        self.with_anchor(chrono::Local::now().date_naive())
    }

    /// Whether a day belongs to the anchored month (month view shading)
    pub fn in_anchor_month(&self, day: NaiveDate) -> bool {
        day.month() == self.anchor.month() && day.year() == self.anchor.year()
    }

    pub fn title(&self) -> String {
        match self.view {
            CalendarView::Month => format!("{} {}", MONTHS[self.anchor.month0() as usize], self.anchor.year()),
            CalendarView::Day => format!(
                "{} {} {} {}",
                WEEKDAYS[self.anchor.weekday().num_days_from_monday() as usize],
                self.anchor.day(),
                MONTHS[self.anchor.month0() as usize],
                self.anchor.year()
            ),
            CalendarView::Week => {
                let first = self.start();
                let last = self.end() - Duration::days(1);
                format!(
                    "{} {} - {} {} {}",
                    first.day(),
                    MONTHS_SHORT[first.month0() as usize],
                    last.day(),
                    MONTHS_SHORT[last.month0() as usize],
                    last.year()
                )
            }
        }
    }
}

/// Column header label, e.g. `ven. 1/3`
pub fn day_label(day: NaiveDate) -> String {
    format!(
        "{} {}/{}",
        WEEKDAYS_SHORT[day.weekday().num_days_from_monday() as usize],
        day.day(),
        day.month()
    )
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_window_starts_monday() {
        let window = ViewWindow::new(CalendarView::Week, date(2024, 3, 1));
        assert_eq!(window.start(), date(2024, 2, 26));
        assert_eq!(window.end(), date(2024, 3, 4));
        assert_eq!(window.days().len(), 7);
        assert_eq!(window.title(), "26 févr. - 3 mars 2024");
    }

    #[test]
    fn test_month_window_pads_whole_weeks() {
        let window = ViewWindow::new(CalendarView::Month, date(2024, 3, 15));
        assert_eq!(window.start(), date(2024, 2, 26));
        assert_eq!(window.end(), date(2024, 4, 1));
        assert_eq!(window.weeks().len(), 5);
        assert!(window.weeks().iter().all(|w| w.len() == 7));
        assert_eq!(window.title(), "mars 2024");
        assert!(!window.in_anchor_month(date(2024, 2, 29)));
    }

    #[test]
    fn test_navigation() {
        let month = ViewWindow::new(CalendarView::Month, date(2024, 3, 31));
        assert_eq!(month.prev().anchor, date(2024, 2, 1));
        assert_eq!(month.next().anchor, date(2024, 4, 1));

        let day = ViewWindow::new(CalendarView::Day, date(2024, 2, 29));
        assert_eq!(day.next().anchor, date(2024, 3, 1));
        assert_eq!(day.end(), date(2024, 3, 1));
        assert_eq!(day.title(), "jeudi 29 février 2024");

        let week = day.with_view(CalendarView::Week);
        assert_eq!(week.prev().start(), date(2024, 2, 19));
    }

    #[test]
    fn test_view_wire_names() {
        let view: CalendarView = serde_json::from_str("\"dayGridMonth\"").unwrap();
        assert_eq!(view, CalendarView::Month);
        let view: CalendarView = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(view, CalendarView::Day);
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(date(2024, 3, 1)), "ven. 1/3");
        assert!(is_weekend(date(2024, 3, 2)));
    }
}
