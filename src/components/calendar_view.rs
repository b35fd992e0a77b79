//! Calendar View
//!
//! Toolbar, week/day time grid and month grid over the two entry sources.

use chrono::{Datelike, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_slot_select::{
    bind_global_mouseup, create_select_signals, make_on_slot_mousedown, make_on_slot_mouseenter, preview, SlotRange,
};
use log::{error, warn};

use crate::calendar::{
    all_day_by_day, day_label, entries_on_day, is_all_day, is_weekend, load_source, place_timed, route_click,
    time_label, CalendarView as ViewMode, DayGrid, EntryAction, SlotSelection, ViewWindow, WEEKDAYS_SHORT,
};
use crate::commands::RequestScope;
use crate::context::{use_controllers, use_planning_context};
use crate::controllers::{Feedback, ToastLevel};
use crate::models::{CalendarEntry, EntryKind};
use crate::store::*;
use crate::toast::{use_toasts, BrowserFeedback};

/// Calendar with its toolbar; owns the source requests
#[component]
pub fn CalendarView() -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();
    let store = use_calendar_store();
    let toasts = use_toasts();
    let grid = DayGrid::from_options(&ctx.config().display);

    // Responses from an older load are dropped
    let load_generation = StoredValue::new(0u64);

    // Fetch both sources when the window changes or a refresh is requested
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let window = store_window(&store);
        let generation = load_generation.get_value() + 1;
        load_generation.set_value(generation);
        store_begin_load(&store, 2);
        log::debug!("loading {} .. {} (trigger {})", window.start(), window.end(), trigger);

        for kind in [EntryKind::Assignment, EntryKind::Event] {
            let api = controllers.api();
            spawn_local(async move {
                let result = load_source(api.as_ref(), kind, &window).await;
                if load_generation.try_get_value() != Some(generation) {
                    return;
                }
                store_finish_source(&store);
                match result {
                    Ok(entries) => store_set_source(&store, kind, entries),
                    Err(err) if err.is_aborted() => {}
                    Err(err) => {
                        error!("{:?} source failed: {}", kind, err);
                        store_set_source(&store, kind, Vec::new());
                        let what = match kind {
                            EntryKind::Assignment => "affectations",
                            EntryKind::Event => "événements",
                        };
                        BrowserFeedback(toasts)
                            .toast(ToastLevel::Error, &format!("Impossible de charger les {} : {}", what, err));
                    }
                }
            });
        }
    });

    on_cleanup(move || {
        if let Some(api) = controllers.api.try_get_value() {
            api.abort(RequestScope::AssignmentSource);
            api.abort(RequestScope::EventSource);
        }
    });

    // Viewers get the detail modal, editors the matching form
    let on_entry = Callback::new(move |entry: CalendarEntry| match route_click(&entry, ctx.can_edit) {
        Some(EntryAction::ShowDetail(kind, id)) => {
            let detail = controllers.detail();
            spawn_local(async move { detail.open(kind, id).await });
        }
        Some(EntryAction::EditAssignment(id)) => {
            let assignment = controllers.assignment();
            spawn_local(async move { assignment.open_edit(id).await });
        }
        Some(EntryAction::EditEvent(id)) => {
            let event = controllers.event();
            spawn_local(async move { event.open_edit(id).await });
        }
        None => warn!("entry {} carries no record id", entry.id),
    });

    view! {
        <section class="planning-calendar">
            <CalendarToolbar />
            {move || {
                let window = store_window(&store);
                if window.view.is_time_grid() {
                    view! { <TimeGrid window=window grid=grid on_entry=on_entry /> }.into_any()
                } else {
                    view! { <MonthGrid window=window on_entry=on_entry /> }.into_any()
                }
            }}
        </section>
    }
}

#[component]
fn CalendarToolbar() -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();
    let store = use_calendar_store();

    view! {
        <div class="calendar-toolbar">
            <div class="toolbar-group">
                <button type="button" title="Précédent" on:click=move |_| store_prev(&store)>"‹"</button>
                <button type="button" on:click=move |_| store_today(&store)>"Aujourd'hui"</button>
                <button type="button" title="Suivant" on:click=move |_| store_next(&store)>"›"</button>
            </div>
            <h2 class="calendar-title">{move || store_window(&store).title()}</h2>
            <div class="toolbar-group">
                {ViewMode::ALL.iter().map(|mode| {
                    let mode = *mode;
                    view! {
                        <button
                            type="button"
                            class=move || if store_window(&store).view == mode { "view-btn active" } else { "view-btn" }
                            on:click=move |_| store_set_view(&store, mode)
                        >
                            {mode.label()}
                        </button>
                    }
                }).collect_view()}
            </div>
            {move || (store_pending(&store) > 0).then(|| view! { <span class="calendar-loading">"Chargement…"</span> })}
            {ctx.can_edit.then(|| view! {
                <div class="toolbar-group">
                    <button type="button" class="primary" on:click=move |_| controllers.assignment().open_create(None)>
                        "+ Affectation"
                    </button>
                    <button type="button" class="primary" on:click=move |_| controllers.event().open_create(None)>
                        "+ Événement"
                    </button>
                </div>
            })}
        </div>
    }
}

/// One entry: time + title line, participants line for events
#[component]
fn EntryCard(
    entry: CalendarEntry,
    on_entry: Callback<CalendarEntry>,
    #[prop(optional, into)] style: String,
) -> impl IntoView {
    let class = match entry.kind() {
        EntryKind::Assignment => "entry entry-assignment",
        EntryKind::Event => "entry entry-event",
    };
    let style = match &entry.color {
        Some(color) => format!("{}background-color: {};", style, color),
        None => style,
    };
    let tooltip = entry.tooltip();
    let time = time_label(&entry);
    let title = entry.title.clone();
    let participants = entry.participants_line();

    view! {
        <div
            class=class
            style=style
            title=tooltip
            data-no-select=""
            on:click=move |ev: web_sys::MouseEvent| {
                ev.stop_propagation();
                on_entry.run(entry.clone());
            }
        >
            <div class="entry-line">
                {(!time.is_empty()).then(|| view! { <span class="entry-time">{time}</span> })}
                <span class="entry-title">{title}</span>
            </div>
            {participants.map(|names| view! { <div class="entry-participants">{names}</div> })}
        </div>
    }
}

/// Week and day views
#[component]
fn TimeGrid(window: ViewWindow, grid: DayGrid, on_entry: Callback<CalendarEntry>) -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();
    let store = use_calendar_store();
    let days = window.days();
    let slot_count = grid.slot_count();
    let sel = create_select_signals();

    if ctx.can_edit {
        let columns = days.clone();
        let binding = bind_global_mouseup(sel, move |range: SlotRange| {
            let Some(day) = columns.get(range.column as usize) else { return };
            let selection = grid.selection(*day, range.first, range.last);
            controllers.assignment().open_create(Some(&selection));
        });
        // Listener is removed when the grid is disposed
        let _binding = StoredValue::new_local(binding);
    }

    let entries = Memo::new(move |_| store_entries(&store));
    let all_day = {
        let days = days.clone();
        Memo::new(move |_| all_day_by_day(&entries.get(), &days))
    };
    let placements = {
        let days = days.clone();
        Memo::new(move |_| place_timed(&entries.get(), &days, &grid))
    };

    view! {
        <div class="time-grid" style=format!("--day-count: {};", days.len())>
            <div class="time-grid-row time-grid-header">
                <div class="time-gutter"></div>
                {days.iter().map(|day| {
                    let class = if is_weekend(*day) { "day-header weekend" } else { "day-header" };
                    view! { <div class=class>{day_label(*day)}</div> }
                }).collect_view()}
            </div>
            <div class="time-grid-row all-day-strip">
                <div class="time-gutter">"Journée"</div>
                {(0..days.len()).map(|column| view! {
                    <div class="all-day-cell">
                        {move || all_day.with(|cells| cells.get(column).cloned().unwrap_or_default())
                            .into_iter()
                            .map(|entry| view! { <EntryCard entry=entry on_entry=on_entry /> })
                            .collect_view()}
                    </div>
                }).collect_view()}
            </div>
            <div class="time-grid-row time-grid-body">
                <div class="time-gutter">
                    {(0..slot_count).map(|slot| view! {
                        <div class="slot-label">{grid.slot_label(slot)}</div>
                    }).collect_view()}
                </div>
                {days.iter().enumerate().map(|(column, _)| {
                    let column_id = column as u32;
                    view! {
                        <div class="day-column">
                            {(0..slot_count).map(|slot| {
                                let on_down = make_on_slot_mousedown(sel, column_id, slot);
                                let on_enter = make_on_slot_mouseenter(sel, column_id, slot);
                                let can_edit = ctx.can_edit;
                                view! {
                                    <div
                                        class=move || {
                                            let selecting = preview(&sel).is_some_and(|r| r.contains(column_id, slot));
                                            if selecting { "slot selecting" } else { "slot" }
                                        }
                                        on:mousedown=move |ev| if can_edit { on_down(ev) }
                                        on:mouseenter=move |ev| if can_edit { on_enter(ev) }
                                    ></div>
                                }
                            }).collect_view()}
                            {move || placements.with(|all| {
                                all.iter()
                                    .filter(|p| p.column == column)
                                    .map(|p| {
                                        let width = 100.0 / p.lanes as f64;
                                        let style = format!(
                                            "top: calc({} * var(--slot-height)); height: calc({} * var(--slot-height)); left: {}%; width: {}%;",
                                            p.top, p.height, width * p.lane as f64, width
                                        );
                                        view! { <EntryCard entry=p.entry.clone() on_entry=on_entry style=style /> }
                                    })
                                    .collect_view()
                            })}
                        </div>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

/// Month view: whole weeks, entries listed per day
#[component]
fn MonthGrid(window: ViewWindow, on_entry: Callback<CalendarEntry>) -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();
    let store = use_calendar_store();
    let entries = Memo::new(move |_| store_entries(&store));
    let today = chrono::Local::now().date_naive();

    let cell_class = move |day: NaiveDate| {
        let mut class = String::from("month-cell");
        if !window.in_anchor_month(day) {
            class.push_str(" other-month");
        }
        if is_weekend(day) {
            class.push_str(" weekend");
        }
        if day == today {
            class.push_str(" today");
        }
        class
    };

    view! {
        <div class="month-grid">
            <div class="month-row month-header">
                {WEEKDAYS_SHORT.iter().map(|name| view! { <div class="month-weekday">{*name}</div> }).collect_view()}
            </div>
            {window.weeks().into_iter().map(|week| view! {
                <div class="month-row">
                    {week.into_iter().map(|day| view! {
                        <div
                            class=cell_class(day)
                            on:click=move |_| if ctx.can_edit {
                                controllers.assignment().open_create(Some(&SlotSelection::day(day)));
                            }
                        >
                            <button
                                type="button"
                                class="day-number"
                                data-no-select=""
                                on:click=move |ev: web_sys::MouseEvent| {
                                    ev.stop_propagation();
                                    store_show_day(&store, day);
                                }
                            >
                                {day.day()}
                            </button>
                            {move || entries.with(|all| {
                                let mut on_day = entries_on_day(all, day);
                                // All-day entries first
                                on_day.sort_by_key(|e| !is_all_day(e));
                                on_day
                                    .into_iter()
                                    .map(|entry| view! { <EntryCard entry=entry on_entry=on_entry /> })
                                    .collect_view()
                            })}
                        </div>
                    }).collect_view()}
                </div>
            }).collect_view()}
        </div>
    }
}
