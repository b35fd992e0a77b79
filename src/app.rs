//! Planning Calendar App
//!
//! Wires the injected configuration, the HTTP client and the modal
//! controllers together, then lays out the calendar and its modals.

use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::calendar::ViewWindow;
use crate::commands::{HttpApi, PlanningApi};
use crate::components::{AssignmentModal, CalendarView, DetailModal, EventModal, ToastStack};
use crate::config::PageConfig;
use crate::context::{Controllers, PlanningContext};
use crate::controllers::{AssignmentController, CalendarHandle, DetailController, EventController, Feedback};
use crate::store::CalendarState;
use crate::toast::{BrowserFeedback, Toasts};

#[component]
pub fn App(config: PageConfig) -> impl IntoView {
    let config = Rc::new(config);
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let ctx = PlanningContext::new((reload_trigger, set_reload_trigger), config.clone());
    let toasts = Toasts::new();

    let today = chrono::Local::now().date_naive();
    let store = Store::new(CalendarState::new(ViewWindow::new(config.display.initial_view, today)));

    let api: Rc<dyn PlanningApi> = Rc::new(HttpApi::new(config.endpoints.clone(), config.csrf.clone()));
    let feedback: Rc<dyn Feedback> = Rc::new(BrowserFeedback(toasts));
    let calendar: Rc<dyn CalendarHandle> = Rc::new(ctx);

    let assignment = Rc::new(AssignmentController::new(
        api.clone(),
        feedback.clone(),
        calendar.clone(),
        config.posts.clone(),
    ));
    let event = Rc::new(EventController::new(api.clone(), feedback.clone(), calendar));
    let detail = Rc::new(DetailController::new(api.clone(), feedback, config.clone()));

    let assignment_version = RwSignal::new(0u64);
    let event_version = RwSignal::new(0u64);
    let detail_version = RwSignal::new(0u64);
    assignment.set_on_change(move || assignment_version.update(|v| *v += 1));
    event.set_on_change(move || event_version.update(|v| *v += 1));
    detail.set_on_change(move || detail_version.update(|v| *v += 1));

    // Provide context to all children
    provide_context(ctx);
    provide_context(toasts);
    provide_context(store);
    provide_context(Controllers {
        api: StoredValue::new_local(api),
        assignment: StoredValue::new_local(assignment),
        event: StoredValue::new_local(event),
        detail: StoredValue::new_local(detail),
        assignment_version,
        event_version,
        detail_version,
    });

    log::info!(
        "planning calendar ready: {} employees, {} posts, edit rights: {}",
        config.employees.len(),
        config.posts.len(),
        ctx.can_edit
    );

    view! {
        <div class="planning-app">
            <CalendarView />
            {ctx.can_edit.then(|| view! {
                <AssignmentModal />
                <EventModal />
            })}
            <DetailModal />
            <ToastStack />
        </div>
    }
}

/// Shown instead of the calendar when the page configuration is unusable
#[component]
pub fn ConfigErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class="planning-config-error" role="alert">
            <strong>"Le calendrier ne peut pas être affiché."</strong>
            <p>{message}</p>
        </div>
    }
}
