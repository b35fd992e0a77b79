//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use crate::commands::PlanningApi;
use crate::config::PageConfig;
use crate::controllers::{AssignmentController, CalendarHandle, DetailController, EventController};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct PlanningContext {
    /// Trigger to refetch both calendar sources - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to refetch both calendar sources - write
    set_reload_trigger: WriteSignal<u32>,
    /// Injected page configuration
    pub config: StoredValue<Rc<PageConfig>, LocalStorage>,
    /// Whether the user may create, edit and delete
    pub can_edit: bool,
}

impl PlanningContext {
    pub fn new(reload_trigger: (ReadSignal<u32>, WriteSignal<u32>), config: Rc<PageConfig>) -> Self {
        let can_edit = config.can_edit;
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            config: StoredValue::new_local(config),
            can_edit,
        }
    }

    /// Trigger a refetch of both sources
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn config(&self) -> Rc<PageConfig> {
        self.config.get_value()
    }
}

impl CalendarHandle for PlanningContext {
    fn refresh(&self) {
        log::debug!("calendar refresh requested");
        self.reload();
    }
}

pub fn use_planning_context() -> PlanningContext {
    expect_context::<PlanningContext>()
}

/// Controllers behind the modals, plus the API they share
///
/// Each field is a `Copy` handle; the controllers themselves stay on the
/// UI thread.
#[derive(Clone, Copy)]
pub struct Controllers {
    pub api: StoredValue<Rc<dyn PlanningApi>, LocalStorage>,
    pub assignment: StoredValue<Rc<AssignmentController>, LocalStorage>,
    pub event: StoredValue<Rc<EventController>, LocalStorage>,
    pub detail: StoredValue<Rc<DetailController>, LocalStorage>,
    /// Bumped by each controller's change callback
    pub assignment_version: RwSignal<u64>,
    pub event_version: RwSignal<u64>,
    pub detail_version: RwSignal<u64>,
}

impl Controllers {
    pub fn assignment(&self) -> Rc<AssignmentController> {
        self.assignment.get_value()
    }

    pub fn event(&self) -> Rc<EventController> {
        self.event.get_value()
    }

    pub fn detail(&self) -> Rc<DetailController> {
        self.detail.get_value()
    }

    pub fn api(&self) -> Rc<dyn PlanningApi> {
        self.api.get_value()
    }
}

pub fn use_controllers() -> Controllers {
    expect_context::<Controllers>()
}
