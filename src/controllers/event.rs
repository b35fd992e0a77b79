//! Event Modal Controller
//!
//! Meetings, trainings and other events with a participant list.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::NaiveTime;
use log::{debug, info, warn};

use super::{require, CalendarHandle, Feedback, ModalSession, ModalState, Ticket, ToastLevel, ValidationError};
use crate::calendar::SlotSelection;
use crate::commands::{ApiError, FormPayload, PlanningApi, RequestScope};
use crate::datetime::{format_input_datetime, is_input_datetime, parse_datetime};
use crate::models::{EventDetail, DEFAULT_EVENT_TYPE};

pub const TITLE_NEW: &str = "Nouvel événement";
pub const TITLE_EDIT: &str = "Modifier l'événement";
const CONFIRM_DELETE: &str = "Supprimer cet événement ?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    EventType,
    Start,
    End,
    Location,
    Description,
}

/// Working copy of an event while the modal is open
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub id: Option<u32>,
    pub title: String,
    pub event_type: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    pub participants: BTreeSet<String>,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            start: String::new(),
            end: String::new(),
            location: String::new(),
            description: String::new(),
            participants: BTreeSet::new(),
        }
    }
}

impl EventForm {
    /// Blank form; a whole-day slot defaults to 09:00 - 10:00
    pub fn for_slot(slot: Option<&SlotSelection>) -> Self {
        let mut form = Self::default();
        if let Some(slot) = slot {
            let (start, end) = match (slot.start, slot.end) {
                (Some(start), Some(end)) => (start, end),
                _ => (
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
                    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
                ),
            };
            form.start = format_input_datetime(slot.date.and_time(start));
            form.end = format_input_datetime(slot.date.and_time(end));
        }
        form
    }

    pub fn from_detail(detail: &EventDetail) -> Self {
        Self {
            id: Some(detail.id),
            title: detail.titre.clone(),
            event_type: detail.type_evenement.clone(),
            start: input_value(&detail.date_debut),
            end: input_value(&detail.date_fin),
            location: detail.lieu.clone().unwrap_or_default(),
            description: detail.description.clone().unwrap_or_default(),
            participants: detail.participants.iter().map(|p| p.matricule.clone()).collect(),
        }
    }

    pub fn get(&self, field: EventField) -> &str {
        match field {
            EventField::Title => &self.title,
            EventField::EventType => &self.event_type,
            EventField::Start => &self.start,
            EventField::End => &self.end,
            EventField::Location => &self.location,
            EventField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: EventField, value: String) {
        let slot = match field {
            EventField::Title => &mut self.title,
            EventField::EventType => &mut self.event_type,
            EventField::Start => &mut self.start,
            EventField::End => &mut self.end,
            EventField::Location => &mut self.location,
            EventField::Description => &mut self.description,
        };
        *slot = value;
    }

    pub fn validate(&self) -> Result<FormPayload, ValidationError> {
        require(&[("Titre", &self.title), ("Début", &self.start), ("Fin", &self.end)])?;
        let start = parse_datetime(&self.start).ok_or(ValidationError::InvalidDate("Début"))?;
        let end = parse_datetime(&self.end).ok_or(ValidationError::InvalidDate("Fin"))?;
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }

        let mut payload = FormPayload::new();
        payload
            .push("titre", self.title.trim())
            .push("type_evenement", self.event_type.trim())
            .push("date_debut", self.start.trim())
            .push("date_fin", self.end.trim())
            .push("lieu", self.location.trim())
            .push("description", self.description.as_str())
            .push_all("employes", self.participants.iter().cloned());
        Ok(payload)
    }
}

/// Server datetimes (`2024-03-05 09:00:00`, RFC 3339) as `datetime-local` values
fn input_value(raw: &str) -> String {
    if is_input_datetime(raw.trim()) {
        return raw.trim().to_string();
    }
    parse_datetime(raw)
        .map(format_input_datetime)
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventModal {
    pub session: ModalSession,
    pub form: EventForm,
}

impl EventModal {
    pub fn title(&self) -> &'static str {
        if self.session.is_edit() { TITLE_EDIT } else { TITLE_NEW }
    }

    pub fn shows_delete(&self) -> bool {
        matches!(self.session.state(), ModalState::EditPending { .. })
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.session.state(), ModalState::CreatePending | ModalState::EditPending { .. })
            && !self.session.is_submitting()
    }
}

pub struct EventController {
    api: Rc<dyn PlanningApi>,
    feedback: Rc<dyn Feedback>,
    calendar: Rc<dyn CalendarHandle>,
    state: RefCell<EventModal>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl EventController {
    pub fn new(api: Rc<dyn PlanningApi>, feedback: Rc<dyn Feedback>, calendar: Rc<dyn CalendarHandle>) -> Self {
        Self {
            api,
            feedback,
            calendar,
            state: RefCell::new(EventModal::default()),
            on_change: RefCell::new(None),
        }
    }

    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    fn changed(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn snapshot(&self) -> EventModal {
        self.state.borrow().clone()
    }

    pub fn open_create(&self, slot: Option<&SlotSelection>) {
        self.api.abort(RequestScope::EventDetail);
        {
            let mut state = self.state.borrow_mut();
            state.session.open_create();
            state.form = EventForm::for_slot(slot);
        }
        self.changed();
    }

    pub async fn open_edit(&self, id: u32) {
        let ticket = {
            let mut state = self.state.borrow_mut();
            let ticket = state.session.begin_edit(id);
            state.form = EventForm { id: Some(id), ..Default::default() };
            ticket
        };
        self.changed();

        match self.api.event_detail(id, RequestScope::EventDetail).await {
            Ok(detail) => {
                let mut state = self.state.borrow_mut();
                if !state.session.finish_load(ticket) {
                    debug!("discarding stale event {} detail", id);
                    return;
                }
                state.form = EventForm::from_detail(&detail);
            }
            Err(err) => {
                if !self.state.borrow_mut().session.fail_load(ticket) {
                    return;
                }
                if !err.is_aborted() {
                    warn!("event {} detail failed: {}", id, err);
                    self.feedback
                        .toast(ToastLevel::Error, &format!("Impossible de charger l'événement : {}", err));
                }
            }
        }
        self.changed();
    }

    pub fn set_field(&self, field: EventField, value: String) {
        self.state.borrow_mut().form.set(field, value);
        self.changed();
    }

    pub fn toggle_participant(&self, matricule: &str) {
        {
            let participants = &mut self.state.borrow_mut().form.participants;
            if !participants.remove(matricule) {
                participants.insert(matricule.to_string());
            }
        }
        self.changed();
    }

    /// Replace the selection (multi-select change)
    pub fn set_participants(&self, matricules: impl IntoIterator<Item = String>) {
        self.state.borrow_mut().form.participants = matricules.into_iter().collect();
        self.changed();
    }

    pub async fn save(&self) {
        let prepared = {
            let mut state = self.state.borrow_mut();
            if !state.session.is_open() || state.session.is_loading() {
                return;
            }
            match state.form.validate() {
                Err(err) => Err(err),
                Ok(payload) => Ok(state.session.begin_submit().map(|ticket| (ticket, payload))),
            }
        };
        let (ticket, payload) = match prepared {
            Err(err) => {
                self.feedback.toast(ToastLevel::Warning, &err.to_string());
                return;
            }
            Ok(None) => return,
            Ok(Some(prepared)) => prepared,
        };
        self.changed();

        let id = self.state.borrow().form.id;
        let result = self.api.save_event(id, &payload).await;
        let fallback = if id.is_some() { "Événement mis à jour" } else { "Événement créé" };
        self.finish_mutation(ticket, result, fallback);
    }

    pub async fn delete(&self) {
        let id = match self.state.borrow().session.state() {
            ModalState::EditPending { id } => id,
            _ => return,
        };
        if !self.feedback.confirm(CONFIRM_DELETE) {
            return;
        }
        let Some(ticket) = self.state.borrow_mut().session.begin_submit() else {
            return;
        };
        self.changed();

        let result = self.api.delete_event(id).await;
        self.finish_mutation(ticket, result, "Événement supprimé");
    }

    fn finish_mutation(&self, ticket: Ticket, result: Result<Option<String>, ApiError>, fallback: &str) {
        self.state.borrow_mut().session.finish_submit(ticket, result.is_ok());
        match result {
            Ok(message) => {
                info!("{}", fallback);
                self.feedback
                    .toast(ToastLevel::Success, message.as_deref().unwrap_or(fallback));
                self.calendar.refresh();
            }
            Err(err) => {
                warn!("event mutation failed: {}", err);
                self.feedback.toast(ToastLevel::Error, &err.to_string());
            }
        }
        self.changed();
    }

    pub fn close(&self) {
        self.api.abort(RequestScope::EventDetail);
        self.state.borrow_mut().session.close();
        self.changed();
    }
}
