//! In-memory doubles for controller tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::oneshot;

use super::{CalendarHandle, Feedback, ToastLevel};
use crate::commands::{ApiError, FormPayload, PlanningApi, RequestScope};
use crate::models::{AssignmentDetail, CalendarEntry, EventDetail, Participant, Post};

#[derive(Default)]
pub struct FakeApi {
    pub log: RefCell<Vec<String>>,
    pub assignment_entries: RefCell<Vec<CalendarEntry>>,
    pub event_entries: RefCell<Vec<CalendarEntry>>,
    pub range_error: RefCell<Option<ApiError>>,
    pub assignment_details: RefCell<HashMap<u32, AssignmentDetail>>,
    pub event_details: RefCell<HashMap<u32, EventDetail>>,
    pub detail_error: RefCell<Option<ApiError>>,
    /// When set, the next detail fetch waits for this signal
    pub detail_gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub save_error: RefCell<Option<ApiError>>,
    pub save_message: RefCell<Option<String>>,
    pub payloads: RefCell<Vec<FormPayload>>,
    pub site_posts: RefCell<Vec<Post>>,
    pub posts_error: RefCell<Option<ApiError>>,
    pub aborted: RefCell<Vec<RequestScope>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Calls that would hit the network with a body (saves and deletes)
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("save_") || c.starts_with("delete_"))
            .collect()
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }

    async fn wait_gate(&self) {
        let gate = self.detail_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn mutation_result(&self, payload: Option<&FormPayload>) -> Result<Option<String>, ApiError> {
        if let Some(payload) = payload {
            self.payloads.borrow_mut().push(payload.clone());
        }
        match self.save_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.save_message.borrow().clone()),
        }
    }
}

#[async_trait(?Send)]
impl PlanningApi for FakeApi {
    async fn assignments_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError> {
        self.record(format!("assignments_in_range {} {}", start, end));
        match self.range_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.assignment_entries.borrow().clone()),
        }
    }

    async fn events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError> {
        self.record(format!("events_in_range {} {}", start, end));
        match self.range_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(self.event_entries.borrow().clone()),
        }
    }

    async fn assignment_detail(&self, id: u32, _scope: RequestScope) -> Result<AssignmentDetail, ApiError> {
        self.record(format!("assignment_detail {}", id));
        self.wait_gate().await;
        if let Some(err) = self.detail_error.borrow().clone() {
            return Err(err);
        }
        self.assignment_details
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Affectation introuvable".to_string()))
    }

    async fn event_detail(&self, id: u32, _scope: RequestScope) -> Result<EventDetail, ApiError> {
        self.record(format!("event_detail {}", id));
        self.wait_gate().await;
        if let Some(err) = self.detail_error.borrow().clone() {
            return Err(err);
        }
        self.event_details
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Événement introuvable".to_string()))
    }

    async fn save_assignment(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError> {
        self.record(format!("save_assignment {:?}", id));
        self.mutation_result(Some(payload))
    }

    async fn delete_assignment(&self, id: u32) -> Result<Option<String>, ApiError> {
        self.record(format!("delete_assignment {}", id));
        self.mutation_result(None)
    }

    async fn save_event(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError> {
        self.record(format!("save_event {:?}", id));
        self.mutation_result(Some(payload))
    }

    async fn delete_event(&self, id: u32) -> Result<Option<String>, ApiError> {
        self.record(format!("delete_event {}", id));
        self.mutation_result(None)
    }

    async fn posts_by_site(&self, site_id: u32) -> Result<Vec<Post>, ApiError> {
        self.record(format!("posts_by_site {}", site_id));
        if let Some(err) = self.posts_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.site_posts.borrow().clone())
    }

    fn abort(&self, scope: RequestScope) {
        self.aborted.borrow_mut().push(scope);
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    pub toasts: RefCell<Vec<(ToastLevel, String)>>,
    pub decline: Cell<bool>,
    pub confirmations: Cell<u32>,
}

impl RecordingFeedback {
    pub fn levels(&self) -> Vec<ToastLevel> {
        self.toasts.borrow().iter().map(|(level, _)| *level).collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.toasts.borrow().last().map(|(_, msg)| msg.clone())
    }
}

impl Feedback for RecordingFeedback {
    fn toast(&self, level: ToastLevel, message: &str) {
        self.toasts.borrow_mut().push((level, message.to_string()));
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirmations.set(self.confirmations.get() + 1);
        !self.decline.get()
    }
}

#[derive(Default)]
pub struct CountingCalendar {
    pub refreshes: Cell<u32>,
}

impl CalendarHandle for CountingCalendar {
    fn refresh(&self) {
        self.refreshes.set(self.refreshes.get() + 1);
    }
}

pub fn assignment_detail() -> AssignmentDetail {
    AssignmentDetail {
        id: 5,
        planning_id: 1,
        employe_matricule: "E2".to_string(),
        poste_id: 200,
        date: "2024-03-04".to_string(),
        heure_debut: "06:00".to_string(),
        heure_fin: "14:00".to_string(),
        statut: "confirme".to_string(),
        notes: Some("Clés au poste de garde".to_string()),
    }
}

pub fn event_detail() -> EventDetail {
    EventDetail {
        id: 8,
        titre: "Point sécurité".to_string(),
        type_evenement: "reunion".to_string(),
        date_debut: "2024-03-05T09:00".to_string(),
        date_fin: "2024-03-05T10:30".to_string(),
        lieu: Some("Salle B".to_string()),
        description: Some("<b>Ordre du jour</b> & suivi".to_string()),
        participants: vec![
            Participant { matricule: "E1".to_string(), nom: "Koné".to_string(), prenoms: "Awa".to_string() },
            Participant { matricule: "E2".to_string(), nom: "Diallo".to_string(), prenoms: "Jean".to_string() },
        ],
    }
}
