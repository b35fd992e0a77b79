//! Assignment Modal Controller
//!
//! Create, edit and delete "who works which post, when" records.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};

use super::{require, CalendarHandle, Feedback, ModalSession, ModalState, ToastLevel, ValidationError};
use crate::calendar::SlotSelection;
use crate::commands::{ApiError, FormPayload, PlanningApi, RequestScope};
use crate::datetime::{format_date, format_time, short_time};
use crate::models::{AssignmentDetail, Post, DEFAULT_STATUS};

pub const TITLE_NEW: &str = "Nouvelle affectation";
pub const TITLE_EDIT: &str = "Modifier l'affectation";
const CONFIRM_DELETE: &str = "Supprimer cette affectation ?";

/// Editable fields of the assignment form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentField {
    Planning,
    Employee,
    Site,
    Post,
    Date,
    StartTime,
    EndTime,
    Status,
    Notes,
}

/// Working copy of an assignment while the modal is open
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentForm {
    pub id: Option<u32>,
    pub planning_id: String,
    pub employee: String,
    pub site_id: String,
    pub post_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub notes: String,
}

impl Default for AssignmentForm {
    fn default() -> Self {
        Self {
            id: None,
            planning_id: String::new(),
            employee: String::new(),
            site_id: String::new(),
            post_id: String::new(),
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            status: DEFAULT_STATUS.to_string(),
            notes: String::new(),
        }
    }
}

impl AssignmentForm {
    /// Blank form pre-filled from a calendar selection
    pub fn for_slot(slot: Option<&SlotSelection>) -> Self {
        let mut form = Self::default();
        if let Some(slot) = slot {
            form.date = format_date(slot.date);
            if let (Some(start), Some(end)) = (slot.start, slot.end) {
                form.start_time = format_time(start);
                form.end_time = format_time(end);
            }
        }
        form
    }

    pub fn from_detail(detail: &AssignmentDetail, site_id: Option<u32>) -> Self {
        Self {
            id: Some(detail.id),
            planning_id: detail.planning_id.to_string(),
            employee: detail.employe_matricule.clone(),
            site_id: site_id.map(|id| id.to_string()).unwrap_or_default(),
            post_id: detail.poste_id.to_string(),
            date: detail.date.clone(),
            start_time: detail.heure_debut.clone(),
            end_time: detail.heure_fin.clone(),
            status: detail.statut.clone(),
            notes: detail.notes.clone().unwrap_or_default(),
        }
    }

    /// Read the form back as a record; `None` while ids are not numeric
    pub fn to_detail(&self) -> Option<AssignmentDetail> {
        let notes = self.notes.trim();
        Some(AssignmentDetail {
            id: self.id?,
            planning_id: self.planning_id.trim().parse().ok()?,
            employe_matricule: self.employee.clone(),
            poste_id: self.post_id.trim().parse().ok()?,
            date: self.date.clone(),
            heure_debut: self.start_time.clone(),
            heure_fin: self.end_time.clone(),
            statut: self.status.clone(),
            notes: (!notes.is_empty()).then(|| self.notes.clone()),
        })
    }

    pub fn get(&self, field: AssignmentField) -> &str {
        match field {
            AssignmentField::Planning => &self.planning_id,
            AssignmentField::Employee => &self.employee,
            AssignmentField::Site => &self.site_id,
            AssignmentField::Post => &self.post_id,
            AssignmentField::Date => &self.date,
            AssignmentField::StartTime => &self.start_time,
            AssignmentField::EndTime => &self.end_time,
            AssignmentField::Status => &self.status,
            AssignmentField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: AssignmentField, value: String) {
        let slot = match field {
            AssignmentField::Planning => &mut self.planning_id,
            AssignmentField::Employee => &mut self.employee,
            AssignmentField::Site => &mut self.site_id,
            AssignmentField::Post => &mut self.post_id,
            AssignmentField::Date => &mut self.date,
            AssignmentField::StartTime => &mut self.start_time,
            AssignmentField::EndTime => &mut self.end_time,
            AssignmentField::Status => &mut self.status,
            AssignmentField::Notes => &mut self.notes,
        };
        *slot = value;
    }

    /// Check required fields and time order, then build the request body
    pub fn validate(&self) -> Result<FormPayload, ValidationError> {
        require(&[
            ("Planning", &self.planning_id),
            ("Employé", &self.employee),
            ("Poste", &self.post_id),
            ("Date", &self.date),
            ("Heure de début", &self.start_time),
            ("Heure de fin", &self.end_time),
        ])?;
        // Same-day `HH:MM` values order lexicographically
        if self.end_time.trim() <= self.start_time.trim() {
            return Err(ValidationError::EndTimeNotAfterStart);
        }

        let mut payload = FormPayload::new();
        payload
            .push("planning_id", self.planning_id.trim())
            .push("employe_matricule", self.employee.trim())
            .push("poste_id", self.post_id.trim())
            .push("date", self.date.trim())
            .push("heure_debut", self.start_time.trim())
            .push("heure_fin", self.end_time.trim())
            .push("statut", self.status.trim())
            .push("notes", self.notes.as_str());
        Ok(payload)
    }
}

/// Snapshot rendered by the assignment modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentModal {
    pub session: ModalSession,
    pub form: AssignmentForm,
    /// Post options currently offered (filtered by site)
    pub posts: Vec<Post>,
}

impl AssignmentModal {
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

pub struct AssignmentController {
    api: Rc<dyn PlanningApi>,
    feedback: Rc<dyn Feedback>,
    calendar: Rc<dyn CalendarHandle>,
    all_posts: Vec<Post>,
    state: RefCell<AssignmentModal>,
    posts_request: Cell<u64>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl AssignmentController {
    pub fn new(
        api: Rc<dyn PlanningApi>,
        feedback: Rc<dyn Feedback>,
        calendar: Rc<dyn CalendarHandle>,
        all_posts: Vec<Post>,
    ) -> Self {
        let state = AssignmentModal {
            posts: all_posts.clone(),
            ..Default::default()
        };
        Self {
            api,
            feedback,
            calendar,
            all_posts,
            state: RefCell::new(state),
            posts_request: Cell::new(0),
            on_change: RefCell::new(None),
        }
    }

    /// Called after every state change (views re-read the snapshot)
    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    fn changed(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn snapshot(&self) -> AssignmentModal {
        self.state.borrow().clone()
    }

    /// Posts of a site from the injected list; `None` when the list has no site data
    fn local_posts(&self, site_id: Option<u32>) -> Option<Vec<Post>> {
        let Some(site_id) = site_id else {
            return Some(self.all_posts.clone());
        };
        if self.all_posts.iter().all(|p| p.site_id.is_none()) {
            return None;
        }
        Some(self.all_posts.iter().filter(|p| p.site_id == Some(site_id)).cloned().collect())
    }

    pub fn open_create(&self, slot: Option<&SlotSelection>) {
        self.api.abort(RequestScope::AssignmentDetail);
        {
            let mut state = self.state.borrow_mut();
            state.session.open_create();
            state.form = AssignmentForm::for_slot(slot);
            state.posts = self.all_posts.clone();
        }
        self.changed();
    }

    /// Open in edit mode; the form is populated once the detail arrives
    pub async fn open_edit(&self, id: u32) {
        let ticket = {
            let mut state = self.state.borrow_mut();
            let ticket = state.session.begin_edit(id);
            state.form = AssignmentForm { id: Some(id), ..Default::default() };
            ticket
        };
        self.changed();

        let result = self.api.assignment_detail(id, RequestScope::AssignmentDetail).await;
        match result {
            Ok(detail) => {
                let site_id = self.all_posts.iter().find(|p| p.id == detail.poste_id).and_then(|p| p.site_id);
                let posts = self.local_posts(site_id).unwrap_or_else(|| self.all_posts.clone());
                let mut state = self.state.borrow_mut();
                if !state.session.finish_load(ticket) {
                    debug!("discarding stale assignment {} detail", id);
                    return;
                }
                state.form = AssignmentForm::from_detail(&detail, site_id);
                state.posts = posts;
            }
            Err(err) => {
                if !self.state.borrow_mut().session.fail_load(ticket) {
                    return;
                }
                if !err.is_aborted() {
                    warn!("assignment {} detail failed: {}", id, err);
                    self.feedback
                        .toast(ToastLevel::Error, &format!("Impossible de charger l'affectation : {}", err));
                }
            }
        }
        self.changed();
    }

    pub fn set_field(&self, field: AssignmentField, value: String) {
        self.state.borrow_mut().form.set(field, value);
        self.changed();
    }

    /// Site changed: reload the post options for that site
    pub async fn select_site(&self, site: String) {
        let site_id = site.trim().parse::<u32>().ok();
        let request = self.posts_request.get() + 1;
        self.posts_request.set(request);
        self.state.borrow_mut().form.site_id = site;
        self.changed();

        let posts = match self.local_posts(site_id) {
            Some(posts) => posts,
            None => {
                let Some(site_id) = site_id else { return };
                match self.api.posts_by_site(site_id).await {
                    Ok(posts) => posts,
                    Err(err) if err.is_aborted() => return,
                    Err(err) => {
                        warn!("posts for site {} failed: {}", site_id, err);
                        self.feedback
                            .toast(ToastLevel::Error, &format!("Impossible de charger les postes : {}", err));
                        return;
                    }
                }
            }
        };
        if self.posts_request.get() != request {
            return;
        }

        {
            let mut state = self.state.borrow_mut();
            let current = state.form.post_id.clone();
            if !current.is_empty() && !posts.iter().any(|p| p.id.to_string() == current) {
                state.form.post_id.clear();
            }
            state.posts = posts;
        }
        self.changed();
    }

    /// Post changed: empty time fields take the post's default hours
    pub fn select_post(&self, post: String) {
        {
            let mut state = self.state.borrow_mut();
            let defaults = state
                .posts
                .iter()
                .find(|p| p.id.to_string() == post)
                .map(|p| (p.heure_debut.clone(), p.heure_fin.clone()));
            state.form.post_id = post;
            if let Some((Some(start), Some(end))) = defaults {
                if state.form.start_time.is_empty() && state.form.end_time.is_empty() {
                    state.form.start_time = short_time(&start);
                    state.form.end_time = short_time(&end);
                }
            }
        }
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
        let result = self.api.save_assignment(id, &payload).await;
        let fallback = if id.is_some() { "Affectation mise à jour" } else { "Affectation créée" };
        self.finish_mutation(ticket, result, fallback);
    }

    /// Delete the record being edited, after confirmation
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

        let result = self.api.delete_assignment(id).await;
        self.finish_mutation(ticket, result, "Affectation supprimée");
    }

    fn finish_mutation(&self, ticket: super::Ticket, result: Result<Option<String>, ApiError>, fallback: &str) {
        self.state.borrow_mut().session.finish_submit(ticket, result.is_ok());
        match result {
            Ok(message) => {
                info!("{}", fallback);
                self.feedback
                    .toast(ToastLevel::Success, message.as_deref().unwrap_or(fallback));
                self.calendar.refresh();
            }
            Err(err) => {
                warn!("assignment mutation failed: {}", err);
                self.feedback.toast(ToastLevel::Error, &err.to_string());
            }
        }
        self.changed();
    }

    pub fn close(&self) {
        self.api.abort(RequestScope::AssignmentDetail);
        self.state.borrow_mut().session.close();
        self.changed();
    }
}
