//! Detail Modal Controller
//!
//! Read-only view of an assignment or event for users without edit rights.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};

use super::{Feedback, ToastLevel};
use crate::commands::{ApiError, PlanningApi, RequestScope};
use crate::config::PageConfig;
use crate::detail::DetailTable;
use crate::models::EntryKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailModal {
    pub open: bool,
    pub loading: bool,
    pub table: Option<DetailTable>,
}

impl DetailModal {
    pub fn title(&self) -> &str {
        self.table.as_ref().map(|t| t.title.as_str()).unwrap_or("Détail")
    }
}

pub struct DetailController {
    api: Rc<dyn PlanningApi>,
    feedback: Rc<dyn Feedback>,
    config: Rc<PageConfig>,
    state: RefCell<DetailModal>,
    generation: Cell<u64>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl DetailController {
    pub fn new(api: Rc<dyn PlanningApi>, feedback: Rc<dyn Feedback>, config: Rc<PageConfig>) -> Self {
        Self {
            api,
            feedback,
            config,
            state: RefCell::new(DetailModal::default()),
            generation: Cell::new(0),
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

    fn bump(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    pub fn snapshot(&self) -> DetailModal {
        self.state.borrow().clone()
    }

    pub async fn open(&self, kind: EntryKind, id: u32) {
        let generation = self.bump();
        *self.state.borrow_mut() = DetailModal { open: true, loading: true, table: None };
        self.changed();

        let result: Result<DetailTable, ApiError> = match kind {
            EntryKind::Assignment => self
                .api
                .assignment_detail(id, RequestScope::Detail)
                .await
                .map(|detail| DetailTable::for_assignment(&detail, &self.config)),
            EntryKind::Event => self
                .api
                .event_detail(id, RequestScope::Detail)
                .await
                .map(|detail| DetailTable::for_event(&detail)),
        };
        if self.generation.get() != generation {
            debug!("discarding stale {:?} {} detail", kind, id);
            return;
        }

        match result {
            Ok(table) => {
                *self.state.borrow_mut() = DetailModal { open: true, loading: false, table: Some(table) };
            }
            Err(err) => {
                *self.state.borrow_mut() = DetailModal::default();
                if !err.is_aborted() {
                    warn!("{:?} {} detail failed: {}", kind, id, err);
                    self.feedback
                        .toast(ToastLevel::Error, &format!("Impossible de charger le détail : {}", err));
                }
            }
        }
        self.changed();
    }

    pub fn close(&self) {
        self.bump();
        self.api.abort(RequestScope::Detail);
        *self.state.borrow_mut() = DetailModal::default();
        self.changed();
    }
}
