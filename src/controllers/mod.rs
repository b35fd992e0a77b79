//! Modal Controllers
//!
//! DOM-free logic behind the assignment, event and detail modals. Views
//! read snapshots and forward user input; controllers talk to the
//! `PlanningApi` and report through the UI ports.

mod assignment;
mod detail;
mod event;
mod ports;
mod session;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use assignment::{AssignmentController, AssignmentField, AssignmentForm, AssignmentModal};
pub use detail::{DetailController, DetailModal};
pub use event::{EventController, EventField, EventForm, EventModal};
pub use ports::{CalendarHandle, Feedback, ToastLevel};
pub use session::{ModalSession, ModalState, Ticket};

/// Form check failure, reported before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Le champ « {0} » est obligatoire")]
    Missing(&'static str),
    #[error("Le champ « {0} » n'est pas une date valide")]
    InvalidDate(&'static str),
    #[error("L'heure de fin doit être postérieure à l'heure de début")]
    EndTimeNotAfterStart,
    #[error("La date de fin doit être postérieure à la date de début")]
    EndNotAfterStart,
}

/// Fail on the first empty field
fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(ValidationError::Missing(label)),
        None => Ok(()),
    }
}
