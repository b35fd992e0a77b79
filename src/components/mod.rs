//! UI Components
//!
//! Calendar, modals and toasts.

mod assignment_modal;
mod calendar_view;
mod detail_modal;
mod event_modal;
mod toast_stack;

pub use assignment_modal::AssignmentModal;
pub use calendar_view::CalendarView;
pub use detail_modal::DetailModal;
pub use event_modal::EventModal;
pub use toast_stack::ToastStack;
