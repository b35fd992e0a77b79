//! UI Ports
//!
//! What controllers need from the page: transient messages, confirmations
//! and a way to ask the calendar to re-fetch.

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "toast toast-success",
            ToastLevel::Info => "toast toast-info",
            ToastLevel::Warning => "toast toast-warning",
            ToastLevel::Error => "toast toast-error",
        }
    }
}

/// User feedback surface
pub trait Feedback {
    fn toast(&self, level: ToastLevel, message: &str);

    /// Blocking yes/no confirmation
    fn confirm(&self, message: &str) -> bool;
}

/// Calendar widget as seen by the controllers
pub trait CalendarHandle {
    /// Re-fetch both event sources
    fn refresh(&self);
}
