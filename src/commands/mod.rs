//! Planning Endpoint Wrappers
//!
//! Frontend bindings to the planning endpoints, behind the `PlanningApi`
//! trait so controllers can run against any implementation.

mod csrf;
mod decode;
mod http;
mod payload;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{AssignmentDetail, CalendarEntry, EventDetail, Post};

pub use csrf::{document_token, is_mutating, request_headers, token_from_cookies};
pub use decode::{decode_ack, decode_detail, decode_entries, decode_posts};
pub use http::HttpApi;
pub use payload::{encode_component, FormPayload};

/// Failure of a planning request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network failure or browser-level error
    #[error("erreur réseau : {0}")]
    Transport(String),
    /// Request aborted because it was superseded or its owner went away
    #[error("requête annulée")]
    Aborted,
    /// Non-2xx response
    #[error("le serveur a répondu {0}")]
    Status(u16),
    /// Body was not the expected JSON
    #[error("réponse inattendue du serveur : {0}")]
    Decode(String),
    /// 2xx response with `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

/// Request families; a new request aborts the pending one of its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestScope {
    AssignmentSource,
    EventSource,
    AssignmentDetail,
    EventDetail,
    Detail,
    PostsBySite,
}

/// Planning endpoints
#[async_trait(?Send)]
pub trait PlanningApi {
    /// Assignments overlapping `[start, end)`
    async fn assignments_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError>;

    /// Events overlapping `[start, end)`
    async fn events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError>;

    /// Assignment detail; `scope` lets the read-only and edit flows abort independently
    async fn assignment_detail(&self, id: u32, scope: RequestScope) -> Result<AssignmentDetail, ApiError>;

    async fn event_detail(&self, id: u32, scope: RequestScope) -> Result<EventDetail, ApiError>;

    /// Create (`id == None`) or update an assignment; returns the server message
    async fn save_assignment(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError>;

    async fn delete_assignment(&self, id: u32) -> Result<Option<String>, ApiError>;

    /// Create (`id == None`) or update an event; returns the server message
    async fn save_event(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError>;

    async fn delete_event(&self, id: u32) -> Result<Option<String>, ApiError>;

    async fn posts_by_site(&self, site_id: u32) -> Result<Vec<Post>, ApiError>;

    /// Abort the pending request of a scope, if any
    fn abort(&self, _scope: RequestScope) {}
}
