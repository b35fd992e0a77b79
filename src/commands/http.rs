//! HTTP Implementation
//!
//! `PlanningApi` over the browser `fetch` API. Mutations are form-encoded
//! POSTs carrying the CSRF token; reads are abortable per scope.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{decode_ack, decode_detail, decode_entries, decode_posts, document_token, is_mutating, request_headers};
use super::{ApiError, FormPayload, PlanningApi, RequestScope};
use crate::config::{CsrfOptions, Endpoints};
use crate::models::{AssignmentDetail, CalendarEntry, EventDetail, Post};

fn js_error(value: JsValue) -> ApiError {
    ApiError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

pub struct HttpApi {
    endpoints: Endpoints,
    csrf: CsrfOptions,
    next_request: Cell<u64>,
    in_flight: RefCell<HashMap<RequestScope, (u64, web_sys::AbortController)>>,
}

impl HttpApi {
    pub fn new(endpoints: Endpoints, csrf: CsrfOptions) -> Self {
        Self {
            endpoints,
            csrf,
            next_request: Cell::new(0),
            in_flight: RefCell::new(HashMap::new()),
        }
    }

    /// Register a request under its scope, aborting the one it supersedes
    fn track(&self, scope: RequestScope, controller: &web_sys::AbortController) -> u64 {
        let request_id = self.next_request.get() + 1;
        self.next_request.set(request_id);
        let previous = self
            .in_flight
            .borrow_mut()
            .insert(scope, (request_id, controller.clone()));
        if let Some((_, previous)) = previous {
            debug!("aborting superseded {:?} request", scope);
            previous.abort();
        }
        request_id
    }

    fn release(&self, scope: RequestScope, request_id: u64) {
        let mut in_flight = self.in_flight.borrow_mut();
        if matches!(in_flight.get(&scope), Some((id, _)) if *id == request_id) {
            in_flight.remove(&scope);
        }
    }

    async fn get(&self, scope: RequestScope, url: &str) -> Result<String, ApiError> {
        let controller = web_sys::AbortController::new().map_err(js_error)?;
        let request_id = self.track(scope, &controller);
        let result = self.send("GET", url, None, Some(&controller)).await;
        self.release(scope, request_id);
        result
    }

    async fn post(&self, url: &str, payload: &FormPayload) -> Result<String, ApiError> {
        self.send("POST", url, Some(payload.encode()), None).await
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
        controller: Option<&web_sys::AbortController>,
    ) -> Result<String, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("fenêtre indisponible".to_string()))?;
        debug!("{} {}", method, url);

        let token = if is_mutating(method) {
            let token = document_token(&self.csrf.cookie);
            if token.is_none() {
                warn!("no `{}` cookie, sending {} {} without CSRF token", self.csrf.cookie, method, url);
            }
            token
        } else {
            None
        };
        let headers = web_sys::Headers::new().map_err(js_error)?;
        for (name, value) in request_headers(method, body.as_deref(), &self.csrf.header, token.as_deref()) {
            headers.set(&name, &value).map_err(js_error)?;
        }

        let init = web_sys::RequestInit::new();
        init.set_method(method);
        init.set_credentials(web_sys::RequestCredentials::SameOrigin);
        if let Some(body) = &body {
            init.set_body(&JsValue::from_str(body));
        }
        init.set_headers(&headers);
        if let Some(controller) = controller {
            init.set_signal(Some(&controller.signal()));
        }

        let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(js_error)?;
        let aborted = || controller.map(|c| c.signal().aborted()).unwrap_or(false);

        let response = match JsFuture::from(window.fetch_with_request(&request)).await {
            Ok(value) => value
                .dyn_into::<web_sys::Response>()
                .map_err(|_| ApiError::Decode("objet Response attendu".to_string()))?,
            Err(_) if aborted() => return Err(ApiError::Aborted),
            Err(err) => {
                let err = js_error(err);
                warn!("{} {} failed: {}", method, url, err);
                return Err(err);
            }
        };

        if !response.ok() {
            warn!("{} {} returned {}", method, url, response.status());
            return Err(ApiError::Status(response.status()));
        }

        let text = match JsFuture::from(response.text().map_err(js_error)?).await {
            Ok(text) => text,
            Err(_) if aborted() => return Err(ApiError::Aborted),
            Err(err) => return Err(js_error(err)),
        };
        text.as_string().ok_or_else(|| ApiError::Decode("corps de réponse vide".to_string()))
    }
}

#[async_trait(?Send)]
impl PlanningApi for HttpApi {
    async fn assignments_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError> {
        let url = Endpoints::range_url(&self.endpoints.assignments, start, end);
        let body = self.get(RequestScope::AssignmentSource, &url).await?;
        decode_entries(&body)
    }

    async fn events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>, ApiError> {
        let url = Endpoints::range_url(&self.endpoints.events, start, end);
        let body = self.get(RequestScope::EventSource, &url).await?;
        decode_entries(&body)
    }

    async fn assignment_detail(&self, id: u32, scope: RequestScope) -> Result<AssignmentDetail, ApiError> {
        let url = Endpoints::record_url(&self.endpoints.assignment_detail, id);
        let body = self.get(scope, &url).await?;
        decode_detail(&body)
    }

    async fn event_detail(&self, id: u32, scope: RequestScope) -> Result<EventDetail, ApiError> {
        let url = Endpoints::record_url(&self.endpoints.event_detail, id);
        let body = self.get(scope, &url).await?;
        decode_detail(&body)
    }

    async fn save_assignment(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError> {
        let url = match id {
            Some(id) => Endpoints::record_url(&self.endpoints.assignment_update, id),
            None => self.endpoints.assignment_create.clone(),
        };
        let body = self.post(&url, payload).await?;
        decode_ack(&body)
    }

    async fn delete_assignment(&self, id: u32) -> Result<Option<String>, ApiError> {
        let url = Endpoints::record_url(&self.endpoints.assignment_delete, id);
        let body = self.post(&url, &FormPayload::new()).await?;
        decode_ack(&body)
    }

    async fn save_event(&self, id: Option<u32>, payload: &FormPayload) -> Result<Option<String>, ApiError> {
        let url = match id {
            Some(id) => Endpoints::record_url(&self.endpoints.event_update, id),
            None => self.endpoints.event_create.clone(),
        };
        let body = self.post(&url, payload).await?;
        decode_ack(&body)
    }

    async fn delete_event(&self, id: u32) -> Result<Option<String>, ApiError> {
        let url = Endpoints::record_url(&self.endpoints.event_delete, id);
        let body = self.post(&url, &FormPayload::new()).await?;
        decode_ack(&body)
    }

    async fn posts_by_site(&self, site_id: u32) -> Result<Vec<Post>, ApiError> {
        let mut payload = FormPayload::new();
        payload.push("site_id", site_id.to_string());
        let controller = web_sys::AbortController::new().map_err(js_error)?;
        let request_id = self.track(RequestScope::PostsBySite, &controller);
        let result = self
            .send("POST", &self.endpoints.posts_by_site, Some(payload.encode()), Some(&controller))
            .await;
        self.release(RequestScope::PostsBySite, request_id);
        decode_posts(&result?)
    }

    fn abort(&self, scope: RequestScope) {
        if let Some((_, controller)) = self.in_flight.borrow_mut().remove(&scope) {
            debug!("aborting {:?} request", scope);
            controller.abort();
        }
    }
}
