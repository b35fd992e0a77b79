//! Page Configuration
//!
//! Reference data, capabilities and endpoint templates injected by the
//! server when the page is rendered.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::calendar::CalendarView;
use crate::commands::encode_component;
use crate::datetime::format_date;
use crate::models::{Employee, Planning, Post, Site};

/// Id of the `<script type="application/json">` element holding the config
pub const CONFIG_ELEMENT_ID: &str = "planning-config";
/// Global object checked when the script element is absent
pub const CONFIG_GLOBAL: &str = "PLANNING_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration du planning absente")]
    Missing,
    #[error("configuration du planning invalide : {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("configuration du planning illisible : {0}")]
    Js(String),
}

/// Endpoint URL templates; `{id}` is replaced for record operations
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Endpoints {
    pub assignments: String,
    pub events: String,
    pub assignment_detail: String,
    pub assignment_create: String,
    pub assignment_update: String,
    pub assignment_delete: String,
    pub event_detail: String,
    pub event_create: String,
    pub event_update: String,
    pub event_delete: String,
    pub posts_by_site: String,
}

impl Endpoints {
    pub fn record_url(template: &str, id: u32) -> String {
        template.replace("{id}", &id.to_string())
    }

    /// Range GET: template plus `start`/`end` query parameters
    pub fn range_url(template: &str, start: NaiveDate, end: NaiveDate) -> String {
        let separator = if template.contains('?') { '&' } else { '?' };
        format!(
            "{}{}start={}&end={}",
            template,
            separator,
            encode_component(&format_date(start)),
            encode_component(&format_date(end))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub initial_view: CalendarView,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_day_start")]
    pub day_start_hour: u32,
    #[serde(default = "default_day_end")]
    pub day_end_hour: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            initial_view: CalendarView::default(),
            slot_minutes: default_slot_minutes(),
            day_start_hour: default_day_start(),
            day_end_hour: default_day_end(),
        }
    }
}

fn default_slot_minutes() -> u32 {
    30
}

fn default_day_start() -> u32 {
    6
}

fn default_day_end() -> u32 {
    22
}

/// Where the CSRF token is read from and which header carries it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsrfOptions {
    #[serde(default = "default_csrf_cookie")]
    pub cookie: String,
    #[serde(default = "default_csrf_header")]
    pub header: String,
}

impl Default for CsrfOptions {
    fn default() -> Self {
        Self {
            cookie: default_csrf_cookie(),
            header: default_csrf_header(),
        }
    }
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_csrf_header() -> String {
    "X-CSRFToken".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub plannings: Vec<Planning>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default, rename = "canEdit", alias = "can_edit")]
    pub can_edit: bool,
    pub endpoints: Endpoints,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(default)]
    pub csrf: CsrfOptions,
}

impl PageConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Err(ConfigError::Missing);
        }
        Ok(serde_json::from_str(text)?)
    }

    pub fn employee(&self, matricule: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.matricule == matricule)
    }

    /// Display name for a matricule, the matricule itself when unknown
    pub fn employee_name(&self, matricule: &str) -> String {
        self.employee(matricule)
            .map(Employee::display_name)
            .unwrap_or_else(|| matricule.to_string())
    }

    pub fn post(&self, id: u32) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn site(&self, id: u32) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn planning(&self, id: u32) -> Option<&Planning> {
        self.plannings.iter().find(|p| p.id == id)
    }
}

/// Read the configuration injected into the page
pub fn load_page_config() -> Result<PageConfig, ConfigError> {
    let window = web_sys::window().ok_or(ConfigError::Missing)?;
    if let Some(element) = window.document().and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID)) {
        return PageConfig::from_json(&element.text_content().unwrap_or_default());
    }

    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|e| ConfigError::Js(format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        return Err(ConfigError::Missing);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Js(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"{
        "plannings": [{"id": 1, "nom": "Planning Mars"}],
        "employees": [
            {"matricule": "E1", "nom": "Koné", "prenoms": "Awa"},
            {"matricule": "E2", "nom": "Diallo", "prenoms": "Jean"},
            {"matricule": "E3", "nom": "Traoré", "prenoms": "Mariam"}
        ],
        "sites": [{"id": 10, "nom": "Siège"}, {"id": 20, "nom": "Entrepôt"}],
        "posts": [
            {"id": 100, "nom": "Accueil", "site_id": 10, "heure_debut": "08:00:00", "heure_fin": "16:00:00"},
            {"id": 101, "nom": "Sécurité", "site_id": 10},
            {"id": 200, "nom": "Quai", "site_id": 20, "heure_debut": "06:00", "heure_fin": "14:00"}
        ],
        "canEdit": true,
        "endpoints": {
            "assignments": "/gta/planning/affectations/",
            "events": "/gta/planning/evenements/",
            "assignment_detail": "/gta/planning/affectations/{id}/",
            "assignment_create": "/gta/planning/affectations/creer/",
            "assignment_update": "/gta/planning/affectations/{id}/modifier/",
            "assignment_delete": "/gta/planning/affectations/{id}/supprimer/",
            "event_detail": "/gta/planning/evenements/{id}/",
            "event_create": "/gta/planning/evenements/creer/",
            "event_update": "/gta/planning/evenements/{id}/modifier/",
            "event_delete": "/gta/planning/evenements/{id}/supprimer/",
            "posts_by_site": "/gta/planning/postes-par-site/"
        },
        "display": {"initial_view": "timeGridWeek"}
    }"#;

    pub(crate) fn sample_config() -> PageConfig {
        PageConfig::from_json(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_with_defaults() {
        let config = sample_config();
        assert!(config.can_edit);
        assert_eq!(config.display.initial_view, CalendarView::Week);
        assert_eq!(config.display.slot_minutes, 30);
        assert_eq!(config.csrf.cookie, "csrftoken");
        assert_eq!(config.csrf.header, "X-CSRFToken");
        assert_eq!(config.posts[1].heure_debut, None);
    }

    #[test]
    fn test_empty_config_is_missing() {
        assert!(matches!(PageConfig::from_json("  "), Err(ConfigError::Missing)));
        assert!(matches!(PageConfig::from_json("{}"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_lookups() {
        let config = sample_config();
        assert_eq!(config.employee_name("E1"), "Awa Koné");
        assert_eq!(config.employee_name("X9"), "X9");
        assert_eq!(config.post(200).map(|p| p.nom.as_str()), Some("Quai"));
        assert!(config.site(99).is_none());
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            Endpoints::record_url("/gta/planning/affectations/{id}/", 12),
            "/gta/planning/affectations/12/"
        );
        let start = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(
            Endpoints::range_url("/api/evenements/", start, end),
            "/api/evenements/?start=2024-02-26&end=2024-03-04"
        );
        assert_eq!(
            Endpoints::range_url("/api/affectations/?planning=1", start, end),
            "/api/affectations/?planning=1&start=2024-02-26&end=2024-03-04"
        );
    }
}
