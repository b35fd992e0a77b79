//! Frontend Models
//!
//! Reference data injected with the page and payloads returned by the
//! planning endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Planning (container that assignments belong to)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planning {
    pub id: u32,
    pub nom: String,
}

/// Employee, keyed by matricule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub matricule: String,
    pub nom: String,
    #[serde(default)]
    pub prenoms: String,
}

impl Employee {
    pub fn display_name(&self) -> String {
        full_name(&self.nom, &self.prenoms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    pub nom: String,
}

/// Work position at a site, with default working hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u32,
    pub nom: String,
    #[serde(default)]
    pub site_id: Option<u32>,
    #[serde(default)]
    pub heure_debut: Option<String>,
    #[serde(default)]
    pub heure_fin: Option<String>,
}

/// Which source a calendar entry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntryKind {
    #[default]
    #[serde(rename = "affectation", alias = "assignment")]
    Assignment,
    #[serde(rename = "evenement", alias = "event")]
    Event,
}

/// Extra properties carried by a calendar entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryProps {
    #[serde(default, rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub record_id: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Participant display names (events only)
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub statut: Option<String>,
}

/// Calendar-event object returned by both range endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default, rename = "allDay")]
    pub all_day: bool,
    #[serde(default, rename = "backgroundColor", alias = "color")]
    pub color: Option<String>,
    #[serde(default, rename = "extendedProps")]
    pub props: EntryProps,
}

impl CalendarEntry {
    /// Server record id: explicit `record_id`, else the trailing digits of `id`
    pub fn record_id(&self) -> Option<u32> {
        if let Some(id) = self.props.record_id {
            return Some(id);
        }
        let digits: String = self
            .id
            .rsplit(|c: char| !c.is_ascii_digit())
            .next()
            .unwrap_or("")
            .to_string();
        digits.parse().ok()
    }

    pub fn kind(&self) -> EntryKind {
        self.props.kind
    }

    /// Hover text: notes for assignments, description for events
    pub fn tooltip(&self) -> Option<String> {
        let text = match self.props.kind {
            EntryKind::Assignment => self.props.notes.as_deref(),
            EntryKind::Event => self.props.description.as_deref(),
        };
        text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
    }

    /// Second cell line: participant names, events only
    pub fn participants_line(&self) -> Option<String> {
        if self.props.kind != EntryKind::Event || self.props.participants.is_empty() {
            return None;
        }
        Some(self.props.participants.join(", "))
    }
}

/// Assignment as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDetail {
    pub id: u32,
    pub planning_id: u32,
    pub employe_matricule: String,
    pub poste_id: u32,
    pub date: String,
    pub heure_debut: String,
    pub heure_fin: String,
    #[serde(default)]
    pub statut: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub matricule: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenoms: String,
}

impl Participant {
    pub fn display_name(&self) -> String {
        let name = full_name(&self.nom, &self.prenoms);
        if name.is_empty() { self.matricule.clone() } else { name }
    }
}

/// Event as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    pub id: u32,
    pub titre: String,
    #[serde(default)]
    pub type_evenement: String,
    pub date_debut: String,
    pub date_fin: String,
    #[serde(default)]
    pub lieu: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// `{success, data?, message?, error?}` response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Response of the posts-by-site endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PostsBySite {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub postes: Vec<Post>,
    pub error: Option<String>,
}

/// Assignment status options (value, label)
pub const ASSIGNMENT_STATUSES: &[(&str, &str)] = &[
    ("planifie", "Planifié"),
    ("confirme", "Confirmé"),
    ("realise", "Réalisé"),
    ("absent", "Absent"),
    ("annule", "Annulé"),
];

pub const DEFAULT_STATUS: &str = "planifie";

/// Event type options (value, label)
pub const EVENT_TYPES: &[(&str, &str)] = &[
    ("reunion", "Réunion"),
    ("formation", "Formation"),
    ("conge", "Congé"),
    ("astreinte", "Astreinte"),
    ("autre", "Autre"),
];

pub const DEFAULT_EVENT_TYPE: &str = "reunion";

/// Label for a value of an option list; unknown values are shown as-is
pub fn option_label<'a>(options: &'a [(&'a str, &'a str)], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

fn full_name(nom: &str, prenoms: &str) -> String {
    format!("{} {}", prenoms.trim(), nom.trim()).trim().to_string()
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_entry_wire_shape() {
        let json = r##"{
            "id": "evt-42",
            "title": "Réunion d'équipe",
            "start": "2024-03-01T09:00:00",
            "end": "2024-03-01T10:00:00",
            "backgroundColor": "#3498db",
            "extendedProps": {"type": "evenement", "participants": ["Awa Koné", "Jean Diallo"], "description": "  "}
        }"##;
        let entry: CalendarEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.kind(), EntryKind::Event);
        assert_eq!(entry.record_id(), Some(42));
        assert_eq!(entry.participants_line().as_deref(), Some("Awa Koné, Jean Diallo"));
        assert_eq!(entry.tooltip(), None);
        assert!(!entry.all_day);
    }

    #[test]
    fn test_numeric_id_and_explicit_record_id() {
        let entry: CalendarEntry = serde_json::from_str(
            r#"{"id": 7, "title": "Poste A", "start": "2024-03-01T08:00:00",
                "extendedProps": {"record_id": 99, "notes": "Relève à 14h"}}"#,
        )
        .unwrap();

        assert_eq!(entry.id, "7");
        assert_eq!(entry.record_id(), Some(99));
        assert_eq!(entry.kind(), EntryKind::Assignment);
        assert_eq!(entry.tooltip().as_deref(), Some("Relève à 14h"));
        assert_eq!(entry.participants_line(), None);
    }

    #[test]
    fn test_option_label_falls_back_to_value() {
        assert_eq!(option_label(EVENT_TYPES, "conge"), "Congé");
        assert_eq!(option_label(EVENT_TYPES, "seminaire"), "seminaire");
    }

    #[test]
    fn test_participant_display_name() {
        let p = Participant { matricule: "E1".into(), nom: "Koné".into(), prenoms: "Awa".into() };
        assert_eq!(p.display_name(), "Awa Koné");
        let anonymous = Participant { matricule: "E2".into(), nom: String::new(), prenoms: String::new() };
        assert_eq!(anonymous.display_name(), "E2");
    }
}
