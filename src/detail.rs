//! Detail Table
//!
//! Key/value rows shown by the read-only detail modal. Every value is
//! escaped before it is interpolated into markup.

use crate::config::PageConfig;
use crate::datetime::{display_datetime, format_display_date, parse_date, short_time};
use crate::models::{option_label, AssignmentDetail, EventDetail, ASSIGNMENT_STATUSES, EVENT_TYPES};

const NO_PARTICIPANTS: &str = "Aucun";

/// Escape the five HTML-significant characters
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailTable {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl DetailTable {
    fn row(&mut self, label: &str, value: impl Into<String>) {
        self.rows.push((label.to_string(), value.into()));
    }

    /// Row skipped when the value is blank
    fn optional_row(&mut self, label: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.row(label, value);
        }
    }

    pub fn for_assignment(detail: &AssignmentDetail, config: &PageConfig) -> Self {
        let post = config.post(detail.poste_id);
        let site = post
            .and_then(|p| p.site_id)
            .and_then(|id| config.site(id))
            .map(|s| s.nom.clone())
            .unwrap_or_default();
        let date = parse_date(&detail.date)
            .map(format_display_date)
            .unwrap_or_else(|| detail.date.clone());

        let mut table = Self {
            title: "Détail de l'affectation".to_string(),
            rows: Vec::new(),
        };
        table.row("Employé", config.employee_name(&detail.employe_matricule));
        table.row(
            "Poste",
            post.map(|p| p.nom.clone()).unwrap_or_else(|| detail.poste_id.to_string()),
        );
        table.row("Site", site);
        table.row(
            "Planning",
            config
                .planning(detail.planning_id)
                .map(|p| p.nom.clone())
                .unwrap_or_else(|| detail.planning_id.to_string()),
        );
        table.row("Date", date);
        table.row(
            "Horaire",
            format!("{} - {}", short_time(&detail.heure_debut), short_time(&detail.heure_fin)),
        );
        table.row("Statut", option_label(ASSIGNMENT_STATUSES, &detail.statut));
        table.optional_row("Notes", detail.notes.as_deref());
        table
    }

    pub fn for_event(detail: &EventDetail) -> Self {
        let participants = if detail.participants.is_empty() {
            NO_PARTICIPANTS.to_string()
        } else {
            detail
                .participants
                .iter()
                .map(|p| p.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut table = Self {
            title: "Détail de l'événement".to_string(),
            rows: Vec::new(),
        };
        table.row("Titre", detail.titre.as_str());
        table.row("Type", option_label(EVENT_TYPES, &detail.type_evenement));
        table.row("Début", display_datetime(&detail.date_debut));
        table.row("Fin", display_datetime(&detail.date_fin));
        table.optional_row("Lieu", detail.lieu.as_deref());
        table.optional_row("Description", detail.description.as_deref());
        table.row("Participants", participants);
        table
    }

    pub fn to_html(&self) -> String {
        let rows: String = self
            .rows
            .iter()
            .map(|(label, value)| format!("<tr><th>{}</th><td>{}</td></tr>", escape_html(label), escape_html(value)))
            .collect();
        format!("<table class=\"detail-table\"><tbody>{}</tbody></table>", rows)
    }
}
