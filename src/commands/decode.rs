//! Response Decoding
//!
//! Turns response bodies into typed results, mapping `{success:false}`
//! to `ApiError::Rejected`.

use serde::de::DeserializeOwned;

use super::ApiError;
use crate::models::{ApiEnvelope, CalendarEntry, Post, PostsBySite};

const GENERIC_REJECTION: &str = "L'opération a été refusée par le serveur";

/// Range endpoint body: must be a JSON array of calendar entries
pub fn decode_entries(body: &str) -> Result<Vec<CalendarEntry>, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !value.is_array() {
        return Err(ApiError::Decode("un tableau d'événements était attendu".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Detail endpoint body: `{success, data}`
pub fn decode_detail<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(rejection(envelope.error.or(envelope.message)));
    }
    envelope.data.ok_or_else(|| ApiError::Decode("champ `data` absent".to_string()))
}

/// Mutation body: `{success, message?}`; returns the server message
pub fn decode_ack(body: &str) -> Result<Option<String>, ApiError> {
    let envelope: ApiEnvelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if envelope.success {
        Ok(envelope.message.filter(|m| !m.trim().is_empty()))
    } else {
        Err(rejection(envelope.error.or(envelope.message)))
    }
}

/// Posts-by-site body: `{success, postes}`
pub fn decode_posts(body: &str) -> Result<Vec<Post>, ApiError> {
    let response: PostsBySite = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !response.success {
        return Err(rejection(response.error));
    }
    Ok(response.postes)
}

fn rejection(message: Option<String>) -> ApiError {
    ApiError::Rejected(
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentDetail, EventDetail};

    #[test]
    fn test_entries_require_array() {
        assert_eq!(decode_entries("[]").unwrap().len(), 0);
        assert!(matches!(decode_entries(r#"{"error": "boom"}"#), Err(ApiError::Decode(_))));
        assert!(matches!(decode_entries("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_assignment_detail() {
        let body = r#"{"success": true, "data": {"id": 5, "planning_id": 1, "employe_matricule": "E1",
            "poste_id": 100, "date": "2024-03-01", "heure_debut": "09:00", "heure_fin": "10:30",
            "statut": "planifie", "notes": null}}"#;
        let detail: AssignmentDetail = decode_detail(body).unwrap();
        assert_eq!(detail.poste_id, 100);
        assert_eq!(detail.notes, None);
    }

    #[test]
    fn test_detail_rejected_with_server_message() {
        let body = r#"{"success": false, "error": "Affectation introuvable"}"#;
        let err = decode_detail::<EventDetail>(body).unwrap_err();
        assert_eq!(err, ApiError::Rejected("Affectation introuvable".to_string()));
    }

    #[test]
    fn test_ack() {
        assert_eq!(decode_ack(r#"{"success": true, "message": "Enregistré"}"#).unwrap().as_deref(), Some("Enregistré"));
        assert_eq!(decode_ack(r#"{"success": true}"#).unwrap(), None);
        assert_eq!(
            decode_ack(r#"{"success": false}"#).unwrap_err(),
            ApiError::Rejected(GENERIC_REJECTION.to_string())
        );
    }

    #[test]
    fn test_posts() {
        let posts = decode_posts(r#"{"success": true, "postes": [{"id": 3, "nom": "Caisse", "heure_debut": "07:00", "heure_fin": "15:00"}]}"#).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].heure_fin.as_deref(), Some("15:00"));
        assert!(decode_posts(r#"{"success": false, "error": "Site inconnu"}"#).is_err());
    }
}
