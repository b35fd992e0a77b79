//! Form Payload
//!
//! Ordered key/value pairs sent as `application/x-www-form-urlencoded`.
//! Keys may repeat (multi-valued fields).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in form keys and values
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*')
    .remove(b' ');

/// Percent-encode one query or form component (space becomes `+`)
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE).to_string().replace(' ', "+")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.to_string(), value.into()));
        self
    }

    /// One pair per value, or a single empty pair when there are none
    pub fn push_all<I, S>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.pairs.len();
        for value in values {
            self.push(key, value);
        }
        if self.pairs.len() == before {
            self.push(key, String::new());
        }
        self
    }

    /// First value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Every value for a key, in insertion order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_escapes_values() {
        let mut payload = FormPayload::new();
        payload.push("titre", "Point RH & paie").push("lieu", "Salle 2/B");
        assert_eq!(payload.encode(), "titre=Point+RH+%26+paie&lieu=Salle+2%2FB");
    }

    #[test]
    fn test_encode_utf8() {
        let mut payload = FormPayload::new();
        payload.push("notes", "relève");
        assert_eq!(payload.encode(), "notes=rel%C3%A8ve");
    }

    #[test]
    fn test_push_all_repeats_key() {
        let mut payload = FormPayload::new();
        payload.push_all("employes", ["E1", "E2"]);
        assert_eq!(payload.get_all("employes"), vec!["E1", "E2"]);
        assert_eq!(payload.encode(), "employes=E1&employes=E2");
    }

    #[test]
    fn test_push_all_without_values_keeps_key() {
        let mut payload = FormPayload::new();
        payload.push_all("employes", Vec::<String>::new());
        assert!(payload.contains_key("employes"));
        assert_eq!(payload.get("employes"), Some(""));
        assert_eq!(payload.encode(), "employes=");
    }
}
