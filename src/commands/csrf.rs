//! CSRF Token
//!
//! Reads the anti-forgery token the server sets as a cookie and decides
//! which request headers carry it.

use percent_encoding::percent_decode_str;

/// Value of cookie `name` in a `document.cookie` string
pub fn token_from_cookies(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value.trim()).decode_utf8_lossy().to_string())
        .filter(|value| !value.is_empty())
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Anything but GET/HEAD changes server state
pub fn is_mutating(method: &str) -> bool {
    !matches!(method.to_ascii_uppercase().as_str(), "GET" | "HEAD")
}

/// Headers for a request. Form bodies get a content type; mutating
/// requests get the token under `csrf_header` when one is known.
pub fn request_headers(
    method: &str,
    body: Option<&str>,
    csrf_header: &str,
    token: Option<&str>,
) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
    ];
    if body.is_some() {
        headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
    }
    if is_mutating(method) {
        if let Some(token) = token {
            headers.push((csrf_header.to_string(), token.to_string()));
        }
    }
    headers
}

/// Token from the current document's cookies
pub fn document_token(name: &str) -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
    let cookies = html.cookie().ok()?;
    token_from_cookies(&cookies, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_named_cookie() {
        let cookies = "sessionid=abc; csrftoken=Xy12%3D; theme=dark";
        assert_eq!(token_from_cookies(cookies, "csrftoken").as_deref(), Some("Xy12="));
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert_eq!(token_from_cookies("sessionid=abc", "csrftoken"), None);
        assert_eq!(token_from_cookies("csrftoken=", "csrftoken"), None);
        assert_eq!(token_from_cookies("", "csrftoken"), None);
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_mutations_carry_token() {
        let headers = request_headers("POST", Some("a=1"), "X-CSRFToken", Some("tok"));
        assert_eq!(header(&headers, "X-CSRFToken"), Some("tok"));
        assert!(header(&headers, "Content-Type").is_some_and(|v| v.starts_with("application/x-www-form-urlencoded")));

        let headers = request_headers("post", None, "X-CSRFToken", Some("tok"));
        assert_eq!(header(&headers, "X-CSRFToken"), Some("tok"));
        assert_eq!(header(&headers, "Content-Type"), None);
    }

    #[test]
    fn test_reads_never_carry_token() {
        let headers = request_headers("GET", None, "X-CSRFToken", Some("tok"));
        assert_eq!(header(&headers, "X-CSRFToken"), None);
        assert_eq!(header(&headers, "Accept"), Some("application/json"));
        assert!(!is_mutating("HEAD"));
    }

    #[test]
    fn test_missing_token_sends_no_header() {
        let headers = request_headers("POST", Some("a=1"), "X-CSRFToken", None);
        assert_eq!(header(&headers, "X-CSRFToken"), None);
    }

    #[test]
    fn test_prefix_does_not_match() {
        assert_eq!(token_from_cookies("xcsrftoken=nope", "csrftoken"), None);
    }
}
