//! One JSON request over HTTP.
//!
//! `fetch_json` is deliberately strict about what it accepts:
//!
//! ```text
//! 204                    → Ok(None)
//! content-type ≠ JSON    → NonJsonResponse   (body never read)
//! JSON, non-2xx          → Http { status, body }
//! JSON, 2xx              → Ok(Some(parsed))
//! send/read failure      → Transport
//! ```

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::RequestError;

/// Everything needed to issue one request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
    /// Applied after the JSON content-type, so a caller-supplied
    /// `Content-Type` replaces the default.
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Whether a content-type header names a JSON media type
/// (`application/json`, `application/problem+json`, parameters allowed).
pub fn is_json_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower
        .find("application/")
        .is_some_and(|start| lower[start + "application/".len()..].contains("json"))
}

fn build_headers(has_body: bool, extra: &[(String, String)]) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Issue a single request and classify the response.
///
/// Returns `Ok(None)` for 204 No Content.
pub async fn fetch_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    options: FetchOptions,
) -> Result<Option<T>, RequestError> {
    let FetchOptions {
        url,
        method,
        body,
        headers,
    } = options;

    let request_headers = build_headers(body.is_some(), &headers)?;

    debug!("{} {} (body: {})", method, url, body.is_some());

    let mut builder = http.request(method.clone(), &url).headers(request_headers);
    if let Some(body) = body {
        builder = builder.body(body.to_string());
    }

    let response = builder.send().await?;
    let status = response.status();
    debug!("{} {} -> {}", method, url, status);

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if !content_type.as_deref().is_some_and(is_json_content_type) {
        warn!(
            "Non-JSON response from {}: HTTP {} ({:?})",
            url, status, content_type
        );
        return Err(RequestError::NonJsonResponse {
            status: status.as_u16(),
            content_type,
        });
    }

    let bytes = response.bytes().await?;
    let json: Value =
        serde_json::from_slice(&bytes).map_err(|e| RequestError::Decode(e.to_string()))?;

    if !status.is_success() {
        warn!("Bad response: {} {}", status.as_u16(), json);
        return Err(RequestError::Http {
            status: status.as_u16(),
            body: json,
        });
    }

    let parsed = serde_json::from_value(json).map_err(|e| RequestError::Decode(e.to_string()))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_content_types_match() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/vnd.api+json"));
    }

    #[test]
    fn non_json_content_types_rejected() {
        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type("text/plain; charset=utf-8"));
        assert!(!is_json_content_type("application/xml"));
        assert!(!is_json_content_type("text/json"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn body_sets_json_content_type() {
        let headers = build_headers(true, &[]).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn no_body_no_content_type() {
        let headers = build_headers(false, &[]).unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn caller_content_type_wins() {
        let extra = vec![(
            "Content-Type".to_string(),
            "application/vnd.chat+json".to_string(),
        )];
        let headers = build_headers(true, &extra).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/vnd.chat+json");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn caller_headers_are_kept() {
        let extra = vec![("X-Widget".to_string(), "chatui".to_string())];
        let headers = build_headers(true, &extra).unwrap();
        assert_eq!(headers.get("x-widget").unwrap(), "chatui");
        assert!(headers.get(CONTENT_TYPE).is_some());
    }

    #[test]
    fn invalid_header_name_is_reported() {
        let extra = vec![("bad header".to_string(), "x".to_string())];
        let err = build_headers(false, &extra).unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader(_)));
    }

    #[test]
    fn fetch_options_builders() {
        let options = FetchOptions::post("http://localhost/chat", json!({"a": 1}))
            .with_header("X-Trace", "1");
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body, Some(json!({"a": 1})));
        assert_eq!(options.headers.len(), 1);

        let get = FetchOptions::new(Method::GET, "http://localhost/health");
        assert!(get.body.is_none());
    }
}
