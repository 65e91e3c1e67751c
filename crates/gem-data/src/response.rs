//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Fallback when a failed response carries nothing readable.
const UNKNOWN_ERROR: &str = "Unknown error";

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Build a JSON response; handy for fakes.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, value.to_string().into_bytes())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error message is taken from a structured backend body when there
    /// is one (`{"message": ...}` or `{"error": ...}`), otherwise from the
    /// raw body text.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(FetchError::HttpError {
            status: self.status,
            message: self.error_message(),
        })
    }

    fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for field in ["message", "error"] {
                match value.get(field) {
                    Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                    // Some backends nest: {"error": {"message": "..."}}
                    Some(nested @ serde_json::Value::Object(_)) => {
                        if let Some(serde_json::Value::String(s)) = nested.get("message") {
                            return s.clone();
                        }
                    }
                    _ => {}
                }
            }
        }
        match self.text() {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}
