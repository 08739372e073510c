//! Received HTTP responses.
//!
//! # Design Decisions
//! - Header names are stored lowercased; lookups are case-insensitive
//! - The body is parsed as JSON once; empty or non-JSON bodies become `null`
//!   and the raw text stays available

use std::collections::HashMap;

use serde_json::Value;

use crate::http::DispatchError;

/// Status, headers and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Value,
    text: String,
}

impl ApiResponse {
    /// Build a response from raw parts.
    pub fn new<I, K, V>(status: u16, headers: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let text = text.into();
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
            .collect();

        Self {
            status,
            headers,
            body,
            text,
        }
    }

    /// Drain a reqwest response, reading the full body.
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self, DispatchError> {
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = response.text().await.map_err(DispatchError::Transport)?;

        Ok(Self::new(status, headers, text))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Raw body text as received.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_are_case_insensitive() {
        let response = ApiResponse::new(429, [("Retry-After", "1")], "");
        assert_eq!(response.header("retry-after"), Some("1"));
        assert_eq!(response.header("RETRY-AFTER"), Some("1"));
        assert_eq!(response.header("content-type"), None);
    }

    #[test]
    fn test_body_parsing() {
        let json_body = ApiResponse::new(200, Vec::<(String, String)>::new(), r#"{"age":44}"#);
        assert_eq!(json_body.body(), &json!({"age": 44}));

        let empty = ApiResponse::new(204, Vec::<(String, String)>::new(), "");
        assert_eq!(empty.body(), &Value::Null);

        let html = ApiResponse::new(502, Vec::<(String, String)>::new(), "<html>bad gateway</html>");
        assert_eq!(html.body(), &Value::Null);
        assert_eq!(html.text(), "<html>bad gateway</html>");
    }
}
