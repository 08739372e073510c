//! Response and request assertions.
//!
//! # Responsibilities
//! - Read-only checks over a stored [`ApiResponse`]
//! - Failure messages that name the expected and the actual value
//!
//! # Design Decisions
//! - Properties are looked up on JSON objects only; any other body is
//!   treated as having no properties
//! - Value comparison is done on a string rendering so that step text
//!   like `"44"` matches the number 44

use serde_json::Value;
use thiserror::Error;

use crate::http::ApiResponse;

/// Media type every response must carry.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("No response received from the API")]
    NoResponse,

    #[error("The request has not been prepared")]
    NotPrepared,

    #[error("Expected request to be valid but it was invalid")]
    ExpectedValid,

    #[error("Expected request to be invalid but it was valid")]
    ExpectedInvalid,

    #[error("Request missing query parameter: {0}")]
    MissingParameter(String),

    #[error("Expected status {expected} but got {actual}")]
    Status { expected: u16, actual: u16 },

    #[error("Expected application/json content-type but got: {actual}")]
    ContentType { actual: String },

    #[error("Response body missing property: {0}")]
    MissingProperty(String),

    #[error("Expected response.{property} to be \"{expected}\" but got \"{actual}\"")]
    PropertyValue {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("Expected {property} to be {expected} but got {actual}")]
    PropertyType {
        property: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Expected response body to be an array but got {actual}")]
    NotAnArray { actual: &'static str },

    #[error("Expected array length {expected} but got {actual}")]
    ArrayLength { expected: usize, actual: usize },

    #[error("Expected response body to be a non-empty array")]
    EmptyArray,

    #[error("First item missing property: {0}")]
    FirstItemMissingProperty(String),
}

/// Type name of a JSON value; `undefined` stands for a missing property.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// String rendering used for value comparison.
pub fn render(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn property<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.as_object().and_then(|object| object.get(name))
}

pub fn status_is(response: &ApiResponse, expected: u16) -> Result<(), AssertionError> {
    let actual = response.status();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Status { expected, actual })
    }
}

pub fn has_json_content_type(response: &ApiResponse) -> Result<(), AssertionError> {
    match response.content_type() {
        Some(ct) if ct.to_ascii_lowercase().contains(JSON_CONTENT_TYPE) => Ok(()),
        other => Err(AssertionError::ContentType {
            actual: other.unwrap_or("<none>").to_string(),
        }),
    }
}

pub fn has_property(response: &ApiResponse, name: &str) -> Result<(), AssertionError> {
    property(response.body(), name)
        .map(|_| ())
        .ok_or_else(|| AssertionError::MissingProperty(name.to_string()))
}

pub fn property_equals(
    response: &ApiResponse,
    name: &str,
    expected: &str,
) -> Result<(), AssertionError> {
    let actual = render(property(response.body(), name));
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::PropertyValue {
            property: name.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

pub fn property_is_number(response: &ApiResponse, name: &str) -> Result<(), AssertionError> {
    match property(response.body(), name) {
        Some(Value::Number(_)) => Ok(()),
        other => Err(AssertionError::PropertyType {
            property: name.to_string(),
            expected: "a number",
            actual: type_name(other),
        }),
    }
}

pub fn property_is_number_or_null(
    response: &ApiResponse,
    name: &str,
) -> Result<(), AssertionError> {
    match property(response.body(), name) {
        Some(Value::Number(_)) | Some(Value::Null) => Ok(()),
        other => Err(AssertionError::PropertyType {
            property: name.to_string(),
            expected: "number or null",
            actual: type_name(other),
        }),
    }
}

fn as_array(response: &ApiResponse) -> Result<&Vec<Value>, AssertionError> {
    response
        .body()
        .as_array()
        .ok_or_else(|| AssertionError::NotAnArray {
            actual: type_name(Some(response.body())),
        })
}

pub fn array_length_is(response: &ApiResponse, expected: usize) -> Result<(), AssertionError> {
    let actual = as_array(response)?.len();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::ArrayLength { expected, actual })
    }
}

pub fn first_item_has_property(response: &ApiResponse, name: &str) -> Result<(), AssertionError> {
    let first = as_array(response)?
        .first()
        .ok_or(AssertionError::EmptyArray)?;
    property(first, name)
        .map(|_| ())
        .ok_or_else(|| AssertionError::FirstItemMissingProperty(name.to_string()))
}
