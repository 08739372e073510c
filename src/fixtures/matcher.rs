//! Query → fixture matching.

use serde_json::{json, Value};

use crate::fixtures::FixtureResponse;
use crate::request::validator::{BATCH_NAME_KEY, NAME_KEY};

/// Name with a known estimate.
pub const KNOWN_NAME: &str = "edzelle";

/// Name the API has no data for.
pub const UNKNOWN_NAME: &str = "zzzzzzzz";

/// Pick the canned response for a decoded query, if any.
///
/// - `name=edzelle` → `{name, age: 44, count: 4}`
/// - `name=zzzzzzzz` → `{name, age: null, count: 0}`
/// - one or more `name[]` → array of `{name, age, count: 100}` in order
pub fn match_fixture(pairs: &[(String, String)]) -> Option<FixtureResponse> {
    let single = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == NAME_KEY)
        .map(|(_, value)| value.as_str());

    match single {
        Some(KNOWN_NAME) => {
            return Some(FixtureResponse::json(
                200,
                json!({ "name": KNOWN_NAME, "age": 44, "count": 4 }),
            ))
        }
        Some(UNKNOWN_NAME) => {
            return Some(FixtureResponse::json(
                200,
                json!({ "name": UNKNOWN_NAME, "age": Value::Null, "count": 0 }),
            ))
        }
        _ => {}
    }

    let batch: Vec<Value> = pairs
        .iter()
        .filter(|(key, _)| key == BATCH_NAME_KEY)
        .map(|(_, name)| {
            let age = if name == KNOWN_NAME { 69 } else { 36 };
            json!({ "name": name, "age": age, "count": 100 })
        })
        .collect();

    if batch.is_empty() {
        None
    } else {
        Some(FixtureResponse::json(200, Value::Array(batch)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_known_name() {
        let response = match_fixture(&pairs(&[("name", "edzelle")])).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"name": "edzelle", "age": 44, "count": 4}));
        assert!(response
            .headers
            .iter()
            .any(|(k, v)| k == "content-type" && v == "application/json"));
    }

    #[test]
    fn test_unknown_name_has_null_age() {
        let response = match_fixture(&pairs(&[("name", "zzzzzzzz")])).unwrap();
        assert_eq!(response.body["age"], Value::Null);
        assert_eq!(response.body["count"], 0);
    }

    #[test]
    fn test_batch_preserves_order() {
        let response = match_fixture(&pairs(&[("name[]", "foo"), ("name[]", "edzelle")])).unwrap();
        assert_eq!(
            response.body,
            json!([
                {"name": "foo", "age": 36, "count": 100},
                {"name": "edzelle", "age": 69, "count": 100},
            ])
        );
    }

    #[test]
    fn test_unrecognized_queries() {
        assert_eq!(match_fixture(&[]), None);
        assert_eq!(match_fixture(&pairs(&[("name", "michael")])), None);
        assert_eq!(match_fixture(&pairs(&[("names", "edzelle")])), None);
    }

    #[test]
    fn test_single_match_wins_over_batch() {
        let response =
            match_fixture(&pairs(&[("name[]", "foo"), ("name", "edzelle")])).unwrap();
        assert_eq!(response.body["age"], 44);
    }
}
