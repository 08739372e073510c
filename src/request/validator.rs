//! Name rule and request validation.
//!
//! A request is valid when the endpoint is set and either the single
//! `name` parameter or every element of the batch `name[]` parameter is
//! made only of ASCII letters, apostrophes and hyphens.

use std::sync::LazyLock;

use regex::Regex;

use crate::request::params::{build_url, QueryParams};

/// Key holding a single name.
pub const NAME_KEY: &str = "name";

/// Key holding a batch of names.
pub const BATCH_NAME_KEY: &str = "name[]";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z'-]+$").expect("name pattern is a valid regex"));

/// Returns true if `candidate`, trimmed, is a non-empty run of letters,
/// `'` and `-`.
pub fn is_valid_name(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    !trimmed.is_empty() && NAME_PATTERN.is_match(trimmed)
}

/// Which lookup made the request valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPath {
    Single,
    Batch,
    None,
}

/// Resolve the validation path for `endpoint` and `params`.
///
/// The single `name` value is consulted first, then `name[]`.
pub fn resolve_path(endpoint: &str, params: &QueryParams) -> ValidationPath {
    if endpoint.trim().is_empty() {
        return ValidationPath::None;
    }

    let single_valid = params
        .get(NAME_KEY)
        .and_then(|value| value.as_single())
        .is_some_and(is_valid_name);
    if single_valid {
        return ValidationPath::Single;
    }

    let batch_valid = params
        .get(BATCH_NAME_KEY)
        .map(|value| value.values())
        .is_some_and(|names| !names.is_empty() && names.iter().all(|n| is_valid_name(n)));
    if batch_valid {
        return ValidationPath::Batch;
    }

    ValidationPath::None
}

/// Pure validity check; the caller keeps the result.
pub fn validate(endpoint: &str, params: &QueryParams) -> bool {
    resolve_path(endpoint, params) != ValidationPath::None
}

/// Snapshot of a request at the moment it was prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    endpoint: String,
    params: QueryParams,
    path: ValidationPath,
}

impl PreparedRequest {
    pub fn prepare(endpoint: &str, params: &QueryParams) -> Self {
        let path = resolve_path(endpoint, params);
        tracing::debug!(endpoint = %endpoint, path = ?path, "Request prepared");

        Self {
            endpoint: endpoint.to_string(),
            params: params.clone(),
            path,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.path != ValidationPath::None
    }

    pub fn path(&self) -> ValidationPath {
        self.path
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn url(&self) -> String {
        build_url(&self.endpoint, &self.params)
    }
}
