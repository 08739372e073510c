//! Query parameter accumulation and serialization.

use url::form_urlencoded;

/// Suffix marking a key that collects repeated values.
pub const ARRAY_SUFFIX: &str = "[]";

/// Value bound to a query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Multi(Vec<String>),
}

impl ParamValue {
    /// All values in send order.
    pub fn values(&self) -> &[String] {
        match self {
            ParamValue::Single(value) => std::slice::from_ref(value),
            ParamValue::Multi(values) => values,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Multi(_) => None,
        }
    }
}

/// Ordered set of query parameters for one scenario.
///
/// Keys keep the order in which they were first set, which is also the
/// order they are serialized in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `key`.
    ///
    /// Keys ending in `[]` append to their sequence; any other key
    /// overwrites its previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if !key.ends_with(ARRAY_SUFFIX) {
            self.insert(key, ParamValue::Single(value));
            return;
        }

        match self.position(&key) {
            Some(idx) => {
                let slot = &mut self.entries[idx].1;
                match slot {
                    ParamValue::Multi(values) => values.push(value),
                    ParamValue::Single(previous) => {
                        let previous = std::mem::take(previous);
                        *slot = ParamValue::Multi(vec![previous, value]);
                    }
                }
            }
            None => self.entries.push((key, ParamValue::Multi(vec![value]))),
        }
    }

    /// Bind a complete value to `key`, replacing whatever was there.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Flattened `(key, value)` pairs, one per element for array keys.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().flat_map(|(key, value)| {
            value
                .values()
                .iter()
                .map(move |v| (key.as_str(), v.as_str()))
        })
    }

    /// Serialize as `k=v&k=v`, each key and value encoded independently.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// Join `endpoint` with the serialized parameters.
///
/// No `?` is added when there are no parameters.
pub fn build_url(endpoint: &str, params: &QueryParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        return endpoint.to_string();
    }
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}{}", endpoint, separator, query)
}
