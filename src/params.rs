//! Request parameters and query-string encoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Free-form request parameters, sent as a JSON body or flattened into a query string.
pub type Params = serde_json::Map<String, Value>;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Options accepted by every list (`query_*`) endpoint.
///
/// Resource-specific filters go in `filters` and may use the API's modifier
/// syntax, e.g. `name[prefix]` or `time_created[min]`.
///
/// # Example
///
/// ```
/// use telerivet::{QueryOptions, SortDir};
///
/// let options = QueryOptions::new()
///     .filter("name[prefix]", "Al")
///     .sort("name")
///     .sort_dir(SortDir::Desc);
/// assert_eq!(options.filters["name[prefix]"], "Al");
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryOptions {
    /// Field to sort on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<SortDir>,

    /// Number of results returned per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Number of items to skip from the beginning of the result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Resource-specific filters.
    #[serde(flatten)]
    pub filters: Params,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    #[must_use]
    pub fn sort_dir(mut self, dir: SortDir) -> Self {
        self.sort_dir = Some(dir);
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Convert into raw request parameters.
    pub fn to_params(&self) -> Result<Params> {
        to_params(self)
    }
}

/// Serialize any struct into request parameters.
///
/// Values that do not serialize to a JSON object yield empty parameters.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Params::new()),
    }
}

/// Flatten parameters into query-string pairs.
///
/// Nested objects and arrays use bracket notation (`vars[name]`, `ids[0]`),
/// booleans are sent as `1`/`0` and nulls are dropped.
pub fn encode_query(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in params {
        encode_value(name.clone(), value, &mut pairs);
    }
    pairs
}

fn encode_value(name: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                encode_value(format!("{name}[{i}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                encode_value(format!("{name}[{key}]"), item, pairs);
            }
        }
        Value::Bool(b) => pairs.push((name, if *b { "1" } else { "0" }.to_string())),
        Value::String(s) => pairs.push((name, s.clone())),
        Value::Number(n) => pairs.push((name, n.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_encode_flat_values() {
        let pairs = encode_query(&params(json!({
            "name": "Alice",
            "page_size": 50,
            "starred": true,
            "simulated": false,
            "label_id": null
        })));

        assert!(pairs.contains(&("name".to_string(), "Alice".to_string())));
        assert!(pairs.contains(&("page_size".to_string(), "50".to_string())));
        assert!(pairs.contains(&("starred".to_string(), "1".to_string())));
        assert!(pairs.contains(&("simulated".to_string(), "0".to_string())));
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_encode_nested_values() {
        let pairs = encode_query(&params(json!({
            "vars": {"birthdate": {"min": "2000-01-01"}},
            "ids": ["a", "b"]
        })));

        assert!(pairs.contains(&(
            "vars[birthdate][min]".to_string(),
            "2000-01-01".to_string()
        )));
        assert!(pairs.contains(&("ids[0]".to_string(), "a".to_string())));
        assert!(pairs.contains(&("ids[1]".to_string(), "b".to_string())));
    }

    #[test]
    fn test_query_options_serialization() {
        let options = QueryOptions::new()
            .filter("name[prefix]", "Al")
            .sort("name")
            .sort_dir(SortDir::Desc)
            .page_size(25);

        let params = options.to_params().unwrap();
        assert_eq!(params["sort"], "name");
        assert_eq!(params["sort_dir"], "desc");
        assert_eq!(params["page_size"], 25);
        assert_eq!(params["name[prefix]"], "Al");
        assert!(!params.contains_key("offset"));
    }

    #[test]
    fn test_default_options_are_empty() {
        assert!(QueryOptions::default().to_params().unwrap().is_empty());
    }
}
