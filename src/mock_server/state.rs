//! Mock server state management.
//!
//! Records are stored as JSON objects keyed by their canonical API path,
//! e.g. `/projects/PJ000001/contacts/CT000001`. A collection is the set of
//! records whose path is the collection path plus one segment.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::Params;

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Records indexed by canonical path.
    pub records: BTreeMap<String, Params>,

    /// Counter behind generated IDs.
    next_id: u64,

    /// Number of requests served, for asserting on lazy loading.
    pub requests: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a record at `path`; identifying fields are filled in from the path.
    pub fn with_record(mut self, path: &str, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Params::new(),
        };
        self.insert(path, fields);
        self
    }

    /// Insert or replace a record, filling in its identifying fields.
    pub fn insert(&mut self, path: &str, mut fields: Params) {
        for (name, value) in key_fields(path) {
            fields.entry(name).or_insert(value);
        }
        self.records.insert(path.to_string(), fields);
    }

    pub fn get(&self, path: &str) -> Option<&Params> {
        self.records.get(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<Params> {
        self.records.remove(path)
    }

    /// Records directly inside `collection`, in path order.
    pub fn children(&self, collection: &str) -> Vec<&Params> {
        self.records_where(|path| parent(path) == collection)
    }

    /// Records whose path satisfies `predicate`, in path order.
    pub fn records_where(&self, predicate: impl Fn(&str) -> bool) -> Vec<&Params> {
        self.records
            .iter()
            .filter(|(path, _)| predicate(path))
            .map(|(_, fields)| fields)
            .collect()
    }

    /// Generate an unused ID for a new record in `collection`.
    pub fn generate_id(&mut self, collection: &str) -> String {
        let prefix = id_prefix(collection);
        loop {
            self.next_id += 1;
            let id = format!("{}{:06}", prefix, self.next_id);
            if !self.records.contains_key(&format!("{}/{}", collection, id)) {
                return id;
            }
        }
    }

    /// Create a record in `collection` and return it.
    pub fn create(&mut self, collection: &str, fields: &Params) -> Params {
        let id = self.generate_id(collection);
        let path = format!("{}/{}", collection, id);

        let mut record = Params::new();
        record.insert("id".to_string(), Value::from(id));
        record.insert("time_created".to_string(), Value::from(now()));
        record.insert("vars".to_string(), Value::Object(Params::new()));
        merge_fields(&mut record, fields);

        self.insert(&path, record);
        self.records.get(&path).cloned().unwrap_or_default()
    }

    /// Merge `fields` into the record at `path` and return the result.
    ///
    /// Custom variables are merged one by one; a `null` variable is removed.
    pub fn update(&mut self, path: &str, fields: &Params) -> Option<Params> {
        let record = self.records.get_mut(path)?;
        merge_fields(record, fields);
        record.insert("time_updated".to_string(), Value::from(now()));
        Some(record.clone())
    }

    /// First record in `collection` whose `field` equals `value`.
    pub fn find_by(&self, collection: &str, field: &str, value: &Value) -> Option<String> {
        self.records
            .iter()
            .find(|(path, fields)| parent(path) == collection && fields.get(field) == Some(value))
            .map(|(path, _)| path.clone())
    }
}

/// Apply a write to a stored record.
pub(crate) fn merge_fields(record: &mut Params, fields: &Params) {
    for (name, value) in fields {
        if name == "vars" {
            let vars = record
                .entry("vars")
                .or_insert_with(|| Value::Object(Params::new()));
            if let (Value::Object(vars), Value::Object(updates)) = (vars, value) {
                for (var, var_value) in updates {
                    if var_value.is_null() {
                        vars.remove(var);
                    } else {
                        vars.insert(var.clone(), var_value.clone());
                    }
                }
            }
        } else {
            record.insert(name.clone(), value.clone());
        }
    }
}

/// Path of the collection holding the record at `path`.
pub(crate) fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Identifying fields implied by a record path.
///
/// Each enclosing record contributes `<singular>_id`; the record itself
/// contributes `id`, except contact service states, which are keyed by
/// `contact_id`.
pub(crate) fn key_fields(path: &str) -> Params {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let mut fields = Params::new();
    let pairs: Vec<&[&str]> = segments.chunks(2).collect();

    for (index, pair) in pairs.iter().enumerate() {
        let [collection, id] = pair else {
            continue;
        };
        let name = if index + 1 < pairs.len() {
            format!("{}_id", singular(collection))
        } else if *collection == "states" {
            "contact_id".to_string()
        } else {
            "id".to_string()
        };
        fields.insert(name, Value::from(*id));
    }
    fields
}

fn singular(collection: &str) -> &str {
    collection.strip_suffix('s').unwrap_or(collection)
}

fn id_prefix(collection: &str) -> &'static str {
    match collection.rsplit('/').next().unwrap_or_default() {
        "organizations" => "OR",
        "projects" => "PJ",
        "contacts" => "CT",
        "messages" => "SM",
        "groups" => "CG",
        "labels" => "LB",
        "tables" => "DT",
        "rows" => "DR",
        "phones" => "PN",
        "scheduled" => "SC",
        "broadcasts" => "BR",
        "services" => "SV",
        "routes" => "RT",
        "airtime_transactions" => "AT",
        _ => "ID",
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_fields_from_path() {
        let fields = key_fields("/projects/PJ1/tables/DT1/rows/DR1");
        assert_eq!(
            Value::Object(fields),
            json!({"project_id": "PJ1", "table_id": "DT1", "id": "DR1"})
        );

        let fields = key_fields("/projects/PJ1/services/SV1/states/CT1");
        assert_eq!(
            Value::Object(fields),
            json!({"project_id": "PJ1", "service_id": "SV1", "contact_id": "CT1"})
        );
    }

    #[test]
    fn test_children_are_direct_only() {
        let state = MockState::new()
            .with_record("/projects/PJ1/contacts/CT1", json!({"name": "Alice"}))
            .with_record("/projects/PJ1/contacts/CT2", json!({"name": "Bob"}))
            .with_record("/projects/PJ1/tables/DT1/rows/DR1", json!({}));

        assert_eq!(state.children("/projects/PJ1/contacts").len(), 2);
        assert_eq!(state.children("/projects/PJ1/tables").len(), 0);
        assert_eq!(state.children("/projects/PJ1/tables/DT1/rows").len(), 1);
    }

    #[test]
    fn test_update_merges_vars() {
        let mut state = MockState::new().with_record(
            "/projects/PJ1/contacts/CT1",
            json!({"name": "Alice", "vars": {"a": 1, "b": 2}}),
        );

        let updates = json!({"name": "Alice B.", "vars": {"a": null, "c": 3}});
        let record = state
            .update(
                "/projects/PJ1/contacts/CT1",
                updates.as_object().unwrap(),
            )
            .unwrap();

        assert_eq!(record["name"], "Alice B.");
        assert_eq!(record["vars"], json!({"b": 2, "c": 3}));
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut state =
            MockState::new().with_record("/projects/PJ1/contacts/CT000001", json!({}));

        let record = state.create("/projects/PJ1/contacts", &Params::new());

        assert_eq!(record["id"], "CT000002");
        assert_eq!(record["project_id"], "PJ1");
    }
}
