//! Collection listing: filtering, marker pagination and `count=1`.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::{ApiError, HandlerResult};
use crate::mock_server::state::{parent, MockState};
use crate::Params;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 500;

/// Query parameters that are not field filters.
const RESERVED: &[&str] = &["count", "marker", "page_size", "offset", "sort", "sort_dir"];

/// GET on a collection path.
pub fn list(
    state: &MockState,
    segments: &[&str],
    path: &str,
    query: &HashMap<String, String>,
) -> HandlerResult {
    let records = collection(state, segments, path)?;
    let mut records: Vec<Params> = records
        .into_iter()
        .filter(|record| matches_filters(record, query))
        .cloned()
        .collect();

    if query.get("count").map(String::as_str) == Some("1") {
        return Ok(json!({ "count": records.len() }));
    }

    if let Some(field) = query.get("sort") {
        records.sort_by_key(|record| record.get(field).map(scalar).unwrap_or_default());
    }
    if query.get("sort_dir").map(String::as_str) == Some("desc") {
        records.reverse();
    }

    paginate(records, query)
}

/// Records visible at a collection path, including derived listings such
/// as a contact's messages or a group's members.
fn collection<'a>(
    state: &'a MockState,
    segments: &[&str],
    path: &str,
) -> Result<Vec<&'a Params>, ApiError> {
    let records = match segments {
        ["projects", project, "contacts", contact, "messages"] => field_equals(
            state.children(&format!("/projects/{}/messages", project)),
            "contact_id",
            contact,
        ),
        ["projects", project, "contacts", contact, "groups"] => {
            let contact_path = format!("/projects/{}/contacts/{}", project, contact);
            let record = state
                .get(&contact_path)
                .ok_or_else(|| ApiError::not_found(&contact_path))?;
            let group_ids = record.get("group_ids").cloned().unwrap_or(Value::Null);
            state
                .children(&format!("/projects/{}/groups", project))
                .into_iter()
                .filter(|group| group.get("id").is_some_and(|id| contains(&group_ids, id)))
                .collect()
        }
        ["projects", project, "contacts", contact, "scheduled"] => field_equals(
            state.children(&format!("/projects/{}/scheduled", project)),
            "contact_id",
            contact,
        ),
        ["projects", project, "contacts", contact, "rows"] => {
            let tables = format!("/projects/{}/tables/", project);
            let rows =
                state.records_where(|p| p.starts_with(&tables) && parent(p).ends_with("/rows"));
            field_equals(rows, "contact_id", contact)
        }
        ["projects", project, "contacts", contact, "states"] => {
            let services = format!("/projects/{}/services/", project);
            let states = state
                .records_where(|p| p.starts_with(&services) && parent(p).ends_with("/states"));
            field_equals(states, "contact_id", contact)
        }
        ["projects", project, "groups", group, "contacts"] => list_contains(
            state.children(&format!("/projects/{}/contacts", project)),
            "group_ids",
            group,
        ),
        ["projects", project, "groups", group, "scheduled"] => field_equals(
            state.children(&format!("/projects/{}/scheduled", project)),
            "group_id",
            group,
        ),
        ["projects", project, "labels", label, "messages"] => list_contains(
            state.children(&format!("/projects/{}/messages", project)),
            "label_ids",
            label,
        ),
        ["projects", project, "phones", phone, "messages"] => field_equals(
            state.children(&format!("/projects/{}/messages", project)),
            "phone_id",
            phone,
        ),
        ["organizations", organization, "projects"] => {
            field_equals(state.children("/projects"), "organization_id", organization)
        }
        _ => state.children(path),
    };
    Ok(records)
}

fn field_equals<'a>(records: Vec<&'a Params>, field: &str, value: &str) -> Vec<&'a Params> {
    records
        .into_iter()
        .filter(|record| record.get(field).and_then(Value::as_str) == Some(value))
        .collect()
}

fn list_contains<'a>(records: Vec<&'a Params>, field: &str, value: &str) -> Vec<&'a Params> {
    let value = Value::from(value);
    records
        .into_iter()
        .filter(|record| record.get(field).is_some_and(|list| contains(list, &value)))
        .collect()
}

fn contains(list: &Value, item: &Value) -> bool {
    list.as_array().is_some_and(|items| items.contains(item))
}

/// Filters are `field=value`, `field[prefix]=value`, `field[ne]=value`
/// and `field[exists]=1|0`, compared on the value's query-string form.
fn matches_filters(record: &Params, query: &HashMap<String, String>) -> bool {
    query
        .iter()
        .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
        .all(|(key, expected)| {
            let (field, op) = match key.split_once('[') {
                Some((field, rest)) => (field, rest.trim_end_matches(']')),
                None => (key.as_str(), ""),
            };
            let actual = record.get(field).filter(|v| !v.is_null()).map(scalar);
            match op {
                "" => actual.as_deref() == Some(expected.as_str()),
                "prefix" => actual.is_some_and(|a| a.starts_with(expected.as_str())),
                "ne" => actual.as_deref() != Some(expected.as_str()),
                "exists" => actual.is_some() == (expected == "1"),
                _ => false,
            }
        })
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn paginate(records: Vec<Params>, query: &HashMap<String, String>) -> HandlerResult {
    let page_size = match query.get("page_size") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
            .ok_or_else(|| {
                ApiError::invalid_param("page_size", format!("Invalid page_size: {}", raw))
            })?,
        None => DEFAULT_PAGE_SIZE,
    };

    let start = match (query.get("marker"), query.get("offset")) {
        (Some(marker), _) => marker
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param("marker", format!("Invalid marker: {}", marker)))?,
        (None, Some(offset)) => offset
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param("offset", format!("Invalid offset: {}", offset)))?,
        (None, None) => 0,
    };

    let total = records.len();
    let start = start.min(total);
    let end = (start + page_size).min(total);
    let truncated = end < total;
    let next_marker = if truncated {
        Value::from(end.to_string())
    } else {
        Value::Null
    };

    let data: Vec<Value> = records[start..end]
        .iter()
        .cloned()
        .map(Value::Object)
        .collect();

    Ok(json!({
        "data": data,
        "truncated": truncated,
        "next_marker": next_marker,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn record(value: Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_filters() {
        let alice = record(json!({"name": "Alice", "send_blocked": false, "vars": {}}));

        assert!(matches_filters(&alice, &query(&[("name", "Alice")])));
        assert!(matches_filters(&alice, &query(&[("name[prefix]", "Al")])));
        assert!(!matches_filters(&alice, &query(&[("name[ne]", "Alice")])));
        assert!(matches_filters(&alice, &query(&[("send_blocked", "0")])));
        assert!(matches_filters(&alice, &query(&[("phone_number[exists]", "0")])));
        assert!(matches_filters(&alice, &query(&[("page_size", "10")])));
    }

    #[test]
    fn test_paginate_with_markers() {
        let records: Vec<Params> = (0..5).map(|n| record(json!({"id": n}))).collect();

        let first = paginate(records.clone(), &query(&[("page_size", "2")])).unwrap();
        assert_eq!(first["truncated"], true);
        assert_eq!(first["next_marker"], "2");

        let last = paginate(records, &query(&[("page_size", "2"), ("marker", "4")])).unwrap();
        assert_eq!(last["data"].as_array().unwrap().len(), 1);
        assert_eq!(last["truncated"], false);
        assert!(last["next_marker"].is_null());
    }

    #[test]
    fn test_page_size_bounds() {
        let err = paginate(Vec::new(), &query(&[("page_size", "501")])).unwrap_err();
        assert_eq!(err.code, "invalid_param");
    }
}
