//! Record reads and writes, plus the project actions (sending, membership,
//! service state) that create or change records as a side effect.

use axum::http::Method;
use serde_json::{json, Value};

use super::{ApiError, HandlerResult};
use crate::mock_server::state::{key_fields, MockState};
use crate::Params;

/// Collections that accept POST to create (or find) a record.
const CREATABLE: &[&str] = &["contacts", "groups", "labels", "tables", "rows", "scheduled"];

/// GET on a record path.
pub fn get(state: &MockState, segments: &[&str], path: &str) -> HandlerResult {
    if let Some(record) = state.get(path) {
        return Ok(Value::Object(record.clone()));
    }
    if is_state_path(segments) {
        return Ok(Value::Object(empty_state(path)));
    }
    Err(ApiError::not_found(path))
}

/// POST: create in a collection, update a record, or run an action.
pub fn post(state: &mut MockState, segments: &[&str], path: &str, body: &Params) -> HandlerResult {
    match segments {
        ["projects", project, "messages", "send"] => send_message(state, project, body),
        ["projects", project, "messages", "receive"] => receive_message(state, project, body),
        ["projects", project, "send_broadcast"] => send_broadcast(state, project, body),
        ["projects", project, "messages", message, "resend"] => {
            resend_message(state, project, message)
        }
        ["projects", project, "broadcasts", broadcast, "cancel"] => {
            let broadcast_path = format!("/projects/{}/broadcasts/{}", project, broadcast);
            update_record(state, &broadcast_path, &fields(json!({"status": "cancelled"})))
        }
        ["projects", project, "services", service, "invoke"] => {
            let service_path = format!("/projects/{}/services/{}", project, service);
            if state.get(&service_path).is_none() {
                return Err(ApiError::not_found(&service_path));
            }
            Ok(json!({"return_value": null, "log_entries": [], "sent_messages": []}))
        }
        _ if is_state_path(segments) => set_state(state, path, body),
        _ if segments.len() % 2 == 1 => create(state, segments, path, body),
        _ => update_record(state, path, body),
    }
}

/// PUT: add a contact to a group or a label to a message.
pub fn put(state: &mut MockState, segments: &[&str], path: &str) -> HandlerResult {
    match segments {
        ["projects", project, "groups", group, "contacts", contact] => membership(
            state,
            &format!("/projects/{}/groups/{}", project, group),
            &format!("/projects/{}/contacts/{}", project, contact),
            "group_ids",
            true,
        ),
        ["projects", project, "labels", label, "messages", message] => membership(
            state,
            &format!("/projects/{}/labels/{}", project, label),
            &format!("/projects/{}/messages/{}", project, message),
            "label_ids",
            true,
        ),
        _ => Err(ApiError::unsupported(&Method::PUT, path)),
    }
}

/// DELETE: remove a record, a membership, or reset a service state.
pub fn delete(state: &mut MockState, segments: &[&str], path: &str) -> HandlerResult {
    match segments {
        ["projects", project, "groups", group, "contacts", contact] => membership(
            state,
            &format!("/projects/{}/groups/{}", project, group),
            &format!("/projects/{}/contacts/{}", project, contact),
            "group_ids",
            false,
        ),
        ["projects", project, "labels", label, "messages", message] => membership(
            state,
            &format!("/projects/{}/labels/{}", project, label),
            &format!("/projects/{}/messages/{}", project, message),
            "label_ids",
            false,
        ),
        _ if is_state_path(segments) => {
            state.remove(path);
            Ok(Value::Object(empty_state(path)))
        }
        _ => state
            .remove(path)
            .map(|_| json!({}))
            .ok_or_else(|| ApiError::not_found(path)),
    }
}

fn fields(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

fn is_state_path(segments: &[&str]) -> bool {
    matches!(segments, ["projects", _, "services", _, "states", _])
}

/// A contact with no state in a service.
fn empty_state(path: &str) -> Params {
    let mut state = key_fields(path);
    state.insert("id".to_string(), Value::Null);
    state.insert("vars".to_string(), json!({}));
    state
}

fn update_record(state: &mut MockState, path: &str, body: &Params) -> HandlerResult {
    state
        .update(path, body)
        .map(Value::Object)
        .ok_or_else(|| ApiError::not_found(path))
}

/// Create a record, or update the existing one matching its natural key.
fn create(state: &mut MockState, segments: &[&str], path: &str, body: &Params) -> HandlerResult {
    let collection = segments.last().copied().unwrap_or_default();
    if !CREATABLE.contains(&collection) {
        return Err(ApiError::unsupported(&Method::POST, path));
    }

    let natural_key = match collection {
        "contacts" => body.get("phone_number").map(|value| ("phone_number", value)),
        "groups" | "labels" | "tables" => match body.get("name") {
            Some(name) if name.is_string() => Some(("name", name)),
            _ => return Err(ApiError::invalid_param("name", "Missing name")),
        },
        _ => None,
    };

    if let Some((field, value)) = natural_key {
        if let Some(existing) = state.find_by(path, field, value) {
            return update_record(state, &existing, body);
        }
    }

    let mut record = body.clone();
    match collection {
        "contacts" => {
            record.entry("group_ids").or_insert_with(|| json!([]));
            record.entry("send_blocked").or_insert(Value::Bool(false));
            record.entry("message_count").or_insert(json!(0));
        }
        "groups" => {
            record.entry("dynamic").or_insert(Value::Bool(false));
            record.entry("num_members").or_insert(json!(0));
        }
        "tables" => {
            record.entry("num_rows").or_insert(json!(0));
        }
        _ => {}
    }
    Ok(Value::Object(state.create(path, &record)))
}

fn new_message(state: &mut MockState, project: &str, mut record: Params) -> Params {
    record.entry("message_type").or_insert(json!("sms"));
    record.entry("starred").or_insert(Value::Bool(false));
    record.entry("label_ids").or_insert_with(|| json!([]));

    let contact_number = match record.get("direction").and_then(Value::as_str) {
        Some("incoming") => record.get("from_number").cloned(),
        _ => record.get("to_number").cloned(),
    };
    if !record.contains_key("contact_id") {
        let contacts = format!("/projects/{}/contacts", project);
        let contact_id = contact_number
            .and_then(|number| state.find_by(&contacts, "phone_number", &number))
            .and_then(|contact_path| state.get(&contact_path))
            .and_then(|contact| contact.get("id").cloned());
        if let Some(contact_id) = contact_id {
            record.insert("contact_id".to_string(), contact_id);
        }
    }

    state.create(&format!("/projects/{}/messages", project), &record)
}

fn send_message(state: &mut MockState, project: &str, body: &Params) -> HandlerResult {
    if !body.contains_key("to_number") && !body.contains_key("contact_id") {
        return Err(ApiError::invalid_param(
            "to_number",
            "Either to_number or contact_id is required",
        ));
    }
    let mut record = body.clone();
    record.insert("direction".to_string(), json!("outgoing"));
    record.insert("status".to_string(), json!("queued"));
    Ok(Value::Object(new_message(state, project, record)))
}

fn receive_message(state: &mut MockState, project: &str, body: &Params) -> HandlerResult {
    if !body.contains_key("from_number") {
        return Err(ApiError::invalid_param("from_number", "from_number is required"));
    }
    let mut record = body.clone();
    record.insert("direction".to_string(), json!("incoming"));
    record.insert("status".to_string(), json!("received"));
    Ok(Value::Object(new_message(state, project, record)))
}

fn resend_message(state: &mut MockState, project: &str, message: &str) -> HandlerResult {
    let message_path = format!("/projects/{}/messages/{}", project, message);
    let original = state
        .get(&message_path)
        .cloned()
        .ok_or_else(|| ApiError::not_found(&message_path))?;

    let mut record = Params::new();
    for field in ["content", "to_number", "phone_id", "contact_id", "message_type"] {
        if let Some(value) = original.get(field) {
            record.insert(field.to_string(), value.clone());
        }
    }
    record.insert("direction".to_string(), json!("outgoing"));
    record.insert("status".to_string(), json!("queued"));
    Ok(Value::Object(new_message(state, project, record)))
}

fn send_broadcast(state: &mut MockState, project: &str, body: &Params) -> HandlerResult {
    let num_recipients = match (body.get("to_numbers"), body.get("group_id")) {
        (Some(Value::Array(numbers)), _) => numbers.len(),
        (_, Some(Value::String(group))) => state
            .children(&format!("/projects/{}/contacts", project))
            .into_iter()
            .filter(|contact| {
                contact
                    .get("group_ids")
                    .and_then(Value::as_array)
                    .is_some_and(|ids| ids.iter().any(|id| id == group.as_str()))
            })
            .count(),
        _ => {
            return Err(ApiError::invalid_param(
                "to_numbers",
                "Either to_numbers or group_id is required",
            ))
        }
    };

    let mut record = body.clone();
    record.insert("status".to_string(), json!("queuing"));
    record.insert("num_recipients".to_string(), json!(num_recipients));
    record.insert("num_messages".to_string(), json!(num_recipients));
    Ok(Value::Object(
        state.create(&format!("/projects/{}/broadcasts", project), &record),
    ))
}

/// Write a contact's state; a `null` id resets it.
fn set_state(state: &mut MockState, path: &str, body: &Params) -> HandlerResult {
    if body.get("id").is_some_and(Value::is_null) {
        state.remove(path);
        return Ok(Value::Object(empty_state(path)));
    }
    if state.get(path).is_none() {
        state.insert(path, empty_state(path));
    }
    update_record(state, path, body)
}

/// Add or remove `container`'s ID in the member's `field` list.
fn membership(
    state: &mut MockState,
    container: &str,
    member: &str,
    field: &str,
    add: bool,
) -> HandlerResult {
    let container_id = state
        .get(container)
        .and_then(|record| record.get("id").cloned())
        .ok_or_else(|| ApiError::not_found(container))?;
    let record = state
        .records
        .get_mut(member)
        .ok_or_else(|| ApiError::not_found(member))?;

    let list = record.entry(field).or_insert_with(|| json!([]));
    let changed = match list.as_array_mut() {
        Some(ids) if add && !ids.contains(&container_id) => {
            ids.push(container_id);
            1
        }
        Some(ids) if !add && ids.contains(&container_id) => {
            ids.retain(|id| *id != container_id);
            -1
        }
        _ => 0,
    };

    if changed != 0 && field == "group_ids" {
        if let Some(group) = state.records.get_mut(container) {
            let members = group.get("num_members").and_then(Value::as_i64).unwrap_or(0);
            group.insert("num_members".to_string(), json!((members + changed).max(0)));
        }
    }
    Ok(json!({}))
}
