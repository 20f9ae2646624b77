//! HTTP request handlers for the mock server.
//!
//! A single wildcard route hands every request to [`dispatch`], which
//! routes on method and path shape: an odd number of segments names a
//! collection, an even number names a record.

mod list;
mod records;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::Params;

/// Error body in the shape the Telerivet API uses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    param: Option<String>,
}

impl ApiError {
    pub fn not_found(path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: format!("No record found at {}", path),
            param: None,
        }
    }

    pub fn invalid_param(param: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_param",
            message: message.into(),
            param: Some(param.to_string()),
        }
    }

    pub fn unsupported(method: &Method, path: &str) -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            code: "unsupported_method",
            message: format!("{} is not supported on {}", method, path),
            param: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": {
                    "code": self.code,
                    "message": self.message,
                    "param": self.param,
                }
            })),
        )
            .into_response()
    }
}

pub type HandlerResult = Result<Value, ApiError>;

/// Any method on `/*path`.
pub async fn dispatch(
    State(state): State<Arc<RwLock<MockState>>>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let path = format!("/{}", path.trim_matches('/'));
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(err) => return err.into_response(),
    };

    let mut state = state.write().await;
    state.requests += 1;

    let result = route(&mut state, &method, &path, &query, &body);
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn parse_body(body: &[u8]) -> Result<Params, ApiError> {
    if body.is_empty() {
        return Ok(Params::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::invalid_param(
            "body",
            "Request body must be a JSON object",
        )),
    }
}

fn route(
    state: &mut MockState,
    method: &Method,
    path: &str,
    query: &HashMap<String, String>,
    body: &Params,
) -> HandlerResult {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let is_collection = segments.len() % 2 == 1;

    match method.as_str() {
        "GET" if is_collection => list::list(state, &segments, path, query),
        "GET" => records::get(state, &segments, path),
        "POST" => records::post(state, &segments, path, body),
        "PUT" => records::put(state, &segments, path),
        "DELETE" => records::delete(state, &segments, path),
        _ => Err(ApiError::unsupported(method, path)),
    }
}
