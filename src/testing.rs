//! In-crate transport double for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{Method, Transport};

/// One recorded request.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: Method,
    pub path: String,
    pub params: Option<Params>,
}

/// Shared log of requests seen by a [`ScriptedTransport`].
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("no requests recorded")
    }
}

type Handler = dyn Fn(Method, &str, Option<&Params>) -> Result<Value> + Send + Sync;

/// Transport that answers every request through a closure and records it.
pub(crate) struct ScriptedTransport {
    handler: Box<Handler>,
    log: CallLog,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Value> {
        self.log.0.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            params: params.cloned(),
        });
        (self.handler)(method, path, params)
    }
}

/// Build a client whose requests are answered by `handler`.
pub(crate) fn scripted_client(
    handler: impl Fn(Method, &str, Option<&Params>) -> Result<Value> + Send + Sync + 'static,
) -> (TelerivetClient, CallLog) {
    let log = CallLog::default();
    let transport = ScriptedTransport {
        handler: Box::new(handler),
        log: log.clone(),
    };
    (TelerivetClient::with_transport(transport), log)
}

/// Convert a `json!` object literal into a field map.
pub(crate) fn fields(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
