//! Resource traits describing entity kinds.

use serde_json::Value;

use crate::error::{Result, TelerivetError};
use crate::params::Params;

/// A kind of remote record, e.g. a contact or a message.
///
/// Implementors are marker types; the record itself lives in an
/// [`Entity`](crate::Entity). The kind supplies the canonical path used to
/// load, save and delete one record.
pub trait Resource: Send + Sync + 'static {
    /// Human-readable kind name.
    const KIND: &'static str;

    /// Whether records of this kind carry a `vars` object of custom variables.
    ///
    /// Every kind implementing [`HasCustomVars`] must set this to `true`;
    /// [`Entity::vars`](crate::Entity::vars) asserts it in debug builds.
    const HAS_CUSTOM_VARS: bool = false;

    /// Build the canonical path from the record's identifying fields.
    ///
    /// # Errors
    ///
    /// Returns [`TelerivetError::MissingField`] if an identifying field is absent.
    fn api_path(fields: &Params) -> Result<String>;
}

/// Kinds whose records carry user-defined custom variables.
pub trait HasCustomVars: Resource {}

/// Kinds that can be deleted through their canonical path.
pub trait Deletable: Resource {}

/// Read an identifying field as a path segment.
///
/// Numeric IDs are accepted and rendered in decimal.
pub(crate) fn path_segment<R: Resource>(fields: &Params, field: &'static str) -> Result<String> {
    let missing = || TelerivetError::MissingField {
        kind: R::KIND,
        field,
    };
    match fields.get(field) {
        Some(Value::String(s)) => Ok(urlencoding::encode(s).into_owned()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(missing()),
    }
}
