//! Custom variables attached to an entity.

use serde_json::Value;

use crate::params::Params;

/// User-defined variables stored on a record under its `vars` field.
///
/// Writes are tracked separately so that saving the owning entity sends only
/// the variables changed since the last save. Setting a variable to `null`
/// deletes it on the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomVars {
    vars: Params,
    dirty: Params,
}

impl CustomVars {
    /// Wrap the `vars` object of a server response.
    pub fn new(vars: Params) -> Self {
        Self {
            vars,
            dirty: Params::new(),
        }
    }

    /// Build from an arbitrary JSON value; anything but an object yields no variables.
    pub(crate) fn from_value(value: Option<Value>) -> Self {
        match value {
            Some(Value::Object(vars)) => Self::new(vars),
            _ => Self::default(),
        }
    }

    /// Get a variable's current value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Set a variable and mark it for the next save.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        self.vars.insert(name.clone(), value.clone());
        self.dirty.insert(name, value);
    }

    /// A copy of all current variables.
    pub fn all(&self) -> Params {
        self.vars.clone()
    }

    /// Iterate over current variables without copying.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables changed since the last save.
    pub fn dirty(&self) -> &Params {
        &self.dirty
    }

    /// Whether any variable is waiting to be saved.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take the pending writes, leaving none behind.
    pub fn take_dirty(&mut self) -> Params {
        std::mem::take(&mut self.dirty)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fields;
    use serde_json::json;

    #[test]
    fn test_get_missing_is_none() {
        let vars = CustomVars::new(fields(json!({"birthdate": "1990-01-01"})));
        assert_eq!(vars.get("birthdate"), Some(&json!("1990-01-01")));
        assert_eq!(vars.get("nickname"), None);
        assert!(!vars.is_dirty());
    }

    #[test]
    fn test_set_tracks_dirty() {
        let mut vars = CustomVars::new(fields(json!({"a": 1})));
        vars.set("b", "two");
        vars.set("a", json!(null));

        assert_eq!(vars.get("b"), Some(&json!("two")));
        assert_eq!(vars.dirty(), &fields(json!({"b": "two", "a": null})));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_all_returns_copy() {
        let mut vars = CustomVars::default();
        vars.set("x", 1);

        let mut snapshot = vars.all();
        snapshot.insert("y".to_string(), json!(2));

        assert_eq!(vars.get("y"), None);
        assert_eq!(vars.dirty().len(), 1);
    }

    #[test]
    fn test_take_dirty_resets() {
        let mut vars = CustomVars::default();
        vars.set("x", true);

        let dirty = vars.take_dirty();
        assert_eq!(dirty, fields(json!({"x": true})));
        assert!(!vars.is_dirty());
        assert_eq!(vars.get("x"), Some(&json!(true)));
    }

    #[test]
    fn test_from_non_object_value() {
        assert!(CustomVars::from_value(Some(json!(null))).is_empty());
        assert!(CustomVars::from_value(None).is_empty());
    }
}
