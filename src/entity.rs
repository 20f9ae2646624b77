//! Lazily loaded local proxy for one remote record.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::custom_vars::CustomVars;
use crate::error::Result;
use crate::params::Params;
use crate::traits::{Deletable, HasCustomVars, Resource};

/// Field holding custom variables on records that support them.
pub(crate) const VARS_FIELD: &str = "vars";

/// A local, possibly stale copy of one remote record of kind `R`.
///
/// An entity is either *hydrated* (built from a full server representation)
/// or a *reference* (built from identifying fields only). A reference fetches
/// the full record the first time a field it does not already hold is read,
/// and never again afterwards.
///
/// Writes go to the local record and to a dirty set; [`save`](Self::save)
/// sends only the dirty set. Setting a field never triggers a fetch, so a
/// reference can be updated without reading it first.
///
/// # Example
///
/// ```no_run
/// use telerivet::{Contact, Entity, TelerivetClient};
///
/// # async fn example(client: TelerivetClient) -> telerivet::Result<()> {
/// let project = client.init_project_by_id("PJ123");
/// let mut contact = project.init_contact_by_id("CT456");
///
/// // First read of a field not yet known fetches the contact
/// let name = contact.name().await?;
///
/// contact.set_name("Alice");
/// contact.vars().await?.set("birthdate", "1990-04-01");
/// contact.save().await?;
/// # Ok(())
/// # }
/// ```
pub struct Entity<R: Resource> {
    client: TelerivetClient,
    data: Params,
    dirty: Params,
    vars: Option<CustomVars>,
    loaded: bool,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> Entity<R> {
    /// Create an entity from `data`, marking it loaded or not.
    ///
    /// No network access happens here.
    pub fn new(client: TelerivetClient, data: Params, is_loaded: bool) -> Self {
        let mut entity = Self {
            client,
            data: Params::new(),
            dirty: Params::new(),
            vars: None,
            loaded: is_loaded,
            kind: PhantomData,
        };
        entity.set_data(data);
        entity
    }

    /// Create an entity from a full server representation.
    pub fn from_data(client: TelerivetClient, data: Params) -> Self {
        Self::new(client, data, true)
    }

    /// Create an unloaded entity from its identifying fields.
    pub fn reference(client: TelerivetClient, data: Params) -> Self {
        Self::new(client, data, false)
    }

    /// Create a hydrated entity from a response body.
    pub(crate) fn from_response(client: TelerivetClient, value: Value) -> Result<Self> {
        let data: Params = serde_json::from_value(value)?;
        Ok(Self::from_data(client, data))
    }

    fn set_data(&mut self, mut data: Params) {
        self.vars = if R::HAS_CUSTOM_VARS {
            Some(CustomVars::from_value(data.remove(VARS_FIELD)))
        } else {
            None
        };
        self.data = data;
    }

    /// Whether the full record has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The client this entity uses for its own requests.
    pub fn client(&self) -> &TelerivetClient {
        &self.client
    }

    /// The canonical path of this record.
    pub fn api_path(&self) -> Result<String> {
        R::api_path(&self.data)
    }

    /// The record's `id`, if known locally.
    pub fn id(&self) -> Option<&str> {
        self.peek_str("id")
    }

    /// Fetch the full record unless it has already been fetched.
    ///
    /// Pending local writes are re-applied on top of the fetched record.
    /// On failure the entity is left unchanged and still unloaded.
    ///
    /// # Errors
    ///
    /// Propagates any transport error, including `NotFound`.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        let path = self.api_path()?;
        let response = self.client.get(&path, None).await?;
        let data: Params = serde_json::from_value(response)?;

        self.set_data(data);
        for (name, value) in &self.dirty {
            self.data.insert(name.clone(), value.clone());
        }
        self.loaded = true;

        tracing::debug!(%path, "loaded entity");
        Ok(())
    }

    /// Borrow a field already held locally, without ever fetching.
    pub fn peek(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub(crate) fn peek_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// Read a field, fetching the full record first if needed.
    ///
    /// Known fields are returned without network access even on a reference.
    /// A field missing from a loaded record is `None`.
    pub async fn get_raw(&mut self, name: &str) -> Result<Option<Value>> {
        if R::HAS_CUSTOM_VARS && name == VARS_FIELD {
            self.ensure_loaded().await?;
            return Ok(self.vars.as_ref().map(|vars| Value::Object(vars.all())));
        }

        if !self.loaded && !self.data.contains_key(name) {
            self.ensure_loaded().await?;
        }

        Ok(self.data.get(name).cloned())
    }

    /// Read a field and deserialize it; `null` reads as `None`.
    pub async fn get_as<T: DeserializeOwned>(&mut self, name: &str) -> Result<Option<T>> {
        match self.get_raw(name).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Read a UNIX timestamp field.
    pub async fn get_time(&mut self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let secs: Option<i64> = self.get_as(name).await?;
        Ok(secs.and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    /// Write a field locally and queue it for the next save.
    pub fn set_raw(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        self.data.insert(name.clone(), value.clone());
        self.dirty.insert(name, value);
    }

    /// Overwrite a local field without queueing it for save.
    ///
    /// A field that is already pending keeps mirroring the local value.
    pub(crate) fn replace_field(&mut self, name: &str, value: Value) {
        if let Some(pending) = self.dirty.get_mut(name) {
            *pending = value.clone();
        }
        self.data.insert(name.to_string(), value);
    }

    /// All fields held locally.
    pub fn data(&self) -> &Params {
        &self.data
    }

    /// Fields written since the last save.
    pub fn dirty_fields(&self) -> &Params {
        &self.dirty
    }

    /// Send pending writes to the server.
    ///
    /// The request body holds exactly the dirty fields, plus dirty custom
    /// variables nested under `vars`. An entity with nothing pending still
    /// sends an empty body. The server's reply is not merged back.
    ///
    /// # Errors
    ///
    /// Propagates any transport error; pending writes are kept on failure.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn save(&mut self) -> Result<()> {
        let path = self.api_path()?;

        let mut diff = self.dirty.clone();
        if let Some(vars) = self.vars.as_ref().filter(|vars| vars.is_dirty()) {
            diff.insert(VARS_FIELD.to_string(), Value::Object(vars.dirty().clone()));
        }

        self.client.post(&path, Some(&diff)).await?;

        tracing::debug!(%path, fields = diff.len(), "saved entity");
        self.dirty.clear();
        if let Some(vars) = self.vars.as_mut() {
            vars.clear_dirty();
        }
        Ok(())
    }
}

impl<R: HasCustomVars> Entity<R> {
    /// The record's custom variables, fetching the full record first if needed.
    pub async fn vars(&mut self) -> Result<&mut CustomVars> {
        debug_assert!(
            R::HAS_CUSTOM_VARS,
            "{} implements HasCustomVars but HAS_CUSTOM_VARS is false",
            R::KIND
        );
        self.ensure_loaded().await?;
        Ok(self.vars.get_or_insert_with(CustomVars::default))
    }
}

impl<R: Deletable> Entity<R> {
    /// Delete the record on the server.
    ///
    /// The local copy is left as it was.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn delete(&self) -> Result<()> {
        let path = self.api_path()?;
        self.client.delete(&path, None).await?;
        Ok(())
    }
}

impl<R: Resource> Clone for Entity<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            data: self.data.clone(),
            dirty: self.dirty.clone(),
            vars: self.vars.clone(),
            loaded: self.loaded,
            kind: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for Entity<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &R::KIND)
            .field("loaded", &self.loaded)
            .field("data", &self.data)
            .field("dirty", &self.dirty)
            .field("vars", &self.vars)
            .finish()
    }
}

impl<R: Resource> fmt::Display for Entity<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(R::KIND)?;
        if !self.loaded {
            f.write_str(" (not loaded)")?;
        }
        let mut data = self.data.clone();
        if let Some(vars) = &self.vars {
            data.insert(VARS_FIELD.to_string(), Value::Object(vars.all()));
        }
        write!(f, " JSON: {}", Value::Object(data))
    }
}
