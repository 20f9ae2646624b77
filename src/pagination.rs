//! Cursor over paginated list endpoints.

use std::marker::PhantomData;

use serde::Deserialize;
use serde_json::Value;

use crate::client::TelerivetClient;
use crate::entity::Entity;
use crate::error::{Result, TelerivetError};
use crate::params::Params;
use crate::traits::Resource;

/// Largest page a bare [`Cursor`] asks for when it has a limit.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 200;

/// Largest page the resource list endpoints accept.
pub const RESOURCE_MAX_PAGE_SIZE: u32 = 500;

/// Parameter the cursor reserves for [`Cursor::count`].
const COUNT_PARAM: &str = "count";
const MARKER_PARAM: &str = "marker";
const PAGE_SIZE_PARAM: &str = "page_size";

/// One page of a list response.
#[derive(Debug, Deserialize)]
struct Page {
    data: Vec<Params>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: Value,
}

/// Iterates over every record matched by one list query, fetching pages as needed.
///
/// Records are yielded as hydrated [`Entity`] values. A cursor represents a
/// single traversal: it cannot be rewound, and its query is fixed at
/// construction.
///
/// # Example
///
/// ```no_run
/// use telerivet::{QueryOptions, TelerivetClient};
///
/// # async fn example(client: TelerivetClient) -> telerivet::Result<()> {
/// let project = client.init_project_by_id("PJ123");
/// let mut contacts = project
///     .query_contacts(&QueryOptions::new().filter("name[prefix]", "A"))?
///     .limit(300);
///
/// while let Some(mut contact) = contacts.next().await? {
///     println!("{:?}", contact.name().await?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Cursor<R: Resource> {
    client: TelerivetClient,
    path: String,
    params: Params,
    limit: Option<u64>,
    max_page_size: u32,
    offset: u64,
    page: Option<Vec<Params>>,
    pos: usize,
    truncated: bool,
    next_marker: Option<String>,
    count: Option<u64>,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> Cursor<R> {
    /// Create a cursor over the list endpoint at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TelerivetError::ReservedCursorParam`] if `params` contains
    /// `count`; use [`count`](Self::count) instead.
    pub fn new(client: TelerivetClient, path: impl Into<String>, params: Params) -> Result<Self> {
        if params.contains_key(COUNT_PARAM) {
            return Err(TelerivetError::ReservedCursorParam(COUNT_PARAM.to_string()));
        }

        Ok(Self {
            client,
            path: path.into(),
            params,
            limit: None,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            offset: 0,
            page: None,
            pos: 0,
            truncated: false,
            next_marker: None,
            count: None,
            kind: PhantomData,
        })
    }

    /// Stop after yielding `limit` records.
    ///
    /// Pages requested while a limit is set ask for no more than the
    /// remaining budget.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Cap on the page size requested when a limit is set.
    #[must_use]
    pub fn max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    /// Number of records yielded so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The list endpoint this cursor reads.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.offset >= limit)
    }

    fn page_len(&self) -> usize {
        self.page.as_ref().map_or(0, Vec::len)
    }

    /// Total number of records matching the query.
    ///
    /// Issues one request the first time and caches the result for the
    /// life of the cursor.
    ///
    /// # Errors
    ///
    /// Propagates transport errors, or a parse error if `count` is not a number.
    #[tracing::instrument(skip(self), fields(path = %self.path))]
    pub async fn count(&mut self) -> Result<u64> {
        if let Some(count) = self.count {
            return Ok(count);
        }

        let mut params = self.params.clone();
        params.insert(COUNT_PARAM.to_string(), Value::from(1));

        let response = self.client.get(&self.path, Some(&params)).await?;
        let CountResponse { count } = serde_json::from_value(response)?;
        let count: u64 = match count {
            Value::String(s) => s.parse().map_err(|_| {
                TelerivetError::ParseError(serde::de::Error::custom(format!(
                    "invalid count '{s}'"
                )))
            })?,
            other => serde_json::from_value(other)?,
        };

        self.count = Some(count);
        Ok(count)
    }

    /// Whether another record is available, fetching a page if needed.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the page fetch.
    pub async fn has_next(&mut self) -> Result<bool> {
        if self.limit_reached() {
            return Ok(false);
        }

        if self.page.is_none() {
            self.load_next_page().await?;
        }

        if self.pos < self.page_len() {
            return Ok(true);
        }

        if !self.truncated {
            return Ok(false);
        }

        self.load_next_page().await?;
        Ok(self.pos < self.page_len())
    }

    /// The next record, or `None` once the results or the limit are exhausted.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the page fetch.
    pub async fn next(&mut self) -> Result<Option<Entity<R>>> {
        if self.limit_reached() {
            return Ok(None);
        }

        if self.page.is_none() || (self.pos >= self.page_len() && self.truncated) {
            self.load_next_page().await?;
        }

        let Some(data) = self.page.as_ref().and_then(|page| page.get(self.pos)) else {
            return Ok(None);
        };
        let entity = Entity::from_data(self.client.clone(), data.clone());

        self.pos += 1;
        self.offset += 1;
        Ok(Some(entity))
    }

    /// Collect every remaining record.
    ///
    /// Without a [`limit`](Self::limit) this may issue an unbounded number of
    /// requests for large result sets.
    ///
    /// # Errors
    ///
    /// Propagates the first transport error; records already fetched are discarded.
    pub async fn all(mut self) -> Result<Vec<Entity<R>>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Fetch the page after the current one.
    ///
    /// State is only replaced once the whole page has been decoded.
    #[tracing::instrument(skip(self), fields(path = %self.path, offset = self.offset))]
    pub async fn load_next_page(&mut self) -> Result<()> {
        let mut params = self.params.clone();

        if let Some(marker) = &self.next_marker {
            params.insert(MARKER_PARAM.to_string(), Value::from(marker.as_str()));
        }

        if let Some(limit) = self.limit {
            if !params.contains_key(PAGE_SIZE_PARAM) {
                let remaining = limit.saturating_sub(self.offset);
                let page_size = remaining.min(u64::from(self.max_page_size));
                params.insert(PAGE_SIZE_PARAM.to_string(), Value::from(page_size));
            }
        }

        let response = self.client.get(&self.path, Some(&params)).await?;
        let page: Page = serde_json::from_value(response)?;

        let truncated = page.truncated && page.next_marker.is_some();
        if page.truncated && !truncated {
            tracing::warn!("server reported more results without a next_marker, stopping");
        }

        tracing::debug!(items = page.data.len(), truncated, "loaded page");
        self.page = Some(page.data);
        self.truncated = truncated;
        self.next_marker = if truncated { page.next_marker } else { None };
        self.pos = 0;
        Ok(())
    }
}

impl<R: Resource> std::fmt::Debug for Cursor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &R::KIND)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("truncated", &self.truncated)
            .field("next_marker", &self.next_marker)
            .finish_non_exhaustive()
    }
}
