//! Telerivet REST API client library.
//!
//! A Rust binding for the Telerivet SMS gateway API built around three
//! pieces: a lazily loaded [`Entity`] that proxies one remote record,
//! [`CustomVars`] holding a record's user-defined variables, and a
//! [`Cursor`] that walks a paginated collection using server markers.
//!
//! # Quick Start
//!
//! ```no_run
//! use telerivet::{QueryOptions, TelerivetClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> telerivet::Result<()> {
//!     // Create client from environment variables
//!     let client = TelerivetClient::from_env()?;
//!     let project = client.init_project_by_id("PJ123");
//!
//!     // Send a message
//!     let mut message = project
//!         .send_message(&json!({"to_number": "+16505550123", "content": "Hello"}))
//!         .await?;
//!     println!("Status: {:?}", message.status().await?);
//!
//!     // Walk every contact named Alice
//!     let mut cursor = project
//!         .query_contacts(&QueryOptions::new().filter("name", "Alice"))?
//!         .limit(1000);
//!     while let Some(mut contact) = cursor.next().await? {
//!         println!("{:?}", contact.phone_number().await?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Resource`] describes a kind of record and its canonical API path
//! - [`HasCustomVars`] and [`Deletable`] gate `vars()` and `delete()`
//! - [`Transport`] is the HTTP seam; [`HttpTransport`] is the default
//!
//! Operations specific to one kind are inherent methods on `Entity<Kind>`,
//! e.g. `Entity<Contact>::add_to_group`.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `TELERIVET_API_KEY` (required) - Your Telerivet API key
//! - `TELERIVET_API_URL` (optional) - Base URL (defaults to `https://api.telerivet.com/v1`)
//! - `TELERIVET_TIMEOUT_SECS` (optional) - Request timeout in seconds (defaults to 60)

mod client;
mod custom_vars;
mod entity;
mod error;
mod models;
mod pagination;
mod params;
pub mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

#[cfg(test)]
mod testing;

// Re-export core types
pub use client::{ClientConfig, HttpTransport, TelerivetClient};
pub use custom_vars::CustomVars;
pub use entity::Entity;
pub use error::{Result, TelerivetError};
pub use pagination::{Cursor, DEFAULT_MAX_PAGE_SIZE, RESOURCE_MAX_PAGE_SIZE};
pub use params::{encode_query, to_params, Params, QueryOptions, SortDir};

// Re-export traits
pub use traits::{Deletable, HasCustomVars, Method, Resource, Transport};

// Re-export resource kinds
pub use models::{
    AirtimeTransaction, Broadcast, Contact, ContactServiceState, DataRow, DataTable, Group,
    InvokeResult, Label, Message, Organization, Phone, Project, Route, ScheduledMessage, Service,
};
