//! Data table and data row kinds.

use serde::Serialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::Result;
use crate::models::key_fields;
use crate::pagination::Cursor;
use crate::params::{Params, QueryOptions};
use crate::traits::{path_segment, Deletable, HasCustomVars, Resource};

/// A table of rows with custom fields, e.g. poll results.
///
/// Canonical path: `/projects/{project_id}/tables/{id}`.
pub enum DataTable {}

impl Resource for DataTable {
    const KIND: &'static str = "DataTable";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/tables/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for DataTable {}
impl Deletable for DataTable {}

/// One row of a data table; its columns are custom variables.
///
/// Canonical path: `/projects/{project_id}/tables/{table_id}/rows/{id}`.
pub enum DataRow {}

impl Resource for DataRow {
    const KIND: &'static str = "DataRow";
    const HAS_CUSTOM_VARS: bool = true;

    fn api_path(fields: &Params) -> Result<String> {
        Ok(format!(
            "/projects/{}/tables/{}/rows/{}",
            path_segment::<Self>(fields, "project_id")?,
            path_segment::<Self>(fields, "table_id")?,
            path_segment::<Self>(fields, "id")?
        ))
    }
}

impl HasCustomVars for DataRow {}
impl Deletable for DataRow {}

impl Entity<DataTable> {
    /// Display name of the table.
    pub async fn name(&mut self) -> Result<Option<String>> {
        self.get_as("name").await
    }

    /// Rename the table on the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_raw("name", name.into());
    }

    /// Number of rows in the table.
    pub async fn num_rows(&mut self) -> Result<Option<u64>> {
        self.get_as("num_rows").await
    }

    /// Query rows of this table.
    pub fn query_rows(&self, options: &QueryOptions) -> Result<Cursor<DataRow>> {
        self.query_child("/rows", options)
    }

    /// Add a row; `options` may carry `contact_id`, `from_number` and `vars`.
    pub async fn create_row<O: Serialize + ?Sized>(
        &self,
        options: &O,
    ) -> Result<Entity<DataRow>> {
        self.post_child("/rows", options).await
    }

    /// Retrieve the row with the given ID.
    pub async fn get_row_by_id(&self, id: &str) -> Result<Entity<DataRow>> {
        self.get_child(&format!("/rows/{}", urlencoding::encode(id))).await
    }

    /// Reference a row of this table without a request.
    pub fn init_row_by_id(&self, id: &str) -> Entity<DataRow> {
        Entity::reference(
            self.client().clone(),
            key_fields(&[
                ("project_id", self.key("project_id")),
                ("table_id", self.key("id")),
                ("id", Value::from(id)),
            ]),
        )
    }

    /// Field (column) definitions of this table.
    pub async fn get_fields(&self) -> Result<Value> {
        self.get_value("/fields", None).await
    }

    /// Update display metadata (name, type, order, ...) of one field.
    pub async fn set_field_metadata<O: Serialize + ?Sized>(
        &self,
        variable: &str,
        options: &O,
    ) -> Result<Value> {
        self.post_value(&format!("/fields/{}", urlencoding::encode(variable)), options)
            .await
    }

    /// Map of each distinct value of a field to its number of rows.
    pub async fn count_rows_by_value(&self, variable: &str) -> Result<Value> {
        let mut params = Params::new();
        params.insert("variable".to_string(), Value::from(variable));
        self.get_value("/count_rows_by_value", Some(&params)).await
    }
}

impl Entity<DataRow> {
    /// Contact linked to the row.
    pub async fn contact_id(&mut self) -> Result<Option<String>> {
        self.get_as("contact_id").await
    }

    /// Link the row to a contact on the next save.
    pub fn set_contact_id(&mut self, contact_id: impl Into<String>) {
        self.set_raw("contact_id", contact_id.into());
    }

    /// Phone number the row was submitted from.
    pub async fn from_number(&mut self) -> Result<Option<String>> {
        self.get_as("from_number").await
    }

    /// Change the submitting phone number on the next save.
    pub fn set_from_number(&mut self, from_number: impl Into<String>) {
        self.set_raw("from_number", from_number.into());
    }

    /// Table holding the row.
    pub async fn table_id(&mut self) -> Result<Option<String>> {
        self.get_as("table_id").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fields, scripted_client};
    use crate::traits::Method;
    use serde_json::json;

    fn table(client: crate::TelerivetClient) -> Entity<DataTable> {
        Entity::from_data(
            client,
            fields(json!({"id": "DT1", "project_id": "PJ1", "name": "Poll"})),
        )
    }

    #[tokio::test]
    async fn test_init_row_uses_table_keys() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({})));
        let row = table(client).init_row_by_id("DR1");

        assert!(!row.is_loaded());
        assert_eq!(
            row.api_path().unwrap(),
            "/projects/PJ1/tables/DT1/rows/DR1"
        );
        assert_eq!(log.len(), 0);
    }

    #[tokio::test]
    async fn test_create_row_with_vars() {
        let (client, log) = scripted_client(|_, _, params| {
            let mut row = params.cloned().unwrap_or_default();
            row.insert("id".into(), json!("DR9"));
            row.insert("project_id".into(), json!("PJ1"));
            row.insert("table_id".into(), json!("DT1"));
            Ok(Value::Object(row))
        });

        let mut row = table(client)
            .create_row(&json!({"contact_id": "CT1", "vars": {"q1": "yes"}}))
            .await
            .unwrap();

        assert_eq!(log.last().path, "/projects/PJ1/tables/DT1/rows");
        assert_eq!(row.vars().await.unwrap().get("q1"), Some(&json!("yes")));
        assert_eq!(row.contact_id().await.unwrap().as_deref(), Some("CT1"));
    }

    #[tokio::test]
    async fn test_count_rows_by_value_sends_variable() {
        let (client, log) = scripted_client(|_, _, _| Ok(json!({"yes": 3, "no": 1})));

        let counts = table(client).count_rows_by_value("q1").await.unwrap();

        let call = log.last();
        assert_eq!(call.method, Method::Get);
        assert_eq!(call.path, "/projects/PJ1/tables/DT1/count_rows_by_value");
        assert_eq!(call.params, Some(fields(json!({"variable": "q1"}))));
        assert_eq!(counts["yes"], 3);
    }
}
