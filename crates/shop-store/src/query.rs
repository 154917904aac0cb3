//! # Query Builder
//!
//! Thin builder for the store's REST interface. Each handler composes a
//! single read or write; filters and sorts become query-string operators
//! the store evaluates itself.

use crate::client::StoreClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shop_core::{ApiError, ApiResult};
use tracing::{debug, error};

/// Sort direction for `order_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parse a caller-supplied direction, defaulting to ascending
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// A single-shot query against one table
pub struct QueryBuilder {
    client: StoreClient,
    table: String,
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub(crate) fn new(client: StoreClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    /// Choose the columns (or embedded resources) to return
    pub fn select(mut self, columns: &str) -> Self {
        self.params[0].1 = columns.to_string();
        self
    }

    /// Exact-match filter
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring match on one column
    pub fn ilike(mut self, column: &str, term: &str) -> Self {
        self.params
            .push((column.to_string(), format!("ilike.*{term}*")));
        self
    }

    /// Case-insensitive substring match across several columns (OR)
    pub fn or_ilike(mut self, columns: &[&str], term: &str) -> Self {
        let clauses: Vec<String> = columns
            .iter()
            .map(|col| format!("{col}.ilike.*{term}*"))
            .collect();
        self.params
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    /// Sort by a column
    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.params.push((
            "order".to_string(),
            format!("{column}.{}", direction.as_str()),
        ));
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    /// Run the query and return all matching rows.
    /// Zero matches is an empty vec, not an error.
    pub async fn fetch<T: DeserializeOwned>(self) -> ApiResult<Vec<T>> {
        let url = self.client.config.rest_url(&self.table);
        debug!(table = %self.table, "store read");

        let request = self.client.http.get(&url).query(&self.params);
        let request = self.client.authed(request);

        read_rows(request).await
    }

    /// Run the query expecting exactly one row.
    /// Zero rows is the distinct not-found outcome; `resource` names the
    /// entity in the 404 message.
    pub async fn fetch_one<T: DeserializeOwned>(self, resource: &str) -> ApiResult<T> {
        let resource = resource.to_string();
        let mut rows: Vec<T> = self.limit(1).fetch().await?;
        rows.pop().ok_or(ApiError::NotFound { resource })
    }

    /// Insert a row, returning the stored representation
    pub async fn insert<T: DeserializeOwned, B: Serialize>(self, body: &B) -> ApiResult<T> {
        let url = self.client.config.rest_url(&self.table);
        debug!(table = %self.table, "store insert");

        let request = self
            .client
            .http
            .post(&url)
            .query(&[("select", self.select_columns())])
            .header("Prefer", "return=representation")
            .json(body);
        let request = self.client.authed(request);

        first_row(read_rows(request).await?, &self.table)
    }

    /// Upsert a row on its primary key, returning the stored representation
    pub async fn upsert<T: DeserializeOwned, B: Serialize>(self, body: &B) -> ApiResult<T> {
        let url = self.client.config.rest_url(&self.table);
        debug!(table = %self.table, "store upsert");

        let request = self
            .client
            .http
            .post(&url)
            .query(&[("select", self.select_columns())])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body);
        let request = self.client.authed(request);

        first_row(read_rows(request).await?, &self.table)
    }

    /// Update rows matching the accumulated filters, returning the first
    /// updated representation. Zero updated rows is not-found.
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        self,
        body: &B,
        resource: &str,
    ) -> ApiResult<T> {
        let url = self.client.config.rest_url(&self.table);
        debug!(table = %self.table, "store update");

        let request = self
            .client
            .http
            .patch(&url)
            .query(&self.params)
            .header("Prefer", "return=representation")
            .json(body);
        let request = self.client.authed(request);

        let mut rows: Vec<T> = read_rows(request).await?;
        rows.pop().ok_or_else(|| ApiError::not_found(resource))
    }

    fn select_columns(&self) -> String {
        self.params[0].1.clone()
    }
}

fn first_row<T>(mut rows: Vec<T>, table: &str) -> ApiResult<T> {
    rows.pop()
        .ok_or_else(|| ApiError::Internal(format!("store returned no representation for {table}")))
}

/// Send the request and decode the store's response, mapping failures to
/// the shared taxonomy: transport errors are internal (details logged
/// only), store rejections carry the store's message text.
async fn read_rows<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> ApiResult<Vec<T>> {
    let response = request.send().await.map_err(|e| {
        error!("store unreachable: {e}");
        ApiError::upstream(e)
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        error!("failed reading store response: {e}");
        ApiError::upstream(e)
    })?;

    if !status.is_success() {
        error!("store error: status={status}, body={body}");
        return Err(ApiError::StoreRejected {
            message: store_message(&body, status.as_u16()),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        error!("malformed store response: {e}");
        ApiError::Internal(format!("malformed store response: {e}"))
    })
}

/// Pull the human-readable message out of a store error body
pub(crate) fn store_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg", "error"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    format!("store request failed with status {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SessionTokens, StoreClient};
    use crate::config::StoreConfig;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Row {
        id: i64,
        name: String,
    }

    fn client_for(server: &MockServer) -> StoreClient {
        StoreClient::anonymous(StoreConfig::new(server.uri(), "anon-key"))
    }

    #[tokio::test]
    async fn test_filters_become_query_operators() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("is_active", "eq.true"))
            .and(query_param("or", "(name.ilike.*tea*,description.ilike.*tea*)"))
            .and(query_param("order", "name.asc"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "Green Tea"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows: Vec<Row> = client_for(&server)
            .from("products")
            .eq("is_active", true)
            .or_ilike(&["name", "description"], "tea")
            .order_by("name", SortDirection::Asc)
            .fetch()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Green Tea");
    }

    #[tokio::test]
    async fn test_empty_list_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let rows: Vec<Row> = client_for(&server).from("products").fetch().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_one_zero_rows_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let result: ApiResult<Row> = client_for(&server)
            .from("products")
            .eq("slug", "missing")
            .fetch_one("Product")
            .await;

        match result {
            Err(ApiError::NotFound { resource }) => assert_eq!(resource, "Product"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_rejection_surfaces_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "column orders.bogus does not exist"
            })))
            .mount(&server)
            .await;

        let result: ApiResult<Vec<Row>> = client_for(&server).from("orders").fetch().await;

        match result {
            Err(ApiError::StoreRejected { message }) => {
                assert_eq!(message, "column orders.bogus does not exist");
            }
            other => panic!("expected StoreRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_session_token_sent_as_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/orders"))
            .and(header("Authorization", "Bearer at-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = SessionTokens {
            access_token: Some("at-123".into()),
            refresh_token: None,
        };
        let client = StoreClient::new(StoreConfig::new(server.uri(), "anon-key"), tokens);
        let _: Vec<Row> = client.from("orders").fetch().await.unwrap();
    }

    #[test]
    fn test_store_message_fallback() {
        assert_eq!(store_message("not json", 502), "store request failed with status 502");
        assert_eq!(
            store_message(r#"{"error_description":"Invalid login credentials"}"#, 400),
            "Invalid login credentials"
        );
    }
}
