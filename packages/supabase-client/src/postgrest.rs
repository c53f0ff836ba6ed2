//! Row API (PostgREST) request builder.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SupabaseError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    fn method(self) -> Method {
        match self {
            Operation::Select => Method::GET,
            Operation::Insert => Method::POST,
            Operation::Update => Method::PATCH,
            Operation::Delete => Method::DELETE,
        }
    }
}

/// A request against one table, built up clause by clause.
///
/// Nothing is sent until one of the terminals (`execute`, `single`,
/// `execute_empty`) is awaited.
pub struct TableQuery {
    http: reqwest::Client,
    rest_url: String,
    table: String,
    api_key: String,
    bearer: String,
    operation: Operation,
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<(String, bool)>,
    body: Option<serde_json::Result<Value>>,
}

impl TableQuery {
    pub(crate) fn new(
        http: reqwest::Client,
        rest_url: String,
        table: &str,
        api_key: String,
        bearer: String,
    ) -> Self {
        Self {
            http,
            rest_url,
            table: table.to_string(),
            api_key,
            bearer,
            operation: Operation::Select,
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            body: None,
        }
    }

    /// Columns to return (`*` for all).
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    /// Equality filter: `column = value`.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Sort clause. Clauses apply in the order they are added.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// Insert one row; the created row is returned by the terminal.
    pub fn insert<B: Serialize>(mut self, body: &B) -> Self {
        self.operation = Operation::Insert;
        self.body = Some(serde_json::to_value(body));
        self
    }

    /// Update rows matching the filters; updated rows are returned.
    pub fn update<B: Serialize>(mut self, body: &B) -> Self {
        self.operation = Operation::Update;
        self.body = Some(serde_json::to_value(body));
        self
    }

    /// Delete rows matching the filters.
    pub fn delete(mut self) -> Self {
        self.operation = Operation::Delete;
        self
    }

    /// Send the request and decode every returned row.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let resp = self.send(false).await?;
        Ok(resp.json().await?)
    }

    /// Send the request expecting exactly one row back.
    pub async fn single<T: DeserializeOwned>(self) -> Result<T> {
        let resp = self.send(true).await?;
        Ok(resp.json().await?)
    }

    /// Send the request and discard the response body.
    pub async fn execute_empty(self) -> Result<()> {
        self.send(false).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn bearer(&self) -> &str {
        &self.bearer
    }

    pub(crate) fn url(&self) -> String {
        let mut params: Vec<String> = Vec::new();

        if let Some(columns) = &self.columns {
            params.push(format!("select={}", urlencoding::encode(columns)));
        }
        for (column, condition) in &self.filters {
            params.push(format!(
                "{}={}",
                urlencoding::encode(column),
                urlencoding::encode(condition)
            ));
        }
        if !self.order.is_empty() {
            let clauses: Vec<String> = self
                .order
                .iter()
                .map(|(column, ascending)| {
                    format!("{}.{}", column, if *ascending { "asc" } else { "desc" })
                })
                .collect();
            params.push(format!("order={}", clauses.join(",")));
        }

        let base = format!("{}/{}", self.rest_url, self.table);
        if params.is_empty() {
            base
        } else {
            format!("{}?{}", base, params.join("&"))
        }
    }

    fn prefer(&self) -> Option<&'static str> {
        match self.operation {
            Operation::Insert | Operation::Update => Some("return=representation"),
            Operation::Delete => Some("return=minimal"),
            Operation::Select => None,
        }
    }

    async fn send(self, single: bool) -> Result<reqwest::Response> {
        let url = self.url();
        tracing::debug!(table = %self.table, operation = ?self.operation, %url, "PostgREST request");

        let mut req = self
            .http
            .request(self.operation.method(), &url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer);

        if let Some(prefer) = self.prefer() {
            req = req.header("Prefer", prefer);
        }
        if single {
            req = req.header("Accept", SINGLE_OBJECT);
        }
        if let Some(body) = self.body {
            req = req.json(&body?);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::from_body(status.as_u16(), &body));
        }

        Ok(resp)
    }
}
