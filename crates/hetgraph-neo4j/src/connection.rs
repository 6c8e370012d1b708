//! Query transport to Neo4j.
//!
//! `Connection` is the seam between query shaping and the wire: it verifies
//! the database is reachable and executes one parameterized statement,
//! returning column-name keyed records. `HttpConnection` speaks the
//! transactional HTTP endpoint (`/db/{database}/tx/commit`).

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ConnectionConfig;

/// One result row, keyed by column name.
pub type Record = serde_json::Map<String, Value>;

/// Trait that every query transport implements.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Check the database is reachable and the credentials are accepted.
    async fn verify_connectivity(&self) -> Result<()>;

    /// Run a single read statement and collect every record.
    async fn execute_query(&self, query: &str, parameters: &Record) -> Result<Vec<Record>>;
}

/// Connection over the Neo4j transactional HTTP API.
pub struct HttpConnection {
    client: reqwest::Client,
    endpoint: Url,
    user: String,
    password: Option<String>,
}

impl HttpConnection {
    /// Build a client for the configured server. No request is sent.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let endpoint = commit_endpoint(&config.uri, &config.database)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            user: config.user.clone(),
            password: config.password(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Connection for HttpConnection {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn verify_connectivity(&self) -> Result<()> {
        let records = self.execute_query("RETURN 1 AS ok", &Record::new()).await?;
        match records.first().and_then(|r| r.get("ok")) {
            Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(()),
            other => Err(anyhow!("unexpected connectivity probe result: {:?}", other)),
        }
    }

    async fn execute_query(&self, query: &str, parameters: &Record) -> Result<Vec<Record>> {
        debug!("Executing statement: {}", query.trim());

        let payload = serde_json::json!({
            "statements": [{
                "statement": query,
                "parameters": parameters,
                "resultDataContents": ["row"]
            }]
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.user, self.password.as_ref())
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Cannot reach Neo4j at {}", self.endpoint))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(anyhow!("Neo4j rejected the credentials for user '{}'", self.user));
        }
        if !status.is_success() {
            return Err(anyhow!(
                "Neo4j: HTTP {} - {}",
                status,
                response.text().await.unwrap_or_default()
            ));
        }

        let body: TxResponse = response
            .json()
            .await
            .context("Failed to decode Neo4j response")?;
        body.into_records()
    }
}

/// `{uri}/db/{database}/tx/commit`, with the database name escaped.
fn commit_endpoint(uri: &str, database: &str) -> Result<Url> {
    let mut url = Url::parse(uri).with_context(|| format!("Invalid Neo4j URI: {}", uri))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Unsupported Neo4j URI scheme '{}'; use the HTTP endpoint (e.g. http://localhost:7474)",
            url.scheme()
        ));
    }
    url.path_segments_mut()
        .map_err(|_| anyhow!("Neo4j URI cannot be a base: {}", uri))?
        .pop_if_empty()
        .extend(["db", database, "tx", "commit"]);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

impl TxResponse {
    fn into_records(self) -> Result<Vec<Record>> {
        if let Some(error) = self.errors.first() {
            return Err(anyhow!("Neo4j error {}: {}", error.code, error.message));
        }

        let result = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Neo4j response missing results"))?;

        result
            .data
            .into_iter()
            .map(|data| {
                if data.row.len() != result.columns.len() {
                    return Err(anyhow!(
                        "Neo4j row has {} values for {} columns",
                        data.row.len(),
                        result.columns.len()
                    ));
                }
                let record: Record = result.columns.iter().cloned().zip(data.row).collect();
                Ok(record)
            })
            .collect()
    }
}
