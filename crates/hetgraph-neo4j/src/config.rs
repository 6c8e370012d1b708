//! Loader configuration schema and loading.
//!
//! The loader is configured via a TOML file (by default `./hetgraph.toml`).
//! Every section is optional; a missing file yields the defaults, which
//! point at a local Neo4j with the stock `neo4j` user and database.

use std::path::Path;

use anyhow::{Context, Result};
use hetgraph_graph::{AssemblerConfig, SchemaSnapshot, SchemaSource};
use serde::Deserialize;

use crate::cypher::IdentifierKind;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub load: LoadConfig,

    /// Fixed schema listing. When present, discovery is skipped.
    #[serde(default)]
    pub schema: Option<SchemaSnapshot>,
}

/// Where and how to reach the database.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// HTTP base URI of the server (e.g., "http://localhost:7474").
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name on the server.
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_user")]
    pub user: String,

    /// Plain-text password. Prefer `password_env`.
    #[serde(default)]
    pub password: Option<String>,

    /// Environment variable holding the password.
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// What to load.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// Fetch per-node property maps.
    #[serde(default)]
    pub features: bool,

    /// Identifier function used in queries.
    #[serde(default)]
    pub identifier: IdentifierKind,

    #[serde(default = "default_true")]
    pub require_node_types: bool,

    #[serde(default = "default_true")]
    pub require_edge_types: bool,
}

fn default_uri() -> String {
    "http://localhost:7474".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            user: default_user(),
            password: None,
            password_env: default_password_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            features: false,
            identifier: IdentifierKind::default(),
            require_node_types: true,
            require_edge_types: true,
        }
    }
}

impl ConnectionConfig {
    /// Password from the file, else from `password_env`.
    pub fn password(&self) -> Option<String> {
        self.password
            .clone()
            .or_else(|| std::env::var(&self.password_env).ok())
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            // Return default config if file doesn't exist
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Assembly settings derived from the `[load]` and `[schema]` sections.
    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            schema: match &self.schema {
                Some(snapshot) => SchemaSource::Snapshot(snapshot.clone()),
                None => SchemaSource::Discover,
            },
            load_features: self.load.features,
            require_node_types: self.load.require_node_types,
            require_edge_types: self.load.require_edge_types,
        }
    }
}
