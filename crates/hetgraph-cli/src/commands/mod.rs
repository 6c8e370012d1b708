pub mod load;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use hetgraph_graph::{GraphFixture, MemorySource};
use hetgraph_neo4j::{CypherSource, HttpConnection, IdentifierKind, LoaderConfig};
use tracing::info;

/// Where to load from. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Neo4j HTTP URI (e.g., http://localhost:7474)
    #[arg(long)]
    pub uri: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Identify nodes by elementId(n) instead of id(n)
    #[arg(long)]
    pub element_ids: bool,

    /// Load from a JSON graph fixture instead of a live database
    #[arg(long, value_name = "PATH")]
    pub fixture: Option<PathBuf>,
}

/// A connected graph source.
pub enum Target {
    Database(CypherSource<HttpConnection>),
    Fixture(MemorySource),
}

/// Read the config file and apply command-line overrides.
pub fn resolve_config(config_path: &Path, args: &TargetArgs) -> Result<LoaderConfig> {
    let mut config = LoaderConfig::load(config_path)?;

    if let Some(uri) = &args.uri {
        config.connection.uri = uri.clone();
    }
    if let Some(database) = &args.database {
        config.connection.database = database.clone();
    }
    if let Some(user) = &args.user {
        config.connection.user = user.clone();
    }
    if args.element_ids {
        config.load.identifier = IdentifierKind::ElementId;
    }

    Ok(config)
}

/// Open the fixture or connect to the database.
pub async fn open(args: &TargetArgs, config: &LoaderConfig) -> Result<Target> {
    if let Some(path) = &args.fixture {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
        let fixture: GraphFixture = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse fixture: {}", path.display()))?;
        info!(
            "Loaded fixture {} ({} nodes, {} edges)",
            path.display(),
            fixture.nodes.len(),
            fixture.edges.len()
        );
        return Ok(Target::Fixture(MemorySource::from(fixture)));
    }

    let connection = HttpConnection::new(&config.connection)?;
    info!("Connecting to {}", connection.endpoint());
    let source = CypherSource::connect(connection, config.load.identifier).await?;
    Ok(Target::Database(source))
}
