//! Hetgraph Neo4j - discovery and fetching against a Neo4j database.
//!
//! - **Connection**: `Connection` trait and the HTTP transactional transport
//! - **Cypher**: query templates and `CypherSource`, the `GraphSource` the
//!   assembler is driven by
//! - **Config**: TOML loader configuration
//!
//! # Example
//!
//! ```ignore
//! use hetgraph_graph::GraphAssembler;
//! use hetgraph_neo4j::{CypherSource, HttpConnection, LoaderConfig};
//!
//! let config = LoaderConfig::load(Path::new("hetgraph.toml"))?;
//! let connection = HttpConnection::new(&config.connection)?;
//! let source = CypherSource::connect(connection, config.load.identifier).await?;
//! let graph = GraphAssembler::with_config(source, config.assembler_config())
//!     .load()
//!     .await?;
//! println!("{}", graph);
//! ```

pub mod config;
pub mod connection;
pub mod cypher;

pub use config::{ConnectionConfig, LoadConfig, LoaderConfig};
pub use connection::{Connection, HttpConnection, Record};
pub use cypher::{CypherSource, IdentifierKind};
