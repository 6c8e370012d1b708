//! Hetgraph Graph - heterogeneous graph assembly for graph-learning pipelines.
//!
//! This crate turns a property graph held by some database into dense,
//! array-friendly form. It includes:
//!
//! - **Schema**: node types, edge types, identifiers and indices
//! - **Index maps**: per-type identifier to zero-based index mapping
//! - **Assembler**: the discovery -> ids -> index map -> edges state machine
//! - **Memory source**: an in-memory collaborator for tests and fixtures
//!
//! # Example
//!
//! ```ignore
//! use hetgraph_graph::{EdgeType, GraphAssembler, MemorySource};
//!
//! let translated = EdgeType::new("Gene", "TRANSLATED_INTO", "Protein");
//! let source = MemorySource::new()
//!     .with_node("Gene", 10)
//!     .with_node("Protein", 21)
//!     .with_edge(translated.clone(), 10, 21);
//!
//! let graph = GraphAssembler::new(source).load().await?;
//! let index = graph.edge_index(&translated).unwrap();
//! assert_eq!((index.sources[0], index.targets[0]), (0, 0));
//! ```

pub mod assembler;
pub mod error;
pub mod graph;
pub mod index;
pub mod memory;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use assembler::{remap_endpoints, AssemblerConfig, AssemblyState, GraphAssembler, SchemaSource};
pub use error::LoadError;
pub use graph::{EdgeIndex, Graph, GraphSummary};
pub use index::IdToIndexMap;
pub use memory::{GraphFixture, MemorySource, SourceCall};
pub use schema::{
    EdgeEndpoints, EdgeType, Endpoint, FeatureRecord, NodeId, NodeIndex, NodeType, SchemaSnapshot,
};
pub use source::{dedup_in_order, GraphFetcher, GraphSource, SchemaDiscovery};
