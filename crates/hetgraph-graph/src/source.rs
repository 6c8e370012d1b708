//! Collaborator traits the assembler is built against.
//!
//! The assembler never talks to a database directly. It holds a handle to
//! something that can discover the schema and fetch identifiers, features
//! and edge endpoints. The Neo4j implementation lives in `hetgraph-neo4j`;
//! `MemorySource` serves tests and fixtures.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::schema::{EdgeEndpoints, EdgeType, FeatureRecord, NodeId, NodeType};

/// Read-only schema discovery.
#[async_trait]
pub trait SchemaDiscovery: Send + Sync {
    /// Every distinct canonical node type, de-duplicated in first-seen order.
    async fn list_node_types(&self) -> Result<Vec<NodeType>, LoadError>;

    /// Every distinct (source type, relation, target type) triple that occurs
    /// at least once.
    async fn list_edge_types(&self) -> Result<Vec<EdgeType>, LoadError>;
}

/// Per-type identifier, feature and edge fetching.
#[async_trait]
pub trait GraphFetcher: Send + Sync {
    /// Identifiers of every node carrying `node_type`, in engine order.
    async fn fetch_node_identifiers(&self, node_type: &NodeType) -> Result<Vec<NodeId>, LoadError>;

    /// Property map of every node carrying `node_type`, each paired with its
    /// identifier from the same query.
    async fn fetch_node_features(
        &self,
        node_type: &NodeType,
    ) -> Result<Vec<(NodeId, FeatureRecord)>, LoadError>;

    /// Distinct (source id, target id) pairs of `edge_type`.
    async fn fetch_edge_endpoints(&self, edge_type: &EdgeType) -> Result<EdgeEndpoints, LoadError>;
}

/// Anything that can both discover and fetch.
pub trait GraphSource: SchemaDiscovery + GraphFetcher {}

impl<T: SchemaDiscovery + GraphFetcher> GraphSource for T {}

#[async_trait]
impl<T: SchemaDiscovery + ?Sized> SchemaDiscovery for &T {
    async fn list_node_types(&self) -> Result<Vec<NodeType>, LoadError> {
        (**self).list_node_types().await
    }

    async fn list_edge_types(&self) -> Result<Vec<EdgeType>, LoadError> {
        (**self).list_edge_types().await
    }
}

#[async_trait]
impl<T: GraphFetcher + ?Sized> GraphFetcher for &T {
    async fn fetch_node_identifiers(&self, node_type: &NodeType) -> Result<Vec<NodeId>, LoadError> {
        (**self).fetch_node_identifiers(node_type).await
    }

    async fn fetch_node_features(
        &self,
        node_type: &NodeType,
    ) -> Result<Vec<(NodeId, FeatureRecord)>, LoadError> {
        (**self).fetch_node_features(node_type).await
    }

    async fn fetch_edge_endpoints(&self, edge_type: &EdgeType) -> Result<EdgeEndpoints, LoadError> {
        (**self).fetch_edge_endpoints(edge_type).await
    }
}

/// De-duplicate preserving first occurrence.
pub fn dedup_in_order<T: Clone + Eq + std::hash::Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
