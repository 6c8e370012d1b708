//! In-memory graph source.
//!
//! Holds typed nodes and edges directly and answers discovery and fetch
//! calls from them. Used by tests and by the `--fixture` mode of the CLI.
//! Every call is recorded so callers can check what was fetched and when.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::LoadError;
use crate::schema::{EdgeEndpoints, EdgeType, FeatureRecord, NodeId, NodeType};
use crate::source::{dedup_in_order, GraphFetcher, SchemaDiscovery};

/// A call made against a `MemorySource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    ListNodeTypes,
    ListEdgeTypes,
    NodeIdentifiers(NodeType),
    NodeFeatures(NodeType),
    EdgeEndpoints(EdgeType),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    node_type: NodeType,
    id: NodeId,
    features: FeatureRecord,
}

#[derive(Debug, Clone)]
struct MemoryEdge {
    edge_type: EdgeType,
    source: NodeId,
    target: NodeId,
}

/// Graph source backed by plain vectors.
#[derive(Debug, Default)]
pub struct MemorySource {
    nodes: Vec<MemoryNode>,
    edges: Vec<MemoryEdge>,
    failing: Vec<String>,
    calls: Mutex<Vec<SourceCall>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without properties.
    pub fn with_node(self, node_type: impl Into<NodeType>, id: impl Into<NodeId>) -> Self {
        self.with_node_features(node_type, id, FeatureRecord::new())
    }

    /// Add a node with a property map.
    pub fn with_node_features(
        mut self,
        node_type: impl Into<NodeType>,
        id: impl Into<NodeId>,
        features: FeatureRecord,
    ) -> Self {
        self.nodes.push(MemoryNode {
            node_type: node_type.into(),
            id: id.into(),
            features,
        });
        self
    }

    /// Add one edge instance. Parallel instances are kept and collapsed on
    /// fetch.
    pub fn with_edge(
        mut self,
        edge_type: EdgeType,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        self.edges.push(MemoryEdge {
            edge_type,
            source: source.into(),
            target: target.into(),
        });
        self
    }

    /// Make every fetch touching `label` fail with a query error.
    pub fn failing_on(mut self, label: impl Into<String>) -> Self {
        self.failing.push(label.into());
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<SourceCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, call: SourceCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }

    fn check_failing(&self, label: &str, operation: String) -> Result<(), LoadError> {
        if self.failing.iter().any(|f| f == label) {
            return Err(LoadError::query(
                operation,
                anyhow::anyhow!("injected failure for {}", label),
            ));
        }
        Ok(())
    }

    fn nodes_of<'a>(
        &'a self,
        node_type: &'a NodeType,
    ) -> impl DoubleEndedIterator<Item = &'a MemoryNode> {
        self.nodes.iter().filter(move |n| &n.node_type == node_type)
    }
}

#[async_trait]
impl SchemaDiscovery for MemorySource {
    async fn list_node_types(&self) -> Result<Vec<NodeType>, LoadError> {
        self.record(SourceCall::ListNodeTypes);
        Ok(dedup_in_order(self.nodes.iter().map(|n| n.node_type.clone())))
    }

    async fn list_edge_types(&self) -> Result<Vec<EdgeType>, LoadError> {
        self.record(SourceCall::ListEdgeTypes);
        Ok(dedup_in_order(self.edges.iter().map(|e| e.edge_type.clone())))
    }
}

#[async_trait]
impl GraphFetcher for MemorySource {
    async fn fetch_node_identifiers(&self, node_type: &NodeType) -> Result<Vec<NodeId>, LoadError> {
        self.record(SourceCall::NodeIdentifiers(node_type.clone()));
        self.check_failing(
            node_type.as_str(),
            format!("fetching identifiers of {}", node_type),
        )?;
        Ok(self.nodes_of(node_type).map(|n| n.id.clone()).collect())
    }

    async fn fetch_node_features(
        &self,
        node_type: &NodeType,
    ) -> Result<Vec<(NodeId, FeatureRecord)>, LoadError> {
        self.record(SourceCall::NodeFeatures(node_type.clone()));
        self.check_failing(
            node_type.as_str(),
            format!("fetching features of {}", node_type),
        )?;
        // Reverse order so callers cannot rely on positional alignment.
        Ok(self
            .nodes_of(node_type)
            .rev()
            .map(|n| (n.id.clone(), n.features.clone()))
            .collect())
    }

    async fn fetch_edge_endpoints(&self, edge_type: &EdgeType) -> Result<EdgeEndpoints, LoadError> {
        self.record(SourceCall::EdgeEndpoints(edge_type.clone()));
        self.check_failing(&edge_type.relation, format!("fetching edges of {}", edge_type))?;
        let pairs = self
            .edges
            .iter()
            .filter(|e| &e.edge_type == edge_type)
            .map(|e| (e.source.clone(), e.target.clone()));
        Ok(dedup_in_order(pairs).into_iter().collect())
    }
}

/// JSON description of an in-memory graph.
///
/// ```json
/// {
///   "nodes": [{ "type": "Gene", "id": 10, "properties": { "name": "BRCA1" } }],
///   "edges": [{ "source_type": "Gene", "relation": "TRANSLATED_INTO",
///               "target_type": "Protein", "source": 10, "target": 21 }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    pub nodes: Vec<FixtureNode>,
    #[serde(default)]
    pub edges: Vec<FixtureEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub id: NodeId,
    #[serde(default)]
    pub properties: FeatureRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureEdge {
    pub source_type: NodeType,
    pub relation: String,
    pub target_type: NodeType,
    pub source: NodeId,
    pub target: NodeId,
}

impl From<GraphFixture> for MemorySource {
    fn from(fixture: GraphFixture) -> Self {
        let source = fixture.nodes.into_iter().fold(MemorySource::new(), |source, node| {
            source.with_node_features(node.node_type, node.id, node.properties)
        });
        fixture.edges.into_iter().fold(source, |source, edge| {
            source.with_edge(
                EdgeType::new(edge.source_type, edge.relation, edge.target_type),
                edge.source,
                edge.target,
            )
        })
    }
}
