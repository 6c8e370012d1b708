//! Graph schema definitions for heterogeneous graph extraction.
//!
//! This module defines the core vocabulary shared by discovery, fetching and
//! assembly:
//! - `NodeType`: a node label partitioning the identifier space
//! - `EdgeType`: a (source type, relation, target type) triple
//! - `NodeId`: a database-assigned identifier, never used as an array index
//! - `NodeIndex`: a dense zero-based position within one node type
//! - `EdgeEndpoints`: the fetched (source id, target id) pairs of one edge type

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense, zero-based position of a node within its type.
pub type NodeIndex = usize;

/// Raw property map of a node as returned by the database.
pub type FeatureRecord = serde_json::Map<String, serde_json::Value>;

/// A node label. Nodes carrying several labels are represented under the
/// first one only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reduce a label combination to its canonical type (the first label).
    pub fn canonical(labels: &[String]) -> Option<Self> {
        labels.first().map(|label| Self(label.clone()))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for NodeType {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// An edge type. Distinct triples are distinct edge types even when they
/// share a relation label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeType {
    pub source: NodeType,
    pub relation: String,
    pub target: NodeType,
}

impl EdgeType {
    pub fn new(
        source: impl Into<NodeType>,
        relation: impl Into<String>,
        target: impl Into<NodeType>,
    ) -> Self {
        Self {
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})-[{}]->({})", self.source, self.relation, self.target)
    }
}

/// A database-assigned node identifier.
///
/// Either the legacy integer id or an opaque element-id token. Stable for the
/// lifetime of a load but neither contiguous nor zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Token(String),
}

impl NodeId {
    /// Convert a JSON value returned by a query into an identifier.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(NodeId::Int),
            serde_json::Value::String(s) => Some(NodeId::Token(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(id) => write!(f, "{}", id),
            NodeId::Token(token) => f.write_str(token),
        }
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId::Int(id)
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        NodeId::Int(i64::from(id))
    }
}

impl From<&str> for NodeId {
    fn from(token: &str) -> Self {
        NodeId::Token(token.to_string())
    }
}

/// Which side of an edge an identifier sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Source,
    Target,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Source => "source",
            Endpoint::Target => "target",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source and target identifiers of one edge type, position-aligned.
///
/// Built from pairs, so both sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeEndpoints {
    sources: Vec<NodeId>,
    targets: Vec<NodeId>,
}

impl EdgeEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: NodeId, target: NodeId) {
        self.sources.push(source);
        self.targets.push(target);
    }

    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.sources.iter().zip(self.targets.iter())
    }
}

impl FromIterator<(NodeId, NodeId)> for EdgeEndpoints {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(iter: I) -> Self {
        let mut endpoints = Self::new();
        for (source, target) in iter {
            endpoints.push(source, target);
        }
        endpoints
    }
}

/// A fixed node and edge type listing supplied by the caller instead of
/// live discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub node_types: Vec<NodeType>,
    #[serde(default)]
    pub edge_types: Vec<EdgeType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_type_takes_first_label() {
        let labels = vec!["Gene".to_string(), "Annotated".to_string()];
        assert_eq!(NodeType::canonical(&labels), Some(NodeType::from("Gene")));
        assert_eq!(NodeType::canonical(&[]), None);
    }

    #[test]
    fn test_edge_type_display() {
        let edge_type = EdgeType::new("Gene", "TRANSLATED_INTO", "Protein");
        assert_eq!(edge_type.to_string(), "(Gene)-[TRANSLATED_INTO]->(Protein)");
    }

    #[test]
    fn test_node_id_from_value() {
        assert_eq!(
            NodeId::from_value(&serde_json::json!(42)),
            Some(NodeId::Int(42))
        );
        assert_eq!(
            NodeId::from_value(&serde_json::json!("4:abc:7")),
            Some(NodeId::Token("4:abc:7".to_string()))
        );
        assert_eq!(NodeId::from_value(&serde_json::json!(1.5)), None);
        assert_eq!(NodeId::from_value(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_edge_endpoints_stay_aligned() {
        let pairs: Vec<(NodeId, NodeId)> = vec![(10.into(), 21.into()), (11.into(), 22.into())];
        let endpoints: EdgeEndpoints = pairs.into_iter().collect();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints.sources(), &[NodeId::Int(10), NodeId::Int(11)]);
        assert_eq!(endpoints.targets(), &[NodeId::Int(21), NodeId::Int(22)]);
    }

    #[test]
    fn test_snapshot_from_toml_shape() {
        let snapshot: SchemaSnapshot = serde_json::from_value(serde_json::json!({
            "node_types": ["Gene", "Protein"],
            "edge_types": [
                { "source": "Gene", "relation": "TRANSLATED_INTO", "target": "Protein" }
            ]
        }))
        .unwrap();
        assert_eq!(snapshot.node_types.len(), 2);
        assert_eq!(
            snapshot.edge_types[0],
            EdgeType::new("Gene", "TRANSLATED_INTO", "Protein")
        );
    }
}
