//! The assembled heterogeneous graph.
//!
//! This module provides the `Graph` container: per-type identifier lists,
//! per-type feature lists and per-edge-type index pairs. Only the assembler
//! writes to it; once handed out it is read-only.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::{EdgeType, FeatureRecord, NodeId, NodeIndex, NodeType};

/// Remapped connectivity of one edge type: position `k` of `sources` and
/// `targets` is one edge, expressed as indices into the endpoint types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeIndex {
    pub sources: Vec<NodeIndex>,
    pub targets: Vec<NodeIndex>,
}

impl EdgeIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sources: Vec::with_capacity(capacity),
            targets: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, source: NodeIndex, target: NodeIndex) {
        self.sources.push(source);
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Heterogeneous graph in array-friendly form.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    node_types: Vec<NodeType>,
    edge_types: Vec<EdgeType>,
    ids: HashMap<NodeType, Vec<NodeId>>,
    features: HashMap<NodeType, Vec<FeatureRecord>>,
    edges: HashMap<EdgeType, EdgeIndex>,
    assembled_at: DateTime<Utc>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_ids(&mut self, node_type: NodeType, ids: Vec<NodeId>) {
        if !self.ids.contains_key(&node_type) {
            self.node_types.push(node_type.clone());
        }
        self.ids.insert(node_type, ids);
    }

    pub(crate) fn add_features(&mut self, node_type: NodeType, features: Vec<FeatureRecord>) {
        self.features.insert(node_type, features);
    }

    pub(crate) fn add_edge_index(&mut self, edge_type: EdgeType, index: EdgeIndex) {
        if !self.edges.contains_key(&edge_type) {
            self.edge_types.push(edge_type.clone());
        }
        self.edges.insert(edge_type, index);
    }

    pub(crate) fn mark_assembled(&mut self, at: DateTime<Utc>) {
        self.assembled_at = at;
    }

    /// When the assembler finished the graph.
    pub fn assembled_at(&self) -> DateTime<Utc> {
        self.assembled_at
    }

    /// Node types in load order.
    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    /// Edge types in load order.
    pub fn edge_types(&self) -> &[EdgeType] {
        &self.edge_types
    }

    /// Identifiers of a node type; position `i` is node index `i`.
    pub fn ids(&self, node_type: &NodeType) -> Option<&[NodeId]> {
        self.ids.get(node_type).map(Vec::as_slice)
    }

    /// Feature records of a node type, aligned with `ids`. `None` unless
    /// features were loaded.
    pub fn features(&self, node_type: &NodeType) -> Option<&[FeatureRecord]> {
        self.features.get(node_type).map(Vec::as_slice)
    }

    pub fn edge_index(&self, edge_type: &EdgeType) -> Option<&EdgeIndex> {
        self.edges.get(edge_type)
    }

    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.ids.values().map(Vec::len).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(EdgeIndex::len).sum()
    }

    /// Counts per node type, feature set and edge type.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self
                .node_types
                .iter()
                .map(|t| (t.to_string(), self.ids.get(t).map_or(0, Vec::len)))
                .collect(),
            features: self
                .node_types
                .iter()
                .filter_map(|t| self.features.get(t).map(|f| (t.to_string(), f.len())))
                .collect(),
            edges: self
                .edge_types
                .iter()
                .map(|e| (e.to_string(), self.edges.get(e).map_or(0, EdgeIndex::len)))
                .collect(),
            generated_at: self.assembled_at,
        }
    }
}

/// Human-readable and serializable counts of a graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub nodes: Vec<(String, usize)>,
    pub features: Vec<(String, usize)>,
    pub edges: Vec<(String, usize)>,
    pub generated_at: DateTime<Utc>,
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[(String, usize)]) -> fmt::Result {
    f.write_str("{")?;
    for (i, (name, count)) in counts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", name, count)?;
    }
    f.write_str("}")
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Heterogeneous Graph(ids: ")?;
        write_counts(f, &self.nodes)?;
        f.write_str(", features: ")?;
        write_counts(f, &self.features)?;
        f.write_str(", edges: ")?;
        write_counts(f, &self.edges)?;
        f.write_str(")")
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary().fmt(f)
    }
}
