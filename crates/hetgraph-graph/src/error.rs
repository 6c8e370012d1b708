//! Error types for graph loading.

use thiserror::Error;

use crate::assembler::AssemblyState;
use crate::schema::{EdgeType, Endpoint, NodeId, NodeType};

/// Errors that abort a graph load. None of them is recovered locally.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The database connection is unusable.
    #[error("database connectivity check failed: {0}")]
    Connectivity(#[source] anyhow::Error),

    /// A single query failed.
    #[error("query failed while {operation}: {source}")]
    Query {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Discovery produced a schema the assembler cannot work with.
    #[error("schema error: {0}")]
    Schema(String),

    /// An assembly step was invoked out of order.
    #[error("cannot {operation} while assembler is {state}")]
    Sequencing {
        operation: &'static str,
        state: AssemblyState,
    },

    /// An edge endpoint has no entry in its node type's index map.
    #[error("edge type {edge_type}: {endpoint} identifier {identifier} is not a loaded {node_type} node")]
    UnresolvedIdentifier {
        edge_type: EdgeType,
        endpoint: Endpoint,
        node_type: NodeType,
        identifier: NodeId,
    },

    /// An identifier occurs twice in a node type's identifier list or
    /// feature records.
    #[error("node type {node_type}: identifier {identifier} returned more than once")]
    DuplicateIdentifier {
        node_type: NodeType,
        identifier: NodeId,
    },

    /// A feature record belongs to a node absent from the identifier list.
    #[error("node type {node_type}: feature record for unknown identifier {identifier}")]
    UnknownFeatureNode {
        node_type: NodeType,
        identifier: NodeId,
    },

    /// Some nodes of a type received no feature record.
    #[error("node type {node_type}: {missing} node(s) without a feature record, first {identifier}")]
    MissingFeatures {
        node_type: NodeType,
        missing: usize,
        identifier: NodeId,
    },
}

impl LoadError {
    pub fn query(operation: impl Into<String>, source: anyhow::Error) -> Self {
        LoadError::Query {
            operation: operation.into(),
            source,
        }
    }
}
