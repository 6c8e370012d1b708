//! Cypher query templates and the Neo4j-backed graph source.
//!
//! Labels and relationship types cannot be passed as query parameters, so
//! they are interpolated backtick-quoted into fixed templates.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hetgraph_graph::{
    dedup_in_order, EdgeEndpoints, EdgeType, FeatureRecord, GraphFetcher, LoadError, NodeId,
    NodeType, SchemaDiscovery,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::connection::{Connection, Record};

/// Which Neo4j function identifies nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Legacy integer `id(n)`.
    #[default]
    Id,
    /// Opaque `elementId(n)` token.
    ElementId,
}

impl IdentifierKind {
    pub fn function(&self) -> &'static str {
        match self {
            IdentifierKind::Id => "id",
            IdentifierKind::ElementId => "elementId",
        }
    }
}

/// Quote a label or relationship type for interpolation.
pub fn quote_label(label: &str) -> String {
    format!("`{}`", label.replace('`', "``"))
}

const NODE_LABELS_QUERY: &str = "MATCH (n) WITH DISTINCT labels(n) AS labels RETURN labels";

const EDGE_TYPES_QUERY: &str = "MATCH (source)-[r]->(target) \
     WITH DISTINCT labels(source) AS source_labels, type(r) AS relation, labels(target) AS target_labels \
     RETURN source_labels, relation, target_labels";

pub fn node_ids_query(node_type: &NodeType, kind: IdentifierKind) -> String {
    format!(
        "MATCH (n:{}) RETURN {}(n) AS node_id",
        quote_label(node_type.as_str()),
        kind.function()
    )
}

pub fn node_features_query(node_type: &NodeType, kind: IdentifierKind) -> String {
    format!(
        "MATCH (n:{}) RETURN {}(n) AS node_id, properties(n) AS features",
        quote_label(node_type.as_str()),
        kind.function()
    )
}

pub fn edge_endpoints_query(edge_type: &EdgeType, kind: IdentifierKind) -> String {
    let function = kind.function();
    format!(
        "MATCH (source:{})-[:{}]->(target:{}) \
         WITH DISTINCT {f}(source) AS source_id, {f}(target) AS target_id \
         RETURN source_id, target_id",
        quote_label(edge_type.source.as_str()),
        quote_label(&edge_type.relation),
        quote_label(edge_type.target.as_str()),
        f = function
    )
}

/// Schema discovery and fetching over any `Connection`.
pub struct CypherSource<C> {
    connection: C,
    identifier: IdentifierKind,
}

impl<C: Connection> CypherSource<C> {
    /// Verify connectivity once, up front, and wrap the connection.
    #[instrument(skip(connection))]
    pub async fn connect(connection: C, identifier: IdentifierKind) -> Result<Self, LoadError> {
        connection
            .verify_connectivity()
            .await
            .map_err(LoadError::Connectivity)?;
        info!("Connected to Neo4j (identifier function: {})", identifier.function());
        Ok(Self {
            connection,
            identifier,
        })
    }

    pub fn identifier(&self) -> IdentifierKind {
        self.identifier
    }

    async fn run(&self, operation: impl Into<String>, query: &str) -> Result<Vec<Record>, LoadError> {
        self.connection
            .execute_query(query, &Record::new())
            .await
            .map_err(|e| LoadError::query(operation, e))
    }
}

fn field<'a>(record: &'a Record, column: &str) -> Result<&'a Value> {
    record
        .get(column)
        .ok_or_else(|| anyhow!("record is missing column '{}'", column))
}

fn labels(record: &Record, column: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_value(field(record, column)?.clone())?)
}

fn node_id(record: &Record, column: &str) -> Result<NodeId> {
    let value = field(record, column)?;
    NodeId::from_value(value).ok_or_else(|| anyhow!("'{}' is not a node identifier: {}", column, value))
}

fn parse_records<T>(
    operation: &str,
    records: &[Record],
    parse: impl Fn(&Record) -> Result<T>,
) -> Result<Vec<T>, LoadError> {
    records
        .iter()
        .map(|record| parse(record).map_err(|e| LoadError::query(operation, e)))
        .collect()
}

#[async_trait]
impl<C: Connection> SchemaDiscovery for CypherSource<C> {
    async fn list_node_types(&self) -> Result<Vec<NodeType>, LoadError> {
        let operation = "listing node labels";
        let records = self.run(operation, NODE_LABELS_QUERY).await?;
        let combinations = parse_records(operation, &records, |r| labels(r, "labels"))?;

        let canonical = combinations.iter().filter_map(|combination| {
            let node_type = NodeType::canonical(combination);
            if node_type.is_none() {
                debug!("Skipping unlabelled nodes");
            }
            node_type
        });
        Ok(dedup_in_order(canonical))
    }

    async fn list_edge_types(&self) -> Result<Vec<EdgeType>, LoadError> {
        let operation = "listing edge types";
        let records = self.run(operation, EDGE_TYPES_QUERY).await?;
        let triples = parse_records(operation, &records, |r| {
            let relation = field(r, "relation")?
                .as_str()
                .ok_or_else(|| anyhow!("relation is not a string"))?
                .to_string();
            Ok((labels(r, "source_labels")?, relation, labels(r, "target_labels")?))
        })?;

        let edge_types = triples.into_iter().filter_map(|(source, relation, target)| {
            match (NodeType::canonical(&source), NodeType::canonical(&target)) {
                (Some(source), Some(target)) => Some(EdgeType {
                    source,
                    relation,
                    target,
                }),
                _ => {
                    debug!("Skipping {} relationships touching unlabelled nodes", relation);
                    None
                }
            }
        });
        Ok(dedup_in_order(edge_types))
    }
}

#[async_trait]
impl<C: Connection> GraphFetcher for CypherSource<C> {
    #[instrument(skip_all, fields(node_type = %node_type))]
    async fn fetch_node_identifiers(&self, node_type: &NodeType) -> Result<Vec<NodeId>, LoadError> {
        let operation = format!("fetching identifiers of {}", node_type);
        let query = node_ids_query(node_type, self.identifier);
        let records = self.run(operation.as_str(), &query).await?;
        parse_records(&operation, &records, |r| node_id(r, "node_id"))
    }

    #[instrument(skip_all, fields(node_type = %node_type))]
    async fn fetch_node_features(
        &self,
        node_type: &NodeType,
    ) -> Result<Vec<(NodeId, FeatureRecord)>, LoadError> {
        let operation = format!("fetching features of {}", node_type);
        let query = node_features_query(node_type, self.identifier);
        let records = self.run(operation.as_str(), &query).await?;
        parse_records(&operation, &records, |r| {
            let features = match field(r, "features")? {
                Value::Object(map) => map.clone(),
                other => return Err(anyhow!("features is not a map: {}", other)),
            };
            Ok((node_id(r, "node_id")?, features))
        })
    }

    #[instrument(skip_all, fields(edge_type = %edge_type))]
    async fn fetch_edge_endpoints(&self, edge_type: &EdgeType) -> Result<EdgeEndpoints, LoadError> {
        let operation = format!("fetching edges of {}", edge_type);
        let query = edge_endpoints_query(edge_type, self.identifier);
        let records = self.run(operation.as_str(), &query).await?;
        let pairs = parse_records(&operation, &records, |r| {
            Ok((node_id(r, "source_id")?, node_id(r, "target_id")?))
        })?;
        // DISTINCT in the query already collapses parallel edges.
        Ok(pairs.into_iter().collect())
    }
}
