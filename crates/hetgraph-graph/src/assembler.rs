//! Graph assembler.
//!
//! Drives discovery and fetching, builds the per-type id-to-index maps and
//! remaps every edge type's endpoints into those index spaces. Steps run in
//! a fixed order:
//!
//! ```text
//! Uninitialized -> TypesDiscovered -> IdsLoaded -> IndexMapped -> EdgesLoaded
//! ```
//!
//! Edge remapping only starts once every node type has an index map, since an
//! edge type's endpoint types may come later in discovery order.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::error::LoadError;
use crate::graph::{EdgeIndex, Graph};
use crate::index::IdToIndexMap;
use crate::schema::{
    EdgeEndpoints, EdgeType, Endpoint, FeatureRecord, NodeId, NodeType, SchemaSnapshot,
};
use crate::source::{dedup_in_order, GraphSource};

/// Where the node and edge type listing comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaSource {
    /// Ask the source.
    #[default]
    Discover,
    /// Use a caller-supplied listing; no discovery query is issued.
    Snapshot(SchemaSnapshot),
}

/// Configuration for graph assembly.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Schema listing to assemble against (default: live discovery)
    pub schema: SchemaSource,
    /// Fetch per-node property maps during `load` (default: false)
    pub load_features: bool,
    /// Fail when no node types are found (default: true)
    pub require_node_types: bool,
    /// Fail when no edge types are found (default: true)
    pub require_edge_types: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            schema: SchemaSource::Discover,
            load_features: false,
            require_node_types: true,
            require_edge_types: true,
        }
    }
}

/// Assembly progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Uninitialized,
    TypesDiscovered,
    IdsLoaded,
    IndexMapped,
    EdgesLoaded,
    /// A step failed; the load must be restarted with a new assembler.
    Failed,
}

impl AssemblyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyState::Uninitialized => "uninitialized",
            AssemblyState::TypesDiscovered => "types_discovered",
            AssemblyState::IdsLoaded => "ids_loaded",
            AssemblyState::IndexMapped => "index_mapped",
            AssemblyState::EdgesLoaded => "edges_loaded",
            AssemblyState::Failed => "failed",
        }
    }
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a `Graph` from a `GraphSource`.
pub struct GraphAssembler<S> {
    source: S,
    config: AssemblerConfig,
    state: AssemblyState,
    node_types: Vec<NodeType>,
    edge_types: Vec<EdgeType>,
    index_maps: HashMap<NodeType, IdToIndexMap>,
    features_loaded: bool,
    graph: Graph,
}

impl<S: GraphSource> GraphAssembler<S> {
    /// Create an assembler with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, AssemblerConfig::default())
    }

    /// Create an assembler with custom configuration.
    pub fn with_config(source: S, config: AssemblerConfig) -> Self {
        Self {
            source,
            config,
            state: AssemblyState::Uninitialized,
            node_types: Vec::new(),
            edge_types: Vec::new(),
            index_maps: HashMap::new(),
            features_loaded: false,
            graph: Graph::new(),
        }
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn edge_types(&self) -> &[EdgeType] {
        &self.edge_types
    }

    /// Index map of a node type, once `build_index_maps` has run.
    pub fn index_map(&self, node_type: &NodeType) -> Option<&IdToIndexMap> {
        self.index_maps.get(node_type)
    }

    /// Run every step in order and hand out the finished graph.
    ///
    /// All-or-nothing: any error discards the partial graph.
    #[instrument(skip_all)]
    pub async fn load(mut self) -> Result<Graph, LoadError> {
        self.discover_types().await?;
        self.load_ids().await?;
        self.build_index_maps()?;
        if self.config.load_features {
            self.load_features().await?;
        }
        self.load_edges().await?;
        self.into_graph()
    }

    /// `Uninitialized -> TypesDiscovered`.
    pub async fn discover_types(&mut self) -> Result<(), LoadError> {
        self.expect_state(AssemblyState::Uninitialized, "discover types")?;
        let result = self.resolve_schema().await;
        self.settle(result, AssemblyState::TypesDiscovered)
    }

    /// `TypesDiscovered -> IdsLoaded`.
    pub async fn load_ids(&mut self) -> Result<(), LoadError> {
        self.expect_state(AssemblyState::TypesDiscovered, "load node identifiers")?;
        let result = self.fetch_all_ids().await;
        self.settle(result, AssemblyState::IdsLoaded)
    }

    /// `IdsLoaded -> IndexMapped`. Pure; no I/O.
    pub fn build_index_maps(&mut self) -> Result<(), LoadError> {
        self.expect_state(AssemblyState::IdsLoaded, "build index maps")?;
        let result = self.compute_index_maps();
        self.settle(result, AssemblyState::IndexMapped)
    }

    /// Fetch and align per-node features. Optional; allowed once, after the
    /// index maps exist.
    pub async fn load_features(&mut self) -> Result<(), LoadError> {
        if self.features_loaded
            || !matches!(
                self.state,
                AssemblyState::IndexMapped | AssemblyState::EdgesLoaded
            )
        {
            return Err(LoadError::Sequencing {
                operation: "load node features",
                state: self.state,
            });
        }
        let current = self.state;
        let result = self.fetch_all_features().await;
        self.features_loaded = result.is_ok();
        self.settle(result, current)
    }

    /// `IndexMapped -> EdgesLoaded`.
    pub async fn load_edges(&mut self) -> Result<(), LoadError> {
        self.expect_state(AssemblyState::IndexMapped, "load edges")?;
        let result = self.fetch_all_edges().await;
        self.settle(result, AssemblyState::EdgesLoaded)
    }

    /// Hand out the completed graph. Only valid in `EdgesLoaded`.
    pub fn into_graph(self) -> Result<Graph, LoadError> {
        self.expect_state(AssemblyState::EdgesLoaded, "take the graph")?;
        info!(
            "Graph assembled: {} node types, {} nodes, {} edge types, {} edges",
            self.graph.node_types().len(),
            self.graph.node_count(),
            self.graph.edge_types().len(),
            self.graph.edge_count()
        );
        let mut graph = self.graph;
        graph.mark_assembled(Utc::now());
        Ok(graph)
    }

    fn expect_state(&self, expected: AssemblyState, operation: &'static str) -> Result<(), LoadError> {
        if self.state != expected {
            return Err(LoadError::Sequencing {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn settle(&mut self, result: Result<(), LoadError>, next: AssemblyState) -> Result<(), LoadError> {
        match result {
            Ok(()) => {
                debug!("Assembler state {} -> {}", self.state, next);
                self.state = next;
                Ok(())
            }
            Err(err) => {
                self.state = AssemblyState::Failed;
                Err(err)
            }
        }
    }

    async fn resolve_schema(&mut self) -> Result<(), LoadError> {
        let (node_types, edge_types) = match &self.config.schema {
            SchemaSource::Discover => {
                let node_types = dedup_in_order(self.source.list_node_types().await?);
                // Bail before the edge query when there is nothing to load.
                self.check_node_types(&node_types)?;
                let edge_types = dedup_in_order(self.source.list_edge_types().await?);
                (node_types, edge_types)
            }
            SchemaSource::Snapshot(snapshot) => {
                info!("Using supplied schema snapshot instead of discovery");
                (
                    dedup_in_order(snapshot.node_types.iter().cloned()),
                    dedup_in_order(snapshot.edge_types.iter().cloned()),
                )
            }
        };
        self.check_node_types(&node_types)?;
        if self.config.require_edge_types && edge_types.is_empty() {
            return Err(LoadError::Schema("no edge types found".to_string()));
        }

        let known: HashSet<&NodeType> = node_types.iter().collect();
        for edge_type in &edge_types {
            for endpoint in [&edge_type.source, &edge_type.target] {
                if !known.contains(endpoint) {
                    return Err(LoadError::Schema(format!(
                        "edge type {} references unknown node type {}",
                        edge_type, endpoint
                    )));
                }
            }
        }

        info!(
            "Discovered {} node types and {} edge types",
            node_types.len(),
            edge_types.len()
        );
        self.node_types = node_types;
        self.edge_types = edge_types;
        Ok(())
    }

    fn check_node_types(&self, node_types: &[NodeType]) -> Result<(), LoadError> {
        if self.config.require_node_types && node_types.is_empty() {
            return Err(LoadError::Schema("no node types found".to_string()));
        }
        Ok(())
    }

    async fn fetch_all_ids(&mut self) -> Result<(), LoadError> {
        for node_type in &self.node_types {
            let ids = self.source.fetch_node_identifiers(node_type).await?;
            debug!("Loaded {} identifiers for {}", ids.len(), node_type);
            self.graph.add_ids(node_type.clone(), ids);
        }
        Ok(())
    }

    fn compute_index_maps(&mut self) -> Result<(), LoadError> {
        for node_type in &self.node_types {
            let ids = self.graph.ids(node_type).unwrap_or_default();
            let map = IdToIndexMap::build(node_type, ids)?;
            self.index_maps.insert(node_type.clone(), map);
        }
        Ok(())
    }

    async fn fetch_all_features(&mut self) -> Result<(), LoadError> {
        for node_type in &self.node_types {
            let records = self.source.fetch_node_features(node_type).await?;
            let map = self.index_maps.get(node_type).ok_or(LoadError::Sequencing {
                operation: "align node features",
                state: self.state,
            })?;
            let ids = self.graph.ids(node_type).unwrap_or_default();
            let features = align_features(node_type, ids, map, records)?;
            debug!("Loaded {} feature records for {}", features.len(), node_type);
            self.graph.add_features(node_type.clone(), features);
        }
        Ok(())
    }

    async fn fetch_all_edges(&mut self) -> Result<(), LoadError> {
        for edge_type in &self.edge_types {
            let endpoints = self.source.fetch_edge_endpoints(edge_type).await?;
            let (source_map, target_map) = match (
                self.index_maps.get(&edge_type.source),
                self.index_maps.get(&edge_type.target),
            ) {
                (Some(s), Some(t)) => (s, t),
                _ => {
                    return Err(LoadError::Sequencing {
                        operation: "remap edges",
                        state: self.state,
                    })
                }
            };
            let index = remap_endpoints(edge_type, &endpoints, source_map, target_map)?;
            debug!("Remapped {} edges for {}", index.len(), edge_type);
            self.graph.add_edge_index(edge_type.clone(), index);
        }
        Ok(())
    }
}

/// Translate fetched identifier pairs into index pairs.
///
/// Fails on the first identifier missing from its map; edges are never
/// dropped or null-filled.
pub fn remap_endpoints(
    edge_type: &EdgeType,
    endpoints: &EdgeEndpoints,
    source_map: &IdToIndexMap,
    target_map: &IdToIndexMap,
) -> Result<EdgeIndex, LoadError> {
    let unresolved = |endpoint: Endpoint, node_type: &NodeType, identifier: &NodeId| {
        LoadError::UnresolvedIdentifier {
            edge_type: edge_type.clone(),
            endpoint,
            node_type: node_type.clone(),
            identifier: identifier.clone(),
        }
    };

    let mut index = EdgeIndex::with_capacity(endpoints.len());
    for (source, target) in endpoints.pairs() {
        let source_idx = source_map
            .get(source)
            .ok_or_else(|| unresolved(Endpoint::Source, &edge_type.source, source))?;
        let target_idx = target_map
            .get(target)
            .ok_or_else(|| unresolved(Endpoint::Target, &edge_type.target, target))?;
        index.push(source_idx, target_idx);
    }
    Ok(index)
}

/// Place each (identifier, record) pair at its identifier's index.
fn align_features(
    node_type: &NodeType,
    ids: &[NodeId],
    map: &IdToIndexMap,
    records: Vec<(NodeId, FeatureRecord)>,
) -> Result<Vec<FeatureRecord>, LoadError> {
    let mut slots: Vec<Option<FeatureRecord>> = vec![None; ids.len()];
    for (id, record) in records {
        let idx = map.get(&id).ok_or_else(|| LoadError::UnknownFeatureNode {
            node_type: node_type.clone(),
            identifier: id.clone(),
        })?;
        if slots[idx].is_some() {
            return Err(LoadError::DuplicateIdentifier {
                node_type: node_type.clone(),
                identifier: id,
            });
        }
        slots[idx] = Some(record);
    }

    let missing: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .map(|(idx, _)| idx)
        .collect();
    if let Some(&first) = missing.first() {
        return Err(LoadError::MissingFeatures {
            node_type: node_type.clone(),
            missing: missing.len(),
            identifier: ids[first].clone(),
        });
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, SourceCall};
    use proptest::prelude::*;

    fn translated() -> EdgeType {
        EdgeType::new("Gene", "TRANSLATED_INTO", "Protein")
    }

    fn gene_protein_source() -> MemorySource {
        MemorySource::new()
            .with_node("Gene", 10)
            .with_node("Gene", 11)
            .with_node("Protein", 20)
            .with_node("Protein", 21)
            .with_node("Protein", 22)
    }

    #[tokio::test]
    async fn test_load_remaps_identifiers_to_indices() {
        let source = gene_protein_source()
            .with_edge(translated(), 10, 21)
            .with_edge(translated(), 11, 22);

        let graph = GraphAssembler::new(source).load().await.unwrap();

        assert_eq!(
            graph.ids(&"Gene".into()).unwrap(),
            &[NodeId::Int(10), NodeId::Int(11)]
        );
        let index = graph.edge_index(&translated()).unwrap();
        assert_eq!(index.sources, vec![0, 1]);
        assert_eq!(index.targets, vec![1, 2]);
        assert!(!graph.has_features());
    }

    #[tokio::test]
    async fn test_parallel_edges_collapse_to_one_entry() {
        let source = gene_protein_source()
            .with_edge(translated(), 10, 21)
            .with_edge(translated(), 10, 21);

        let graph = GraphAssembler::new(source).load().await.unwrap();

        let index = graph.edge_index(&translated()).unwrap();
        assert_eq!(index.sources, vec![0]);
        assert_eq!(index.targets, vec![1]);
    }

    #[tokio::test]
    async fn test_empty_schema_fails_before_any_fetch() {
        let source = MemorySource::new();

        let err = GraphAssembler::new(&source).load().await.unwrap_err();

        assert!(matches!(err, LoadError::Schema(_)));
        assert_eq!(source.calls(), vec![SourceCall::ListNodeTypes]);
    }

    #[tokio::test]
    async fn test_unknown_edge_endpoint_is_fatal() {
        let source = gene_protein_source()
            .with_edge(translated(), 10, 21)
            .with_edge(translated(), 99, 22);

        let err = GraphAssembler::new(source).load().await.unwrap_err();

        match err {
            LoadError::UnresolvedIdentifier {
                edge_type,
                endpoint,
                node_type,
                identifier,
            } => {
                assert_eq!(edge_type, translated());
                assert_eq!(endpoint, Endpoint::Source);
                assert_eq!(node_type, NodeType::from("Gene"));
                assert_eq!(identifier, NodeId::Int(99));
            }
            other => panic!("expected unresolved identifier, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_target_endpoint_is_fatal() {
        let source = gene_protein_source()
            .with_edge(translated(), 10, 21)
            .with_edge(translated(), 11, 99);

        let err = GraphAssembler::new(source).load().await.unwrap_err();

        match err {
            LoadError::UnresolvedIdentifier {
                edge_type,
                endpoint,
                node_type,
                identifier,
            } => {
                assert_eq!(edge_type, translated());
                assert_eq!(endpoint, Endpoint::Target);
                assert_eq!(node_type, NodeType::from("Protein"));
                assert_eq!(identifier, NodeId::Int(99));
            }
            other => panic!("expected unresolved identifier, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_graph_stamped_once_at_assembly() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let before = Utc::now();
        let graph = GraphAssembler::new(source).load().await.unwrap();

        assert!(graph.assembled_at() >= before);
        let first = graph.summary();
        let second = graph.summary();
        assert_eq!(first.generated_at, graph.assembled_at());
        assert_eq!(second.generated_at, first.generated_at);
    }

    #[tokio::test]
    async fn test_edges_wait_for_all_index_maps() {
        // The edge's source type is discovered after its target type.
        let source = MemorySource::new()
            .with_node("Protein", 20)
            .with_node("Gene", 10)
            .with_edge(translated(), 10, 20);

        let graph = GraphAssembler::new(&source).load().await.unwrap();

        assert_eq!(graph.edge_index(&translated()).unwrap().sources, vec![0]);
        assert_eq!(
            source.calls(),
            vec![
                SourceCall::ListNodeTypes,
                SourceCall::ListEdgeTypes,
                SourceCall::NodeIdentifiers("Protein".into()),
                SourceCall::NodeIdentifiers("Gene".into()),
                SourceCall::EdgeEndpoints(translated()),
            ]
        );
    }

    #[tokio::test]
    async fn test_steps_cannot_be_skipped() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let mut assembler = GraphAssembler::new(&source);

        let err = assembler.load_edges().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Sequencing {
                state: AssemblyState::Uninitialized,
                ..
            }
        ));
        assert_eq!(assembler.state(), AssemblyState::Uninitialized);

        assembler.discover_types().await.unwrap();
        assert!(assembler.build_index_maps().is_err());
        assert!(assembler.load_features().await.is_err());

        assembler.load_ids().await.unwrap();
        assembler.build_index_maps().unwrap();
        assert_eq!(assembler.state(), AssemblyState::IndexMapped);
        assert!(source.calls().iter().all(|c| !matches!(c, SourceCall::EdgeEndpoints(_))));

        assembler.load_edges().await.unwrap();
        assert!(assembler.into_graph().is_ok());
    }

    #[tokio::test]
    async fn test_graph_only_available_when_complete() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let mut assembler = GraphAssembler::new(&source);
        assembler.discover_types().await.unwrap();
        assembler.load_ids().await.unwrap();

        assert!(matches!(
            assembler.into_graph(),
            Err(LoadError::Sequencing {
                state: AssemblyState::IdsLoaded,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_failed_step_poisons_assembler() {
        let source = gene_protein_source()
            .with_edge(translated(), 10, 21)
            .failing_on("Protein");
        let mut assembler = GraphAssembler::new(&source);
        assembler.discover_types().await.unwrap();

        let err = assembler.load_ids().await.unwrap_err();
        assert!(matches!(err, LoadError::Query { .. }));
        assert_eq!(assembler.state(), AssemblyState::Failed);
        assert!(matches!(
            assembler.load_ids().await,
            Err(LoadError::Sequencing {
                state: AssemblyState::Failed,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_index_maps_match_id_lists() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let mut assembler = GraphAssembler::new(&source);
        assembler.discover_types().await.unwrap();
        assembler.load_ids().await.unwrap();
        assembler.build_index_maps().unwrap();

        let map = assembler.index_map(&"Protein".into()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&NodeId::Int(20)), Some(0));
        assert_eq!(map.get(&NodeId::Int(22)), Some(2));
    }

    #[tokio::test]
    async fn test_features_aligned_by_identifier() {
        let mut brca1 = FeatureRecord::new();
        brca1.insert("name".to_string(), serde_json::json!("BRCA1"));
        let mut tp53 = FeatureRecord::new();
        tp53.insert("name".to_string(), serde_json::json!("TP53"));

        let source = MemorySource::new()
            .with_node_features("Gene", 10, brca1.clone())
            .with_node_features("Gene", 11, tp53.clone())
            .with_node("Protein", 20)
            .with_edge(translated(), 11, 20);
        let config = AssemblerConfig {
            load_features: true,
            ..AssemblerConfig::default()
        };

        let graph = GraphAssembler::with_config(source, config).load().await.unwrap();

        assert_eq!(graph.features(&"Gene".into()).unwrap(), &[brca1, tp53]);
        assert_eq!(graph.features(&"Protein".into()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_features_load_only_once() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let mut assembler = GraphAssembler::new(&source);
        assembler.discover_types().await.unwrap();
        assembler.load_ids().await.unwrap();
        assembler.build_index_maps().unwrap();
        assembler.load_features().await.unwrap();
        assert!(assembler.load_features().await.is_err());
        assembler.load_edges().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_skips_discovery() {
        let source = gene_protein_source().with_edge(translated(), 10, 21);
        let config = AssemblerConfig {
            schema: SchemaSource::Snapshot(SchemaSnapshot {
                node_types: vec!["Gene".into(), "Protein".into()],
                edge_types: vec![translated()],
            }),
            ..AssemblerConfig::default()
        };

        let graph = GraphAssembler::with_config(&source, config).load().await.unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(!source.calls().contains(&SourceCall::ListNodeTypes));
        assert!(!source.calls().contains(&SourceCall::ListEdgeTypes));
    }

    #[tokio::test]
    async fn test_snapshot_with_unknown_endpoint_type() {
        let source = gene_protein_source();
        let config = AssemblerConfig {
            schema: SchemaSource::Snapshot(SchemaSnapshot {
                node_types: vec!["Gene".into()],
                edge_types: vec![translated()],
            }),
            ..AssemblerConfig::default()
        };

        let err = GraphAssembler::with_config(&source, config).load().await.unwrap_err();

        assert!(matches!(err, LoadError::Schema(_)));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edgeless_graph_allowed_when_configured() {
        let source = gene_protein_source();
        let strict = GraphAssembler::new(&source).load().await.unwrap_err();
        assert!(matches!(strict, LoadError::Schema(_)));

        let config = AssemblerConfig {
            require_edge_types: false,
            ..AssemblerConfig::default()
        };
        let graph = GraphAssembler::with_config(&source, config).load().await.unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_align_features_rejects_gaps() {
        let gene = NodeType::from("Gene");
        let ids = vec![NodeId::Int(10), NodeId::Int(11)];
        let map = IdToIndexMap::build(&gene, &ids).unwrap();

        let err = align_features(&gene, &ids, &map, vec![(NodeId::Int(11), FeatureRecord::new())])
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingFeatures { missing: 1, identifier: NodeId::Int(10), .. }
        ));

        let err = align_features(&gene, &ids, &map, vec![(NodeId::Int(12), FeatureRecord::new())])
            .unwrap_err();
        assert!(matches!(err, LoadError::UnknownFeatureNode { .. }));
    }

    #[test]
    fn test_align_features_rejects_repeated_record() {
        let gene = NodeType::from("Gene");
        let ids = vec![NodeId::Int(10), NodeId::Int(11)];
        let map = IdToIndexMap::build(&gene, &ids).unwrap();

        let mut first = FeatureRecord::new();
        first.insert("name".to_string(), "BRCA1".into());
        let records = vec![
            (NodeId::Int(10), first),
            (NodeId::Int(11), FeatureRecord::new()),
            (NodeId::Int(10), FeatureRecord::new()),
        ];

        let err = align_features(&gene, &ids, &map, records).unwrap_err();
        match err {
            LoadError::DuplicateIdentifier {
                node_type,
                identifier,
            } => {
                assert_eq!(node_type, gene);
                assert_eq!(identifier, NodeId::Int(10));
            }
            other => panic!("expected duplicate identifier, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_remap_matches_maps(
            source_ids in proptest::collection::hash_set(0i64..1000, 1..50),
            target_ids in proptest::collection::hash_set(1000i64..2000, 1..50),
            picks in proptest::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..100),
        ) {
            let source_ids: Vec<NodeId> = source_ids.into_iter().map(NodeId::Int).collect();
            let target_ids: Vec<NodeId> = target_ids.into_iter().map(NodeId::Int).collect();
            let edge_type = translated();
            let source_map = IdToIndexMap::build(&edge_type.source, &source_ids).unwrap();
            let target_map = IdToIndexMap::build(&edge_type.target, &target_ids).unwrap();

            let endpoints: EdgeEndpoints = picks
                .iter()
                .map(|(s, t)| (s.get(&source_ids).clone(), t.get(&target_ids).clone()))
                .collect();
            let index = remap_endpoints(&edge_type, &endpoints, &source_map, &target_map).unwrap();

            prop_assert_eq!(index.sources.len(), endpoints.len());
            prop_assert_eq!(index.targets.len(), endpoints.len());
            for (k, (s, t)) in endpoints.pairs().enumerate() {
                prop_assert_eq!(&source_ids[index.sources[k]], s);
                prop_assert_eq!(&target_ids[index.targets[k]], t);
            }
        }
    }
}
