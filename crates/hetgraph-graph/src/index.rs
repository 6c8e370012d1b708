//! Identifier to index mapping for a single node type.

use std::collections::HashMap;

use crate::error::LoadError;
use crate::schema::{NodeId, NodeIndex, NodeType};

/// Injective mapping from database identifier to dense index.
///
/// Built once from a node type's identifier list; `map[ids[i]] == i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdToIndexMap {
    indices: HashMap<NodeId, NodeIndex>,
}

impl IdToIndexMap {
    /// Enumerate `ids`, assigning each identifier its position.
    pub fn build(node_type: &NodeType, ids: &[NodeId]) -> Result<Self, LoadError> {
        let mut indices = HashMap::with_capacity(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            if indices.insert(id.clone(), idx).is_some() {
                return Err(LoadError::DuplicateIdentifier {
                    node_type: node_type.clone(),
                    identifier: id.clone(),
                });
            }
        }
        Ok(Self { indices })
    }

    pub fn get(&self, id: &NodeId) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gene() -> NodeType {
        NodeType::from("Gene")
    }

    #[test]
    fn test_build_assigns_fetch_order() {
        let ids = vec![NodeId::Int(10), NodeId::Int(11), NodeId::from("x")];
        let map = IdToIndexMap::build(&gene(), &ids).unwrap();
        assert_eq!(map.get(&NodeId::Int(10)), Some(0));
        assert_eq!(map.get(&NodeId::Int(11)), Some(1));
        assert_eq!(map.get(&NodeId::from("x")), Some(2));
        assert_eq!(map.get(&NodeId::Int(99)), None);
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let ids = vec![NodeId::Int(10), NodeId::Int(11), NodeId::Int(10)];
        match IdToIndexMap::build(&gene(), &ids) {
            Err(LoadError::DuplicateIdentifier { identifier, .. }) => {
                assert_eq!(identifier, NodeId::Int(10))
            }
            other => panic!("expected duplicate identifier error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_empty() {
        let map = IdToIndexMap::build(&gene(), &[]).unwrap();
        assert!(map.is_empty());
    }

    proptest! {
        #[test]
        fn prop_map_inverts_id_list(raw in proptest::collection::hash_set(any::<i64>(), 0..200)) {
            let ids: Vec<NodeId> = raw.into_iter().map(NodeId::Int).collect();
            let map = IdToIndexMap::build(&gene(), &ids).unwrap();
            prop_assert_eq!(map.len(), ids.len());
            for (i, id) in ids.iter().enumerate() {
                prop_assert_eq!(map.get(id), Some(i));
            }
            let rebuilt = IdToIndexMap::build(&gene(), &ids).unwrap();
            prop_assert_eq!(rebuilt, map);
        }
    }
}
