//! Per-level node network.
//!
//! Beams and auxiliary beams are horizontal, so each one belongs to the
//! floor at the height of its first node. Columns connect floors and are
//! left out. Levels are keyed by height in millimeters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::model::import::ImportedStructure;

/// Height key of a level (mm)
pub fn level_key(z: f64) -> i64 {
    (z * 1000.0).round() as i64
}

/// Nodes of one floor and the floor elements incident to each
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelNetwork {
    /// Node id → ids of incident beams and auxiliary beams
    pub nodes: BTreeMap<u32, Vec<u32>>,
}

impl LevelNetwork {
    fn connect(&mut self, node: u32, element: u32) {
        let incident = self.nodes.entry(node).or_default();
        if !incident.contains(&element) {
            incident.push(element);
        }
    }

    pub fn node_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes.keys().copied()
    }
}

/// Floor networks ordered by ascending height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeNetwork {
    pub levels: BTreeMap<i64, LevelNetwork>,
}

impl NodeNetwork {
    /// Group the floor elements of `structure` by level. The number of
    /// levels found must match the storey count.
    pub fn extract(building: &str, structure: &ImportedStructure) -> ModelResult<Self> {
        let mut levels: BTreeMap<i64, LevelNetwork> = BTreeMap::new();

        for element in structure.elements.iter().filter(|e| !e.kind.is_column()) {
            let node = structure.nodes.get(&element.node_i).ok_or_else(|| {
                ModelError::topology(building, format!("element {} has no node {}", element.id, element.node_i))
            })?;
            let level = levels.entry(level_key(node.z())).or_default();
            level.connect(element.node_i, element.id);
            level.connect(element.node_j, element.id);
        }

        if levels.len() != structure.storeys as usize {
            return Err(ModelError::topology(
                building,
                format!(
                    "found {} floor levels for a building of {} storeys",
                    levels.len(),
                    structure.storeys
                ),
            ));
        }

        Ok(NodeNetwork { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_storey_frame;
    use crate::model::import::import_structure;
    use crate::settings::RunSettings;

    #[test]
    fn test_level_key() {
        assert_eq!(level_key(3.0), 3000);
        assert_eq!(level_key(2.9999999), 3000);
        assert_eq!(level_key(0.0), 0);
    }

    #[test]
    fn test_extract_two_levels() {
        let structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let network = NodeNetwork::extract("frame", &structure).unwrap();

        assert_eq!(network.len(), 2);
        let keys: Vec<i64> = network.levels.keys().copied().collect();
        assert_eq!(keys, vec![3000, 6000]);

        let first = &network.levels[&3000];
        let ids: Vec<u32> = first.node_ids().collect();
        assert_eq!(ids, vec![4, 5, 6]);
        // Middle node joins both beams
        assert_eq!(first.nodes[&5], vec![7, 8]);
        assert_eq!(first.nodes[&4], vec![7]);
    }

    #[test]
    fn test_storey_mismatch_is_fatal() {
        let mut structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        structure.storeys = 3;
        let err = NodeNetwork::extract("frame", &structure).unwrap_err();
        assert_eq!(err.error_code(), "TOPOLOGY");
    }
}
