//! Rigid floor diaphragms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::model::network::NodeNetwork;
use crate::model::node::Node;

/// Master node of a rigid floor and the nodes it constrains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diaphragm {
    /// Master node id
    pub id: u32,
    /// Level key (mm)
    pub level: i64,
    /// Centroid of the floor nodes, at the floor height
    pub coords: [f64; 3],
    /// Constrained node ids, ascending
    pub nodes: Vec<u32>,
}

impl Diaphragm {
    pub fn height(&self) -> f64 {
        self.coords[2]
    }

    /// `node`, `fix` and `rigidDiaphragm` statements
    pub fn command(&self) -> String {
        let mut out = format!(
            "node {} {:.2} {:.2} {:.2}\n",
            self.id, self.coords[0], self.coords[1], self.coords[2]
        );
        // Free in plane (ux, uy, rz)
        out.push_str(&format!("fix {} 0 0 1 1 1 0\n", self.id));
        out.push_str(&format!("rigidDiaphragm 3 {}", self.id));
        for node in &self.nodes {
            out.push_str(&format!(" {}", node));
        }
        out
    }
}

/// One diaphragm per level, master ids allocated after the highest node
/// id in order of ascending height.
pub fn build_diaphragms(
    building: &str,
    nodes: &BTreeMap<u32, Node>,
    network: &NodeNetwork,
) -> ModelResult<Vec<Diaphragm>> {
    let mut next_id = nodes.keys().next_back().copied().unwrap_or(0) + 1;
    let mut diaphragms = Vec::with_capacity(network.len());

    for (level, floor) in &network.levels {
        let level_nodes = floor
            .node_ids()
            .map(|id| {
                nodes
                    .get(&id)
                    .ok_or_else(|| ModelError::topology(building, format!("floor node {} does not exist", id)))
            })
            .collect::<ModelResult<Vec<&Node>>>()?;

        let first = level_nodes.first().ok_or_else(|| {
            ModelError::topology(building, format!("level at {} mm has no nodes", level))
        })?;
        let count = level_nodes.len() as f64;
        let x = level_nodes.iter().map(|n| n.coords[0]).sum::<f64>() / count;
        let y = level_nodes.iter().map(|n| n.coords[1]).sum::<f64>() / count;

        diaphragms.push(Diaphragm {
            id: next_id,
            level: *level,
            coords: [x, y, first.z()],
            nodes: level_nodes.iter().map(|n| n.id).collect(),
        });
        next_id += 1;
    }

    Ok(diaphragms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_storey_frame;
    use crate::model::import::import_structure;
    use crate::settings::RunSettings;

    fn diaphragms() -> Vec<Diaphragm> {
        let structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let network = NodeNetwork::extract("frame", &structure).unwrap();
        build_diaphragms("frame", &structure.nodes, &network).unwrap()
    }

    #[test]
    fn test_ids_follow_nodes_by_height() {
        let d = diaphragms();
        assert_eq!(d.len(), 2);
        assert_eq!((d[0].id, d[1].id), (10, 11));
        assert_eq!(d[0].coords, [5.0, 0.0, 3.0]);
        assert_eq!(d[1].height(), 6.0);
        assert_eq!(d[1].nodes, vec![7, 8, 9]);
    }

    #[test]
    fn test_command() {
        let d = diaphragms();
        assert_eq!(
            d[0].command(),
            "node 10 5.00 0.00 3.00\nfix 10 0 0 1 1 1 0\nrigidDiaphragm 3 10 4 5 6"
        );
    }
}
