//! Lumped nodal masses.
//!
//! Floor loads are the only source of mass. Each floor element sends half
//! of its gravity load to each end node; the node carries that mass in X
//! and Y and a rotational inertia about Z proportional to its distance from
//! the diaphragm centroid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::model::diaphragm::Diaphragm;
use crate::model::element::Element;
use crate::model::network::{level_key, NodeNetwork};
use crate::model::node::{Node, NDF};
use crate::units::{KiloNewtons, Tonnes};

/// Mass of a node per DOF (t, t·m for rotation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalMass(pub [f64; NDF]);

impl NodalMass {
    pub fn translational(&self) -> Tonnes {
        Tonnes(self.0[0])
    }

    /// `mass` statement
    pub fn command(&self, node: u32) -> String {
        let values: Vec<String> = self.0.iter().map(|m| format!("{:.2}", m)).collect();
        format!("mass {} {}", node, values.join(" "))
    }
}

/// Masses of every node of the building. Nodes off the floors, and
/// restrained floor nodes, get zero mass.
pub fn compute_masses(
    building: &str,
    nodes: &BTreeMap<u32, Node>,
    elements: &[Element],
    network: &NodeNetwork,
    diaphragms: &[Diaphragm],
    gravity: f64,
) -> ModelResult<BTreeMap<u32, NodalMass>> {
    let by_id: BTreeMap<u32, &Element> = elements.iter().map(|e| (e.id, e)).collect();
    let mut masses: BTreeMap<u32, NodalMass> = nodes.keys().map(|id| (*id, NodalMass::default())).collect();

    for (level, floor) in &network.levels {
        let diaphragm = diaphragms
            .iter()
            .find(|d| d.level == *level)
            .ok_or_else(|| ModelError::topology(building, format!("no diaphragm for level {} mm", level)))?;

        for (node_id, incident) in &floor.nodes {
            let node = nodes
                .get(node_id)
                .ok_or_else(|| ModelError::topology(building, format!("floor node {} does not exist", node_id)))?;
            if node.is_restrained() {
                continue;
            }

            let mut weight = KiloNewtons(0.0);
            for element_id in incident {
                let element = by_id.get(element_id).ok_or_else(|| {
                    ModelError::topology(building, format!("floor element {} does not exist", element_id))
                })?;
                weight = weight + element.uniform_load.abs() * element.length * 0.5;
            }
            let mass = Tonnes::from_weight(weight, gravity).0;

            let dx = node.coords[0] - diaphragm.coords[0];
            let dy = node.coords[1] - diaphragm.coords[1];
            if level_key(node.z()) != diaphragm.level {
                let dz = node.coords[2] - diaphragm.coords[2];
                return Err(ModelError::topology(
                    building,
                    format!(
                        "node {} lies {:.4} m off the plane of diaphragm {}",
                        node_id, dz, diaphragm.id
                    ),
                ));
            }
            let radius = (dx * dx + dy * dy).sqrt();

            masses.insert(*node_id, NodalMass([mass, mass, 0.0, 0.0, 0.0, mass * radius]));
        }
    }

    Ok(masses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diaphragm::build_diaphragms;
    use crate::model::fixtures::two_storey_frame;
    use crate::model::import::import_structure;
    use crate::settings::RunSettings;
    use approx::assert_relative_eq;

    fn masses() -> BTreeMap<u32, NodalMass> {
        let structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let network = NodeNetwork::extract("frame", &structure).unwrap();
        let diaphragms = build_diaphragms("frame", &structure.nodes, &network).unwrap();
        compute_masses("frame", &structure.nodes, &structure.elements, &network, &diaphragms, 9.81).unwrap()
    }

    #[test]
    fn test_half_element_weight_per_node() {
        let m = masses();
        // Exterior floor beam: 16 + 10 kN/m over 5 m
        assert_relative_eq!(m[&4].0[0], 26.0 * 2.5 / 9.81, max_relative = 1e-12);
        assert_relative_eq!(m[&5].0[1], (26.0 + 16.0) * 2.5 / 9.81, max_relative = 1e-12);
        assert_eq!(m[&5].0[2], 0.0);
        // Node 5 sits on the centroid
        assert_eq!(m[&5].0[5], 0.0);
        assert_relative_eq!(m[&4].0[5], m[&4].0[0] * 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_base_nodes_massless() {
        let m = masses();
        assert_eq!(m.len(), 9);
        assert_eq!(m[&1], NodalMass::default());
        assert_eq!(m[&1].command(1), "mass 1 0.00 0.00 0.00 0.00 0.00 0.00");
    }

    #[test]
    fn test_node_off_plane_is_fatal() {
        let mut structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let network = NodeNetwork::extract("frame", &structure).unwrap();
        let diaphragms = build_diaphragms("frame", &structure.nodes, &network).unwrap();
        if let Some(node) = structure.nodes.get_mut(&6) {
            node.coords[2] = 3.002;
        }
        let result = compute_masses("frame", &structure.nodes, &structure.elements, &network, &diaphragms, 9.81);
        assert_eq!(result.unwrap_err().error_code(), "TOPOLOGY");
    }

    #[test]
    fn test_float_noise_stays_on_plane() {
        let mut structure = import_structure("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        if let Some(node) = structure.nodes.get_mut(&5) {
            node.coords[2] = 3.0 + 1e-10;
        }
        let network = NodeNetwork::extract("frame", &structure).unwrap();
        let diaphragms = build_diaphragms("frame", &structure.nodes, &network).unwrap();
        let m = compute_masses("frame", &structure.nodes, &structure.elements, &network, &diaphragms, 9.81).unwrap();
        assert_relative_eq!(m[&5].0[0], (26.0 + 16.0) * 2.5 / 9.81, max_relative = 1e-12);
    }

    #[test]
    fn test_mass_command() {
        let mass = NodalMass([1.234, 1.234, 0.0, 0.0, 0.0, 6.789]);
        assert_eq!(mass.command(7), "mass 7 1.23 1.23 0.00 0.00 0.00 6.79");
    }
}
