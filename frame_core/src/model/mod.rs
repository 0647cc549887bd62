//! # Structural Model
//!
//! Assembly of the 3D frame analysed for one building: imported nodes and
//! elements with their gravity loads, one rigid diaphragm per floor, lumped
//! nodal masses and the equivalent SDOF properties of the pushover.
//!
//! ## Pipeline
//!
//! ```text
//! BuildingInput ─▶ import_structure ─▶ NodeNetwork::extract ─▶ build_diaphragms
//!                                                                   │
//!                         sdof_properties ◀─ compute_masses ◀───────┘
//! ```
//!
//! The model does not depend on the analysis direction; the same assembly
//! is written once per direction.

pub mod diaphragm;
pub mod element;
pub mod import;
pub mod mass;
pub mod network;
pub mod node;
pub mod sdof;

pub use diaphragm::{build_diaphragms, Diaphragm};
pub use element::Element;
pub use import::{import_structure, BuildingInput, ElementRecord, Fixity, ImportedStructure, NodeRecord};
pub use mass::{compute_masses, NodalMass};
pub use network::{level_key, LevelNetwork, NodeNetwork};
pub use node::{Node, NDF};
pub use sdof::{pushover_loads, sdof_properties, PushoverLoad, SdofProperties};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult};
use crate::settings::RunSettings;

/// Horizontal direction of a pushover analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    X,
    Y,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::X, Direction::Y];

    /// Translational DOF pushed along
    pub fn dof(&self) -> u32 {
        match self {
            Direction::X => 1,
            Direction::Y => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::X => write!(f, "X"),
            Direction::Y => write!(f, "Y"),
        }
    }
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Direction::X),
            "Y" | "y" => Ok(Direction::Y),
            other => Err(ModelError::invalid_input("direction", other, "Expected 'X' or 'Y'")),
        }
    }
}

/// Fully assembled building model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub building: String,
    pub storeys: u32,
    pub nodes: BTreeMap<u32, Node>,
    pub elements: Vec<Element>,
    pub network: NodeNetwork,
    /// Ordered by ascending height
    pub diaphragms: Vec<Diaphragm>,
    pub masses: BTreeMap<u32, NodalMass>,
    pub sdof: SdofProperties,
}

impl StructuralModel {
    pub fn assemble(building: &str, input: &BuildingInput, settings: &RunSettings) -> ModelResult<Self> {
        let structure = import_structure(building, input, settings)?;
        let network = NodeNetwork::extract(building, &structure)?;
        let diaphragms = build_diaphragms(building, &structure.nodes, &network)?;
        let masses = compute_masses(
            building,
            &structure.nodes,
            &structure.elements,
            &network,
            &diaphragms,
            settings.loads.gravity,
        )?;
        let sdof = sdof_properties(building, &diaphragms, &masses)?;

        debug!(
            building,
            diaphragms = diaphragms.len(),
            control_node = sdof.control_node,
            tau = sdof.tau,
            "model assembled"
        );

        Ok(StructuralModel {
            building: building.to_string(),
            storeys: structure.storeys,
            nodes: structure.nodes,
            elements: structure.elements,
            network,
            diaphragms,
            masses,
            sdof,
        })
    }

    /// Fully restrained node ids, ascending
    pub fn base_nodes(&self) -> Vec<u32> {
        self.nodes.values().filter(|n| n.is_base()).map(|n| n.id).collect()
    }

    pub fn pushover_loads(&self, settings: &RunSettings) -> Vec<PushoverLoad> {
        pushover_loads(&self.diaphragms, &self.masses, self.sdof.max_height, settings.loads.gravity)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::BuildingInput;

    /// Two bays of 5 m, two storeys of 3 m. Floor beams carry 10 m² each;
    /// the first beam of every floor is on the facade.
    pub const TWO_STOREY_FRAME: &str = r#"[
        [
            {"id": 1, "coords": [0.0, 0.0, 0.0], "fixes": [1, 1, 1, 1, 1, 1]},
            {"id": 2, "coords": [5.0, 0.0, 0.0], "fixes": [1, 1, 1, 1, 1, 1]},
            {"id": 3, "coords": [10.0, 0.0, 0.0], "fixes": [1, 1, 1, 1, 1, 1]},
            {"id": 4, "coords": [0.0, 0.0, 3.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 5, "coords": [5.0, 0.0, 3.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 6, "coords": [10.0, 0.0, 3.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 7, "coords": [0.0, 0.0, 6.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 8, "coords": [5.0, 0.0, 6.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 9, "coords": [10.0, 0.0, 6.0], "fixes": [0, 0, 0, 0, 0, 0]}
        ],
        [
            {"id": 1, "node_id_1": 1, "node_id_2": 4, "type": "column", "level": 1, "load_area": null, "load_area_hint": ""},
            {"id": 2, "node_id_1": 2, "node_id_2": 5, "type": "column", "level": 1, "load_area": null, "load_area_hint": ""},
            {"id": 3, "node_id_1": 3, "node_id_2": 6, "type": "column", "level": 1, "load_area": null, "load_area_hint": ""},
            {"id": 4, "node_id_1": 4, "node_id_2": 7, "type": "column", "level": 2, "load_area": null, "load_area_hint": ""},
            {"id": 5, "node_id_1": 5, "node_id_2": 8, "type": "column", "level": 2, "load_area": null, "load_area_hint": ""},
            {"id": 6, "node_id_1": 6, "node_id_2": 9, "type": "column", "level": 2, "load_area": null, "load_area_hint": ""},
            {"id": 7, "node_id_1": 4, "node_id_2": 5, "type": "beam", "level": 1, "load_area": 10.0, "load_area_hint": "exterior"},
            {"id": 8, "node_id_1": 5, "node_id_2": 6, "type": "beam", "level": 1, "load_area": 10.0, "load_area_hint": "interior"},
            {"id": 9, "node_id_1": 7, "node_id_2": 8, "type": "beam", "level": 2, "load_area": 10.0, "load_area_hint": "exterior"},
            {"id": 10, "node_id_1": 8, "node_id_2": 9, "type": "beam", "level": 2, "load_area": 10.0, "load_area_hint": "interior_court"}
        ]
    ]"#;

    pub fn two_storey_frame() -> BuildingInput {
        serde_json::from_str(TWO_STOREY_FRAME).unwrap()
    }
}
