//! Building import.
//!
//! Building files are JSON arrays `[nodes, elements]`:
//!
//! ```json
//! [
//!   [ { "id": 1, "coords": [0.0, 0.0, 0.0], "fixes": [1, 1, 1, 1, 1, 1] } ],
//!   [ { "id": 1, "node_id_1": 1, "node_id_2": 5, "type": "column",
//!       "level": 1, "load_area": null, "load_area_hint": "" } ]
//! ]
//! ```
//!
//! `fixes` accepts booleans or 0/1 integers. `load_area` (m²) may be null and
//! `load_area_hint` may be absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult};
use crate::model::element::{round2, Element};
use crate::model::node::{Node, NDF};
use crate::sections::SectionKind;
use crate::settings::RunSettings;
use crate::units::{KnPerMeter, Meters};

/// Restraint flag as written by the exporters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fixity {
    Flag(bool),
    Code(i64),
}

impl Fixity {
    pub fn is_fixed(&self) -> bool {
        match self {
            Fixity::Flag(b) => *b,
            Fixity::Code(c) => *c != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub coords: [f64; 3],
    pub fixes: [Fixity; NDF],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: u32,
    pub node_id_1: u32,
    pub node_id_2: u32,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub level: u32,
    /// Tributary slab area (m²)
    #[serde(default)]
    pub load_area: Option<f64>,
    #[serde(default)]
    pub load_area_hint: Option<String>,
}

impl ElementRecord {
    /// Element on the building envelope
    pub fn is_exterior(&self) -> bool {
        self.load_area_hint
            .as_deref()
            .map(|hint| hint.contains("exterior"))
            .unwrap_or(false)
    }
}

/// Raw content of a building file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInput(pub Vec<NodeRecord>, pub Vec<ElementRecord>);

impl BuildingInput {
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.0
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.1
    }

    /// Number of storeys: the highest element level
    pub fn storeys(&self) -> ModelResult<u32> {
        self.1
            .iter()
            .map(|e| e.level)
            .max()
            .ok_or_else(|| ModelError::missing_field("elements"))
    }
}

/// Nodes and loaded elements of one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedStructure {
    pub storeys: u32,
    pub nodes: BTreeMap<u32, Node>,
    /// Sorted by id
    pub elements: Vec<Element>,
}

/// Convert the raw records of `building` into nodes and elements carrying
/// their gravity loads.
pub fn import_structure(building: &str, input: &BuildingInput, settings: &RunSettings) -> ModelResult<ImportedStructure> {
    let storeys = input.storeys()?;

    let mut nodes = BTreeMap::new();
    for record in input.nodes() {
        let mut fixes = [false; NDF];
        for (flag, fixity) in fixes.iter_mut().zip(&record.fixes) {
            *flag = fixity.is_fixed();
        }
        let node = Node::new(record.id, record.coords, fixes);
        if nodes.insert(record.id, node).is_some() {
            return Err(ModelError::topology(building, format!("duplicate node id {}", record.id)));
        }
    }

    let loads = &settings.loads;
    let mut elements = Vec::with_capacity(input.elements().len());
    for record in input.elements() {
        let endpoint = |id: u32| {
            nodes.get(&id).ok_or_else(|| {
                ModelError::topology(building, format!("element {} references unknown node {}", record.id, id))
            })
        };
        let (ni, nj) = (endpoint(record.node_id_1)?, endpoint(record.node_id_2)?);

        let length = ni.distance_to(nj);
        if !(length > 0.0) {
            return Err(ModelError::topology(
                building,
                format!("element {} has zero length", record.id),
            ));
        }

        let roof = record.level == storeys;
        let factor = if roof { loads.roof_load_factor } else { loads.floor_load_factor };
        let area = round2(record.load_area.unwrap_or(0.0));
        let mut uniform_load = KnPerMeter(-area * factor / length);

        let border = record.is_exterior();
        if border {
            let infill = if roof { loads.roof_infill } else { loads.floor_infill };
            uniform_load = uniform_load - infill;
        }

        elements.push(Element {
            id: record.id,
            node_i: record.node_id_1,
            node_j: record.node_id_2,
            kind: record.kind,
            level: record.level,
            length: Meters(length),
            hinge_length: Meters(length * settings.hinge_length_percentage / 100.0),
            uniform_load,
            border,
        });
    }

    elements.sort_by_key(|e| e.id);
    if let Some(pair) = elements.windows(2).find(|w| w[0].id == w[1].id) {
        return Err(ModelError::topology(building, format!("duplicate element id {}", pair[0].id)));
    }

    debug!(building, storeys, nodes = nodes.len(), elements = elements.len(), "structure imported");

    Ok(ImportedStructure {
        storeys,
        nodes,
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BUILDING: &str = r#"[
        [
            {"id": 1, "coords": [0.0, 0.0, 0.0], "fixes": [1, 1, 1, 1, 1, 1]},
            {"id": 2, "coords": [5.0, 0.0, 0.0], "fixes": [true, true, true, true, true, true]},
            {"id": 3, "coords": [0.0, 0.0, 3.0], "fixes": [0, 0, 0, 0, 0, 0]},
            {"id": 4, "coords": [5.0, 0.0, 3.0], "fixes": [0, 0, 0, 0, 0, 0]}
        ],
        [
            {"id": 1, "node_id_1": 1, "node_id_2": 3, "type": "column", "level": 1, "load_area": null},
            {"id": 2, "node_id_1": 2, "node_id_2": 4, "type": "column", "level": 1, "load_area": null, "load_area_hint": ""},
            {"id": 3, "node_id_1": 3, "node_id_2": 4, "type": "beam", "level": 1, "load_area": 6.254, "load_area_hint": "exterior_north"}
        ]
    ]"#;

    fn input() -> BuildingInput {
        serde_json::from_str(BUILDING).unwrap()
    }

    #[test]
    fn test_parse_building_file() {
        let input = input();
        assert_eq!(input.nodes().len(), 4);
        assert_eq!(input.elements()[2].kind, SectionKind::Beam);
        assert_eq!(input.elements()[0].load_area, None);
        assert_eq!(input.storeys().unwrap(), 1);
        assert!(input.elements()[2].is_exterior());
        assert!(!input.elements()[1].is_exterior());
    }

    #[test]
    fn test_roof_loads() {
        let structure = import_structure("b1", &input(), &RunSettings::default()).unwrap();
        assert!(structure.nodes[&1].is_base());
        assert!(structure.nodes[&2].is_base());

        let beam = &structure.elements[2];
        // Level 1 is the roof: 6.25 m² at 2 kN/m² over 5 m, plus parapet
        assert_relative_eq!(beam.uniform_load.0, -6.25 * 2.0 / 5.0 - 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(beam.hinge_length.0, 0.5, epsilon = 1e-12);
        assert!(beam.border);

        let column = &structure.elements[0];
        assert_eq!(column.uniform_load.0, 0.0);
        assert!(!column.is_loaded());
    }

    #[test]
    fn test_floor_loads() {
        let mut input = input();
        input.1[2].level = 1;
        input.1[0].level = 2;
        let structure = import_structure("b1", &input, &RunSettings::default()).unwrap();
        let beam = &structure.elements[2];
        assert_relative_eq!(beam.uniform_load.0, -6.25 * 8.0 / 5.0 - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_node_is_topology_error() {
        let mut input = input();
        input.1[2].node_id_2 = 99;
        let err = import_structure("b1", &input, &RunSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "TOPOLOGY");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut input = input();
        input.0[3].id = 3;
        assert!(import_structure("b1", &input, &RunSettings::default()).is_err());

        let mut input = self::input();
        input.1[1].id = 1;
        assert!(import_structure("b1", &input, &RunSettings::default()).is_err());
    }

    #[test]
    fn test_empty_elements() {
        let input = BuildingInput(vec![], vec![]);
        assert!(input.storeys().is_err());
    }
}
