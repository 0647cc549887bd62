//! Equivalent single-degree-of-freedom properties and pushover loads.
//!
//! With a linear first-mode shape `φ_i = h_i / H`, the equivalent mass is
//! `m* = Σ m_i·φ_i` and the transformation factor is `τ = m* / Σ m_i·φ_i²`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::model::diaphragm::Diaphragm;
use crate::model::element::round2;
use crate::model::mass::NodalMass;
use crate::units::{KiloNewtons, Meters, Tonnes};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdofProperties {
    /// Master node of the highest diaphragm
    pub control_node: u32,
    /// Height of the control node
    pub max_height: Meters,
    pub equivalent_mass: Tonnes,
    pub tau: f64,
}

/// Lateral load applied to a diaphragm master
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushoverLoad {
    pub node: u32,
    pub force: KiloNewtons,
}

/// Highest diaphragm
pub fn control_diaphragm<'a>(building: &str, diaphragms: &'a [Diaphragm]) -> ModelResult<&'a Diaphragm> {
    diaphragms
        .iter()
        .max_by(|a, b| a.height().partial_cmp(&b.height()).unwrap_or(Ordering::Equal))
        .filter(|d| d.height() > 0.0)
        .ok_or_else(|| ModelError::topology(building, "no floor above the base"))
}

/// Total translational mass of the floor of `diaphragm`
pub fn floor_mass(diaphragm: &Diaphragm, masses: &BTreeMap<u32, NodalMass>) -> Tonnes {
    diaphragm
        .nodes
        .iter()
        .filter_map(|id| masses.get(id))
        .fold(Tonnes(0.0), |acc, m| acc + m.translational())
}

pub fn sdof_properties(
    building: &str,
    diaphragms: &[Diaphragm],
    masses: &BTreeMap<u32, NodalMass>,
) -> ModelResult<SdofProperties> {
    let control = control_diaphragm(building, diaphragms)?;
    let max_height = control.height();

    let mut equivalent_mass = 0.0;
    let mut denominator = 0.0;
    for diaphragm in diaphragms {
        let phi = diaphragm.height() / max_height;
        let mass = floor_mass(diaphragm, masses).0;
        equivalent_mass += mass * phi;
        denominator += mass * phi * phi;
    }

    if !(denominator > 0.0) {
        return Err(ModelError::calculation_failed(
            "sdof_transformation",
            format!("building '{}' has no floor mass", building),
        ));
    }

    Ok(SdofProperties {
        control_node: control.id,
        max_height: Meters(max_height),
        equivalent_mass: Tonnes(equivalent_mass),
        tau: equivalent_mass / denominator,
    })
}

/// Inverted-triangle pushover load: each floor weight scaled by `h / H`,
/// rounded to 2 decimals.
pub fn pushover_loads(
    diaphragms: &[Diaphragm],
    masses: &BTreeMap<u32, NodalMass>,
    max_height: Meters,
    gravity: f64,
) -> Vec<PushoverLoad> {
    diaphragms
        .iter()
        .map(|d| {
            let weight = gravity * floor_mass(d, masses).0;
            PushoverLoad {
                node: d.id,
                force: KiloNewtons(round2(weight * d.height() / max_height.0)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_storey_frame;
    use crate::model::StructuralModel;
    use crate::settings::RunSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_storey_tau() {
        let model = StructuralModel::assemble("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let sdof = model.sdof;
        assert_eq!(sdof.control_node, 11);
        assert_eq!(sdof.max_height, Meters(6.0));

        // Floor weights 210 kN and 170/3 kN
        let (w1, w2) = (210.0, 170.0 / 3.0);
        let eq = (w1 * 0.5 + w2) / 9.81;
        let den = (w1 * 0.25 + w2) / 9.81;
        assert_relative_eq!(sdof.equivalent_mass.0, eq, max_relative = 1e-12);
        assert_relative_eq!(sdof.tau, eq / den, max_relative = 1e-12);
        assert!(sdof.tau > 1.0);
    }

    #[test]
    fn test_pushover_loads() {
        let model = StructuralModel::assemble("frame", &two_storey_frame(), &RunSettings::default()).unwrap();
        let loads = pushover_loads(&model.diaphragms, &model.masses, model.sdof.max_height, 9.81);
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[0].node, 10);
        assert_eq!(loads[0].force, KiloNewtons(105.0));
        assert_eq!(loads[1].force, KiloNewtons(56.67));
    }

    #[test]
    fn test_uniform_floors_tau() {
        // Equal floor masses: τ = Σφ / Σφ² = (1/2 + 1) / (1/4 + 1)
        let d = |id, z: f64| Diaphragm {
            id,
            level: (z * 1000.0) as i64,
            coords: [0.0, 0.0, z],
            nodes: vec![id - 10],
        };
        let diaphragms = vec![d(11, 3.0), d(12, 6.0)];
        let masses: BTreeMap<u32, NodalMass> = [1, 2]
            .iter()
            .map(|id| (*id, NodalMass([4.0, 4.0, 0.0, 0.0, 0.0, 0.0])))
            .collect();
        let sdof = sdof_properties("b", &diaphragms, &masses).unwrap();
        assert_relative_eq!(sdof.tau, 1.5 / 1.25, max_relative = 1e-12);
        assert_relative_eq!(sdof.equivalent_mass.0, 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_massless_building_fails() {
        let diaphragms = vec![Diaphragm {
            id: 5,
            level: 3000,
            coords: [0.0, 0.0, 3.0],
            nodes: vec![1],
        }];
        let err = sdof_properties("b", &diaphragms, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
        assert!(control_diaphragm("b", &[]).is_err());
    }
}
