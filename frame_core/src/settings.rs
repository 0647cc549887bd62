//! # Run Settings
//!
//! Every tunable of a batch run in one serializable record. Settings files
//! are plain JSON and carry a schema version checked by
//! [`crate::file_io::load_settings`].
//!
//! ## Structure
//!
//! ```text
//! RunSettings
//! ├── hinge_length_percentage     plastic hinge length, % of element length
//! ├── analysis: AnalysisSettings  element integration, gravity and pushover steps
//! ├── loads: LoadSettings         surface load factors, infill loads, gravity
//! ├── solver: HoopSolverSettings  ultimate confined strain search
//! └── materials: MaterialSelection
//! ```
//!
//! ## Example
//!
//! ```rust
//! use frame_core::settings::RunSettings;
//!
//! let settings = RunSettings::default();
//! assert_eq!(settings.hinge_length_percentage, 10.0);
//! assert_eq!(settings.analysis.gravity_steps, 40);
//!
//! let json = serde_json::to_string_pretty(&settings).unwrap();
//! let back: RunSettings = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, settings);
//! ```

use serde::{Deserialize, Serialize};

use crate::confinement::HoopSolverSettings;
use crate::errors::{ModelError, ModelResult};
use crate::materials::{ConcreteGrade, ConcreteModel, SteelGrade};
use crate::units::{KnPerMeter, Meters};

/// Current schema version for settings files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root settings container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Plastic hinge length as a percentage of the element length. Also
    /// rescales ultimate concrete strains by `100 / hinge_length_percentage`.
    pub hinge_length_percentage: f64,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub loads: LoadSettings,

    #[serde(default)]
    pub solver: HoopSolverSettings,

    #[serde(default)]
    pub materials: MaterialSelection,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            version: SCHEMA_VERSION.to_string(),
            hinge_length_percentage: 10.0,
            analysis: AnalysisSettings::default(),
            loads: LoadSettings::default(),
            solver: HoopSolverSettings::default(),
            materials: MaterialSelection::default(),
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.hinge_length_percentage > 0.0 && self.hinge_length_percentage <= 100.0) {
            return Err(ModelError::invalid_input(
                "hinge_length_percentage",
                self.hinge_length_percentage.to_string(),
                "Must be in (0, 100]",
            ));
        }
        self.analysis.validate()?;
        self.loads.validate()?;
        self.solver.validate()
    }
}

/// Quadrature rule underlying a regularized hinge integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuadratureRule {
    Lobatto,
    Legendre,
    Radau,
    NewtonCotes,
}

impl QuadratureRule {
    pub fn code(&self) -> &'static str {
        match self {
            QuadratureRule::Lobatto => "Lobatto",
            QuadratureRule::Legendre => "Legendre",
            QuadratureRule::Radau => "Radau",
            QuadratureRule::NewtonCotes => "NewtonCotes",
        }
    }
}

/// Beam-integration scheme of the force-based elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementIntegration {
    /// Plastic hinges at both ends, elastic interior (modified Gauss-Radau)
    HingeRadau,
    /// Plastic hinges with extra points at distance `zeta` to regularize
    /// strain-hardening response
    RegularizedHinge { distribution: QuadratureRule, zeta: f64 },
    /// Distributed plasticity, Gauss-Lobatto points along the member
    Lobatto,
}

impl Default for ElementIntegration {
    fn default() -> Self {
        ElementIntegration::HingeRadau
    }
}

/// Element and analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Integration points for schemes that take a count
    pub integration_points: u32,
    pub integration: ElementIntegration,
    /// Load steps of the gravity phase
    pub gravity_steps: u32,
    /// Target displacement of the control node
    pub pushover_max_displacement: Meters,
    /// Displacement increment of the pushover phase
    pub pushover_increment: Meters,
    /// `NormDispIncr` tolerance
    pub test_tolerance: f64,
    /// `NormDispIncr` iterations
    pub test_iterations: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            integration_points: 5,
            integration: ElementIntegration::HingeRadau,
            gravity_steps: 40,
            pushover_max_displacement: Meters(1.0),
            pushover_increment: Meters(0.001),
            test_tolerance: 1.0e-6,
            test_iterations: 6,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> ModelResult<()> {
        if self.integration_points < 2 {
            return Err(ModelError::invalid_input(
                "analysis.integration_points",
                self.integration_points.to_string(),
                "At least 2 integration points are required",
            ));
        }
        if self.gravity_steps == 0 {
            return Err(ModelError::invalid_input("analysis.gravity_steps", "0", "Must be at least 1"));
        }
        if !(self.pushover_increment.0 > 0.0) || self.pushover_max_displacement.0 < self.pushover_increment.0 {
            return Err(ModelError::invalid_input(
                "analysis.pushover_increment",
                self.pushover_increment.0.to_string(),
                format!(
                    "Increment must be positive and not exceed the target displacement {}",
                    self.pushover_max_displacement.0
                ),
            ));
        }
        if !(self.test_tolerance > 0.0) || self.test_iterations == 0 {
            return Err(ModelError::invalid_input(
                "analysis.test_tolerance",
                self.test_tolerance.to_string(),
                "Convergence test needs a positive tolerance and at least one iteration",
            ));
        }
        if let ElementIntegration::RegularizedHinge { zeta, .. } = self.integration {
            if !(zeta > 0.0) {
                return Err(ModelError::invalid_input(
                    "analysis.integration.zeta",
                    zeta.to_string(),
                    "Must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Number of pushover steps to reach the target displacement
    pub fn pushover_steps(&self) -> u32 {
        (self.pushover_max_displacement.0 / self.pushover_increment.0).round() as u32
    }
}

/// Gravity loading of beams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSettings {
    /// Surface load on the roof (kN/m²)
    pub roof_load_factor: f64,
    /// Surface load on residential floors (kN/m²)
    pub floor_load_factor: f64,
    /// Parapet line load on roof border elements
    pub roof_infill: KnPerMeter,
    /// Facade infill line load on floor border elements
    pub floor_infill: KnPerMeter,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
}

impl Default for LoadSettings {
    fn default() -> Self {
        LoadSettings {
            roof_load_factor: 2.0,
            floor_load_factor: 8.0,
            roof_infill: KnPerMeter(10.0 / 3.0),
            floor_infill: KnPerMeter(10.0),
            gravity: 9.81,
        }
    }
}

impl LoadSettings {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.gravity > 0.0) {
            return Err(ModelError::invalid_input("loads.gravity", self.gravity.to_string(), "Must be positive"));
        }
        let values = [
            self.roof_load_factor,
            self.floor_load_factor,
            self.roof_infill.0,
            self.floor_infill.0,
        ];
        if values.iter().any(|v| !(*v >= 0.0)) {
            return Err(ModelError::invalid_input(
                "loads",
                format!("{:?}", values),
                "Load factors and infill loads cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Materials used by every section of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSelection {
    pub concrete: ConcreteGrade,
    pub concrete_model: ConcreteModel,
    pub steel: SteelGrade,
}

impl Default for MaterialSelection {
    fn default() -> Self {
        MaterialSelection {
            concrete: ConcreteGrade::Ha175,
            concrete_model: ConcreteModel::Concrete04,
            steel: SteelGrade::A400S,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confinement::SearchStrategy;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RunSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.version, SCHEMA_VERSION);
        assert_eq!(settings.analysis.pushover_steps(), 1000);
        assert_eq!(settings.solver.strategy, SearchStrategy::ForwardScan);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let json = r#"{ "version": "0.1.0", "hinge_length_percentage": 15.0 }"#;
        let settings: RunSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.hinge_length_percentage, 15.0);
        assert_eq!(settings.loads, LoadSettings::default());
        assert_eq!(settings.materials.concrete, ConcreteGrade::Ha175);
    }

    #[test]
    fn test_integration_serialization() {
        let integration = ElementIntegration::RegularizedHinge {
            distribution: QuadratureRule::Radau,
            zeta: 1.0,
        };
        let json = serde_json::to_string(&integration).unwrap();
        assert_eq!(json, r#"{"type":"RegularizedHinge","distribution":"Radau","zeta":1.0}"#);
        let back: ElementIntegration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, integration);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = RunSettings::default();
        settings.hinge_length_percentage = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = RunSettings::default();
        settings.analysis.pushover_increment = Meters(2.0);
        assert!(settings.validate().is_err());

        let mut settings = RunSettings::default();
        settings.loads.floor_infill = KnPerMeter(-1.0);
        assert!(settings.validate().is_err());

        let mut settings = RunSettings::default();
        settings.solver.step = 0.0;
        assert!(settings.validate().is_err());
    }
}
