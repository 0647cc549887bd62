//! Concrete grades and uniaxial concrete models.
//!
//! Strengths are stored in kPa with compression negative, the sign
//! convention of the analysis engine. Strains are stored negative too.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::materials::{ConcreteGrade, ConcreteMaterial, ConcreteModel};
//!
//! let c = ConcreteMaterial::unconfined(2, ConcreteGrade::Ha25, ConcreteModel::Concrete04, 10.0).unwrap();
//! assert_eq!(c.name, "concrete04_HA25");
//! assert!(c.command().starts_with("uniaxialMaterial Concrete04 2 -25000"));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::units::{KiloPascals, MegaPascals};

/// Ultimate (crushing) strain of unconfined concrete, EC2
pub const ULTIMATE_STRAIN: f64 = 0.0035;

/// Residual crushing strength of the Kent-Scott-Park model, as a fraction of
/// the mean strength
pub const CRUSHING_STRENGTH_FRACTION: f64 = 0.1;

/// Margin from characteristic to mean strength (EC2 uses 8 MPa)
pub const MEAN_STRENGTH_MARGIN: KiloPascals = KiloPascals(7_000.0);

/// Concrete strength class (Spanish designation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    /// Low strength concrete typical of pre-1980 buildings
    #[serde(rename = "HA-17.5")]
    Ha175,
    /// Standard structural concrete
    #[serde(rename = "HA-25")]
    Ha25,
}

impl ConcreteGrade {
    pub const ALL: [ConcreteGrade; 2] = [ConcreteGrade::Ha175, ConcreteGrade::Ha25];

    pub fn code(&self) -> &'static str {
        match self {
            ConcreteGrade::Ha175 => "HA-17.5",
            ConcreteGrade::Ha25 => "HA-25",
        }
    }

    /// Compact form used inside material names
    pub fn name_code(&self) -> &'static str {
        match self {
            ConcreteGrade::Ha175 => "HA175",
            ConcreteGrade::Ha25 => "HA25",
        }
    }

    /// Characteristic compressive strength (positive)
    pub fn fck(&self) -> KiloPascals {
        match self {
            ConcreteGrade::Ha175 => KiloPascals(17_500.0),
            ConcreteGrade::Ha25 => KiloPascals(25_000.0),
        }
    }

    /// Mean compressive strength `fck + 7 MPa` (positive)
    pub fn mean_strength(&self) -> KiloPascals {
        self.fck() + MEAN_STRENGTH_MARGIN
    }

    /// Strain at peak strength (positive), EC2 table 3.1 interpolated
    pub fn peak_strain(&self) -> f64 {
        match self {
            ConcreteGrade::Ha175 => 0.00193,
            ConcreteGrade::Ha25 => 0.0021,
        }
    }

    /// Initial modulus `Ec = 8500·fck^(1/3)` (MPa), EHE-08 art. 39.6
    pub fn initial_modulus(&self) -> KiloPascals {
        let fck: MegaPascals = self.fck().into();
        MegaPascals(8500.0 * fck.0.cbrt()).into()
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ConcreteGrade {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', '.', '_'], "").as_str() {
            "HA175" => Ok(ConcreteGrade::Ha175),
            "HA25" => Ok(ConcreteGrade::Ha25),
            _ => Err(ModelError::invalid_input("concrete grade", s, "Expected HA-17.5 or HA-25")),
        }
    }
}

/// Uniaxial concrete model of the analysis engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteModel {
    /// Kent-Scott-Park, no tensile strength
    Concrete01,
    /// Popovics, supports confined parameters
    Concrete04,
}

impl ConcreteModel {
    pub const ALL: [ConcreteModel; 2] = [ConcreteModel::Concrete01, ConcreteModel::Concrete04];

    pub fn code(&self) -> &'static str {
        match self {
            ConcreteModel::Concrete01 => "concrete01",
            ConcreteModel::Concrete04 => "concrete04",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteModel::Concrete01 => "Kent-Scott-Park (Concrete01)",
            ConcreteModel::Concrete04 => "Popovics (Concrete04)",
        }
    }

    /// Whether a confined core material is derived for sections using this model
    pub fn supports_confinement(&self) -> bool {
        matches!(self, ConcreteModel::Concrete04)
    }
}

impl std::fmt::Display for ConcreteModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ConcreteModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concrete01" | "01" => Ok(ConcreteModel::Concrete01),
            "concrete04" | "04" => Ok(ConcreteModel::Concrete04),
            _ => Err(ModelError::invalid_input("concrete model", s, "Expected Concrete01 or Concrete04")),
        }
    }
}

/// A concrete material ready for emission.
///
/// `fc`, `peak_strain` and `ultimate_strain` are negative (compression).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMaterial {
    pub tag: u32,
    pub name: String,
    pub grade: ConcreteGrade,
    pub model: ConcreteModel,
    /// Peak compressive strength (negative)
    pub fc: KiloPascals,
    /// Strain at peak strength (negative)
    pub peak_strain: f64,
    /// Ultimate strain, already rescaled to the plastic hinge (negative)
    pub ultimate_strain: f64,
    /// Initial modulus
    pub ec: KiloPascals,
    pub confined: bool,
}

impl ConcreteMaterial {
    /// Unconfined material of the given grade.
    ///
    /// The EC2 ultimate strain is amplified by `100 / hinge_length_percentage`
    /// since only the hinge zone of an element softens.
    pub fn unconfined(
        tag: u32,
        grade: ConcreteGrade,
        model: ConcreteModel,
        hinge_length_percentage: f64,
    ) -> ModelResult<Self> {
        let scale = hinge_strain_scale(hinge_length_percentage)?;
        Ok(ConcreteMaterial {
            tag,
            name: format!("{}_{}", model.code(), grade.name_code()),
            grade,
            model,
            fc: KiloPascals(-grade.fck().0),
            peak_strain: -grade.peak_strain(),
            ultimate_strain: -ULTIMATE_STRAIN * scale,
            ec: grade.initial_modulus(),
            confined: false,
        })
    }

    /// Residual crushing strength for Concrete01 (negative)
    pub fn crushing_strength(&self) -> KiloPascals {
        KiloPascals(-self.grade.mean_strength().0 * CRUSHING_STRENGTH_FRACTION)
    }

    /// Shear modulus with Poisson's ratio 0.2
    pub fn shear_modulus(&self) -> KiloPascals {
        KiloPascals(self.ec.0 / (2.0 * (1.0 + 0.2)))
    }

    /// `uniaxialMaterial` statement
    pub fn command(&self) -> String {
        match self.model {
            ConcreteModel::Concrete01 => format!(
                "uniaxialMaterial Concrete01 {} {} {} {} {}",
                self.tag,
                self.fc.0,
                self.peak_strain,
                self.crushing_strength().0,
                self.ultimate_strain
            ),
            ConcreteModel::Concrete04 => format!(
                "uniaxialMaterial Concrete04 {} {} {} {} {}",
                self.tag, self.fc.0, self.peak_strain, self.ultimate_strain, self.ec.0
            ),
        }
    }
}

/// Factor `100 / hinge_length_percentage` applied to ultimate strains
pub fn hinge_strain_scale(hinge_length_percentage: f64) -> ModelResult<f64> {
    if !(hinge_length_percentage > 0.0 && hinge_length_percentage <= 100.0) {
        return Err(ModelError::invalid_input(
            "hinge_length_percentage",
            hinge_length_percentage.to_string(),
            "Hinge length must be in (0, 100] percent of the element length",
        ));
    }
    Ok(100.0 / hinge_length_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_modulus() {
        // 8500·25^(1/3) = 24854 MPa
        let ec = ConcreteGrade::Ha25.initial_modulus();
        assert!((ec.0 - 24_854_150.77).abs() < 1.0);
        assert!(ConcreteGrade::Ha175.initial_modulus().0 < ec.0);
    }

    #[test]
    fn test_unconfined_concrete04() {
        let c = ConcreteMaterial::unconfined(2, ConcreteGrade::Ha175, ConcreteModel::Concrete04, 10.0).unwrap();
        assert_eq!(c.name, "concrete04_HA175");
        assert_eq!(c.fc.0, -17_500.0);
        assert_eq!(c.peak_strain, -0.00193);
        assert!((c.ultimate_strain + 0.035).abs() < 1e-12);
        assert!(!c.confined);

        let cmd = c.command();
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        assert_eq!(parts[0..3], ["uniaxialMaterial", "Concrete04", "2"]);
        assert_eq!(parts.len(), 7);
        assert_eq!(parts[3], "-17500");
    }

    #[test]
    fn test_unconfined_concrete01() {
        let c = ConcreteMaterial::unconfined(1, ConcreteGrade::Ha25, ConcreteModel::Concrete01, 20.0).unwrap();
        let cmd = c.command();
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        assert_eq!(parts[1], "Concrete01");
        assert_eq!(parts.len(), 7);
        // fpcu = 10% of fck + 7 MPa
        assert!((parts[5].parse::<f64>().unwrap() + 3200.0).abs() < 1e-9);
        // 0.0035 · 100/20
        assert!((parts[6].parse::<f64>().unwrap() + 0.0175).abs() < 1e-12);
    }

    #[test]
    fn test_crushing_strength_from_mean() {
        let c = ConcreteMaterial::unconfined(1, ConcreteGrade::Ha175, ConcreteModel::Concrete01, 10.0).unwrap();
        assert_eq!(ConcreteGrade::Ha175.mean_strength(), KiloPascals(24_500.0));
        assert!((c.crushing_strength().0 + 2450.0).abs() < 1e-9);
        // Peak stays at fck
        assert_eq!(c.command().split_whitespace().nth(3), Some("-17500"));
    }

    #[test]
    fn test_hinge_percentage_bounds() {
        assert!(hinge_strain_scale(0.0).is_err());
        assert!(hinge_strain_scale(-5.0).is_err());
        assert!(hinge_strain_scale(150.0).is_err());
        assert_eq!(hinge_strain_scale(100.0).unwrap(), 1.0);
    }

    #[test]
    fn test_grade_parsing() {
        assert_eq!("HA-25".parse::<ConcreteGrade>().unwrap(), ConcreteGrade::Ha25);
        assert_eq!("ha17.5".parse::<ConcreteGrade>().unwrap(), ConcreteGrade::Ha175);
        assert!("C30/37".parse::<ConcreteGrade>().is_err());
        assert_eq!(serde_json::to_string(&ConcreteGrade::Ha175).unwrap(), "\"HA-17.5\"");
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!("Concrete04".parse::<ConcreteModel>().unwrap(), ConcreteModel::Concrete04);
        assert!(ConcreteModel::Concrete04.supports_confinement());
        assert!(!ConcreteModel::Concrete01.supports_confinement());
    }
}
