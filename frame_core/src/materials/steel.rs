//! Reinforcing steel (Giuffré-Menegotto-Pinto, `Steel02`).
//!
//! Grades follow UNE 36068: weldable ribbed bars A400S and A500S.
//!
//! ```text
//! Ep = (fu - fy) / (eu - fy/E0)      post-yield tangent
//! b  = Ep / E0                       strain-hardening ratio
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::units::KiloPascals;

/// Young's modulus of reinforcing steel
pub const STEEL_MODULUS: KiloPascals = KiloPascals(2.1e8);

/// Recommended transition parameters of the Steel02 model
pub const R0: f64 = 15.0;
pub const CR1: f64 = 0.925;
pub const CR2: f64 = 0.15;

/// Rebar steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    A400S,
    A500S,
}

impl SteelGrade {
    pub const ALL: [SteelGrade; 2] = [SteelGrade::A400S, SteelGrade::A500S];

    pub fn code(&self) -> &'static str {
        match self {
            SteelGrade::A400S => "A400S",
            SteelGrade::A500S => "A500S",
        }
    }

    /// Yield strength
    pub fn fy(&self) -> KiloPascals {
        match self {
            SteelGrade::A400S => KiloPascals(400_000.0),
            SteelGrade::A500S => KiloPascals(500_000.0),
        }
    }

    /// Tensile strength
    pub fn fu(&self) -> KiloPascals {
        match self {
            SteelGrade::A400S => KiloPascals(440_000.0),
            SteelGrade::A500S => KiloPascals(550_000.0),
        }
    }

    /// Strain at maximum stress
    pub fn eu(&self) -> f64 {
        match self {
            SteelGrade::A400S => 0.05,
            SteelGrade::A500S => 0.075,
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SteelGrade {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A400S" | "B400S" => Ok(SteelGrade::A400S),
            "A500S" | "B500S" => Ok(SteelGrade::A500S),
            _ => Err(ModelError::invalid_input("steel grade", s, "Expected A400S or A500S")),
        }
    }
}

/// Steel02 material ready for emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelMaterial {
    pub tag: u32,
    pub name: String,
    pub grade: SteelGrade,
    pub fy: KiloPascals,
    pub fu: KiloPascals,
    pub e0: KiloPascals,
    pub eu: f64,
}

impl SteelMaterial {
    pub fn new(tag: u32, grade: SteelGrade) -> Self {
        SteelMaterial {
            tag,
            name: format!("steel02_{}", grade.code()),
            grade,
            fy: grade.fy(),
            fu: grade.fu(),
            e0: STEEL_MODULUS,
            eu: grade.eu(),
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.e0.0 > 0.0) || !(self.fy.0 > 0.0) {
            return Err(ModelError::invalid_input(
                "steel",
                format!("fy={}, E0={}", self.fy.0, self.e0.0),
                "Yield strength and modulus must be positive",
            ));
        }
        if self.eu <= self.fy.0 / self.e0.0 || self.fu.0 < self.fy.0 {
            return Err(ModelError::invalid_input(
                "steel",
                format!("fu={}, eu={}", self.fu.0, self.eu),
                "Ultimate point must lie beyond yield",
            ));
        }
        Ok(())
    }

    /// Post-yield tangent modulus
    pub fn hardening_modulus(&self) -> KiloPascals {
        KiloPascals((self.fu.0 - self.fy.0) / (self.eu - self.fy.0 / self.e0.0))
    }

    /// Strain-hardening ratio `b`
    pub fn hardening_ratio(&self) -> f64 {
        self.hardening_modulus().0 / self.e0.0
    }

    /// `uniaxialMaterial` statement
    pub fn command(&self) -> String {
        format!(
            "uniaxialMaterial Steel02 {} {} {} {} {} {} {}",
            self.tag,
            self.fy.0,
            self.e0.0,
            self.hardening_ratio(),
            R0,
            CR1,
            CR2
        )
    }
}
