//! Confined core concrete derived from a section design.
//!
//! For every section the unconfined Concrete04 material is upgraded with
//! Mander's model:
//!
//! 1. lateral confining stress ratios `(f1, f2)` of the hoops
//! 2. strength ratio `f'cc/f'co` from the confinement chart
//! 3. confined peak strain `εcc` and secant modulus `Esec = f'cc/εcc`
//! 4. ultimate strain `εcu` from the hoop-fracture energy balance
//!
//! `εcu` is then amplified by `100 / hinge_length_percentage`, the same
//! rescaling applied to the unconfined materials.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confinement::{
    confined_strength_ratio, lateral_confinement, solve_ultimate_strain, HoopFailureInput, HoopSolverSettings,
    LateralConfinement, UltimateStrain,
};
use crate::errors::{ModelError, ModelResult};
use crate::materials::concrete::hinge_strain_scale;
use crate::materials::{ConcreteMaterial, SteelMaterial};
use crate::sections::SectionDesign;
use crate::units::{KiloPascals, MegaPascals};

/// Intermediate values of a confined concrete derivation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfinementDerivation {
    pub confinement: LateralConfinement,
    /// `f'cc / f'co`
    pub strength_ratio: f64,
    /// Transverse steel volume over core volume
    pub rho_s: f64,
    /// Secant modulus at the confined peak
    pub secant_modulus: MegaPascals,
    /// Energy-balance solution, before hinge rescaling
    pub ultimate: UltimateStrain,
}

/// Confined material of one section together with how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfinedConcrete {
    pub material: ConcreteMaterial,
    pub derivation: ConfinementDerivation,
}

/// Derive the confined core material of a section.
///
/// # Arguments
///
/// * `design` - section geometry and reinforcement
/// * `section_id` - tag of the section, used for the material name
/// * `tag` - tag given to the new material
/// * `base` - unconfined Concrete04 material of the section
/// * `steel` - longitudinal and hoop steel; the hoops confine at its yield
///   stress `fy`, not at the ultimate `fu`
/// * `hinge_length_percentage` - plastic hinge length, % of element length
/// * `solver` - hoop-failure search settings
pub fn derive_confined_concrete(
    design: &SectionDesign,
    section_id: u32,
    tag: u32,
    base: &ConcreteMaterial,
    steel: &SteelMaterial,
    hinge_length_percentage: f64,
    solver: &HoopSolverSettings,
) -> ModelResult<ConfinedConcrete> {
    if !base.model.supports_confinement() {
        return Err(ModelError::invalid_input(
            "concrete model",
            base.model.code(),
            "Confined concrete is only derived for Concrete04",
        ));
    }
    steel.validate()?;
    let scale = hinge_strain_scale(hinge_length_percentage)?;

    let confinement = lateral_confinement(design, steel.fy, base.fc)?;
    let strength_ratio = confined_strength_ratio(confinement.f1, confinement.f2)?;

    let fco = MegaPascals(MegaPascals::from(base.fc).0.abs());
    let fcc = fco * strength_ratio;
    let eco = base.peak_strain.abs();
    let ecc = eco * (1.0 + 5.0 * (strength_ratio - 1.0));
    let secant_modulus = MegaPascals(fcc.0 / ecc);
    let ec: MegaPascals = base.ec.into();

    if secant_modulus.0 >= ec.0 {
        return Err(ModelError::calculation_failed(
            "confined concrete",
            format!(
                "secant modulus {:.1} MPa is not below the initial modulus {:.1} MPa",
                secant_modulus.0, ec.0
            ),
        ));
    }

    let s = design.hoops.spacing.0;
    let asx = design.hoops.area_per_direction().0;
    let asy = asx;
    let rho_s = asx / (s * confinement.core_short.0) + asy / (s * confinement.core_long.0);

    let input = HoopFailureInput {
        ec,
        es: steel.e0.into(),
        eco,
        fco,
        fcc,
        esec: secant_modulus,
        rho_s,
        rho_cc: confinement.rho_cc,
    };
    let ultimate = solve_ultimate_strain(&input, solver)?;

    debug!(
        section = section_id,
        kind = %design.kind,
        strength_ratio,
        fcc_mpa = fcc.0,
        ecc,
        ecu = ultimate.strain,
        "confined concrete derived"
    );

    let material = ConcreteMaterial {
        tag,
        name: format!("sectionID_{}_{}", section_id, base.name),
        grade: base.grade,
        model: base.model,
        fc: KiloPascals(-KiloPascals::from(fcc).0),
        peak_strain: -ecc,
        ultimate_strain: -ultimate.strain * scale,
        ec: base.ec,
        confined: true,
    };

    Ok(ConfinedConcrete {
        material,
        derivation: ConfinementDerivation {
            confinement,
            strength_ratio,
            rho_s,
            secant_modulus,
            ultimate,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteGrade, ConcreteModel, SteelGrade};
    use crate::sections::fixtures::beam_design;

    fn base() -> ConcreteMaterial {
        ConcreteMaterial::unconfined(2, ConcreteGrade::Ha25, ConcreteModel::Concrete04, 10.0).unwrap()
    }

    #[test]
    fn test_confined_beam_material() {
        let steel = SteelMaterial::new(1, SteelGrade::A400S);
        let confined =
            derive_confined_concrete(&beam_design(), 1, 102, &base(), &steel, 10.0, &HoopSolverSettings::default())
                .unwrap();

        let m = &confined.material;
        assert_eq!(m.tag, 102);
        assert_eq!(m.name, "sectionID_1_concrete04_HA25");
        assert!(m.confined);
        // Stronger, more ductile than the base material
        assert!(m.fc.0 < -25_000.0);
        assert!(m.fc.0 > -25_000.0 * 1.5);
        assert!(m.peak_strain < -0.0021);
        assert!(m.ultimate_strain < base().ultimate_strain);

        let d = &confined.derivation;
        assert!(d.strength_ratio > 1.0 && d.strength_ratio < 1.5);
        // 10 × unscaled ultimate strain
        assert!((m.ultimate_strain + 10.0 * d.ultimate.strain).abs() < 1e-12);
        assert_eq!(m.ec, base().ec);
    }

    #[test]
    fn test_command_uses_confined_values() {
        let steel = SteelMaterial::new(1, SteelGrade::A400S);
        let confined =
            derive_confined_concrete(&beam_design(), 3, 105, &base(), &steel, 10.0, &HoopSolverSettings::default())
                .unwrap();
        let cmd = confined.material.command();
        assert!(cmd.starts_with("uniaxialMaterial Concrete04 105 -"));
        let fc: f64 = cmd.split_whitespace().nth(3).unwrap().parse().unwrap();
        assert!((fc - confined.material.fc.0).abs() < 1e-6);
    }

    #[test]
    fn test_hoops_confine_at_yield_stress() {
        let steel = SteelMaterial::new(1, SteelGrade::A400S);
        let confined =
            derive_confined_concrete(&beam_design(), 1, 102, &base(), &steel, 10.0, &HoopSolverSettings::default())
                .unwrap();
        let at_fy = lateral_confinement(&beam_design(), steel.fy, base().fc).unwrap();
        let at_fu = lateral_confinement(&beam_design(), steel.fu, base().fc).unwrap();
        assert_eq!(confined.derivation.confinement, at_fy);
        assert!(at_fu.f2 > at_fy.f2);
    }

    #[test]
    fn test_concrete01_not_confined() {
        let steel = SteelMaterial::new(1, SteelGrade::A400S);
        let base01 = ConcreteMaterial::unconfined(2, ConcreteGrade::Ha25, ConcreteModel::Concrete01, 10.0).unwrap();
        let err = derive_confined_concrete(
            &beam_design(),
            1,
            102,
            &base01,
            &steel,
            10.0,
            &HoopSolverSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rotated_section_same_material() {
        let steel = SteelMaterial::new(1, SteelGrade::A400S);
        let settings = HoopSolverSettings::default();
        let a = derive_confined_concrete(&beam_design(), 1, 102, &base(), &steel, 10.0, &settings).unwrap();
        let b = derive_confined_concrete(&beam_design().rotated(), 1, 102, &base(), &steel, 10.0, &settings).unwrap();
        assert!((a.material.fc.0 - b.material.fc.0).abs() < 1e-6);
        assert!((a.material.ultimate_strain - b.material.ultimate_strain).abs() < 1e-12);
    }
}
