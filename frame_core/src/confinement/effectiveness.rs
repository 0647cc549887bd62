//! Confinement effectiveness and lateral confining stresses.
//!
//! Mander, Priestley & Park (1988), rectangular hoops:
//!
//! ```text
//! ke  = (1 - Σw²/(6·bc·dc)) · (1 - s'/(2·bc)) · (1 - s'/(2·dc)) / (1 - ρcc)
//! f1x = (Asx / (s·dc)) · fyh · ke
//! f1y = (Asy / (s·bc)) · fyh · ke
//! ```
//!
//! `Asx = Asy = 2·A_hoop` (two legs per direction, same hoops both ways).
//! `Σw²` uses a single interior longitudinal bar centered on the long core
//! side: `w' = bc/2`, `Σw² = 2·(w'/2)²`. Real bar layouts are not summed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult};
use crate::sections::SectionDesign;
use crate::units::{KiloPascals, MegaPascals, Meters};

/// Lateral confinement of a rectangular core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LateralConfinement {
    /// Long side of the confined core (`bc >= dc`)
    pub core_long: Meters,
    /// Short side of the confined core
    pub core_short: Meters,
    /// Longitudinal steel area over core area
    pub rho_cc: f64,
    /// Confinement effectiveness coefficient
    pub ke: f64,
    /// Effective lateral confining stress acting across the short core side
    pub f1x: MegaPascals,
    /// Effective lateral confining stress acting across the long core side
    pub f1y: MegaPascals,
    /// Smaller confining stress ratio `f1/f'co`
    pub f1: f64,
    /// Larger confining stress ratio `f2/f'co` (always `>= f1`)
    pub f2: f64,
}

/// Compute the lateral confining stress ratios of a section.
///
/// `fyh` is the hoop steel stress and `fco` the unconfined concrete
/// strength, both in the model's kPa units. Either sign is accepted for
/// `fco`; only its magnitude matters.
pub fn lateral_confinement(
    design: &SectionDesign,
    fyh: KiloPascals,
    fco: KiloPascals,
) -> ModelResult<LateralConfinement> {
    design.validate()?;

    let fyh: MegaPascals = fyh.into();
    let fco = MegaPascals::from(fco).0.abs();
    if !(fco > 0.0) {
        return Err(ModelError::invalid_input(
            "fco",
            fco.to_string(),
            "Unconfined concrete strength must be non-zero",
        ));
    }
    if !(fyh.0 >= 0.0) {
        return Err(ModelError::invalid_input(
            "fyh",
            fyh.0.to_string(),
            "Hoop steel stress cannot be negative",
        ));
    }

    let (bc, dc) = design.core_dimensions();
    let (bc, dc) = (bc.0, dc.0);
    let core_area = bc * dc;

    let rho_cc = design.total_longitudinal_area().0 / core_area;
    if rho_cc >= 1.0 {
        return Err(ModelError::calculation_failed(
            "confinement effectiveness",
            format!("longitudinal steel ratio {:.4} leaves no concrete in the core", rho_cc),
        ));
    }

    let w = bc / 2.0;
    let sum_w_sq = 2.0 * (w / 2.0).powi(2);

    let s = design.hoops.spacing.0;
    let s_clear = design.hoops.clear_spacing().0;

    let ke = ((1.0 - sum_w_sq / (6.0 * core_area))
        * (1.0 - s_clear / (2.0 * bc))
        * (1.0 - s_clear / (2.0 * dc)))
        / (1.0 - rho_cc);

    let asx = design.hoops.area_per_direction().0;
    let asy = asx;

    let f1x = (asx / (s * dc)) * fyh.0 * ke;
    let f1y = (asy / (s * bc)) * fyh.0 * ke;

    let ratio_x = f1x / fco;
    let ratio_y = f1y / fco;
    let (f1, f2) = if ratio_x >= ratio_y {
        (ratio_y, ratio_x)
    } else {
        (ratio_x, ratio_y)
    };

    if !(f1 >= 0.0) || !f2.is_finite() {
        return Err(ModelError::calculation_failed(
            "confinement effectiveness",
            format!("invalid confining stress ratios f1={}, f2={} (ke={})", f1, f2, ke),
        ));
    }

    debug!(
        kind = %design.kind,
        ke,
        rho_cc,
        f1x = f1x,
        f1y = f1y,
        "lateral confinement"
    );

    Ok(LateralConfinement {
        core_long: Meters(bc),
        core_short: Meters(dc),
        rho_cc,
        ke,
        f1x: MegaPascals(f1x),
        f1y: MegaPascals(f1y),
        f1,
        f2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::fixtures::beam_design;
    use crate::units::SqMeters;
    use approx::assert_relative_eq;

    const FYH: KiloPascals = KiloPascals(400_000.0);
    const FCO: KiloPascals = KiloPascals(25_000.0);

    #[test]
    fn test_beam_confinement_values() {
        let lc = lateral_confinement(&beam_design(), FYH, FCO).unwrap();

        // ρcc = 9·201.06e-6 / (0.44·0.24) = 0.01714
        assert_relative_eq!(lc.rho_cc, 0.01714, max_relative = 1e-3);
        // ke = 0.9618·0.8364·0.7000 / 0.98286 ≈ 0.573
        assert_relative_eq!(lc.ke, 0.573, max_relative = 2e-3);
        assert!(lc.f2 >= lc.f1);
        assert!(lc.f1 > 0.0);
        // f1x across the 0.24 m side is the larger stress
        assert!(lc.f1x.0 > lc.f1y.0);
    }

    #[test]
    fn test_ordering_independent_of_orientation() {
        let design = beam_design();
        let a = lateral_confinement(&design, FYH, FCO).unwrap();
        let b = lateral_confinement(&design.rotated(), FYH, FCO).unwrap();
        assert_relative_eq!(a.f1, b.f1, max_relative = 1e-12);
        assert_relative_eq!(a.f2, b.f2, max_relative = 1e-12);
        assert!(b.f2 >= b.f1);
    }

    #[test]
    fn test_sign_of_strength_ignored() {
        let a = lateral_confinement(&beam_design(), FYH, FCO).unwrap();
        let b = lateral_confinement(&beam_design(), FYH, KiloPascals(-25_000.0)).unwrap();
        assert_eq!(a.f1, b.f1);
        assert_eq!(a.f2, b.f2);
    }

    #[test]
    fn test_no_hoops_gives_zero_confinement() {
        let mut design = beam_design();
        design.hoops.bar_area = SqMeters(0.0);
        let lc = lateral_confinement(&design, FYH, FCO).unwrap();
        assert_eq!(lc.f1, 0.0);
        assert_eq!(lc.f2, 0.0);
    }

    #[test]
    fn test_zero_strength_rejected() {
        assert!(lateral_confinement(&beam_design(), FYH, KiloPascals(0.0)).is_err());
    }

    #[test]
    fn test_core_full_of_steel_rejected() {
        let mut design = beam_design();
        design.layers[0].bar_area = SqMeters(0.05);
        let err = lateral_confinement(&design, FYH, FCO).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
    }
}
