//! Confined strength ratio from the biaxial confinement chart.
//!
//! The classical Mander chart (confined strength ratio against the two
//! lateral confining stress ratios) is reproduced analytically in chart
//! drawing coordinates:
//!
//! 1. the smaller ratio `f1` is mapped to a vertical coordinate
//!    `y0 = Y_SCALE·f1` and intersected with a calibrated circular arc,
//!    giving the reference abscissa `x0`;
//! 2. a logarithmic curve `x = ln(t) + x0`, `y = y0 - (t - 1)` anchored at
//!    `(x0, y0)` is intersected with `y = Y_SCALE·f2`;
//! 3. the abscissa of that intersection times `X_SCALE` is the ratio
//!    `f'cc / f'co`.
//!
//! The fit is only meaningful inside the chart's domain (ratios up to 0.3);
//! larger values extrapolate.

use crate::errors::{ModelError, ModelResult};

/// Chart units per unit of strength ratio on the horizontal axis
const X_SCALE: f64 = 1.0 / 10.0;

/// Chart units per unit of confining stress ratio on the vertical axis
const Y_SCALE: f64 = -14.75 / 0.30;

const ARC_CENTER_X: f64 = -15.20;
const ARC_CENTER_Y: f64 = -34.63;
const ARC_RADIUS: f64 = 42.82;

/// Confined-to-unconfined strength ratio for the confining stress ratios
/// `f1 <= f2`.
///
/// The result is floored at 1.0: the calibrated arc passes marginally left of
/// the unit abscissa at zero confinement, and confinement never weakens
/// concrete.
pub fn confined_strength_ratio(f1: f64, f2: f64) -> ModelResult<f64> {
    if !(f1 >= 0.0) || !(f2 >= f1) || !f2.is_finite() {
        return Err(ModelError::invalid_input(
            "f1, f2",
            format!("{}, {}", f1, f2),
            "Confining stress ratios must satisfy 0 <= f1 <= f2",
        ));
    }

    let y0 = Y_SCALE * f1;
    let dy = y0 - ARC_CENTER_Y;
    let radicand = ARC_RADIUS.powi(2) - dy.powi(2);
    if radicand < 0.0 {
        return Err(ModelError::calculation_failed(
            "confined strength chart",
            format!("f1 = {:.4} lies outside the chart", f1),
        ));
    }
    let x0 = radicand.sqrt() + ARC_CENTER_X;

    let y = Y_SCALE * f2;
    let x = (y0 - y + 1.0).ln() + x0;

    Ok((x * X_SCALE).max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unconfined_is_unity() {
        assert_eq!(confined_strength_ratio(0.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_light_confinement() {
        // Beam 0.30×0.50 with Ø6 hoops @ 0.15
        let ratio = confined_strength_ratio(0.00864, 0.01584).unwrap();
        assert_relative_eq!(ratio, 1.086, max_relative = 2e-3);
    }

    #[test]
    fn test_chart_reference_points() {
        // Equal confinement 0.1 → about 1.6 on the Mander chart
        let ratio = confined_strength_ratio(0.1, 0.1).unwrap();
        assert!(ratio > 1.5 && ratio < 1.7, "ratio = {}", ratio);

        // Equal confinement 0.3 → about 2.3
        let ratio = confined_strength_ratio(0.3, 0.3).unwrap();
        assert!(ratio > 2.1 && ratio < 2.5, "ratio = {}", ratio);
    }

    #[test]
    fn test_never_below_one() {
        for f1 in [0.0, 1e-4, 0.001, 0.01, 0.05, 0.1, 0.2, 0.3] {
            for extra in [0.0, 0.01, 0.05, 0.1] {
                let ratio = confined_strength_ratio(f1, f1 + extra).unwrap();
                assert!(ratio >= 1.0);
            }
        }
    }

    #[test]
    fn test_monotonic_in_f2() {
        let a = confined_strength_ratio(0.05, 0.05).unwrap();
        let b = confined_strength_ratio(0.05, 0.10).unwrap();
        let c = confined_strength_ratio(0.05, 0.20).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_deterministic() {
        let a = confined_strength_ratio(0.03, 0.07).unwrap();
        let b = confined_strength_ratio(0.03, 0.07).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unordered_ratios_rejected() {
        assert!(confined_strength_ratio(0.2, 0.1).is_err());
        assert!(confined_strength_ratio(-0.1, 0.1).is_err());
        assert!(confined_strength_ratio(f64::NAN, 0.1).is_err());
    }
}
