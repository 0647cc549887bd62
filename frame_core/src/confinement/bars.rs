//! Round bar geometry.
//!
//! Reinforcing bars are specified by nominal diameter; every ratio in the
//! confinement model works on areas.

use std::f64::consts::PI;

use crate::units::{Meters, Millimeters, SqMeters};

/// Cross-sectional area of a round bar of the given diameter.
pub fn bar_area(diameter: Meters) -> SqMeters {
    SqMeters(PI * (diameter.0 / 2.0).powi(2))
}

/// Cross-sectional area of a bar given its nominal diameter in millimeters
/// (Ø16 → `bar_area_mm(Millimeters(16.0))`).
pub fn bar_area_mm(diameter: Millimeters) -> SqMeters {
    bar_area(diameter.into())
}

/// Diameter of the round bar having the given area.
pub fn bar_diameter(area: SqMeters) -> Meters {
    Meters(2.0 * (area.0 / PI).sqrt())
}
