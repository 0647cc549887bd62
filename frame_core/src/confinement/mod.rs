//! # Confined Concrete (Mander, Priestley & Park 1988)
//!
//! Numerical core of the material derivation:
//!
//! - [`bars`]: bar diameter ↔ area
//! - [`effectiveness`]: confinement effectiveness `ke` and the lateral
//!   confining stress ratios `(f1, f2)` of a rectangular hoop-confined core
//! - [`chart`]: confined strength ratio `f'cc/f'co` from `(f1, f2)`
//! - [`hoop_failure`]: ultimate strain at first hoop fracture
//!
//! Every formula here is in MPa; values enter as kPa and are converted at
//! the function boundary.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::confinement::{confined_strength_ratio, lateral_confinement};
//! use frame_core::sections::default_design;
//! use frame_core::sections::SectionKind;
//! use frame_core::units::KiloPascals;
//!
//! let design = default_design(SectionKind::Beam, 3);
//! let lc = lateral_confinement(&design, KiloPascals(400_000.0), KiloPascals(-25_000.0)).unwrap();
//! let ratio = confined_strength_ratio(lc.f1, lc.f2).unwrap();
//! assert!(ratio > 1.0 && ratio < 1.5);
//! ```

pub mod bars;
pub mod chart;
pub mod effectiveness;
pub mod hoop_failure;

pub use bars::{bar_area, bar_area_mm, bar_diameter};
pub use chart::confined_strength_ratio;
pub use effectiveness::{lateral_confinement, LateralConfinement};
pub use hoop_failure::{
    energy_residual, energy_residual_trapezoid, solve_ultimate_strain, HoopFailureInput, HoopSolverSettings,
    SearchStrategy, UltimateStrain,
};
