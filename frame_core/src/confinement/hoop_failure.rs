//! Ultimate confined strain at first hoop fracture.
//!
//! Mander's energy balance: the strain energy capacity of the transverse
//! steel equals the energy absorbed by the confined concrete plus the energy
//! needed to hold the longitudinal steel in compression, less the energy
//! the unconfined concrete could absorb on its own:
//!
//! ```text
//! 110·ρs = ∫₀^εcu fc(ε) dε + ρcc·∫₀^εcu E0·ε dε - 0.017·√f'co        [MJ/m³, MPa]
//!
//! fc(ε) = f'cc·x·r / (r - 1 + x^r),  x = ε/εcc,  r = Ec / (Ec - Esec)
//! εcc   = |εco|·(1 + 5·(f'cc/f'co - 1))
//! ```
//!
//! The residual `error(εcu)` (left side moved to the right) is negative at
//! zero strain and grows monotonically, so the root is found by a forward
//! scan over a fixed strain grid, optionally refined by bisection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult};
use crate::units::MegaPascals;

const SOLVER_NAME: &str = "hoop failure strain search";

/// Everything the energy balance needs, in MPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoopFailureInput {
    /// Initial modulus of the concrete
    pub ec: MegaPascals,
    /// Modulus of the longitudinal steel
    pub es: MegaPascals,
    /// Unconfined strain at peak stress (sign ignored)
    pub eco: f64,
    /// Unconfined strength (sign ignored)
    pub fco: MegaPascals,
    /// Confined strength (sign ignored)
    pub fcc: MegaPascals,
    /// Secant modulus at confined peak
    pub esec: MegaPascals,
    /// Transverse steel volume over core volume
    pub rho_s: f64,
    /// Longitudinal steel area over core area
    pub rho_cc: f64,
}

impl HoopFailureInput {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.ec.0 > 0.0) {
            return Err(ModelError::invalid_input("ec", self.ec.0.to_string(), "Concrete modulus must be positive"));
        }
        if !(self.es.0 >= 0.0) {
            return Err(ModelError::invalid_input("es", self.es.0.to_string(), "Steel modulus cannot be negative"));
        }
        if !(self.fco.0.abs() > 0.0) || !(self.fcc.0.abs() > 0.0) {
            return Err(ModelError::invalid_input(
                "fco, fcc",
                format!("{}, {}", self.fco.0, self.fcc.0),
                "Concrete strengths must be non-zero",
            ));
        }
        if !(self.eco.abs() > 0.0) {
            return Err(ModelError::invalid_input("eco", self.eco.to_string(), "Peak strain must be non-zero"));
        }
        if !(self.esec.0 > 0.0) || self.esec.0 >= self.ec.0 {
            return Err(ModelError::invalid_input(
                "esec",
                self.esec.0.to_string(),
                format!("Secant modulus must lie in (0, Ec = {})", self.ec.0),
            ));
        }
        if !(self.rho_s >= 0.0) || !(self.rho_cc >= 0.0) {
            return Err(ModelError::invalid_input(
                "rho_s, rho_cc",
                format!("{}, {}", self.rho_s, self.rho_cc),
                "Reinforcement ratios cannot be negative",
            ));
        }
        Ok(())
    }

    /// Strain at confined peak stress, always positive
    pub fn confined_peak_strain(&self) -> f64 {
        self.eco.abs() * (1.0 + 5.0 * (self.fcc.0.abs() / self.fco.0.abs() - 1.0))
    }

    /// Popovics curve exponent
    pub fn popovics_r(&self) -> f64 {
        self.ec.0 / (self.ec.0 - self.esec.0)
    }

    /// Confined concrete stress magnitude at compressive strain `strain`
    pub fn concrete_stress(&self, strain: f64) -> f64 {
        let r = self.popovics_r();
        let x = strain / self.confined_peak_strain();
        self.fcc.0.abs() * x * r / (r - 1.0 + x.powf(r))
    }

    /// Energy the hoops can absorb before fracture, net of the unconfined
    /// concrete's own capacity (MJ/m³)
    pub fn energy_capacity(&self) -> f64 {
        0.017 * self.fco.0.abs().sqrt() + 110.0 * self.rho_s
    }

    fn longitudinal_stress(&self, strain: f64) -> f64 {
        self.es.0 * strain
    }
}

/// How the root of the energy residual is located
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchStrategy {
    /// Fixed-step scan; stops when |residual| stops decreasing and returns
    /// the previous grid strain
    ForwardScan,
    /// Fixed-step scan to bracket the sign change, then bisection on a
    /// trapezoidal residual until the bracket is narrower than `tolerance`
    Bisection { tolerance: f64 },
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::ForwardScan
    }
}

/// Settings of the hoop-failure strain search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoopSolverSettings {
    /// Grid step of the scan and of the numerical integration
    pub step: f64,
    /// Largest strain tried before giving up
    pub max_strain: f64,
    /// Bisection iterations allowed after bracketing
    pub max_iterations: usize,
    /// Largest |residual| (MJ/m³) accepted as converged
    pub residual_tolerance: f64,
    #[serde(default)]
    pub strategy: SearchStrategy,
}

impl Default for HoopSolverSettings {
    fn default() -> Self {
        HoopSolverSettings {
            step: 1e-5,
            max_strain: 0.2,
            max_iterations: 100,
            residual_tolerance: 1e-2,
            strategy: SearchStrategy::ForwardScan,
        }
    }
}

impl HoopSolverSettings {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.step > 0.0) {
            return Err(ModelError::invalid_input("solver.step", self.step.to_string(), "Step must be positive"));
        }
        if !(self.max_strain > self.step) {
            return Err(ModelError::invalid_input(
                "solver.max_strain",
                self.max_strain.to_string(),
                "Strain cap must exceed one step",
            ));
        }
        if !(self.residual_tolerance > 0.0) {
            return Err(ModelError::invalid_input(
                "solver.residual_tolerance",
                self.residual_tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        if let SearchStrategy::Bisection { tolerance } = self.strategy {
            if !(tolerance > 0.0) {
                return Err(ModelError::invalid_input(
                    "solver.strategy.tolerance",
                    tolerance.to_string(),
                    "Tolerance must be positive",
                ));
            }
        }
        Ok(())
    }

    fn max_grid_index(&self) -> usize {
        (self.max_strain / self.step).ceil() as usize
    }
}

/// Solution of the energy balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateStrain {
    /// Ultimate confined strain magnitude (positive)
    pub strain: f64,
    /// Energy residual at `strain` (MJ/m³)
    pub residual: f64,
    /// Scan steps plus bisection iterations used
    pub iterations: usize,
}

/// Energy residual at `ecu` using a left Riemann sum over the grid points
/// `0, step, ..., n·step` with `n = ⌊ecu/step⌋`.
pub fn energy_residual(input: &HoopFailureInput, ecu: f64, step: f64) -> f64 {
    let n = (ecu / step + 1e-9).floor().max(0.0) as usize;
    let (concrete, steel) = (0..=n).fold((0.0, 0.0), |(c, s), k| {
        let strain = k as f64 * step;
        (
            c + input.concrete_stress(strain) * step,
            s + input.longitudinal_stress(strain) * step,
        )
    });
    concrete + input.rho_cc * steel - input.energy_capacity()
}

/// Energy residual at `ecu` using the trapezoidal rule on panels no wider
/// than `step`. Continuous in `ecu`, used by the bisection refinement.
pub fn energy_residual_trapezoid(input: &HoopFailureInput, ecu: f64, step: f64) -> f64 {
    if ecu <= 0.0 {
        return -input.energy_capacity();
    }
    let panels = (ecu / step).ceil().max(1.0) as usize;
    let h = ecu / panels as f64;
    let integrand = |strain: f64| input.concrete_stress(strain) + input.rho_cc * input.longitudinal_stress(strain);
    let interior: f64 = (1..panels).map(|k| integrand(k as f64 * h)).sum();
    let area = h * (0.5 * integrand(0.0) + interior + 0.5 * integrand(ecu));
    area - input.energy_capacity()
}

/// Solve the energy balance for the ultimate confined strain.
///
/// # Returns
///
/// * `Ok(UltimateStrain)` - positive strain magnitude and its residual
/// * `Err(ModelError::NonConvergence)` - strain cap reached, bisection budget
///   exhausted, or the best grid point is not within `residual_tolerance`
pub fn solve_ultimate_strain(
    input: &HoopFailureInput,
    settings: &HoopSolverSettings,
) -> ModelResult<UltimateStrain> {
    input.validate()?;
    settings.validate()?;

    let solution = match settings.strategy {
        SearchStrategy::ForwardScan => forward_scan(input, settings)?,
        SearchStrategy::Bisection { tolerance } => bisection(input, settings, tolerance)?,
    };

    if solution.residual.abs() > settings.residual_tolerance {
        return Err(ModelError::non_convergence(
            SOLVER_NAME,
            solution.iterations,
            solution.strain,
            format!(
                "residual {:.3e} exceeds tolerance {:.3e}",
                solution.residual, settings.residual_tolerance
            ),
        ));
    }

    debug!(
        strain = solution.strain,
        residual = solution.residual,
        iterations = solution.iterations,
        "ultimate confined strain"
    );
    Ok(solution)
}

fn forward_scan(input: &HoopFailureInput, settings: &HoopSolverSettings) -> ModelResult<UltimateStrain> {
    let step = settings.step;
    let capacity = input.energy_capacity();

    let mut concrete = 0.0;
    let mut steel = 0.0;
    let mut prev_strain = 0.0;
    let mut prev_residual = -capacity;

    for n in 1..=settings.max_grid_index() {
        let strain = n as f64 * step;
        concrete += input.concrete_stress(strain) * step;
        steel += input.longitudinal_stress(strain) * step;
        let residual = concrete + input.rho_cc * steel - capacity;

        if residual.abs() >= prev_residual.abs() {
            return Ok(UltimateStrain {
                strain: prev_strain,
                residual: prev_residual,
                iterations: n,
            });
        }
        prev_strain = strain;
        prev_residual = residual;
    }

    Err(ModelError::non_convergence(
        SOLVER_NAME,
        settings.max_grid_index(),
        prev_strain,
        format!("residual still decreasing at the strain cap {}", settings.max_strain),
    ))
}

fn bisection(input: &HoopFailureInput, settings: &HoopSolverSettings, tolerance: f64) -> ModelResult<UltimateStrain> {
    let step = settings.step;
    let capacity = input.energy_capacity();
    let integrand = |strain: f64| input.concrete_stress(strain) + input.rho_cc * input.longitudinal_stress(strain);

    // Bracket the sign change on the grid with a running trapezoid sum
    let mut area = 0.0;
    let mut prev_value = integrand(0.0);
    let mut bracket = None;
    let mut scanned = 0;
    for n in 1..=settings.max_grid_index() {
        scanned = n;
        let strain = n as f64 * step;
        let value = integrand(strain);
        area += 0.5 * (prev_value + value) * step;
        prev_value = value;
        if area - capacity >= 0.0 {
            bracket = Some((strain - step, strain));
            break;
        }
    }

    let (mut lo, mut hi) = bracket.ok_or_else(|| {
        ModelError::non_convergence(
            SOLVER_NAME,
            scanned,
            settings.max_strain,
            "no sign change of the residual below the strain cap",
        )
    })?;

    let mut mid = 0.5 * (lo + hi);
    let mut residual = energy_residual_trapezoid(input, mid, step);
    let mut iterations = 0;
    while hi - lo > tolerance {
        if iterations >= settings.max_iterations {
            return Err(ModelError::non_convergence(
                SOLVER_NAME,
                scanned + iterations,
                mid,
                format!("bracket [{:.6e}, {:.6e}] still wider than {:.1e}", lo, hi, tolerance),
            ));
        }
        iterations += 1;
        if residual < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
        residual = energy_residual_trapezoid(input, mid, step);
    }

    Ok(UltimateStrain {
        strain: mid,
        residual,
        iterations: scanned + iterations,
    })
}
