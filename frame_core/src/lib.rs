//! # frame_core - Reinforced-Concrete Pushover Model Generator
//!
//! `frame_core` turns building descriptions (nodes, elements, tributary
//! slab areas) into OpenSees TCL scripts for nonlinear static pushover
//! analysis of reinforced-concrete frames. Member sections are fiber
//! sections whose core concrete is confined following Mander, Priestley &
//! Park (1988). All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All records implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Derived once**: Materials and sections are built once per building
//!   and shared read-only by every analysis direction
//!
//! ## Quick Start
//!
//! ```rust
//! use frame_core::confinement::SearchStrategy;
//! use frame_core::sections::{build_catalogs, SectionKind};
//! use frame_core::settings::RunSettings;
//!
//! let mut settings = RunSettings::default();
//! settings.solver.strategy = SearchStrategy::Bisection { tolerance: 1e-7 };
//!
//! let (materials, sections) = build_catalogs(4, &settings).unwrap();
//! let beam = sections.get(SectionKind::Beam).unwrap();
//! let derivation = beam.derivation.as_ref().unwrap();
//! assert!(derivation.strength_ratio > 1.0);
//! println!("{}", materials.get(beam.core.tag).unwrap().command());
//! ```
//!
//! ## Modules
//!
//! - [`confinement`] - Confinement effectiveness, strength chart, hoop-failure strain
//! - [`materials`] - Concrete and steel materials and the per-building catalog
//! - [`sections`] - Section designs, fiber discretization, section schedule
//! - [`model`] - Building import, diaphragms, masses, SDOF properties
//! - [`script`] - TCL script writer
//! - [`batch`] - Batch driver over building files
//! - [`settings`] - Run settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic writes and locked appends

pub mod batch;
pub mod confinement;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod model;
pub mod script;
pub mod sections;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use batch::{BatchReport, BatchRunner, PreparedBuilding, SummaryRecord};
pub use errors::{ModelError, ModelResult};
pub use file_io::{load_building, load_settings, save_settings, write_script, SummaryLog};
pub use model::{BuildingInput, Direction, StructuralModel};
pub use settings::RunSettings;
