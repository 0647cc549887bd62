//! # Sections
//!
//! Rectangular reinforced-concrete sections and their fiber models.
//!
//! A [`Section`] ties a [`SectionDesign`] to its materials: the unconfined
//! cover concrete, the reinforcing steel and the core concrete. With a
//! Concrete04 base material the core is a confined material derived once,
//! when the section is built, and added to the material catalog.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::sections::{build_catalogs, SectionKind};
//! use frame_core::settings::RunSettings;
//!
//! let (materials, sections) = build_catalogs(3, &RunSettings::default()).unwrap();
//! let column = sections.get(SectionKind::Column).unwrap();
//! assert!(column.core.confined);
//! assert!(materials.get(column.core.tag).is_some());
//! ```

pub mod catalog;
pub mod design;
pub mod fiber;

pub use catalog::{build_catalogs, default_design, section_dimensions, SectionCatalog, DEFAULT_COVER};
pub use design::{HoopScheme, LayerPosition, PatchScheme, RebarLayer, SectionDesign, SectionKind};
pub use fiber::{Fiber, FiberMaterials, FiberSection, Patch, SectionPoint, StraightLayer};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ModelResult;
use crate::materials::{derive_confined_concrete, ConcreteMaterial, ConfinementDerivation, MaterialCatalog, SteelMaterial};
use crate::settings::RunSettings;

/// A built section: design, materials and fiber model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub tag: u32,
    pub design: SectionDesign,
    /// Cover concrete
    pub concrete: ConcreteMaterial,
    /// Core concrete; confined for Concrete04, the cover material otherwise
    pub core: ConcreteMaterial,
    pub steel: SteelMaterial,
    /// Present when the core material was derived
    pub derivation: Option<ConfinementDerivation>,
    pub fiber: FiberSection,
}

impl Section {
    /// Build section `tag`, deriving its confined core when the catalog's
    /// concrete model supports it.
    pub fn build(
        tag: u32,
        design: &SectionDesign,
        materials: &mut MaterialCatalog,
        settings: &RunSettings,
    ) -> ModelResult<Self> {
        design.validate()?;

        let concrete = materials.concrete().clone();
        let steel = materials.steel().clone();

        let (core, derivation) = if concrete.model.supports_confinement() {
            let confined = derive_confined_concrete(
                design,
                tag,
                materials.next_confined_tag(),
                &concrete,
                &steel,
                settings.hinge_length_percentage,
                &settings.solver,
            )?;
            materials.push_confined(confined.material.clone())?;
            (confined.material, Some(confined.derivation))
        } else {
            (concrete.clone(), None)
        };

        let gj = concrete.shear_modulus().0 * design.torsion_constant();
        let fiber = FiberSection::build(
            tag,
            design,
            FiberMaterials {
                core: core.tag,
                cover: concrete.tag,
                steel: steel.tag,
            },
            gj,
        )?;

        debug!(tag, kind = %design.kind, core = core.tag, gj, "section built");

        Ok(Section {
            tag,
            design: design.clone(),
            concrete,
            core,
            steel,
            derivation,
            fiber,
        })
    }

    pub fn kind(&self) -> SectionKind {
        self.design.kind
    }

    /// `section Fiber` block
    pub fn command(&self) -> String {
        self.fiber.command()
    }
}
