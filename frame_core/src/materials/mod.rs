//! # Materials
//!
//! Uniaxial materials of the fiber sections: concrete (unconfined and
//! confined core) and reinforcing steel.
//!
//! ## Tags
//!
//! Base materials are numbered consecutively from 1 in catalog order
//! (steel first, then concrete). Confined materials derived per section
//! start at `base_count + 100` so they can never collide with a base tag.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::materials::MaterialCatalog;
//! use frame_core::settings::MaterialSelection;
//!
//! let catalog = MaterialCatalog::new(&MaterialSelection::default(), 10.0).unwrap();
//! assert_eq!(catalog.steel().tag, 1);
//! assert_eq!(catalog.concrete().tag, 2);
//! assert_eq!(catalog.next_confined_tag(), 102);
//! ```

pub mod concrete;
pub mod confined;
pub mod steel;

pub use concrete::{ConcreteGrade, ConcreteMaterial, ConcreteModel};
pub use confined::{derive_confined_concrete, ConfinedConcrete, ConfinementDerivation};
pub use steel::{SteelGrade, SteelMaterial};

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::settings::MaterialSelection;

/// Any material of the catalog
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Steel", "tag": 1, "name": "steel02_A400S", ... }
/// { "type": "Concrete", "tag": 2, "name": "concrete04_HA175", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Concrete(ConcreteMaterial),
    Steel(SteelMaterial),
}

impl Material {
    pub fn tag(&self) -> u32 {
        match self {
            Material::Concrete(m) => m.tag,
            Material::Steel(m) => m.tag,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Material::Concrete(m) => &m.name,
            Material::Steel(m) => &m.name,
        }
    }

    /// `uniaxialMaterial` statement
    pub fn command(&self) -> String {
        match self {
            Material::Concrete(m) => m.command(),
            Material::Steel(m) => m.command(),
        }
    }
}

/// Offset between the last base tag and the first confined tag
pub const CONFINED_TAG_OFFSET: u32 = 100;

/// Ordered, tag-unique set of materials for one building.
///
/// Built once per building, then only read by the section builder and the
/// script writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    steel: SteelMaterial,
    concrete: ConcreteMaterial,
    confined: Vec<ConcreteMaterial>,
}

impl MaterialCatalog {
    /// Base materials (rebar steel and unconfined concrete) for a selection
    pub fn new(selection: &MaterialSelection, hinge_length_percentage: f64) -> ModelResult<Self> {
        let steel = SteelMaterial::new(1, selection.steel);
        steel.validate()?;
        let concrete = ConcreteMaterial::unconfined(
            2,
            selection.concrete,
            selection.concrete_model,
            hinge_length_percentage,
        )?;
        Ok(MaterialCatalog {
            steel,
            concrete,
            confined: Vec::new(),
        })
    }

    /// Number of base (non-derived) materials
    pub fn base_count(&self) -> usize {
        2
    }

    /// Tag the next confined material would receive
    pub fn next_confined_tag(&self) -> u32 {
        self.base_count() as u32 + CONFINED_TAG_OFFSET + self.confined.len() as u32
    }

    /// Rebar steel of the catalog
    pub fn steel(&self) -> &SteelMaterial {
        &self.steel
    }

    /// Unconfined concrete of the catalog
    pub fn concrete(&self) -> &ConcreteMaterial {
        &self.concrete
    }

    /// Derived confined materials, in tag order
    pub fn confined(&self) -> &[ConcreteMaterial] {
        &self.confined
    }

    /// Add a derived confined material. Its tag must be `next_confined_tag()`.
    pub fn push_confined(&mut self, material: ConcreteMaterial) -> ModelResult<()> {
        let expected = self.next_confined_tag();
        if material.tag != expected || !material.confined {
            return Err(ModelError::invalid_input(
                "material.tag",
                material.tag.to_string(),
                format!("Expected a confined material with tag {}", expected),
            ));
        }
        self.confined.push(material);
        Ok(())
    }

    /// Every material in emission order
    pub fn materials(&self) -> Vec<Material> {
        let mut all = vec![Material::Steel(self.steel.clone()), Material::Concrete(self.concrete.clone())];
        all.extend(self.confined.iter().cloned().map(Material::Concrete));
        all
    }

    pub fn get(&self, tag: u32) -> Option<Material> {
        self.materials().into_iter().find(|m| m.tag() == tag)
    }

    pub fn by_name(&self, name: &str) -> ModelResult<Material> {
        self.materials()
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| ModelError::material_not_found(name))
    }

    pub fn len(&self) -> usize {
        self.base_count() + self.confined.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_catalog() {
        let catalog = MaterialCatalog::new(&MaterialSelection::default(), 10.0).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.base_count(), 2);
        assert_eq!(catalog.steel().name, "steel02_A400S");
        assert_eq!(catalog.concrete().name, "concrete04_HA175");
        assert_eq!(catalog.get(2).map(|m| m.name().to_string()), Some("concrete04_HA175".to_string()));
        assert!(catalog.by_name("concrete01_HA25").is_err());
    }

    #[test]
    fn test_confined_tags_follow_offset() {
        let mut catalog = MaterialCatalog::new(&MaterialSelection::default(), 10.0).unwrap();
        let mut confined = catalog.concrete().clone();
        confined.confined = true;

        confined.tag = 102;
        confined.name = "sectionID_1_concrete04_HA175".to_string();
        catalog.push_confined(confined.clone()).unwrap();
        assert_eq!(catalog.next_confined_tag(), 103);

        // Out-of-sequence tag rejected
        confined.tag = 110;
        assert!(catalog.push_confined(confined).is_err());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_material_serialization() {
        let catalog = MaterialCatalog::new(&MaterialSelection::default(), 10.0).unwrap();
        let json = serde_json::to_string(&catalog.get(1).unwrap()).unwrap();
        assert!(json.contains("\"type\":\"Steel\""));
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tag(), 1);
    }

    #[test]
    fn test_invalid_hinge_percentage() {
        assert!(MaterialCatalog::new(&MaterialSelection::default(), 0.0).is_err());
    }
}
