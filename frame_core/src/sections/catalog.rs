//! Section schedule and per-building catalogs.
//!
//! Member sizes grow with building height:
//!
//! | Storeys | Beam        | Auxiliary beam | Column      |
//! |---------|-------------|----------------|-------------|
//! | ≤ 4     | 0.30 × 0.50 | 0.30 × 0.30    | 0.30 × 0.30 |
//! | ≤ 8     | 0.36 × 0.50 | 0.36 × 0.36    | 0.36 × 0.36 |
//! | > 8     | 0.40 × 0.50 | 0.40 × 0.40    | 0.40 × 0.40 |
//!
//! Reinforcement is the same for every height: cover 0.03 m and Ø6 hoops
//! every 0.15 m.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ModelError, ModelResult};
use crate::materials::MaterialCatalog;
use crate::sections::design::{HoopScheme, LayerPosition, PatchScheme, RebarLayer, SectionDesign, SectionKind};
use crate::sections::Section;
use crate::settings::RunSettings;
use crate::units::{Meters, Millimeters};

/// Concrete cover of every default section
pub const DEFAULT_COVER: Meters = Meters(0.03);

/// Section `(width, height)` of a member family for a building height
pub fn section_dimensions(kind: SectionKind, storeys: u32) -> (Meters, Meters) {
    let side = match storeys {
        0..=4 => 0.30,
        5..=8 => 0.36,
        _ => 0.40,
    };
    match kind {
        SectionKind::Beam => (Meters(side), Meters(0.50)),
        SectionKind::AuxBeam | SectionKind::Column => (Meters(side), Meters(side)),
    }
}

/// Default design of a member family for a building height
pub fn default_design(kind: SectionKind, storeys: u32) -> SectionDesign {
    let (width, height) = section_dimensions(kind, storeys);
    let layer = |bars, diameter, position| RebarLayer::new(bars, Millimeters(diameter), DEFAULT_COVER, position);

    let (layers, patches) = match kind {
        SectionKind::Beam => (
            vec![
                layer(4, 16.0, LayerPosition::Top),
                layer(2, 12.0, LayerPosition::Middle),
                layer(5, 16.0, LayerPosition::Bottom),
            ],
            PatchScheme {
                divisions_y: 4,
                divisions_z: 6,
                multiplier: 3,
            },
        ),
        SectionKind::AuxBeam => (
            vec![
                layer(3, 12.0, LayerPosition::Top),
                layer(2, 12.0, LayerPosition::Middle),
                layer(3, 12.0, LayerPosition::Bottom),
            ],
            PatchScheme::default(),
        ),
        SectionKind::Column => (
            vec![
                layer(4, 16.0, LayerPosition::Top),
                layer(4, 16.0, LayerPosition::Bottom),
                layer(2, 16.0, LayerPosition::Left),
                layer(2, 16.0, LayerPosition::Right),
            ],
            PatchScheme::default(),
        ),
    };

    SectionDesign {
        kind,
        width,
        height,
        layers,
        hoops: HoopScheme::new(Millimeters(6.0), Meters(0.15)),
        patches,
    }
}

/// Sections of one building, one per member family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCatalog {
    sections: Vec<Section>,
}

impl SectionCatalog {
    /// Build a section for every design, tagged 1, 2, ... in order. Confined
    /// materials derived along the way are added to `materials`.
    pub fn build(
        designs: &[SectionDesign],
        materials: &mut MaterialCatalog,
        settings: &RunSettings,
    ) -> ModelResult<Self> {
        let mut sections: Vec<Section> = Vec::with_capacity(designs.len());
        for (i, design) in designs.iter().enumerate() {
            if sections.iter().any(|s| s.design.kind == design.kind) {
                return Err(ModelError::invalid_input(
                    "sections",
                    design.kind.code(),
                    "Only one section per member family is supported",
                ));
            }
            let section = Section::build(i as u32 + 1, design, materials, settings)?;
            sections.push(section);
        }
        Ok(SectionCatalog { sections })
    }

    /// Section assigned to a member family
    pub fn get(&self, kind: SectionKind) -> ModelResult<&Section> {
        self.sections
            .iter()
            .find(|s| s.design.kind == kind)
            .ok_or_else(|| ModelError::missing_field(format!("section for {}", kind)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Material and section catalogs for a building with `storeys` storeys.
///
/// Both are built once and then shared read-only by every analysis
/// direction of the building.
pub fn build_catalogs(storeys: u32, settings: &RunSettings) -> ModelResult<(MaterialCatalog, SectionCatalog)> {
    if storeys == 0 {
        return Err(ModelError::invalid_input("storeys", "0", "A building needs at least one storey"));
    }
    settings.validate()?;

    let mut materials = MaterialCatalog::new(&settings.materials, settings.hinge_length_percentage)?;
    let designs: Vec<SectionDesign> = SectionKind::ALL.iter().map(|k| default_design(*k, storeys)).collect();
    let sections = SectionCatalog::build(&designs, &mut materials, settings)?;

    debug!(
        storeys,
        materials = materials.len(),
        sections = sections.len(),
        "catalogs built"
    );
    Ok((materials, sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::ConcreteModel;

    #[test]
    fn test_schedule_by_height() {
        assert_eq!(section_dimensions(SectionKind::Beam, 3), (Meters(0.30), Meters(0.50)));
        assert_eq!(section_dimensions(SectionKind::Column, 4), (Meters(0.30), Meters(0.30)));
        assert_eq!(section_dimensions(SectionKind::Column, 5), (Meters(0.36), Meters(0.36)));
        assert_eq!(section_dimensions(SectionKind::AuxBeam, 8), (Meters(0.36), Meters(0.36)));
        assert_eq!(section_dimensions(SectionKind::Beam, 12), (Meters(0.40), Meters(0.50)));
    }

    #[test]
    fn test_default_designs_valid() {
        for storeys in [1, 6, 10] {
            for kind in SectionKind::ALL {
                assert!(default_design(kind, storeys).validate().is_ok(), "{} / {}", kind, storeys);
            }
        }
    }

    #[test]
    fn test_build_catalogs() {
        let (materials, sections) = build_catalogs(3, &RunSettings::default()).unwrap();
        assert_eq!(sections.len(), 3);
        // Steel, concrete, and one confined concrete per section
        assert_eq!(materials.len(), 5);
        let tags: Vec<u32> = materials.confined().iter().map(|m| m.tag).collect();
        assert_eq!(tags, vec![102, 103, 104]);

        let beam = sections.get(SectionKind::Beam).unwrap();
        assert_eq!(beam.tag, 1);
        assert_eq!(beam.core.tag, 102);
        assert_eq!(beam.core.name, "sectionID_1_concrete04_HA175");
        assert_eq!(sections.get(SectionKind::Column).unwrap().tag, 3);
    }

    #[test]
    fn test_concrete01_uses_unconfined_core() {
        let mut settings = RunSettings::default();
        settings.materials.concrete_model = ConcreteModel::Concrete01;
        let (materials, sections) = build_catalogs(3, &settings).unwrap();
        assert_eq!(materials.len(), 2);
        for section in sections.iter() {
            assert_eq!(section.core.tag, 2);
            assert!(section.derivation.is_none());
        }
    }

    #[test]
    fn test_zero_storeys_rejected() {
        assert!(build_catalogs(0, &RunSettings::default()).is_err());
    }

    #[test]
    fn test_duplicate_family_rejected() {
        let settings = RunSettings::default();
        let mut materials = MaterialCatalog::new(&settings.materials, 10.0).unwrap();
        let designs = vec![default_design(SectionKind::Beam, 2), default_design(SectionKind::Beam, 2)];
        assert!(SectionCatalog::build(&designs, &mut materials, &settings).is_err());
    }
}
