//! Fiber discretization of a rectangular section.
//!
//! Local axes: `y` horizontal, `z` vertical, origin at the centroid. The
//! confined core is one quadrilateral patch; the cover is four patches
//! (top and bottom over the full width, left and right between them so
//! corners are not meshed twice). Longitudinal bars become straight layers,
//! except a single side bar which becomes a discrete fiber at mid-height.

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::sections::design::{LayerPosition, RebarLayer, SectionDesign};
use crate::units::SqMeters;

/// Point in local section coordinates (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionPoint {
    pub y: f64,
    pub z: f64,
}

impl SectionPoint {
    pub fn new(y: f64, z: f64) -> Self {
        SectionPoint { y, z }
    }
}

/// Quadrilateral patch, corners counter-clockwise from bottom-left (I, J, K, L)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub material: u32,
    pub divisions_ij: u32,
    pub divisions_jk: u32,
    pub corners: [SectionPoint; 4],
}

impl Patch {
    /// `patch quad` statement
    pub fn command(&self) -> String {
        let mut cmd = format!("patch quad {} {} {}", self.material, self.divisions_ij, self.divisions_jk);
        for p in &self.corners {
            cmd.push_str(&format!(" {} {}", p.y, p.z));
        }
        cmd
    }

    pub fn area(&self) -> f64 {
        // Shoelace
        let c = &self.corners;
        let twice: f64 = (0..4)
            .map(|i| {
                let (a, b) = (c[i], c[(i + 1) % 4]);
                a.y * b.z - b.y * a.z
            })
            .sum();
        twice.abs() / 2.0
    }
}

/// Evenly spaced bars between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightLayer {
    pub material: u32,
    pub bars: u32,
    pub bar_area: SqMeters,
    pub start: SectionPoint,
    pub end: SectionPoint,
}

impl StraightLayer {
    /// `layer straight` statement
    pub fn command(&self) -> String {
        format!(
            "layer straight {} {} {} {} {} {} {}",
            self.material, self.bars, self.bar_area.0, self.start.y, self.start.z, self.end.y, self.end.z
        )
    }
}

/// Single bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    pub material: u32,
    pub area: SqMeters,
    pub location: SectionPoint,
}

impl Fiber {
    /// `fiber` statement
    pub fn command(&self) -> String {
        format!("fiber {} {} {} {}", self.location.y, self.location.z, self.area.0, self.material)
    }
}

/// Material tags a fiber section is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiberMaterials {
    pub core: u32,
    pub cover: u32,
    pub steel: u32,
}

/// Complete fiber section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberSection {
    pub tag: u32,
    /// Label written as a comment above the section
    pub label: String,
    /// Torsional stiffness `G·J` (kN·m²)
    pub torsional_stiffness: f64,
    pub patches: Vec<Patch>,
    pub layers: Vec<StraightLayer>,
    pub fibers: Vec<Fiber>,
}

impl FiberSection {
    /// Discretize `design` with the given material tags.
    pub fn build(
        tag: u32,
        design: &SectionDesign,
        materials: FiberMaterials,
        torsional_stiffness: f64,
    ) -> ModelResult<Self> {
        design.validate()?;

        let hw = design.width.0 / 2.0;
        let hh = design.height.0 / 2.0;
        let c = design.cover().0;
        let p = design.patches;
        let m = p.multiplier;

        let rect = |y0: f64, z0: f64, y1: f64, z1: f64| {
            [
                SectionPoint::new(y0, z0),
                SectionPoint::new(y1, z0),
                SectionPoint::new(y1, z1),
                SectionPoint::new(y0, z1),
            ]
        };

        let core = Patch {
            material: materials.core,
            divisions_ij: p.divisions_y * m,
            divisions_jk: p.divisions_z * m,
            corners: rect(-hw + c, -hh + c, hw - c, hh - c),
        };
        let top = Patch {
            material: materials.cover,
            divisions_ij: p.divisions_y * m,
            divisions_jk: m,
            corners: rect(-hw, hh - c, hw, hh),
        };
        let bottom = Patch {
            material: materials.cover,
            divisions_ij: p.divisions_y * m,
            divisions_jk: m,
            corners: rect(-hw, -hh, hw, -hh + c),
        };
        let right = Patch {
            material: materials.cover,
            divisions_ij: m,
            divisions_jk: p.divisions_z * m,
            corners: rect(hw - c, -hh + c, hw, hh - c),
        };
        let left = Patch {
            material: materials.cover,
            divisions_ij: m,
            divisions_jk: p.divisions_z * m,
            corners: rect(-hw, -hh + c, -hw + c, hh - c),
        };

        let mut layers = Vec::new();
        let mut fibers = Vec::new();
        for layer in &design.layers {
            match bar_placement(design, layer, materials.steel)? {
                Placement::Layer(l) => layers.push(l),
                Placement::Fiber(f) => fibers.push(f),
            }
        }

        Ok(FiberSection {
            tag,
            label: design.kind.code().to_string(),
            torsional_stiffness,
            patches: vec![core, top, bottom, right, left],
            layers,
            fibers,
        })
    }

    /// `section Fiber` block
    pub fn command(&self) -> String {
        let mut out = format!("\n# {}\n", self.label);
        out.push_str(&format!("section Fiber {} -GJ {} {{\n", self.tag, self.torsional_stiffness));
        for patch in &self.patches {
            out.push_str(&patch.command());
            out.push('\n');
        }
        out.push('\n');
        for layer in &self.layers {
            out.push_str(&layer.command());
            out.push('\n');
        }
        out.push('\n');
        for fiber in &self.fibers {
            out.push_str(&fiber.command());
            out.push('\n');
        }
        out.push('}');
        out
    }

    /// Total steel area over layers and fibers
    pub fn steel_area(&self) -> SqMeters {
        let layers = self.layers.iter().fold(SqMeters(0.0), |acc, l| acc + l.bar_area * l.bars as f64);
        self.fibers.iter().fold(layers, |acc, f| acc + f.area)
    }
}

enum Placement {
    Layer(StraightLayer),
    Fiber(Fiber),
}

fn bar_placement(design: &SectionDesign, layer: &RebarLayer, steel: u32) -> ModelResult<Placement> {
    let hw = design.width.0 / 2.0;
    let hh = design.height.0 / 2.0;
    let c = layer.cover.0;

    let straight = |start: SectionPoint, end: SectionPoint| {
        Placement::Layer(StraightLayer {
            material: steel,
            bars: layer.bars,
            bar_area: layer.bar_area,
            start,
            end,
        })
    };

    let placement = match layer.position {
        LayerPosition::Top => straight(SectionPoint::new(-hw + c, hh - c), SectionPoint::new(hw - c, hh - c)),
        LayerPosition::Middle => straight(SectionPoint::new(-hw + c, 0.0), SectionPoint::new(hw - c, 0.0)),
        LayerPosition::Bottom => straight(SectionPoint::new(-hw + c, -hh + c), SectionPoint::new(hw - c, -hh + c)),
        LayerPosition::Left | LayerPosition::Right => {
            let y = if layer.position == LayerPosition::Right { hw - c } else { -hw + c };
            match layer.bars {
                0 => {
                    return Err(ModelError::invalid_input(
                        "layers.bars",
                        "0",
                        format!("{:?} rebar layer needs at least one bar", layer.position),
                    ))
                }
                1 => Placement::Fiber(Fiber {
                    material: steel,
                    area: layer.bar_area,
                    location: SectionPoint::new(y, 0.0),
                }),
                n => {
                    // Corner bars belong to the top and bottom layers
                    let offset = (design.height.0 - 2.0 * c) / (n as f64 + 1.0);
                    straight(SectionPoint::new(y, -hh + c + offset), SectionPoint::new(y, hh - c - offset))
                }
            }
        }
    };
    Ok(placement)
}
