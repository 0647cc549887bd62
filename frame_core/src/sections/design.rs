//! Section design records.
//!
//! A [`SectionDesign`] is the geometric and reinforcement description of a
//! rectangular reinforced-concrete section, before any material is derived
//! from it. Local section axes follow the analysis engine: `y` horizontal
//! (along the width), `z` vertical (along the height), origin at the centroid.

use serde::{Deserialize, Serialize};

use crate::confinement::bars::{bar_area_mm, bar_diameter};
use crate::errors::{ModelError, ModelResult};
use crate::units::{Meters, Millimeters, SqMeters};

/// Member family a section is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Load-bearing beam
    Beam,
    /// Non-bearing tie beam between frames
    #[serde(rename = "auxbeam")]
    AuxBeam,
    /// Column
    Column,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [SectionKind::Beam, SectionKind::AuxBeam, SectionKind::Column];

    /// Code used by the building import files
    pub fn code(&self) -> &'static str {
        match self {
            SectionKind::Beam => "beam",
            SectionKind::AuxBeam => "auxbeam",
            SectionKind::Column => "column",
        }
    }

    /// Geometric transformation tag and local xz vector used for this family
    pub fn transformation(&self) -> (u32, [f64; 3]) {
        match self {
            SectionKind::Column => (1, [0.0, 1.0, 0.0]),
            SectionKind::Beam => (2, [0.0, 0.0, 1.0]),
            SectionKind::AuxBeam => (3, [0.0, 0.0, 1.0]),
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, SectionKind::Column)
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where a layer of longitudinal bars sits in the section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerPosition {
    Top,
    Middle,
    Bottom,
    /// Side layer; excludes the corner bars owned by the top/bottom layers
    Left,
    /// Side layer; excludes the corner bars owned by the top/bottom layers
    Right,
}

impl LayerPosition {
    pub fn is_side(&self) -> bool {
        matches!(self, LayerPosition::Left | LayerPosition::Right)
    }
}

/// A row of identical longitudinal bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarLayer {
    /// Number of bars in the layer
    pub bars: u32,
    /// Area of one bar
    pub bar_area: SqMeters,
    /// Clear cover to the bar axis line
    pub cover: Meters,
    pub position: LayerPosition,
}

impl RebarLayer {
    /// Layer of `bars` bars of nominal diameter `diameter`
    pub fn new(bars: u32, diameter: Millimeters, cover: Meters, position: LayerPosition) -> Self {
        RebarLayer {
            bars,
            bar_area: bar_area_mm(diameter),
            cover,
            position,
        }
    }

    /// Total steel area of the layer
    pub fn area(&self) -> SqMeters {
        self.bar_area * self.bars as f64
    }
}

/// Transverse reinforcement: closed hoops with two legs per direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoopScheme {
    /// Area of one hoop leg
    pub bar_area: SqMeters,
    /// Center-to-center spacing along the member
    pub spacing: Meters,
}

impl HoopScheme {
    /// Hoops of nominal diameter `diameter` every `spacing`
    pub fn new(diameter: Millimeters, spacing: Meters) -> Self {
        HoopScheme {
            bar_area: bar_area_mm(diameter),
            spacing,
        }
    }

    /// Hoop legs acting in each confinement direction
    pub const LEGS_PER_DIRECTION: f64 = 2.0;

    /// Total transverse steel area crossing one direction
    pub fn area_per_direction(&self) -> SqMeters {
        self.bar_area * Self::LEGS_PER_DIRECTION
    }

    /// Nominal hoop bar diameter recovered from its area
    pub fn diameter(&self) -> Meters {
        bar_diameter(self.bar_area)
    }

    /// Clear spacing between hoops (`s' = s - d_hoop`)
    pub fn clear_spacing(&self) -> Meters {
        self.spacing - self.diameter()
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.spacing.0 > 0.0) {
            return Err(ModelError::invalid_input(
                "hoops.spacing",
                self.spacing.0.to_string(),
                "Hoop spacing must be positive",
            ));
        }
        if !(self.bar_area.0 >= 0.0) {
            return Err(ModelError::invalid_input(
                "hoops.bar_area",
                self.bar_area.0.to_string(),
                "Hoop bar area cannot be negative",
            ));
        }
        if self.clear_spacing().0 < 0.0 {
            return Err(ModelError::invalid_input(
                "hoops.spacing",
                self.spacing.0.to_string(),
                "Hoop spacing is smaller than the hoop bar diameter",
            ));
        }
        Ok(())
    }
}

/// Fiber discretization of the concrete patches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchScheme {
    /// Divisions along the local y axis (width)
    pub divisions_y: u32,
    /// Divisions along the local z axis (height)
    pub divisions_z: u32,
    /// Multiplier applied to every division count
    pub multiplier: u32,
}

impl Default for PatchScheme {
    fn default() -> Self {
        PatchScheme {
            divisions_y: 4,
            divisions_z: 4,
            multiplier: 3,
        }
    }
}

/// Rectangular reinforced-concrete section description.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kind": "beam",
///   "width": 0.3,
///   "height": 0.5,
///   "layers": [
///     { "bars": 4, "bar_area": 0.000201, "cover": 0.03, "position": "TOP" },
///     { "bars": 5, "bar_area": 0.000201, "cover": 0.03, "position": "BOTTOM" }
///   ],
///   "hoops": { "bar_area": 0.0000283, "spacing": 0.15 },
///   "patches": { "divisions_y": 4, "divisions_z": 6, "multiplier": 3 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDesign {
    pub kind: SectionKind,
    pub width: Meters,
    pub height: Meters,
    pub layers: Vec<RebarLayer>,
    pub hoops: HoopScheme,
    #[serde(default)]
    pub patches: PatchScheme,
}

impl SectionDesign {
    /// Validate geometry and reinforcement invariants.
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.width.0 > 0.0) {
            return Err(ModelError::invalid_input("width", self.width.0.to_string(), "Width must be positive"));
        }
        if !(self.height.0 > 0.0) {
            return Err(ModelError::invalid_input("height", self.height.0.to_string(), "Height must be positive"));
        }
        if self.layers.is_empty() {
            return Err(ModelError::missing_field("layers"));
        }

        let cover = self.layers[0].cover;
        for (i, layer) in self.layers.iter().enumerate() {
            if (layer.cover.0 - cover.0).abs() > 1e-9 {
                return Err(ModelError::invalid_input(
                    format!("layers[{}].cover", i),
                    layer.cover.0.to_string(),
                    format!("Cover must be identical in every layer (first layer uses {})", cover.0),
                ));
            }
            if layer.bars == 0 {
                return Err(ModelError::invalid_input(
                    format!("layers[{}].bars", i),
                    "0",
                    "A rebar layer needs at least one bar",
                ));
            }
            if !(layer.bar_area.0 > 0.0) {
                return Err(ModelError::invalid_input(
                    format!("layers[{}].bar_area", i),
                    layer.bar_area.0.to_string(),
                    "Bar area must be positive",
                ));
            }
        }

        if !(cover.0 >= 0.0) || 2.0 * cover.0 >= self.width.0.min(self.height.0) {
            return Err(ModelError::invalid_input(
                "cover",
                cover.0.to_string(),
                "Cover leaves no confined core",
            ));
        }

        if self.patches.divisions_y == 0 || self.patches.divisions_z == 0 || self.patches.multiplier == 0 {
            return Err(ModelError::invalid_input(
                "patches",
                format!("{:?}", self.patches),
                "Patch divisions must be at least 1",
            ));
        }

        self.hoops.validate()
    }

    /// Common cover of all layers
    pub fn cover(&self) -> Meters {
        self.layers.first().map(|l| l.cover).unwrap_or_default()
    }

    /// Sum of `bars × bar_area` over every layer
    pub fn total_longitudinal_area(&self) -> SqMeters {
        self.layers
            .iter()
            .fold(SqMeters(0.0), |acc, layer| acc + layer.area())
    }

    /// Gross area
    pub fn area(&self) -> SqMeters {
        SqMeters(self.width.0 * self.height.0)
    }

    /// Saint-Venant torsion constant of a solid rectangle
    pub fn torsion_constant(&self) -> f64 {
        let a = self.width.0.max(self.height.0);
        let b = self.width.0.min(self.height.0);
        a * b.powi(3) * (1.0 / 3.0 - 0.21 * (b / a) * (1.0 - b.powi(4) / (12.0 * a.powi(4))))
    }

    /// Confined core dimensions `(bc, dc)` with `bc >= dc`
    pub fn core_dimensions(&self) -> (Meters, Meters) {
        let cover2 = self.cover() * 2.0;
        let a = self.width - cover2;
        let b = self.height - cover2;
        if a.0 >= b.0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Same design with width and height exchanged
    pub fn rotated(&self) -> Self {
        let mut rotated = self.clone();
        rotated.width = self.height;
        rotated.height = self.width;
        rotated
    }
}
