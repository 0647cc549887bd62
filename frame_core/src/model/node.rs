//! Frame nodes.

use serde::{Deserialize, Serialize};

/// Degrees of freedom per node (3 translations, 3 rotations)
pub const NDF: usize = 6;

/// Node of the 3D frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    /// Global coordinates (m)
    pub coords: [f64; 3],
    /// Restrained DOFs
    pub fixes: [bool; NDF],
}

impl Node {
    pub fn new(id: u32, coords: [f64; 3], fixes: [bool; NDF]) -> Self {
        Node { id, coords, fixes }
    }

    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Every DOF restrained
    pub fn is_base(&self) -> bool {
        self.fixes.iter().all(|f| *f)
    }

    /// At least one DOF restrained
    pub fn is_restrained(&self) -> bool {
        self.fixes.iter().any(|f| *f)
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        distance(&self.coords, &other.coords)
    }

    /// `node` statement, coordinates to the centimeter
    pub fn command(&self) -> String {
        format!(
            "node {} {:.2} {:.2} {:.2}",
            self.id, self.coords[0], self.coords[1], self.coords[2]
        )
    }

    /// `fix` statement
    pub fn fix_command(&self) -> String {
        let flags: Vec<&str> = self.fixes.iter().map(|f| if *f { "1" } else { "0" }).collect();
        format!("fix {} {}", self.id, flags.join(" "))
    }
}

pub(crate) fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q).powi(2)).sum::<f64>().sqrt()
}
