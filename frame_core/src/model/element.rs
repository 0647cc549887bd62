//! Frame elements and their gravity loads.

use serde::{Deserialize, Serialize};

use crate::sections::SectionKind;
use crate::settings::{AnalysisSettings, ElementIntegration};
use crate::units::{KnPerMeter, Meters};

/// Force-based beam-column element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: u32,
    pub node_i: u32,
    pub node_j: u32,
    pub kind: SectionKind,
    /// Storey the element belongs to, 1 = first floor
    pub level: u32,
    pub length: Meters,
    /// Plastic hinge length at each end
    pub hinge_length: Meters,
    /// Uniform load in global Z (negative downward)
    pub uniform_load: KnPerMeter,
    /// Element on the building envelope (carries infill)
    pub border: bool,
}

impl Element {
    /// `element forceBeamColumn` statement using section `section_tag`
    pub fn command(&self, section_tag: u32, analysis: &AnalysisSettings) -> String {
        let (transf, _) = self.kind.transformation();
        let lp = self.hinge_length.0;
        let integration = match analysis.integration {
            ElementIntegration::HingeRadau => {
                format!("HingeRadau {s} {lp} {s} {lp} {s}", s = section_tag, lp = lp)
            }
            ElementIntegration::RegularizedHinge { distribution, zeta } => format!(
                "RegularizedHinge {d} {n} {s} {lp} {z} {s} {lp} {z} {s}",
                d = distribution.code(),
                n = analysis.integration_points,
                s = section_tag,
                lp = lp,
                z = zeta
            ),
            ElementIntegration::Lobatto => format!("Lobatto {} {}", section_tag, analysis.integration_points),
        };
        format!(
            "element forceBeamColumn {} {} {} {} {}",
            self.id, self.node_i, self.node_j, transf, integration
        )
    }

    pub fn is_loaded(&self) -> bool {
        round2(self.uniform_load.0) != 0.0
    }

    /// `eleLoad` statement; local y load is always zero
    pub fn load_command(&self) -> String {
        format!(
            "eleLoad -ele {} -type -beamUniform {:?} {:?}",
            self.id,
            0.0f64,
            round2(self.uniform_load.0)
        )
    }
}

/// Round to 2 decimals
pub(crate) fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid writing "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QuadratureRule;

    fn beam() -> Element {
        Element {
            id: 12,
            node_i: 3,
            node_j: 4,
            kind: SectionKind::Beam,
            level: 1,
            length: Meters(5.0),
            hinge_length: Meters(0.5),
            uniform_load: KnPerMeter(-19.6049),
            border: true,
        }
    }

    #[test]
    fn test_hinge_radau_command() {
        let cmd = beam().command(1, &AnalysisSettings::default());
        assert_eq!(cmd, "element forceBeamColumn 12 3 4 2 HingeRadau 1 0.5 1 0.5 1");
    }

    #[test]
    fn test_alternative_integrations() {
        let mut analysis = AnalysisSettings::default();
        analysis.integration = ElementIntegration::RegularizedHinge {
            distribution: QuadratureRule::Radau,
            zeta: 1.0,
        };
        assert_eq!(
            beam().command(1, &analysis),
            "element forceBeamColumn 12 3 4 2 RegularizedHinge Radau 5 1 0.5 1 1 0.5 1 1"
        );

        analysis.integration = ElementIntegration::Lobatto;
        let mut column = beam();
        column.kind = SectionKind::Column;
        assert_eq!(column.command(3, &analysis), "element forceBeamColumn 12 3 4 1 Lobatto 3 5");
    }

    #[test]
    fn test_load_command_rounds() {
        let e = beam();
        assert!(e.is_loaded());
        assert_eq!(e.load_command(), "eleLoad -ele 12 -type -beamUniform 0.0 -19.6");

        let mut tiny = beam();
        tiny.uniform_load = KnPerMeter(-0.004);
        assert!(!tiny.is_loaded());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005 * 1000.0), 1005.0);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
        assert_eq!(round2(2.345678), 2.35);
    }
}
