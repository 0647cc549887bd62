//! # Analysis Script
//!
//! Writes the OpenSees TCL input of one building and direction. The script
//! is built section by section in a fixed order:
//!
//! 1. model, nodes, diaphragms, boundary conditions, masses
//! 2. geometric transformations, materials, fiber sections, elements
//! 3. gravity load pattern, recorders, analysis options, gravity analysis
//! 4. pushover load pattern, displacement-controlled pushover, `wipe`
//!
//! Recorder output lands under `results/` relative to the directory the
//! analysis runs in.

use tracing::debug;

use crate::errors::ModelResult;
use crate::materials::MaterialCatalog;
use crate::model::{Direction, StructuralModel, NDF};
use crate::sections::{SectionCatalog, SectionKind};
use crate::settings::RunSettings;

/// File name of the script of `building` pushed along `direction`
pub fn script_file_name(building: &str, direction: Direction) -> String {
    format!("{}_{}.tcl", building, direction)
}

pub struct TclGenerator<'a> {
    model: &'a StructuralModel,
    materials: &'a MaterialCatalog,
    sections: &'a SectionCatalog,
    settings: &'a RunSettings,
}

impl<'a> TclGenerator<'a> {
    const GRAVITY_PATTERN: u32 = 1;
    const PUSHOVER_PATTERN: u32 = 2;
    const BASE_REGION: u32 = 1;

    pub fn new(
        model: &'a StructuralModel,
        materials: &'a MaterialCatalog,
        sections: &'a SectionCatalog,
        settings: &'a RunSettings,
    ) -> Self {
        TclGenerator {
            model,
            materials,
            sections,
            settings,
        }
    }

    /// Complete script for a pushover along `direction`
    pub fn generate(&self, direction: Direction) -> ModelResult<String> {
        let mut tcl = String::new();

        tcl.push_str(&format!("model basic -ndm 3 -ndf {}\n", NDF));
        self.write_nodes(&mut tcl);
        self.write_diaphragms(&mut tcl);
        self.write_boundary_conditions(&mut tcl);
        self.write_masses(&mut tcl);
        self.write_transformations(&mut tcl);
        self.write_materials(&mut tcl);
        self.write_sections(&mut tcl);
        self.write_elements(&mut tcl)?;
        self.write_gravity_loads(&mut tcl);
        self.write_recorders(&mut tcl, direction);
        self.write_analysis_options(&mut tcl);
        self.write_gravity_analysis(&mut tcl);
        self.write_pushover_loads(&mut tcl, direction);
        self.write_pushover_analysis(&mut tcl, direction);

        debug!(
            building = %self.model.building,
            %direction,
            bytes = tcl.len(),
            "script generated"
        );
        Ok(tcl)
    }

    fn write_nodes(&self, tcl: &mut String) {
        tcl.push_str("\n#nodes coordinates\n");
        for node in self.model.nodes.values() {
            tcl.push_str(&node.command());
            tcl.push('\n');
        }
    }

    fn write_diaphragms(&self, tcl: &mut String) {
        tcl.push_str("\n#diaphragms\n");
        for diaphragm in &self.model.diaphragms {
            tcl.push_str(&diaphragm.command());
            tcl.push('\n');
        }
    }

    fn write_boundary_conditions(&self, tcl: &mut String) {
        tcl.push_str("\n#boundary conditions\n");
        for node in self.model.nodes.values() {
            tcl.push_str(&node.fix_command());
            tcl.push('\n');
        }
    }

    fn write_masses(&self, tcl: &mut String) {
        tcl.push_str("\n#nodal masses\n");
        for (id, mass) in &self.model.masses {
            tcl.push_str(&mass.command(*id));
            tcl.push('\n');
        }
    }

    fn write_transformations(&self, tcl: &mut String) {
        tcl.push_str("\n#transformation\n");
        for kind in [SectionKind::Column, SectionKind::Beam, SectionKind::AuxBeam] {
            let (tag, [x, y, z]) = kind.transformation();
            tcl.push_str(&format!("geomTransf Linear {} {} {} {}\n", tag, x, y, z));
        }
    }

    fn write_materials(&self, tcl: &mut String) {
        tcl.push_str("\n#materials\n");
        for material in self.materials.materials() {
            tcl.push_str(&material.command());
            tcl.push('\n');
        }
    }

    fn write_sections(&self, tcl: &mut String) {
        tcl.push_str("\n#sections\n");
        for section in self.sections.iter() {
            tcl.push_str(&section.command());
            tcl.push_str("\n\n");
        }
    }

    fn write_elements(&self, tcl: &mut String) -> ModelResult<()> {
        tcl.push_str("\n#connectivity\n");
        for element in &self.model.elements {
            let section = self.sections.get(element.kind)?;
            tcl.push_str(&element.command(section.tag, &self.settings.analysis));
            tcl.push('\n');
        }
        Ok(())
    }

    fn write_gravity_loads(&self, tcl: &mut String) {
        tcl.push_str("\n#define load pattern\n");
        tcl.push_str(&format!("pattern Plain {} Linear {{\n", Self::GRAVITY_PATTERN));
        for element in self.model.elements.iter().filter(|e| e.is_loaded()) {
            tcl.push_str(&element.load_command());
            tcl.push('\n');
        }
        tcl.push_str("}\n\n");
    }

    fn write_recorders(&self, tcl: &mut String, direction: Direction) {
        let prefix = format!("{}_{}_L{}", self.model.building, direction, self.model.storeys);
        let dof = direction.dof();

        tcl.push_str("#recorders\n");
        tcl.push_str(&format!(
            "recorder Node -file results/displacement/{}_control_node.out -time -node {} -dof {} disp\n\n",
            prefix, self.model.sdof.control_node, dof
        ));

        let slabs: Vec<String> = self.model.diaphragms.iter().map(|d| d.id.to_string()).collect();
        tcl.push_str(&format!(
            "recorder Node -file results/slabs_displacement/{}_slabs.out -time -node {} -dof {} disp\n\n",
            prefix,
            slabs.join(" "),
            dof
        ));

        let base: Vec<String> = self.model.base_nodes().iter().map(|id| id.to_string()).collect();
        tcl.push_str("\n#ground nodes region\n");
        tcl.push_str(&format!("region {} -nodeOnly {}\n", Self::BASE_REGION, base.join(" ")));
        tcl.push_str(&format!(
            "recorder Node -file results/shear/{}_basal_nodes.out -time -region {} -dof {} reaction\n\n",
            prefix,
            Self::BASE_REGION,
            dof
        ));
    }

    fn write_analysis_options(&self, tcl: &mut String) {
        let analysis = &self.settings.analysis;
        tcl.push_str("#analysis\n");
        tcl.push_str("constraints Transformation\n");
        tcl.push_str("numberer Plain\n");
        tcl.push_str("system BandGeneral\n");
        tcl.push_str(&format!(
            "test NormDispIncr {:e} {}\n",
            analysis.test_tolerance, analysis.test_iterations
        ));
        tcl.push_str("algorithm Linear\n");
    }

    fn write_gravity_analysis(&self, tcl: &mut String) {
        let steps = self.settings.analysis.gravity_steps;
        tcl.push_str(&format!("integrator LoadControl {}\n", 1.0 / steps as f64));
        tcl.push_str("analysis Static\n\n");
        tcl.push_str(&format!("analyze {}\n\n", steps));
        tcl.push_str("loadConst -time 0.0\n");
    }

    fn write_pushover_loads(&self, tcl: &mut String, direction: Direction) {
        tcl.push_str("\n#define pushover load pattern\n");
        tcl.push_str(&format!("pattern Plain {} Linear {{\n", Self::PUSHOVER_PATTERN));
        for load in self.model.pushover_loads(self.settings) {
            let components = match direction {
                Direction::X => format!("{:?} 0.0 0.0", load.force.0),
                Direction::Y => format!("0.0 {:?} 0.0", load.force.0),
            };
            tcl.push_str(&format!("load {} {} 0.0 0.0 0.0\n", load.node, components));
        }
        tcl.push_str("}\n\n");
    }

    fn write_pushover_analysis(&self, tcl: &mut String, direction: Direction) {
        let analysis = &self.settings.analysis;
        tcl.push_str("#pushover analysis\n");
        tcl.push_str(&format!(
            "integrator DisplacementControl {} {} {}\n\n",
            self.model.sdof.control_node,
            direction.dof(),
            analysis.pushover_increment.0
        ));
        tcl.push_str(&format!("analyze {}\n", analysis.pushover_steps()));
        tcl.push_str("wipe\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_storey_frame;
    use crate::sections::build_catalogs;

    fn script(direction: Direction) -> String {
        let settings = RunSettings::default();
        let model = StructuralModel::assemble("frame", &two_storey_frame(), &settings).unwrap();
        let (materials, sections) = build_catalogs(model.storeys, &settings).unwrap();
        TclGenerator::new(&model, &materials, &sections, &settings)
            .generate(direction)
            .unwrap()
    }

    fn position(tcl: &str, needle: &str) -> usize {
        tcl.find(needle).unwrap_or_else(|| panic!("missing '{}'", needle))
    }

    #[test]
    fn test_section_order() {
        let tcl = script(Direction::X);
        assert!(tcl.starts_with("model basic -ndm 3 -ndf 6\n"));
        let order = [
            "#nodes coordinates",
            "#diaphragms",
            "#boundary conditions",
            "#nodal masses",
            "#transformation",
            "#materials",
            "#sections",
            "#connectivity",
            "#define load pattern",
            "#recorders",
            "#analysis",
            "integrator LoadControl",
            "#define pushover load pattern",
            "#pushover analysis",
        ];
        let positions: Vec<usize> = order.iter().map(|s| position(&tcl, s)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
        assert!(tcl.ends_with("wipe\n"));
    }

    #[test]
    fn test_model_statements() {
        let tcl = script(Direction::X);
        assert!(tcl.contains("\nnode 1 0.00 0.00 0.00\n"));
        assert!(tcl.contains("\nnode 10 5.00 0.00 3.00\nfix 10 0 0 1 1 1 0\nrigidDiaphragm 3 10 4 5 6\n"));
        assert!(tcl.contains("\nfix 1 1 1 1 1 1 1\n"));
        assert!(tcl.contains("\nmass 4 6.63 6.63 0.00 0.00 0.00 33.13\n"));
        assert!(tcl.contains("geomTransf Linear 1 0 1 0\ngeomTransf Linear 2 0 0 1\ngeomTransf Linear 3 0 0 1\n"));
        assert!(tcl.contains("uniaxialMaterial Steel02 1 "));
        assert!(tcl.contains("uniaxialMaterial Concrete04 102 "));
        assert_eq!(tcl.matches("section Fiber").count(), 3);
        assert!(tcl.contains("element forceBeamColumn 1 1 4 1 HingeRadau 3 0.3 3 0.3 3\n"));
        assert!(tcl.contains("element forceBeamColumn 7 4 5 2 HingeRadau 1 0.5 1 0.5 1\n"));
    }

    #[test]
    fn test_gravity_pattern_skips_columns() {
        let tcl = script(Direction::X);
        assert_eq!(tcl.matches("eleLoad").count(), 4);
        assert!(tcl.contains("pattern Plain 1 Linear {\neleLoad -ele 7 -type -beamUniform 0.0 -26.0\n"));
    }

    #[test]
    fn test_recorders_and_analysis() {
        let tcl = script(Direction::Y);
        assert!(tcl.contains(
            "recorder Node -file results/displacement/frame_Y_L2_control_node.out -time -node 11 -dof 2 disp\n"
        ));
        assert!(tcl.contains("results/slabs_displacement/frame_Y_L2_slabs.out -time -node 10 11 -dof 2 disp\n"));
        assert!(tcl.contains("region 1 -nodeOnly 1 2 3\n"));
        assert!(tcl.contains("results/shear/frame_Y_L2_basal_nodes.out -time -region 1 -dof 2 reaction\n"));
        assert!(tcl.contains("test NormDispIncr 1e-6 6\n"));
        assert!(tcl.contains("integrator LoadControl 0.025\nanalysis Static\n\nanalyze 40\n\nloadConst -time 0.0\n"));
        assert!(tcl.contains("integrator DisplacementControl 11 2 0.001\n\nanalyze 1000\nwipe\n"));
    }

    #[test]
    fn test_pushover_load_direction() {
        let x = script(Direction::X);
        assert!(x.contains("pattern Plain 2 Linear {\nload 10 105.0 0.0 0.0 0.0 0.0 0.0\nload 11 56.67 0.0 0.0 0.0 0.0 0.0\n}"));
        let y = script(Direction::Y);
        assert!(y.contains("load 10 0.0 105.0 0.0 0.0 0.0 0.0\n"));
    }

    #[test]
    fn test_script_file_name() {
        assert_eq!(script_file_name("0605018TG4400N_181160562", Direction::Y), "0605018TG4400N_181160562_Y.tcl");
    }
}
