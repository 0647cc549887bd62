//! # Batch Driver
//!
//! Runs the whole pipeline over a set of building files: import, model
//! assembly, section catalogs, one script per direction and one summary
//! line per direction.
//!
//! A failing building is logged, recorded in the [`BatchReport`] and
//! skipped; the remaining buildings are still processed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use frame_core::batch::BatchRunner;
//! use frame_core::file_io::discover_buildings;
//! use frame_core::model::Direction;
//! use frame_core::settings::RunSettings;
//! use std::path::Path;
//!
//! let runner = BatchRunner::new(RunSettings::default(), Path::new("out"), Direction::ALL.to_vec())?;
//! let buildings = discover_buildings(Path::new("building_structure_results"))?;
//! let report = runner.run(&buildings)?;
//! println!("{} processed, {} failed", report.processed.len(), report.failed.len());
//! # Ok::<(), frame_core::errors::ModelError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{ModelError, ModelResult};
use crate::file_io::{building_id, load_building, write_script, SummaryLog};
use crate::materials::MaterialCatalog;
use crate::model::{BuildingInput, Direction, StructuralModel};
use crate::script::{script_file_name, TclGenerator};
use crate::sections::{build_catalogs, SectionCatalog};
use crate::settings::RunSettings;

/// Folder of the generated scripts, below the output directory
pub const SCRIPT_DIR: &str = "tcl_files";
/// Summary log, below the output directory
pub const SUMMARY_FILE: &str = "results/tau_factors.csv";

/// SDOF summary of one building and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub building: String,
    pub direction: Direction,
    pub tau: f64,
    pub equivalent_mass: f64,
}

impl SummaryRecord {
    /// `<building>,<dir>,tau_factor:<v>,equivalent_mass:<v>`
    pub fn to_line(&self) -> String {
        format!(
            "{},{},tau_factor:{:?},equivalent_mass:{:?}",
            self.building, self.direction, self.tau, self.equivalent_mass
        )
    }
}

/// Model and catalogs of one building, shared by every direction
#[derive(Debug, Clone)]
pub struct PreparedBuilding {
    pub model: StructuralModel,
    pub materials: MaterialCatalog,
    pub sections: SectionCatalog,
}

impl PreparedBuilding {
    pub fn prepare(building: &str, input: &BuildingInput, settings: &RunSettings) -> ModelResult<Self> {
        let model = StructuralModel::assemble(building, input, settings)?;
        let (materials, sections) = build_catalogs(model.storeys, settings)?;
        Ok(PreparedBuilding {
            model,
            materials,
            sections,
        })
    }

    pub fn script(&self, direction: Direction, settings: &RunSettings) -> ModelResult<String> {
        TclGenerator::new(&self.model, &self.materials, &self.sections, settings).generate(direction)
    }

    pub fn summary(&self, direction: Direction) -> SummaryRecord {
        SummaryRecord {
            building: self.model.building.clone(),
            direction,
            tau: self.model.sdof.tau,
            equivalent_mass: self.model.sdof.equivalent_mass.0,
        }
    }
}

/// Result of one successfully processed building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingOutcome {
    pub building: String,
    pub storeys: u32,
    pub scripts: Vec<PathBuf>,
    pub records: Vec<SummaryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFailure {
    pub path: PathBuf,
    pub error: ModelError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub processed: Vec<BuildingOutcome>,
    pub failed: Vec<BuildingFailure>,
}

impl BatchReport {
    fn start() -> Self {
        BatchReport {
            started_at: Utc::now(),
            finished_at: None,
            processed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

pub struct BatchRunner {
    settings: RunSettings,
    output_dir: PathBuf,
    directions: Vec<Direction>,
}

impl BatchRunner {
    pub fn new(settings: RunSettings, output_dir: &Path, directions: Vec<Direction>) -> ModelResult<Self> {
        settings.validate()?;
        if directions.is_empty() {
            return Err(ModelError::invalid_input("directions", "[]", "At least one direction is required"));
        }
        Ok(BatchRunner {
            settings,
            output_dir: output_dir.to_path_buf(),
            directions,
        })
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn script_path(&self, building: &str, direction: Direction) -> PathBuf {
        self.output_dir.join(SCRIPT_DIR).join(script_file_name(building, direction))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    /// Process one building file, writing its scripts and summary lines.
    pub fn run_building(&self, path: &Path, log: &SummaryLog) -> ModelResult<BuildingOutcome> {
        let building = building_id(path)?;
        let input = load_building(path)?;
        let prepared = PreparedBuilding::prepare(&building, &input, &self.settings)?;

        // Generate everything before touching the output
        let mut scripts = Vec::with_capacity(self.directions.len());
        for direction in &self.directions {
            scripts.push((*direction, prepared.script(*direction, &self.settings)?));
        }

        // All scripts land before any summary line; a failed write removes
        // the scripts of this building already in place
        let mut written = Vec::with_capacity(scripts.len());
        for (direction, script) in &scripts {
            let script_path = self.script_path(&building, *direction);
            if let Err(error) = write_script(&script_path, script) {
                for path in &written {
                    let _ = fs::remove_file(path);
                }
                return Err(error);
            }
            written.push(script_path);
        }

        let mut outcome = BuildingOutcome {
            building: building.clone(),
            storeys: prepared.model.storeys,
            scripts: written,
            records: Vec::new(),
        };
        for (direction, _) in &scripts {
            let record = prepared.summary(*direction);
            log.append(&record.to_line())?;
            info!(
                building = %building,
                direction = %direction,
                tau = record.tau,
                equivalent_mass = record.equivalent_mass,
                "script written"
            );
            outcome.records.push(record);
        }
        Ok(outcome)
    }

    /// Process every building; failures are collected, not propagated.
    /// Only a summary log that cannot be opened stops the batch.
    pub fn run(&self, paths: &[PathBuf]) -> ModelResult<BatchReport> {
        let log = SummaryLog::open(&self.summary_path(), true)?;
        let mut report = BatchReport::start();
        info!(buildings = paths.len(), output = %self.output_dir.display(), "batch started");

        for path in paths {
            match self.run_building(path, &log) {
                Ok(outcome) => report.processed.push(outcome),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        code = error.error_code(),
                        %error,
                        "building skipped"
                    );
                    report.failed.push(BuildingFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        report.finished_at = Some(Utc::now());
        info!(
            processed = report.processed.len(),
            failed = report.failed.len(),
            seconds = report.elapsed_seconds().unwrap_or(0.0),
            "batch finished"
        );
        Ok(report)
    }
}
