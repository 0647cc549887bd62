//! # Pushframe CLI
//!
//! Batch front-end over `frame_core`: generates one OpenSees pushover
//! script per building and direction and the SDOF summary log.
//!
//! Logging goes to stderr through `tracing`; set `RUST_LOG` to change the
//! level (default `frame_core=info,frame_cli=info`).

use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use serde::Serialize;
use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frame_core::batch::{BatchReport, BatchRunner};
use frame_core::file_io::{discover_buildings, load_settings, save_settings};
use frame_core::materials::Material;
use frame_core::sections::{build_catalogs, SectionCatalog};
use frame_core::{Direction, ModelError, ModelResult, RunSettings};

/// Directions to analyse
#[derive(Debug, Clone, Copy)]
enum DirectionChoice {
    One(Direction),
    Both,
}

impl DirectionChoice {
    fn directions(self) -> Vec<Direction> {
        match self {
            DirectionChoice::One(d) => vec![d],
            DirectionChoice::Both => Direction::ALL.to_vec(),
        }
    }
}

impl FromStr for DirectionChoice {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("both") {
            Ok(DirectionChoice::Both)
        } else {
            s.parse().map(DirectionChoice::One)
        }
    }
}

/// Output and settings options shared by the generating commands
#[derive(StructOpt, Debug)]
struct RunOptions {
    /// Output directory (receives tcl_files/ and results/)
    #[structopt(short = "o", long = "output", parse(from_os_str), default_value = ".")]
    output: PathBuf,

    /// Settings file (JSON); defaults are used when absent
    #[structopt(short = "s", long = "settings", parse(from_os_str))]
    settings: Option<PathBuf>,

    /// Pushover direction: X, Y or both
    #[structopt(short = "d", long = "direction", default_value = "both")]
    direction: DirectionChoice,
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "pushframe",
    about = "Generates OpenSees pushover scripts for reinforced-concrete frame buildings"
)]
enum Command {
    /// Process every *_structure.json file of a directory and its sub-folders
    Batch {
        #[structopt(parse(from_os_str))]
        input_dir: PathBuf,

        #[structopt(flatten)]
        options: RunOptions,
    },

    /// Process a single building file
    Building {
        #[structopt(parse(from_os_str))]
        file: PathBuf,

        #[structopt(flatten)]
        options: RunOptions,
    },

    /// Print the material and section catalogs of a building height as JSON
    Materials {
        #[structopt(long = "storeys", default_value = "3")]
        storeys: u32,

        #[structopt(short = "s", long = "settings", parse(from_os_str))]
        settings: Option<PathBuf>,
    },

    /// Write a default settings file
    Settings {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct CatalogDump<'a> {
    storeys: u32,
    materials: Vec<Material>,
    sections: &'a SectionCatalog,
}

fn settings_from(path: Option<&Path>) -> ModelResult<RunSettings> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading settings");
            load_settings(path)
        }
        None => Ok(RunSettings::default()),
    }
}

fn run_batch(paths: &[PathBuf], options: &RunOptions) -> ModelResult<BatchReport> {
    let settings = settings_from(options.settings.as_deref())?;
    let runner = BatchRunner::new(settings, &options.output, options.direction.directions())?;
    runner.run(paths)
}

fn print_report(report: &BatchReport) {
    for failure in &report.failed {
        eprintln!("FAILED {}: {}", failure.path.display(), failure.error);
    }
    println!(
        "{} building(s) processed, {} failed",
        report.processed.len(),
        report.failed.len()
    );
}

fn run(command: Command) -> ModelResult<bool> {
    match command {
        Command::Batch { input_dir, options } => {
            let paths = discover_buildings(&input_dir)?;
            if paths.is_empty() {
                return Err(ModelError::file_error(
                    "discover",
                    input_dir.display().to_string(),
                    "no *_structure.json files found",
                ));
            }
            let report = run_batch(&paths, &options)?;
            print_report(&report);
            Ok(report.is_success())
        }
        Command::Building { file, options } => {
            let report = run_batch(&[file], &options)?;
            print_report(&report);
            Ok(report.is_success())
        }
        Command::Materials { storeys, settings } => {
            let settings = settings_from(settings.as_deref())?;
            let (materials, sections) = build_catalogs(storeys, &settings)?;
            let dump = CatalogDump {
                storeys,
                materials: materials.materials(),
                sections: &sections,
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
            Ok(true)
        }
        Command::Settings { path } => {
            save_settings(&RunSettings::default(), &path)?;
            println!("Default settings written to {}", path.display());
            Ok(true)
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frame_core=info,frame_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::from_args();
    match run(command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            process::exit(2);
        }
    }
}
