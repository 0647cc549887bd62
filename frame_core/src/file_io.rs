//! # File I/O Module
//!
//! Handles batch file operations with safety features:
//! - **Atomic writes**: Scripts and settings go to a .tmp file, are synced
//!   and renamed, so an aborted building never leaves a partial file behind
//! - **Locked appends**: The summary log takes an exclusive OS lock per
//!   append so concurrent runs never interleave lines
//! - **Version validation**: Settings files must match the schema version
//!
//! ## Layout
//!
//! ```text
//! <input>/<group>/<building>_structure.json   building files
//! <output>/tcl_files/<building>_<X|Y>.tcl     analysis scripts
//! <output>/results/tau_factors.csv            summary log
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use frame_core::file_io::{load_building, load_settings, building_id};
//! use std::path::Path;
//!
//! let path = Path::new("buildings/H-type/0605018TG4400N_181160562_structure.json");
//! let input = load_building(path)?;
//! let settings = load_settings(Path::new("settings.json"))?;
//! assert_eq!(building_id(path)?, "0605018TG4400N_181160562");
//! # Ok::<(), frame_core::errors::ModelError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::errors::{ModelError, ModelResult};
use crate::model::BuildingInput;
use crate::settings::{RunSettings, SCHEMA_VERSION};

/// Suffix of building files
pub const BUILDING_SUFFIX: &str = "_structure.json";

/// Building identifier: the file name without [`BUILDING_SUFFIX`]
pub fn building_id(path: &Path) -> ModelResult<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ModelError::file_error("name", path.display().to_string(), "path has no file name"))?;
    Ok(match name.strip_suffix(BUILDING_SUFFIX) {
        Some(id) => id.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    })
}

fn read_to_string(path: &Path) -> ModelResult<String> {
    let mut file = File::open(path).map_err(|e| ModelError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ModelError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Load a building file.
pub fn load_building(path: &Path) -> ModelResult<BuildingInput> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| ModelError::SerializationError {
        reason: format!("Invalid building file {}: {}", path.display(), e),
    })
}

/// Building files directly in `dir` or one folder below it, sorted by path.
pub fn discover_buildings(dir: &Path) -> ModelResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in read_dir(dir)? {
        if entry.is_dir() {
            found.extend(read_dir(&entry)?.into_iter().filter(|p| is_building_file(p)));
        } else if is_building_file(&entry) {
            found.push(entry);
        }
    }
    found.sort();
    Ok(found)
}

fn read_dir(dir: &Path) -> ModelResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ModelError::file_error("list", dir.display().to_string(), e.to_string()))?;
    entries
        .map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| ModelError::file_error("list", dir.display().to_string(), e.to_string()))
        })
        .collect()
}

fn is_building_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(BUILDING_SUFFIX))
            .unwrap_or(false)
}

/// Write `contents` with atomic semantics:
/// 1. Write to a temporary file (.tmp)
/// 2. Sync to disk (fsync)
/// 3. Rename over the final path
fn atomic_write(path: &Path, contents: &[u8]) -> ModelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ModelError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| ModelError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents)
        .map_err(|e| ModelError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| ModelError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ModelError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Write an analysis script.
pub fn write_script(path: &Path, script: &str) -> ModelResult<()> {
    atomic_write(path, script.as_bytes())
}

/// Save run settings as pretty JSON.
pub fn save_settings(settings: &RunSettings, path: &Path) -> ModelResult<()> {
    let json = serde_json::to_string_pretty(settings)?;
    atomic_write(path, json.as_bytes())
}

/// Load run settings, checking the schema version and every value.
pub fn load_settings(path: &Path) -> ModelResult<RunSettings> {
    let contents = read_to_string(path)?;
    let settings: RunSettings = serde_json::from_str(&contents).map_err(|e| ModelError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&settings.version)?;
    settings.validate()?;
    Ok(settings)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> ModelResult<()> {
    let mismatch = || ModelError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

/// Append-only summary log shared by every building of a batch.
#[derive(Debug, Clone)]
pub struct SummaryLog {
    path: PathBuf,
}

impl SummaryLog {
    /// Open the log at `path`, creating it and its directory. With
    /// `truncate` any previous content is discarded.
    pub fn open(path: &Path, truncate: bool) -> ModelResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ModelError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
        }
        OpenOptions::new()
            .create(true)
            .append(!truncate)
            .write(true)
            .truncate(truncate)
            .open(path)
            .map_err(|e| ModelError::file_error("open log", path.display().to_string(), e.to_string()))?;

        Ok(SummaryLog {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line under an exclusive lock, flushed before the lock is
    /// released.
    pub fn append(&self, line: &str) -> ModelResult<()> {
        let display = self.path.display().to_string();
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| ModelError::file_error("open log", display.clone(), e.to_string()))?;

        file.lock_exclusive().map_err(|e| ModelError::FileLocked {
            path: display.clone(),
            locked_by: e.to_string(),
        })?;

        let written = file
            .write_all(format!("{}\n", line).as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(|e| ModelError::file_error("append", display.clone(), e.to_string()));

        let _ = file.unlock();
        written
    }

    /// Every line written so far
    pub fn lines(&self) -> ModelResult<Vec<String>> {
        Ok(read_to_string(&self.path)?.lines().map(str::to_string).collect())
    }
}
