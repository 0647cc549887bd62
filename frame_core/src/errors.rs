//! # Error Types
//!
//! Structured error types for frame_core. Every stage of the pipeline
//! (import, confinement, section assembly, script emission, batch I/O)
//! reports failures through [`ModelError`] so callers can decide whether a
//! building is skipped or the whole batch stops.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::errors::{ModelError, ModelResult};
//!
//! fn validate_spacing(spacing_m: f64) -> ModelResult<()> {
//!     if spacing_m <= 0.0 {
//!         return Err(ModelError::InvalidInput {
//!             field: "spacing".to_string(),
//!             value: spacing_m.to_string(),
//!             reason: "Hoop spacing must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for frame_core operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Structured error type for model generation.
///
/// Each variant carries enough context to identify the offending building,
/// section or field without re-running the batch.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ModelError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Calculation failed (invalid geometry for a formula, out of chart domain, ...)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// An iterative search gave up before reaching its stopping criterion
    #[error("{solver} did not converge after {iterations} iterations (last value {last_value}): {reason}")]
    NonConvergence {
        solver: String,
        iterations: usize,
        last_value: f64,
        reason: String,
    },

    /// Building geometry or connectivity is inconsistent; fatal for that building
    #[error("Topology error in building '{building}': {reason}")]
    Topology { building: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by}")]
    FileLocked { path: String, locked_by: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ModelError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ModelError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        ModelError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a NonConvergence error
    pub fn non_convergence(
        solver: impl Into<String>,
        iterations: usize,
        last_value: f64,
        reason: impl Into<String>,
    ) -> Self {
        ModelError::NonConvergence {
            solver: solver.into(),
            iterations,
            last_value,
            reason: reason.into(),
        }
    }

    /// Create a Topology error
    pub fn topology(building: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::Topology {
            building: building.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        ModelError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ModelError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ModelError::InvalidInput { .. } => "INVALID_INPUT",
            ModelError::MissingField { .. } => "MISSING_FIELD",
            ModelError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            ModelError::CalculationFailed { .. } => "CALCULATION_FAILED",
            ModelError::NonConvergence { .. } => "NON_CONVERGENCE",
            ModelError::Topology { .. } => "TOPOLOGY",
            ModelError::FileError { .. } => "FILE_ERROR",
            ModelError::FileLocked { .. } => "FILE_LOCKED",
            ModelError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ModelError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ModelError::invalid_input("spacing", "-0.15", "Hoop spacing must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: ModelError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ModelError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(ModelError::material_not_found("HA-30").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(ModelError::topology("B1", "3 levels, expected 4").error_code(), "TOPOLOGY");
        assert_eq!(
            ModelError::non_convergence("hoop failure", 10, 0.2, "strain cap").error_code(),
            "NON_CONVERGENCE"
        );
    }

    #[test]
    fn test_topology_message_names_building() {
        let error = ModelError::topology("7395302TG3379N", "delta z not zero");
        assert!(error.to_string().contains("7395302TG3379N"));
        assert!(!error.is_recoverable());
    }
}
