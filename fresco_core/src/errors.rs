//! # Error Types
//!
//! Structured error types for fresco_core. Errors carry enough context to
//! tell a configuration bug (unknown unit, broken schema table) apart from
//! a state problem (missing entry) or an I/O failure.
//!
//! Problems with individual input fields are *not* errors: a field with a
//! placeholder value or a unit from the wrong family is dropped and listed
//! in the operation report (see [`crate::database::IngestReport`]).
//!
//! ## Example
//!
//! ```rust
//! use fresco_core::errors::{FrescoError, FrescoResult};
//!
//! fn require_positive(field: &str, value: f64) -> FrescoResult<f64> {
//!     if value <= 0.0 {
//!         return Err(FrescoError::invalid_input(field, value.to_string(), "must be positive"));
//!     }
//!     Ok(value)
//! }
//!
//! assert!(require_positive("col_h", -1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::EntryId;

/// Result type alias for fresco_core operations
pub type FrescoResult<T> = Result<T, FrescoError>;

/// Structured error type for database and conversion operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FrescoError {
    /// A unit family name is not registered
    #[error("Unknown unit family: '{family}'")]
    UnknownUnitFamily { family: String },

    /// A unit name is not a member of the requested family
    #[error("Unknown unit '{unit}' for unit family '{family}'")]
    UnknownUnit { family: String, unit: String },

    /// Descriptor and default-value tables are not aligned one-to-one
    #[error("Field schema mismatch: fields without defaults {missing_defaults:?}, defaults without fields {missing_descriptors:?}")]
    SchemaMismatch {
        missing_defaults: Vec<String>,
        missing_descriptors: Vec<String>,
    },

    /// A schema entry is internally inconsistent
    #[error("Invalid field schema entry '{field}': {reason}")]
    InvalidSchema { field: String, reason: String },

    /// Insert without overwrite on an existing identifier
    #[error("Entry {id} already exists")]
    EntryExists { id: EntryId },

    /// Operation on an identifier that is not stored
    #[error("Entry {id} not found")]
    EntryNotFound { id: EntryId },

    /// A field name that the schema does not declare
    #[error("Unknown field: '{field}'")]
    UnknownField { field: String },

    /// A value the operation cannot work with
    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Reading or writing a database file failed
    #[error("Failed to {operation} '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// A document could not be encoded or decoded
    #[error("Document encoding failed: {reason}")]
    SerializationError { reason: String },

    /// Document version mismatch
    #[error("Unsupported document version {file_version} (this build reads {expected_version})")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl FrescoError {
    /// Create an UnknownUnitFamily error
    pub fn unknown_family(family: impl Into<String>) -> Self {
        FrescoError::UnknownUnitFamily {
            family: family.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(family: impl Into<String>, unit: impl Into<String>) -> Self {
        FrescoError::UnknownUnit {
            family: family.into(),
            unit: unit.into(),
        }
    }

    /// Create an InvalidSchema error
    pub fn invalid_schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FrescoError::InvalidSchema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        FrescoError::UnknownField {
            field: field.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FrescoError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        FrescoError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        FrescoError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Configuration errors indicate a packaging or caller bug and should
    /// never be silently recovered.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FrescoError::UnknownUnitFamily { .. }
                | FrescoError::UnknownUnit { .. }
                | FrescoError::SchemaMismatch { .. }
                | FrescoError::InvalidSchema { .. }
        )
    }

    /// Whether retrying can succeed. Failed saves leave the database
    /// unchanged, so the same call may simply be repeated.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrescoError::FileError { .. })
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            FrescoError::UnknownUnitFamily { .. } => "UNKNOWN_UNIT_FAMILY",
            FrescoError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            FrescoError::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            FrescoError::InvalidSchema { .. } => "INVALID_SCHEMA",
            FrescoError::EntryExists { .. } => "ENTRY_EXISTS",
            FrescoError::EntryNotFound { .. } => "ENTRY_NOT_FOUND",
            FrescoError::UnknownField { .. } => "UNKNOWN_FIELD",
            FrescoError::InvalidInput { .. } => "INVALID_INPUT",
            FrescoError::FileError { .. } => "FILE_ERROR",
            FrescoError::SerializationError { .. } => "SERIALIZATION_ERROR",
            FrescoError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for FrescoError {
    fn from(e: serde_json::Error) -> Self {
        FrescoError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = FrescoError::unknown_unit("Length", "furlong");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"UnknownUnit\""));
        let roundtrip: FrescoError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FrescoError::EntryNotFound { id: 3 }.error_code(), "ENTRY_NOT_FOUND");
        assert_eq!(FrescoError::unknown_family("Mass2").error_code(), "UNKNOWN_UNIT_FAMILY");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(FrescoError::unknown_unit("Length", "yd").is_configuration());
        assert!(!FrescoError::EntryExists { id: 1 }.is_configuration());
        assert!(FrescoError::file_error("save", "db.json", "disk full").is_recoverable());
        assert!(!FrescoError::EntryExists { id: 1 }.is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = FrescoError::EntryExists { id: 7 };
        assert_eq!(error.to_string(), "Entry 7 already exists");
    }
}
