//! # File I/O Module
//!
//! Persisted form of a database and the file operations around it:
//! - **Two encodings**: plain JSON (`<base>.json`) or gzip-compressed JSON
//!   (`<base>.json.gz`); loading prefers one and falls back to the other
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: documents from another major version are refused
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "config": {
//!     "field_units": { "frm_h": "mm", "specimen_id": null },
//!     "field_config": { "frm_h": { "group": "frame_geometry", "unit": "mm", ... } },
//!     "version": "1.0.0",
//!     "created_date": "2025-03-01T10:00:00+00:00",
//!     "last_modified": "2025-03-02T08:30:00+00:00",
//!     "compressed": true
//!   },
//!   "data": { "1": { "specimen_id": "S_CON", "frm_h": 1500.0 } },
//!   "total_entries": 1
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use fresco_core::file_io::{load_with_fallback, Encoding};
//! use std::path::Path;
//!
//! let base = Path::new("fresco_db");
//!
//! if let Some(loaded) = load_with_fallback(base, Encoding::Gzip)? {
//!     println!("{} entries from {}", loaded.document.data.len(), loaded.path.display());
//! }
//! # Ok::<(), fresco_core::errors::FrescoError>(())
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{FrescoError, FrescoResult};
use crate::record::{EntryId, Record};
use crate::schema::FieldConfigEntry;

/// Version written into every saved document
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// gzip level used for compressed documents
const GZIP_LEVEL: u32 = 6;

// ============================================================================
// Document
// ============================================================================

/// Database-level configuration stored alongside the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Active unit of every field (`null` for unitless fields)
    #[serde(default)]
    pub field_units: IndexMap<String, Option<String>>,

    /// Descriptor table of the schema the document was written with
    #[serde(default)]
    pub field_config: IndexMap<String, FieldConfigEntry>,

    #[serde(default = "legacy_version")]
    pub version: String,

    #[serde(with = "timestamp", default = "Utc::now")]
    pub created_date: DateTime<Utc>,

    #[serde(with = "timestamp", default = "Utc::now")]
    pub last_modified: DateTime<Utc>,

    #[serde(default)]
    pub compressed: bool,
}

fn legacy_version() -> String {
    "1.0".to_string()
}

/// Full persisted database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDocument {
    pub config: DocumentConfig,

    /// Records by id; JSON object keys are the decimal ids
    #[serde(default)]
    pub data: BTreeMap<EntryId, Record>,

    #[serde(default)]
    pub total_entries: usize,
}

/// Timestamps are written as RFC 3339. Naive ISO-8601 timestamps from older
/// documents are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

// ============================================================================
// Encodings
// ============================================================================

/// On-disk encoding of a database document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// `<base>.json`
    Plain,
    /// `<base>.json.gz`
    Gzip,
}

impl Encoding {
    pub fn from_compress(compress: bool) -> Self {
        if compress {
            Encoding::Gzip
        } else {
            Encoding::Plain
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Plain => ".json",
            Encoding::Gzip => ".json.gz",
        }
    }

    /// The encoding tried when this one is missing or unreadable
    pub fn other(&self) -> Self {
        match self {
            Encoding::Plain => Encoding::Gzip,
            Encoding::Gzip => Encoding::Plain,
        }
    }

    /// File path for a database base path (`fresco_db` -> `fresco_db.json.gz`)
    pub fn path_for(&self, base: &Path) -> PathBuf {
        with_suffix(base, self.extension())
    }

    fn encode(&self, json: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            Encoding::Plain => Ok(json.to_vec()),
            Encoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
                encoder.write_all(json)?;
                encoder.finish()
            }
        }
    }

    fn decode(&self, bytes: &[u8]) -> std::io::Result<String> {
        let mut text = String::new();
        match self {
            Encoding::Plain => {
                let mut reader = bytes;
                reader.read_to_string(&mut text)?;
            }
            Encoding::Gzip => {
                GzDecoder::new(bytes).read_to_string(&mut text)?;
            }
        }
        Ok(text)
    }
}

/// Append a suffix to the full file name, keeping any dots already in it
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

// ============================================================================
// Save / Load
// ============================================================================

/// Write `bytes` to `path` through a synced temporary file and a rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> FrescoResult<()> {
    let tmp_path = with_suffix(path, ".tmp");
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| FrescoError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(bytes)
        .map_err(|e| FrescoError::file_error("write temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| FrescoError::file_error("sync temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FrescoError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a document to `path` in the given encoding, atomically.
///
/// # Example
///
/// ```rust,no_run
/// use fresco_core::file_io::{save_document, Encoding};
/// # fn doc() -> fresco_core::file_io::DatabaseDocument { unimplemented!() }
/// use std::path::Path;
///
/// save_document(&doc(), Path::new("fresco_db.json.gz"), Encoding::Gzip)?;
/// # Ok::<(), fresco_core::errors::FrescoError>(())
/// ```
pub fn save_document(document: &DatabaseDocument, path: &Path, encoding: Encoding) -> FrescoResult<()> {
    let json = serde_json::to_vec_pretty(document)?;
    let bytes = encoding
        .encode(&json)
        .map_err(|e| FrescoError::file_error("compress", path.display().to_string(), e.to_string()))?;
    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

/// Load and version-check a document stored in `encoding` at `path`.
///
/// # Errors
///
/// * `FileError` - the file cannot be read or decompressed
/// * `SerializationError` - the content is not a database document
/// * `VersionMismatch` - the document was written by an incompatible version
pub fn load_document(path: &Path, encoding: Encoding) -> FrescoResult<DatabaseDocument> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| FrescoError::file_error("read", &display, e.to_string()))?;
    let text = encoding
        .decode(&bytes)
        .map_err(|e| FrescoError::file_error("decode", &display, e.to_string()))?;

    let document: DatabaseDocument = serde_json::from_str(&text)
        .map_err(|e| FrescoError::serialization(format!("Invalid document in {}: {}", display, e)))?;

    validate_version(&document.config.version)?;
    Ok(document)
}

/// A document together with where it was read from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: DatabaseDocument,
    pub path: PathBuf,
    pub encoding: Encoding,
}

/// Load the database stored under `base`, trying `preferred` first and the
/// other encoding second.
///
/// Returns `Ok(None)` when neither file exists. When every existing file
/// fails to load, the first failure is returned.
pub fn load_with_fallback(base: &Path, preferred: Encoding) -> FrescoResult<Option<LoadedDocument>> {
    let mut first_error = None;

    for encoding in [preferred, preferred.other()] {
        let path = encoding.path_for(base);
        if !path.exists() {
            continue;
        }
        match load_document(&path, encoding) {
            Ok(document) => return Ok(Some(LoadedDocument { document, path, encoding })),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load database file");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Accept documents of the same major version. Two-part versions such as
/// `1.0` are read as `1.0.0`.
fn validate_version(file_version: &str) -> FrescoResult<()> {
    let mismatch = || FrescoError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: DOCUMENT_VERSION.to_string(),
    };

    let file = parse_version(file_version).ok_or_else(mismatch)?;
    let current = parse_version(DOCUMENT_VERSION).ok_or_else(mismatch)?;

    if file.major != current.major {
        return Err(mismatch());
    }
    // Pre-1.0 minors are breaking
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    Version::parse(raw)
        .or_else(|_| Version::parse(&format!("{}.0", raw)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use tempfile::tempdir;

    fn sample_document() -> DatabaseDocument {
        let record: Record = [
            ("specimen_id".to_string(), FieldValue::from("S_CON")),
            ("frm_h".to_string(), FieldValue::from(1500.0)),
        ]
        .into_iter()
        .collect();

        let now = Utc::now();
        DatabaseDocument {
            config: DocumentConfig {
                field_units: IndexMap::from([
                    ("specimen_id".to_string(), None),
                    ("frm_h".to_string(), Some("mm".to_string())),
                ]),
                field_config: IndexMap::new(),
                version: DOCUMENT_VERSION.to_string(),
                created_date: now,
                last_modified: now,
                compressed: false,
            },
            data: BTreeMap::from([(7, record)]),
            total_entries: 1,
        }
    }

    #[test]
    fn test_paths() {
        let base = Path::new("/data/fresco.v1");
        assert_eq!(Encoding::Plain.path_for(base), Path::new("/data/fresco.v1.json"));
        assert_eq!(Encoding::Gzip.path_for(base), Path::new("/data/fresco.v1.json.gz"));
    }

    #[test]
    fn test_roundtrip_both_encodings() {
        let dir = tempdir().unwrap();
        let document = sample_document();

        for encoding in [Encoding::Plain, Encoding::Gzip] {
            let path = encoding.path_for(&dir.path().join("db"));
            save_document(&document, &path, encoding).unwrap();
            let loaded = load_document(&path, encoding).unwrap();
            assert_eq!(loaded.data, document.data);
            assert_eq!(loaded.config.field_units, document.config.field_units);
        }
    }

    #[test]
    fn test_gzip_file_is_compressed() {
        let dir = tempdir().unwrap();
        let path = Encoding::Gzip.path_for(&dir.path().join("db"));
        save_document(&sample_document(), &path, Encoding::Gzip).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert!(load_document(&path, Encoding::Plain).is_err());
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        save_document(&sample_document(), &path, Encoding::Plain).unwrap();
        assert!(path.exists());
        assert!(!with_suffix(&path, ".tmp").exists());
    }

    #[test]
    fn test_fallback_to_other_encoding() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("db");
        assert!(load_with_fallback(&base, Encoding::Gzip).unwrap().is_none());

        save_document(&sample_document(), &Encoding::Plain.path_for(&base), Encoding::Plain).unwrap();
        let loaded = load_with_fallback(&base, Encoding::Gzip).unwrap().unwrap();
        assert_eq!(loaded.encoding, Encoding::Plain);
        assert_eq!(loaded.document.data.len(), 1);
    }

    #[test]
    fn test_corrupt_preferred_falls_back() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("db");
        fs::write(Encoding::Gzip.path_for(&base), b"not gzip").unwrap();
        save_document(&sample_document(), &Encoding::Plain.path_for(&base), Encoding::Plain).unwrap();

        let loaded = load_with_fallback(&base, Encoding::Gzip).unwrap().unwrap();
        assert_eq!(loaded.path, Encoding::Plain.path_for(&base));
    }

    #[test]
    fn test_corrupt_only_file_is_an_error() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("db");
        fs::write(Encoding::Plain.path_for(&base), b"{ broken").unwrap();
        let err = load_with_fallback(&base, Encoding::Plain).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_legacy_document_shape() {
        let json = r#"{
            "config": {
                "field_units": {"frm_h": "cm", "specimen_id": null},
                "field_config": {
                    "frm_h": {"group": "frame_geometry", "sub_group": "", "unit": "mm",
                              "unit_type": "Length", "data_type": "float", "explanation": "h"}
                },
                "version": "1.0",
                "created_date": "2024-11-05T14:03:27.512345",
                "last_modified": "2024-11-06T09:00:00",
                "compressed": false
            },
            "data": {"12": {"frm_h": 150, "specimen_id": "A"}, "3": {"frm_h": 120.5}},
            "total_entries": 2
        }"#;

        let document: DatabaseDocument = serde_json::from_str(json).unwrap();
        let ids: Vec<EntryId> = document.data.keys().copied().collect();
        assert_eq!(ids, [3, 12]);
        assert_eq!(document.data[&12].number("frm_h"), Some(150.0));
        assert_eq!(document.config.created_date.to_rfc3339(), "2024-11-05T14:03:27.512345+00:00");
        assert!(validate_version(&document.config.version).is_ok());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(DOCUMENT_VERSION).is_ok());
        assert!(validate_version("1.0").is_ok());
        assert!(validate_version("1.4.2").is_ok());
        assert!(validate_version("2.0.0").is_err());
        assert!(validate_version("0.9").is_err());
        assert!(validate_version("latest").is_err());
    }
}
