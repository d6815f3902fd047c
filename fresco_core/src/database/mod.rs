//! # Record Store
//!
//! [`Database`] keeps specimen records keyed by integer id, together with the
//! active unit of every field. Every value is stored in its field's active
//! unit, so records entered in different units stay directly comparable.
//!
//! ## Lifecycle
//!
//! ```text
//! open/load ──> empty or loaded ──insert/update/remove/migrate──> dirty ──save──> persisted
//! ```
//!
//! With `auto_save` every mutation is followed by a save, and a failed save
//! undoes the mutation. Unit migration is all-or-nothing as well: the
//! converted record set is persisted before it replaces the in-memory state.
//!
//! ## Example
//!
//! ```rust
//! use fresco_core::database::Database;
//! use fresco_core::record::RecordInput;
//! use fresco_core::schema::rc_frame_schema;
//!
//! let mut db = Database::in_memory(rc_frame_schema().unwrap());
//!
//! let report = db
//!     .insert(1, RecordInput::new().value("specimen_id", "S_CON").quantity("col_h", 20, "cm"), false)
//!     .unwrap();
//! assert_eq!(report.conversions.len(), 1);
//! assert_eq!(db.record(1).unwrap().number("col_h"), Some(200.0));
//! ```

mod export;
mod normalize;

pub use export::{DocumentExport, ExportOptions, ExportTable};
pub use normalize::{DropReason, DroppedField, FieldConversion};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::errors::{FrescoError, FrescoResult};
use crate::file_io::{self, DatabaseDocument, DocumentConfig, Encoding, DOCUMENT_VERSION};
use crate::record::{EntryId, Record, RecordInput};
use crate::reinforcement::ConversionWarning;
use crate::schema::FieldSchema;
use crate::units::UnitFamily;

use normalize::{convert_value, ConversionKind, NormalizedInput, Normalizer};

/// Field name to unit name
pub type UnitAssignment = IndexMap<String, String>;

/// Fields consulted, in order, for the unit of frame geometry
const PRIMARY_LENGTH_FIELDS: [&str; 4] = ["frm_h", "frm_l", "col_h", "col_d"];

const FALLBACK_LENGTH_UNIT: &str = "mm";

// ============================================================================
// Options & Reports
// ============================================================================

/// How a database is stored and how chatty it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    /// Base path without extension (`fresco_db` -> `fresco_db.json.gz`);
    /// `None` keeps the database in memory only
    pub path: Option<PathBuf>,

    /// Save gzip-compressed and prefer the compressed file on load
    pub compress: bool,

    /// Save after every mutation
    pub auto_save: bool,

    /// Log each unit conversion at debug level
    pub log_conversions: bool,

    /// Log each dropped input field at warn level
    pub log_dropped_fields: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        DatabaseOptions {
            path: None,
            compress: true,
            auto_save: true,
            log_conversions: true,
            log_dropped_fields: true,
        }
    }
}

impl DatabaseOptions {
    /// Default options for a database stored under `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        DatabaseOptions {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    pub fn encoding(&self) -> Encoding {
        Encoding::from_compress(self.compress)
    }

    /// File the database is saved to
    pub fn file_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(|base| self.encoding().path_for(base))
    }
}

/// What an insert or update did to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestAction {
    Added,
    Overwritten,
    Updated,
}

/// Outcome of an insert or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub id: EntryId,
    pub action: IngestAction,
    /// Input fields that were not stored
    pub dropped: Vec<DroppedField>,
    /// Numeric values converted to the active unit
    pub conversions: Vec<FieldConversion>,
    /// Reinforcement notation converted to the active unit
    pub notation_conversions: Vec<FieldConversion>,
    /// Fields filled from schema defaults
    pub backfilled: Vec<String>,
    pub warnings: Vec<ConversionWarning>,
}

impl IngestReport {
    fn new(id: EntryId, action: IngestAction, normalized: NormalizedInput) -> Self {
        IngestReport {
            id,
            action,
            dropped: normalized.dropped,
            conversions: normalized.conversions,
            notation_conversions: normalized.notation_conversions,
            backfilled: Vec::new(),
            warnings: normalized.warnings,
        }
    }
}

/// One field whose active unit changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitChange {
    pub field: String,
    pub from: String,
    pub to: String,
}

/// Outcome of a unit migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub changes: Vec<UnitChange>,
    pub conversions: usize,
    pub notation_conversions: usize,
    pub warnings: Vec<ConversionWarning>,
    /// Whether the migrated state was written to disk
    pub persisted: bool,
}

/// Summary of a database.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub name: String,
    pub total_entries: usize,
    pub total_fields: usize,
    pub fields_with_units: usize,
    pub notation_fields: Vec<String>,
    pub version: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Family -> unit -> number of fields currently in that unit
    pub unit_summary: IndexMap<String, IndexMap<String, usize>>,
    pub available_families: Vec<&'static str>,
}

// ============================================================================
// Database
// ============================================================================

/// Schema-driven, unit-aware specimen store.
#[derive(Debug)]
pub struct Database {
    options: DatabaseOptions,
    schema: Arc<FieldSchema>,
    records: BTreeMap<EntryId, Record>,
    field_units: IndexMap<String, Option<String>>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    dirty: bool,
}

impl Database {
    fn empty(options: DatabaseOptions, schema: Arc<FieldSchema>) -> Self {
        let now = Utc::now();
        Database {
            field_units: schema.default_units(),
            options,
            schema,
            records: BTreeMap::new(),
            created: now,
            modified: now,
            dirty: false,
        }
    }

    /// Database with no backing file
    pub fn in_memory(schema: Arc<FieldSchema>) -> Self {
        Database::empty(
            DatabaseOptions {
                auto_save: false,
                ..Default::default()
            },
            schema,
        )
    }

    /// Open the database at `options.path`, starting empty when no file
    /// exists or the stored file cannot be read.
    ///
    /// After a failed load auto-save is switched off, so the unreadable file
    /// is only replaced by an explicit [`save`](Self::save).
    pub fn open(options: DatabaseOptions, schema: Arc<FieldSchema>) -> Self {
        let fallback = options.clone();
        match Database::load(options, schema.clone()) {
            Ok(db) => db,
            Err(e) => {
                error!(
                    path = ?fallback.path,
                    error = %e,
                    "failed to load database, starting empty with auto-save off"
                );
                Database::empty(fallback.auto_save(false), schema)
            }
        }
    }

    /// Open the database at `options.path`, failing on unreadable files.
    ///
    /// A missing file is not an error: the database starts empty.
    pub fn load(options: DatabaseOptions, schema: Arc<FieldSchema>) -> FrescoResult<Self> {
        let Some(base) = options.path.clone() else {
            return Ok(Database::empty(options, schema));
        };

        let loaded = file_io::load_with_fallback(&base, options.encoding())?;
        let mut db = Database::empty(options, schema);
        match loaded {
            Some(loaded) => {
                db.apply_document(loaded.document);
                info!(
                    path = %loaded.path.display(),
                    entries = db.len(),
                    "database loaded"
                );
            }
            None => info!(path = %base.display(), "no database file, starting empty"),
        }
        Ok(db)
    }

    /// Adopt a loaded document, keeping only units valid for the schema
    fn apply_document(&mut self, document: DatabaseDocument) {
        for (field, unit) in document.config.field_units {
            let Some(descriptor) = self.schema.descriptor(&field) else {
                warn!(field = %field, "ignoring stored unit of unknown field");
                continue;
            };
            match (descriptor.family(), unit) {
                (Some(family), Some(unit)) if family.contains(&unit) => {
                    self.field_units.insert(field, Some(unit));
                }
                (None, None) => {}
                (_, unit) => warn!(field = %field, unit = ?unit, "ignoring stored unit not valid for field"),
            }
        }
        self.records = document.data;
        self.created = document.config.created_date;
        self.modified = document.config.last_modified;
        self.dirty = false;
    }

    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    fn normalizer(&self) -> Normalizer<'_> {
        Normalizer {
            schema: &self.schema,
            field_units: &self.field_units,
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Store a complete record under `id`.
    ///
    /// Input fields are normalized to the active units; every schema field
    /// the input lacks is filled with its default, and the record is kept in
    /// schema order. With `overwrite`, an existing record is replaced
    /// entirely.
    ///
    /// # Errors
    ///
    /// * `EntryExists` - `id` is taken and `overwrite` is false
    /// * `FileError` - the auto-save failed; the record was not stored
    pub fn insert(&mut self, id: EntryId, input: RecordInput, overwrite: bool) -> FrescoResult<IngestReport> {
        let exists = self.records.contains_key(&id);
        if exists && !overwrite {
            return Err(FrescoError::EntryExists { id });
        }
        let action = if exists {
            IngestAction::Overwritten
        } else {
            IngestAction::Added
        };

        let normalizer = self.normalizer();
        let normalized = normalizer.normalize(input)?;
        let mut record: Record = normalized.values.iter().cloned().collect();

        let mut backfilled = Vec::new();
        for descriptor in self.schema.descriptors() {
            if !record.contains(&descriptor.name) {
                record.insert(descriptor.name.clone(), normalizer.default_value(descriptor)?);
                backfilled.push(descriptor.name.clone());
            }
        }
        record.retain_ordered(|name| self.schema.position(name));

        let mut report = IngestReport::new(id, action, normalized);
        report.backfilled = backfilled;

        let previous = self.records.insert(id, record);
        self.commit(id, previous)?;
        self.log_ingest(&report);
        Ok(report)
    }

    /// Merge normalized fields into the record stored under `id`.
    ///
    /// # Errors
    ///
    /// * `EntryNotFound` - no record under `id`
    /// * `FileError` - the auto-save failed; the record is unchanged
    pub fn update(&mut self, id: EntryId, input: RecordInput) -> FrescoResult<IngestReport> {
        if !self.records.contains_key(&id) {
            return Err(FrescoError::EntryNotFound { id });
        }

        let normalized = self.normalizer().normalize(input)?;
        let mut record = self
            .records
            .get(&id)
            .cloned()
            .ok_or(FrescoError::EntryNotFound { id })?;
        for (field, value) in &normalized.values {
            record.insert(field.clone(), value.clone());
        }
        record.retain_ordered(|name| self.schema.position(name));

        let report = IngestReport::new(id, IngestAction::Updated, normalized);
        let previous = self.records.insert(id, record);
        self.commit(id, previous)?;
        self.log_ingest(&report);
        Ok(report)
    }

    /// Delete and return the record under `id`.
    ///
    /// # Errors
    ///
    /// * `EntryNotFound` - no record under `id`
    /// * `FileError` - the auto-save failed; the record is still stored
    pub fn remove(&mut self, id: EntryId) -> FrescoResult<Record> {
        let record = self
            .records
            .remove(&id)
            .ok_or(FrescoError::EntryNotFound { id })?;
        self.commit(id, Some(record.clone()))?;
        info!(id, "entry removed");
        Ok(record)
    }

    /// Change the active unit of the given fields, converting every stored
    /// value of those fields.
    ///
    /// The whole assignment is validated before anything changes. Values are
    /// converted on a copy of the record set; with `auto_save` the copy is
    /// persisted first and only then replaces the in-memory state, so a
    /// failed save leaves the database as it was.
    ///
    /// # Errors
    ///
    /// * `UnknownField` - a field the schema does not declare
    /// * `InvalidInput` - a field without a unit family
    /// * `UnknownUnit` - a unit outside the field's family
    /// * `FileError` - the migrated database could not be saved
    pub fn migrate_units(&mut self, assignment: &UnitAssignment) -> FrescoResult<MigrationReport> {
        let mut report = MigrationReport::default();

        for (field, unit) in assignment {
            let descriptor = self
                .schema
                .descriptor(field)
                .ok_or_else(|| FrescoError::unknown_field(field))?;
            let family = descriptor
                .family()
                .ok_or_else(|| FrescoError::invalid_input(field, unit, "field has no unit family"))?;
            family.require(unit)?;

            let current = self.normalizer().active_unit(descriptor).unwrap_or(family.base_unit());
            if current != unit.as_str() {
                report.changes.push(UnitChange {
                    field: field.clone(),
                    from: current.to_string(),
                    to: unit.clone(),
                });
            }
        }

        if report.changes.is_empty() {
            debug!("unit migration requested with no changes");
            return Ok(report);
        }

        let mut records = self.records.clone();
        for (id, record) in records.iter_mut() {
            for change in &report.changes {
                let Some(value) = record.get_mut(&change.field) else {
                    continue;
                };
                let Some(descriptor) = self.schema.descriptor(&change.field) else {
                    continue;
                };
                let conversion = convert_value(descriptor, value, &change.from, &change.to)?;
                match conversion.kind {
                    Some(ConversionKind::Numeric) => report.conversions += 1,
                    Some(ConversionKind::Notation) => report.notation_conversions += 1,
                    None => {}
                }
                if self.options.log_conversions && conversion.kind.is_some() {
                    debug!(
                        id = *id,
                        field = %change.field,
                        "{} {} -> {} {}",
                        value,
                        change.from,
                        conversion.value,
                        change.to
                    );
                }
                report.warnings.extend(conversion.warnings);
                *value = conversion.value;
            }
        }

        let mut field_units = self.field_units.clone();
        for change in &report.changes {
            field_units.insert(change.field.clone(), Some(change.to.clone()));
        }
        let modified = Utc::now();

        match self.save_target() {
            Some((path, encoding)) => {
                let document = self.build_document(records, field_units, modified);
                file_io::save_document(&document, &path, encoding)?;
                self.records = document.data;
                self.field_units = document.config.field_units;
                self.dirty = false;
                report.persisted = true;
            }
            None => {
                self.records = records;
                self.field_units = field_units;
                self.dirty = true;
            }
        }
        self.modified = modified;

        info!(
            fields = report.changes.len(),
            conversions = report.conversions,
            notation_conversions = report.notation_conversions,
            "field units migrated"
        );
        Ok(report)
    }

    fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Finish a change to the record under `id`, auto-saving when enabled.
    ///
    /// `previous` is what was stored under `id` before the change. If the
    /// save fails it is put back, so the database is left as it was.
    fn commit(&mut self, id: EntryId, previous: Option<Record>) -> FrescoResult<()> {
        let (modified, dirty) = (self.modified, self.dirty);
        self.touch();
        self.dirty = true;
        if self.save_target().is_none() {
            return Ok(());
        }

        if let Err(e) = self.save() {
            match previous {
                Some(record) => self.records.insert(id, record),
                None => self.records.remove(&id),
            };
            self.modified = modified;
            self.dirty = dirty;
            warn!(id, error = %e, "save failed, change rolled back");
            return Err(e);
        }
        Ok(())
    }

    /// Where an automatic save would go, if auto-save applies
    fn save_target(&self) -> Option<(PathBuf, Encoding)> {
        if !self.options.auto_save {
            return None;
        }
        self.options.file_path().map(|path| (path, self.options.encoding()))
    }

    fn log_ingest(&self, report: &IngestReport) {
        let verb = match report.action {
            IngestAction::Added => "entry added",
            IngestAction::Overwritten => "entry overwritten",
            IngestAction::Updated => "entry updated",
        };
        info!(
            id = report.id,
            dropped = report.dropped.len(),
            conversions = report.conversions.len() + report.notation_conversions.len(),
            backfilled = report.backfilled.len(),
            "{}",
            verb
        );

        if self.options.log_conversions {
            for c in report.conversions.iter().chain(&report.notation_conversions) {
                debug!(
                    id = report.id,
                    field = %c.field,
                    "{} {} -> {} {}",
                    c.original,
                    c.from_unit,
                    c.converted,
                    c.to_unit
                );
            }
        }
        if self.options.log_dropped_fields {
            for d in &report.dropped {
                warn!(id = report.id, field = %d.field, reason = %d.reason, "input field dropped");
            }
        }
        for w in &report.warnings {
            warn!(id = report.id, "{}", w);
        }
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Write the database to its file in the configured encoding.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// * `FileError` - no backing path, or the write failed
    pub fn save(&mut self) -> FrescoResult<PathBuf> {
        let path = self
            .options
            .file_path()
            .ok_or_else(|| FrescoError::file_error("save", "<memory>", "database has no backing path"))?;

        let document = self.to_document();
        file_io::save_document(&document, &path, self.options.encoding())?;
        self.dirty = false;

        info!(
            path = %path.display(),
            entries = document.total_entries,
            compressed = self.options.compress,
            "database saved"
        );
        Ok(path)
    }

    /// Unsaved changes exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persisted form of the current state
    pub fn to_document(&self) -> DatabaseDocument {
        self.build_document(self.records.clone(), self.field_units.clone(), self.modified)
    }

    fn build_document(
        &self,
        data: BTreeMap<EntryId, Record>,
        field_units: IndexMap<String, Option<String>>,
        last_modified: DateTime<Utc>,
    ) -> DatabaseDocument {
        DatabaseDocument {
            config: DocumentConfig {
                field_units,
                field_config: self.schema.config_table(),
                version: DOCUMENT_VERSION.to_string(),
                created_date: self.created,
                last_modified,
                compressed: self.options.compress,
            },
            total_entries: data.len(),
            data,
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn record(&self, id: EntryId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Records in ascending id order
    pub fn records(&self) -> impl Iterator<Item = (EntryId, &Record)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.records.keys().copied()
    }

    /// Active unit of a field (`None` for unitless or unknown fields)
    pub fn field_unit(&self, field: &str) -> Option<&str> {
        self.field_units.get(field).and_then(|unit| unit.as_deref())
    }

    pub fn field_units(&self) -> &IndexMap<String, Option<String>> {
        &self.field_units
    }

    /// Unit of the frame geometry: the active unit of the first dimensioned
    /// primary geometry field, `mm` when none is set
    pub fn length_unit(&self) -> &str {
        PRIMARY_LENGTH_FIELDS
            .iter()
            .find_map(|field| self.field_unit(field))
            .unwrap_or(FALLBACK_LENGTH_UNIT)
    }

    /// Copy of one record with the given fields expressed in other units.
    ///
    /// Invalid targets are skipped and reported as warnings.
    pub fn record_in_units(
        &self,
        id: EntryId,
        target_units: &UnitAssignment,
    ) -> FrescoResult<(Record, Vec<ConversionWarning>)> {
        let record = self.record(id).ok_or(FrescoError::EntryNotFound { id })?;
        let mut targets = self.resolve_targets(target_units);
        let (converted, _) = self.convert_record(record, &targets.units, &mut targets.warnings)?;
        Ok((converted, targets.warnings))
    }

    pub fn info(&self) -> DatabaseInfo {
        let mut unit_summary: IndexMap<String, IndexMap<String, usize>> = IndexMap::new();
        for descriptor in self.schema.descriptors() {
            let Some(family) = descriptor.family() else {
                continue;
            };
            let unit = self
                .field_unit(&descriptor.name)
                .or_else(|| descriptor.default_unit())
                .unwrap_or(family.base_unit());
            *unit_summary
                .entry(family.name().to_string())
                .or_default()
                .entry(unit.to_string())
                .or_default() += 1;
        }

        DatabaseInfo {
            name: self
                .options
                .path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string()),
            total_entries: self.len(),
            total_fields: self.schema.len(),
            fields_with_units: self.field_units.values().filter(|u| u.is_some()).count(),
            notation_fields: self.schema.notation_fields().map(str::to_string).collect(),
            version: DOCUMENT_VERSION.to_string(),
            created: self.created,
            last_modified: self.modified,
            unit_summary,
            available_families: UnitFamily::ALL.iter().map(|f| f.name()).collect(),
        }
    }

    /// Path the database would be saved to
    pub fn file_path(&self) -> Option<PathBuf> {
        self.options.file_path()
    }

    /// Base path of the database, if it is file-backed
    pub fn base_path(&self) -> Option<&Path> {
        self.options.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::schema::rc_frame_schema;
    use tempfile::tempdir;

    fn memory_db() -> Database {
        Database::in_memory(rc_frame_schema().unwrap())
    }

    #[test]
    fn test_insert_backfills_and_orders() {
        let mut db = memory_db();
        let report = db
            .insert(3, RecordInput::new().value("fc", 30.0).value("specimen_id", "S3"), false)
            .unwrap();

        assert_eq!(report.action, IngestAction::Added);
        assert_eq!(report.backfilled.len(), db.schema().len() - 2);

        let record = db.record(3).unwrap();
        assert_eq!(record.len(), db.schema().len());
        let order: Vec<&str> = record.field_names().collect();
        let schema_order: Vec<&str> = db.schema().field_names().collect();
        assert_eq!(order, schema_order);
        assert!(db.is_dirty());
    }

    #[test]
    fn test_insert_existing_without_overwrite_fails() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("fc", 30.0), false).unwrap();

        let err = db.insert(1, RecordInput::new().value("fc", 45.0), false).unwrap_err();
        assert_eq!(err, FrescoError::EntryExists { id: 1 });
        assert_eq!(db.record(1).unwrap().number("fc"), Some(30.0));
    }

    #[test]
    fn test_overwrite_is_full_replace() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("fc", 30.0).value("fy", 420.0), false)
            .unwrap();
        let report = db.insert(1, RecordInput::new().value("fc", 45.0), true).unwrap();

        assert_eq!(report.action, IngestAction::Overwritten);
        let record = db.record(1).unwrap();
        assert_eq!(record.number("fc"), Some(45.0));
        assert_eq!(record.get("fy"), db.schema().default_value("fy"));
    }

    #[test]
    fn test_update_merges() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("fc", 30.0).value("specimen_id", "A"), false)
            .unwrap();
        let report = db
            .update(1, RecordInput::new().quantity("fc", 4.0, "ksi").unspecified("specimen_id"))
            .unwrap();

        assert_eq!(report.action, IngestAction::Updated);
        assert_eq!(report.dropped.len(), 1);
        assert!(report.backfilled.is_empty());

        let record = db.record(1).unwrap();
        assert_eq!(record.text("specimen_id"), Some("A"));
        let fc = record.number("fc").unwrap();
        assert!((fc - 27.579029172673).abs() < 1e-9);
    }

    #[test]
    fn test_update_keeps_schema_order() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("specimen_id", "A"), false).unwrap();
        db.update(
            1,
            RecordInput::new()
                .value("comments", "retrofit")
                .value("fc", 28.0)
                .value("specimen_id", "A2"),
        )
        .unwrap();

        let record = db.record(1).unwrap();
        let order: Vec<&str> = record.field_names().collect();
        let schema_order: Vec<&str> = db.schema().field_names().collect();
        assert_eq!(order, schema_order);
        assert_eq!(record.text("comments"), Some("retrofit"));
    }

    /// Database saved to `dir/db.json` whose next save fails because the
    /// temp file path is taken by a directory
    fn db_with_blocked_save(dir: &Path) -> (Database, PathBuf) {
        let options = DatabaseOptions::at(dir.join("db")).compress(false);
        let mut db = Database::open(options, rc_frame_schema().unwrap());
        db.insert(1, RecordInput::new().value("frm_h", 1500.0).value("specimen_id", "A"), false)
            .unwrap();
        let blocker = dir.join("db.json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        (db, blocker)
    }

    #[test]
    fn test_failed_save_rolls_back_mutations() {
        let dir = tempdir().unwrap();
        let (mut db, blocker) = db_with_blocked_save(dir.path());
        assert!(!db.is_dirty());

        let err = db.insert(2, RecordInput::new(), false).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!db.contains(2));
        // Retrying hits the same save error, not EntryExists
        assert_eq!(db.insert(2, RecordInput::new(), false).unwrap_err().error_code(), "FILE_ERROR");

        assert!(db.insert(1, RecordInput::new(), true).is_err());
        assert!(db.update(1, RecordInput::new().value("specimen_id", "B")).is_err());
        assert_eq!(db.record(1).unwrap().text("specimen_id"), Some("A"));
        assert_eq!(db.record(1).unwrap().number("frm_h"), Some(1500.0));

        assert!(db.remove(1).is_err());
        assert!(db.contains(1));
        assert!(!db.is_dirty());

        std::fs::remove_dir(&blocker).unwrap();
        db.insert(2, RecordInput::new(), false).unwrap();
        let reopened = Database::load(db.options().clone(), rc_frame_schema().unwrap()).unwrap();
        assert_eq!(reopened.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_failed_save_leaves_migration_undone() {
        let dir = tempdir().unwrap();
        let (mut db, _blocker) = db_with_blocked_save(dir.path());

        let assignment = UnitAssignment::from([("frm_h".to_string(), "cm".to_string())]);
        assert_eq!(db.migrate_units(&assignment).unwrap_err().error_code(), "FILE_ERROR");
        assert_eq!(db.field_unit("frm_h"), Some("mm"));
        assert_eq!(db.record(1).unwrap().number("frm_h"), Some(1500.0));
        assert!(!db.is_dirty());
    }

    #[test]
    fn test_update_and_remove_missing_fail() {
        let mut db = memory_db();
        assert_eq!(
            db.update(9, RecordInput::new()).unwrap_err(),
            FrescoError::EntryNotFound { id: 9 }
        );
        assert_eq!(db.remove(9).unwrap_err(), FrescoError::EntryNotFound { id: 9 });
    }

    #[test]
    fn test_remove_returns_record() {
        let mut db = memory_db();
        db.insert(4, RecordInput::new().value("specimen_id", "gone"), false).unwrap();
        let removed = db.remove(4).unwrap();
        assert_eq!(removed.text("specimen_id"), Some("gone"));
        assert!(!db.contains(4));
        assert!(db.is_empty());
    }

    #[test]
    fn test_migration_validates_before_changing() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("frm_h", 1500.0), false).unwrap();

        let assignment = UnitAssignment::from([
            ("frm_h".to_string(), "cm".to_string()),
            ("fc".to_string(), "cm".to_string()),
        ]);
        let err = db.migrate_units(&assignment).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_UNIT");
        assert_eq!(db.field_unit("frm_h"), Some("mm"));
        assert_eq!(db.record(1).unwrap().number("frm_h"), Some(1500.0));

        let unitless = UnitAssignment::from([("specimen_id".to_string(), "mm".to_string())]);
        assert_eq!(db.migrate_units(&unitless).unwrap_err().error_code(), "INVALID_INPUT");

        let unknown = UnitAssignment::from([("nope".to_string(), "mm".to_string())]);
        assert_eq!(db.migrate_units(&unknown).unwrap_err().error_code(), "UNKNOWN_FIELD");
    }

    #[test]
    fn test_migration_converts_notation() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("col_trans_mid_reinf", "#10@150"), false)
            .unwrap();

        let assignment = UnitAssignment::from([("col_trans_mid_reinf".to_string(), "cm".to_string())]);
        let report = db.migrate_units(&assignment).unwrap();
        assert_eq!(report.notation_conversions, 1);
        assert!(!report.persisted);
        assert_eq!(db.record(1).unwrap().text("col_trans_mid_reinf"), Some("#1@15"));

        // Same assignment again is a no-op
        let again = db.migrate_units(&assignment).unwrap();
        assert!(again.changes.is_empty());
    }

    #[test]
    fn test_migration_persists_with_auto_save() {
        let dir = tempdir().unwrap();
        let options = DatabaseOptions::at(dir.path().join("db")).compress(false);
        let mut db = Database::open(options.clone(), rc_frame_schema().unwrap());
        db.insert(1, RecordInput::new().value("frm_h", 1500.0), false).unwrap();

        let report = db
            .migrate_units(&UnitAssignment::from([("frm_h".to_string(), "m".to_string())]))
            .unwrap();
        assert!(report.persisted);
        assert!(!db.is_dirty());

        let reopened = Database::load(options, rc_frame_schema().unwrap()).unwrap();
        assert_eq!(reopened.field_unit("frm_h"), Some("m"));
        assert_eq!(reopened.record(1).unwrap().number("frm_h"), Some(1.5));
    }

    #[test]
    fn test_length_unit() {
        let mut db = memory_db();
        assert_eq!(db.length_unit(), "mm");
        db.migrate_units(&UnitAssignment::from([("frm_h".to_string(), "in".to_string())]))
            .unwrap();
        assert_eq!(db.length_unit(), "in");
    }

    #[test]
    fn test_record_in_units_leaves_store_untouched() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new().value("fc", 22.1).value("col_h", 200.0), false)
            .unwrap();

        let targets = UnitAssignment::from([
            ("fc".to_string(), "kPa".to_string()),
            ("col_h".to_string(), "MPa".to_string()),
        ]);
        let (converted, warnings) = db.record_in_units(1, &targets).unwrap();
        assert_eq!(converted.number("fc"), Some(22100.0));
        assert_eq!(converted.number("col_h"), Some(200.0));
        assert_eq!(warnings.len(), 1);
        assert_eq!(db.record(1).unwrap().number("fc"), Some(22.1));

        assert!(db.record_in_units(2, &targets).is_err());
    }

    #[test]
    fn test_info() {
        let mut db = memory_db();
        db.insert(1, RecordInput::new(), false).unwrap();
        let info = db.info();

        assert_eq!(info.total_entries, 1);
        assert_eq!(info.total_fields, 118);
        assert_eq!(info.notation_fields.len(), 25);
        assert_eq!(info.fields_with_units, 92);
        assert_eq!(info.unit_summary["Length"]["mm"], 66);
        assert_eq!(info.unit_summary["Pressure"]["MPa"], 9);
        assert!(info.available_families.contains(&"Temperature"));
    }

    #[test]
    fn test_save_requires_path() {
        let mut db = memory_db();
        assert_eq!(db.save().unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_open_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let options = DatabaseOptions::at(dir.path().join("db"));
        std::fs::write(options.file_path().unwrap(), b"garbage").unwrap();

        assert!(Database::load(options.clone(), rc_frame_schema().unwrap()).is_err());
        let db = Database::open(options, rc_frame_schema().unwrap());
        assert!(db.is_empty());
        assert!(!db.is_dirty());
        assert!(!db.options().auto_save);
    }

    #[test]
    fn test_open_newer_version_does_not_overwrite_file() {
        let dir = tempdir().unwrap();
        let options = DatabaseOptions::at(dir.path().join("db")).compress(false);
        let path = options.file_path().unwrap();
        let mut db = Database::open(options.clone(), rc_frame_schema().unwrap());
        db.insert(1, RecordInput::new(), false).unwrap();
        db.insert(2, RecordInput::new(), false).unwrap();

        let mut document = db.to_document();
        document.config.version = "2.0.0".to_string();
        file_io::save_document(&document, &path, Encoding::Plain).unwrap();

        let mut reopened = Database::open(options, rc_frame_schema().unwrap());
        assert!(reopened.is_empty());
        reopened.insert(9, RecordInput::new(), false).unwrap();
        assert!(reopened.is_dirty());

        let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["total_entries"], 2);
        assert_eq!(on_disk["config"]["version"], "2.0.0");
    }

    #[test]
    fn test_loaded_units_are_validated() {
        let dir = tempdir().unwrap();
        let options = DatabaseOptions::at(dir.path().join("db")).auto_save(false);
        let mut db = Database::open(options.clone(), rc_frame_schema().unwrap());
        db.insert(1, RecordInput::new().value("specimen_id", "S"), false).unwrap();

        let mut document = db.to_document();
        document.config.field_units.insert("frm_h".to_string(), Some("kPa".to_string()));
        document.config.field_units.insert("col_h".to_string(), Some("cm".to_string()));
        document.config.field_units.insert("ghost".to_string(), Some("mm".to_string()));
        file_io::save_document(&document, &options.file_path().unwrap(), options.encoding()).unwrap();

        let loaded = Database::load(options, rc_frame_schema().unwrap()).unwrap();
        assert_eq!(loaded.field_unit("frm_h"), Some("mm"));
        assert_eq!(loaded.field_unit("col_h"), Some("cm"));
        assert_eq!(loaded.field_unit("ghost"), None);
        assert_eq!(loaded.record(1).unwrap().get("specimen_id"), Some(&FieldValue::from("S")));
    }
}
