//! Read-only views of the whole database in caller-chosen units: a flat
//! table (with CSV rendering) and a full document in the persisted shape.
//!
//! Exports never touch stored values. Unknown fields and target units that
//! do not fit a field are skipped and reported as warnings.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::iter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::normalize::convert_value;
use super::{Database, UnitAssignment};
use crate::errors::FrescoResult;
use crate::file_io::{self, DatabaseDocument};
use crate::record::{FieldValue, Record};
use crate::reinforcement::ConversionWarning;

const ID_COLUMN: &str = "entry_id";
const ID_UNIT_LABEL: &str = "ID";
const CSV_LINE_END: &str = "\r\n";

/// What to include in a tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Fields to express in a unit other than the active one
    pub target_units: UnitAssignment,
    /// Restrict the columns to these fields (still in schema order)
    pub fields: Option<Vec<String>>,
    /// Emit a second header row with the unit of every column
    pub include_units_row: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            target_units: UnitAssignment::new(),
            fields: None,
            include_units_row: true,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_unit(mut self, field: impl Into<String>, unit: impl Into<String>) -> Self {
        self.target_units.insert(field.into(), unit.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn units_row(mut self, include: bool) -> Self {
        self.include_units_row = include;
        self
    }
}

/// Flat view of the database: one row per record in ascending id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    /// `entry_id` followed by the exported fields
    pub header: Vec<String>,
    /// `ID` followed by each column's unit (empty for unitless fields)
    pub units: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub warnings: Vec<ConversionWarning>,
}

impl ExportTable {
    /// Index of a column by header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cell of row `row` in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column(name)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// RFC 4180 text: CRLF line ends, cells quoted when they contain a
    /// comma, quote or line break
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let lines = iter::once(&self.header)
            .chain(self.units.as_ref())
            .chain(&self.rows);
        for line in lines {
            let cells: Vec<Cow<'_, str>> = line.iter().map(|cell| csv_escape(cell)).collect();
            out.push_str(&cells.join(","));
            out.push_str(CSV_LINE_END);
        }
        out
    }

    /// Write the CSV text to `path`
    pub fn write_csv(&self, path: &Path) -> FrescoResult<()> {
        file_io::write_atomic(path, self.to_csv().as_bytes())?;
        info!(path = %path.display(), rows = self.rows.len(), columns = self.header.len(), "CSV exported");
        Ok(())
    }
}

fn csv_escape(cell: &str) -> Cow<'_, str> {
    if cell.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

/// The whole database in persisted form, with some fields re-expressed.
#[derive(Debug, Clone)]
pub struct DocumentExport {
    pub document: DatabaseDocument,
    /// Number of values that were converted
    pub conversions: usize,
    pub warnings: Vec<ConversionWarning>,
    /// File the export was written to, if it was written
    pub path: Option<PathBuf>,
}

/// Valid target units and the warnings for the rejected ones
pub(super) struct ResolvedTargets {
    pub units: UnitAssignment,
    pub warnings: Vec<ConversionWarning>,
}

impl Database {
    pub(super) fn resolve_targets(&self, target_units: &UnitAssignment) -> ResolvedTargets {
        let mut resolved = ResolvedTargets {
            units: UnitAssignment::new(),
            warnings: Vec::new(),
        };

        for (field, unit) in target_units {
            let skip = |reason: String| ConversionWarning::Skipped {
                field: field.clone(),
                reason,
            };
            let Some(descriptor) = self.schema.descriptor(field) else {
                resolved.warnings.push(skip("unknown field".to_string()));
                continue;
            };
            match descriptor.family() {
                None => resolved.warnings.push(skip("field has no unit family".to_string())),
                Some(family) if !family.contains(unit) => {
                    resolved
                        .warnings
                        .push(skip(format!("'{}' is not a {} unit", unit, family)));
                }
                Some(_) => {
                    resolved.units.insert(field.clone(), unit.clone());
                }
            }
        }
        resolved
    }

    /// Copy of `record` with every targeted field converted from its active
    /// unit. Returns the copy and the number of converted values.
    pub(super) fn convert_record(
        &self,
        record: &Record,
        targets: &UnitAssignment,
        warnings: &mut Vec<ConversionWarning>,
    ) -> FrescoResult<(Record, usize)> {
        let normalizer = self.normalizer();
        let mut converted = record.clone();
        let mut count = 0;

        for (field, to_unit) in targets {
            let Some(descriptor) = self.schema.descriptor(field) else {
                continue;
            };
            let Some(from_unit) = normalizer.active_unit(descriptor) else {
                continue;
            };
            let Some(value) = converted.get_mut(field) else {
                continue;
            };

            let conversion = convert_value(descriptor, value, from_unit, to_unit)?;
            if conversion.kind.is_some() {
                count += 1;
            }
            warnings.extend(conversion.warnings);
            *value = conversion.value;
        }

        Ok((converted, count))
    }

    /// Flat table of every record, optionally restricted to some fields and
    /// with some fields expressed in other units.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fresco_core::database::{Database, ExportOptions};
    /// use fresco_core::record::RecordInput;
    /// use fresco_core::schema::rc_frame_schema;
    ///
    /// let mut db = Database::in_memory(rc_frame_schema().unwrap());
    /// db.insert(1, RecordInput::new().value("fc", 22.1), false).unwrap();
    ///
    /// let table = db
    ///     .export_table(&ExportOptions::new().fields(["fc"]).target_unit("fc", "kPa"))
    ///     .unwrap();
    /// assert_eq!(table.cell(0, "fc"), Some("22100"));
    /// assert_eq!(db.record(1).unwrap().number("fc"), Some(22.1));
    /// ```
    pub fn export_table(&self, options: &ExportOptions) -> FrescoResult<ExportTable> {
        let mut targets = self.resolve_targets(&options.target_units);

        let fields: Vec<&str> = match &options.fields {
            None => self.schema.field_names().collect(),
            Some(selection) => {
                for name in selection.iter().filter(|name| !self.schema.contains(name)) {
                    targets.warnings.push(ConversionWarning::Skipped {
                        field: name.clone(),
                        reason: "unknown field".to_string(),
                    });
                }
                self.schema
                    .field_names()
                    .filter(|name| selection.iter().any(|s| s.as_str() == *name))
                    .collect()
            }
        };

        let header = iter::once(ID_COLUMN)
            .chain(fields.iter().copied())
            .map(str::to_string)
            .collect();

        let units = options.include_units_row.then(|| {
            iter::once(ID_UNIT_LABEL.to_string())
                .chain(fields.iter().map(|field| {
                    targets
                        .units
                        .get(*field)
                        .map(String::as_str)
                        .or_else(|| self.field_unit(field))
                        .unwrap_or_default()
                        .to_string()
                }))
                .collect()
        });

        let mut rows = Vec::with_capacity(self.len());
        let mut conversions = 0;
        for (id, record) in self.records() {
            let (converted, count) = self.convert_record(record, &targets.units, &mut targets.warnings)?;
            conversions += count;

            let row: Vec<String> = iter::once(id.to_string())
                .chain(
                    fields
                        .iter()
                        .map(|field| converted.get(field).map(FieldValue::to_cell).unwrap_or_default()),
                )
                .collect();
            rows.push(row);
        }

        info!(
            rows = rows.len(),
            columns = fields.len(),
            conversions,
            warnings = targets.warnings.len(),
            "table exported"
        );
        Ok(ExportTable {
            header,
            units,
            rows,
            warnings: targets.warnings,
        })
    }

    /// Copy of the persisted document with the targeted fields expressed in
    /// other units; the document's `field_units` name the exported units.
    pub fn export_document(&self, target_units: &UnitAssignment) -> FrescoResult<DocumentExport> {
        let mut targets = self.resolve_targets(target_units);

        let mut data = BTreeMap::new();
        let mut conversions = 0;
        for (id, record) in self.records() {
            let (converted, count) = self.convert_record(record, &targets.units, &mut targets.warnings)?;
            conversions += count;
            data.insert(id, converted);
        }

        let mut field_units = self.field_units.clone();
        for (field, unit) in &targets.units {
            field_units.insert(field.clone(), Some(unit.clone()));
        }

        Ok(DocumentExport {
            document: self.build_document(data, field_units, self.modified),
            conversions,
            warnings: targets.warnings,
            path: None,
        })
    }

    /// [`export_document`](Self::export_document) written under the base
    /// path `base` in the database's configured encoding.
    pub fn export_document_to(&self, base: &Path, target_units: &UnitAssignment) -> FrescoResult<DocumentExport> {
        let mut export = self.export_document(target_units)?;
        let encoding = self.options.encoding();
        let path = encoding.path_for(base);

        file_io::save_document(&export.document, &path, encoding)?;
        info!(
            path = %path.display(),
            entries = export.document.total_entries,
            conversions = export.conversions,
            "database exported"
        );
        export.path = Some(path);
        Ok(export)
    }
}
