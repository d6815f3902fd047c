//! # Field Schema
//!
//! Declarative description of every record field: its group, the unit it is
//! stored in by default, the unit family that unit belongs to, and the kind
//! of value it holds. A schema pairs that descriptor table with a table of
//! default ("empty") values and refuses to build unless the two describe
//! exactly the same fields.
//!
//! A schema is immutable once built and is handed to each
//! [`Database`](crate::database::Database) as an `Arc`, so differently
//! configured stores can coexist in one process.
//!
//! ## Example
//!
//! ```rust
//! use fresco_core::schema::{rc_frame_schema, ValueType};
//! use fresco_core::units::UnitFamily;
//!
//! let schema = rc_frame_schema().unwrap();
//! let col_h = schema.descriptor("col_h").unwrap();
//! assert_eq!(col_h.family(), Some(UnitFamily::Length));
//! assert_eq!(col_h.default_unit(), Some("mm"));
//!
//! let corner = schema.descriptor("col_long_reinf_corner").unwrap();
//! assert_eq!(corner.value_type, ValueType::Notation);
//! ```

mod rc_frame;

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::errors::{FrescoError, FrescoResult};
use crate::record::{FieldValue, Record};
use crate::reinforcement::parse_notation;
use crate::units::UnitFamily;

// ============================================================================
// Descriptors
// ============================================================================

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Free text, identifiers, enumerations
    #[serde(rename = "str")]
    Text,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "float")]
    Real,
    /// Compound reinforcement notation with embedded lengths
    #[serde(rename = "notation")]
    Notation,
}

/// Unit assignment of a dimensioned field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUnit {
    pub family: UnitFamily,
    pub default_unit: String,
}

/// Static metadata describing one record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub group: String,
    pub subgroup: String,
    /// `None` for fields without a physical dimension
    pub unit: Option<FieldUnit>,
    pub value_type: ValueType,
    pub description: String,
}

impl FieldDescriptor {
    fn build(
        name: impl Into<String>,
        group: impl Into<String>,
        subgroup: impl Into<String>,
        unit: Option<FieldUnit>,
        value_type: ValueType,
    ) -> Self {
        FieldDescriptor {
            name: name.into(),
            group: group.into(),
            subgroup: subgroup.into(),
            unit,
            value_type,
            description: String::new(),
        }
    }

    /// Unitless text field
    pub fn text(name: impl Into<String>, group: impl Into<String>, subgroup: impl Into<String>) -> Self {
        Self::build(name, group, subgroup, None, ValueType::Text)
    }

    /// Unitless integer field
    pub fn integer(name: impl Into<String>, group: impl Into<String>, subgroup: impl Into<String>) -> Self {
        Self::build(name, group, subgroup, None, ValueType::Integer)
    }

    /// Unitless real field (scale factors and the like)
    pub fn real(name: impl Into<String>, group: impl Into<String>, subgroup: impl Into<String>) -> Self {
        Self::build(name, group, subgroup, None, ValueType::Real)
    }

    /// Real field measured in `unit` of `family`
    pub fn quantity(
        name: impl Into<String>,
        group: impl Into<String>,
        subgroup: impl Into<String>,
        family: UnitFamily,
        unit: impl Into<String>,
    ) -> Self {
        let unit = FieldUnit {
            family,
            default_unit: unit.into(),
        };
        Self::build(name, group, subgroup, Some(unit), ValueType::Real)
    }

    /// Reinforcement notation whose lengths are in `unit`
    pub fn notation(
        name: impl Into<String>,
        group: impl Into<String>,
        subgroup: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        let unit = FieldUnit {
            family: UnitFamily::Length,
            default_unit: unit.into(),
        };
        Self::build(name, group, subgroup, Some(unit), ValueType::Notation)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn family(&self) -> Option<UnitFamily> {
        self.unit.as_ref().map(|u| u.family)
    }

    pub fn default_unit(&self) -> Option<&str> {
        self.unit.as_ref().map(|u| u.default_unit.as_str())
    }

    pub fn is_notation(&self) -> bool {
        self.value_type == ValueType::Notation
    }

    /// Whether a value supplied in `unit` can be stored in this field
    pub fn accepts_unit(&self, unit: &str) -> bool {
        self.family().map_or(false, |family| family.contains(unit))
    }

    /// Whether `value` has the shape this field declares
    fn accepts_value(&self, value: &FieldValue) -> bool {
        match (self.value_type, value) {
            (ValueType::Text, FieldValue::Text(_)) => true,
            (ValueType::Notation, FieldValue::Text(_)) => true,
            (ValueType::Integer, FieldValue::Integer(_)) => true,
            (ValueType::Real, FieldValue::Integer(_) | FieldValue::Number(_)) => true,
            _ => false,
        }
    }

    /// Entry of the persisted `field_config` table
    pub fn config_entry(&self) -> FieldConfigEntry {
        FieldConfigEntry {
            group: self.group.clone(),
            sub_group: self.subgroup.clone(),
            unit: self.default_unit().map(str::to_string),
            unit_type: self.family(),
            data_type: self.value_type,
            explanation: self.description.clone(),
        }
    }
}

/// Descriptor as written into the persisted document's `field_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfigEntry {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub sub_group: String,
    pub unit: Option<String>,
    pub unit_type: Option<UnitFamily>,
    #[serde(default = "default_data_type")]
    pub data_type: ValueType,
    #[serde(default)]
    pub explanation: String,
}

fn default_data_type() -> ValueType {
    ValueType::Text
}

// ============================================================================
// Compile-time table support
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum SpecKind {
    Text,
    Integer,
    Real,
    Quantity(UnitFamily, &'static str),
    Notation,
}

/// `const`-friendly descriptor used by built-in tables.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    name: &'static str,
    group: &'static str,
    subgroup: &'static str,
    kind: SpecKind,
    description: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, group: &'static str, subgroup: &'static str, kind: SpecKind, description: &'static str) -> Self {
        FieldSpec {
            name,
            group,
            subgroup,
            kind,
            description,
        }
    }

    pub(crate) const fn text(name: &'static str, group: &'static str, subgroup: &'static str, description: &'static str) -> Self {
        Self::new(name, group, subgroup, SpecKind::Text, description)
    }

    pub(crate) const fn integer(name: &'static str, group: &'static str, subgroup: &'static str, description: &'static str) -> Self {
        Self::new(name, group, subgroup, SpecKind::Integer, description)
    }

    pub(crate) const fn real(name: &'static str, group: &'static str, subgroup: &'static str, description: &'static str) -> Self {
        Self::new(name, group, subgroup, SpecKind::Real, description)
    }

    /// Length in millimetres
    pub(crate) const fn length(name: &'static str, group: &'static str, subgroup: &'static str, description: &'static str) -> Self {
        Self::new(name, group, subgroup, SpecKind::Quantity(UnitFamily::Length, "mm"), description)
    }

    pub(crate) const fn quantity(
        name: &'static str,
        group: &'static str,
        subgroup: &'static str,
        family: UnitFamily,
        unit: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(name, group, subgroup, SpecKind::Quantity(family, unit), description)
    }

    /// Reinforcement notation with lengths in millimetres
    pub(crate) const fn notation(name: &'static str, group: &'static str, subgroup: &'static str, description: &'static str) -> Self {
        Self::new(name, group, subgroup, SpecKind::Notation, description)
    }

    fn descriptor(&self) -> FieldDescriptor {
        let descriptor = match self.kind {
            SpecKind::Text => FieldDescriptor::text(self.name, self.group, self.subgroup),
            SpecKind::Integer => FieldDescriptor::integer(self.name, self.group, self.subgroup),
            SpecKind::Real => FieldDescriptor::real(self.name, self.group, self.subgroup),
            SpecKind::Quantity(family, unit) => {
                FieldDescriptor::quantity(self.name, self.group, self.subgroup, family, unit)
            }
            SpecKind::Notation => FieldDescriptor::notation(self.name, self.group, self.subgroup, "mm"),
        };
        descriptor.with_description(self.description)
    }
}

/// `const`-friendly default value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DefaultValue {
    Text(&'static str),
    Integer(i64),
    Real(f64),
}

impl From<DefaultValue> for FieldValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Text(s) => FieldValue::Text(s.to_string()),
            DefaultValue::Integer(i) => FieldValue::Integer(i),
            DefaultValue::Real(r) => FieldValue::Number(r),
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Validated, immutable pair of descriptor and default-value tables.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    descriptors: Vec<FieldDescriptor>,
    defaults: Vec<FieldValue>,
    positions: HashMap<String, usize>,
}

impl FieldSchema {
    /// Build a schema, checking that both tables cover the same fields and
    /// that every entry is internally consistent.
    ///
    /// # Errors
    ///
    /// * `SchemaMismatch` - a field lacks a default or a default lacks a field
    /// * `InvalidSchema` - duplicate field, unit outside its family, notation
    ///   field without a length unit, or a default of the wrong type
    pub fn new(
        name: impl Into<String>,
        descriptors: Vec<FieldDescriptor>,
        mut defaults: IndexMap<String, FieldValue>,
    ) -> FrescoResult<Self> {
        let mut positions = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            if positions.insert(descriptor.name.clone(), index).is_some() {
                return Err(FrescoError::invalid_schema(&descriptor.name, "field declared twice"));
            }
        }

        let missing_defaults: Vec<String> = descriptors
            .iter()
            .filter(|d| !defaults.contains_key(&d.name))
            .map(|d| d.name.clone())
            .collect();
        let missing_descriptors: Vec<String> = defaults
            .keys()
            .filter(|name| !positions.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing_defaults.is_empty() || !missing_descriptors.is_empty() {
            return Err(FrescoError::SchemaMismatch {
                missing_defaults,
                missing_descriptors,
            });
        }

        let mut aligned = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            validate_descriptor(descriptor)?;
            let default = defaults
                .swap_remove(&descriptor.name)
                .ok_or_else(|| FrescoError::invalid_schema(&descriptor.name, "missing default"))?;
            validate_default(descriptor, &default)?;
            aligned.push(default);
        }

        Ok(FieldSchema {
            name: name.into(),
            descriptors,
            defaults: aligned,
            positions,
        })
    }

    /// The built-in reinforced-concrete frame schema
    pub fn rc_frame() -> FrescoResult<Self> {
        let descriptors = rc_frame::RC_FRAME_FIELDS.iter().map(FieldSpec::descriptor).collect();
        let defaults = rc_frame::RC_FRAME_DEFAULTS
            .iter()
            .map(|(name, value)| (name.to_string(), FieldValue::from(*value)))
            .collect();
        FieldSchema::new("rc_frame", descriptors, defaults)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.iter()
    }

    pub fn descriptor(&self, field: &str) -> Option<&FieldDescriptor> {
        self.position(field).map(|index| &self.descriptors[index])
    }

    /// Declaration index of a field
    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    pub fn default_value(&self, field: &str) -> Option<&FieldValue> {
        self.position(field).map(|index| &self.defaults[index])
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    /// Names of the reinforcement-notation fields
    pub fn notation_fields(&self) -> impl Iterator<Item = &str> {
        self.descriptors
            .iter()
            .filter(|d| d.is_notation())
            .map(|d| d.name.as_str())
    }

    /// Default unit of every field (`None` for unitless fields)
    pub fn default_units(&self) -> IndexMap<String, Option<String>> {
        self.descriptors
            .iter()
            .map(|d| (d.name.clone(), d.default_unit().map(str::to_string)))
            .collect()
    }

    /// A record holding every field at its default value
    pub fn default_record(&self) -> Record {
        self.descriptors
            .iter()
            .zip(&self.defaults)
            .map(|(d, value)| (d.name.clone(), value.clone()))
            .collect()
    }

    /// The descriptor table in persisted `field_config` form
    pub fn config_table(&self) -> IndexMap<String, FieldConfigEntry> {
        self.descriptors
            .iter()
            .map(|d| (d.name.clone(), d.config_entry()))
            .collect()
    }

    /// Fields grouped by `group`, groups in first-appearance order
    pub fn groups(&self) -> IndexMap<&str, Vec<&str>> {
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for descriptor in &self.descriptors {
            groups
                .entry(descriptor.group.as_str())
                .or_default()
                .push(descriptor.name.as_str());
        }
        groups
    }
}

fn validate_descriptor(descriptor: &FieldDescriptor) -> FrescoResult<()> {
    if let Some(unit) = &descriptor.unit {
        if !unit.family.contains(&unit.default_unit) {
            return Err(FrescoError::invalid_schema(
                &descriptor.name,
                format!("default unit '{}' is not a {} unit", unit.default_unit, unit.family),
            ));
        }
    }

    match (descriptor.value_type, descriptor.family()) {
        (ValueType::Notation, Some(UnitFamily::Length)) => Ok(()),
        (ValueType::Notation, _) => Err(FrescoError::invalid_schema(
            &descriptor.name,
            "reinforcement notation requires a Length unit",
        )),
        (ValueType::Text | ValueType::Integer, Some(_)) => Err(FrescoError::invalid_schema(
            &descriptor.name,
            "only real and notation fields may carry a unit",
        )),
        _ => Ok(()),
    }
}

fn validate_default(descriptor: &FieldDescriptor, default: &FieldValue) -> FrescoResult<()> {
    if !descriptor.accepts_value(default) {
        return Err(FrescoError::invalid_schema(
            &descriptor.name,
            format!("default {} value does not match declared type {:?}", default.type_name(), descriptor.value_type),
        ));
    }
    if descriptor.is_notation() {
        let text = default.as_text().unwrap_or_default();
        if parse_notation(text).iter().any(Result::is_err) {
            return Err(FrescoError::invalid_schema(
                &descriptor.name,
                format!("default '{}' is not valid reinforcement notation", text),
            ));
        }
    }
    Ok(())
}

static RC_FRAME_SCHEMA: OnceCell<Arc<FieldSchema>> = OnceCell::new();

/// Shared, validated instance of the built-in RC frame schema.
///
/// The tables are checked once on first use; a failure means the built-in
/// tables are broken and is returned on every call.
pub fn rc_frame_schema() -> FrescoResult<Arc<FieldSchema>> {
    RC_FRAME_SCHEMA
        .get_or_try_init(|| FieldSchema::rc_frame().map(Arc::new))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_schema_parts() -> (Vec<FieldDescriptor>, IndexMap<String, FieldValue>) {
        let descriptors = vec![
            FieldDescriptor::text("label", "reference", ""),
            FieldDescriptor::quantity("height", "geometry", "", UnitFamily::Length, "mm"),
            FieldDescriptor::notation("bars", "reinforcement", "", "mm"),
        ];
        let defaults = IndexMap::from([
            ("label".to_string(), FieldValue::from("none")),
            ("height".to_string(), FieldValue::from(0.0)),
            ("bars".to_string(), FieldValue::from("0#0")),
        ]);
        (descriptors, defaults)
    }

    #[test]
    fn test_rc_frame_tables_are_aligned() {
        let schema = FieldSchema::rc_frame().unwrap();
        assert_eq!(schema.len(), 118);
        assert_eq!(schema.field_names().next(), Some("specimen_id"));
        assert_eq!(schema.field_names().last(), Some("comments"));
        assert_eq!(schema.notation_fields().count(), 25);
    }

    #[test]
    fn test_rc_frame_units() {
        let schema = rc_frame_schema().unwrap();
        assert_eq!(schema.descriptor("fc").unwrap().default_unit(), Some("MPa"));
        assert_eq!(schema.descriptor("Ec").unwrap().default_unit(), Some("GPa"));
        assert_eq!(
            schema.descriptor("glb_energy_dissipation").unwrap().family(),
            Some(UnitFamily::Work)
        );
        assert_eq!(schema.descriptor("year").unwrap().value_type, ValueType::Integer);
        assert_eq!(schema.descriptor("specimen_id").unwrap().unit, None);
        assert_eq!(schema.default_value("col_trans_mid_reinf"), Some(&FieldValue::from("0#0@0")));
    }

    #[test]
    fn test_family_iff_unit() {
        let schema = rc_frame_schema().unwrap();
        for descriptor in schema.descriptors() {
            assert_eq!(descriptor.family().is_some(), descriptor.default_unit().is_some());
            if descriptor.is_notation() {
                assert_eq!(descriptor.family(), Some(UnitFamily::Length));
            }
        }
    }

    #[test]
    fn test_shared_instance_is_reused() {
        let a = rc_frame_schema().unwrap();
        let b = rc_frame_schema().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let (descriptors, mut defaults) = small_schema_parts();
        defaults.shift_remove("height");
        defaults.insert("orphan".to_string(), FieldValue::from(1.0));

        let err = FieldSchema::new("broken", descriptors, defaults).unwrap_err();
        assert_eq!(
            err,
            FrescoError::SchemaMismatch {
                missing_defaults: vec!["height".to_string()],
                missing_descriptors: vec!["orphan".to_string()],
            }
        );
    }

    #[test]
    fn test_inconsistent_entries_are_rejected() {
        let (mut descriptors, defaults) = small_schema_parts();
        descriptors[1] = FieldDescriptor::quantity("height", "geometry", "", UnitFamily::Length, "MPa");
        let err = FieldSchema::new("bad unit", descriptors, defaults).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SCHEMA");

        let (descriptors, mut defaults) = small_schema_parts();
        defaults.insert("height".to_string(), FieldValue::from("tall"));
        assert!(FieldSchema::new("bad default", descriptors, defaults).is_err());

        let (mut descriptors, defaults) = small_schema_parts();
        descriptors.push(descriptors[0].clone());
        assert!(FieldSchema::new("duplicate", descriptors, defaults).is_err());
    }

    #[test]
    fn test_default_record_in_schema_order() {
        let (descriptors, defaults) = small_schema_parts();
        let schema = FieldSchema::new("small", descriptors, defaults).unwrap();
        let record = schema.default_record();
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, ["label", "height", "bars"]);
        assert_eq!(record.get("bars"), Some(&FieldValue::from("0#0")));
    }

    #[test]
    fn test_config_table_shape() {
        let schema = rc_frame_schema().unwrap();
        let table = schema.config_table();
        let json = serde_json::to_value(&table["col_h"]).unwrap();
        assert_eq!(json["unit"], "mm");
        assert_eq!(json["unit_type"], "Length");
        assert_eq!(json["data_type"], "float");
        assert_eq!(json["sub_group"], "column_rectangle_cross_section");
    }

    #[test]
    fn test_groups() {
        let schema = rc_frame_schema().unwrap();
        let groups = schema.groups();
        assert_eq!(groups.keys().next(), Some(&"reference"));
        assert!(groups["frame_geometry"].contains(&"col_h"));
    }
}
