//! # Record Values
//!
//! A stored [`Record`] is an ordered map from field name to [`FieldValue`].
//! Callers describe what they want to store with a [`RecordInput`], where
//! each field is a [`FieldInput`]: a bare value (already in the database
//! unit), a value tagged with the unit it was measured in, or an explicit
//! "not specified" placeholder.
//!
//! ## JSON Shapes
//!
//! ```json
//! {
//!   "specimen_id": "S_CON",
//!   "frm_h": [1500, "mm"],
//!   "col_long_reinf_corner": ["4#20", "mm"],
//!   "inf_win_h": null,
//!   "inf_door_h": [null, "Length"]
//! }
//! ```
//!
//! `null` and `[null, <hint>]` both deserialize to
//! [`FieldInput::Unspecified`].

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a stored record
pub type EntryId = i64;

// ============================================================================
// Field Values
// ============================================================================

/// One stored value.
///
/// Reinforcement notation is stored as [`FieldValue::Text`]; whether a text
/// value carries embedded lengths is decided by the field schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
    /// Lists, objects, booleans or null carried over from legacy documents
    Structured(serde_json::Value),
}

impl FieldValue {
    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Number(_))
    }

    /// Short name of the variant, used in warnings
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "integer",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Structured(_) => "structured",
        }
    }

    /// Text used for tabular export. `null` renders as an empty cell.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Number(n) if *n == 0.0 => "0".to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Structured(serde_json::Value::Null) => String::new(),
            FieldValue::Structured(value) => value.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

// ============================================================================
// Caller Input
// ============================================================================

/// One field as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Value expressed in the database's current unit for the field
    Value(FieldValue),
    /// Value expressed in an explicit unit
    WithUnit(FieldValue, String),
    /// The caller left the field unspecified; `hint` is whatever annotation
    /// accompanied the placeholder (often a unit family name)
    Unspecified { hint: Option<String> },
}

impl FieldInput {
    pub fn value(value: impl Into<FieldValue>) -> Self {
        FieldInput::Value(value.into())
    }

    pub fn with_unit(value: impl Into<FieldValue>, unit: impl Into<String>) -> Self {
        FieldInput::WithUnit(value.into(), unit.into())
    }

    pub fn unspecified() -> Self {
        FieldInput::Unspecified { hint: None }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldInput {
    Tagged(Option<FieldValue>, Option<String>),
    Bare(FieldValue),
}

impl<'de> Deserialize<'de> for FieldInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawFieldInput>::deserialize(deserializer)?;
        Ok(match raw {
            None => FieldInput::Unspecified { hint: None },
            Some(RawFieldInput::Tagged(None, hint)) => FieldInput::Unspecified { hint },
            Some(RawFieldInput::Tagged(Some(value), Some(unit))) => FieldInput::WithUnit(value, unit),
            Some(RawFieldInput::Tagged(Some(value), None)) => FieldInput::Value(value),
            Some(RawFieldInput::Bare(value)) => FieldInput::Value(value),
        })
    }
}

impl Serialize for FieldInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldInput::Value(value) => value.serialize(serializer),
            FieldInput::WithUnit(value, unit) => (value, unit).serialize(serializer),
            FieldInput::Unspecified { hint: None } => serializer.serialize_none(),
            FieldInput::Unspecified { hint: Some(hint) } => {
                (Option::<FieldValue>::None, hint).serialize(serializer)
            }
        }
    }
}

/// Caller-supplied fields for an insert or update, in caller order.
///
/// # Example
///
/// ```rust
/// use fresco_core::record::RecordInput;
///
/// let input = RecordInput::new()
///     .value("specimen_id", "S_CON")
///     .quantity("frm_h", 1500.0, "mm")
///     .quantity("col_long_reinf_corner", "4#20", "mm")
///     .unspecified("inf_win_h");
/// assert_eq!(input.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordInput {
    fields: IndexMap<String, FieldInput>,
}

impl RecordInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare value (interpreted in the field's current unit)
    pub fn value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), FieldInput::value(value));
        self
    }

    /// Add a value with the unit it is expressed in
    pub fn quantity(mut self, field: impl Into<String>, value: impl Into<FieldValue>, unit: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldInput::with_unit(value, unit));
        self
    }

    /// Mark a field as deliberately left unspecified
    pub fn unspecified(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldInput::unspecified());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, input: FieldInput) {
        self.fields.insert(field.into(), input);
    }

    pub fn get(&self, field: &str) -> Option<&FieldInput> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldInput)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, FieldInput)> for RecordInput {
    fn from_iter<I: IntoIterator<Item = (String, FieldInput)>>(iter: I) -> Self {
        RecordInput {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordInput {
    type Item = (String, FieldInput);
    type IntoIter = indexmap::map::IntoIter<String, FieldInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// ============================================================================
// Stored Records
// ============================================================================

/// One specimen's stored field values, kept in schema order by the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Numeric value of a field, if present and numeric
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// Text value of a field, if present and textual
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field.into(), value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut FieldValue)> {
        self.fields.iter_mut()
    }

    /// Reorder fields by `position`; fields without a position are removed.
    pub(crate) fn retain_ordered<F>(&mut self, position: F)
    where
        F: Fn(&str) -> Option<usize>,
    {
        self.fields.retain(|name, _| position(name).is_some());
        self.fields
            .sort_by(|a, _, b, _| position(a).cmp(&position(b)));
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged_json() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[2019, 0.5, "S_CON", [1, 2]]"#).unwrap();
        assert_eq!(values[0], FieldValue::Integer(2019));
        assert_eq!(values[1], FieldValue::Number(0.5));
        assert_eq!(values[2], FieldValue::Text("S_CON".into()));
        assert!(matches!(values[3], FieldValue::Structured(_)));
    }

    #[test]
    fn test_field_input_shapes() {
        let input: RecordInput = serde_json::from_str(
            r#"{
                "specimen_id": "S_CON",
                "frm_h": [1500, "mm"],
                "inf_win_h": null,
                "inf_door_h": [null, "Length"]
            }"#,
        )
        .unwrap();

        assert_eq!(input.get("specimen_id"), Some(&FieldInput::value("S_CON")));
        assert_eq!(input.get("frm_h"), Some(&FieldInput::with_unit(1500, "mm")));
        assert_eq!(input.get("inf_win_h"), Some(&FieldInput::unspecified()));
        assert_eq!(
            input.get("inf_door_h"),
            Some(&FieldInput::Unspecified { hint: Some("Length".into()) })
        );

        // Caller order is kept
        let names: Vec<&String> = input.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["specimen_id", "frm_h", "inf_win_h", "inf_door_h"]);
    }

    #[test]
    fn test_field_input_serialization() {
        let json = serde_json::to_string(&FieldInput::with_unit(20.0, "cm")).unwrap();
        assert_eq!(json, r#"[20.0,"cm"]"#);
        assert_eq!(serde_json::to_string(&FieldInput::unspecified()).unwrap(), "null");
    }

    #[test]
    fn test_cells() {
        assert_eq!(FieldValue::Number(150.0).to_cell(), "150");
        assert_eq!(FieldValue::Integer(2019).to_cell(), "2019");
        assert_eq!(FieldValue::Structured(serde_json::json!(["a", 1])).to_cell(), r#"["a",1]"#);
        assert_eq!(FieldValue::Structured(serde_json::Value::Null).to_cell(), "");
    }

    #[test]
    fn test_retain_ordered() {
        let mut record: Record = [
            ("b".to_string(), FieldValue::from(2.0)),
            ("stray".to_string(), FieldValue::from("x")),
            ("a".to_string(), FieldValue::from(1.0)),
        ]
        .into_iter()
        .collect();

        record.retain_ordered(|name| ["a", "b"].iter().position(|f| *f == name));
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, ["a", "b"]);
    }
}
