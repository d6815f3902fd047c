//! Per-field ingestion: separate value from unit, drop what cannot be stored,
//! and express what remains in the database's active unit for the field.
//!
//! The same value conversion is reused by unit migration and by export, so
//! a stored value is converted the same way no matter which path asks.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::FrescoResult;
use crate::record::{FieldInput, FieldValue, RecordInput};
use crate::reinforcement::{convert_notation, ConversionWarning};
use crate::schema::{FieldDescriptor, FieldSchema, ValueType};
use crate::units::{self, UnitFamily};

/// Why an input field was not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum DropReason {
    /// The caller explicitly left the field unspecified
    Unspecified { hint: Option<String> },
    /// The supplied unit is not a member of the field's family
    InvalidUnit { unit: String, family: UnitFamily },
    /// The schema declares no such field
    UnknownField,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Unspecified { hint: Some(hint) } => write!(f, "unspecified ({})", hint),
            DropReason::Unspecified { hint: None } => f.write_str("unspecified"),
            DropReason::InvalidUnit { unit, family } => write!(f, "invalid unit '{}' for {}", unit, family),
            DropReason::UnknownField => f.write_str("unknown field"),
        }
    }
}

/// An input field that was removed during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedField {
    pub field: String,
    pub reason: DropReason,
}

/// One value expressed in a different unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConversion {
    pub field: String,
    pub from_unit: String,
    pub to_unit: String,
    pub original: FieldValue,
    pub converted: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConversionKind {
    Numeric,
    Notation,
}

/// Result of converting one stored value.
#[derive(Debug)]
pub(crate) struct ValueConversion {
    pub value: FieldValue,
    /// `None` when the value came back unchanged
    pub kind: Option<ConversionKind>,
    pub warnings: Vec<ConversionWarning>,
}

impl ValueConversion {
    fn unchanged(value: &FieldValue) -> Self {
        ValueConversion {
            value: value.clone(),
            kind: None,
            warnings: Vec::new(),
        }
    }
}

/// Express `value` of `descriptor` in `to_unit` instead of `from_unit`.
///
/// Numbers go through the unit converter, notation text through the
/// reinforcement parser. Anything else in a dimensioned field is kept and
/// reported as [`ConversionWarning::NotConvertible`]. Unitless fields and
/// equal units are returned untouched.
pub(crate) fn convert_value(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    from_unit: &str,
    to_unit: &str,
) -> FrescoResult<ValueConversion> {
    let Some(family) = descriptor.family() else {
        return Ok(ValueConversion::unchanged(value));
    };
    if from_unit == to_unit {
        return Ok(ValueConversion::unchanged(value));
    }

    match value {
        FieldValue::Text(text) if descriptor.is_notation() => {
            let converted = convert_notation(text, from_unit, to_unit)?;
            let kind = converted.changed_from(text).then_some(ConversionKind::Notation);
            Ok(ValueConversion {
                kind,
                warnings: converted
                    .warnings
                    .into_iter()
                    .map(|w| w.for_field(&descriptor.name))
                    .collect(),
                value: FieldValue::Text(converted.text),
            })
        }
        FieldValue::Integer(_) | FieldValue::Number(_) if !descriptor.is_notation() => {
            let number = value.as_f64().unwrap_or_default();
            let converted = units::convert(number, family, from_unit, to_unit)?;
            Ok(ValueConversion {
                value: FieldValue::Number(converted),
                kind: Some(ConversionKind::Numeric),
                warnings: Vec::new(),
            })
        }
        other => Ok(ValueConversion {
            value: other.clone(),
            kind: None,
            warnings: vec![ConversionWarning::NotConvertible {
                field: descriptor.name.clone(),
                value_type: other.type_name().to_string(),
            }],
        }),
    }
}

/// Integers supplied for real-valued fields are stored as numbers
fn coerce_real(descriptor: &FieldDescriptor, value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Integer(i) if descriptor.value_type == ValueType::Real => FieldValue::Number(i as f64),
        other => other,
    }
}

/// Normalized input fields plus everything that happened to them.
#[derive(Debug, Default)]
pub(crate) struct NormalizedInput {
    /// Surviving fields, in input order
    pub values: Vec<(String, FieldValue)>,
    pub dropped: Vec<DroppedField>,
    pub conversions: Vec<FieldConversion>,
    pub notation_conversions: Vec<FieldConversion>,
    pub warnings: Vec<ConversionWarning>,
}

impl NormalizedInput {
    fn drop_field(&mut self, field: String, reason: DropReason) {
        self.dropped.push(DroppedField { field, reason });
    }
}

/// Schema plus the database's active unit assignment.
pub(crate) struct Normalizer<'a> {
    pub schema: &'a FieldSchema,
    pub field_units: &'a IndexMap<String, Option<String>>,
}

impl<'a> Normalizer<'a> {
    /// Active unit of a field; falls back to the schema default when the
    /// assignment has no entry
    pub fn active_unit(&self, descriptor: &'a FieldDescriptor) -> Option<&'a str> {
        self.field_units
            .get(&descriptor.name)
            .and_then(|unit| unit.as_deref())
            .or_else(|| descriptor.default_unit())
    }

    /// Validate and convert caller input field by field.
    ///
    /// Placeholders, out-of-family units and unknown fields are dropped; a
    /// unit on a unitless field is ignored with a warning. Surviving values
    /// supplied in another unit are converted to the active unit.
    pub fn normalize(&self, input: RecordInput) -> FrescoResult<NormalizedInput> {
        let mut out = NormalizedInput::default();

        for (field, field_input) in input {
            let Some(descriptor) = self.schema.descriptor(&field) else {
                out.drop_field(field, DropReason::UnknownField);
                continue;
            };

            let (value, supplied_unit) = match field_input {
                FieldInput::Unspecified { hint } => {
                    out.drop_field(field, DropReason::Unspecified { hint });
                    continue;
                }
                FieldInput::Value(value) => (value, None),
                FieldInput::WithUnit(value, unit) => (value, Some(unit)),
            };

            let source_unit = match (supplied_unit, descriptor.family()) {
                (None, _) => None,
                (Some(unit), None) => {
                    out.warnings.push(ConversionWarning::UnitIgnored {
                        field: field.clone(),
                        unit,
                    });
                    None
                }
                (Some(unit), Some(family)) if !family.contains(&unit) => {
                    out.drop_field(field, DropReason::InvalidUnit { unit, family });
                    continue;
                }
                (Some(unit), Some(_)) => Some(unit),
            };

            let value = match (source_unit, self.active_unit(descriptor)) {
                (Some(from), Some(to)) => {
                    let conversion = convert_value(descriptor, &value, &from, to)?;
                    out.warnings.extend(conversion.warnings);
                    let record = |converted: &FieldValue| FieldConversion {
                        field: field.clone(),
                        from_unit: from.clone(),
                        to_unit: to.to_string(),
                        original: value.clone(),
                        converted: converted.clone(),
                    };
                    match conversion.kind {
                        Some(ConversionKind::Numeric) => out.conversions.push(record(&conversion.value)),
                        Some(ConversionKind::Notation) => {
                            out.notation_conversions.push(record(&conversion.value))
                        }
                        None => {}
                    }
                    conversion.value
                }
                _ => value,
            };

            out.values.push((field, coerce_real(descriptor, value)));
        }

        Ok(out)
    }

    /// Schema default of a field, expressed in the field's active unit.
    pub fn default_value(&self, descriptor: &'a FieldDescriptor) -> FrescoResult<FieldValue> {
        let default = self
            .schema
            .default_value(&descriptor.name)
            .cloned()
            .unwrap_or(FieldValue::Structured(serde_json::Value::Null));

        match (descriptor.default_unit(), self.active_unit(descriptor)) {
            (Some(from), Some(to)) if from != to => Ok(convert_value(descriptor, &default, from, to)?.value),
            _ => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::rc_frame_schema;

    fn units_with(overrides: &[(&str, &str)]) -> IndexMap<String, Option<String>> {
        let mut units = rc_frame_schema().unwrap().default_units();
        for (field, unit) in overrides {
            units.insert(field.to_string(), Some(unit.to_string()));
        }
        units
    }

    #[test]
    fn test_bare_values_are_assumed_in_active_unit() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let out = normalizer
            .normalize(RecordInput::new().value("col_h", 200.0).value("specimen_id", "S1"))
            .unwrap();
        assert_eq!(out.values[0], ("col_h".to_string(), FieldValue::from(200.0)));
        assert!(out.conversions.is_empty());
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn test_supplied_unit_is_converted() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let out = normalizer
            .normalize(
                RecordInput::new()
                    .quantity("col_h", 20, "cm")
                    .quantity("col_long_reinf_corner", "4#2", "cm"),
            )
            .unwrap();
        assert_eq!(out.values[0].1, FieldValue::from(200.0));
        assert_eq!(out.values[1].1, FieldValue::from("4#20"));
        assert_eq!(out.conversions.len(), 1);
        assert_eq!(out.conversions[0].from_unit, "cm");
        assert_eq!(out.notation_conversions.len(), 1);
    }

    #[test]
    fn test_drops_are_reported() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let out = normalizer
            .normalize(
                RecordInput::new()
                    .quantity("frm_h", 1500, "MPa")
                    .unspecified("inf_win_h")
                    .value("not_a_field", 1.0)
                    .value("frm_l", 3000.0),
            )
            .unwrap();

        assert_eq!(out.values.len(), 1);
        let reasons: Vec<&DropReason> = out.dropped.iter().map(|d| &d.reason).collect();
        assert_eq!(
            reasons,
            [
                &DropReason::InvalidUnit { unit: "MPa".to_string(), family: UnitFamily::Length },
                &DropReason::Unspecified { hint: None },
                &DropReason::UnknownField,
            ]
        );
    }

    #[test]
    fn test_unit_on_unitless_field_is_ignored() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let out = normalizer.normalize(RecordInput::new().quantity("year", 2019, "s")).unwrap();
        assert_eq!(out.values[0].1, FieldValue::from(2019));
        assert!(matches!(out.warnings[0], ConversionWarning::UnitIgnored { .. }));
    }

    #[test]
    fn test_text_in_numeric_field_is_kept_with_warning() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let out = normalizer.normalize(RecordInput::new().quantity("fc", "n/a", "psi")).unwrap();
        assert_eq!(out.values[0].1, FieldValue::from("n/a"));
        assert_eq!(
            out.warnings,
            [ConversionWarning::NotConvertible { field: "fc".to_string(), value_type: "text".to_string() }]
        );
    }

    #[test]
    fn test_default_follows_active_unit() {
        let schema = rc_frame_schema().unwrap();
        let units = units_with(&[("col_trans_mid_reinf", "cm")]);
        let normalizer = Normalizer { schema: &schema, field_units: &units };

        let descriptor = schema.descriptor("col_trans_mid_reinf").unwrap();
        assert_eq!(normalizer.default_value(descriptor).unwrap(), FieldValue::from("0#0@0"));
        assert_eq!(normalizer.active_unit(descriptor), Some("cm"));
    }

    #[test]
    fn test_convert_value_skips_unitless() {
        let schema = rc_frame_schema().unwrap();
        let descriptor = schema.descriptor("specimen_id").unwrap();
        let out = convert_value(descriptor, &FieldValue::from("S1"), "mm", "cm").unwrap();
        assert_eq!(out.kind, None);
        assert!(out.warnings.is_empty());
    }
}
