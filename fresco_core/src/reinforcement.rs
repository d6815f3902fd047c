//! # Reinforcement Notation
//!
//! Parses and re-serializes compound rebar notation such as `4#20+2#14` or
//! `#10@150`. Each `+`-separated term is `[count]#diameter[@spacing]`, where
//! the diameter and spacing are lengths in the field's current unit.
//!
//! Converting a notation converts every diameter and spacing, leaves counts
//! alone, and keeps an omitted count omitted:
//!
//! ```rust
//! use fresco_core::reinforcement::convert_notation;
//!
//! let out = convert_notation("#10@150", "mm", "cm").unwrap();
//! assert_eq!(out.text, "#1@15");
//! assert!(out.warnings.is_empty());
//! ```
//!
//! Terms that do not follow the grammar are kept verbatim and reported as
//! [`ConversionWarning::MalformedNotation`]; legacy free-text entries never
//! abort a conversion.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FrescoResult;
use crate::units::{self, format_compact, UnitFamily};

static TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d*)#(\d+(?:\.\d+)?)(?:@(\d+(?:\.\d+)?))?$").expect("valid reinforcement pattern")
});

/// One `[count]#diameter[@spacing]` term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementTerm {
    /// Number of bars; `None` when the notation omits it
    pub count: Option<u32>,
    /// Bar diameter
    pub diameter: f64,
    /// Bar spacing, for distributed (transverse/slab) reinforcement
    pub spacing: Option<f64>,
}

impl ReinforcementTerm {
    /// Bar count, treating an omitted count as a single bar
    pub fn effective_count(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// Same term with diameter and spacing expressed in `to_unit`.
    pub fn convert(&self, from_unit: &str, to_unit: &str) -> FrescoResult<Self> {
        let diameter = units::convert(self.diameter, UnitFamily::Length, from_unit, to_unit)?;
        let spacing = self
            .spacing
            .map(|s| units::convert(s, UnitFamily::Length, from_unit, to_unit))
            .transpose()?;

        Ok(ReinforcementTerm {
            count: self.count,
            diameter,
            spacing,
        })
    }
}

impl fmt::Display for ReinforcementTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.count {
            write!(f, "{}", count)?;
        }
        write!(f, "#{}", format_compact(self.diameter))?;
        if let Some(spacing) = self.spacing {
            write!(f, "@{}", format_compact(spacing))?;
        }
        Ok(())
    }
}

/// Parse a single term (surrounding whitespace is ignored).
pub fn parse_term(term: &str) -> Option<ReinforcementTerm> {
    let caps = TERM_PATTERN.captures(term.trim())?;

    let count = match caps.get(1).map(|m| m.as_str()) {
        Some("") | None => None,
        Some(digits) => Some(digits.parse().ok()?),
    };
    let diameter = caps.get(2)?.as_str().parse().ok()?;
    let spacing = match caps.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    Some(ReinforcementTerm {
        count,
        diameter,
        spacing,
    })
}

/// Parse every `+`-separated term. Malformed terms come back as `Err` with
/// their original (trimmed) text.
pub fn parse_notation(notation: &str) -> Vec<Result<ReinforcementTerm, String>> {
    if notation.trim().is_empty() {
        return Vec::new();
    }
    notation
        .split('+')
        .map(str::trim)
        .map(|term| parse_term(term).ok_or_else(|| term.to_string()))
        .collect()
}

/// Recoverable problems met while converting values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ConversionWarning {
    /// A notation term did not follow `[count]#diameter[@spacing]` and was
    /// left unconverted
    MalformedNotation {
        field: Option<String>,
        notation: String,
        term: String,
    },
    /// A unit-bearing field held a value that cannot be converted
    NotConvertible {
        field: String,
        value_type: String,
    },
    /// A unit was attached to a field that has no unit family
    UnitIgnored { field: String, unit: String },
    /// A requested field or unit was not applicable and was skipped
    Skipped { field: String, reason: String },
}

impl ConversionWarning {
    /// Attach a field name to a notation warning produced without one
    pub fn for_field(self, name: &str) -> Self {
        match self {
            ConversionWarning::MalformedNotation { notation, term, .. } => {
                ConversionWarning::MalformedNotation {
                    field: Some(name.to_string()),
                    notation,
                    term,
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::MalformedNotation { field, notation, term } => {
                let field = field.as_deref().unwrap_or("<notation>");
                write!(f, "{}: term '{}' of '{}' is not valid reinforcement notation", field, term, notation)
            }
            ConversionWarning::NotConvertible { field, value_type } => {
                write!(f, "{}: {} value cannot be unit-converted", field, value_type)
            }
            ConversionWarning::UnitIgnored { field, unit } => {
                write!(f, "{}: unit '{}' ignored for a unitless field", field, unit)
            }
            ConversionWarning::Skipped { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

/// Converted notation text plus any terms that had to be left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct NotationConversion {
    pub text: String,
    pub warnings: Vec<ConversionWarning>,
}

impl NotationConversion {
    fn unchanged(text: &str) -> Self {
        NotationConversion {
            text: text.to_string(),
            warnings: Vec::new(),
        }
    }

    /// Whether the text differs from the input it was produced from
    pub fn changed_from(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Convert every length embedded in `notation` from `from_unit` to `to_unit`.
///
/// Empty input and equal units return the text unchanged. Units outside the
/// Length family are a configuration error. Converted numbers are written
/// with [`format_compact`], so conversion noise never reaches the text.
///
/// Terms are trimmed before parsing and re-joined with a bare `+`; a
/// malformed term is kept as its trimmed text (`"4#20 + two bars"` comes
/// back as `"4#2+two bars"`).
///
/// # Example
///
/// ```rust
/// use fresco_core::reinforcement::convert_notation;
///
/// let cm = convert_notation("4#20+2#14", "mm", "cm").unwrap();
/// assert_eq!(cm.text, "4#2+2#1.4");
///
/// let mm = convert_notation(&cm.text, "cm", "mm").unwrap();
/// assert_eq!(mm.text, "4#20+2#14");
/// ```
pub fn convert_notation(notation: &str, from_unit: &str, to_unit: &str) -> FrescoResult<NotationConversion> {
    UnitFamily::Length.require(from_unit)?;
    UnitFamily::Length.require(to_unit)?;

    if notation.is_empty() || from_unit == to_unit {
        return Ok(NotationConversion::unchanged(notation));
    }

    let mut warnings = Vec::new();
    let mut terms = Vec::new();

    for parsed in parse_notation(notation) {
        match parsed {
            Ok(term) => terms.push(term.convert(from_unit, to_unit)?.to_string()),
            Err(raw) => {
                warnings.push(ConversionWarning::MalformedNotation {
                    field: None,
                    notation: notation.to_string(),
                    term: raw.clone(),
                });
                terms.push(raw);
            }
        }
    }

    Ok(NotationConversion {
        text: terms.join("+"),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term_variants() {
        assert_eq!(
            parse_term("4#20"),
            Some(ReinforcementTerm { count: Some(4), diameter: 20.0, spacing: None })
        );
        assert_eq!(
            parse_term(" #10@150 "),
            Some(ReinforcementTerm { count: None, diameter: 10.0, spacing: Some(150.0) })
        );
        assert_eq!(
            parse_term("2#8.5@100.25"),
            Some(ReinforcementTerm { count: Some(2), diameter: 8.5, spacing: Some(100.25) })
        );
        assert_eq!(parse_term("Ø8/150"), None);
        assert_eq!(parse_term("4#20 extra"), None);
    }

    #[test]
    fn test_effective_count() {
        assert_eq!(parse_term("#12@200").unwrap().effective_count(), 1);
        assert_eq!(parse_term("3#16").unwrap().effective_count(), 3);
    }

    #[test]
    fn test_display_reconstruction() {
        for text in ["4#20", "#10@150", "2#8@100", "0#0@0", "3#1.4"] {
            assert_eq!(parse_term(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_round_trip_mm_cm() {
        let cm = convert_notation("4#20+2#14", "mm", "cm").unwrap();
        let mm = convert_notation(&cm.text, "cm", "mm").unwrap();
        assert_eq!(mm.text, "4#20+2#14");
    }

    #[test]
    fn test_round_trip_mm_in() {
        let inches = convert_notation("4#20+#10@150", "mm", "in").unwrap();
        assert_eq!(inches.text, "4#0.7874015748+#0.3937007874@5.905511811");

        let mm = convert_notation(&inches.text, "in", "mm").unwrap();
        assert_eq!(mm.text, "4#20+#10@150");
        assert!(mm.warnings.is_empty());
    }

    #[test]
    fn test_malformed_term_is_trimmed() {
        let out = convert_notation("4#20 +  two bars ", "mm", "cm").unwrap();
        assert_eq!(out.text, "4#2+two bars");
    }

    #[test]
    fn test_spacing_without_count() {
        let out = convert_notation("#10@150", "mm", "cm").unwrap();
        assert_eq!(out.text, "#1@15");
    }

    #[test]
    fn test_compound_with_spaces_is_normalized() {
        let out = convert_notation("2#8@100 + #12@200", "mm", "cm").unwrap();
        assert_eq!(out.text, "2#0.8@10+#1.2@20");
    }

    #[test]
    fn test_malformed_term_is_kept_with_warning() {
        let out = convert_notation("4#20+two bars", "mm", "cm").unwrap();
        assert_eq!(out.text, "4#2+two bars");
        assert_eq!(out.warnings.len(), 1);
        match &out.warnings[0] {
            ConversionWarning::MalformedNotation { term, .. } => assert_eq!(term, "two bars"),
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_cases() {
        assert_eq!(convert_notation("", "mm", "cm").unwrap().text, "");
        let same = convert_notation("anything goes", "mm", "mm").unwrap();
        assert_eq!(same.text, "anything goes");
        assert!(same.warnings.is_empty());
    }

    #[test]
    fn test_non_length_unit_is_an_error() {
        assert!(convert_notation("4#20", "mm", "MPa").is_err());
    }

    #[test]
    fn test_default_notation_survives_conversion() {
        assert_eq!(convert_notation("0#0@0", "mm", "in").unwrap().text, "0#0@0");
    }

    #[test]
    fn test_warning_field_attachment() {
        let out = convert_notation("bad", "mm", "cm").unwrap();
        let warning = out.warnings[0].clone().for_field("col_long_reinf_top");
        assert!(warning.to_string().starts_with("col_long_reinf_top:"));
    }
}
