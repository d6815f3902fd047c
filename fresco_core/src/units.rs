//! # Unit Conversion
//!
//! Named unit families with conversion between any two units of the same
//! family. Every family except temperature is a multiplicative table of
//! factors to one base unit; temperature is affine and pivots through Kelvin.
//!
//! Results are rounded to [`CONVERSION_PRECISION`] fractional digits so that
//! binary noise (`13.999999999999998`) does not leak into stored records,
//! while keeping far more precision than any specimen measurement carries.
//!
//! ## Supported Families
//!
//! | Family | Base | Units |
//! |---|---|---|
//! | Length | m | m, cm, mm, in, ft |
//! | Time | s | s, min, hr, day |
//! | Mass | kg | kg, g, tonne, lb |
//! | Temperature | K | K, C, F |
//! | Pressure | Pa | Pa, kPa, MPa, GPa, N/mm^2, psi, ksi |
//! | Concentrated_Force | N | N, kN, MN, lbf, kip |
//! | Distributed_Force | N/m | N/m, kN/m, N/mm, kN/mm, lbf/ft, kip/ft |
//! | Work | J | J, kJ, N*m, kN*m, N*mm, kN*mm, lbf*in, lbf*ft, kip*in, kip*ft |
//! | Density | kg/m^3 | kg/m^3, g/cm^3, lb/ft^3, pcf |
//! | Strain | strain | strain, percent, %, ratio |
//!
//! ## Example
//!
//! ```rust
//! use fresco_core::units::{convert, UnitFamily};
//!
//! let cm = convert(1500.0, UnitFamily::Length, "mm", "cm").unwrap();
//! assert_eq!(cm, 150.0);
//!
//! let f = convert(0.0, UnitFamily::Temperature, "C", "F").unwrap();
//! assert_eq!(f, 32.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{FrescoError, FrescoResult};

/// Number of fractional digits kept after a conversion
pub const CONVERSION_PRECISION: usize = 14;

// ============================================================================
// Conversion Tables (factor from unit to the family base unit)
// ============================================================================

const LENGTH_UNITS: &[(&str, f64)] = &[
    ("m", 1.0),
    ("cm", 0.01),
    ("mm", 0.001),
    ("in", 0.0254),
    ("ft", 0.3048),
];

const TIME_UNITS: &[(&str, f64)] = &[
    ("s", 1.0),
    ("min", 60.0),
    ("hr", 3600.0),
    ("day", 86400.0),
];

const MASS_UNITS: &[(&str, f64)] = &[
    ("kg", 1.0),
    ("g", 0.001),
    ("tonne", 1000.0),
    ("lb", 0.45359237),
];

const PRESSURE_UNITS: &[(&str, f64)] = &[
    ("Pa", 1.0),
    ("kPa", 1.0e3),
    ("MPa", 1.0e6),
    ("GPa", 1.0e9),
    ("N/mm^2", 1.0e6),
    ("psi", 6894.757293168360),
    ("ksi", 6894757.293168360),
];

const CONCENTRATED_FORCE_UNITS: &[(&str, f64)] = &[
    ("N", 1.0),
    ("kN", 1.0e3),
    ("MN", 1.0e6),
    ("lbf", 4.448221615260500),
    ("kip", 4448.221615260500),
];

const DISTRIBUTED_FORCE_UNITS: &[(&str, f64)] = &[
    ("N/m", 1.0),
    ("kN/m", 1.0e3),
    ("N/mm", 1.0e3),
    ("kN/mm", 1.0e6),
    ("lbf/ft", 14.59390293720640),
    ("kip/ft", 14593.90293720640),
];

const WORK_UNITS: &[(&str, f64)] = &[
    ("J", 1.0),
    ("kJ", 1.0e3),
    ("N*m", 1.0),
    ("kN*m", 1.0e3),
    ("N*mm", 0.001),
    ("kN*mm", 1.0),
    ("lbf*in", 0.1129848290276170),
    ("lbf*ft", 1.355817948331400),
    ("kip*in", 112.9848290276170),
    ("kip*ft", 1355.817948331400),
];

const DENSITY_UNITS: &[(&str, f64)] = &[
    ("kg/m^3", 1.0),
    ("g/cm^3", 1000.0),
    ("lb/ft^3", 16.0185),
    ("pcf", 16.0185),
];

const STRAIN_UNITS: &[(&str, f64)] = &[
    ("strain", 1.0),
    ("percent", 0.01),
    ("%", 0.01),
    ("ratio", 1.0),
];

const TEMPERATURE_UNITS: &[&str] = &["K", "C", "F"];

const KELVIN_OFFSET: f64 = 273.15;

// ============================================================================
// Unit Families
// ============================================================================

/// A dimensional category within which units are convertible.
///
/// Serialized names match the persisted database format
/// (`"Concentrated_Force"`, `"Distributed_Force"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitFamily {
    Length,
    Time,
    Mass,
    Temperature,
    Pressure,
    #[serde(rename = "Concentrated_Force")]
    ConcentratedForce,
    #[serde(rename = "Distributed_Force")]
    DistributedForce,
    Work,
    Density,
    Strain,
}

impl UnitFamily {
    /// Every registered family, in table order
    pub const ALL: [UnitFamily; 10] = [
        UnitFamily::Length,
        UnitFamily::Time,
        UnitFamily::Mass,
        UnitFamily::Temperature,
        UnitFamily::Pressure,
        UnitFamily::ConcentratedForce,
        UnitFamily::DistributedForce,
        UnitFamily::Work,
        UnitFamily::Density,
        UnitFamily::Strain,
    ];

    /// Registered family name
    pub fn name(&self) -> &'static str {
        match self {
            UnitFamily::Length => "Length",
            UnitFamily::Time => "Time",
            UnitFamily::Mass => "Mass",
            UnitFamily::Temperature => "Temperature",
            UnitFamily::Pressure => "Pressure",
            UnitFamily::ConcentratedForce => "Concentrated_Force",
            UnitFamily::DistributedForce => "Distributed_Force",
            UnitFamily::Work => "Work",
            UnitFamily::Density => "Density",
            UnitFamily::Strain => "Strain",
        }
    }

    /// Look up a family by its registered name.
    pub fn from_name(name: &str) -> FrescoResult<Self> {
        UnitFamily::ALL
            .iter()
            .copied()
            .find(|family| family.name() == name)
            .ok_or_else(|| FrescoError::unknown_family(name))
    }

    /// Multiplicative table, or `None` for the affine temperature family
    fn factors(&self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            UnitFamily::Length => Some(LENGTH_UNITS),
            UnitFamily::Time => Some(TIME_UNITS),
            UnitFamily::Mass => Some(MASS_UNITS),
            UnitFamily::Temperature => None,
            UnitFamily::Pressure => Some(PRESSURE_UNITS),
            UnitFamily::ConcentratedForce => Some(CONCENTRATED_FORCE_UNITS),
            UnitFamily::DistributedForce => Some(DISTRIBUTED_FORCE_UNITS),
            UnitFamily::Work => Some(WORK_UNITS),
            UnitFamily::Density => Some(DENSITY_UNITS),
            UnitFamily::Strain => Some(STRAIN_UNITS),
        }
    }

    /// Unit names of this family, in table order.
    pub fn units(&self) -> Vec<&'static str> {
        match self.factors() {
            Some(table) => table.iter().map(|(name, _)| *name).collect(),
            None => TEMPERATURE_UNITS.to_vec(),
        }
    }

    /// Whether `unit` is a member of this family
    pub fn contains(&self, unit: &str) -> bool {
        match self.factors() {
            Some(table) => table.iter().any(|(name, _)| *name == unit),
            None => TEMPERATURE_UNITS.contains(&unit),
        }
    }

    /// The unit every other unit of the family is expressed against
    pub fn base_unit(&self) -> &'static str {
        match self.factors() {
            Some(table) => table[0].0,
            None => "K",
        }
    }

    /// Fail with `UnknownUnit` unless `unit` belongs to this family.
    pub fn require(&self, unit: &str) -> FrescoResult<()> {
        if self.contains(unit) {
            Ok(())
        } else {
            Err(FrescoError::unknown_unit(self.name(), unit))
        }
    }

    fn factor(&self, unit: &str) -> FrescoResult<f64> {
        self.factors()
            .and_then(|table| table.iter().find(|(name, _)| *name == unit))
            .map(|(_, factor)| *factor)
            .ok_or_else(|| FrescoError::unknown_unit(self.name(), unit))
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitFamily {
    type Err = FrescoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitFamily::from_name(s)
    }
}

/// Names of every registered family
pub fn unit_families() -> Vec<&'static str> {
    UnitFamily::ALL.iter().map(|family| family.name()).collect()
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` from `from_unit` to `to_unit` within `family`.
///
/// Both units are validated even when they are equal. Equal units return the
/// input untouched; any other conversion is rounded to
/// [`CONVERSION_PRECISION`] fractional digits.
///
/// # Example
///
/// ```rust
/// use fresco_core::units::{convert, UnitFamily};
///
/// assert_eq!(convert(22.1, UnitFamily::Pressure, "MPa", "kPa").unwrap(), 22100.0);
/// assert!(convert(1.0, UnitFamily::Length, "mm", "MPa").is_err());
/// ```
pub fn convert(value: f64, family: UnitFamily, from_unit: &str, to_unit: &str) -> FrescoResult<f64> {
    family.require(from_unit)?;
    family.require(to_unit)?;

    if from_unit == to_unit {
        return Ok(value);
    }

    let result = match family {
        UnitFamily::Temperature => convert_temperature(value, from_unit, to_unit)?,
        _ => value * family.factor(from_unit)? / family.factor(to_unit)?,
    };

    Ok(round_to_precision(result, CONVERSION_PRECISION))
}

/// Same as [`convert`], with the family given by its registered name.
pub fn convert_named(value: f64, family: &str, from_unit: &str, to_unit: &str) -> FrescoResult<f64> {
    convert(value, UnitFamily::from_name(family)?, from_unit, to_unit)
}

/// Affine temperature conversion through Kelvin (unrounded).
pub fn convert_temperature(value: f64, from_unit: &str, to_unit: &str) -> FrescoResult<f64> {
    let family = UnitFamily::Temperature;
    family.require(from_unit)?;
    family.require(to_unit)?;

    if from_unit == to_unit {
        return Ok(value);
    }

    let kelvin = match from_unit {
        "C" => value + KELVIN_OFFSET,
        "F" => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
        _ => value,
    };

    Ok(match to_unit {
        "C" => kelvin - KELVIN_OFFSET,
        "F" => (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
        _ => kelvin,
    })
}

/// Round to a fixed number of fractional digits using decimal rounding.
pub fn round_to_precision(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// Relative error [`format_compact`] may introduce
pub const COMPACT_TOLERANCE: f64 = 1e-10;

/// Most significant digits [`format_compact`] ever writes
pub const COMPACT_MAX_DIGITS: usize = 12;

fn round_significant(value: f64, digits: usize) -> f64 {
    format!("{:.*e}", digits.saturating_sub(1), value)
        .parse()
        .unwrap_or(value)
}

/// Shortest decimal text within [`COMPACT_TOLERANCE`] of `value`, without
/// trailing zeros (`2.0` → `"2"`, `149.99999999999997` → `"150"`).
///
/// Values with up to eight significant digits survive a conversion to
/// another unit and back unchanged.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let tolerance = value.abs() * COMPACT_TOLERANCE;
    let rounded = (1..=COMPACT_MAX_DIGITS)
        .map(|digits| round_significant(value, digits))
        .find(|r| (r - value).abs() <= tolerance)
        .unwrap_or_else(|| round_significant(value, COMPACT_MAX_DIGITS));
    // Avoid "-0" for values that rounded to zero from below
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 6] = [0.0, 1.0, 22.1, 150.0, 1500.0, 0.0035];

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-8 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_length_conversion() {
        assert_eq!(convert(1500.0, UnitFamily::Length, "mm", "cm").unwrap(), 150.0);
        assert_eq!(convert(1.0, UnitFamily::Length, "ft", "in").unwrap(), 12.0);
        assert_eq!(convert(2.0, UnitFamily::Length, "m", "mm").unwrap(), 2000.0);
    }

    #[test]
    fn test_rounding_suppresses_binary_noise() {
        // 1.4 * 0.01 / 0.001 is 13.999999999999998 in binary floating point
        assert_eq!(convert(1.4, UnitFamily::Length, "cm", "mm").unwrap(), 14.0);
        assert_eq!(convert(22.1, UnitFamily::Pressure, "MPa", "kPa").unwrap(), 22100.0);
    }

    #[test]
    fn test_identity_is_exact() {
        let odd = 0.1 + 0.2;
        for family in UnitFamily::ALL {
            for unit in family.units() {
                assert_eq!(convert(odd, family, unit, unit).unwrap(), odd);
            }
        }
    }

    #[test]
    fn test_round_trip_every_pair() {
        for family in UnitFamily::ALL {
            for from in family.units() {
                for to in family.units() {
                    for value in SAMPLES {
                        let there = convert(value, family, from, to).unwrap();
                        let back = convert(there, family, to, from).unwrap();
                        assert_close(back, value);
                    }
                }
            }
        }
    }

    #[test]
    fn test_temperature() {
        assert_eq!(convert(0.0, UnitFamily::Temperature, "C", "F").unwrap(), 32.0);
        assert_eq!(convert(0.0, UnitFamily::Temperature, "C", "K").unwrap(), 273.15);
        assert_eq!(convert(212.0, UnitFamily::Temperature, "F", "C").unwrap(), 100.0);
        assert_eq!(convert(273.15, UnitFamily::Temperature, "K", "C").unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = convert(1.0, UnitFamily::Length, "mm", "furlong").unwrap_err();
        assert_eq!(err, FrescoError::unknown_unit("Length", "furlong"));

        // Equal but unregistered units are still rejected
        assert!(convert(1.0, UnitFamily::Pressure, "bar", "bar").is_err());
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(UnitFamily::from_name("Concentrated_Force").unwrap(), UnitFamily::ConcentratedForce);
        assert_eq!("Work".parse::<UnitFamily>().unwrap(), UnitFamily::Work);
        assert_eq!(
            UnitFamily::from_name("Volume").unwrap_err().error_code(),
            "UNKNOWN_UNIT_FAMILY"
        );
        assert!(convert_named(1.0, "Volume", "l", "l").is_err());
        assert_eq!(unit_families().len(), 10);
    }

    #[test]
    fn test_family_membership() {
        assert!(UnitFamily::Length.contains("mm"));
        assert!(!UnitFamily::Length.contains("MPa"));
        assert!(UnitFamily::Temperature.contains("F"));
        assert_eq!(UnitFamily::Pressure.base_unit(), "Pa");
        assert_eq!(UnitFamily::Temperature.base_unit(), "K");
        assert_eq!(UnitFamily::Strain.units(), vec!["strain", "percent", "%", "ratio"]);
    }

    #[test]
    fn test_serialization_names() {
        let json = serde_json::to_string(&UnitFamily::DistributedForce).unwrap();
        assert_eq!(json, "\"Distributed_Force\"");
        let roundtrip: UnitFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, UnitFamily::DistributedForce);
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(2.0), "2");
        assert_eq!(format_compact(1.4), "1.4");
        assert_eq!(format_compact(-0.0), "0");
        assert_eq!(format_compact(0.7874015748031), "0.7874015748");
        assert_eq!(format_compact(3.14159265358979), "3.1415926536");
        assert_eq!(format_compact(149.99999999999997), "150");
        assert_eq!(format_compact(20.00000000000001), "20");
        assert_eq!(format_compact(9.99999999999988), "10");
        assert_eq!(format_compact(22100.0), "22100");
    }
}
