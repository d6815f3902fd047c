//! # Frame Dimensions
//!
//! Geometry a CAD generator needs from a normalized specimen record, read
//! and sanity-checked in one place. All values are in the record's length
//! unit (see [`Database::length_unit`](crate::database::Database::length_unit)).
//!
//! ```text
//!   ┌──────────────── bm_tot_l ────────────────┐
//!   │                beam (bm_h)                │
//!   └───┬───┬──────── frm_in_l ────────┬───┬────┘
//!       │col│                          │col│  frm_in_h
//!       │_h │          infill          │   │
//!   ┌───┴───┴──────────────────────────┴───┴───┐
//!   │            base beam (bbm_h)             │
//!   └──────────────── bbm_tot_l ───────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{FrescoError, FrescoResult};
use crate::record::Record;
use crate::units::{self, UnitFamily};

/// Primary frame dimensions plus the derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameDimensions {
    /// Floor-to-floor height (top of base beam to top of beam)
    pub frm_h: f64,
    /// Length between the outer column faces
    pub frm_l: f64,
    /// Column size parallel to the frame plane
    pub col_h: f64,
    /// Column size perpendicular to the frame plane
    pub col_d: f64,
    pub bm_h: f64,
    pub bm_t: f64,
    pub bbm_h: f64,
    pub bbm_t: f64,
    pub slb_d: f64,
    pub slb_h: f64,
    /// Column extension above the beam
    pub col_ext: f64,
    /// Beam extension past each column
    pub bm_ext: f64,
    /// Base-beam extension past each column
    pub bbm_ext: f64,
}

const POSITIVE: [&str; 6] = ["frm_h", "frm_l", "col_h", "col_d", "bm_h", "bm_t"];
const NON_NEGATIVE: [&str; 7] = ["bbm_h", "bbm_t", "slb_d", "slb_h", "col_ext", "bm_ext", "bbm_ext"];

fn number(record: &Record, field: &str) -> FrescoResult<f64> {
    let value = record
        .get(field)
        .ok_or_else(|| FrescoError::invalid_input(field, "", "field is missing"))?;
    value
        .as_f64()
        .ok_or_else(|| FrescoError::invalid_input(field, value.to_string(), "must be a number"))
}

impl FrameDimensions {
    /// Read and validate the frame geometry of a record.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a field is missing or not numeric, a primary
    /// dimension is not positive, an optional one is negative, or a derived
    /// dimension comes out non-positive.
    pub fn from_record(record: &Record) -> FrescoResult<Self> {
        for field in POSITIVE {
            let value = number(record, field)?;
            if value <= 0.0 {
                return Err(FrescoError::invalid_input(field, value.to_string(), "must be positive"));
            }
        }
        for field in NON_NEGATIVE {
            let value = number(record, field)?;
            if value < 0.0 {
                return Err(FrescoError::invalid_input(field, value.to_string(), "must not be negative"));
            }
        }

        let frame = FrameDimensions {
            frm_h: number(record, "frm_h")?,
            frm_l: number(record, "frm_l")?,
            col_h: number(record, "col_h")?,
            col_d: number(record, "col_d")?,
            bm_h: number(record, "bm_h")?,
            bm_t: number(record, "bm_t")?,
            bbm_h: number(record, "bbm_h")?,
            bbm_t: number(record, "bbm_t")?,
            slb_d: number(record, "slb_d")?,
            slb_h: number(record, "slb_h")?,
            col_ext: number(record, "col_ext")?,
            bm_ext: number(record, "bm_ext")?,
            bbm_ext: number(record, "bbm_ext")?,
        };
        frame.check_derived()?;
        Ok(frame)
    }

    fn check_derived(&self) -> FrescoResult<()> {
        let derived = [
            ("col_tot_h", self.column_total_height()),
            ("frm_in_l", self.clear_length()),
            ("frm_in_h", self.clear_height()),
            ("bm_tot_l", self.beam_total_length()),
            ("bbm_tot_l", self.base_beam_total_length()),
        ];
        match derived.iter().find(|(_, value)| *value <= 0.0) {
            Some((name, value)) => Err(FrescoError::invalid_input(
                *name,
                value.to_string(),
                "derived dimension must be positive",
            )),
            None => Ok(()),
        }
    }

    /// Column height including the base beam and the extension
    pub fn column_total_height(&self) -> f64 {
        self.col_ext + self.frm_h + self.bbm_h
    }

    /// Infill length between the inner column faces
    pub fn clear_length(&self) -> f64 {
        self.frm_l - 2.0 * self.col_h
    }

    /// Infill height below the beam
    pub fn clear_height(&self) -> f64 {
        self.frm_h - self.bm_h
    }

    pub fn beam_total_length(&self) -> f64 {
        2.0 * self.bm_ext + self.frm_l
    }

    pub fn base_beam_total_length(&self) -> f64 {
        2.0 * self.bbm_ext + self.frm_l
    }

    pub fn has_base_beam(&self) -> bool {
        self.bbm_h > 0.0 && self.bbm_t > 0.0
    }

    pub fn has_slab(&self) -> bool {
        self.slb_d > 0.0 && self.slb_h > 0.0
    }

    /// The same frame with every dimension expressed in `to_unit`
    pub fn convert(&self, from_unit: &str, to_unit: &str) -> FrescoResult<Self> {
        let c = |v: f64| units::convert(v, UnitFamily::Length, from_unit, to_unit);
        Ok(FrameDimensions {
            frm_h: c(self.frm_h)?,
            frm_l: c(self.frm_l)?,
            col_h: c(self.col_h)?,
            col_d: c(self.col_d)?,
            bm_h: c(self.bm_h)?,
            bm_t: c(self.bm_t)?,
            bbm_h: c(self.bbm_h)?,
            bbm_t: c(self.bbm_t)?,
            slb_d: c(self.slb_d)?,
            slb_h: c(self.slb_h)?,
            col_ext: c(self.col_ext)?,
            bm_ext: c(self.bm_ext)?,
            bbm_ext: c(self.bbm_ext)?,
        })
    }
}
