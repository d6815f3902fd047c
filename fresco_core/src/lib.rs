//! # fresco_core - Unit-Aware Specimen Database
//!
//! `fresco_core` stores test specimens of reinforced-concrete frames with
//! masonry infill. Every field of a specimen record carries a physical unit;
//! values entered in any unit of the right family are normalized on the way
//! in, and can be re-expressed in other units on the way out without
//! touching what is stored.
//!
//! ## Design Philosophy
//!
//! - **Schema-driven**: a validated [`schema::FieldSchema`] says what each
//!   field is, which unit it defaults to and what its empty value is
//! - **Lenient ingestion, strict configuration**: bad input fields are
//!   dropped and reported; broken schemas and unknown units are errors
//! - **JSON-First**: records, reports and the persisted document serialize
//!   with serde
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use fresco_core::database::{Database, ExportOptions};
//! use fresco_core::record::RecordInput;
//! use fresco_core::schema::rc_frame_schema;
//!
//! let mut db = Database::in_memory(rc_frame_schema().unwrap());
//!
//! db.insert(1, RecordInput::new().quantity("col_h", 200, "mm"), false).unwrap();
//! db.insert(2, RecordInput::new().quantity("col_h", 20, "cm"), false).unwrap();
//! assert_eq!(db.record(1).unwrap().number("col_h"), db.record(2).unwrap().number("col_h"));
//!
//! let csv = db.export_table(&ExportOptions::new().fields(["col_h"])).unwrap().to_csv();
//! assert!(csv.starts_with("entry_id,col_h\r\nID,mm\r\n"));
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit families and conversion
//! - [`reinforcement`] - Rebar notation parsing and conversion
//! - [`schema`] - Field descriptors, defaults and the built-in RC frame table
//! - [`record`] - Stored values and caller input
//! - [`database`] - The record store, unit migration and export
//! - [`file_io`] - Persisted document, encodings and atomic saves
//! - [`frame`] - Frame geometry read from a normalized record
//! - [`errors`] - Structured error types
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod database;
pub mod errors;
pub mod file_io;
pub mod frame;
pub mod record;
pub mod reinforcement;
pub mod schema;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use database::{Database, DatabaseOptions, ExportOptions, IngestReport, MigrationReport, UnitAssignment};
pub use errors::{FrescoError, FrescoResult};
pub use frame::FrameDimensions;
pub use record::{EntryId, FieldInput, FieldValue, Record, RecordInput};
pub use schema::{rc_frame_schema, FieldSchema};
pub use units::UnitFamily;
