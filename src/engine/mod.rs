// src/engine/mod.rs
//! Grade-report reconstruction.
//!
//! A department arrives as one flat stream of normalized text tokens pulled
//! from the PDF. `reconstruct` strips the subtotal rows, slices the rest into
//! fixed-width record blocks, maps each block onto a [`GradeRecord`] and checks
//! the per-field sum against the college total row found in the raw stream.
//!
//! Positions come from a [`TableLayout`]; see `specs::grade_report` for the one
//! the registrar's report uses.
pub mod error;
pub mod reconstruct;
pub mod types;

pub use error::{LayoutError, ReconstructError};
pub use reconstruct::{chunk, extract_summary, map_record, reconstruct, strip_noise, strip_sentinel, validate};
pub use types::{CollegeSummary, CountField, CountTotals, FieldMismatch, GradeCounts, GradeRecord, Reconstruction, Sentinels, TableLayout};
