// src/engine/error.rs
use thiserror::Error;

use super::types::FieldMismatch;

/// Why a department's token stream could not be turned into validated records.
/// All of these are fatal for that department; none are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructError {
    /// Cleaned stream does not split into whole records: a sentinel was missed
    /// or the report layout drifted.
    #[error("stream of {len} tokens is not a multiple of the {record_len}-token record size")]
    MalformedStreamLength { len: usize, record_len: usize },

    #[error("no '{sentinel}' row in stream; cannot validate")]
    MissingSummarySentinel { sentinel: String },

    #[error("'{sentinel}' row at token {index} needs {needed} tokens, only {available} remain")]
    TruncatedSummary { sentinel: String, index: usize, needed: usize, available: usize },

    /// A token where a number belongs did not parse; offsets are probably off.
    #[error("field '{field}' at offset {offset}: '{token}' is not a number")]
    NumericParseFailure { field: String, offset: usize, token: String },

    #[error("identifier '{token}' does not split into department, course and section on '{delimiter}'")]
    MalformedIdentifier { token: String, delimiter: char },

    #[error("department {department}: records disagree with the college total on {}", list_mismatches(.mismatches))]
    ValidationMismatch { department: String, mismatches: Vec<FieldMismatch> },
}

impl ReconstructError {
    /// Fields named by a validation failure; empty for other kinds.
    pub fn mismatched_fields(&self) -> Vec<&'static str> {
        match self {
            ReconstructError::ValidationMismatch { mismatches, .. } => {
                mismatches.iter().map(|m| m.field.name()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn list_mismatches(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A layout that would silently misalign fields. Raised by `TableLayout::check`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{what} must be greater than zero")]
    ZeroLength { what: &'static str },

    #[error("field '{field}' at offset {offset} lies outside the {record_len}-token record")]
    OffsetOutOfRange { field: &'static str, offset: usize, record_len: usize },

    #[error("fields '{first}' and '{second}' both use offset {offset}")]
    OverlappingOffsets { first: &'static str, second: &'static str, offset: usize },

    #[error("count field '{field}' has no offset")]
    MissingCountField { field: &'static str },

    #[error("count field '{field}' is listed more than once")]
    DuplicateCountField { field: &'static str },

    #[error("count field '{field}' at offset {offset} falls outside the {block_len}-token subtotal row")]
    SummaryOutOfBlock { field: &'static str, offset: usize, block_len: usize },

    #[error("sentinel label '{label}' is empty or repeated")]
    BadSentinel { label: &'static str },

    #[error("identifier delimiter must not be whitespace")]
    BadDelimiter,
}
