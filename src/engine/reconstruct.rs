// src/engine/reconstruct.rs
//
// Department token stream → validated grade records.
//
//   raw ──┬─ extract_summary ─────────────────────────┐
//         └─ strip_noise → chunk → map_record (each) ──┴─ validate
//
// Every function here is pure: inputs are borrowed, outputs are new values.

use std::slice::ChunksExact;

use super::error::ReconstructError;
use super::types::{CollegeSummary, CountTotals, GradeCounts, GradeRecord, Reconstruction, TableLayout};

/// Run the whole pipeline for one department. `department` names the input in
/// a validation failure.
///
/// The college summary is read first so a stream without one fails before any
/// record work is done.
pub fn reconstruct(
    department: &str,
    tokens: &[String],
    layout: &TableLayout,
) -> Result<Reconstruction, ReconstructError> {
    let summary = extract_summary(tokens, layout)?;
    let cleaned = strip_noise(tokens, layout);
    let records = chunk(&cleaned, layout)?
        .map(|block| map_record(block, layout))
        .collect::<Result<Vec<_>, _>>()?;
    validate(department, &records, &summary)?;
    Ok(Reconstruction { records, summary })
}

/* ---------------- Noise stripper ---------------- */

/// Remove every subtotal row (course, then department, then college totals).
pub fn strip_noise(tokens: &[String], layout: &TableLayout) -> Vec<String> {
    let mut out = tokens.to_vec();
    for label in layout.sentinels.strip_order() {
        drain_sentinel(&mut out, label, layout.sentinel_block_len);
    }
    out
}

/// Remove each `label` token plus the tokens after it, `block_len` in total.
pub fn strip_sentinel(tokens: &[String], label: &str, block_len: usize) -> Vec<String> {
    let mut out = tokens.to_vec();
    drain_sentinel(&mut out, label, block_len);
    out
}

fn drain_sentinel(stream: &mut Vec<String>, label: &str, block_len: usize) {
    let hits = all_indexes(stream, label);
    // Back to front: an earlier index stays valid after a later block is gone.
    for &ix in hits.iter().rev() {
        let end = (ix + block_len).min(stream.len());
        stream.drain(ix..end);
    }
}

fn all_indexes(stream: &[String], label: &str) -> Vec<usize> {
    stream
        .iter()
        .enumerate()
        .filter(|(_, t)| t.as_str() == label)
        .map(|(i, _)| i)
        .collect()
}

/* ---------------- Chunker ---------------- */

pub fn chunk<'a>(tokens: &'a [String], layout: &TableLayout) -> Result<ChunksExact<'a, String>, ReconstructError> {
    if tokens.len() % layout.record_len != 0 {
        return Err(ReconstructError::MalformedStreamLength {
            len: tokens.len(),
            record_len: layout.record_len,
        });
    }
    Ok(tokens.chunks_exact(layout.record_len))
}

/* ---------------- Record mapper ---------------- */

pub fn map_record(block: &[String], layout: &TableLayout) -> Result<GradeRecord, ReconstructError> {
    if block.len() != layout.record_len {
        return Err(ReconstructError::MalformedStreamLength {
            len: block.len(),
            record_len: layout.record_len,
        });
    }

    let (department, course, section) = split_identifier(&block[layout.id_offset], layout.id_delimiter)?;

    let mut counts = GradeCounts::default();
    for &(field, offset) in layout.count_offsets {
        *counts.get_mut(field) = parse_count(&block[offset], field.name(), offset)?;
    }

    Ok(GradeRecord {
        department,
        course,
        section,
        counts,
        gpa: parse_gpa(&block[layout.gpa_offset], layout.gpa_offset)?,
        instructor: block[layout.instructor_offset].clone(),
    })
}

fn split_identifier(token: &str, delimiter: char) -> Result<(String, String, String), ReconstructError> {
    let parts: Vec<&str> = token.split(delimiter).collect();
    match parts.as_slice() {
        [dept, course, section] => Ok((s!(*dept), s!(*course), s!(*section))),
        _ => Err(ReconstructError::MalformedIdentifier { token: s!(token), delimiter }),
    }
}

fn parse_count(token: &str, field: &str, offset: usize) -> Result<u32, ReconstructError> {
    token.parse::<u32>().map_err(|_| numeric_failure(token, field, offset))
}

fn parse_gpa(token: &str, offset: usize) -> Result<f64, ReconstructError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(numeric_failure(token, "gpa", offset)),
    }
}

fn numeric_failure(token: &str, field: &str, offset: usize) -> ReconstructError {
    ReconstructError::NumericParseFailure { field: s!(field), offset, token: s!(token) }
}

/* ---------------- Summary extractor ---------------- */

/// Read the college total row from the unstripped stream.
pub fn extract_summary(raw: &[String], layout: &TableLayout) -> Result<CollegeSummary, ReconstructError> {
    let sentinel = layout.sentinels.college;
    let at = raw
        .iter()
        .position(|t| t == sentinel)
        .ok_or_else(|| ReconstructError::MissingSummarySentinel { sentinel: s!(sentinel) })?;

    let mut summary = CollegeSummary::default();
    for &(field, offset) in layout.count_offsets {
        let token = raw.get(at + offset).ok_or_else(|| ReconstructError::TruncatedSummary {
            sentinel: s!(sentinel),
            index: at,
            needed: offset + 1,
            available: raw.len() - at,
        })?;
        *summary.get_mut(field) = parse_count(token, field.name(), offset)?;
    }
    Ok(summary)
}

/* ---------------- Validator ---------------- */

/// Field-wise sum of `records` must equal `summary`.
pub fn validate(
    department: &str,
    records: &[GradeRecord],
    summary: &CollegeSummary,
) -> Result<(), ReconstructError> {
    let total: CountTotals = records.iter().map(|r| &r.counts).sum();
    let mismatches = summary.mismatches(&total);
    if mismatches.is_empty() {
        return Ok(());
    }
    Err(ReconstructError::ValidationMismatch { department: s!(department), mismatches })
}
