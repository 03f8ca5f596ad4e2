// src/engine/types.rs
use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// The count columns that aggregate into the college total.
/// GPA, identifiers and instructor do not sum and are not listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountField {
    A,
    B,
    C,
    D,
    F,
    I,
    S,
    U,
    Q,
    X,
    NumOfStudent,
}

impl CountField {
    pub const ALL: [CountField; 11] = [
        CountField::A,
        CountField::B,
        CountField::C,
        CountField::D,
        CountField::F,
        CountField::I,
        CountField::S,
        CountField::U,
        CountField::Q,
        CountField::X,
        CountField::NumOfStudent,
    ];

    /// Name as it appears in the JSON output.
    pub fn name(self) -> &'static str {
        match self {
            CountField::A => "a",
            CountField::B => "b",
            CountField::C => "c",
            CountField::D => "d",
            CountField::F => "f",
            CountField::I => "i",
            CountField::S => "s",
            CountField::U => "u",
            CountField::Q => "q",
            CountField::X => "x",
            CountField::NumOfStudent => "numOfStudent",
        }
    }
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Letter/status grade counts plus enrollment for one section or one total row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub f: u32,
    pub i: u32,
    pub s: u32,
    pub u: u32,
    pub q: u32,
    pub x: u32,
    #[serde(rename = "numOfStudent")]
    pub num_of_student: u32,
}

impl GradeCounts {
    pub fn get(&self, field: CountField) -> u32 {
        match field {
            CountField::A => self.a,
            CountField::B => self.b,
            CountField::C => self.c,
            CountField::D => self.d,
            CountField::F => self.f,
            CountField::I => self.i,
            CountField::S => self.s,
            CountField::U => self.u,
            CountField::Q => self.q,
            CountField::X => self.x,
            CountField::NumOfStudent => self.num_of_student,
        }
    }

    pub fn get_mut(&mut self, field: CountField) -> &mut u32 {
        match field {
            CountField::A => &mut self.a,
            CountField::B => &mut self.b,
            CountField::C => &mut self.c,
            CountField::D => &mut self.d,
            CountField::F => &mut self.f,
            CountField::I => &mut self.i,
            CountField::S => &mut self.s,
            CountField::U => &mut self.u,
            CountField::Q => &mut self.q,
            CountField::X => &mut self.x,
            CountField::NumOfStudent => &mut self.num_of_student,
        }
    }

    /// Fields where `actual` differs from `self`, in column order.
    pub fn mismatches(&self, actual: &CountTotals) -> Vec<FieldMismatch> {
        CountField::ALL
            .iter()
            .filter(|&&f| u64::from(self.get(f)) != actual.get(f))
            .map(|&f| FieldMismatch { field: f, expected: self.get(f), actual: actual.get(f) })
            .collect()
    }
}

/// Field-wise sum over many records. Kept in `u64` so no realistic record set
/// can wrap or saturate and still compare equal to a `u32` total row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountTotals([u64; 11]);

impl CountTotals {
    pub fn get(&self, field: CountField) -> u64 {
        self.0[field as usize]
    }

    pub fn add(&mut self, counts: &GradeCounts) {
        for f in CountField::ALL {
            self.0[f as usize] += u64::from(counts.get(f));
        }
    }

    /// Back to per-row counts; `None` if any field exceeds `u32::MAX`.
    pub fn narrow(&self) -> Option<GradeCounts> {
        let mut out = GradeCounts::default();
        for f in CountField::ALL {
            *out.get_mut(f) = u32::try_from(self.get(f)).ok()?;
        }
        Some(out)
    }
}

impl<'a> Sum<&'a GradeCounts> for CountTotals {
    fn sum<I: Iterator<Item = &'a GradeCounts>>(iter: I) -> Self {
        let mut total = CountTotals::default();
        for c in iter {
            total.add(c);
        }
        total
    }
}

/// College-level total row. Only used to check a reconstruction; never written out.
pub type CollegeSummary = GradeCounts;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: CountField,
    /// Value on the college total row.
    pub expected: u32,
    /// Sum over the reconstructed records.
    pub actual: u64,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (total {}, records sum to {})", self.field, self.expected, self.actual)
    }
}

/// One course section reconstructed from a 20-token block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub department: String,
    pub course: String,
    pub section: String,
    #[serde(flatten)]
    pub counts: GradeCounts,
    pub gpa: f64,
    pub instructor: String,
}

/// Output of a successful department reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    pub records: Vec<GradeRecord>,
    pub summary: CollegeSummary,
}

/// Literal labels that open the subtotal rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sentinels {
    pub course: &'static str,
    pub department: &'static str,
    pub college: &'static str,
}

impl Sentinels {
    /// Labels in the order they must be stripped.
    pub fn strip_order(&self) -> [&'static str; 3] {
        [self.course, self.department, self.college]
    }
}

/// Fixed layout of one grade-report table.
///
/// Every stage reads positions from here; nothing else in the crate hardcodes
/// an offset. Run [`TableLayout::check`] once before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLayout {
    /// Tokens per section block.
    pub record_len: usize,
    /// Tokens removed per subtotal row: the label plus what follows it.
    pub sentinel_block_len: usize,
    /// Tokens of page furniture at the start of every PDF page.
    pub page_header_len: usize,
    /// Splits `DEPT-COURSE-SECTION`.
    pub id_delimiter: char,
    pub sentinels: Sentinels,
    pub id_offset: usize,
    pub gpa_offset: usize,
    pub instructor_offset: usize,
    /// Count columns; the same offsets apply relative to the college sentinel.
    pub count_offsets: &'static [(CountField, usize)],
}

impl TableLayout {
    pub fn count_offset(&self, field: CountField) -> Option<usize> {
        self.count_offsets
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, off)| off)
    }

    /// Every named position in the record block, in column order.
    pub fn named_offsets(&self) -> Vec<(&'static str, usize)> {
        let mut out = vec![("id", self.id_offset)];
        out.extend(self.count_offsets.iter().map(|&(f, off)| (f.name(), off)));
        out.push(("gpa", self.gpa_offset));
        out.push(("instructor", self.instructor_offset));
        out.sort_by_key(|&(_, off)| off);
        out
    }

    /// Reject layouts that would silently misalign fields.
    pub fn check(&self) -> Result<(), LayoutError> {
        if self.record_len == 0 {
            return Err(LayoutError::ZeroLength { what: "record_len" });
        }
        if self.sentinel_block_len == 0 {
            return Err(LayoutError::ZeroLength { what: "sentinel_block_len" });
        }
        if self.id_delimiter.is_whitespace() {
            return Err(LayoutError::BadDelimiter);
        }

        for field in CountField::ALL {
            match self.count_offsets.iter().filter(|(f, _)| *f == field).count() {
                0 => return Err(LayoutError::MissingCountField { field: field.name() }),
                1 => {}
                _ => return Err(LayoutError::DuplicateCountField { field: field.name() }),
            }
        }

        // named_offsets is sorted, so a shared offset shows up as neighbours
        let named = self.named_offsets();
        for &(field, offset) in &named {
            if offset >= self.record_len {
                return Err(LayoutError::OffsetOutOfRange { field, offset, record_len: self.record_len });
            }
        }
        for pair in named.windows(2) {
            if pair[0].1 == pair[1].1 {
                return Err(LayoutError::OverlappingOffsets {
                    first: pair[0].0,
                    second: pair[1].0,
                    offset: pair[0].1,
                });
            }
        }

        for &(field, offset) in self.count_offsets {
            if offset == 0 || offset >= self.sentinel_block_len {
                return Err(LayoutError::SummaryOutOfBlock {
                    field: field.name(),
                    offset,
                    block_len: self.sentinel_block_len,
                });
            }
        }

        let labels = self.sentinels.strip_order();
        for (i, &label) in labels.iter().enumerate() {
            if label.trim().is_empty() || labels[..i].contains(&label) {
                return Err(LayoutError::BadSentinel { label });
            }
        }

        Ok(())
    }
}
