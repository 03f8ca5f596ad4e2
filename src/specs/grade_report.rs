// src/specs/grade_report.rs
//! Layout of the registrar's grade-distribution report.
//!
//! Every section row is 20 text cells:
//!
//! ```text
//!  0  DEPT-COURSE-SECTION
//!  1  A     2  A%     3  B     4  B%     5  C     6  C%
//!  7  D     8  D%     9  F    10  F%    11  total A-F
//! 12  GPA  13  I     14  S    15  U     16  Q    17  X
//! 18  students enrolled        19  instructor
//! ```
//!
//! Subtotal rows (`COURSE TOTAL:`, `DEPARTMENT TOTAL:`, `COLLEGE TOTAL:`) use the
//! same columns with the label in cell 0. Every PDF page starts with 38 cells of
//! headers and legend text.

use crate::config::options::{Semester, Term};
use crate::engine::types::{CountField, Sentinels, TableLayout};

pub const COURSE_TOTAL: &str = "COURSE TOTAL:";
pub const DEPARTMENT_TOTAL: &str = "DEPARTMENT TOTAL:";
pub const COLLEGE_TOTAL: &str = "COLLEGE TOTAL:";

static COUNT_OFFSETS: [(CountField, usize); 11] = [
    (CountField::A, 1),
    (CountField::B, 3),
    (CountField::C, 5),
    (CountField::D, 7),
    (CountField::F, 9),
    (CountField::I, 13),
    (CountField::S, 14),
    (CountField::U, 15),
    (CountField::Q, 16),
    (CountField::X, 17),
    (CountField::NumOfStudent, 18),
];

pub static GRADE_REPORT: TableLayout = TableLayout {
    record_len: 20,
    sentinel_block_len: 20,
    page_header_len: 38,
    id_delimiter: '-',
    sentinels: Sentinels {
        course: COURSE_TOTAL,
        department: DEPARTMENT_TOTAL,
        college: COLLEGE_TOTAL,
    },
    id_offset: 0,
    gpa_offset: 12,
    instructor_offset: 19,
    count_offsets: &COUNT_OFFSETS,
};

/// College codes on the report index that are not departments with a
/// standard layout (university total, law, Galveston, professional schools).
const NON_DEPARTMENTS: [&str; 7] = ["UT", "SL", "GV", "MD_PROF", "DN_PROF", "SL_PROF", "CP_PROF"];

impl TableLayout {
    /// Every term published so far uses the same report layout.
    pub fn for_semester(_semester: &Semester) -> &'static TableLayout {
        &GRADE_REPORT
    }
}

/// Whether `department` should be left out for `term`. Summer lists none.
pub fn is_excluded(department: &str, term: Term) -> bool {
    match term {
        Term::Spring | Term::Fall => NON_DEPARTMENTS.contains(&department),
        Term::Summer => false,
    }
}

/// Flatten per-page cell lists into one department stream, dropping the page
/// furniture from the start of each page.
pub fn department_stream(pages: &[Vec<String>], layout: &TableLayout) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.iter().skip(layout.page_header_len).cloned())
        .collect()
}
