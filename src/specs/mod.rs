// src/specs/mod.rs
//! # Report “specs” module
//!
//! This module hosts the **document-specific specifications** for the
//! registrar's exports. Each spec focuses on one kind of document and encodes
//! *where the ground truth lives in the extracted text* and *how to shape it*.
//!
//! ## What lives here
//! - **Table layouts** for the grade-report PDFs (record width, subtotal labels,
//!   named column offsets) as plain `static` data the engine reads.
//! - **Page handling** that belongs to the document, not the engine (dropping
//!   the page furniture at the top of every PDF page).
//! - **Term rules** such as which department codes are not real departments.
//! - **Section listing shaping**: folding continuation rows and turning the
//!   registrar's time/date strings into structured values.
//!
//! ## What does **not** live here
//! - **Reconstruction** of records from a token stream (`engine`).
//! - **Persistence** (`store`) and orchestration (`runner`).
//!
//! ## Typical call chain
//! ```text
//! CLI → runner::run_grades → specs::grade_report::{is_excluded, department_stream}
//!                         ↘ engine::reconstruct(tokens, &GRADE_REPORT)
//!                 store::save_json (outside of specs)
//! ```
//!
//! ## Conventions & invariants
//! - A layout is checked once (`TableLayout::check`) before any stream is read.
//! - Nothing outside a layout hardcodes a token offset.
//!
//! In short: **`specs` knows how to read the documents.** Other layers decide
//! when to read them, where to keep them, and what to do on failure.
pub mod grade_report;
pub mod section_listing;
