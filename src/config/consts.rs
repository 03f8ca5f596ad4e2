// src/config/consts.rs

// Local store
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Data files: <stem>-<semester>-<stage>.json
pub const DEFAULT_DATA_DIR: &str = "data";
pub const GRADE_STEM: &str = "grade";
pub const SECTION_STEM: &str = "sections";
pub const PARSED_STAGE: &str = "parsed";
pub const FORMATTED_STAGE: &str = "formatted";
pub const JSON_EXT: &str = "json";

// Semester
pub const DEFAULT_YEAR: u16 = 2017;

// Concurrency
pub const WORKERS: usize = 4;
