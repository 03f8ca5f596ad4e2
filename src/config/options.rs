// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::consts::*;

/// Academic term. The discriminant is the digit the registrar appends to the
/// year in report codes (`20171` = Spring 2017).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Spring = 1,
    Summer = 2,
    Fall = 3,
}

impl Term {
    pub fn digit(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Term::Spring => "Spring",
            Term::Summer => "Summer",
            Term::Fall => "Fall",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Term {
    type Err = String;

    /// Accepts the name (any case) or the registrar digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" | "1" => Ok(Term::Spring),
            "summer" | "2" => Ok(Term::Summer),
            "fall" | "3" => Ok(Term::Fall),
            other => Err(format!("Unknown term: {other} (expected spring, summer or fall)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Semester {
    pub year: u16,
    pub term: Term,
}

impl Semester {
    pub fn new(year: u16, term: Term) -> Self {
        Self { year, term }
    }

    /// Registrar code, e.g. `"20171"`.
    pub fn code(&self) -> String {
        format!("{}{}", self.year, self.term.digit())
    }
}

impl Default for Semester {
    fn default() -> Self {
        Self { year: DEFAULT_YEAR, term: Term::Spring }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.year)
    }
}

/// What the runner does when one department fails to reconstruct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the run and report the first failing department.
    #[default]
    Abort,
    /// Log the failure, leave the department out of the output, keep going.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeOptions {
    pub semester: Semester,
    pub data_dir: PathBuf,
    pub workers: usize,
    pub on_error: ErrorPolicy,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
}

impl Default for GradeOptions {
    fn default() -> Self {
        Self {
            semester: Semester::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            workers: WORKERS,
            on_error: ErrorPolicy::Abort,
            input: None,
            out: None,
        }
    }
}

impl GradeOptions {
    pub fn for_semester(semester: Semester) -> Self {
        Self { semester, ..Self::default() }
    }

    /// Token dump to read: explicit override, else `<data>/grade-<code>-parsed.json`.
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.default_file_name(PARSED_STAGE)))
    }

    /// Where formatted records go: explicit override, else `<data>/grade-<code>-formatted.json`.
    pub fn out_path(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.default_file_name(FORMATTED_STAGE)))
    }

    pub fn default_file_name(&self, stage: &str) -> String {
        data_file_name(GRADE_STEM, Some(&self.semester), stage)
    }

    pub fn set_input(&mut self, path: impl Into<PathBuf>) {
        self.input = Some(path.into());
    }

    pub fn set_out(&mut self, path: impl Into<PathBuf>) {
        self.out = Some(path.into());
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionOptions {
    pub data_dir: PathBuf,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            input: None,
            out: None,
        }
    }
}

impl SectionOptions {
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.default_file_name(PARSED_STAGE)))
    }

    pub fn out_path(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| self.data_dir.join(self.default_file_name(FORMATTED_STAGE)))
    }

    pub fn default_file_name(&self, stage: &str) -> String {
        data_file_name(SECTION_STEM, None, stage)
    }

    pub fn set_input(&mut self, path: impl Into<PathBuf>) {
        self.input = Some(path.into());
    }

    pub fn set_out(&mut self, path: impl Into<PathBuf>) {
        self.out = Some(path.into());
    }
}

/// `grade-20171-parsed.json`, `sections-formatted.json`, …
fn data_file_name(stem: &str, semester: Option<&Semester>, stage: &str) -> String {
    match semester {
        Some(sem) => join!(stem, "-", &sem.code(), "-", stage, ".", JSON_EXT),
        None => join!(stem, "-", stage, ".", JSON_EXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn semester_code_appends_term_digit() {
        assert_eq!(Semester::new(2017, Term::Spring).code(), "20171");
        assert_eq!(Semester::new(2018, Term::Fall).code(), "20183");
    }

    #[test]
    fn term_parses_names_and_digits() {
        assert_eq!("Summer".parse::<Term>(), Ok(Term::Summer));
        assert_eq!("3".parse::<Term>(), Ok(Term::Fall));
        assert!("winter".parse::<Term>().is_err());
    }

    #[test]
    fn default_paths_follow_semester() {
        let mut opts = GradeOptions::for_semester(Semester::new(2017, Term::Summer));
        assert_eq!(opts.input_path(), Path::new("data").join("grade-20172-parsed.json"));
        assert_eq!(opts.out_path(), Path::new("data").join("grade-20172-formatted.json"));

        opts.set_out("elsewhere/out.json");
        assert_eq!(opts.out_path(), Path::new("elsewhere/out.json"));
        // input untouched by the out override
        assert!(opts.input_path().ends_with("grade-20172-parsed.json"));
    }

    #[test]
    fn section_paths_have_no_semester() {
        let opts = SectionOptions::default();
        assert!(opts.input_path().ends_with("sections-parsed.json"));
        assert!(opts.out_path().ends_with("sections-formatted.json"));
    }
}
