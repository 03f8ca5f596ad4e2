// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::consts::{FORMATTED_STAGE, WORKERS};
use crate::config::options::{ErrorPolicy, GradeOptions, SectionOptions, Semester, Term};
use crate::engine::types::TableLayout;
use crate::file::resolve_out_path;
use crate::progress::Progress;
use crate::runner::{self, RunError, RunSummary};
use crate::store::StoreError;

#[derive(Parser, Debug)]
#[command(name = "grade_scrape", version, about = "Rebuild grade distributions and section listings from registrar exports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconstruct and validate grade records for one semester
    Grades(GradesArgs),
    /// Merge continuation rows and parse times/dates in the section listing
    Sections(SectionsArgs),
    /// Print the grade-report column offsets for a semester
    Layout {
        #[arg(long, default_value_t = Semester::default().year)]
        year: u16,
        #[arg(long, default_value = "spring")]
        term: Term,
    },
}

#[derive(Parser, Debug)]
pub struct GradesArgs {
    #[arg(long, default_value_t = Semester::default().year)]
    year: u16,

    /// spring, summer, fall (or 1, 2, 3)
    #[arg(long, default_value = "spring")]
    term: Term,

    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Token dump to read (default: <data-dir>/grade-<code>-parsed.json)
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file, or a directory ending in a separator
    #[arg(short, long, value_name = "PATH")]
    out: Option<String>,

    #[arg(long, default_value_t = WORKERS)]
    workers: usize,

    /// Leave failing departments out instead of stopping the run
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Parser, Debug)]
pub struct SectionsArgs {
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH")]
    out: Option<String>,
}

impl GradesArgs {
    fn into_options(self) -> Result<GradeOptions, RunError> {
        let mut opts = GradeOptions::for_semester(Semester::new(self.year, self.term));
        if let Some(dir) = self.data_dir {
            opts.data_dir = dir;
        }
        opts.workers = self.workers.max(1);
        if self.skip_invalid {
            opts.on_error = ErrorPolicy::Skip;
        }
        if let Some(input) = self.input {
            opts.set_input(input);
        }
        if let Some(out) = self.out {
            let path = resolve_out_path(&out, &opts.default_file_name(FORMATTED_STAGE))
                .map_err(|source| StoreError::Write { path: PathBuf::from(&out), source })?;
            opts.set_out(path);
        }
        Ok(opts)
    }
}

impl SectionsArgs {
    fn into_options(self) -> Result<SectionOptions, RunError> {
        let mut opts = SectionOptions::default();
        if let Some(dir) = self.data_dir {
            opts.data_dir = dir;
        }
        if let Some(input) = self.input {
            opts.set_input(input);
        }
        if let Some(out) = self.out {
            let path = resolve_out_path(&out, &opts.default_file_name(FORMATTED_STAGE))
                .map_err(|source| StoreError::Write { path: PathBuf::from(&out), source })?;
            opts.set_out(path);
        }
        Ok(opts)
    }
}

/// Prints one status line per department to stderr.
#[derive(Default)]
pub struct CliProgress {
    total: usize,
    seen: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, _index: usize, name: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {name} ok", self.seen, self.total);
    }

    fn item_failed(&mut self, _index: usize, name: &str, reason: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {name} FAILED: {reason}", self.seen, self.total);
    }
}

pub fn run(cli: Cli) -> Result<(), RunError> {
    let mut progress = CliProgress::default();
    match cli.command {
        Command::Grades(args) => {
            let opts = args.into_options()?;
            let summary = runner::run_grades(&opts, Some(&mut progress))?;
            report(&summary);
        }
        Command::Sections(args) => {
            let opts = args.into_options()?;
            let summary = runner::run_sections(&opts, Some(&mut progress))?;
            report(&summary);
        }
        Command::Layout { year, term } => {
            let layout = TableLayout::for_semester(&Semester::new(year, term));
            layout.check()?;
            println!("record {} tokens, subtotal rows {} tokens, page header {} tokens",
                layout.record_len, layout.sentinel_block_len, layout.page_header_len);
            for (field, offset) in layout.named_offsets() {
                println!("{offset:>3}  {field}");
            }
        }
    }
    Ok(())
}

fn report(summary: &RunSummary) {
    eprintln!("Wrote {} records from {} inputs to {}", summary.records, summary.inputs, summary.out_path.display());
    if !summary.skipped.is_empty() {
        eprintln!("Skipped: {}", summary.skipped.join(", "));
    }
}
