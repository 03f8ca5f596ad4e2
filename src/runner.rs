// src/runner.rs
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc,
};
use std::thread;

use thiserror::Error;

use crate::{
    config::options::{ErrorPolicy, GradeOptions, SectionOptions},
    core::sanitize::normalize_stream,
    engine::{
        error::{LayoutError, ReconstructError},
        reconstruct::reconstruct,
        types::{GradeRecord, Reconstruction, TableLayout},
    },
    progress::Progress,
    specs::{
        grade_report::is_excluded,
        section_listing::{format_sections, RawSection, SectionError},
    },
    store::{self, StoreError},
};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("invalid table layout: {0}")]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Section(#[from] SectionError),

    #[error("department {name}: {source}")]
    Department { name: String, source: ReconstructError },

    #[error("workers stopped early: {done} of {total} departments reported")]
    Incomplete { done: usize, total: usize },
}

/// Summary of what was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Departments (or raw section rows) read after exclusions.
    pub inputs: usize,
    /// Records written.
    pub records: usize,
    /// Departments left out under `ErrorPolicy::Skip`.
    pub skipped: Vec<String>,
    pub out_path: PathBuf,
}

type Job = (String, Vec<String>);
type Outcome = Result<Reconstruction, ReconstructError>;

/// Reconstruct every department in the semester's token dump and write the
/// formatted records, one array per department, in input order.
pub fn run_grades(
    opts: &GradeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    let layout = TableLayout::for_semester(&opts.semester);
    layout.check()?;

    let input = opts.input_path();
    logf!("Grades {} ({}): reading {}", opts.semester, opts.semester.code(), input.display());
    let departments = store::load_departments(&input)?;

    let mut jobs: Vec<Job> = Vec::with_capacity(departments.len());
    for dep in departments {
        if is_excluded(&dep.name, opts.semester.term) {
            logd!("Excluding {} for {}", dep.name, opts.semester.term);
            continue;
        }
        let tokens = normalize_stream(&dep.source.into_tokens(layout));
        jobs.push((dep.name, tokens));
    }

    let names: Vec<String> = jobs.iter().map(|(name, _)| name.clone()).collect();
    let total = jobs.len();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(total);
    }

    let outcomes = reconstruct_all(jobs, layout, opts.workers, &names, &mut progress);

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let done = outcomes.iter().filter(|o| o.is_some()).count();
    if done < total {
        loge!("Only {done} of {total} departments came back");
        return Err(RunError::Incomplete { done, total });
    }

    let mut formatted: Vec<Vec<GradeRecord>> = Vec::with_capacity(total);
    let mut skipped = Vec::new();
    for (name, outcome) in names.into_iter().zip(outcomes.into_iter().flatten()) {
        match outcome {
            Ok(rec) => formatted.push(rec.records),
            Err(source) => match opts.on_error {
                ErrorPolicy::Abort => return Err(RunError::Department { name, source }),
                ErrorPolicy::Skip => skipped.push(name),
            },
        }
    }

    let out_path = opts.out_path();
    store::save_json(&out_path, &formatted)?;

    let records = formatted.iter().map(Vec::len).sum();
    logf!(
        "Wrote {records} records from {} departments to {} ({} skipped)",
        formatted.len(),
        out_path.display(),
        skipped.len()
    );

    Ok(RunSummary { inputs: total, records, skipped, out_path })
}

/// Run `reconstruct` over `jobs` on a small worker pool. Slot `i` holds the
/// outcome for `jobs[i]`, or `None` if no worker reported it.
fn reconstruct_all(
    jobs: Vec<Job>,
    layout: &'static TableLayout,
    workers: usize,
    names: &[String],
    progress: &mut Option<&mut dyn Progress>,
) -> Vec<Option<Outcome>> {
    let mut outcomes: Vec<Option<Outcome>> = vec![None; jobs.len()];
    if jobs.is_empty() {
        return outcomes;
    }

    let jobs_arc = Arc::new(jobs);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(usize, Outcome)>();

    let workers = workers.min(jobs_arc.len()).max(1);

    for _ in 0..workers {
        let jobs = Arc::clone(&jobs_arc);
        let idx = Arc::clone(&counter);
        let tx = res_tx.clone();

        thread::spawn(move || {
            loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= jobs.len() {
                    break;
                }
                let (name, tokens) = &jobs[i];
                if tx.send((i, reconstruct(name, tokens, layout))).is_err() {
                    break;
                }
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    for _ in 0..jobs_arc.len() {
        match res_rx.recv() {
            Ok((i, outcome)) => {
                let name = names[i].as_str();
                match &outcome {
                    Ok(rec) => {
                        logd!("{name}: {} records, {} students", rec.records.len(), rec.summary.num_of_student);
                        if let Some(p) = progress.as_deref_mut() {
                            p.item_done(i, name);
                        }
                    }
                    Err(e) => {
                        loge!("{name}: {e}");
                        if let Some(p) = progress.as_deref_mut() {
                            p.item_failed(i, name, &e.to_string());
                        }
                    }
                }
                outcomes[i] = Some(outcome);
            }
            Err(_) => break, // every worker hung up
        }
    }

    outcomes
}

/// Fold continuation rows and parse times/dates for the section listing.
pub fn run_sections(
    opts: &SectionOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    let input = opts.input_path();
    logf!("Sections: reading {}", input.display());
    let raw: Vec<RawSection> = store::load_json(&input)?;
    let inputs = raw.len();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(inputs);
        p.log(&format!("Formatting {inputs} rows"));
    }
    let formatted = format_sections(raw);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    let sections = formatted?;

    let out_path = opts.out_path();
    store::save_json(&out_path, &sections)?;
    logf!("Wrote {} sections ({inputs} rows) to {}", sections.len(), out_path.display());

    Ok(RunSummary { inputs, records: sections.len(), skipped: Vec::new(), out_path })
}
