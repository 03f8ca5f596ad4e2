// src/store.rs
//! JSON files at the edges of the pipeline.
//!
//! Grade input comes in two shapes:
//! - an array with one token array per department (the extractor's dump), or
//! - an object keyed by department code, each value a token array or
//!   `{ "pages": [[...], ...] }` with the page furniture still in place.
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::engine::types::TableLayout;
use crate::file::ensure_parent;
use crate::specs::grade_report::department_stream;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("{path} is not valid input: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("cannot encode {path}: {source}")]
    Encode { path: PathBuf, source: serde_json::Error },
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })
}

/// Write `value` as compact JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write { path: path.to_path_buf(), source };

    ensure_parent(path).map_err(write_err)?;
    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, value)
        .map_err(|source| StoreError::Encode { path: path.to_path_buf(), source })?;
    out.flush().map_err(write_err)
}

/// Tokens for one department, as found in the input file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenSource {
    /// Already flattened, page headers removed.
    Flat(Vec<String>),
    /// Raw per-page cells.
    Paged { pages: Vec<Vec<String>> },
}

impl TokenSource {
    pub fn into_tokens(self, layout: &TableLayout) -> Vec<String> {
        match self {
            TokenSource::Flat(tokens) => tokens,
            TokenSource::Paged { pages } => department_stream(&pages, layout),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentInput {
    pub name: String,
    pub source: TokenSource,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GradeInput {
    List(Vec<TokenSource>),
    Named(serde_json::Map<String, serde_json::Value>),
}

/// Load departments in file order. Entries of the array form are named `#0`, `#1`, …
pub fn load_departments(path: &Path) -> Result<Vec<DepartmentInput>, StoreError> {
    let parse_err = |source| StoreError::Parse { path: path.to_path_buf(), source };

    match load_json::<GradeInput>(path)? {
        GradeInput::List(list) => Ok(list
            .into_iter()
            .enumerate()
            .map(|(i, source)| DepartmentInput { name: format!("#{i}"), source })
            .collect()),
        GradeInput::Named(map) => map
            .into_iter()
            .map(|(name, value)| {
                let source = serde_json::from_value(value).map_err(parse_err)?;
                Ok(DepartmentInput { name, source })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::grade_report::GRADE_REPORT;
    use std::fs;

    fn remove_if_exists(path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("grade_scrape_store_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn array_input_gets_index_names() {
        let p = scratch("list.json");
        save_json(&p, &vec![strings!["a", "b"], strings!["c"]]).unwrap();

        let deps = load_departments(&p).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].name, "#1");
        assert_eq!(deps[0].source, TokenSource::Flat(strings!["a", "b"]));
        remove_if_exists(&p).unwrap();
    }

    #[test]
    fn named_input_keeps_file_order_and_pages() {
        let p = scratch("named.json");
        let header: Vec<String> = (0..38).map(|i| i.to_string()).collect();
        let mut page = header.clone();
        page.push(s!("tok"));
        let json = serde_json::json!({
            "ZOO": ["z"],
            "ACCT": { "pages": [page] },
        });
        save_json(&p, &json).unwrap();

        let deps = load_departments(&p).unwrap();
        assert_eq!(deps.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), ["ZOO", "ACCT"]);
        assert_eq!(deps[1].source.clone().into_tokens(&GRADE_REPORT), strings!["tok"]);
        remove_if_exists(&p).unwrap();
    }

    #[test]
    fn missing_and_garbage_files() {
        let p = scratch("garbage.json");
        assert!(matches!(load_departments(&p), Err(StoreError::Read { .. })));
        save_json(&p, &42).unwrap();
        assert!(matches!(load_departments(&p), Err(StoreError::Parse { .. })));
        remove_if_exists(&p).unwrap();
        remove_if_exists(&p).unwrap();
    }
}
