//! Read-set descriptor files.
//!
//! One set per non-empty line:
//!
//! ```text
//! NAME: reads_1.fq[, reads_1.bv]; reads_2.fq.gz
//! other_reads.fa
//! ```
//!
//! A line without `:` is named `SET<n>`, where `n` counts non-empty lines
//! from 1. Each `;`-separated entry is a read file optionally followed by
//! `,` and a bit-vector file selecting its reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ReadshareError, Result};

/// One read file of a set, with its optional selection vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSetEntry {
    pub path: PathBuf,
    pub selection: Option<PathBuf>,
}

impl ReadSetEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            selection: None,
        }
    }

    pub fn with_selection(path: impl Into<PathBuf>, selection: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            selection: Some(selection.into()),
        }
    }
}

/// Named read sets, sorted by name.
pub type ReadSets = BTreeMap<String, Vec<ReadSetEntry>>;

fn parse_entry(text: &str) -> Option<ReadSetEntry> {
    let (file, selection) = match text.split_once(',') {
        Some((file, bv)) => (file.trim(), Some(bv.trim())),
        None => (text.trim(), None),
    };
    if file.is_empty() {
        return None;
    }
    Some(ReadSetEntry {
        path: PathBuf::from(file),
        selection: selection.filter(|s| !s.is_empty()).map(PathBuf::from),
    })
}

/// Parse descriptor text. A name defined twice keeps its last definition.
pub fn parse_read_sets(text: &str) -> Result<ReadSets> {
    let mut sets = ReadSets::new();
    let mut line_count = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        line_count += 1;

        let (name, files) = match line.split_once(':') {
            Some((name, files)) => (name.trim().to_string(), files),
            None => (format!("SET{}", line_count), line),
        };
        if name.is_empty() {
            return Err(ReadshareError::validation(format!(
                "read set on line {} has an empty name",
                line_count
            )));
        }

        let entries: Vec<ReadSetEntry> = files.split(';').filter_map(parse_entry).collect();
        if entries.is_empty() {
            return Err(ReadshareError::validation(format!(
                "read set '{}' lists no files",
                name
            )));
        }
        if sets.insert(name.clone(), entries).is_some() {
            log::warn!("Read set '{}' defined more than once, keeping the last one", name);
        }
    }

    Ok(sets)
}

/// Read and parse a descriptor file.
pub fn read_set_file(path: &Path) -> Result<ReadSets> {
    let text = std::fs::read_to_string(path).map_err(|e| ReadshareError::io(path, "read", e))?;
    parse_read_sets(&text).map_err(|e| match e {
        ReadshareError::Validation(msg) => ReadshareError::format(path, msg),
        other => other,
    })
}
