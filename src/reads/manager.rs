//! Aggregation of several read files into one read stream.

use std::path::{Path, PathBuf};

use super::read_file::{basename, ReadFile};
use super::set_parser::ReadSetEntry;
use super::source::ReadSource;
use crate::bitvec::BitVector;
use crate::constants::BIT_VECTOR_EXTENSION;
use crate::error::{ReadshareError, Result};

/// Ordered read files of one read set, each with a tag vector.
///
/// Files are visited in order; the cursor only moves forward until
/// [`ReadSource::rewind`]. With a read cap, comparison only covers the first
/// `cap` selected reads of each file (unfiltered reading stops after `cap`
/// tagged reads).
#[derive(Debug)]
pub struct FileManager {
    nickname: String,
    label: String,
    files: Vec<ReadFile>,
    tags: Vec<BitVector>,
    current: usize,
    consumed: u64,
    seen_in_file: u64,
    tagged_in_file: u64,
    read_cap: Option<u64>,
}

impl FileManager {
    /// Open every file of a read set.
    ///
    /// Files of unknown format are skipped with a warning; any other failure
    /// to open a file or its selection vector is an error.
    pub fn new(nickname: impl Into<String>, entries: &[ReadSetEntry]) -> Result<Self> {
        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let opened = match &entry.selection {
                Some(selection) => ReadFile::open_with_selection(&entry.path, selection),
                None => ReadFile::open(&entry.path),
            };
            match opened {
                Ok(file) => files.push(file),
                Err(ReadshareError::UnknownFormat { path }) => {
                    log::warn!("Unknown format: {} -> ignored", path.display());
                }
                Err(e) => return Err(e),
            }
        }
        Self::from_files(nickname, files)
    }

    /// Build a manager over already opened files.
    pub fn from_files(nickname: impl Into<String>, files: Vec<ReadFile>) -> Result<Self> {
        let tags = files
            .iter()
            .map(|f| BitVector::with_len(f.read_count(), false))
            .collect::<Result<Vec<_>>>()?;
        let label = files
            .iter()
            .map(|f| basename(f.path()))
            .collect::<Vec<_>>()
            .join("-");

        Ok(Self {
            nickname: nickname.into(),
            label,
            files,
            tags,
            current: 0,
            consumed: 0,
            seen_in_file: 0,
            tagged_in_file: 0,
            read_cap: None,
        })
    }

    /// Limit every file to `cap` reads.
    pub fn with_read_cap(mut self, cap: u64) -> Self {
        self.read_cap = Some(cap);
        self
    }

    pub fn read_cap(&self) -> Option<u64> {
        self.read_cap
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Base names of the files joined with `-`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn files(&self) -> &[ReadFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records over all files, selected or not.
    pub fn total_read_count(&self) -> u64 {
        self.files.iter().map(ReadFile::read_count).sum()
    }

    /// Tagged reads over all records of all files.
    pub fn similarity(&self) -> f64 {
        let total = self.total_read_count();
        if total == 0 {
            return 0.0;
        }
        self.tagged_read_count() as f64 / total as f64
    }

    /// Copies of each file's selection.
    pub fn selections(&self) -> Vec<BitVector> {
        self.files.iter().map(|f| f.selection().clone()).collect()
    }

    /// Write each tag vector to `dir/<file name>_in_<suffix>.bv`.
    pub fn save_tags(&mut self, dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for (file, tags) in self.files.iter().zip(self.tags.iter_mut()) {
            written.push(save_named(file, tags, dir, suffix)?);
        }
        Ok(written)
    }

    /// Like [`FileManager::save_tags`] for vectors exported earlier, one per file.
    pub fn save_vectors(
        &self,
        mut vectors: Vec<BitVector>,
        dir: &Path,
        suffix: &str,
    ) -> Result<Vec<PathBuf>> {
        if vectors.len() != self.files.len() {
            return Err(ReadshareError::validation(format!(
                "{} bit vectors given for {} files",
                vectors.len(),
                self.files.len()
            )));
        }
        let mut written = Vec::with_capacity(self.files.len());
        for (file, bv) in self.files.iter().zip(vectors.iter_mut()) {
            written.push(save_named(file, bv, dir, suffix)?);
        }
        Ok(written)
    }

    /// Move to the next read of the stream and return its file index.
    fn advance(&mut self, skip_tagged: bool) -> Result<Option<usize>> {
        while self.current < self.files.len() {
            let f = self.current;
            let capped = match self.read_cap {
                Some(cap) if skip_tagged => self.seen_in_file >= cap,
                Some(cap) => self.tagged_in_file >= cap,
                None => false,
            };
            if capped || !self.files[f].next_selected()? {
                self.current += 1;
                self.seen_in_file = 0;
                self.tagged_in_file = 0;
                continue;
            }
            if skip_tagged {
                // Tagged reads still count, so the capped window stays put.
                self.seen_in_file += 1;
                if let Some(pos) = self.files[f].position() {
                    if self.tags[f].is_set(pos) {
                        continue;
                    }
                }
                self.consumed += 1;
            }
            return Ok(Some(f));
        }
        Ok(None)
    }

    fn current_slot(&self) -> Option<(usize, u64)> {
        let file = self.files.get(self.current)?;
        file.position().map(|pos| (self.current, pos))
    }

    /// The file holding the current read.
    pub fn current_file(&self) -> Option<&ReadFile> {
        self.current_slot().map(|(f, _)| &self.files[f])
    }
}

fn save_named(file: &ReadFile, bv: &mut BitVector, dir: &Path, suffix: &str) -> Result<PathBuf> {
    let path = dir.join(format!(
        "{}_in_{}.{}",
        basename(file.path()),
        suffix,
        BIT_VECTOR_EXTENSION
    ));
    bv.set_comment(format!("{} in {}", file.path().display(), suffix));
    bv.write(&path)?;
    log::info!(
        "Saved {} / {} reads of {} in {}",
        bv.count_ones(),
        bv.len(),
        basename(file.path()),
        suffix
    );
    Ok(path)
}

impl ReadSource for FileManager {
    fn next_unfiltered_read(&mut self) -> Result<Option<&[u8]>> {
        Ok(self.advance(false)?.map(|f| self.files[f].sequence()))
    }

    fn next_comparison_read(&mut self) -> Result<Option<&[u8]>> {
        Ok(self.advance(true)?.map(|f| self.files[f].sequence()))
    }

    fn current_read_index(&self) -> Option<u64> {
        self.current_slot().map(|(_, pos)| pos)
    }

    fn tag_current(&mut self) {
        if let Some((f, pos)) = self.current_slot() {
            if !self.tags[f].is_set(pos) {
                self.tags[f].set(pos);
                self.tagged_in_file += 1;
            }
        }
    }

    fn untag_current(&mut self) {
        if let Some((f, pos)) = self.current_slot() {
            self.tags[f].unset(pos);
        }
    }

    fn is_tagged_current(&self) -> bool {
        self.current_slot()
            .map(|(f, pos)| self.tags[f].is_set(pos))
            .unwrap_or(false)
    }

    fn rewind(&mut self) -> Result<()> {
        self.current = 0;
        self.consumed = 0;
        self.seen_in_file = 0;
        self.tagged_in_file = 0;
        for file in self.files.iter_mut() {
            file.rewind();
        }
        Ok(())
    }

    fn valid_read_count(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match self.read_cap {
                Some(cap) => f.selected_count().min(cap),
                None => f.selected_count(),
            })
            .sum()
    }

    fn consumed_reads(&self) -> u64 {
        self.consumed
    }

    fn apply_tags(&mut self) -> Result<()> {
        for (file, tags) in self.files.iter_mut().zip(self.tags.iter_mut()) {
            let fresh = BitVector::with_len(tags.len(), false)?;
            let applied = std::mem::replace(tags, fresh);
            file.set_selection(applied)?;
        }
        Ok(())
    }

    fn apply_bit_vectors(&mut self, selections: Vec<BitVector>) -> Result<()> {
        if selections.len() != self.files.len() {
            return Err(ReadshareError::validation(format!(
                "{} bit vectors given for {} files",
                selections.len(),
                self.files.len()
            )));
        }
        for ((file, tags), selection) in self
            .files
            .iter_mut()
            .zip(self.tags.iter_mut())
            .zip(selections)
        {
            file.set_selection(selection)?;
            tags.set_all(false);
        }
        Ok(())
    }

    fn export_tags(&self) -> Vec<BitVector> {
        self.tags.clone()
    }

    fn tagged_read_count(&self) -> u64 {
        self.tags.iter().map(BitVector::count_ones).sum()
    }
}
