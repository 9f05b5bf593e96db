//! All-against-all similarity matrices between read sets.
//!
//! Every pair of sets is compared with a [`round_trip`]. For sets `Si` and
//! `Sj` (`i < j`), `shared[i][j]` counts the reads of `Si` found in
//! (`Sj` in `Si`) and `shared[j][i]` the reads of that reduced `Sj` found in
//! the reduced `Si`. The diagonal holds the number of reads of each set.

use std::path::{Path, PathBuf};

use crate::constants::{
    BIT_VECTOR_EXTENSION, MATRIX_NORMALIZED_FILE, MATRIX_PERCENTAGE_FILE, MATRIX_PLAIN_FILE,
    MATRIX_SEPARATOR,
};
use crate::bitvec::BitVector;
use crate::engine::driver::percentage;
use crate::engine::{round_trip, SearchParams};
use crate::error::{ReadshareError, Result};
use crate::filter::ReadFilter;
use crate::reads::{basename, FileManager, ReadFile, ReadSetEntry, ReadSets, ReadSource};

/// Value shown in a matrix file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Shared read counts.
    Plain,
    /// `100 * shared[i][j] / reads[i]`
    Percentage,
    /// `100 * (shared[i][j] + shared[j][i]) / (reads[i] + reads[j])`
    Normalized,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 3] = [
        MatrixKind::Plain,
        MatrixKind::Percentage,
        MatrixKind::Normalized,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            MatrixKind::Plain => MATRIX_PLAIN_FILE,
            MatrixKind::Percentage => MATRIX_PERCENTAGE_FILE,
            MatrixKind::Normalized => MATRIX_NORMALIZED_FILE,
        }
    }
}

/// Shared read counts between named read sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    names: Vec<String>,
    reads: Vec<u64>,
    shared: Vec<Vec<u64>>,
}

impl SimilarityMatrix {
    /// Empty matrix whose diagonal holds `reads`.
    pub fn new(names: Vec<String>, reads: Vec<u64>) -> Result<Self> {
        if names.len() != reads.len() {
            return Err(ReadshareError::validation(format!(
                "{} set names for {} read counts",
                names.len(),
                reads.len()
            )));
        }
        let n = names.len();
        let mut shared = vec![vec![0u64; n]; n];
        for (i, row) in shared.iter_mut().enumerate() {
            row[i] = reads[i];
        }
        Ok(Self {
            names,
            reads,
            shared,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn reads(&self, i: usize) -> u64 {
        self.reads[i]
    }

    pub fn shared(&self, i: usize, j: usize) -> u64 {
        self.shared[i][j]
    }

    pub fn set_shared(&mut self, i: usize, j: usize, count: u64) {
        self.shared[i][j] = count;
    }

    pub fn percentage(&self, i: usize, j: usize) -> f64 {
        percentage(self.shared[i][j], self.reads[i])
    }

    pub fn normalized(&self, i: usize, j: usize) -> f64 {
        percentage(
            self.shared[i][j] + self.shared[j][i],
            self.reads[i] + self.reads[j],
        )
    }

    /// CSV text with `;` separators and a header row of set names.
    pub fn to_csv(&self, kind: MatrixKind) -> String {
        let mut out = String::new();
        for name in &self.names {
            out.push(MATRIX_SEPARATOR);
            out.push_str(name);
        }
        out.push('\n');
        for (i, name) in self.names.iter().enumerate() {
            out.push_str(name);
            for j in 0..self.len() {
                out.push(MATRIX_SEPARATOR);
                let value = match kind {
                    MatrixKind::Plain => self.shared[i][j].to_string(),
                    MatrixKind::Percentage => self.percentage(i, j).to_string(),
                    MatrixKind::Normalized => self.normalized(i, j).to_string(),
                };
                out.push_str(&value);
            }
            out.push('\n');
        }
        out
    }

    /// Write the three matrix files into `dir`.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(MatrixKind::ALL.len());
        for kind in MatrixKind::ALL {
            let path = dir.join(kind.file_name());
            std::fs::write(&path, self.to_csv(kind))
                .map_err(|e| ReadshareError::io(&path, "write", e))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Filter every file of every set, writing one selection per file into `dir`.
///
/// `filter.max_reads`, when set, is a per-set limit shared evenly between
/// the files of the set. Returns the sets pointing at the new selections.
pub fn filter_sets(sets: &ReadSets, filter: &ReadFilter, dir: &Path) -> Result<ReadSets> {
    let mut filtered = ReadSets::new();
    for (name, entries) in sets {
        let per_file = ReadFilter {
            max_reads: filter.max_reads.map(|m| m / entries.len().max(1) as u64),
            ..filter.clone()
        };
        let mut new_entries = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut file = match &entry.selection {
                Some(selection) => ReadFile::open_with_selection(&entry.path, selection)?,
                None => ReadFile::open(&entry.path)?,
            };
            let report = per_file.apply(&mut file, None)?;
            let out = dir.join(format!("{}.{}", basename(&entry.path), BIT_VECTOR_EXTENSION));
            report.selection.write(&out)?;
            log::info!(
                "Filtered {} of set {}: {} reads kept ({} short, {} ambiguous, {} low entropy, {} over limit)",
                basename(&entry.path),
                name,
                report.kept,
                report.removed_length,
                report.removed_ambiguous,
                report.removed_entropy,
                report.removed_over_limit
            );
            new_entries.push(ReadSetEntry::with_selection(&entry.path, out));
        }
        filtered.insert(name.clone(), new_entries);
    }
    Ok(filtered)
}

/// Compare every pair of sets.
///
/// With `output`, each comparison also saves its per-file vectors as
/// `<file name>_in_<other set>.bv` there.
pub fn compute_matrix(
    sets: &ReadSets,
    params: &SearchParams,
    output: Option<&Path>,
) -> Result<SimilarityMatrix> {
    params.validate()?;
    let names: Vec<String> = sets.keys().cloned().collect();
    let entries: Vec<&Vec<ReadSetEntry>> = sets.values().collect();

    let mut reads = Vec::with_capacity(names.len());
    for (name, set) in names.iter().zip(&entries) {
        reads.push(FileManager::new(name.as_str(), set)?.valid_read_count());
    }
    let mut matrix = SimilarityMatrix::new(names.clone(), reads)?;

    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            log::info!("Comparing {} and {}", names[i], names[j]);
            let mut a = FileManager::new(names[i].as_str(), entries[i])?;
            let mut b = FileManager::new(names[j].as_str(), entries[j])?;
            let trip = round_trip(&mut a, &mut b, params)?;

            matrix.set_shared(i, j, trip.a_in_b.shared_reads);
            matrix.set_shared(j, i, trip.b_in_a_in_b.shared_reads);

            if let Some(dir) = output {
                a.save_vectors(trip.a_tags, dir, &names[j])?;
                b.save_tags(dir, &names[i])?;
            }
        }
    }

    Ok(matrix)
}

/// Rebuild the matrix from the vectors a previous [`compute_matrix`] run
/// saved in `dir`, without comparing again.
///
/// `shared[i][j]` is the number of bits set over the
/// `<file name>_in_<Sj>.bv` vectors of the files of `Si`.
pub fn matrix_from_vectors(sets: &ReadSets, dir: &Path) -> Result<SimilarityMatrix> {
    let names: Vec<String> = sets.keys().cloned().collect();
    let mut managers = Vec::with_capacity(names.len());
    let mut reads = Vec::with_capacity(names.len());
    for (name, set) in sets {
        let manager = FileManager::new(name.as_str(), set)?;
        reads.push(manager.valid_read_count());
        managers.push(manager);
    }
    let mut matrix = SimilarityMatrix::new(names.clone(), reads)?;

    for (i, manager) in managers.iter().enumerate() {
        for (j, other) in names.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut shared = 0;
            for file in manager.files() {
                let path = dir.join(format!(
                    "{}_in_{}.{}",
                    basename(file.path()),
                    other,
                    BIT_VECTOR_EXTENSION
                ));
                shared += BitVector::read(&path)?.count_ones();
            }
            matrix.set_shared(i, j, shared);
        }
    }

    Ok(matrix)
}
