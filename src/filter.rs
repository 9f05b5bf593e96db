//! Read quality filtering.
//!
//! Produces a selection bit vector keeping the reads of a file that pass a
//! length threshold, an ambiguous-base threshold and a minimum Shannon
//! entropy, up to a maximum number of kept reads.

use std::path::Path;

use crate::bitvec::BitVector;
use crate::core::count_ambiguous;
use crate::error::{ReadshareError, Result};
use crate::reads::{basename, ReadFile};

/// Shannon entropy (log2) of a read over the classes A, C, G, T and other.
///
/// Case-insensitive. An empty read has entropy 0.
pub fn shannon_entropy(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 5];
    for &b in seq {
        let class = match b.to_ascii_uppercase() {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => 4,
        };
        counts[class] += 1;
    }
    let len = seq.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Thresholds of the read filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadFilter {
    pub min_length: usize,
    /// `None` accepts any number of non-ACGT bases.
    pub max_ambiguous: Option<usize>,
    pub min_entropy: f64,
    /// `None` keeps every passing read.
    pub max_reads: Option<u64>,
}

impl Default for ReadFilter {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_ambiguous: None,
            min_entropy: 0.0,
            max_reads: None,
        }
    }
}

/// Selection produced by [`ReadFilter::apply`] and the reason counts behind it.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub selection: BitVector,
    pub kept: u64,
    pub removed_length: u64,
    pub removed_ambiguous: u64,
    pub removed_entropy: u64,
    /// Passing reads dropped once `max_reads` was reached.
    pub removed_over_limit: u64,
}

impl ReadFilter {
    pub fn validate(&self) -> Result<()> {
        if !self.min_entropy.is_finite() || self.min_entropy < 0.0 {
            return Err(ReadshareError::validation(format!(
                "minimum entropy must be a non-negative number (got {})",
                self.min_entropy
            )));
        }
        Ok(())
    }

    /// Filter the selected reads of `file`, starting from its current selection.
    ///
    /// The file is rewound before and after. `note` lines, if any, are put in
    /// front of the generated description in the selection comment.
    pub fn apply(&self, file: &mut ReadFile, note: Option<&str>) -> Result<FilterReport> {
        self.validate()?;
        let mut selection = file.selection().clone();
        let mut report = FilterReport {
            selection: BitVector::new(),
            kept: 0,
            removed_length: 0,
            removed_ambiguous: 0,
            removed_entropy: 0,
            removed_over_limit: 0,
        };

        file.rewind();
        while file.next_selected()? {
            let Some(pos) = file.position() else {
                break;
            };
            let seq = file.sequence();

            if self.max_reads.is_some_and(|max| report.kept >= max) {
                report.removed_over_limit += 1;
            } else if seq.len() < self.min_length {
                report.removed_length += 1;
            } else if self
                .max_ambiguous
                .is_some_and(|max| count_ambiguous(seq) > max)
            {
                report.removed_ambiguous += 1;
            } else if shannon_entropy(seq) < self.min_entropy {
                report.removed_entropy += 1;
            } else {
                report.kept += 1;
                continue;
            }
            selection.unset(pos);
        }
        file.rewind();

        selection.set_comment(self.describe(file.path(), note));
        report.selection = selection;
        Ok(report)
    }

    /// Human-readable record of the filter, stored as the selection comment.
    pub fn describe(&self, path: &Path, note: Option<&str>) -> String {
        let mut text = String::new();
        if let Some(note) = note {
            text.push_str(note);
            text.push('\n');
        }
        let max_n = match self.max_ambiguous {
            Some(max) => max.to_string(),
            None => "infinite".to_string(),
        };
        text.push_str("----------------\n");
        text.push_str("Reference file\n");
        text.push_str(&format!("  {}\n", basename(path)));
        text.push_str("Filter Options\n");
        text.push_str(&format!("  min read size     : {}\n", self.min_length));
        text.push_str(&format!("  max number of N   : {}\n", max_n));
        text.push_str(&format!("  min shannon index : {}\n", self.min_entropy));
        text
    }
}
