//! Search of target reads against a bloom index.

use super::SearchParams;
use crate::core::{is_nucleotide, BloomFilter, HashKey};
use crate::error::{ReadshareError, Result};
use crate::reads::ReadSource;

/// Strand on which a read reached the hit threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Totals of one search pass over a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchPass {
    pub searched_reads: u64,
    pub matched_reads: u64,
    /// Matches found only on the reverse-complement strand.
    pub reverse_matches: u64,
}

/// Count filter hits along one strand, stopping at `min_hits`.
///
/// The hash restarts after every hit, so two counted windows never overlap.
fn scan_strand(
    filter: &BloomFilter,
    hash: &mut HashKey,
    seq: &[u8],
    k: usize,
    min_hits: u32,
    reverse: bool,
) -> bool {
    let mut hits = 0u32;
    hash.reset();
    for &base in seq {
        if !is_nucleotide(base) {
            hash.reset();
            continue;
        }
        let count = if reverse {
            hash.reverse_add(base)
        } else {
            hash.add(base)
        };
        if count >= k && filter.is_found(hash) {
            hits += 1;
            if hits >= min_hits {
                hash.reset();
                return true;
            }
            hash.reset();
        }
    }
    false
}

/// Decide whether one read is similar to the indexed reads.
///
/// The forward strand is tried first; the reverse complement is scanned
/// only when the forward strand falls short, with its own hit count. The
/// k-mer size is the filter's; `hash` is rebuilt if it was made for another.
pub fn match_read(
    filter: &BloomFilter,
    hash: &mut HashKey,
    seq: &[u8],
    min_hits: u32,
) -> Option<Strand> {
    let k = filter.kmer_size();
    if hash.kmer_size() != k {
        *hash = HashKey::new(k);
    }
    if scan_strand(filter, hash, seq, k, min_hits, false) {
        Some(Strand::Forward)
    } else if scan_strand(filter, hash, seq, k, min_hits, true) {
        Some(Strand::Reverse)
    } else {
        None
    }
}

/// Search every untagged read of `target` and tag those matching `filter`.
///
/// The target is rewound first.
pub fn search<S: ReadSource + ?Sized>(
    filter: &BloomFilter,
    target: &mut S,
    params: &SearchParams,
) -> Result<SearchPass> {
    if params.kmer_size != filter.kmer_size() {
        return Err(ReadshareError::validation(format!(
            "k-mer size {} does not match the index, built with k = {}",
            params.kmer_size,
            filter.kmer_size()
        )));
    }
    let mut hash = HashKey::new(filter.kmer_size());
    let mut pass = SearchPass::default();

    target.rewind()?;
    loop {
        let strand = match target.next_comparison_read()? {
            Some(seq) => match_read(filter, &mut hash, seq, params.min_hits),
            None => break,
        };
        pass.searched_reads += 1;
        if let Some(strand) = strand {
            target.tag_current();
            pass.matched_reads += 1;
            if strand == Strand::Reverse {
                pass.reverse_matches += 1;
            }
        }
    }

    log::debug!(
        "Searched {} reads, {} matched ({} on the reverse strand)",
        pass.searched_reads,
        pass.matched_reads,
        pass.reverse_matches
    );
    Ok(pass)
}
