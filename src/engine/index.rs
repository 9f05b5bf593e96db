//! Budgeted index construction.

use super::SearchParams;
use crate::core::{is_nucleotide, BloomFilter, HashKey};
use crate::error::Result;
use crate::reads::ReadSource;

/// Result of one index pass.
pub struct IndexPass {
    pub filter: BloomFilter,
    /// Reads pulled from the source during this pass.
    pub indexed_reads: u64,
    /// K-mer windows fed into the filter.
    pub indexed_kmers: u64,
}

/// Feed every valid k-mer window of `seq` into `filter`, returning the count.
fn feed_read(filter: &mut BloomFilter, hash: &mut HashKey, seq: &[u8], k: usize) -> u64 {
    let mut fed = 0;
    hash.reset();
    for &base in seq {
        if !is_nucleotide(base) {
            hash.reset();
        } else if hash.add(base) >= k {
            filter.feed(hash);
            fed += 1;
        }
    }
    fed
}

/// Index comparison reads from `source` into a fresh filter.
///
/// Reads are pulled until `params.max_kmers` windows have been fed or the
/// source is exhausted. The budget is checked before each read is pulled,
/// so the last read of a pass is always fully indexed and the next pass
/// resumes with the following read.
pub fn build_index<S: ReadSource + ?Sized>(source: &mut S, params: &SearchParams) -> Result<IndexPass> {
    let k = params.kmer_size;
    let mut filter = BloomFilter::new(k)?;
    let mut hash = HashKey::new(k);
    let mut indexed_reads = 0u64;
    let mut indexed_kmers = 0u64;

    while indexed_kmers < params.max_kmers {
        let Some(seq) = source.next_comparison_read()? else {
            break;
        };
        indexed_reads += 1;
        indexed_kmers += feed_read(&mut filter, &mut hash, seq, k);
    }

    log::debug!(
        "Indexed {} reads ({} k-mers, budget {})",
        indexed_reads,
        indexed_kmers,
        params.max_kmers
    );

    Ok(IndexPass {
        filter,
        indexed_reads,
        indexed_kmers,
    })
}
