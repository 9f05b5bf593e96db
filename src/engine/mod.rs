//! Index and search engine.
//!
//! A pass indexes a budgeted slice of one read source into a fresh
//! [`BloomFilter`](crate::core::BloomFilter) and searches every target source
//! against it, tagging the target reads that share enough k-mers. Passes
//! repeat until the index source is fully consumed.

pub mod driver;
pub mod index;
pub mod search;

pub use driver::{index_and_search, round_trip, RoundTrip, TargetReport};
pub use index::{build_index, IndexPass};
pub use search::{match_read, search, SearchPass, Strand};

use crate::constants::{default_max_kmers, DEFAULT_KMER_SIZE, DEFAULT_MIN_HITS, MAX_KMER_SIZE};
use crate::error::{ReadshareError, Result};

/// Parameters shared by indexing and searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub kmer_size: usize,
    /// Non-overlapping k-mer hits needed to tag a read.
    pub min_hits: u32,
    /// K-mers fed into one filter before a pass stops indexing.
    pub max_kmers: u64,
}

impl SearchParams {
    pub fn new(kmer_size: usize, min_hits: u32) -> Self {
        Self {
            kmer_size,
            min_hits,
            max_kmers: default_max_kmers(kmer_size),
        }
    }

    pub fn with_max_kmers(mut self, max_kmers: u64) -> Self {
        self.max_kmers = max_kmers;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_KMER_SIZE).contains(&self.kmer_size) {
            return Err(ReadshareError::validation(format!(
                "k-mer size must be in 1..={} (got {})",
                MAX_KMER_SIZE, self.kmer_size
            )));
        }
        if self.min_hits == 0 {
            return Err(ReadshareError::validation("min_hits must be at least 1"));
        }
        if self.max_kmers == 0 {
            return Err(ReadshareError::validation("max_kmers must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(DEFAULT_KMER_SIZE, DEFAULT_MIN_HITS)
    }
}
