//! readshare: find the reads two sequencing read sets have in common.
//!
//! Reads of one set are cut into k-mers and fed into a strand-aware bloom
//! index; reads of the other set are scanned against it and tagged when they
//! contain enough non-overlapping indexed k-mers, on either strand. Results
//! are persisted as bit vectors (one bit per read) that later runs can use as
//! read selections.

pub mod bitvec;
pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logging;
pub mod matrix;
pub mod reads;

pub use bitvec::BitVector;
pub use engine::{index_and_search, round_trip, RoundTrip, SearchParams, TargetReport};
pub use error::{ReadshareError, Result};
pub use extract::{extract_reads, ExtractTarget};
pub use filter::{shannon_entropy, FilterReport, ReadFilter};
pub use matrix::{compute_matrix, filter_sets, matrix_from_vectors, MatrixKind, SimilarityMatrix};
pub use reads::{FileManager, InMemoryReads, ReadFile, ReadFormat, ReadSetEntry, ReadSets, ReadSource};
