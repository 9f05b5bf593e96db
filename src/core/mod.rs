//! Core algorithms for k-mer indexing.
//!
//! This module contains the fundamental structures used throughout readshare:
//! - Nucleotide alphabet lookup and reverse complement
//! - Strand-aware 4-key rolling hash
//! - Bit-packed bloom index fed and queried with that hash

pub mod alphabet;
pub mod bloom;
pub mod hash_key;

pub use alphabet::{count_ambiguous, is_nucleotide, reverse_complement};
pub use bloom::BloomFilter;
pub use hash_key::HashKey;
