//! Helper functions and utilities for the readshare CLI.

pub mod arg_parsing;
pub mod sets;

pub use arg_parsing::{parse_entropy, parse_kmer_size, parse_min_hits, parse_percentage};
pub use sets::{ensure_output_dir, load_read_sets, load_single_set, open_manager};
