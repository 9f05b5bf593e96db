//! Constants used throughout the readshare library for parameter limits,
//! defaults, and file naming.
//!
//! Centralizing these constants ensures consistency between the library, the
//! CLI defaults and the TOML run configuration.

// ============================================================================
// K-mer and Search Defaults
// ============================================================================

/// Default k-mer size.
pub const DEFAULT_KMER_SIZE: usize = 33;

/// Default minimum number of shared k-mers for two reads to be similar.
pub const DEFAULT_MIN_HITS: u32 = 2;

/// Largest supported k-mer size. The bloom index occupies `2^(k-1)` bytes,
/// so k = 40 already asks for 512 GiB.
pub const MAX_KMER_SIZE: usize = 40;

/// K-mers fed per index pass at the reference k-mer size.
const KMER_BUDGET_AT_REFERENCE: f64 = 1_000_000_000.0;

/// K-mer size at which [`KMER_BUDGET_AT_REFERENCE`] applies.
const KMER_BUDGET_REFERENCE_K: i32 = 33;

/// Default number of k-mers indexed per pass for a given k-mer size.
///
/// The budget halves for every step below the reference size so that the
/// bloom index load stays roughly constant, and never drops below one.
pub fn default_max_kmers(kmer_size: usize) -> u64 {
    let exponent = KMER_BUDGET_REFERENCE_K - kmer_size as i32;
    let budget = KMER_BUDGET_AT_REFERENCE / 2f64.powi(exponent);
    (budget as u64).max(1)
}

// ============================================================================
// Bit Vector Files
// ============================================================================

/// Extension of bit-vector files.
pub const BIT_VECTOR_EXTENSION: &str = "bv";

/// Marker starting the size line of a bit-vector file.
pub(crate) const SIZE_MARKER: u8 = b'#';

// ============================================================================
// Similarity Matrices
// ============================================================================

/// Separator used in the CSV matrices.
pub(crate) const MATRIX_SEPARATOR: char = ';';

/// File names of the three similarity matrices.
pub const MATRIX_PLAIN_FILE: &str = "matrix_plain.csv";
pub const MATRIX_PERCENTAGE_FILE: &str = "matrix_percentage.csv";
pub const MATRIX_NORMALIZED_FILE: &str = "matrix_normalized.csv";
