//! Command-line argument definitions for the readshare CLI.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::helpers::{parse_entropy, parse_kmer_size, parse_min_hits, parse_percentage};
use readshare::constants::{DEFAULT_KMER_SIZE, DEFAULT_MIN_HITS};
use readshare::engine::SearchParams;

#[derive(Parser)]
#[command(name = "readshare")]
#[command(version)]
#[command(about = "Find the reads shared between sequencing read sets")]
#[command(
    long_about = "readshare: compare sequencing read sets by indexing the k-mers of one set in a strand-aware bloom index and searching the reads of the others against it.

WORKFLOW:
  1. Describe read sets:  one set per line, NAME: file[, bv]; file[, bv]
  2. Search:              readshare search -i index_set.txt -s search_sets.txt -o out
  3. Inspect results:     readshare bv out/reads_in_A.bv --info
  4. Extract reads:       readshare extract reads.fq out/reads_in_A.bv -o shared.fq

INPUT FORMATS:
  FASTA and FASTQ files are supported, plain or gzip-compressed; the format
  is detected from the first byte of the content.

BIT VECTORS (.bv):
  One bit per read of a file: a free text comment line, then '#' and the
  number of bits, then the raw bits (least significant bit first)."
)]
#[command(after_help = "EXAMPLES:
  # Reads of every search set shared with the index set
  readshare search -i gut.txt -s samples.txt -k 33 -t 2 -o results

  # Round trip comparison of two sets
  readshare compare -i a.txt -s b.txt -o results

  # All-against-all matrices from a run configuration
  readshare matrix run.toml")]
pub struct Cli {
    /// Enable verbose progress output with timestamps
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// k-mer settings shared by the comparison commands.
#[derive(Args, Debug, Clone)]
pub struct KmerArgs {
    /// K-mer size (1-40)
    #[arg(short = 'k', long, default_value_t = DEFAULT_KMER_SIZE, value_parser = parse_kmer_size)]
    pub kmer_size: usize,

    /// Non-overlapping shared k-mers needed for two reads to be similar
    #[arg(short = 't', long, default_value_t = DEFAULT_MIN_HITS, value_parser = parse_min_hits)]
    pub min_hits: u32,

    /// K-mers indexed per pass; larger values use more memory and fewer passes.
    /// Defaults to 10^9 at k=33, doubling with every extra base
    #[arg(long)]
    pub max_kmers: Option<u64>,
}

impl KmerArgs {
    pub fn params(&self) -> SearchParams {
        let params = SearchParams::new(self.kmer_size, self.min_hits);
        match self.max_kmers {
            Some(max) => params.with_max_kmers(max),
            None => params,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tag the reads of every search set that are shared with the index set
    #[command(after_help = "EXAMPLES:
  # index_set.txt holds exactly one set, search_sets.txt one or more
  readshare search -i index_set.txt -s search_sets.txt -o out

  # Compare only the first 100000 reads of every search file
  readshare search -i index_set.txt -s search_sets.txt --max-reads 100000")]
    Search {
        /// Read-set descriptor holding the single set to index
        #[arg(short, long)]
        index: PathBuf,

        /// Read-set descriptor holding the sets to search
        #[arg(short, long)]
        search: PathBuf,

        #[command(flatten)]
        kmer: KmerArgs,

        /// Output directory for the result bit vectors
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Compare at most this many reads of each search file
        #[arg(long)]
        max_reads: Option<u64>,
    },

    /// Three-hop comparison: A against each set B, reporting shared percentages
    Compare {
        /// Read-set descriptor holding set A
        #[arg(short, long)]
        index: PathBuf,

        /// Read-set descriptor holding the B sets
        #[arg(short, long)]
        search: PathBuf,

        #[command(flatten)]
        kmer: KmerArgs,

        /// Output directory for the result bit vectors
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Select reads by length, ambiguous bases and sequence complexity
    Filter(FilterArgs),

    /// Write the reads selected by a bit vector
    Extract {
        /// Read file (FASTA/FASTQ, optionally gzipped)
        reads: PathBuf,

        /// Bit vector selecting the reads to extract
        bit_vector: PathBuf,

        /// Output file; required for gzipped input. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Boolean operations on bit vectors
    #[command(after_help = "EXAMPLES:
  readshare bv a.bv --and b.bv -o both.bv
  readshare bv a.bv --not -o complement.bv
  readshare bv a.bv --info")]
    Bv(BvArgs),

    /// Generate a bit vector selecting a random share of a file's reads
    Random {
        /// Read file whose records are counted
        reads: PathBuf,

        /// Percentage of reads to select (0-100)
        #[arg(value_parser = parse_percentage)]
        percentage: f64,

        /// Output bit vector
        output: PathBuf,
    },

    /// All-against-all similarity matrices from a TOML run configuration
    #[command(after_help = "EXAMPLES:
  readshare matrix run.toml

  # Rebuild the matrices from the vectors of an earlier run
  readshare matrix run.toml --from-vectors results")]
    Matrix {
        /// Run configuration (.toml)
        config: PathBuf,

        /// Rebuild the matrices from the <file>_in_<set>.bv vectors saved
        /// in this directory instead of comparing the sets again
        #[arg(long, value_name = "DIR")]
        from_vectors: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// Read file (FASTA/FASTQ, optionally gzipped)
    pub reads: PathBuf,

    /// Output bit vector. Defaults to <reads>.bv
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start from this selection instead of all reads
    #[arg(short = 'b', long)]
    pub bit_vector: Option<PathBuf>,

    /// Minimum read length
    #[arg(short = 'l', long, default_value_t = 0)]
    pub min_length: usize,

    /// Maximum number of non-ACGT bases. Unlimited by default
    #[arg(short = 'n', long)]
    pub max_ambiguous: Option<usize>,

    /// Minimum Shannon entropy of a read (0-~2.32)
    #[arg(short = 'e', long, default_value_t = 0.0, value_parser = parse_entropy)]
    pub min_entropy: f64,

    /// Keep at most this many reads
    #[arg(short = 'm', long)]
    pub max_reads: Option<u64>,

    /// Note stored at the top of the bit vector comment
    #[arg(short = 'c', long)]
    pub comment: Option<String>,
}

#[derive(Args)]
#[command(group(clap::ArgGroup::new("operation").args(["not", "and", "or", "and_not"])))]
pub struct BvArgs {
    /// Input bit vector
    pub input: PathBuf,

    /// Invert every bit
    #[arg(long)]
    pub not: bool,

    /// Keep bits set in both vectors
    #[arg(long, value_name = "FILE")]
    pub and: Option<PathBuf>,

    /// Keep bits set in either vector
    #[arg(long, value_name = "FILE")]
    pub or: Option<PathBuf>,

    /// Keep bits set in the input but not in FILE
    #[arg(long, value_name = "FILE")]
    pub and_not: Option<PathBuf>,

    /// Print the comment and the number of selected reads
    #[arg(long)]
    pub info: bool,

    /// Output bit vector. Defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
