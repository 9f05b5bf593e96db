//! Read files and the read streams built on top of them.
//!
//! - [`ReadFormat`]: FASTA/FASTQ detection, plain or gzipped
//! - [`ReadFile`]: cursor over one file with its read selection
//! - [`FileManager`]: several files exposed as one tagged stream
//! - [`InMemoryReads`]: the same stream over sequences in memory
//! - [`ReadSource`]: the stream interface used by the engine
//! - read-set descriptor parsing

pub mod format;
pub mod manager;
pub mod memory;
pub mod read_file;
pub mod set_parser;
pub mod source;

pub use format::ReadFormat;
pub use manager::FileManager;
pub use memory::InMemoryReads;
pub use read_file::{basename, count_records, ReadFile};
pub use set_parser::{parse_read_sets, read_set_file, ReadSetEntry, ReadSets};
pub use source::ReadSource;
