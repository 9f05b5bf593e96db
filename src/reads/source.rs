//! Sequential read stream consumed by the index and search engine.

use crate::bitvec::BitVector;
use crate::error::Result;

/// An ordered stream of reads with per-read tag state.
///
/// Sequences are lent out until the next request. Tags are kept apart from
/// the selection of reads taking part in comparisons until
/// [`ReadSource::apply_tags`] materializes them.
pub trait ReadSource {
    /// Next selected read, tagged or not. `None` once exhausted.
    fn next_unfiltered_read(&mut self) -> Result<Option<&[u8]>>;

    /// Next selected read that is not tagged. `None` once exhausted.
    fn next_comparison_read(&mut self) -> Result<Option<&[u8]>>;

    /// Position of the current read in its file.
    fn current_read_index(&self) -> Option<u64>;

    fn tag_current(&mut self);

    fn untag_current(&mut self);

    fn is_tagged_current(&self) -> bool;

    /// Restart every cursor and counter. Tags are kept.
    fn rewind(&mut self) -> Result<()>;

    /// Number of reads a full traversal returns.
    fn valid_read_count(&self) -> u64;

    /// Reads returned by [`ReadSource::next_comparison_read`] since the last rewind.
    fn consumed_reads(&self) -> u64;

    /// Replace each selection with the current tags, then clear the tags.
    fn apply_tags(&mut self) -> Result<()>;

    /// Replace each selection with the given vectors, one per file, and clear the tags.
    fn apply_bit_vectors(&mut self, selections: Vec<BitVector>) -> Result<()>;

    /// Copies of the current tag vectors, one per file.
    fn export_tags(&self) -> Vec<BitVector>;

    /// Reads currently tagged.
    fn tagged_read_count(&self) -> u64 {
        self.export_tags().iter().map(BitVector::count_ones).sum()
    }
}
