//! Multi-pass orchestration and round-trip comparison.

use std::time::Instant;

use super::{build_index, search, SearchParams};
use crate::bitvec::BitVector;
use crate::error::{ReadshareError, Result};
use crate::reads::ReadSource;

/// Accumulated totals for one target over all passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetReport {
    pub passes: u32,
    pub indexed_reads: u64,
    pub searched_reads: u64,
    pub shared_reads: u64,
    pub reverse_matches: u64,
}

/// Index `index` in budgeted passes and search every target after each pass.
///
/// Matching target reads are tagged; tags are left un-applied. Each pass
/// must consume at least one read of the index source, otherwise the run
/// fails with [`ReadshareError::Stalled`].
pub fn index_and_search<I, T>(
    index: &mut I,
    targets: &mut [T],
    params: &SearchParams,
) -> Result<Vec<TargetReport>>
where
    I: ReadSource + ?Sized,
    T: ReadSource,
{
    params.validate()?;
    let total = index.valid_read_count();
    let mut reports = vec![TargetReport::default(); targets.len()];
    let mut passes = 0u32;

    while index.consumed_reads() < total {
        let before = index.consumed_reads();
        let index_start = Instant::now();
        let pass = build_index(index, params)?;
        if index.consumed_reads() == before {
            return Err(ReadshareError::Stalled {
                consumed: before,
                total,
            });
        }
        passes += 1;
        log::info!(
            "Pass {}: indexed {} reads ({} k-mers) in {:.3} s, {} / {} consumed",
            passes,
            pass.indexed_reads,
            pass.indexed_kmers,
            index_start.elapsed().as_secs_f64(),
            index.consumed_reads(),
            total
        );

        for (i, (target, report)) in targets.iter_mut().zip(reports.iter_mut()).enumerate() {
            let search_start = Instant::now();
            let found = search(&pass.filter, target, params)?;
            report.passes = passes;
            report.indexed_reads += pass.indexed_reads;
            report.searched_reads += found.searched_reads;
            report.shared_reads += found.matched_reads;
            report.reverse_matches += found.reverse_matches;
            log::info!(
                "Pass {} target {}: [indexed {}, searched {}, shared {}] in {:.3} s",
                passes,
                i,
                report.indexed_reads,
                report.searched_reads,
                report.shared_reads,
                search_start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(reports)
}

/// Outcome of a three-hop comparison between sets A and B.
#[derive(Debug, Clone)]
pub struct RoundTrip {
    /// Valid reads of A before the comparison.
    pub a_reads: u64,
    /// Valid reads of B before the comparison.
    pub b_reads: u64,
    /// Reads of B found in A.
    pub b_in_a: TargetReport,
    /// Reads of A found in (B in A).
    pub a_in_b: TargetReport,
    /// Reads of (B in A) found in (A in (B in A)).
    pub b_in_a_in_b: TargetReport,
    /// A's tags after the second hop, one vector per file.
    pub a_tags: Vec<BitVector>,
}

impl RoundTrip {
    /// Percentage of A's reads shared with B.
    pub fn a_percentage(&self) -> f64 {
        percentage(self.a_in_b.shared_reads, self.a_reads)
    }

    /// Percentage of B's reads shared with A.
    pub fn b_percentage(&self) -> f64 {
        percentage(self.b_in_a_in_b.shared_reads, self.b_reads)
    }
}

pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

fn hop<I, T>(index: &mut I, target: &mut T, params: &SearchParams) -> Result<TargetReport>
where
    I: ReadSource,
    T: ReadSource,
{
    index.rewind()?;
    target.rewind()?;
    let reports = index_and_search(index, std::slice::from_mut(target), params)?;
    Ok(reports.into_iter().next().unwrap_or_default())
}

/// Compare two read sets in three hops.
///
/// 1. B is searched in A, and B's matches become B's selection.
/// 2. A is searched in that B; A's matches are exported, then applied.
/// 3. The reduced B is searched in the reduced A.
///
/// B's tags from the third hop are left un-applied for the caller to save.
pub fn round_trip<A, B>(a: &mut A, b: &mut B, params: &SearchParams) -> Result<RoundTrip>
where
    A: ReadSource,
    B: ReadSource,
{
    let a_reads = a.valid_read_count();
    let b_reads = b.valid_read_count();

    let start = Instant::now();
    let b_in_a = hop(a, b, params)?;
    b.apply_tags()?;
    log::info!(
        "B in A: [indexed {}, searched {}, shared {}] in {:.3} s",
        b_in_a.indexed_reads,
        b_in_a.searched_reads,
        b_in_a.shared_reads,
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let a_in_b = hop(b, a, params)?;
    let a_tags = a.export_tags();
    a.apply_tags()?;
    log::info!(
        "A in (B in A): [indexed {}, searched {}, shared {}] {:.2}% in {:.3} s",
        a_in_b.indexed_reads,
        a_in_b.searched_reads,
        a_in_b.shared_reads,
        percentage(a_in_b.shared_reads, a_reads),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let b_in_a_in_b = hop(a, b, params)?;
    log::info!(
        "B in (A in (B in A)): [indexed {}, searched {}, shared {}] {:.2}% in {:.3} s",
        b_in_a_in_b.indexed_reads,
        b_in_a_in_b.searched_reads,
        b_in_a_in_b.shared_reads,
        percentage(b_in_a_in_b.shared_reads, b_reads),
        start.elapsed().as_secs_f64()
    );

    Ok(RoundTrip {
        a_reads,
        b_reads,
        b_in_a,
        a_in_b,
        b_in_a_in_b,
        a_tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reads::InMemoryReads;

    /// Source that never hands out a read while claiming to hold some.
    struct Stuck;

    impl ReadSource for Stuck {
        fn next_unfiltered_read(&mut self) -> Result<Option<&[u8]>> {
            Ok(None)
        }
        fn next_comparison_read(&mut self) -> Result<Option<&[u8]>> {
            Ok(None)
        }
        fn current_read_index(&self) -> Option<u64> {
            None
        }
        fn tag_current(&mut self) {}
        fn untag_current(&mut self) {}
        fn is_tagged_current(&self) -> bool {
            false
        }
        fn rewind(&mut self) -> Result<()> {
            Ok(())
        }
        fn valid_read_count(&self) -> u64 {
            3
        }
        fn consumed_reads(&self) -> u64 {
            0
        }
        fn apply_tags(&mut self) -> Result<()> {
            Ok(())
        }
        fn apply_bit_vectors(&mut self, _: Vec<BitVector>) -> Result<()> {
            Ok(())
        }
        fn export_tags(&self) -> Vec<BitVector> {
            Vec::new()
        }
    }

    #[test]
    fn test_single_pass_identical_reads() {
        let params = SearchParams::new(5, 1);
        let mut index = InMemoryReads::new(["ACGTACGTT"]).unwrap();
        let mut targets = vec![InMemoryReads::new(["ACGTACGTT"]).unwrap()];
        let reports = index_and_search(&mut index, &mut targets, &params).unwrap();
        assert_eq!(reports[0].passes, 1);
        assert_eq!(reports[0].shared_reads, 1);
        assert_eq!(targets[0].tagged_read_count(), 1);
    }

    #[test]
    fn test_bounded_passes_cover_index_exactly_once() {
        let index_reads = ["ACGTACGTT", "CCGTACGTA", "TTGCAAGGC", "GATTACAGA", "GGGCCCAAA"];
        // Budget of one read per pass.
        let params = SearchParams::new(5, 1).with_max_kmers(1);

        let mut counting = InMemoryReads::new(index_reads).unwrap();
        let first = build_index(&mut counting, &params).unwrap();
        assert!(first.indexed_reads < counting.valid_read_count());

        let mut index = InMemoryReads::new(index_reads).unwrap();
        let mut targets = vec![InMemoryReads::new(["TTGCAAGGC", "GGGCCCAAA", "NNNNNNNNN"]).unwrap()];
        let reports = index_and_search(&mut index, &mut targets, &params).unwrap();

        assert_eq!(reports[0].passes, 5);
        assert_eq!(reports[0].indexed_reads, 5);
        assert_eq!(index.consumed_reads(), index.valid_read_count());
        assert_eq!(reports[0].shared_reads, 2);
        assert_eq!(targets[0].tagged_read_count(), 2);
    }

    #[test]
    fn test_several_targets() {
        let params = SearchParams::new(5, 1);
        let mut index = InMemoryReads::new(["GATTACAGATTACA"]).unwrap();
        let mut targets = vec![
            InMemoryReads::new(["GATTACA", "CCCCCCC"]).unwrap(),
            InMemoryReads::new(["TACAGAT"]).unwrap(),
        ];
        let reports = index_and_search(&mut index, &mut targets, &params).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].searched_reads, 2);
        assert_eq!(reports[0].shared_reads, 1);
        assert_eq!(reports[1].shared_reads, 1);
    }

    #[test]
    fn test_empty_index_runs_no_pass() {
        let params = SearchParams::new(5, 1);
        let mut index = InMemoryReads::new(Vec::<&str>::new()).unwrap();
        let mut targets = vec![InMemoryReads::new(["ACGTACGTT"]).unwrap()];
        let reports = index_and_search(&mut index, &mut targets, &params).unwrap();
        assert_eq!(reports[0], TargetReport::default());
    }

    #[test]
    fn test_stalled_source_is_an_error() {
        let params = SearchParams::new(5, 1);
        let mut targets: Vec<InMemoryReads> = Vec::new();
        match index_and_search(&mut Stuck, &mut targets, &params) {
            Err(ReadshareError::Stalled { consumed: 0, total: 3 }) => {}
            other => panic!("expected stall, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_round_trip() {
        let params = SearchParams::new(5, 1);
        // A: two reads shared with B, one private.
        let mut a = InMemoryReads::new(["GATTACAGA", "CCGGTTAAC", "AAAAAAAAA"]).unwrap();
        // B: one read shared with A, one private.
        let mut b = InMemoryReads::new(["GATTACAGA", "TGTGTGTGT", "CCGGTTAAC"]).unwrap();

        let trip = round_trip(&mut a, &mut b, &params).unwrap();
        assert_eq!(trip.a_reads, 3);
        assert_eq!(trip.b_reads, 3);
        assert_eq!(trip.b_in_a.shared_reads, 2);
        assert_eq!(trip.a_in_b.shared_reads, 2);
        assert_eq!(trip.b_in_a_in_b.shared_reads, 2);
        assert!((trip.a_percentage() - 200.0 / 3.0).abs() < 1e-9);
        assert!((trip.b_percentage() - 200.0 / 3.0).abs() < 1e-9);

        // A's hop-two tags were exported and then applied.
        assert_eq!(trip.a_tags.len(), 1);
        assert_eq!(trip.a_tags[0].count_ones(), 2);
        assert_eq!(a.valid_read_count(), 2);

        // B's hop-three tags stay pending on top of its hop-one selection.
        assert_eq!(b.valid_read_count(), 2);
        assert_eq!(b.tagged_read_count(), 2);
    }

    #[test]
    fn test_percentage_of_empty_set() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
