//! The `compare` command: round-trip comparison of one set against others.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use super::args::KmerArgs;
use super::helpers::{ensure_output_dir, load_read_sets, load_single_set, open_manager};
use readshare::engine::round_trip;
use readshare::logging::log_timing;

/// Compare set A with every set B and save both sides' shared reads.
///
/// A's vectors are saved as `<file name>_in_<B>.bv`, B's as
/// `<file name>_in_<A>.bv`.
pub fn run_compare(index: &Path, search: &Path, kmer: &KmerArgs, output: &Path) -> Result<()> {
    let params = kmer.params();
    let (a_name, a_entries) = load_single_set(index)?;
    let b_sets = load_read_sets(search)?;
    ensure_output_dir(output)?;

    for (b_name, b_entries) in &b_sets {
        let mut a = open_manager(&a_name, &a_entries)?;
        let mut b = open_manager(b_name, b_entries)?;

        let start = Instant::now();
        let trip = round_trip(&mut a, &mut b, &params)
            .with_context(|| format!("Comparison of {} and {} failed", a_name, b_name))?;
        log_timing(&format!("{} vs {}", a_name, b_name), start.elapsed());

        a.save_vectors(trip.a_tags.clone(), output, b_name)
            .with_context(|| format!("Failed to save results of {}", a_name))?;
        b.save_tags(output, &a_name)
            .with_context(|| format!("Failed to save results of {}", b_name))?;

        println!(
            "{} in {}: {} / {} reads ({:.2}%)",
            a_name,
            b_name,
            trip.a_in_b.shared_reads,
            trip.a_reads,
            trip.a_percentage()
        );
        println!(
            "{} in {}: {} / {} reads ({:.2}%)",
            b_name,
            a_name,
            trip.b_in_a_in_b.shared_reads,
            trip.b_reads,
            trip.b_percentage()
        );
    }

    Ok(())
}
