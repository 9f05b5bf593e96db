//! The `search` command: one index set against any number of search sets.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use super::args::KmerArgs;
use super::helpers::{ensure_output_dir, load_read_sets, load_single_set, open_manager};
use readshare::engine::{index_and_search, TargetReport};
use readshare::logging::log_timing;
use readshare::reads::{FileManager, ReadSource};

/// Tag the reads of every search set shared with the index set and save
/// them as `<output>/<file name>_in_<index set>.bv`.
pub fn run_search(
    index: &Path,
    search: &Path,
    kmer: &KmerArgs,
    output: &Path,
    max_reads: Option<u64>,
) -> Result<()> {
    let params = kmer.params();
    let (index_name, index_entries) = load_single_set(index)?;
    let search_sets = load_read_sets(search)?;
    ensure_output_dir(output)?;

    let mut index_manager = open_manager(&index_name, &index_entries)?;
    let mut targets = Vec::with_capacity(search_sets.len());
    for (name, entries) in &search_sets {
        let manager = open_manager(name, entries)?;
        targets.push(match max_reads {
            Some(cap) => manager.with_read_cap(cap),
            None => manager,
        });
    }
    let valid: Vec<u64> = targets.iter().map(FileManager::valid_read_count).collect();

    log::info!(
        "Indexing {} ({} reads, k={}, t={}, {} k-mers per pass) against {} search sets",
        index_name,
        index_manager.valid_read_count(),
        params.kmer_size,
        params.min_hits,
        params.max_kmers,
        targets.len()
    );

    let start = Instant::now();
    let reports = index_and_search(&mut index_manager, &mut targets, &params)
        .with_context(|| format!("Search against {} failed", index_name))?;
    log_timing("Index and search", start.elapsed());

    for ((target, report), valid) in targets.iter_mut().zip(&reports).zip(valid) {
        target
            .save_tags(output, &index_name)
            .with_context(|| format!("Failed to save results of {}", target.nickname()))?;
        print_report(target.nickname(), &index_name, report, valid);
    }

    Ok(())
}

fn print_report(name: &str, index_name: &str, report: &TargetReport, valid: u64) {
    let pct = if valid == 0 {
        0.0
    } else {
        100.0 * report.shared_reads as f64 / valid as f64
    };
    println!(
        "{} in {}: {} / {} reads ({:.2}%), {} on the reverse strand, {} passes",
        name, index_name, report.shared_reads, valid, pct, report.reverse_matches, report.passes
    );
}
