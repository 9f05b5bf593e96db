//! The `filter` command.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

use super::args::FilterArgs;
use readshare::constants::BIT_VECTOR_EXTENSION;
use readshare::filter::ReadFilter;
use readshare::reads::ReadFile;

/// Build the selection of a read file passing the filter and save it.
pub fn run_filter(args: &FilterArgs) -> Result<()> {
    let mut file = match &args.bit_vector {
        Some(bv) => ReadFile::open_with_selection(&args.reads, bv),
        None => ReadFile::open(&args.reads),
    }
    .with_context(|| format!("Failed to open {}", args.reads.display()))?;

    let filter = ReadFilter {
        min_length: args.min_length,
        max_ambiguous: args.max_ambiguous,
        min_entropy: args.min_entropy,
        max_reads: args.max_reads,
    };
    let report = filter
        .apply(&mut file, args.comment.as_deref())
        .with_context(|| format!("Failed to filter {}", args.reads.display()))?;

    let output = args.output.clone().unwrap_or_else(|| {
        let mut name = OsString::from(args.reads.as_os_str());
        name.push(".");
        name.push(BIT_VECTOR_EXTENSION);
        PathBuf::from(name)
    });
    report
        .selection
        .write(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{}: {} / {} reads kept ({} too short, {} ambiguous, {} low entropy, {} over limit)",
        args.reads.display(),
        report.kept,
        file.read_count(),
        report.removed_length,
        report.removed_ambiguous,
        report.removed_entropy,
        report.removed_over_limit
    );
    Ok(())
}
