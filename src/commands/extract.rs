//! The `extract` command.

use anyhow::{Context, Result};
use std::path::Path;

use readshare::extract::{extract_reads, ExtractTarget};
use readshare::reads::ReadFile;

/// Write the reads of `reads` selected by `bit_vector`.
pub fn run_extract(reads: &Path, bit_vector: &Path, output: Option<&Path>) -> Result<()> {
    let mut file = ReadFile::open_with_selection(reads, bit_vector)
        .with_context(|| format!("Failed to open {} with {}", reads.display(), bit_vector.display()))?;
    let target = ExtractTarget::for_input(file.format(), output)?;
    let written = extract_reads(&mut file, &target)
        .with_context(|| format!("Failed to extract reads of {}", reads.display()))?;
    log::info!(
        "Extracted {} / {} reads of {}",
        written,
        file.read_count(),
        reads.display()
    );
    Ok(())
}
