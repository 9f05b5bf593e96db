//! The `random` command.

use anyhow::{Context, Result};
use std::path::Path;

use readshare::bitvec::BitVector;
use readshare::reads::count_records;

/// Select about `percentage` percent of the reads of `reads` at random.
pub fn run_random(reads: &Path, percentage: f64, output: &Path) -> Result<()> {
    let count = count_records(reads)
        .with_context(|| format!("Failed to count reads of {}", reads.display()))?;
    let mut bv = BitVector::with_len(count, false)?;
    bv.random_vector(percentage)?;
    bv.set_comment(format!("{}% random reads of {}", percentage, reads.display()));
    bv.write(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{}: {} / {} reads selected",
        output.display(),
        bv.count_ones(),
        bv.len()
    );
    Ok(())
}
