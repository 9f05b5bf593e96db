//! The `matrix` command: all-against-all comparison from a run configuration.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use super::helpers::ensure_output_dir;
use readshare::config::{parse_config, validate_config};
use readshare::constants::BIT_VECTOR_EXTENSION;
use readshare::logging::log_timing;
use readshare::matrix::{compute_matrix, filter_sets, matrix_from_vectors, MatrixKind};
use readshare::reads::{basename, ReadSetEntry, ReadSets};

pub fn run_matrix(config_path: &Path, from_vectors: Option<&Path>) -> Result<()> {
    let config = parse_config(config_path)?;
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    validate_config(&config, config_dir)?;

    let output = config.output_dir(config_dir);
    ensure_output_dir(&output)?;
    let params = config.search_params();
    let mut sets = config.read_sets(config_dir);

    let matrix = match from_vectors {
        Some(dir) => {
            if config.read_filter().is_some() {
                sets = saved_selections(&sets, dir);
            }
            matrix_from_vectors(&sets, dir)
                .with_context(|| format!("Failed to rebuild matrices from {}", dir.display()))?
        }
        None => {
            if let Some(filter) = config.read_filter() {
                let start = Instant::now();
                sets = filter_sets(&sets, &filter, &output).context("Failed to filter read sets")?;
                log_timing("Filtering", start.elapsed());
            }

            let start = Instant::now();
            let matrix =
                compute_matrix(&sets, &params, Some(&output)).context("Failed to compare read sets")?;
            log_timing("Comparisons", start.elapsed());
            matrix
        }
    };

    let written = matrix
        .write_all(&output)
        .with_context(|| format!("Failed to write matrices to {}", output.display()))?;
    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    print!("{}", matrix.to_csv(MatrixKind::Percentage));
    Ok(())
}

/// Point every file at the `<file name>.bv` selection a filtered run left in `dir`.
fn saved_selections(sets: &ReadSets, dir: &Path) -> ReadSets {
    sets.iter()
        .map(|(name, entries)| {
            let entries = entries
                .iter()
                .map(|entry| {
                    let selection =
                        dir.join(format!("{}.{}", basename(&entry.path), BIT_VECTOR_EXTENSION));
                    ReadSetEntry::with_selection(&entry.path, selection)
                })
                .collect();
            (name.clone(), entries)
        })
        .collect()
}
