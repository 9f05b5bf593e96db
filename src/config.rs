use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_KMER_SIZE, DEFAULT_MIN_HITS, MAX_KMER_SIZE};
use crate::engine::SearchParams;
use crate::filter::ReadFilter;
use crate::reads::{ReadSetEntry, ReadSets};

/// Run configuration of the `matrix` command.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub comparison: ComparisonSettings,
    /// Reads are filtered before comparing when this section is present.
    pub filter: Option<FilterSettings>,
    pub sets: BTreeMap<String, SetDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonSettings {
    #[serde(default = "default_kmer_size")]
    pub kmer_size: usize,
    #[serde(default = "default_min_hits")]
    pub min_hits: u32,
    pub max_kmers: Option<u64>,
    pub output: PathBuf,
}

fn default_kmer_size() -> usize {
    DEFAULT_KMER_SIZE
}

fn default_min_hits() -> u32 {
    DEFAULT_MIN_HITS
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterSettings {
    /// Defaults to `kmer_size * min_hits`.
    pub min_length: Option<usize>,
    pub max_ambiguous: Option<usize>,
    #[serde(default)]
    pub min_entropy: f64,
    /// Per set, shared between its files.
    pub max_reads: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SetDefinition {
    pub files: Vec<PathBuf>,
    /// Optional selection vector for each file, in the same order.
    #[serde(default)]
    pub bit_vectors: Vec<PathBuf>,
}

pub fn parse_config(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .context(format!("Failed to read config file: {}", path.display()))?;

    let config: ConfigFile = toml::from_str(&contents).context("Failed to parse TOML config")?;

    if config.sets.is_empty() {
        return Err(anyhow!("Config must define at least one read set"));
    }

    if !(1..=MAX_KMER_SIZE).contains(&config.comparison.kmer_size) {
        return Err(anyhow!(
            "Config error: kmer_size must be in 1..={} (got {})",
            MAX_KMER_SIZE,
            config.comparison.kmer_size
        ));
    }

    if config.comparison.min_hits == 0 {
        return Err(anyhow!("Config error: min_hits must be at least 1"));
    }

    Ok(config)
}

pub fn validate_config(config: &ConfigFile, config_dir: &Path) -> Result<()> {
    for (set_name, set_def) in &config.sets {
        if set_def.files.is_empty() {
            return Err(anyhow!("Set '{}' has no files", set_name));
        }
        if !set_def.bit_vectors.is_empty() && set_def.bit_vectors.len() != set_def.files.len() {
            return Err(anyhow!(
                "Set '{}' lists {} files but {} bit vectors",
                set_name,
                set_def.files.len(),
                set_def.bit_vectors.len()
            ));
        }

        for file_path in set_def.files.iter().chain(&set_def.bit_vectors) {
            let abs_path = resolve_path(config_dir, file_path);
            if !abs_path.exists() {
                return Err(anyhow!(
                    "File not found for set '{}': {}",
                    set_name,
                    abs_path.display()
                ));
            }
        }
    }

    if let Some(filter) = &config.filter {
        if !filter.min_entropy.is_finite() || filter.min_entropy < 0.0 {
            return Err(anyhow!(
                "Config error: min_entropy must be a non-negative number (got {})",
                filter.min_entropy
            ));
        }
    }

    Ok(())
}

pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl ConfigFile {
    pub fn search_params(&self) -> SearchParams {
        let params = SearchParams::new(self.comparison.kmer_size, self.comparison.min_hits);
        match self.comparison.max_kmers {
            Some(max) => params.with_max_kmers(max),
            None => params,
        }
    }

    /// Filter to run before comparing, if any.
    pub fn read_filter(&self) -> Option<ReadFilter> {
        let settings = self.filter.as_ref()?;
        let default_length = self.comparison.kmer_size * self.comparison.min_hits as usize;
        Some(ReadFilter {
            min_length: settings.min_length.unwrap_or(default_length),
            max_ambiguous: settings.max_ambiguous,
            min_entropy: settings.min_entropy,
            max_reads: settings.max_reads,
        })
    }

    /// Read sets with paths resolved against `config_dir`.
    pub fn read_sets(&self, config_dir: &Path) -> ReadSets {
        self.sets
            .iter()
            .map(|(name, def)| {
                let entries = def
                    .files
                    .iter()
                    .enumerate()
                    .map(|(i, file)| ReadSetEntry {
                        path: resolve_path(config_dir, file),
                        selection: def.bit_vectors.get(i).map(|bv| resolve_path(config_dir, bv)),
                    })
                    .collect();
                (name.clone(), entries)
            })
            .collect()
    }

    pub fn output_dir(&self, config_dir: &Path) -> PathBuf {
        resolve_path(config_dir, &self.comparison.output)
    }
}
