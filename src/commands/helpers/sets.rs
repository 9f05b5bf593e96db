//! Loading read sets and preparing output locations for CLI commands.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use readshare::reads::{read_set_file, FileManager, ReadSetEntry, ReadSets};

/// Parse a read-set descriptor file, requiring at least one set.
pub fn load_read_sets(path: &Path) -> Result<ReadSets> {
    let sets = read_set_file(path)
        .with_context(|| format!("Failed to load read sets from {}", path.display()))?;
    if sets.is_empty() {
        return Err(anyhow!("No read set described in {}", path.display()));
    }
    Ok(sets)
}

/// Parse a descriptor file that must hold exactly one set.
pub fn load_single_set(path: &Path) -> Result<(String, Vec<ReadSetEntry>)> {
    let sets = load_read_sets(path)?;
    if sets.len() != 1 {
        return Err(anyhow!(
            "{} describes {} read sets, exactly one is required",
            path.display(),
            sets.len()
        ));
    }
    sets.into_iter()
        .next()
        .ok_or_else(|| anyhow!("No read set described in {}", path.display()))
}

/// Open the files of a set, failing when none of them is readable.
pub fn open_manager(name: &str, entries: &[ReadSetEntry]) -> Result<FileManager> {
    let manager = FileManager::new(name, entries)
        .with_context(|| format!("Failed to open read set {}", name))?;
    if manager.is_empty() {
        return Err(anyhow!("Read set {} has no readable file", name));
    }
    Ok(manager)
}

/// Create `dir` and its parents if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_single_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sets.txt");
        std::fs::write(&path, "A: a.fa; b.fa\n").unwrap();
        let (name, entries) = load_single_set(&path).unwrap();
        assert_eq!(name, "A");
        assert_eq!(entries.len(), 2);

        std::fs::write(&path, "A: a.fa\nB: b.fa\n").unwrap();
        let err = load_single_set(&path).unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_empty_descriptor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sets.txt");
        std::fs::write(&path, "\n\n").unwrap();
        assert!(load_read_sets(&path).is_err());
    }

    #[test]
    fn test_unreadable_set() {
        let dir = tempdir().unwrap();
        let junk = dir.path().join("junk.txt");
        std::fs::write(&junk, "not reads\n").unwrap();
        let err = open_manager("J", &[ReadSetEntry::new(&junk)]).unwrap_err();
        assert!(err.to_string().contains("no readable file"));
    }
}
