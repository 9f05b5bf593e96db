//! End-to-end tests of indexing and searching read files.

mod common;

use anyhow::Result;
use std::path::Path;
use tempfile::tempdir;

use common::{set_a, set_b, set_c, write_fasta, write_gz_fastq, K};
use readshare::engine::{index_and_search, round_trip, SearchParams};
use readshare::matrix::{compute_matrix, MatrixKind};
use readshare::reads::{FileManager, ReadSetEntry, ReadSets, ReadSource};
use readshare::BitVector;

fn manager(name: &str, path: &Path) -> Result<FileManager> {
    Ok(FileManager::new(name, &[ReadSetEntry::new(path)])?)
}

fn set_bits(bv: &BitVector) -> Vec<u64> {
    (0..bv.len()).filter(|&i| bv.is_set(i)).collect()
}

#[test]
fn test_search_tags_shared_reads_on_both_strands() -> Result<()> {
    let dir = tempdir()?;
    let a = write_fasta(dir.path(), "a.fa", &set_a())?;
    let b = write_fasta(dir.path(), "b.fa", &set_b())?;
    let c = write_fasta(dir.path(), "c.fa", &set_c())?;

    let mut index = manager("A", &a)?;
    let mut targets = vec![manager("B", &b)?, manager("C", &c)?];
    let params = SearchParams::new(K, 2).with_max_kmers(1_000);
    let reports = index_and_search(&mut index, &mut targets, &params)?;

    assert_eq!(reports[0].passes, 1);
    assert_eq!(reports[0].indexed_reads, 6);
    assert_eq!(reports[0].shared_reads, 3);
    assert_eq!(reports[0].reverse_matches, 1);
    assert_eq!(reports[1].shared_reads, 1);
    assert_eq!(reports[1].reverse_matches, 0);

    assert_eq!(set_bits(&targets[0].export_tags()[0]), vec![1, 2, 3]);
    assert_eq!(set_bits(&targets[1].export_tags()[0]), vec![1]);
    Ok(())
}

#[test]
fn test_small_budget_needs_one_pass_per_read() -> Result<()> {
    let dir = tempdir()?;
    let a = write_fasta(dir.path(), "a.fa", &set_a())?;
    let b = write_fasta(dir.path(), "b.fa", &set_b())?;

    // Every 60 base read holds 50 k-mers of size 11.
    let params = SearchParams::new(K, 2).with_max_kmers(50);
    let mut index = manager("A", &a)?;
    let mut targets = vec![manager("B", &b)?];
    let reports = index_and_search(&mut index, &mut targets, &params)?;

    assert_eq!(reports[0].passes, 6);
    assert_eq!(reports[0].indexed_reads, 6);
    assert_eq!(reports[0].shared_reads, 3);
    assert_eq!(set_bits(&targets[0].export_tags()[0]), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_gzipped_fastq_matches_fasta() -> Result<()> {
    let dir = tempdir()?;
    let a = write_fasta(dir.path(), "a.fa", &set_a())?;
    let b = write_gz_fastq(dir.path(), "b.fq.gz", &set_b())?;

    let mut index = manager("A", &a)?;
    let mut targets = vec![manager("B", &b)?];
    let reports = index_and_search(&mut index, &mut targets, &SearchParams::new(K, 2))?;
    assert_eq!(reports[0].shared_reads, 3);
    Ok(())
}

#[test]
fn test_round_trip_percentages() -> Result<()> {
    let dir = tempdir()?;
    let a_path = write_fasta(dir.path(), "a.fa", &set_a())?;
    let b_path = write_fasta(dir.path(), "b.fa", &set_b())?;

    let mut a = manager("A", &a_path)?;
    let mut b = manager("B", &b_path)?;
    let trip = round_trip(&mut a, &mut b, &SearchParams::new(K, 2))?;

    assert_eq!(trip.a_reads, 6);
    assert_eq!(trip.b_reads, 5);
    assert_eq!(trip.b_in_a.shared_reads, 3);
    assert_eq!(trip.a_in_b.shared_reads, 3);
    assert_eq!(trip.b_in_a_in_b.shared_reads, 3);
    assert_eq!(trip.a_percentage(), 50.0);
    assert_eq!(trip.b_percentage(), 60.0);
    assert_eq!(set_bits(&trip.a_tags[0]), vec![0, 1, 2]);

    // A's tags were applied, B's last tags were not.
    assert_eq!(a.valid_read_count(), 3);
    assert_eq!(b.valid_read_count(), 3);
    assert_eq!(set_bits(&b.export_tags()[0]), vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_saved_tags_select_reads_of_next_run() -> Result<()> {
    let dir = tempdir()?;
    let a = write_fasta(dir.path(), "a.fa", &set_a())?;
    let b = write_fasta(dir.path(), "b.fa", &set_b())?;
    let c = write_fasta(dir.path(), "c.fa", &set_c())?;

    let mut index = manager("A", &a)?;
    let mut targets = vec![manager("B", &b)?];
    index_and_search(&mut index, &mut targets, &SearchParams::new(K, 2))?;
    let saved = targets[0].save_tags(dir.path(), "A")?;
    assert_eq!(saved, vec![dir.path().join("b.fa_in_A.bv")]);

    let bv = BitVector::read(&saved[0])?;
    assert_eq!(bv.len(), 5);
    assert_eq!(bv.count_ones(), 3);
    assert!(bv.comment().ends_with("b.fa in A"));

    // B restricted to its reads shared with A, searched against C.
    let mut b_in_a = FileManager::new("B", &[ReadSetEntry::with_selection(&b, &saved[0])])?;
    assert_eq!(b_in_a.valid_read_count(), 3);
    let mut index = manager("C", &c)?;
    let reports = index_and_search(&mut index, std::slice::from_mut(&mut b_in_a), &SearchParams::new(K, 2))?;
    assert_eq!(reports[0].searched_reads, 3);
    assert_eq!(reports[0].shared_reads, 1);
    Ok(())
}

#[test]
fn test_matrix_of_three_sets() -> Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("out");
    std::fs::create_dir(&out)?;

    let mut sets = ReadSets::new();
    sets.insert(
        "A".to_string(),
        vec![ReadSetEntry::new(write_fasta(dir.path(), "a.fa", &set_a())?)],
    );
    sets.insert(
        "B".to_string(),
        vec![ReadSetEntry::new(write_fasta(dir.path(), "b.fa", &set_b())?)],
    );
    sets.insert(
        "C".to_string(),
        vec![ReadSetEntry::new(write_fasta(dir.path(), "c.fa", &set_c())?)],
    );

    let matrix = compute_matrix(&sets, &SearchParams::new(K, 2), Some(&out))?;
    assert_eq!(
        matrix.to_csv(MatrixKind::Plain),
        ";A;B;C\nA;6;3;1\nB;3;5;1\nC;1;1;3\n"
    );
    assert_eq!(matrix.percentage(0, 1), 50.0);
    assert_eq!(matrix.percentage(1, 0), 60.0);
    assert_eq!(matrix.normalized(0, 2), 100.0 * 2.0 / 9.0);

    for name in [
        "a.fa_in_B.bv",
        "a.fa_in_C.bv",
        "b.fa_in_A.bv",
        "b.fa_in_C.bv",
        "c.fa_in_A.bv",
        "c.fa_in_B.bv",
    ] {
        assert!(out.join(name).exists(), "missing {}", name);
    }
    assert_eq!(set_bits(&BitVector::read(&out.join("a.fa_in_C.bv"))?), vec![0]);
    assert_eq!(set_bits(&BitVector::read(&out.join("c.fa_in_B.bv"))?), vec![1]);
    Ok(())
}
