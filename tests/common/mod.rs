//! Read sets shared by the integration tests.
//!
//! Sets A, B and C share whole reads only: every `SHARED` read is in A,
//! B holds the first two and the reverse complement of the third, C holds
//! the first. With k=11 no private read has a single k-mer found in another
//! set on either strand, so results do not depend on bloom false positives.

#![allow(dead_code)]

use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const K: usize = 11;

pub const SHARED: [&str; 3] = [
    "AAAGCGGCACTTGTGAAGTGTTCCCCACGCCGCTTGGGTCTTCTGTGTTGTTCGCGTGGT",
    "GCTGAGACAAAGCACGCCATAAGGCCAAAAAAAGGCCCATACCAAGAGGTAGTAGTCTCA",
    "GAATCTTGCGGGTACAGACCCATCACCTAGACGGTGACATTCAACAAACCACATTGTCCT",
];

/// Reverse complement of `SHARED[2]`.
pub const SHARED_3_RC: &str = "AGGACAATGTGGTTTGTTGAATGTCACCGTCTAGGTGATGGGTCTGTACCCGCAAGATTC";

pub const ONLY_A: [&str; 3] = [
    "TAATCATGAAGGGGATAAGCATATTTCAAGAGGACTCAGTTCGTAGAAAGTCAATATGGT",
    "CGGTTTTGTCCTGTAAAGCCTAAACGTCGTCGACTAGCGCCTCTGCTTATCTATGTGTTG",
    "GACCTTAGTTCAATCTCATCGCTCATTGCTCAGATATGTGTAAGCTGCACTTTGCAGTAG",
];

pub const ONLY_B: [&str; 2] = [
    "ATTCGTCTGAGGGGGTACTCAGACTCGAAATGCGGAGTGCTTGTCTCGGCACTCGCGCCC",
    "GTTGGGTGAGGTTCGGTTACGTCAAGCGATAGCTGTCGGCTACCGGCTGGAGCCCAGGAC",
];

pub const ONLY_C: [&str; 2] = [
    "CATTGCGAGTCATTTGATTTCTTTAATCACATGTAGAGCCACTAGTATCATCACAACAGC",
    "CGTACACATCACTGTCACCCTCGGTCTCTGGAATGGTGCTCAACCCTACAGTACCGACAC",
];

/// A: SHARED then ONLY_A.
pub fn set_a() -> Vec<&'static str> {
    SHARED.iter().chain(ONLY_A.iter()).copied().collect()
}

/// B: ONLY_B[0], SHARED[0], SHARED_3_RC, SHARED[1], ONLY_B[1].
pub fn set_b() -> Vec<&'static str> {
    vec![ONLY_B[0], SHARED[0], SHARED_3_RC, SHARED[1], ONLY_B[1]]
}

/// C: ONLY_C[0], SHARED[0], ONLY_C[1].
pub fn set_c() -> Vec<&'static str> {
    vec![ONLY_C[0], SHARED[0], ONLY_C[1]]
}

pub fn write_fasta(dir: &Path, name: &str, seqs: &[&str]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    for (i, seq) in seqs.iter().enumerate() {
        writeln!(file, ">{}_{}", name, i)?;
        writeln!(file, "{}", seq)?;
    }
    Ok(path)
}

pub fn write_gz_fastq(dir: &Path, name: &str, seqs: &[&str]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
    for (i, seq) in seqs.iter().enumerate() {
        writeln!(encoder, "@{}_{}", name, i)?;
        writeln!(encoder, "{}", seq)?;
        writeln!(encoder, "+")?;
        writeln!(encoder, "{}", "I".repeat(seq.len()))?;
    }
    encoder.finish()?;
    Ok(path)
}
