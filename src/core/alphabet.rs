//! Nucleotide alphabet utilities.
//!
//! This module provides:
//! - Membership test for the A/C/G/T alphabet (case-insensitive)
//! - Ambiguous base counting used by the read filter

/// Lookup table for nucleotide membership.
/// - A/C/G/T in either case → true
/// - Every other byte (N, IUPAC codes, gaps, ...) → false
const NUCLEOTIDE_LUT: [bool; 256] = {
    let mut lut = [false; 256];
    lut[b'A' as usize] = true;
    lut[b'a' as usize] = true;
    lut[b'C' as usize] = true;
    lut[b'c' as usize] = true;
    lut[b'G' as usize] = true;
    lut[b'g' as usize] = true;
    lut[b'T' as usize] = true;
    lut[b't' as usize] = true;
    lut
};

/// Returns true if the byte is one of A, C, G, T (any case).
#[inline(always)]
pub fn is_nucleotide(byte: u8) -> bool {
    NUCLEOTIDE_LUT[byte as usize]
}

/// Number of bytes in `seq` outside the A/C/G/T alphabet.
pub fn count_ambiguous(seq: &[u8]) -> usize {
    seq.iter().filter(|&&b| !is_nucleotide(b)).count()
}

/// Complement of a nucleotide, preserving case. Other bytes are returned as is.
pub fn complement(byte: u8) -> u8 {
    match byte {
        b'A' => b'T',
        b'a' => b't',
        b'C' => b'G',
        b'c' => b'g',
        b'G' => b'C',
        b'g' => b'c',
        b'T' => b'A',
        b't' => b'a',
        other => other,
    }
}

/// Reverse complement of a sequence.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nucleotide() {
        for b in b"ACGTacgt" {
            assert!(is_nucleotide(*b));
        }
        for b in b"NnRYX-. \n" {
            assert!(!is_nucleotide(*b));
        }
        assert!(!is_nucleotide(255));
    }

    #[test]
    fn test_count_ambiguous() {
        assert_eq!(count_ambiguous(b"ACGT"), 0);
        assert_eq!(count_ambiguous(b"ANNGT"), 2);
        assert_eq!(count_ambiguous(b""), 0);
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
        assert_eq!(reverse_complement(b"ACGTACGTACGT"), b"ACGTACGTACGT".to_vec());
        assert_eq!(reverse_complement(b"acNg"), b"cNgt".to_vec());
    }
}
