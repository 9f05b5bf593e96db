//! Strand-aware rolling k-mer hash.
//!
//! A k-mer is projected onto four binary partitions of the nucleotide alphabet,
//! one bit per base and one key per partition:
//!
//! | key | bit set for |
//! |-----|-------------|
//! | A   | G, T        |
//! | B   | C, T        |
//! | C   | C, G        |
//! | D   | C, G, T     |
//!
//! `A` is the all-zero pattern. No single key identifies a k-mer, the four
//! together do, so they are handled as one composite key.

use crate::constants::MAX_KMER_SIZE;

/// Index of each partition inside [`HashKey::keys`].
pub const KEY_A: usize = 0;
pub const KEY_B: usize = 1;
pub const KEY_C: usize = 2;
pub const KEY_D: usize = 3;

/// Rolling 4-key hash of the last k absorbed bases.
#[derive(Debug, Clone)]
pub struct HashKey {
    keys: [u64; 4],
    count: usize,
    kmer_size: usize,
    /// `2^(k-1)`: the bloom index size and the top bit of a k-bit key.
    capacity: u64,
    /// `2^k - 1`
    window_mask: u64,
    /// `2^(k-1) - 1`
    half_mask: u64,
}

impl HashKey {
    /// Create an empty hash for k-mers of size `kmer_size`.
    ///
    /// # Panics
    /// Panics if `kmer_size` is 0 or larger than [`MAX_KMER_SIZE`].
    pub fn new(kmer_size: usize) -> Self {
        assert!(
            (1..=MAX_KMER_SIZE).contains(&kmer_size),
            "Unsupported k-mer size: {}",
            kmer_size
        );
        let capacity = 1u64 << (kmer_size - 1);
        Self {
            keys: [0; 4],
            count: 0,
            kmer_size,
            capacity,
            window_mask: 2 * capacity - 1,
            half_mask: capacity - 1,
        }
    }

    /// Zero the four keys and the running count.
    #[inline]
    pub fn reset(&mut self) {
        self.keys = [0; 4];
        self.count = 0;
    }

    /// Absorb the next base reading left to right and return the number of
    /// bases absorbed since the last reset.
    ///
    /// Bytes outside C/G/T (any case) contribute the `A` pattern; callers
    /// reset on invalid bases before reaching here.
    #[inline]
    pub fn add(&mut self, base: u8) -> usize {
        self.count += 1;
        for key in self.keys.iter_mut() {
            *key = (*key << 1) & self.window_mask;
        }
        match base {
            b'C' | b'c' => self.set_low(&[KEY_B, KEY_C, KEY_D]),
            b'G' | b'g' => self.set_low(&[KEY_A, KEY_C, KEY_D]),
            b'T' | b't' => self.set_low(&[KEY_A, KEY_B, KEY_D]),
            _ => {}
        }
        self.count
    }

    /// Absorb the next base, building the key of the reverse complement.
    ///
    /// Bits move right and the complemented base enters at the top, so after
    /// absorbing `b1..bk` the keys equal those produced by [`HashKey::add`]
    /// over the reverse complement of `b1..bk`.
    #[inline]
    pub fn reverse_add(&mut self, base: u8) -> usize {
        self.count += 1;
        for key in self.keys.iter_mut() {
            *key = (*key >> 1) & self.half_mask;
        }
        match base {
            b'A' | b'a' => self.set_high(&[KEY_A, KEY_B, KEY_D]),
            b'C' | b'c' => self.set_high(&[KEY_A, KEY_C, KEY_D]),
            b'G' | b'g' => self.set_high(&[KEY_B, KEY_C, KEY_D]),
            _ => {}
        }
        self.count
    }

    #[inline(always)]
    fn set_low(&mut self, which: &[usize]) {
        for &i in which {
            self.keys[i] |= 1;
        }
    }

    #[inline(always)]
    fn set_high(&mut self, which: &[usize]) {
        for &i in which {
            self.keys[i] |= self.capacity;
        }
    }

    /// True once a full k-mer window has been absorbed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= self.kmer_size
    }

    /// The four keys, indexed by [`KEY_A`]..[`KEY_D`].
    #[inline]
    pub fn keys(&self) -> &[u64; 4] {
        &self.keys
    }

    /// Bases absorbed since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }

    /// `2^(k-1)`, the number of bytes of a bloom index for this k.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::reverse_complement;

    fn forward_keys(seq: &[u8], k: usize) -> [u64; 4] {
        let mut hash = HashKey::new(k);
        for &b in seq {
            hash.add(b);
        }
        *hash.keys()
    }

    fn reverse_keys(seq: &[u8], k: usize) -> [u64; 4] {
        let mut hash = HashKey::new(k);
        for &b in seq {
            hash.reverse_add(b);
        }
        *hash.keys()
    }

    #[test]
    fn test_masks() {
        let hash = HashKey::new(5);
        assert_eq!(hash.capacity(), 16);
        assert_eq!(hash.window_mask, 31);
        assert_eq!(hash.half_mask, 15);
    }

    #[test]
    fn test_add_partitions() {
        // Single bases with k=1: the low bit of each key is the partition bit.
        assert_eq!(forward_keys(b"A", 1), [0, 0, 0, 0]);
        assert_eq!(forward_keys(b"C", 1), [0, 1, 1, 1]);
        assert_eq!(forward_keys(b"G", 1), [1, 0, 1, 1]);
        assert_eq!(forward_keys(b"T", 1), [1, 1, 0, 1]);
        assert_eq!(forward_keys(b"t", 1), [1, 1, 0, 1]);
    }

    #[test]
    fn test_add_returns_running_count() {
        let mut hash = HashKey::new(3);
        assert_eq!(hash.add(b'A'), 1);
        assert_eq!(hash.add(b'C'), 2);
        assert!(!hash.is_full());
        assert_eq!(hash.add(b'G'), 3);
        assert!(hash.is_full());
        assert_eq!(hash.add(b'T'), 4);
        hash.reset();
        assert_eq!(hash.count(), 0);
        assert_eq!(hash.keys(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_window_keeps_last_k_bases() {
        let k = 4;
        assert_eq!(forward_keys(b"GGGGACGT", k), forward_keys(b"ACGT", k));
        assert_eq!(forward_keys(b"TTACGTTA", k), forward_keys(b"GTTA", k));
    }

    #[test]
    fn test_keys_distinguish_kmers() {
        let k = 3;
        let bases = [b'A', b'C', b'G', b'T'];
        let mut seen = std::collections::HashSet::new();
        for &x in &bases {
            for &y in &bases {
                for &z in &bases {
                    assert!(seen.insert(forward_keys(&[x, y, z], k)));
                }
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn test_reverse_add_matches_reverse_complement() {
        for seq in [&b"ACGTT"[..], b"AACCG", b"GATTACA", b"TTTTTTTT", b"CAGTCAGGA"] {
            let k = seq.len();
            let rc = reverse_complement(seq);
            assert_eq!(
                reverse_keys(seq, k),
                forward_keys(&rc, k),
                "mismatch for {}",
                String::from_utf8_lossy(seq)
            );
        }
    }

    #[test]
    fn test_reverse_add_window_keeps_last_k_bases() {
        let k = 5;
        // Scanning a longer read, the reverse key covers its last k bases.
        let read = b"GGGGAACCG";
        let rc_tail = reverse_complement(&read[read.len() - k..]);
        assert_eq!(reverse_keys(read, k), forward_keys(&rc_tail, k));
    }

    #[test]
    #[should_panic(expected = "Unsupported k-mer size")]
    fn test_zero_kmer_size_panics() {
        HashKey::new(0);
    }
}
