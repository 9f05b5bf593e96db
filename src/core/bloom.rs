//! Bit-packed bloom index over [`HashKey`] composite keys.
//!
//! Keys are k bits wide. Byte `key / 2` of a `2^(k-1)` byte array holds the
//! key, and `key % 2` selects one of two bit-planes, giving every partition
//! an even and an odd mask inside a shared byte:
//!
//! ```text
//!  bit  7   6   5   4   3   2   1   0
//!       Ae  Be  Ce  De  Ao  Bo  Co  Do
//! ```
//!
//! A k-mer is present only if all four of its partition bits are set.

use super::hash_key::HashKey;
use crate::constants::MAX_KMER_SIZE;
use crate::error::{ReadshareError, Result};

const EVEN_MASKS: [u8; 4] = [128, 64, 32, 16];
const ODD_MASKS: [u8; 4] = [8, 4, 2, 1];

#[inline(always)]
fn slot(partition: usize, key: u64) -> (usize, u8) {
    let mask = if key % 2 == 1 {
        ODD_MASKS[partition]
    } else {
        EVEN_MASKS[partition]
    };
    ((key / 2) as usize, mask)
}

/// Multi-hash membership filter sized from the k-mer size.
pub struct BloomFilter {
    bits: Vec<u8>,
    kmer_size: usize,
}

impl BloomFilter {
    /// Allocate an empty index for k-mers of size `kmer_size`.
    ///
    /// Fails with [`ReadshareError::Allocation`] when the `2^(k-1)` bytes
    /// cannot be reserved.
    pub fn new(kmer_size: usize) -> Result<Self> {
        if !(1..=MAX_KMER_SIZE).contains(&kmer_size) {
            return Err(ReadshareError::validation(format!(
                "k-mer size must be in 1..={} (got {})",
                MAX_KMER_SIZE, kmer_size
            )));
        }
        let bytes = 1usize << (kmer_size - 1);
        Ok(Self {
            bits: zeroed(bytes)?,
            kmer_size,
        })
    }

    /// Mark the k-mer hashed in `hash` as present.
    #[inline]
    pub fn feed(&mut self, hash: &HashKey) {
        debug_assert_eq!(hash.kmer_size(), self.kmer_size);
        for (partition, &key) in hash.keys().iter().enumerate() {
            let (byte, mask) = slot(partition, key);
            self.bits[byte] |= mask;
        }
    }

    /// True if all four partition bits of the hashed k-mer are set.
    #[inline]
    pub fn is_found(&self, hash: &HashKey) -> bool {
        debug_assert_eq!(hash.kmer_size(), self.kmer_size);
        hash.keys().iter().enumerate().all(|(partition, &key)| {
            let (byte, mask) = slot(partition, key);
            self.bits[byte] & mask != 0
        })
    }

    /// Reset every bit to zero.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// True if nothing has been fed since allocation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Size of the index in bytes.
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }
}

/// Allocate a zeroed buffer, reporting failure instead of aborting.
pub(crate) fn zeroed(bytes: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| ReadshareError::Allocation { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}
