//! Packed bit vector with one bit per read.
//!
//! Used as the live tag structure while searching, as a read file's
//! selection, and as the persisted output of every tool.
//!
//! # File Format
//!
//! ```text
//! <comment>\n
//! #<bit length in decimal>\n
//! <ceil(bit length / 8) raw bytes>
//! ```
//!
//! Bit `i` is stored in byte `i / 8` under mask `1 << (i % 8)`. There is no
//! trailing delimiter after the raw bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;
use rand::Rng;

use crate::constants::SIZE_MARKER;
use crate::core::bloom::zeroed;
use crate::error::{ReadshareError, Result};

#[inline(always)]
fn byte_len(bits: u64) -> usize {
    bits.div_ceil(8) as usize
}

#[inline(always)]
fn mask(i: u64) -> u8 {
    1u8 << (i % 8)
}

/// Array of bits with a free-text comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    bits: Vec<u8>,
    len: u64,
    comment: String,
}

impl BitVector {
    /// Empty vector of length 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector of `len` bits, all set to `value`.
    pub fn with_len(len: u64, value: bool) -> Result<Self> {
        let mut bv = Self::new();
        bv.init(len, value)?;
        Ok(bv)
    }

    /// Resize to `len` bits, all set to `value`. The comment is kept.
    pub fn init(&mut self, len: u64, value: bool) -> Result<()> {
        self.bits = zeroed(byte_len(len))?;
        self.len = len;
        if value {
            self.set_all(true);
        }
        Ok(())
    }

    /// Drop the buffer and return to length 0.
    pub fn clear(&mut self) {
        self.bits = Vec::new();
        self.len = 0;
    }

    /// Set every bit to `value` without changing the length.
    pub fn set_all(&mut self, value: bool) {
        self.bits.fill(if value { 0xFF } else { 0 });
        self.clear_tail();
    }

    /// Number of bits.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_set(&self, i: u64) -> bool {
        debug_assert!(i < self.len, "bit {} out of range {}", i, self.len);
        self.bits[(i / 8) as usize] & mask(i) != 0
    }

    #[inline]
    pub fn set(&mut self, i: u64) {
        debug_assert!(i < self.len, "bit {} out of range {}", i, self.len);
        self.bits[(i / 8) as usize] |= mask(i);
    }

    #[inline]
    pub fn unset(&mut self, i: u64) {
        debug_assert!(i < self.len, "bit {} out of range {}", i, self.len);
        self.bits[(i / 8) as usize] &= !mask(i);
    }

    /// Number of set bits. Unused bits of the last byte are never counted.
    pub fn count_ones(&self) -> u64 {
        let ones: u64 = self.bits.iter().map(|b| b.count_ones() as u64).sum();
        ones.min(self.len)
    }

    /// `self = self AND other`
    pub fn and(&mut self, other: &BitVector) -> Result<()> {
        self.combine(other, |a, b| a & b)
    }

    /// `self = self OR other`
    pub fn or(&mut self, other: &BitVector) -> Result<()> {
        self.combine(other, |a, b| a | b)
    }

    /// `self = self AND (NOT other)`
    pub fn and_not(&mut self, other: &BitVector) -> Result<()> {
        self.combine(other, |a, b| a & !b)
    }

    /// `self = NOT self`
    pub fn not(&mut self) {
        for b in self.bits.iter_mut() {
            *b = !*b;
        }
        self.clear_tail();
    }

    fn combine(&mut self, other: &BitVector, op: impl Fn(u8, u8) -> u8) -> Result<()> {
        if other.len != self.len {
            return Err(ReadshareError::SizeMismatch {
                left: self.len,
                right: other.len,
            });
        }
        for (a, &b) in self.bits.iter_mut().zip(other.bits.iter()) {
            *a = op(*a, b);
        }
        Ok(())
    }

    fn clear_tail(&mut self) {
        let used = (self.len % 8) as u32;
        if used != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= (1u8 << used) - 1;
            }
        }
    }

    /// Redraw every bit, true with probability `percentage / 100`.
    pub fn random_vector(&mut self, percentage: f64) -> Result<()> {
        self.random_vector_with(&mut rand::thread_rng(), percentage)
    }

    /// Like [`BitVector::random_vector`] with a caller-provided RNG.
    pub fn random_vector_with<R: Rng + ?Sized>(&mut self, rng: &mut R, percentage: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(ReadshareError::validation(format!(
                "percentage must be in [0, 100] (got {})",
                percentage
            )));
        }
        let p = percentage / 100.0;
        self.set_all(false);
        for i in 0..self.len {
            if rng.gen_bool(p) {
                self.set(i);
            }
        }
        Ok(())
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Raw packed bytes, `ceil(len / 8)` of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    fn header(&self) -> String {
        format!("{}\n#{}\n", self.comment, self.len)
    }

    /// Serialize to any writer (used for stdout output).
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.header().as_bytes())?;
        writer.write_all(&self.bits)
    }

    /// Write the vector to `path`, replacing any existing file.
    ///
    /// The file is created at its final size before the content is written.
    pub fn write(&self, path: &Path) -> Result<()> {
        let header = self.header();
        let total = (header.len() + self.bits.len()) as u64;

        let file = File::create(path).map_err(|e| ReadshareError::io(path, "create", e))?;
        file.set_len(total)
            .map_err(|e| ReadshareError::io(path, "resize", e))?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(header.as_bytes())
            .and_then(|_| writer.write_all(&self.bits))
            .and_then(|_| writer.flush())
            .map_err(|e| ReadshareError::io(path, "write", e))?;
        Ok(())
    }

    /// Read a vector previously written with [`BitVector::write`].
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ReadshareError::io(path, "open", e))?;
        let size = file
            .metadata()
            .map_err(|e| ReadshareError::io(path, "stat", e))?
            .len();
        if size == 0 {
            return Err(ReadshareError::format(path, "empty bit vector file"));
        }
        // SAFETY: the mapping is read-only and dropped before returning; the
        // file is not expected to be modified concurrently.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| ReadshareError::io(path, "map", e))?;
        Self::parse(&map).map_err(|detail| ReadshareError::format(path, detail))
    }

    /// Parse the serialized form.
    pub fn parse(data: &[u8]) -> std::result::Result<Self, String> {
        let marker = data
            .iter()
            .position(|&b| b == SIZE_MARKER)
            .ok_or("bit vector does not contain its size")?;

        let mut comment = &data[..marker];
        if let Some(stripped) = comment.strip_suffix(b"\n") {
            comment = stripped;
        }

        let size_start = marker + 1;
        let size_end = data[size_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| size_start + p)
            .ok_or("bit vector size line is not terminated")?;
        let size_text = std::str::from_utf8(&data[size_start..size_end])
            .map_err(|_| "bit vector size is not valid text")?
            .trim();
        if size_text.is_empty() {
            return Err("bit vector does not contain its size".to_string());
        }
        let len: u64 = size_text
            .parse()
            .map_err(|_| format!("invalid bit vector size '{}'", size_text))?;

        let tail = &data[size_end + 1..];
        let needed = byte_len(len);
        if tail.len() < needed {
            return Err(format!(
                "bit vector truncated: {} bytes expected, {} found",
                needed,
                tail.len()
            ));
        }

        let mut bv = BitVector {
            bits: tail[..needed].to_vec(),
            len,
            comment: String::from_utf8_lossy(comment).into_owned(),
        };
        bv.clear_tail();
        Ok(bv)
    }
}
