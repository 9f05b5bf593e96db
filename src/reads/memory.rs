//! Read source over sequences held in memory.

use super::source::ReadSource;
use crate::bitvec::BitVector;
use crate::error::{ReadshareError, Result};

/// A single in-memory "file" of reads with its selection and tag vectors.
#[derive(Debug, Clone)]
pub struct InMemoryReads {
    reads: Vec<Vec<u8>>,
    selection: BitVector,
    tags: BitVector,
    next: usize,
    current: Option<usize>,
    consumed: u64,
}

impl InMemoryReads {
    pub fn new<I, S>(reads: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let reads: Vec<Vec<u8>> = reads.into_iter().map(|r| r.as_ref().to_vec()).collect();
        let len = reads.len() as u64;
        Ok(Self {
            reads,
            selection: BitVector::with_len(len, true)?,
            tags: BitVector::with_len(len, false)?,
            next: 0,
            current: None,
            consumed: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn selection(&self) -> &BitVector {
        &self.selection
    }

    pub fn tags(&self) -> &BitVector {
        &self.tags
    }

    fn advance(&mut self, skip_tagged: bool) -> Option<usize> {
        while self.next < self.reads.len() {
            let i = self.next;
            self.next += 1;
            let pos = i as u64;
            if !self.selection.is_set(pos) || (skip_tagged && self.tags.is_set(pos)) {
                continue;
            }
            if skip_tagged {
                self.consumed += 1;
            }
            self.current = Some(i);
            return Some(i);
        }
        self.current = None;
        None
    }
}

impl ReadSource for InMemoryReads {
    fn next_unfiltered_read(&mut self) -> Result<Option<&[u8]>> {
        Ok(self.advance(false).map(|i| self.reads[i].as_slice()))
    }

    fn next_comparison_read(&mut self) -> Result<Option<&[u8]>> {
        Ok(self.advance(true).map(|i| self.reads[i].as_slice()))
    }

    fn current_read_index(&self) -> Option<u64> {
        self.current.map(|i| i as u64)
    }

    fn tag_current(&mut self) {
        if let Some(i) = self.current {
            self.tags.set(i as u64);
        }
    }

    fn untag_current(&mut self) {
        if let Some(i) = self.current {
            self.tags.unset(i as u64);
        }
    }

    fn is_tagged_current(&self) -> bool {
        self.current
            .map(|i| self.tags.is_set(i as u64))
            .unwrap_or(false)
    }

    fn rewind(&mut self) -> Result<()> {
        self.next = 0;
        self.current = None;
        self.consumed = 0;
        Ok(())
    }

    fn valid_read_count(&self) -> u64 {
        self.selection.count_ones()
    }

    fn consumed_reads(&self) -> u64 {
        self.consumed
    }

    fn apply_tags(&mut self) -> Result<()> {
        let fresh = BitVector::with_len(self.tags.len(), false)?;
        self.selection = std::mem::replace(&mut self.tags, fresh);
        Ok(())
    }

    fn apply_bit_vectors(&mut self, selections: Vec<BitVector>) -> Result<()> {
        let mut selections = selections.into_iter();
        let (Some(selection), None) = (selections.next(), selections.next()) else {
            return Err(ReadshareError::validation(
                "in-memory reads take exactly one bit vector",
            ));
        };
        if selection.len() != self.tags.len() {
            return Err(ReadshareError::SizeMismatch {
                left: self.tags.len(),
                right: selection.len(),
            });
        }
        self.selection = selection;
        self.tags.set_all(false);
        Ok(())
    }

    fn export_tags(&self) -> Vec<BitVector> {
        vec![self.tags.clone()]
    }
}
