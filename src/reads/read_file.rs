//! Sequential cursor over one FASTA/FASTQ file with a read selection.

use std::io::Write;
use std::path::{Path, PathBuf};

use needletail::{parse_fastx_file, FastxReader};

use super::format::ReadFormat;
use crate::bitvec::BitVector;
use crate::error::{ReadshareError, Result};

fn open_reader(path: &Path) -> Result<Box<dyn FastxReader>> {
    parse_fastx_file(path).map_err(|e| ReadshareError::format(path, e.to_string()))
}

/// Number of records in a read file.
pub fn count_records(path: &Path) -> Result<u64> {
    let mut reader = open_reader(path)?;
    let mut count = 0u64;
    while let Some(record) = reader.next() {
        record.map_err(|e| ReadshareError::format(path, e.to_string()))?;
        count += 1;
    }
    Ok(count)
}

/// File name without its directory, as used in labels and output names.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// A read file opened for sequential access.
///
/// The selection marks which reads take part in comparisons; unselected reads
/// are skipped by [`ReadFile::next_selected`]. Read positions are 0-based
/// record indices in file order, selected or not.
pub struct ReadFile {
    path: PathBuf,
    format: ReadFormat,
    reader: Option<Box<dyn FastxReader>>,
    read_count: u64,
    selection: BitVector,
    selected_count: u64,
    next_index: u64,
    position: Option<u64>,
    exhausted: bool,
    id: Vec<u8>,
    sequence: Vec<u8>,
    quality: Option<Vec<u8>>,
}

impl std::fmt::Debug for ReadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadFile")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("read_count", &self.read_count)
            .field("selected_count", &self.selected_count)
            .field("position", &self.position)
            .finish()
    }
}

impl ReadFile {
    /// Open a read file with every read selected.
    ///
    /// Fails with [`ReadshareError::UnknownFormat`] if the file is neither
    /// FASTA nor FASTQ.
    pub fn open(path: &Path) -> Result<Self> {
        let format = ReadFormat::sniff(path)?;
        if !format.is_known() {
            return Err(ReadshareError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
        let read_count = count_records(path)?;
        let mut selection = BitVector::with_len(read_count, true)?;
        selection.set_comment(path.display().to_string());

        log::debug!(
            "Opened {} ({}, {} reads)",
            path.display(),
            format,
            read_count
        );

        Ok(Self {
            path: path.to_path_buf(),
            format,
            reader: None,
            read_count,
            selected_count: read_count,
            selection,
            next_index: 0,
            position: None,
            exhausted: false,
            id: Vec::new(),
            sequence: Vec::new(),
            quality: None,
        })
    }

    /// Open a read file restricted to the reads set in a bit-vector file.
    pub fn open_with_selection(path: &Path, selection_path: &Path) -> Result<Self> {
        let mut file = Self::open(path)?;
        let selection = BitVector::read(selection_path)?;
        if selection.len() != file.read_count {
            return Err(ReadshareError::format(
                selection_path,
                format!(
                    "bit vector has {} bits but {} contains {} reads",
                    selection.len(),
                    path.display(),
                    file.read_count
                ),
            ));
        }
        file.selected_count = selection.count_ones();
        file.selection = selection;
        Ok(file)
    }

    /// Advance to the next record, selected or not.
    ///
    /// Returns `false` once the file is exhausted.
    pub fn next_record(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if self.reader.is_none() {
            self.reader = Some(open_reader(&self.path)?);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        let found = match reader.next() {
            None => false,
            Some(Err(e)) => return Err(ReadshareError::format(&self.path, e.to_string())),
            Some(Ok(record)) => {
                if self.next_index >= self.read_count {
                    return Err(ReadshareError::format(
                        &self.path,
                        format!(
                            "file changed since it was opened: more than {} reads",
                            self.read_count
                        ),
                    ));
                }
                self.id.clear();
                self.id.extend_from_slice(record.id());
                self.sequence.clear();
                self.sequence.extend_from_slice(&record.seq());
                self.quality = record.qual().map(|q| q.to_vec());
                true
            }
        };

        if found {
            self.position = Some(self.next_index);
            self.next_index += 1;
        } else {
            self.exhausted = true;
            self.position = None;
            self.reader = None;
        }
        Ok(found)
    }

    /// Advance to the next selected record.
    pub fn next_selected(&mut self) -> Result<bool> {
        while self.next_record()? {
            if let Some(pos) = self.position {
                if self.selection.is_set(pos) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Restart from the first record. The selection is kept.
    pub fn rewind(&mut self) {
        self.reader = None;
        self.next_index = 0;
        self.position = None;
        self.exhausted = false;
    }

    /// Index of the current record, `None` before the first or after the last.
    pub fn position(&self) -> Option<u64> {
        self.position
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn quality(&self) -> Option<&[u8]> {
        self.quality.as_deref()
    }

    /// Write the current record as FASTQ if the file is FASTQ, FASTA otherwise.
    pub fn write_current<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        match (self.format.is_fastq(), self.quality.as_deref()) {
            (true, Some(qual)) => {
                writer.write_all(b"@")?;
                writer.write_all(&self.id)?;
                writer.write_all(b"\n")?;
                writer.write_all(&self.sequence)?;
                writer.write_all(b"\n+\n")?;
                writer.write_all(qual)?;
                writer.write_all(b"\n")
            }
            _ => {
                writer.write_all(b">")?;
                writer.write_all(&self.id)?;
                writer.write_all(b"\n")?;
                writer.write_all(&self.sequence)?;
                writer.write_all(b"\n")
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ReadFormat {
        self.format
    }

    /// Total number of records in the file.
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// Number of selected records.
    pub fn selected_count(&self) -> u64 {
        self.selected_count
    }

    pub fn selection(&self) -> &BitVector {
        &self.selection
    }

    /// Replace the selection. Its length must equal the record count.
    pub fn set_selection(&mut self, selection: BitVector) -> Result<()> {
        if selection.len() != self.read_count {
            return Err(ReadshareError::SizeMismatch {
                left: self.read_count,
                right: selection.len(),
            });
        }
        self.selected_count = selection.count_ones();
        self.selection = selection;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_iterate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fa");
        std::fs::write(&path, b">r0\nACGT\n>r1 desc\nAC\nGT\n>r2\nTTTT\n").unwrap();

        let mut file = ReadFile::open(&path).unwrap();
        assert_eq!(file.read_count(), 3);
        assert_eq!(file.selected_count(), 3);
        assert_eq!(file.position(), None);

        assert!(file.next_record().unwrap());
        assert_eq!(file.position(), Some(0));
        assert_eq!(file.sequence(), b"ACGT");

        // Multi-line FASTA records are joined.
        assert!(file.next_record().unwrap());
        assert_eq!(file.id(), b"r1 desc");
        assert_eq!(file.sequence(), b"ACGT");

        assert!(file.next_record().unwrap());
        assert!(!file.next_record().unwrap());
        assert_eq!(file.position(), None);
        assert!(!file.next_record().unwrap());
    }

    #[test]
    fn test_selection_skips_reads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fq");
        std::fs::write(
            &path,
            b"@a\nAAAA\n+\nIIII\n@b\nCCCC\n+\nIIII\n@c\nGGGG\n+\nIIII\n",
        )
        .unwrap();

        let mut file = ReadFile::open(&path).unwrap();
        let mut sel = BitVector::with_len(3, false).unwrap();
        sel.set(1);
        file.set_selection(sel).unwrap();
        assert_eq!(file.selected_count(), 1);

        assert!(file.next_selected().unwrap());
        assert_eq!(file.position(), Some(1));
        assert_eq!(file.sequence(), b"CCCC");
        assert!(!file.next_selected().unwrap());

        file.rewind();
        assert!(file.next_selected().unwrap());
        assert_eq!(file.id(), b"b");
    }

    #[test]
    fn test_selection_length_checked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fa");
        std::fs::write(&path, b">r0\nACGT\n>r1\nACGT\n").unwrap();

        let mut file = ReadFile::open(&path).unwrap();
        let wrong = BitVector::with_len(5, true).unwrap();
        assert!(matches!(
            file.set_selection(wrong),
            Err(ReadshareError::SizeMismatch { left: 2, right: 5 })
        ));

        let bv_path = dir.path().join("wrong.bv");
        BitVector::with_len(3, true).unwrap().write(&bv_path).unwrap();
        assert!(matches!(
            ReadFile::open_with_selection(&path, &bv_path),
            Err(ReadshareError::Format { .. })
        ));
    }

    #[test]
    fn test_open_with_selection_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fa");
        std::fs::write(&path, b">r0\nACGT\n>r1\nCCCC\n").unwrap();
        let bv_path = dir.path().join("sel.bv");
        let mut bv = BitVector::with_len(2, false).unwrap();
        bv.set(0);
        bv.write(&bv_path).unwrap();

        let mut file = ReadFile::open_with_selection(&path, &bv_path).unwrap();
        assert_eq!(file.selected_count(), 1);
        assert!(file.next_selected().unwrap());
        assert_eq!(file.sequence(), b"ACGT");
        assert!(!file.next_selected().unwrap());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text\n").unwrap();
        assert!(matches!(
            ReadFile::open(&path),
            Err(ReadshareError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_write_current() {
        let dir = tempdir().unwrap();
        let fq = dir.path().join("reads.fq");
        std::fs::write(&fq, b"@a x\nACGT\n+\nIIII\n").unwrap();
        let mut file = ReadFile::open(&fq).unwrap();
        file.next_record().unwrap();
        let mut out = Vec::new();
        file.write_current(&mut out).unwrap();
        assert_eq!(out, b"@a x\nACGT\n+\nIIII\n".to_vec());

        let fa = dir.path().join("reads.fa");
        std::fs::write(&fa, b">a\nAC\nGT\n").unwrap();
        let mut file = ReadFile::open(&fa).unwrap();
        file.next_record().unwrap();
        let mut out = Vec::new();
        file.write_current(&mut out).unwrap();
        assert_eq!(out, b">a\nACGT\n".to_vec());
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename(Path::new("/data/run1/reads.fq.gz")), "reads.fq.gz");
        assert_eq!(basename(Path::new("reads.fa")), "reads.fa");
    }
}
