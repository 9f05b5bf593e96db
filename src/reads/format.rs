//! Read file format detection.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{ReadshareError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Container and record format of a read file, decided from its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFormat {
    Fasta,
    Fastq,
    GzFasta,
    GzFastq,
    Unknown,
}

impl ReadFormat {
    /// Classify a record format from the first byte of its (decompressed) text.
    fn from_first_byte(byte: u8, gzipped: bool) -> Self {
        match (byte, gzipped) {
            (b'>', false) => ReadFormat::Fasta,
            (b'@', false) => ReadFormat::Fastq,
            (b'>', true) => ReadFormat::GzFasta,
            (b'@', true) => ReadFormat::GzFastq,
            _ => ReadFormat::Unknown,
        }
    }

    /// Peek at the start of `path` and classify it.
    ///
    /// Gzip input is recognised by its magic number and classified from the
    /// first decompressed byte. Empty files are [`ReadFormat::Unknown`].
    pub fn sniff(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ReadshareError::io(path, "open", e))?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 2];
        let n = read_up_to(&mut reader, &mut magic).map_err(|e| ReadshareError::io(path, "read", e))?;
        if n == 0 {
            return Ok(ReadFormat::Unknown);
        }
        if n == 2 && magic == GZIP_MAGIC {
            let file = File::open(path).map_err(|e| ReadshareError::io(path, "open", e))?;
            let mut decoder = MultiGzDecoder::new(BufReader::new(file));
            let mut first = [0u8; 1];
            let n = read_up_to(&mut decoder, &mut first)
                .map_err(|e| ReadshareError::io(path, "decompress", e))?;
            if n == 0 {
                return Ok(ReadFormat::Unknown);
            }
            return Ok(Self::from_first_byte(first[0], true));
        }
        Ok(Self::from_first_byte(magic[0], false))
    }

    pub fn is_gzipped(self) -> bool {
        matches!(self, ReadFormat::GzFasta | ReadFormat::GzFastq)
    }

    pub fn is_fastq(self) -> bool {
        matches!(self, ReadFormat::Fastq | ReadFormat::GzFastq)
    }

    pub fn is_known(self) -> bool {
        self != ReadFormat::Unknown
    }
}

impl std::fmt::Display for ReadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReadFormat::Fasta => "FASTA",
            ReadFormat::Fastq => "FASTQ",
            ReadFormat::GzFasta => "gzipped FASTA",
            ReadFormat::GzFastq => "gzipped FASTQ",
            ReadFormat::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Fill as much of `buf` as the reader allows, stopping early only at EOF.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
