//! Extraction of selected reads into a new read file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{ReadshareError, Result};
use crate::reads::{ReadFile, ReadFormat};

/// Where extracted reads are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractTarget {
    Stdout,
    Plain(PathBuf),
    Gzip(PathBuf),
}

impl ExtractTarget {
    /// Gzipped input produces gzipped output, which needs a file path.
    pub fn for_input(format: ReadFormat, output: Option<&Path>) -> Result<Self> {
        match (format.is_gzipped(), output) {
            (true, Some(path)) => Ok(ExtractTarget::Gzip(path.to_path_buf())),
            (true, None) => Err(ReadshareError::validation(
                "gzipped input is extracted compressed, an output file is required",
            )),
            (false, Some(path)) => Ok(ExtractTarget::Plain(path.to_path_buf())),
            (false, None) => Ok(ExtractTarget::Stdout),
        }
    }
}

/// Write every selected read of `file` to `writer`, returning the count.
pub fn write_selected<W: Write + ?Sized>(file: &mut ReadFile, writer: &mut W) -> Result<u64> {
    let mut written = 0u64;
    file.rewind();
    while file.next_selected()? {
        file.write_current(writer)?;
        written += 1;
    }
    file.rewind();
    Ok(written)
}

/// Write every selected read of `file` to `target`, returning the count.
pub fn extract_reads(file: &mut ReadFile, target: &ExtractTarget) -> Result<u64> {
    match target {
        ExtractTarget::Stdout => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let n = write_selected(file, &mut writer)?;
            writer.flush()?;
            Ok(n)
        }
        ExtractTarget::Plain(path) => {
            let out = File::create(path).map_err(|e| ReadshareError::io(path, "create", e))?;
            let mut writer = BufWriter::new(out);
            let n = write_selected(file, &mut writer).map_err(|e| with_path(e, path))?;
            writer
                .flush()
                .map_err(|e| ReadshareError::io(path, "write", e))?;
            Ok(n)
        }
        ExtractTarget::Gzip(path) => {
            let out = File::create(path).map_err(|e| ReadshareError::io(path, "create", e))?;
            let mut writer = BufWriter::new(GzEncoder::new(out, Compression::new(6)));
            let n = write_selected(file, &mut writer).map_err(|e| with_path(e, path))?;
            let encoder = writer
                .into_inner()
                .map_err(|e| ReadshareError::io(path, "write", e.into_error()))?;
            encoder
                .finish()
                .map_err(|e| ReadshareError::io(path, "compress", e))?;
            Ok(n)
        }
    }
}

/// Attach the output path to write errors that were raised without one.
fn with_path(err: ReadshareError, path: &Path) -> ReadshareError {
    match err {
        ReadshareError::Io {
            path: p, source, ..
        } if p.as_os_str().is_empty() => ReadshareError::io(path, "write", source),
        other => other,
    }
}
