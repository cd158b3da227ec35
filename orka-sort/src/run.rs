//! Sorted run files and their record format.
//!
//! A run is an immutable sequence of length-prefixed records spilled to a
//! temporary file: big-endian `u32` segment count, then per segment a `u32`
//! length and the raw bytes, then a `u32` payload length and the payload.
//! The format lives only for the engine instance's lifetime; it is not a
//! durable on-disk format.
//!
//! End-of-file is a clean failure to read the leading count. A short read
//! anywhere else inside a record is a consistency violation, surfaced as a
//! corrupt-record error rather than a silent short row.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use orka_result::{Error, Result};
use tempfile::NamedTempFile;

use crate::config::SortConfig;
use crate::record::SortRecord;

/// A spilled run. The backing temp file is named
/// `sort-<session-id>-<random>.tmp` and is removed when the run is dropped,
/// which covers both normal close and unwinding.
#[derive(Debug)]
pub(crate) struct Run {
    file: NamedTempFile,
}

impl Run {
    pub(crate) fn create(config: &SortConfig) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(&format!("sort-{}-", config.session()))
            .suffix(".tmp")
            .tempfile_in(config.temp_dir_path())
            .map_err(Error::sort_io)?;
        Ok(Self { file })
    }

    pub(crate) fn writer(&self) -> Result<RunWriter> {
        let handle = self.file.as_file().try_clone().map_err(Error::sort_io)?;
        Ok(RunWriter::new(handle))
    }

    /// A fresh reader positioned at the start of the run.
    pub(crate) fn reader(&self) -> Result<RunReader> {
        let handle = self.file.reopen().map_err(Error::sort_io)?;
        Ok(RunReader::new(handle))
    }
}

pub(crate) struct RunWriter {
    out: BufWriter<File>,
}

impl RunWriter {
    fn new(file: File) -> Self {
        Self {
            out: BufWriter::new(file),
        }
    }

    pub(crate) fn write_record(&mut self, record: &SortRecord) -> Result<()> {
        self.write_len(record.segments.len() as u32)?;
        for segment in &record.segments {
            self.write_len(segment.len() as u32)?;
            self.out.write_all(segment).map_err(Error::sort_io)?;
        }
        self.write_len(record.payload.len() as u32)?;
        self.out.write_all(&record.payload).map_err(Error::sort_io)
    }

    fn write_len(&mut self, len: u32) -> Result<()> {
        self.out
            .write_all(&len.to_be_bytes())
            .map_err(Error::sort_io)
    }

    pub(crate) fn finish(mut self) -> Result<()> {
        self.out.flush().map_err(Error::sort_io)
    }
}

#[derive(Debug)]
pub(crate) struct RunReader {
    input: BufReader<File>,
}

impl RunReader {
    fn new(file: File) -> Self {
        Self {
            input: BufReader::new(file),
        }
    }

    /// Read one record, or `None` at end-of-file.
    pub(crate) fn read_record(&mut self) -> Result<Option<SortRecord>> {
        let segment_count = match self.read_leading_len()? {
            Some(count) => count as usize,
            None => return Ok(None),
        };
        let mut segments = Vec::with_capacity(segment_count);
        for _ in 0..segment_count {
            let len = self.read_inner_len()?;
            segments.push(self.read_exact_vec(len)?);
        }
        let payload_len = self.read_inner_len()?;
        let payload = self.read_exact_vec(payload_len)?;
        Ok(Some(SortRecord { segments, payload }))
    }

    /// The leading length field: a clean EOF here ends the run.
    fn read_leading_len(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        match self.input.read_exact(&mut buf) {
            Ok(()) => Ok(Some(u32::from_be_bytes(buf))),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(Error::sort_io(e)),
        }
    }

    /// A length field inside a record: EOF here means the record was
    /// truncated.
    fn read_inner_len(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        match self.input.read_exact(&mut buf) {
            Ok(()) => Ok(u32::from_be_bytes(buf)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::Corrupt("run record truncated at length field"))
            }
            Err(e) => Err(Error::sort_io(e)),
        }
    }

    fn read_exact_vec(&mut self, len: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        match self.input.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::Corrupt("run record truncated mid-body"))
            }
            Err(e) => Err(Error::sort_io(e)),
        }
    }
}
