//! Compact row payload encoding.
//!
//! Unlike the key encoding this format is not order-preserving; it only needs
//! to round-trip a row through store entries and spill files. Each field is a
//! presence/type tag followed by a fixed or length-prefixed body. Decoding is
//! driven by the per-field type descriptors supplied at engine construction,
//! and any truncated body is a consistency failure, never a silent short row.

use crate::datum::{Datum, FieldType, Row};
use orka_result::{Error, Result};

const VTAG_NULL: u8 = 0x00;
const VTAG_BOOL: u8 = 0x01;
const VTAG_INT: u8 = 0x02;
const VTAG_FLOAT: u8 = 0x03;
const VTAG_TEXT: u8 = 0x04;
const VTAG_BYTES: u8 = 0x05;

/// Initial soft limit of a [`ValueBuf`].
pub const DEFAULT_VALUE_LIMIT: usize = 1024;
/// Hard ceiling on an encoded row payload, independent of the key ceiling.
pub const MAX_VALUE_LEN: usize = 8 * 1024 * 1024;

/// Growable payload buffer with the same double-on-overflow policy as
/// [`crate::SearchKey`], under its own ceiling.
#[derive(Debug)]
pub struct ValueBuf {
    buf: Vec<u8>,
    limit: usize,
    max: usize,
}

impl Default for ValueBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueBuf {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_VALUE_LIMIT, MAX_VALUE_LEN)
    }

    pub fn with_limits(limit: usize, max: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit: limit.min(max),
            max,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    fn append_bounded(&mut self, write: impl Fn(&mut Vec<u8>)) -> Result<()> {
        let mark = self.buf.len();
        loop {
            write(&mut self.buf);
            if self.buf.len() <= self.limit {
                return Ok(());
            }
            self.buf.truncate(mark);
            if self.limit >= self.max {
                return Err(Error::ValueTooLarge { max: self.max });
            }
            self.limit = (self.limit * 2).min(self.max);
        }
    }
}

/// Encode `row` onto `out`, growing it as needed.
pub fn encode_row(row: &Row, out: &mut ValueBuf) -> Result<()> {
    for datum in row.values() {
        out.append_bounded(|buf| encode_datum(datum, buf))?;
    }
    Ok(())
}

fn encode_datum(datum: &Datum, out: &mut Vec<u8>) {
    match datum {
        Datum::Null => out.push(VTAG_NULL),
        Datum::Bool(v) => {
            out.push(VTAG_BOOL);
            out.push(u8::from(*v));
        }
        Datum::Int(v) => {
            out.push(VTAG_INT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Datum::Float(v) => {
            out.push(VTAG_FLOAT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Datum::Text(s) => {
            out.push(VTAG_TEXT);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Datum::Bytes(b) => {
            out.push(VTAG_BYTES);
            out.extend_from_slice(&(b.len() as u32).to_le_bytes());
            out.extend_from_slice(b);
        }
    }
}

/// Decode a row of `types.len()` fields from `bytes`.
///
/// The payload must contain exactly the declared fields; trailing bytes or a
/// truncated body decode as [`Error::Corrupt`].
pub fn decode_row(bytes: &[u8], types: &[FieldType]) -> Result<Row> {
    let mut pos = 0usize;
    let mut values = Vec::with_capacity(types.len());
    for ty in types {
        let (datum, used) = decode_datum(&bytes[pos..], *ty)?;
        pos += used;
        values.push(datum);
    }
    if pos != bytes.len() {
        return Err(Error::Corrupt("trailing bytes after last row field"));
    }
    Ok(Row::new(values))
}

fn decode_datum(bytes: &[u8], ty: FieldType) -> Result<(Datum, usize)> {
    let tag = *bytes.first().ok_or(Error::Corrupt("missing field tag"))?;
    if tag == VTAG_NULL {
        return Ok((Datum::Null, 1));
    }
    match (ty, tag) {
        (FieldType::Bool, VTAG_BOOL) => {
            let b = take(bytes, 1, 1)?;
            Ok((Datum::Bool(b[0] != 0), 2))
        }
        (FieldType::Int, VTAG_INT) => {
            let b = take(bytes, 1, 8)?;
            Ok((Datum::Int(i64::from_le_bytes(b.try_into().unwrap())), 9))
        }
        (FieldType::Float, VTAG_FLOAT) => {
            let b = take(bytes, 1, 8)?;
            Ok((Datum::Float(f64::from_le_bytes(b.try_into().unwrap())), 9))
        }
        (FieldType::Text, VTAG_TEXT) => {
            let (body, used) = take_prefixed(bytes)?;
            let s = std::str::from_utf8(body)
                .map_err(|_| Error::Corrupt("invalid utf8 in text field"))?;
            Ok((Datum::Text(s.to_string()), used))
        }
        (FieldType::Bytes, VTAG_BYTES) => {
            let (body, used) = take_prefixed(bytes)?;
            Ok((Datum::Bytes(body.to_vec()), used))
        }
        _ => Err(Error::Corrupt("field tag does not match declared type")),
    }
}

#[inline]
fn take(bytes: &[u8], at: usize, len: usize) -> Result<&[u8]> {
    bytes
        .get(at..at + len)
        .ok_or(Error::Corrupt("truncated field body"))
}

fn take_prefixed(bytes: &[u8]) -> Result<(&[u8], usize)> {
    let len_bytes = take(bytes, 1, 4)?;
    let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
    let body = take(bytes, 5, len)?;
    Ok((body, 5 + len))
}
