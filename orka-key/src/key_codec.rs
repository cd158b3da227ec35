//! Order-preserving key encoding.
//!
//! Each encoded field is one tag byte followed by a type-specific body. Tag
//! values are assigned so that byte-lexicographic comparison of two encoded
//! keys reproduces field-wise SQL ordering with nulls first, and so that the
//! sentinel markers bracket every real encoding:
//!
//! `BEFORE (0x00)  <  NULL (0x01)  <  value tags  <  AFTER (0xFF)`
//!
//! Appending `AFTER` to a key makes it sort after that key and after every
//! extension of it by real fields; appending `BEFORE` sorts after the bare key
//! but before any extension. That is exactly what range cursors need to
//! include or exclude boundary-touching entries without changing how values
//! compare.

use crate::datum::Datum;
use orka_result::{Error, Result};

/// Sentinel ordering immediately before all extensions of a key.
pub const TAG_BEFORE: u8 = 0x00;
/// SQL null; ranks below every non-null value of any type.
pub const TAG_NULL: u8 = 0x01;
pub const TAG_BOOL: u8 = 0x05;
pub const TAG_INT: u8 = 0x10;
pub const TAG_FLOAT: u8 = 0x18;
pub const TAG_TEXT: u8 = 0x20;
pub const TAG_BYTES: u8 = 0x28;
/// Sentinel ordering immediately after all extensions of a key.
pub const TAG_AFTER: u8 = 0xFF;

/// Initial soft limit of a [`SearchKey`] buffer.
pub const DEFAULT_KEY_LIMIT: usize = 256;
/// Hard ceiling on an encoded key. Exceeding this is fatal, never truncated.
pub const MAX_KEY_LEN: usize = 4096;

/// Signal that an encode did not fit the current soft limit. Internal to the
/// grow-and-retry loop; never escapes this module.
struct Overflow;

/// A growable buffer holding the order-preserving encoding of a key.
///
/// Writes go through an explicit `try encode -> on overflow, double the soft
/// limit up to the hard ceiling -> retry` loop. The ceiling check bounds the
/// loop; hitting the ceiling surfaces [`Error::KeyTooLarge`] rather than
/// silently truncating.
#[derive(Debug, Clone)]
pub struct SearchKey {
    buf: Vec<u8>,
    limit: usize,
    max: usize,
}

impl Default for SearchKey {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchKey {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_KEY_LIMIT, MAX_KEY_LEN)
    }

    /// A key buffer with a custom starting limit and ceiling. Tests use tiny
    /// limits to drive the growth path.
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

    /// Append one value in its order-preserving encoding.
    pub fn append_datum(&mut self, datum: &Datum) -> Result<()> {
        let mark = self.buf.len();
        loop {
            match encode_datum_bounded(datum, &mut self.buf, self.limit) {
                Ok(()) => return Ok(()),
                Err(Overflow) => {
                    self.buf.truncate(mark);
                    self.grow()?;
                }
            }
        }
    }

    /// Append the `BEFORE` sentinel: positions after this key but before any
    /// extension of it.
    pub fn append_before(&mut self) -> Result<()> {
        self.append_raw(&[TAG_BEFORE])
    }

    /// Append the `AFTER` sentinel: positions after this key and after every
    /// extension of it.
    pub fn append_after(&mut self) -> Result<()> {
        self.append_raw(&[TAG_AFTER])
    }

    /// Append a fixed-width row sequence number.
    ///
    /// The sorter appends this to the last key segment so each row's key stays
    /// unique; the width is fixed at 8 bytes so comparators can strip it.
    pub fn append_sequence(&mut self, seq: u64) -> Result<()> {
        self.append_raw(&seq.to_be_bytes())
    }

    fn append_raw(&mut self, bytes: &[u8]) -> Result<()> {
        loop {
            if self.buf.len() + bytes.len() <= self.limit {
                self.buf.extend_from_slice(bytes);
                return Ok(());
            }
            self.grow()?;
        }
    }

    fn grow(&mut self) -> Result<()> {
        if self.limit >= self.max {
            return Err(Error::KeyTooLarge { max: self.max });
        }
        self.limit = (self.limit * 2).min(self.max);
        Ok(())
    }
}

/// Encode `datum` onto `out`, failing without a partial write if the result
/// would exceed `limit` bytes.
fn encode_datum_bounded(
    datum: &Datum,
    out: &mut Vec<u8>,
    limit: usize,
) -> std::result::Result<(), Overflow> {
    let mark = out.len();
    match datum {
        Datum::Null => out.push(TAG_NULL),
        Datum::Bool(v) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*v));
        }
        Datum::Int(v) => {
            out.push(TAG_INT);
            // Flipping the sign bit makes the big-endian bytes order i64s.
            out.extend_from_slice(&((*v as u64) ^ (1 << 63)).to_be_bytes());
        }
        Datum::Float(v) => {
            out.push(TAG_FLOAT);
            out.extend_from_slice(&order_f64_bits(*v).to_be_bytes());
        }
        Datum::Text(s) => {
            out.push(TAG_TEXT);
            encode_escaped(s.as_bytes(), out);
        }
        Datum::Bytes(b) => {
            out.push(TAG_BYTES);
            encode_escaped(b, out);
        }
    }
    if out.len() <= limit {
        Ok(())
    } else {
        out.truncate(mark);
        Err(Overflow)
    }
}

/// IEEE-754 total-order transform: negative floats have all bits inverted,
/// non-negative floats have the sign bit flipped. The resulting u64s order
/// `-inf < ... < -0.0 < +0.0 < ... < +inf < NaN`.
#[inline]
fn order_f64_bits(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits ^ (1 << 63)
    }
}

/// Variable-length body with `0x00` escaped as `0x00 0xFF` and a `0x00`
/// terminator. The terminator never collides with an interior byte, and a
/// shorter string orders before its extensions because every field tag is
/// greater than `0x00`.
fn encode_escaped(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        if b == 0 {
            out.push(0x00);
            out.push(0xFF);
        } else {
            out.push(b);
        }
    }
    out.push(0x00);
}
