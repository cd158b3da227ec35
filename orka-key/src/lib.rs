//! Typed column values and the byte encodings the access layer runs on.
//!
//! Two encodings live here, with different contracts:
//!
//! - The **key encoding** ([`SearchKey`]) is order-preserving: comparing two
//!   encoded keys byte-lexicographically is the same as comparing the field
//!   values under SQL ordering with nulls first. Keys can also carry the
//!   `BEFORE`/`AFTER` sentinel markers used to position a cursor just
//!   before/after all real keys, or to exclude a boundary-touching key.
//! - The **row payload encoding** ([`encode_row`]/[`decode_row`]) is compact
//!   and tagged, not order-preserving; it round-trips a row through spill
//!   files and store entries.
//!
//! Both encodings write through growable buffers that double on overflow up
//! to a hard ceiling and fail with a typed error at the ceiling.

pub mod datum;
pub mod key_codec;
pub mod row_codec;

pub use datum::{Datum, FieldType, Row};
pub use key_codec::{SearchKey, DEFAULT_KEY_LIMIT, MAX_KEY_LEN};
pub use row_codec::{decode_row, encode_row, ValueBuf, DEFAULT_VALUE_LIMIT, MAX_VALUE_LEN};
