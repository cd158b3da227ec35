use std::io;
use thiserror::Error;

/// Unified error type for all orka operations.
///
/// This enum covers every failure mode of the ordered-row access layer, from
/// caller mistakes (inconsistent range bounds, lifecycle misuse) to fatal
/// conditions (encoding overflow, truncated spill records). Variants are chosen
/// so that callers can distinguish the classes the layer promises to keep
/// distinct: caller errors, I/O failures, internal consistency violations and
/// cooperative cancellation.
///
/// Errors propagate upward with the `?` operator. Nothing in this layer retries;
/// resources (cursors, temporary files) are released before an error surfaces.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying store or filesystem.
    ///
    /// Wraps the standard library error so the original cause is preserved.
    /// Fatal to the current cursor or sort.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// I/O failure while spilling, merging or reading sorted runs.
    ///
    /// Kept distinct from [`Error::Io`] so callers can tell a failure of the
    /// sort's own scratch storage apart from a failure of the base store. The
    /// operation is not retried internally; the caller may retry the whole
    /// query.
    #[error("merge-sort I/O error: {0}")]
    SortIo(#[source] io::Error),

    /// Invalid API parameter: empty sort spec, sort field outside the row
    /// shape, and similar caller mistakes caught before any work starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller-supplied range bound violates a cross-field invariant.
    ///
    /// For every bound field except the last, lo and hi must either both be
    /// null or compare equal; for the last field, non-null lo and hi must
    /// satisfy lo <= hi. Surfaced immediately from `open`, producing no rows.
    #[error("inconsistent key range: {0}")]
    RangeInconsistency(String),

    /// A key encoding exceeded the hard maximum size even after doubling.
    #[error("encoded key exceeds maximum size of {max} bytes")]
    KeyTooLarge { max: usize },

    /// A row payload encoding exceeded its hard maximum size even after
    /// doubling.
    #[error("encoded row exceeds maximum size of {max} bytes")]
    ValueTooLarge { max: usize },

    /// A spilled record or encoded payload could not be fully read.
    ///
    /// Short reads inside a record are internal consistency failures, never
    /// silently ignored and never recoverable.
    #[error("corrupt record: {0}")]
    Corrupt(&'static str),

    /// The query was cancelled cooperatively during the sort load phase.
    #[error("query cancelled")]
    Cancelled,

    /// The cursor does not support the requested operation.
    ///
    /// `jump` on a sort-backed cursor always fails this way rather than
    /// silently misbehaving.
    #[error("unsupported cursor operation: {0}")]
    Unsupported(&'static str),

    /// A cursor lifecycle method was called in the wrong state.
    ///
    /// `open` is only valid on an idle cursor and `next` on an active one;
    /// anything else is a caller bug surfaced explicitly instead of returning
    /// stale data.
    #[error("invalid cursor state: {0}")]
    InvalidCursorState(&'static str),

    /// Internal error indicating a bug or unexpected state.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap an I/O error produced by the sort's scratch storage.
    #[inline]
    pub fn sort_io(err: io::Error) -> Self {
        Error::SortIo(err)
    }

    /// Build a range-inconsistency error for a named bound field.
    #[inline]
    pub fn range_inconsistency(msg: impl Into<String>) -> Self {
        Error::RangeInconsistency(msg.into())
    }
}
