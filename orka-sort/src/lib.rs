//! External merge sort over arbitrary row streams.
//!
//! Rows are pulled from the input source into a bounded memory pool. When the
//! pool fills, its contents are sorted and spilled to a temporary run file;
//! when the input is exhausted the runs are k-way merged (16 at a time by
//! default, repeating passes as needed) into a single sorted file that backs
//! the output cursor. Inputs that never overflow the pool are served straight
//! from memory with no I/O.
//!
//! Sort keys are order-preserving byte encodings, one segment per maximal run
//! of same-direction sort fields, so each segment compares with a plain byte
//! comparator picked once at construction. Duplicate rows can be suppressed
//! on output or preserved with input-order ties.
//!
//! Cancellation is polled once per input row during the load phase only;
//! merge and output run to completion. This favors simplicity over cancel
//! latency and is intentional behavior, not an oversight.

pub mod config;
pub mod output;
pub mod record;
mod run;
pub mod sorter;
pub mod spec;

pub use config::{CancelCallback, SortConfig, DEFAULT_FAN_IN, DEFAULT_MEMORY_LIMIT};
pub use output::SortedRowCursor;
pub use record::{RecordComparator, SortRecord};
pub use sorter::ExternalSorter;
pub use spec::{DirectionSegment, DuplicateHandling, SortField, SortKeySpec, SortOrder};
