//! Ordered range scans and the row-cursor contract they are served through.
//!
//! [`RangeCursor`] walks an ordered store index within a [`KeyRange`], in
//! either direction, reproducing SQL's null and boundary semantics at the
//! range edges: nulls rank below every value, bounds may be inclusive or
//! exclusive, and boundary-touching entries are included or excluded by
//! appending sentinel markers to the search keys rather than by changing how
//! keys compare.
//!
//! Everything that produces rows implements [`RowSource`], the pull-based
//! cursor contract shared with the rest of the engine.

pub mod range;
pub mod range_cursor;
pub mod row_source;
pub mod source;

pub use range::{BoundExpr, KeyRange, RangeBound, ScanDirection};
pub use range_cursor::RangeCursor;
pub use row_source::{check_active, check_idle, ColumnSelector, CursorState, RowSource};
pub use source::VecRowSource;
