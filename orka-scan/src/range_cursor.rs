//! The ordered range cursor.
//!
//! One concrete cursor type serves both directions: the direction picks the
//! start sentinel, the initial/subsequent traversal comparators and the sign
//! of the past-end comparison. Bounds are evaluated at open time, validated,
//! and encoded into start/end search keys; the last bound field goes through
//! the null/inclusivity boundary matrix below.

use orka_key::{decode_row, Datum, FieldType, Row, SearchKey};
use orka_result::{Error, Result};
use orka_store::{OrderedStore, SeekComparison, StoreCursor};

use crate::range::{KeyRange, ScanDirection};
use crate::row_source::{check_active, check_idle, ColumnSelector, CursorState, RowSource};

/// Cursor over an ordered store index, bounded by an optional [`KeyRange`].
///
/// Index entries hold the encoded key (leading indexed fields, typically with
/// a row-id suffix) and the encoded row payload as the value. The cursor owns
/// its store cursor and its start/end key buffers from construction to
/// destruction.
pub struct RangeCursor<'a> {
    cursor: Option<Box<dyn StoreCursor + 'a>>,
    field_types: Vec<FieldType>,
    direction: ScanDirection,
    range: Option<KeyRange>,
    state: CursorState,

    start_key: SearchKey,
    end_key: SearchKey,
    end_inclusive: bool,
    comparison: SeekComparison,
    subsequent_comparison: SeekComparison,
}

impl<'a> RangeCursor<'a> {
    /// Build a cursor against `store`. `range: None` scans the whole index.
    pub fn new(
        store: &'a dyn OrderedStore,
        field_types: Vec<FieldType>,
        range: Option<KeyRange>,
        direction: ScanDirection,
    ) -> Result<Self> {
        let cursor = store.open_cursor()?;
        let subsequent = match direction {
            ScanDirection::Forward => SeekComparison::Gt,
            ScanDirection::Reverse => SeekComparison::Lt,
        };
        Ok(Self {
            cursor: Some(cursor),
            field_types,
            direction,
            range,
            state: CursorState::Idle,
            start_key: SearchKey::new(),
            end_key: SearchKey::new(),
            end_inclusive: false,
            comparison: subsequent,
            subsequent_comparison: subsequent,
        })
    }

    /// Open with placeholder bindings. [`RowSource::open`] delegates here
    /// with an empty binding list for all-literal ranges.
    pub fn open_at(&mut self, bindings: &[Datum]) -> Result<()> {
        check_idle(self.state)?;
        let cursor = self
            .cursor
            .as_mut()
            .ok_or(Error::InvalidCursorState("cursor destroyed"))?;

        self.start_key.clear();
        self.end_key.clear();

        match &self.range {
            None => {
                // Unbounded: park at the direction-appropriate sentinel.
                match self.direction {
                    ScanDirection::Forward => {
                        self.start_key.append_before()?;
                        self.comparison = SeekComparison::Gt;
                    }
                    ScanDirection::Reverse => {
                        self.start_key.append_after()?;
                        self.comparison = SeekComparison::Lt;
                    }
                }
            }
            Some(range) => {
                let lo = range.lo().eval(bindings)?;
                let hi = range.hi().eval(bindings)?;
                validate_bounds(&lo, &hi)?;

                let (start, end, start_inclusive, end_inclusive) = match self.direction {
                    ScanDirection::Forward => (&lo, &hi, range.lo().inclusive(), range.hi().inclusive()),
                    ScanDirection::Reverse => (&hi, &lo, range.hi().inclusive(), range.lo().inclusive()),
                };
                self.end_inclusive = end_inclusive;
                build_boundary_keys(
                    start,
                    end,
                    start_inclusive,
                    end_inclusive,
                    self.direction,
                    &mut self.start_key,
                    &mut self.end_key,
                )?;

                self.comparison = match (self.direction, start_inclusive) {
                    (ScanDirection::Forward, true) => SeekComparison::Gteq,
                    (ScanDirection::Forward, false) => SeekComparison::Gt,
                    (ScanDirection::Reverse, true) => SeekComparison::Lteq,
                    (ScanDirection::Reverse, false) => SeekComparison::Lt,
                };

                // The store positions inclusively, so an exclusive forward
                // start (or an inclusive reverse start, which must admit
                // extensions of the boundary key) is expressed by appending
                // AFTER to the start key.
                let append_after = match self.direction {
                    ScanDirection::Forward => !start_inclusive,
                    ScanDirection::Reverse => start_inclusive,
                };
                if append_after {
                    self.start_key.append_after()?;
                }
            }
        }

        cursor.set_key(self.start_key.as_bytes());
        tracing::trace!(
            direction = ?self.direction,
            start_len = self.start_key.len(),
            end_len = self.end_key.len(),
            "range cursor opened"
        );
        self.state = CursorState::Active;
        Ok(())
    }

    fn close_internal(&mut self) {
        if self.state == CursorState::Active {
            self.state = CursorState::Idle;
        }
    }

    /// True when `key` has passed the end bound in the travel direction.
    fn past_end(&self, key: &[u8]) -> bool {
        if self.end_key.is_empty() {
            return false;
        }
        let end = self.end_key.as_bytes();
        let n = end.len().min(key.len());
        let c = match key[..n].cmp(&end[..n]) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        } * self.direction.sign();
        c > 0 || (c == 0 && !self.end_inclusive)
    }
}

impl RowSource for RangeCursor<'_> {
    fn open(&mut self) -> Result<()> {
        self.open_at(&[])
    }

    fn next(&mut self) -> Result<Option<Row>> {
        check_active(self.state)?;
        let cursor = self
            .cursor
            .as_mut()
            .ok_or(Error::InvalidCursorState("cursor destroyed"))?;

        let entry = match cursor.traverse(self.comparison) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.close_internal();
                return Ok(None);
            }
            Err(e) => {
                self.close_internal();
                return Err(e);
            }
        };

        if self.range.is_some() && self.past_end(&entry.key) {
            self.close_internal();
            return Ok(None);
        }

        let row = match decode_row(&entry.value, &self.field_types) {
            Ok(row) => row,
            Err(e) => {
                self.close_internal();
                return Err(e);
            }
        };

        // Later steps must never re-match the start boundary.
        self.comparison = self.subsequent_comparison;
        Ok(Some(row))
    }

    fn close(&mut self) -> Result<()> {
        if self.state == CursorState::Destroyed {
            return Err(Error::InvalidCursorState("close on destroyed cursor"));
        }
        self.close_internal();
        Ok(())
    }

    fn destroy(&mut self) {
        self.state = CursorState::Destroyed;
        self.cursor = None;
    }

    fn jump(&mut self, row: &Row, selector: &ColumnSelector) -> Result<()> {
        check_active(self.state)?;
        let cursor = self
            .cursor
            .as_mut()
            .ok_or(Error::InvalidCursorState("cursor destroyed"))?;

        let mut key = SearchKey::new();
        for field in 0..selector.width().min(row.len()) {
            key.append_datum(row.value(field))?;
        }
        cursor.set_key(key.as_bytes());
        // Reposition inclusively; the next step may land on the target row.
        self.comparison = match self.direction {
            ScanDirection::Forward => SeekComparison::Gteq,
            ScanDirection::Reverse => SeekComparison::Lteq,
        };
        Ok(())
    }

    fn state(&self) -> CursorState {
        self.state
    }
}

/// Cross-field bound validation.
///
/// For every bound field except the last, lo and hi must both be null or
/// compare equal; for the last field with both sides non-null, lo <= hi. A
/// null on exactly one side of a non-final field is a caller error, not an
/// empty range.
fn validate_bounds(lo: &[&Datum], hi: &[&Datum]) -> Result<()> {
    let last = lo.len() - 1;
    for f in 0..last {
        match (lo[f].is_null(), hi[f].is_null()) {
            (true, true) => {}
            (true, false) | (false, true) => {
                return Err(Error::range_inconsistency(format!(
                    "field {f}: lo {:?}, hi {:?}",
                    lo[f], hi[f]
                )));
            }
            (false, false) => {
                let eq = lo[f]
                    .sql_cmp(hi[f])
                    .ok_or_else(|| {
                        Error::range_inconsistency(format!(
                            "field {f}: mismatched bound types {:?} vs {:?}",
                            lo[f], hi[f]
                        ))
                    })?
                    .is_eq();
                if !eq {
                    return Err(Error::range_inconsistency(format!(
                        "field {f}: lo {:?} != hi {:?}",
                        lo[f], hi[f]
                    )));
                }
            }
        }
    }
    if !lo[last].is_null() && !hi[last].is_null() {
        let le = lo[last]
            .sql_cmp(hi[last])
            .ok_or_else(|| {
                Error::range_inconsistency(format!(
                    "field {last}: mismatched bound types {:?} vs {:?}",
                    lo[last], hi[last]
                ))
            })?
            .is_le();
        if !le {
            return Err(Error::range_inconsistency(format!(
                "field {last}: lo {:?} > hi {:?}",
                lo[last], hi[last]
            )));
        }
    }
    Ok(())
}

/// Encode the start and end search keys.
///
/// Fields before the last are written verbatim on both keys, nulls included
/// (a null is a real key byte that ranks below every value). The last field
/// follows the boundary matrix; with `s`/`e` the start/end values and
/// brackets the inclusivity:
///
/// ```text
///  >  null      <   null      (null, AFTER)
///  >  null      <   non-null  (null, e)
///  >  null      <=  null      unreachable
///  >  null      <=  non-null  (null, e]
///  >  non-null  <   null      (s, AFTER)
///  >  non-null  <   non-null  (s, e)
///  >  non-null  <=  null      unreachable
///  >  non-null  <=  non-null  (s, e]
///  >= null      <   null      [null, AFTER)
///  >= null      <   non-null  [null, e)
///  >= null      <=  null      [null, null]
///  >= null      <=  non-null  [null, e]
///  >= non-null  <   null      [s, AFTER)
///  >= non-null  <   non-null  [s, e)
///  >= non-null  <=  null      [s, null]   (empty: past end immediately)
///  >= non-null  <=  non-null  [s, e]
/// ```
///
/// An exclusive flag against a null end value is meaningless (inclusivity
/// cannot apply to a null test) and asserts.
fn build_boundary_keys(
    start: &[&Datum],
    end: &[&Datum],
    start_inclusive: bool,
    end_inclusive: bool,
    direction: ScanDirection,
    start_key: &mut SearchKey,
    end_key: &mut SearchKey,
) -> Result<()> {
    let last = start.len() - 1;
    for f in 0..last {
        start_key.append_datum(start[f])?;
        end_key.append_datum(end[f])?;
    }

    // The trailing side of the travel direction gets the sentinel treatment:
    // end for forward scans, start for reverse scans (the reverse start is
    // the hi bound).
    match direction {
        ScanDirection::Forward => {
            start_key.append_datum(start[last])?;
            if end[last].is_null() {
                if end_inclusive {
                    assert!(
                        start_inclusive,
                        "exclusive start combined with an inclusive null end bound"
                    );
                    end_key.append_datum(end[last])?;
                } else {
                    end_key.append_after()?;
                }
            } else {
                end_key.append_datum(end[last])?;
            }
        }
        ScanDirection::Reverse => {
            end_key.append_datum(end[last])?;
            if start[last].is_null() {
                if start_inclusive {
                    assert!(
                        end_inclusive,
                        "exclusive end combined with an inclusive null start bound"
                    );
                    start_key.append_datum(start[last])?;
                } else {
                    start_key.append_after()?;
                }
            } else {
                start_key.append_datum(start[last])?;
            }
        }
    }
    Ok(())
}
