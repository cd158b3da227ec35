mod common;

use common::{drain, firsts, index_rows};
use orka_key::{Datum, FieldType, Row};
use orka_result::Error;
use orka_scan::{
    BoundExpr, CursorState, KeyRange, RangeBound, RangeCursor, RowSource, ScanDirection,
};

fn int_rows(values: &[i64]) -> Vec<Row> {
    values
        .iter()
        .map(|v| Row::new(vec![Datum::Int(*v), Datum::Text(format!("row-{v}"))]))
        .collect()
}

fn int_range(lo: i64, lo_inclusive: bool, hi: i64, hi_inclusive: bool) -> KeyRange {
    KeyRange::new(
        RangeBound::literals(vec![Datum::Int(lo)], lo_inclusive),
        RangeBound::literals(vec![Datum::Int(hi)], hi_inclusive),
    )
    .unwrap()
}

fn scan_ints(
    values: &[i64],
    range: Option<KeyRange>,
    direction: ScanDirection,
) -> Vec<Datum> {
    let rows = int_rows(values);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        range,
        direction,
    )
    .unwrap();
    cursor.open().unwrap();
    let out = firsts(&drain(&mut cursor));
    assert!(cursor.is_idle());
    out
}

fn ints(values: &[i64]) -> Vec<Datum> {
    values.iter().map(|v| Datum::Int(*v)).collect()
}

const DATASET: &[i64] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

#[test]
fn forward_inclusivity_combinations() {
    let cases = [
        (true, true, vec![3, 4, 5, 6, 7]),
        (true, false, vec![3, 4, 5, 6]),
        (false, true, vec![4, 5, 6, 7]),
        (false, false, vec![4, 5, 6]),
    ];
    for (lo_inc, hi_inc, expected) in cases {
        let got = scan_ints(
            DATASET,
            Some(int_range(3, lo_inc, 7, hi_inc)),
            ScanDirection::Forward,
        );
        assert_eq!(got, ints(&expected), "lo_inc={lo_inc} hi_inc={hi_inc}");
    }
}

#[test]
fn reverse_inclusivity_combinations() {
    let cases = [
        (true, true, vec![7, 6, 5, 4, 3]),
        (true, false, vec![6, 5, 4, 3]),
        (false, true, vec![7, 6, 5, 4]),
        (false, false, vec![6, 5, 4]),
    ];
    for (lo_inc, hi_inc, expected) in cases {
        let got = scan_ints(
            DATASET,
            Some(int_range(3, lo_inc, 7, hi_inc)),
            ScanDirection::Reverse,
        );
        assert_eq!(got, ints(&expected), "lo_inc={lo_inc} hi_inc={hi_inc}");
    }
}

#[test]
fn unbounded_scans_cover_everything() {
    assert_eq!(
        scan_ints(DATASET, None, ScanDirection::Forward),
        ints(DATASET)
    );
    let mut reversed: Vec<i64> = DATASET.to_vec();
    reversed.reverse();
    assert_eq!(
        scan_ints(DATASET, None, ScanDirection::Reverse),
        ints(&reversed)
    );
}

#[test]
fn unsorted_input_comes_back_in_key_order() {
    let shuffled = [6i64, 1, 9, 4, 2, 10, 3, 8, 5, 7];
    assert_eq!(
        scan_ints(&shuffled, None, ScanDirection::Forward),
        ints(DATASET)
    );
}

// ------------------------------------------------------------------
// Null-boundary matrix on the last bound field
// ------------------------------------------------------------------

/// Dataset for the matrix: two null rows (distinct underlying entries) and
/// three values. Payload field 1 distinguishes the null rows.
fn matrix_rows() -> Vec<Row> {
    [
        (Datum::Null, 100),
        (Datum::Null, 200),
        (Datum::Int(1), 300),
        (Datum::Int(2), 400),
        (Datum::Int(3), 500),
    ]
    .into_iter()
    .map(|(key, tag)| Row::new(vec![key, Datum::Int(tag)]))
    .collect()
}

fn matrix_scan(
    lo: Datum,
    lo_inclusive: bool,
    hi: Datum,
    hi_inclusive: bool,
    direction: ScanDirection,
) -> Vec<Datum> {
    let rows = matrix_rows();
    let store = index_rows(&rows, 1);
    let range = KeyRange::new(
        RangeBound::literals(vec![lo], lo_inclusive),
        RangeBound::literals(vec![hi], hi_inclusive),
    )
    .unwrap();
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Int],
        Some(range),
        direction,
    )
    .unwrap();
    cursor.open().unwrap();
    drain(&mut cursor).iter().map(|r| r.value(0).clone()).collect()
}

#[test]
fn null_boundary_matrix_forward() {
    use Datum::{Int, Null};
    let n = || Null;
    // (lo, lo_inclusive, hi, hi_inclusive, expected first fields)
    let cases: Vec<(Datum, bool, Datum, bool, Vec<Datum>)> = vec![
        // exclusive lo
        (n(), false, n(), false, ints(&[1, 2, 3])),
        (n(), false, Int(2), false, ints(&[1])),
        (n(), false, Int(2), true, ints(&[1, 2])),
        (Int(1), false, n(), false, ints(&[2, 3])),
        (Int(1), false, Int(2), false, vec![]),
        (Int(1), false, Int(2), true, ints(&[2])),
        // inclusive lo
        (n(), true, n(), false, vec![n(), n(), Int(1), Int(2), Int(3)]),
        (n(), true, Int(2), false, vec![n(), n(), Int(1)]),
        (n(), true, n(), true, vec![n(), n()]),
        (n(), true, Int(2), true, vec![n(), n(), Int(1), Int(2)]),
        (Int(1), true, n(), false, ints(&[1, 2, 3])),
        (Int(1), true, Int(2), false, ints(&[1])),
        // [value, null] restricts above a value and below null: empty.
        (Int(1), true, n(), true, vec![]),
        (Int(1), true, Int(2), true, ints(&[1, 2])),
    ];
    for (lo, lo_inc, hi, hi_inc, expected) in cases {
        let label = format!("lo={lo:?}/{lo_inc} hi={hi:?}/{hi_inc}");
        let got = matrix_scan(lo, lo_inc, hi, hi_inc, ScanDirection::Forward);
        assert_eq!(got, expected, "{label}");
    }
}

#[test]
fn null_boundary_matrix_reverse() {
    use Datum::{Int, Null};
    let n = || Null;
    let cases: Vec<(Datum, bool, Datum, bool, Vec<Datum>)> = vec![
        (n(), false, n(), false, ints(&[3, 2, 1])),
        (n(), true, n(), true, vec![n(), n()]),
        (n(), true, Int(2), true, vec![Int(2), Int(1), n(), n()]),
        (Int(1), false, n(), false, ints(&[3, 2])),
        (Int(1), true, Int(3), false, ints(&[2, 1])),
    ];
    for (lo, lo_inc, hi, hi_inc, expected) in cases {
        let label = format!("lo={lo:?}/{lo_inc} hi={hi:?}/{hi_inc}");
        let got = matrix_scan(lo, lo_inc, hi, hi_inc, ScanDirection::Reverse);
        assert_eq!(got, expected, "{label}");
    }
}

#[test]
#[should_panic(expected = "exclusive start combined with an inclusive null end bound")]
fn exclusive_null_lo_with_inclusive_null_hi_asserts() {
    matrix_scan(Datum::Null, false, Datum::Null, true, ScanDirection::Forward);
}

#[test]
#[should_panic(expected = "exclusive start combined with an inclusive null end bound")]
fn exclusive_value_lo_with_inclusive_null_hi_asserts() {
    matrix_scan(Datum::Int(1), false, Datum::Null, true, ScanDirection::Forward);
}

// ------------------------------------------------------------------
// Cross-field invariants
// ------------------------------------------------------------------

fn two_field_rows() -> Vec<Row> {
    let mut rows = Vec::new();
    for a in 1..=3i64 {
        for b in 1..=4i64 {
            rows.push(Row::new(vec![Datum::Int(a), Datum::Int(b)]));
        }
    }
    rows
}

fn open_two_field(lo: Vec<Datum>, hi: Vec<Datum>) -> Result<Vec<Row>, Error> {
    let rows = two_field_rows();
    let store = index_rows(&rows, 2);
    let range = KeyRange::new(
        RangeBound::literals(lo, true),
        RangeBound::literals(hi, true),
    )?;
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Int],
        Some(range),
        ScanDirection::Forward,
    )?;
    cursor.open()?;
    Ok(drain(&mut cursor))
}

#[test]
fn equal_prefix_scans_inner_range() {
    let rows = open_two_field(
        vec![Datum::Int(2), Datum::Int(2)],
        vec![Datum::Int(2), Datum::Int(3)],
    )
    .unwrap();
    let got: Vec<(i64, i64)> = rows
        .iter()
        .map(|r| match (r.value(0), r.value(1)) {
            (Datum::Int(a), Datum::Int(b)) => (*a, *b),
            other => panic!("unexpected row {other:?}"),
        })
        .collect();
    assert_eq!(got, vec![(2, 2), (2, 3)]);
}

#[test]
fn unequal_prefix_fields_are_inconsistent() {
    let err = open_two_field(
        vec![Datum::Int(1), Datum::Int(2)],
        vec![Datum::Int(2), Datum::Int(3)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::RangeInconsistency(_)));
}

#[test]
fn null_against_value_prefix_is_inconsistent_not_empty() {
    let err = open_two_field(
        vec![Datum::Null, Datum::Int(2)],
        vec![Datum::Int(2), Datum::Int(3)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::RangeInconsistency(_)));
}

#[test]
fn lo_above_hi_on_last_field_is_inconsistent() {
    let err = open_two_field(
        vec![Datum::Int(2), Datum::Int(4)],
        vec![Datum::Int(2), Datum::Int(1)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::RangeInconsistency(_)));
}

// ------------------------------------------------------------------
// Lifecycle and repositioning
// ------------------------------------------------------------------

#[test]
fn close_is_idempotent_and_next_after_close_fails() {
    let rows = int_rows(DATASET);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        None,
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.open().unwrap();
    assert!(cursor.next().unwrap().is_some());

    cursor.close().unwrap();
    cursor.close().unwrap();
    assert!(cursor.is_idle());

    let err = cursor.next().unwrap_err();
    assert!(matches!(err, Error::InvalidCursorState(_)));
}

#[test]
fn open_twice_fails() {
    let rows = int_rows(DATASET);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        None,
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.open().unwrap();
    assert!(matches!(
        cursor.open().unwrap_err(),
        Error::InvalidCursorState(_)
    ));
}

#[test]
fn destroyed_cursor_rejects_everything() {
    let rows = int_rows(DATASET);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        None,
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.destroy();
    assert_eq!(cursor.state(), CursorState::Destroyed);
    assert!(cursor.open().is_err());
    assert!(cursor.close().is_err());
}

#[test]
fn reopen_after_close_rescans() {
    let rows = int_rows(&[1, 2, 3]);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        None,
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.open().unwrap();
    assert_eq!(drain(&mut cursor).len(), 3);
    cursor.open().unwrap();
    assert_eq!(drain(&mut cursor).len(), 3);
}

#[test]
fn jump_repositions_within_scan() {
    let rows = int_rows(DATASET);
    let store = index_rows(&rows, 1);
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        None,
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.open().unwrap();
    assert_eq!(
        cursor.next().unwrap().unwrap().value(0),
        &Datum::Int(1)
    );

    let target = Row::new(vec![Datum::Int(8), Datum::Null]);
    cursor
        .jump(&target, &orka_scan::ColumnSelector::leading(1))
        .unwrap();
    assert_eq!(firsts(&drain(&mut cursor)), ints(&[8, 9, 10]));
}

#[test]
fn placeholder_bounds_resolve_at_open() {
    let rows = int_rows(DATASET);
    let store = index_rows(&rows, 1);
    let range = KeyRange::new(
        RangeBound::new(vec![BoundExpr::Placeholder(0)], true),
        RangeBound::new(vec![BoundExpr::Placeholder(1)], true),
    )
    .unwrap();
    let mut cursor = RangeCursor::new(
        &store,
        vec![FieldType::Int, FieldType::Text],
        Some(range),
        ScanDirection::Forward,
    )
    .unwrap();
    cursor.open_at(&[Datum::Int(4), Datum::Int(6)]).unwrap();
    assert_eq!(firsts(&drain(&mut cursor)), ints(&[4, 5, 6]));
}
