use orka_key::{Datum, FieldType, Row};
use orka_scan::{RowSource, VecRowSource};
use orka_sort::{
    DuplicateHandling, ExternalSorter, SortConfig, SortKeySpec, SortedRowCursor,
};

/// Two-field rows: a sortable key and an input-position tag that survives
/// the sort, so tests can see which physical row came through.
pub fn tagged_rows(keys: &[i64]) -> Vec<Row> {
    keys.iter()
        .enumerate()
        .map(|(i, k)| Row::new(vec![Datum::Int(*k), Datum::Int(i as i64)]))
        .collect()
}

pub fn tagged_types() -> Vec<FieldType> {
    vec![FieldType::Int, FieldType::Int]
}

/// Run a full sort over `rows` and return the opened output cursor.
pub fn sort_rows(
    rows: Vec<Row>,
    spec: SortKeySpec,
    types: Vec<FieldType>,
    duplicates: DuplicateHandling,
    config: SortConfig,
) -> SortedRowCursor {
    let sorter = ExternalSorter::new(spec, types, duplicates, config).unwrap();
    let mut input = VecRowSource::new(rows);
    let mut output = sorter.sort(&mut input).unwrap();
    output.open().unwrap();
    output
}

pub fn drain(cursor: &mut SortedRowCursor) -> Vec<Row> {
    let mut rows = Vec::new();
    while let Some(row) = cursor.next().unwrap() {
        rows.push(row);
    }
    rows
}

pub fn key_and_tag(rows: &[Row]) -> Vec<(i64, i64)> {
    rows.iter()
        .map(|r| match (r.value(0), r.value(1)) {
            (Datum::Int(k), Datum::Int(t)) => (*k, *t),
            other => panic!("unexpected row {other:?}"),
        })
        .collect()
}
