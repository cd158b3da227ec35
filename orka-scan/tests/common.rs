use orka_key::{encode_row, Datum, Row, SearchKey, ValueBuf};
use orka_scan::{RangeCursor, RowSource};
use orka_store::MemStore;

/// Index `rows` on their leading `key_fields` fields, suffixing the row
/// position so entries with equal indexed values keep distinct keys.
pub fn index_rows(rows: &[Row], key_fields: usize) -> MemStore {
    let mut store = MemStore::new();
    for (position, row) in rows.iter().enumerate() {
        let mut key = SearchKey::new();
        for field in 0..key_fields {
            key.append_datum(row.value(field)).unwrap();
        }
        key.append_sequence(position as u64).unwrap();
        let mut value = ValueBuf::new();
        encode_row(row, &mut value).unwrap();
        store.insert(key.as_bytes().to_vec(), value.take());
    }
    store
}

/// Drain an opened cursor.
pub fn drain(cursor: &mut RangeCursor<'_>) -> Vec<Row> {
    let mut rows = Vec::new();
    while let Some(row) = cursor.next().unwrap() {
        rows.push(row);
    }
    rows
}

/// The first field of each row, for compact assertions.
pub fn firsts(rows: &[Row]) -> Vec<Datum> {
    rows.iter().map(|r| r.value(0).clone()).collect()
}
