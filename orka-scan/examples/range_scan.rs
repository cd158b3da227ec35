//! Build a small in-memory index and walk a bounded range both ways.
//!
//! Run with: cargo run --example range_scan -p orka-scan

use orka_key::{encode_row, Datum, FieldType, Row, SearchKey, ValueBuf};
use orka_scan::{KeyRange, RangeBound, RangeCursor, RowSource, ScanDirection};
use orka_store::MemStore;

fn main() -> orka_result::Result<()> {
    let mut store = MemStore::new();
    for (position, value) in (10..30).step_by(2).enumerate() {
        let row = Row::new(vec![Datum::Int(value), Datum::Text(format!("r{value}"))]);
        let mut key = SearchKey::new();
        key.append_datum(row.value(0))?;
        key.append_sequence(position as u64)?;
        let mut payload = ValueBuf::new();
        encode_row(&row, &mut payload)?;
        store.insert(key.as_bytes().to_vec(), payload.take());
    }

    let range = KeyRange::new(
        RangeBound::literals(vec![Datum::Int(14)], true),
        RangeBound::literals(vec![Datum::Int(22)], false),
    )?;

    for direction in [ScanDirection::Forward, ScanDirection::Reverse] {
        let mut cursor = RangeCursor::new(
            &store,
            vec![FieldType::Int, FieldType::Text],
            Some(range.clone()),
            direction,
        )?;
        cursor.open()?;
        print!("{direction:?}:");
        while let Some(row) = cursor.next()? {
            print!(" {:?}", row.value(0));
        }
        println!();
    }
    Ok(())
}
