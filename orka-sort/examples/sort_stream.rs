//! Sort a shuffled stream of rows with a deliberately tiny memory pool so
//! the spill/merge path is exercised, then stream the output.
//!
//! Run with: cargo run --example sort_stream -p orka-sort

use orka_key::{Datum, FieldType, Row};
use orka_scan::{RowSource, VecRowSource};
use orka_sort::{DuplicateHandling, ExternalSorter, SortConfig, SortKeySpec};

fn main() -> orka_result::Result<()> {
    let rows: Vec<Row> = (0..100)
        .map(|i| {
            let key = (i * 37) % 100;
            Row::new(vec![
                Datum::Int(key),
                Datum::Text(format!("payload-{i}")),
            ])
        })
        .collect();

    let sorter = ExternalSorter::new(
        SortKeySpec::ascending([0])?,
        vec![FieldType::Int, FieldType::Text],
        DuplicateHandling::Preserve,
        SortConfig::new().memory_limit(512).session_id(1),
    )?;

    let mut input = VecRowSource::new(rows);
    let mut output = sorter.sort(&mut input)?;
    output.open()?;
    while let Some(row) = output.next()? {
        println!("{:?} {:?}", row.value(0), row.value(1));
    }
    output.destroy();
    Ok(())
}
