//! The external sort engine: load, spill, merge.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;

use orka_key::{encode_row, FieldType, Row, SearchKey, ValueBuf};
use orka_result::{Error, Result};
use orka_scan::RowSource;

use crate::config::SortConfig;
use crate::output::SortedRowCursor;
use crate::record::{RecordComparator, SortRecord};
use crate::run::{Run, RunReader};
use crate::spec::{DuplicateHandling, SortKeySpec};

/// Sorts an arbitrary input row stream into the order named by a
/// [`SortKeySpec`], spilling to temporary run files whenever the in-memory
/// pool exceeds the configured limit.
///
/// One instance serves one query operator; nothing here is shared across
/// threads and all I/O happens synchronously on the calling thread.
#[derive(Debug)]
pub struct ExternalSorter {
    spec: SortKeySpec,
    field_types: Vec<FieldType>,
    duplicates: DuplicateHandling,
    config: SortConfig,
    comparator: Rc<RecordComparator>,
}

impl ExternalSorter {
    pub fn new(
        spec: SortKeySpec,
        field_types: Vec<FieldType>,
        duplicates: DuplicateHandling,
        config: SortConfig,
    ) -> Result<Self> {
        if spec.max_field() >= field_types.len() {
            return Err(Error::InvalidArgument(format!(
                "sort field {} outside row of {} fields",
                spec.max_field(),
                field_types.len()
            )));
        }
        let comparator = Rc::new(RecordComparator::new(&spec, duplicates));
        Ok(Self {
            spec,
            field_types,
            duplicates,
            config,
            comparator,
        })
    }

    /// Drain `input` and produce the sorted output cursor.
    ///
    /// Opens the input if it is idle and closes it once drained. The
    /// cancellation probe is polled before every pull; once the load phase
    /// ends, the merge runs to completion.
    pub fn sort(&self, input: &mut dyn RowSource) -> Result<SortedRowCursor> {
        if input.is_idle() {
            input.open()?;
        }

        let mut pool: Vec<SortRecord> = Vec::new();
        let mut pool_bytes = 0usize;
        let mut runs: Vec<Run> = Vec::new();
        let mut sequence: u64 = 0;

        loop {
            if self.config.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let Some(row) = input.next()? else {
                break;
            };
            if row.len() != self.field_types.len() {
                return Err(Error::InvalidArgument(format!(
                    "input row has {} fields, expected {}",
                    row.len(),
                    self.field_types.len()
                )));
            }
            sequence += 1;
            let record = self.build_record(&row, sequence)?;
            pool_bytes += record.encoded_size();
            pool.push(record);
            if pool_bytes >= self.config.memory_limit_bytes() {
                runs.push(self.spill(&mut pool, pool_bytes)?);
                pool_bytes = 0;
            }
        }
        input.close()?;

        if runs.is_empty() {
            // Nothing ever spilled: sort the pool and stream it, no I/O.
            pool.sort_by(|a, b| self.comparator.order(a, b));
            tracing::debug!(rows = pool.len(), "sort served from memory");
            return Ok(SortedRowCursor::from_memory(
                pool,
                self.field_types.clone(),
                self.duplicates,
                Rc::clone(&self.comparator),
            ));
        }

        if !pool.is_empty() {
            runs.push(self.spill(&mut pool, pool_bytes)?);
        }

        // Merge passes: fold up to fan_in runs into one until a single
        // sorted run remains.
        while runs.len() > 1 {
            let take = runs.len().min(self.config.fan_in_runs());
            let batch: Vec<Run> = runs.drain(..take).collect();
            tracing::debug!(
                merged = take,
                remaining = runs.len(),
                "merging run batch"
            );
            runs.push(self.merge(batch)?);
        }
        let final_run = runs
            .pop()
            .ok_or_else(|| Error::Internal("merge produced no output run".into()))?;

        SortedRowCursor::from_run(
            final_run,
            self.field_types.clone(),
            self.duplicates,
            Rc::clone(&self.comparator),
        )
    }

    /// Encode one input row into its sort record.
    ///
    /// Each direction segment is encoded independently; in `Preserve` mode
    /// the last segment carries the row sequence number so the stored key
    /// stays unique and later duplicate collapsing cannot merge distinct
    /// rows.
    fn build_record(&self, row: &Row, sequence: u64) -> Result<SortRecord> {
        let fields = self.spec.fields();
        let segment_specs = self.spec.segments();
        let mut segments = Vec::with_capacity(segment_specs.len());
        let mut key = SearchKey::new();
        for (i, segment) in segment_specs.iter().enumerate() {
            key.clear();
            for position in segment.start..segment.end {
                key.append_datum(row.value(fields[position].field))?;
            }
            let is_last = i == segment_specs.len() - 1;
            if is_last && self.duplicates == DuplicateHandling::Preserve {
                key.append_sequence(sequence)?;
            }
            segments.push(key.as_bytes().to_vec());
        }

        let mut value = ValueBuf::new();
        encode_row(row, &mut value)?;
        Ok(SortRecord {
            segments,
            payload: value.take(),
        })
    }

    /// Sort the pool and write it out as a new run, emptying the pool.
    fn spill(&self, pool: &mut Vec<SortRecord>, pool_bytes: usize) -> Result<Run> {
        // Stable, so equal keys without a sequence suffix keep input order
        // within the run.
        pool.sort_by(|a, b| self.comparator.order(a, b));

        let run = Run::create(&self.config)?;
        let mut writer = run.writer()?;
        for record in pool.drain(..) {
            writer.write_record(&record)?;
        }
        writer.finish()?;
        tracing::debug!(bytes = pool_bytes, "spilled sorted run");
        Ok(run)
    }

    /// K-way merge of `batch` into one new run.
    fn merge(&self, batch: Vec<Run>) -> Result<Run> {
        let output = Run::create(&self.config)?;
        let mut writer = output.writer()?;

        let mut readers: Vec<RunReader> = Vec::with_capacity(batch.len());
        for run in &batch {
            readers.push(run.reader()?);
        }

        let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::with_capacity(readers.len());
        for (index, reader) in readers.iter_mut().enumerate() {
            if let Some(record) = reader.read_record()? {
                heap.push(Reverse(HeapEntry {
                    record,
                    run: index,
                    comparator: Rc::clone(&self.comparator),
                }));
            }
        }

        while let Some(Reverse(entry)) = heap.pop() {
            writer.write_record(&entry.record)?;
            if let Some(record) = readers[entry.run].read_record()? {
                heap.push(Reverse(HeapEntry {
                    record,
                    run: entry.run,
                    comparator: Rc::clone(&self.comparator),
                }));
            }
        }
        writer.finish()?;
        // Dropping `batch` here removes the merged-away temp files.
        Ok(output)
    }
}

/// Heap entry for the k-way merge. Ordered by the comparator's total order
/// (sequence ties included), with the run index settling whatever remains
/// so suppressed duplicates drain in run order.
struct HeapEntry {
    record: SortRecord,
    run: usize,
    comparator: Rc<RecordComparator>,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparator
            .order(&self.record, &other.record)
            .then(self.run.cmp(&other.run))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}
