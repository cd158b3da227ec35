//! The cursor over a finished sort.

use std::rc::Rc;

use orka_key::{decode_row, FieldType, Row};
use orka_result::{Error, Result};
use orka_scan::{check_active, check_idle, ColumnSelector, CursorState, RowSource};

use crate::record::{RecordComparator, SortRecord};
use crate::run::{Run, RunReader};
use crate::spec::DuplicateHandling;

#[derive(Debug)]
enum Backend {
    /// The pool never spilled; records are streamed from memory.
    Memory {
        records: std::vec::IntoIter<SortRecord>,
    },
    /// Records are read back from the single merged run file.
    File {
        run: Option<Run>,
        reader: Option<RunReader>,
    },
}

/// Pull cursor over the final sorted output.
///
/// `open` reads the first record; `next` returns the current record's
/// decoded row and advances, collapsing runs of equal records when duplicate
/// suppression was requested. `close` releases the file handle and is
/// idempotent; `destroy` also removes the backing temp file. `jump` is
/// always unsupported on a sort-backed cursor.
#[derive(Debug)]
pub struct SortedRowCursor {
    backend: Backend,
    field_types: Vec<FieldType>,
    duplicates: DuplicateHandling,
    comparator: Rc<RecordComparator>,
    state: CursorState,
    current: Option<SortRecord>,
}

impl SortedRowCursor {
    pub(crate) fn from_memory(
        records: Vec<SortRecord>,
        field_types: Vec<FieldType>,
        duplicates: DuplicateHandling,
        comparator: Rc<RecordComparator>,
    ) -> Self {
        Self {
            backend: Backend::Memory {
                records: records.into_iter(),
            },
            field_types,
            duplicates,
            comparator,
            state: CursorState::Idle,
            current: None,
        }
    }

    pub(crate) fn from_run(
        run: Run,
        field_types: Vec<FieldType>,
        duplicates: DuplicateHandling,
        comparator: Rc<RecordComparator>,
    ) -> Result<Self> {
        let reader = run.reader()?;
        Ok(Self {
            backend: Backend::File {
                run: Some(run),
                reader: Some(reader),
            },
            field_types,
            duplicates,
            comparator,
            state: CursorState::Idle,
            current: None,
        })
    }

    fn read_record(&mut self) -> Result<Option<SortRecord>> {
        match &mut self.backend {
            Backend::Memory { records } => Ok(records.next()),
            Backend::File { reader, .. } => match reader {
                Some(reader) => reader.read_record(),
                // The handle was released by `close`; nothing more to read.
                None => Ok(None),
            },
        }
    }

    /// Read past every record equal to `current` under the composite
    /// comparator, returning the first differing one.
    fn skip_duplicates(&mut self, current: &SortRecord) -> Result<Option<SortRecord>> {
        loop {
            match self.read_record()? {
                Some(next) => {
                    if self.comparator.compare(current, &next).is_ne() {
                        return Ok(Some(next));
                    }
                }
                None => return Ok(None),
            }
        }
    }
}

impl RowSource for SortedRowCursor {
    fn open(&mut self) -> Result<()> {
        check_idle(self.state)?;
        self.current = self.read_record()?;
        self.state = CursorState::Active;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        check_active(self.state)?;
        let Some(record) = self.current.take() else {
            return Ok(None);
        };
        let row = decode_row(&record.payload, &self.field_types)?;
        self.current = match self.duplicates {
            DuplicateHandling::Suppress => self.skip_duplicates(&record)?,
            DuplicateHandling::Preserve => self.read_record()?,
        };
        Ok(Some(row))
    }

    fn close(&mut self) -> Result<()> {
        if self.state == CursorState::Destroyed {
            return Err(Error::InvalidCursorState("close on destroyed cursor"));
        }
        if self.state == CursorState::Active {
            if let Backend::File { reader, .. } = &mut self.backend {
                *reader = None;
            }
            self.current = None;
            self.state = CursorState::Idle;
        }
        Ok(())
    }

    fn destroy(&mut self) {
        match &mut self.backend {
            Backend::File { run, reader } => {
                *reader = None;
                // Dropping the run removes the temp file.
                *run = None;
            }
            Backend::Memory { records } => {
                *records = Vec::new().into_iter();
            }
        }
        self.current = None;
        self.state = CursorState::Destroyed;
    }

    fn jump(&mut self, _row: &Row, _selector: &ColumnSelector) -> Result<()> {
        Err(Error::Unsupported("jump on a sort-backed cursor"))
    }

    fn state(&self) -> CursorState {
        self.state
    }
}
