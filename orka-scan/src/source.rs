use orka_key::Row;
use orka_result::Result;

use crate::row_source::{check_active, check_idle, ColumnSelector, CursorState, RowSource};

/// A [`RowSource`] over an in-memory list of rows.
///
/// Input adapter used by tests, demos and anywhere the engine already holds
/// materialized rows.
pub struct VecRowSource {
    rows: Vec<Row>,
    pos: usize,
    state: CursorState,
}

impl VecRowSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            pos: 0,
            state: CursorState::Idle,
        }
    }
}

impl RowSource for VecRowSource {
    fn open(&mut self) -> Result<()> {
        check_idle(self.state)?;
        self.pos = 0;
        self.state = CursorState::Active;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        check_active(self.state)?;
        if self.pos < self.rows.len() {
            let row = self.rows[self.pos].clone();
            self.pos += 1;
            Ok(Some(row))
        } else {
            self.state = CursorState::Idle;
            Ok(None)
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.state == CursorState::Destroyed {
            return Err(orka_result::Error::InvalidCursorState(
                "close on destroyed cursor",
            ));
        }
        self.state = CursorState::Idle;
        Ok(())
    }

    fn destroy(&mut self) {
        self.state = CursorState::Destroyed;
        self.rows.clear();
    }

    fn jump(&mut self, _row: &Row, _selector: &ColumnSelector) -> Result<()> {
        Err(orka_result::Error::Unsupported(
            "jump on a materialized row source",
        ))
    }

    fn state(&self) -> CursorState {
        self.state
    }
}
