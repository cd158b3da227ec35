use orka_key::Row;
use orka_result::{Error, Result};

/// Lifecycle state of a row cursor.
///
/// `Idle` means never opened or closed again; `Active` cursors may produce
/// rows; `Destroyed` is terminal with all resources released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Active,
    Destroyed,
}

/// Selects the leading fields of a row that participate in a reposition.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSelector {
    leading: usize,
}

impl ColumnSelector {
    /// Select the first `n` fields.
    pub fn leading(n: usize) -> Self {
        Self { leading: n }
    }

    #[inline]
    pub fn includes(&self, field: usize) -> bool {
        field < self.leading
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.leading
    }
}

/// Pull-based row cursor contract.
///
/// Implemented by this subsystem's cursors and by the collaborators it pulls
/// input from. Lifecycle methods are state-checked: misuse surfaces
/// [`Error::InvalidCursorState`] instead of returning stale data.
pub trait RowSource {
    /// Transition `Idle -> Active`. Fails when the cursor is not idle.
    fn open(&mut self) -> Result<()>;

    /// Produce the next row, or `None` at end-of-stream. Valid only while
    /// active.
    fn next(&mut self) -> Result<Option<Row>>;

    /// Transition `Active -> Idle`. Idempotent: closing an idle cursor is a
    /// no-op. Fails on a destroyed cursor.
    fn close(&mut self) -> Result<()>;

    /// Terminal transition; releases all resources.
    fn destroy(&mut self);

    /// Optional repositioning to the position of `row`, restricted to the
    /// fields named by `selector`. Sort-backed cursors reject this with
    /// [`Error::Unsupported`].
    fn jump(&mut self, row: &Row, selector: &ColumnSelector) -> Result<()>;

    fn state(&self) -> CursorState;

    #[inline]
    fn is_idle(&self) -> bool {
        self.state() == CursorState::Idle
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.state() == CursorState::Active
    }

    #[inline]
    fn is_destroyed(&self) -> bool {
        self.state() == CursorState::Destroyed
    }
}

/// Guard for operations valid only on an idle cursor.
pub fn check_idle(state: CursorState) -> Result<()> {
    match state {
        CursorState::Idle => Ok(()),
        CursorState::Active => Err(Error::InvalidCursorState("expected idle cursor, got active")),
        CursorState::Destroyed => Err(Error::InvalidCursorState(
            "expected idle cursor, got destroyed",
        )),
    }
}

/// Guard for operations valid only on an active cursor.
pub fn check_active(state: CursorState) -> Result<()> {
    match state {
        CursorState::Active => Ok(()),
        CursorState::Idle => Err(Error::InvalidCursorState("expected active cursor, got idle")),
        CursorState::Destroyed => Err(Error::InvalidCursorState(
            "expected active cursor, got destroyed",
        )),
    }
}
