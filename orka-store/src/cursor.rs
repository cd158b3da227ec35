use orka_result::Result;

/// Traversal comparator for one cursor step.
///
/// Positioning is always inclusive-style: `Gteq`/`Lteq` may land on the
/// current key itself, `Gt`/`Lt` move strictly past it. Callers that need an
/// exclusive start against a store that only positions inclusively append an
/// `AFTER` sentinel to the search key instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekComparison {
    Gt,
    Gteq,
    Lt,
    Lteq,
}

/// One `(key, value)` entry read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// A positioned cursor over an ordered byte-key store.
///
/// The cursor holds a current-key buffer. `set_key` positions it without
/// touching the store; `traverse` moves to the nearest entry in the
/// comparator's direction relative to the current key, returns it, and leaves
/// the cursor positioned on it. An empty current key sorts before every real
/// key; a single `0xFF` byte sorts after every real key, so the two serve as
/// the whole-store `BEFORE`/`AFTER` positions.
pub trait StoreCursor {
    /// Reposition the cursor on `key` without reading the store.
    fn set_key(&mut self, key: &[u8]);

    /// The key the cursor is currently positioned on.
    fn current_key(&self) -> &[u8];

    /// Step to the nearest entry per `cmp`, or `None` when the store is
    /// exhausted in that direction.
    fn traverse(&mut self, cmp: SeekComparison) -> Result<Option<StoreEntry>>;
}

/// A store that can hand out traversal cursors.
pub trait OrderedStore {
    fn open_cursor(&self) -> Result<Box<dyn StoreCursor + '_>>;
}
