use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use orka_result::Result;

use crate::cursor::{OrderedStore, SeekComparison, StoreCursor, StoreEntry};

/// In-memory ordered store over a `BTreeMap`.
///
/// Exists for tests and demos; the production store sits behind the same
/// [`OrderedStore`] contract.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OrderedStore for MemStore {
    fn open_cursor(&self) -> Result<Box<dyn StoreCursor + '_>> {
        Ok(Box::new(MemCursor {
            entries: &self.entries,
            key: Vec::new(),
        }))
    }
}

struct MemCursor<'a> {
    entries: &'a BTreeMap<Vec<u8>, Vec<u8>>,
    key: Vec<u8>,
}

impl StoreCursor for MemCursor<'_> {
    fn set_key(&mut self, key: &[u8]) {
        self.key.clear();
        self.key.extend_from_slice(key);
    }

    fn current_key(&self) -> &[u8] {
        &self.key
    }

    fn traverse(&mut self, cmp: SeekComparison) -> Result<Option<StoreEntry>> {
        let key: &[u8] = &self.key;
        let found = match cmp {
            SeekComparison::Gt => self
                .entries
                .range::<[u8], _>((Excluded(key), Unbounded))
                .next(),
            SeekComparison::Gteq => self
                .entries
                .range::<[u8], _>((Included(key), Unbounded))
                .next(),
            SeekComparison::Lt => self
                .entries
                .range::<[u8], _>((Unbounded, Excluded(key)))
                .next_back(),
            SeekComparison::Lteq => self
                .entries
                .range::<[u8], _>((Unbounded, Included(key)))
                .next_back(),
        };
        let found = found.map(|(k, v)| (k.clone(), v.clone()));
        match found {
            Some((k, v)) => {
                self.key.clear();
                self.key.extend_from_slice(&k);
                Ok(Some(StoreEntry { key: k, value: v }))
            }
            None => Ok(None),
        }
    }
}
