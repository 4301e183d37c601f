use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;
use std::time::SystemTime;

/// Default number of entries kept for undo/redo.
pub const DEFAULT_CAPACITY: usize = 100;

/// A document state that undo/redo can return to. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub content: Arc<str>,
    pub timestamp: SystemTime,
    /// Byte offset of the caret.
    pub cursor: usize,
    pub selection: Range<usize>,
}

impl HistoryEntry {
    pub fn new(content: Arc<str>, selection: Range<usize>) -> Self {
        Self {
            content,
            timestamp: SystemTime::now(),
            cursor: selection.end,
            selection,
        }
    }
}

/// Bounded undo/redo history.
///
/// `index` always points at the entry for the content currently shown.
/// Entries before it can be undone to, entries after it redone to. Pushing
/// drops the redo tail; once full, the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    capacity: usize,
}

impl History {
    /// A history holding only `initial`. `capacity` is at least one.
    pub fn new(initial: HistoryEntry, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            log::warn!(
                "history full ({} entries), oldest state discarded",
                self.capacity
            );
        }
        self.index = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
