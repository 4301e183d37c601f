use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use super::history::{History, HistoryEntry};
use super::stats::{CursorPosition, DocumentStats};
use crate::bus::{Bus, SubscriptionId};

/// What caused a content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Edit,
    Undo,
    Redo,
}

/// Notification sent to subscribers whenever the content changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub old: Arc<str>,
    pub new: Arc<str>,
    pub origin: ChangeOrigin,
    /// Store version after the change.
    pub version: u64,
    pub at: Instant,
}

/// The single owner of the document text.
///
/// Every mutation goes through here: edits record a history entry, undo and
/// redo move through it, and each change is published on the store's bus.
/// Everything else observes.
pub struct ContentStore {
    content: Arc<str>,
    selection: Range<usize>,
    history: History,
    stats: DocumentStats,
    saved: Arc<str>,
    version: u64,
    bus: Bus<ContentChange>,
}

impl ContentStore {
    /// A store holding `initial`, which also counts as saved and is the
    /// oldest undo target.
    pub fn new(initial: impl Into<Arc<str>>, history_capacity: usize) -> Self {
        let content: Arc<str> = initial.into();
        let end = content.len();
        Self {
            history: History::new(HistoryEntry::new(Arc::clone(&content), end..end), history_capacity),
            stats: DocumentStats::of(&content),
            saved: Arc::clone(&content),
            selection: end..end,
            content,
            version: 0,
            bus: Bus::new(),
        }
    }

    pub fn content(&self) -> Arc<str> {
        Arc::clone(&self.content)
    }

    /// Replaces the document. Returns `false`, recording nothing, when `text`
    /// equals the current content.
    pub fn set_content(&mut self, text: impl Into<Arc<str>>) -> bool {
        let selection = self.selection.clone();
        self.set_content_with_selection(text, selection)
    }

    /// Like [`set_content`](Self::set_content), also recording where the
    /// caret ended up after the edit.
    pub fn set_content_with_selection(
        &mut self,
        text: impl Into<Arc<str>>,
        selection: Range<usize>,
    ) -> bool {
        let text: Arc<str> = text.into();
        if text == self.content {
            self.set_selection(selection);
            return false;
        }
        self.selection = clamp(selection, text.len());
        self.history
            .push(HistoryEntry::new(Arc::clone(&text), self.selection.clone()));
        self.replace(text, ChangeOrigin::Edit);
        true
    }

    /// Steps back one entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(entry, ChangeOrigin::Undo);
        true
    }

    /// Steps forward one entry. Returns `false` when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(entry, ChangeOrigin::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Moves the selection without touching content or history.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = clamp(selection, self.content.len());
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.set_selection(offset..offset);
    }

    pub fn cursor(&self) -> CursorPosition {
        CursorPosition::at(&self.content, self.selection.end)
    }

    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    /// Whether the content differs from what was last marked saved.
    pub fn is_modified(&self) -> bool {
        self.content != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = Arc::clone(&self.content);
    }

    /// Bumped on every content change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ContentChange) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn restore(&mut self, entry: HistoryEntry, origin: ChangeOrigin) {
        self.selection = clamp(entry.selection, entry.content.len());
        self.replace(entry.content, origin);
    }

    fn replace(&mut self, text: Arc<str>, origin: ChangeOrigin) {
        let old = std::mem::replace(&mut self.content, text);
        self.stats = DocumentStats::of(&self.content);
        self.version += 1;

        let change = ContentChange {
            old,
            new: Arc::clone(&self.content),
            origin,
            version: self.version,
            at: Instant::now(),
        };
        self.bus.publish(&change);
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("len", &self.content.len())
            .field("version", &self.version)
            .field("history", &self.history.len())
            .field("modified", &self.is_modified())
            .finish()
    }
}

fn clamp(selection: Range<usize>, len: usize) -> Range<usize> {
    let end = selection.end.min(len);
    selection.start.min(end)..end
}
