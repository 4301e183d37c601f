use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::history::DEFAULT_CAPACITY;
use super::store::{ContentChange, ContentStore};
use crate::bus::SubscriptionId;
use crate::render::{Preview, Renderer};
use crate::scheduler::RenderScheduler;

/// Construction-time settings for an [`EditorSession`]. Rendering is
/// configured on the [`Renderer`] handed to
/// [`with_renderer`](EditorSession::with_renderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub history_size: usize,
    pub debounce: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_CAPACITY,
            debounce: Duration::from_millis(300),
        }
    }
}

/// An editable document with a debounced live preview.
///
/// Edits go to the [`ContentStore`], whose change notifications feed the
/// [`RenderScheduler`]. The host loop calls [`tick`](Self::tick) (or waits
/// until [`next_deadline`](Self::next_deadline)) and due renders land in the
/// [`Preview`]. Only one render can be pending at a time.
pub struct EditorSession {
    store: ContentStore,
    scheduler: Rc<RefCell<RenderScheduler>>,
    renderer: Renderer,
    preview: Preview,
    subscription: SubscriptionId,
}

impl EditorSession {
    /// A session rendering with [`Renderer::default`].
    pub fn new(initial: impl Into<Arc<str>>, settings: SessionSettings) -> Self {
        Self::with_renderer(initial, settings, Renderer::default())
    }

    /// Renders the initial content straight away; later renders are debounced.
    pub fn with_renderer(
        initial: impl Into<Arc<str>>,
        settings: SessionSettings,
        renderer: Renderer,
    ) -> Self {
        let mut store = ContentStore::new(initial, settings.history_size);
        let scheduler = Rc::new(RefCell::new(RenderScheduler::new(settings.debounce)));

        let subscription = {
            let scheduler = Rc::clone(&scheduler);
            store.subscribe(move |change: &ContentChange| {
                scheduler
                    .borrow_mut()
                    .on_content_change(Arc::clone(&change.new), change.at);
            })
        };

        let mut preview = Preview::new();
        preview.apply(renderer.render(&store.content()));

        Self {
            store,
            scheduler,
            renderer,
            preview,
            subscription,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn set_content(&mut self, text: impl Into<Arc<str>>) -> bool {
        self.store.set_content(text)
    }

    pub fn set_content_with_selection(
        &mut self,
        text: impl Into<Arc<str>>,
        selection: Range<usize>,
    ) -> bool {
        self.store.set_content_with_selection(text, selection)
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.store.set_selection(selection);
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn mark_saved(&mut self) {
        self.store.mark_saved();
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// When the host loop should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.borrow().deadline()
    }

    /// Renders the pending content if its quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self.scheduler.borrow_mut().poll(now);
        self.render(due)
    }

    /// Renders the pending content immediately.
    pub fn flush(&mut self) -> bool {
        let pending = self.scheduler.borrow_mut().flush();
        self.render(pending)
    }

    fn render(&mut self, text: Option<Arc<str>>) -> bool {
        let Some(text) = text else {
            return false;
        };
        self.preview.apply(self.renderer.render(&text));
        true
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("store", &self.store)
            .field("pending", &self.scheduler.borrow().is_pending())
            .field("renders", &self.preview.renders())
            .finish()
    }
}
