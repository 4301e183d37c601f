//! # Editing
//!
//! Document state and the wiring from edits to the preview.
//!
//! - **`store`**: `ContentStore`, the only place document text changes
//! - **`history`**: bounded undo/redo entries
//! - **`stats`**: character/word/line counts and caret position
//! - **`session`**: `EditorSession`, store → scheduler → renderer → preview

pub mod history;
pub mod session;
pub mod stats;
pub mod store;

pub use history::{History, HistoryEntry};
pub use session::{EditorSession, SessionSettings};
pub use stats::{CursorPosition, DocumentStats};
pub use store::{ChangeOrigin, ContentChange, ContentStore};
