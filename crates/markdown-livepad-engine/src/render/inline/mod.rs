//! # Inline Rendering
//!
//! Ordered pattern substitution over escaped text.
//!
//! ## Order
//!
//! 1. Code spans are replaced by stash tokens first (raw zone: nothing inside
//!    backticks is interpreted).
//! 2. Images, then links, then bold, italic and strikethrough. Images go first
//!    because the link pattern matches the tail of an image.
//! 3. Tokens are expanded back into HTML.
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor used by the code-span scanner
//! - **`code_span`**: backtick span detection and protection
//! - **`stash`**: token table for generated fragments
//! - **`rules`**: `InlineRule` and the standard rule set
//! - **`engine`**: `InlineRuleEngine::apply`

pub mod code_span;
pub mod cursor;
pub mod engine;
pub mod rules;
pub mod stash;

pub use engine::InlineRuleEngine;
pub use rules::{InlineOptions, InlineRule, standard_rules};
