pub mod bus;
pub mod editing;
pub mod error;
pub mod io;
pub mod render;
pub mod scheduler;

// Re-export key types for easier usage
pub use bus::{Bus, SubscriptionId};
pub use editing::*;
pub use error::{PostProcessError, RenderError};
pub use io::{IoError, export_html, read_document, write_document};
pub use render::{
    HeadingIdStrategy, InlineOptions, InlineRule, InlineRuleEngine, MathDelimiters,
    PostProcessor, Preview, RenderOptions, RenderResult, RenderStage, Renderer, TocEntry, render,
};
pub use scheduler::RenderScheduler;
