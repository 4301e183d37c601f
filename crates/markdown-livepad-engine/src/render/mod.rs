//! # Rendering
//!
//! Markdown text in, HTML text out. [`Renderer::render`] is a pure function of
//! its input plus the renderer's configuration: no global state, no I/O.
//!
//! ## Pipeline
//!
//! | Stage                | Module                 |
//! |----------------------|------------------------|
//! | Escaping             | `escape`               |
//! | FenceExtraction      | `fence`                |
//! | BlockGrouping        | `blocks`               |
//! | ParagraphAssembly    | `blocks::paragraph`    |
//! | InlineSubstitution   | `html`, `inline`       |
//! | PostProcessing       | `postprocess`          |
//! | FenceReinsertion     | `fence`                |
//!
//! A panic in any stage is caught at [`Renderer::try_render`] and reported as
//! [`RenderError::Internal`] naming the stage. Malformed markdown never errors.

pub mod blocks;
pub mod escape;
pub mod fence;
pub mod html;
pub mod inline;
pub mod postprocess;
pub mod preview;
pub mod slug;
pub mod stage;

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

pub use blocks::Block;
pub use html::TocEntry;
pub use inline::{InlineOptions, InlineRule, InlineRuleEngine};
pub use postprocess::{MathDelimiters, PostProcessor};
pub use preview::Preview;
pub use slug::HeadingIdStrategy;
pub use stage::RenderStage;

use crate::error::RenderError;
use html::HtmlWriter;

/// Behaviour switches for a [`Renderer`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub heading_ids: HeadingIdStrategy,
    pub inline: InlineOptions,
    /// Documents longer than this many characters are refused.
    pub max_length: Option<usize>,
}

/// Output of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    /// One id per heading in document order; may repeat.
    pub heading_ids: Vec<String>,
    pub toc: Vec<TocEntry>,
    pub error: Option<RenderError>,
}

impl RenderResult {
    /// A result carrying only the visible error block for `error`.
    pub fn failed(error: RenderError) -> Self {
        Self {
            html: error_block(&error),
            heading_ids: vec![],
            toc: vec![],
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The block shown in place of (or above) the preview when a render fails.
pub fn error_block(error: &RenderError) -> String {
    format!(
        "<div class=\"render-error\" role=\"alert\">{}</div>",
        escape::escape(&error.to_string())
    )
}

/// Runs the rendering pipeline with a fixed rule set and hook list.
pub struct Renderer {
    options: RenderOptions,
    engine: InlineRuleEngine,
    post_processors: Vec<Box<dyn PostProcessor>>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            engine: InlineRuleEngine::standard(options.inline),
            options,
            post_processors: vec![],
        }
    }

    /// Replaces the inline rule set.
    pub fn with_engine(mut self, engine: InlineRuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Appends an inline rule after the existing ones.
    pub fn with_rule(mut self, rule: InlineRule) -> Self {
        self.engine = self.engine.with_rule(rule);
        self
    }

    pub fn with_post_processor(mut self, hook: impl PostProcessor + 'static) -> Self {
        self.post_processors.push(Box::new(hook));
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn engine(&self) -> &InlineRuleEngine {
        &self.engine
    }

    /// Renders `text`. Failures come back as a result whose `html` is the
    /// error block and whose `error` is set.
    pub fn render(&self, text: &str) -> RenderResult {
        self.try_render(text).unwrap_or_else(|err| {
            log::warn!("render failed: {err}");
            RenderResult::failed(err)
        })
    }

    /// Renders `text`, reporting failures as `Err`.
    pub fn try_render(&self, text: &str) -> Result<RenderResult, RenderError> {
        let stage = Cell::new(RenderStage::Idle);
        let started = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(text, &stage)));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(RenderError::Internal {
                stage: stage.get(),
                message: panic_message(payload.as_ref()),
            }),
        };

        log::debug!(
            "render of {} bytes finished at {} in {:?}",
            text.len(),
            if result.is_ok() { RenderStage::Done } else { RenderStage::Error },
            started.elapsed()
        );
        result
    }

    /// The block structure of `text`, without producing HTML.
    pub fn parse(&self, text: &str) -> Vec<Block> {
        let extracted = fence::extract(&escape::escape(&sanitize(text)));
        blocks::parse(&extracted)
    }

    fn run(&self, text: &str, stage: &Cell<RenderStage>) -> Result<RenderResult, RenderError> {
        if let Some(max) = self.options.max_length {
            let len = text.chars().count();
            if len > max {
                return Err(RenderError::TooLarge { len, max });
            }
        }

        stage.set(RenderStage::Escaping);
        let escaped = escape::escape(&sanitize(text));

        stage.set(RenderStage::FenceExtraction);
        let extracted = fence::extract(&escaped);

        stage.set(RenderStage::BlockGrouping);
        let segments = blocks::group(&extracted);

        stage.set(RenderStage::ParagraphAssembly);
        let blocks = blocks::ParagraphAssembler::assemble(segments);

        stage.set(RenderStage::InlineSubstitution);
        let written = HtmlWriter::new(&self.engine, self.options.heading_ids).write(&blocks);

        stage.set(RenderStage::PostProcessing);
        let mut html = written.html;
        for hook in &self.post_processors {
            html = hook.process(html).map_err(|err| RenderError::PostProcess {
                name: hook.name().to_string(),
                message: err.to_string(),
            })?;
        }

        stage.set(RenderStage::FenceReinsertion);
        let html = extracted.reinsert(&html);

        stage.set(RenderStage::Done);
        Ok(RenderResult {
            html,
            heading_ids: written.heading_ids,
            toc: written.toc,
            error: None,
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<&str> = self.post_processors.iter().map(|p| p.name()).collect();
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("rules", &self.engine.rule_names())
            .field("post_processors", &hooks)
            .finish()
    }
}

/// Renders `text` with the standard rule set and default options.
pub fn render(text: &str) -> String {
    Renderer::default().render(text).html
}

/// Normalises line endings and removes the private-use characters the
/// pipeline reserves for its placeholder tokens.
fn sanitize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|c| !('\u{E000}'..='\u{E003}').contains(c))
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
