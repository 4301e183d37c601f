use crate::render::RenderStage;

/// Why a render produced an error block instead of a new preview.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Document too large: {len} characters (limit {max})")]
    TooLarge { len: usize, max: usize },
    #[error("Post-processor '{name}' failed: {message}")]
    PostProcess { name: String, message: String },
    #[error("Internal error during {stage}: {message}")]
    Internal { stage: RenderStage, message: String },
}

/// Returned by a post-processing hook that cannot handle its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PostProcessError(pub String);

impl PostProcessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
