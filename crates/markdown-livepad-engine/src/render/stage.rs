use std::fmt;

/// Where a render currently is. Passes run strictly in declaration order;
/// `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStage {
    #[default]
    Idle,
    Escaping,
    FenceExtraction,
    BlockGrouping,
    ParagraphAssembly,
    InlineSubstitution,
    PostProcessing,
    FenceReinsertion,
    Done,
    Error,
}

impl RenderStage {
    /// The stage that follows this one on the success path.
    pub fn next(self) -> RenderStage {
        match self {
            RenderStage::Idle => RenderStage::Escaping,
            RenderStage::Escaping => RenderStage::FenceExtraction,
            RenderStage::FenceExtraction => RenderStage::BlockGrouping,
            RenderStage::BlockGrouping => RenderStage::ParagraphAssembly,
            RenderStage::ParagraphAssembly => RenderStage::InlineSubstitution,
            RenderStage::InlineSubstitution => RenderStage::PostProcessing,
            RenderStage::PostProcessing => RenderStage::FenceReinsertion,
            RenderStage::FenceReinsertion => RenderStage::Done,
            RenderStage::Done => RenderStage::Done,
            RenderStage::Error => RenderStage::Error,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RenderStage::Done | RenderStage::Error)
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Idle => "idle",
            RenderStage::Escaping => "escaping",
            RenderStage::FenceExtraction => "fence extraction",
            RenderStage::BlockGrouping => "block grouping",
            RenderStage::ParagraphAssembly => "paragraph assembly",
            RenderStage::InlineSubstitution => "inline substitution",
            RenderStage::PostProcessing => "post-processing",
            RenderStage::FenceReinsertion => "fence reinsertion",
            RenderStage::Done => "done",
            RenderStage::Error => "error",
        };
        f.write_str(name)
    }
}
