use super::{RenderResult, error_block};
use crate::error::RenderError;

/// What the preview pane shows.
///
/// Successful results replace the previous one. A failed result keeps the
/// last good HTML on screen and shows the error block above it until the
/// next success clears it.
#[derive(Debug, Default)]
pub struct Preview {
    last_good: Option<RenderResult>,
    error: Option<RenderError>,
    renders: usize,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, result: RenderResult) {
        self.renders += 1;
        match result.error {
            Some(err) => self.error = Some(err),
            None => {
                self.error = None;
                self.last_good = Some(result);
            }
        }
    }

    pub fn html(&self) -> String {
        let good = self.last_good.as_ref().map(|r| r.html.as_str());
        match (&self.error, good) {
            (Some(err), Some(good)) => format!("{}\n{good}", error_block(err)),
            (Some(err), None) => error_block(err),
            (None, Some(good)) => good.to_string(),
            (None, None) => String::new(),
        }
    }

    /// The last successful render, if any.
    pub fn current(&self) -> Option<&RenderResult> {
        self.last_good.as_ref()
    }

    pub fn last_error(&self) -> Option<&RenderError> {
        self.error.as_ref()
    }

    /// How many results have been applied, failed or not.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ok(html: &str) -> RenderResult {
        RenderResult {
            html: html.to_string(),
            ..RenderResult::default()
        }
    }

    fn too_large() -> RenderError {
        RenderError::TooLarge { len: 10, max: 5 }
    }

    #[test]
    fn starts_empty() {
        let preview = Preview::new();
        assert_eq!(preview.html(), "");
        assert_eq!(preview.renders(), 0);
    }

    #[test]
    fn success_replaces_previous() {
        let mut preview = Preview::new();
        preview.apply(ok("<p>a</p>"));
        preview.apply(ok("<p>b</p>"));
        assert_eq!(preview.html(), "<p>b</p>");
    }

    #[test]
    fn failure_keeps_stale_html_below_error() {
        let mut preview = Preview::new();
        preview.apply(ok("<p>good</p>"));
        preview.apply(RenderResult::failed(too_large()));

        assert_eq!(preview.last_error(), Some(&too_large()));
        assert_eq!(
            preview.html(),
            format!("{}\n<p>good</p>", error_block(&too_large()))
        );
        assert_eq!(preview.current().map(|r| r.html.as_str()), Some("<p>good</p>"));
    }

    #[test]
    fn next_success_clears_error() {
        let mut preview = Preview::new();
        preview.apply(RenderResult::failed(too_large()));
        assert_eq!(preview.html(), error_block(&too_large()));

        preview.apply(ok("<p>fixed</p>"));
        assert_eq!(preview.last_error(), None);
        assert_eq!(preview.html(), "<p>fixed</p>");
        assert_eq!(preview.renders(), 2);
    }
}
