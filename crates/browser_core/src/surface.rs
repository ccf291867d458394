//! Surfaces that keep the latest rendered output in memory.

use tracing::error;

use crate::{
    coordinator::RenderSurface,
    options::SelectorOptions,
    render::{Frame, ViewRenderer},
};

/// Renders each presented frame with `R` and keeps the latest markup.
pub struct RenderedSurface<R> {
    renderer: R,
    output: String,
    options: Option<SelectorOptions>,
    failures: usize,
}

impl<R: ViewRenderer> RenderedSurface<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            output: String::new(),
            options: None,
            failures: 0,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Options received at startup; `None` until a load succeeds.
    pub fn options(&self) -> Option<&SelectorOptions> {
        self.options.as_ref()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl<R: ViewRenderer> RenderSurface for RenderedSurface<R> {
    fn populate_options(&mut self, options: &SelectorOptions) {
        self.options = Some(options.clone());
    }

    fn present(&mut self, frame: &Frame<'_>) {
        match self.renderer.render(frame) {
            Ok(output) => self.output = output,
            Err(err) => {
                // Keep the previous output on screen.
                self.failures += 1;
                error!(error = %err, "failed to render view");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
