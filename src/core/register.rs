//! Register: single slot holding the last yank or delete

use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    text: String,
    linewise: bool,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot, whatever the size of `text`
    pub fn store(&mut self, text: impl Into<String>, linewise: bool) {
        let text = text.into();
        trace!(len = text.len(), linewise, "register store");
        self.text = text;
        self.linewise = linewise;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_linewise(&self) -> bool {
        self.linewise
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
