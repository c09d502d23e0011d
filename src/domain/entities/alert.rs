use serde::{Deserialize, Serialize};

/// Alert text for one cycle: one line per breached metric, in evaluation order.
///
/// An empty message means nothing crossed its threshold and no notification
/// is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    lines: Vec<String>,
}

impl AlertMessage {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Payload handed to the notification sink: lines joined by newlines.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}
