pub const INITIAL_STATUS: &str = "0m 0s read time";

/// The single status bar text item the extension owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    text: String,
}

impl Default for StatusItem {
    fn default() -> Self {
        Self {
            text: INITIAL_STATUS.to_string(),
        }
    }
}

impl StatusItem {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
