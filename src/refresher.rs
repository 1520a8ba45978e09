use std::time::Duration;

use crate::document::ActiveDocument;
use crate::estimator::{estimate, WordCounter};
use crate::status::StatusItem;

/// How often the active document is re-sampled
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// The text taken from the active document on one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub text: String,
    pub is_selection: bool,
}

impl Sample {
    /// The selection, unless it is blank, in which case the whole document
    pub fn take(doc: &dyn ActiveDocument) -> Self {
        let selection = doc.selection();
        if selection.trim().is_empty() {
            Self {
                text: doc.content(),
                is_selection: false,
            }
        } else {
            Self {
                text: selection,
                is_selection: true,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Updated,
    NoDocument,
    /// wpm is zero, the previous estimate stays up
    NoEstimate,
}

/// Recomputes the status text from the active document on every tick
#[derive(Debug, Default)]
pub struct Refresher {
    counter: WordCounter,
}

impl Refresher {
    pub fn new(counter: WordCounter) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> WordCounter {
        self.counter
    }

    pub fn tick(
        &self,
        doc: Option<&dyn ActiveDocument>,
        wpm: u32,
        status: &mut StatusItem,
    ) -> TickOutcome {
        let Some(doc) = doc else {
            tracing::trace!("no active document, skipping refresh");
            return TickOutcome::NoDocument;
        };
        let sample = Sample::take(doc);
        match estimate(&sample.text, wpm, self.counter) {
            Some(text) => {
                status.set_text(text);
                TickOutcome::Updated
            }
            None => {
                tracing::debug!(wpm, "reading speed is zero, keeping previous estimate");
                TickOutcome::NoEstimate
            }
        }
    }
}
