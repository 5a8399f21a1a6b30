use serde::{Deserialize, Serialize};

/// Display labels for raw page numbers ("iv", "A-3", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabels {
    labels: Option<Vec<String>>,
}

impl PageLabels {
    pub fn new(labels: Option<Vec<String>>) -> Self {
        Self { labels }
    }

    /// No labels: every page displays as its 1-based number.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_labelled(&self) -> bool {
        self.labels.is_some()
    }

    /// The label of a 1-based page, falling back to the number itself when
    /// the document has no label for it.
    pub fn display_label(&self, page: u32) -> String {
        page.checked_sub(1)
            .and_then(|i| self.labels.as_ref()?.get(i as usize))
            .filter(|label| !label.is_empty())
            .cloned()
            .unwrap_or_else(|| page.to_string())
    }
}
