//! Classification review models.
//!
//! After inference the backend parks a job in `classification_pending` until
//! a human confirms or overrides the predicted labels. The sheet fetched
//! from `GET /api/jobs/{id}/classification` is reviewed locally and posted
//! back to the same path.

use serde::{Deserialize, Serialize};

/// A single classified region awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationItem {
    pub id: String,
    pub page: u32,
    /// Label predicted by the model.
    pub label: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    /// Label chosen by the reviewer; None until reviewed.
    #[serde(default)]
    pub reviewed_label: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClassificationItem {
    /// Whether this item should be surfaced to the reviewer.
    pub fn needs_review(&self, threshold: f64) -> bool {
        self.reviewed_label.is_none() && self.confidence < threshold
    }

    /// The label that counts: the reviewer's override, else the prediction.
    pub fn effective_label(&self) -> &str {
        self.reviewed_label.as_deref().unwrap_or(&self.label)
    }
}

/// Outcome of reviewing one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Keep the predicted label.
    Accept,
    /// Replace the predicted label.
    Override(String),
    /// Leave the item unreviewed.
    Skip,
}

/// The classification sheet for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationSheet {
    #[serde(default)]
    pub items: Vec<ClassificationItem>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClassificationSheet {
    /// Indices of items below the confidence threshold, in sheet order.
    pub fn pending_review(&self, threshold: f64) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.needs_review(threshold))
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply a review decision to the item at `index`.
    pub fn apply(&mut self, index: usize, decision: ReviewDecision) {
        let Some(item) = self.items.get_mut(index) else {
            return;
        };
        match decision {
            ReviewDecision::Accept => item.reviewed_label = Some(item.label.clone()),
            ReviewDecision::Override(label) => item.reviewed_label = Some(label),
            ReviewDecision::Skip => {}
        }
    }

    /// Accept the predicted label for every unreviewed item.
    pub fn accept_all(&mut self) {
        for item in &mut self.items {
            if item.reviewed_label.is_none() {
                item.reviewed_label = Some(item.label.clone());
            }
        }
    }

    /// Count of items with a reviewer decision recorded.
    pub fn reviewed_count(&self) -> usize {
        self.items.iter().filter(|i| i.reviewed_label.is_some()).count()
    }
}
