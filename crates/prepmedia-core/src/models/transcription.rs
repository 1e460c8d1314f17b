use serde::{Deserialize, Serialize};

/// Text recovered from a learner recording.
///
/// Not persisted here; the question-authoring workflow that asked for it stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl TranscriptionResult {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
