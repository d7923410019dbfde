//! Flashcards
//!
//! The question/answer pair rendered as a flip card, plus the helpers used to
//! pull cards out of free-form model output and to key the card cache.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single question/answer pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Extract flashcards from model output.
///
/// Looks at the span between the first `[` and the last `]`. Entries without
/// a string `question` and `answer` are skipped. Anything unparsable yields
/// an empty list.
pub fn parse_flashcards(generated: &str) -> Vec<Flashcard> {
    let Some(start) = generated.find('[') else {
        return Vec::new();
    };
    let Some(end) = generated.rfind(']') else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    let entries: Vec<serde_json::Value> = match serde_json::from_str(&generated[start..=end]) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Model output is not a JSON array");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let question = entry.get("question")?.as_str()?;
            let answer = entry.get("answer")?.as_str()?;
            Some(Flashcard::new(question, answer))
        })
        .collect()
}

/// Cache key for a block of notes: lowercase hex SHA-256 of the text
pub fn context_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
