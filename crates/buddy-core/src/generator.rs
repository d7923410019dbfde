//! Flashcard Generator
//!
//! Turns study notes into question/answer pairs by prompting an LLM and
//! parsing the JSON array out of its reply.

use std::sync::Arc;

use crate::error::Result;
use crate::flashcard::{Flashcard, parse_flashcards};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};

/// Generator configuration
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Number of cards requested from the model
    pub card_count: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            card_count: 5,
            generation: GenerationOptions {
                max_tokens: 500,
                temperature: 0.7,
                ..Default::default()
            },
        }
    }
}

impl GeneratorConfig {
    /// Default configuration with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.generation.model = model.into();
        config
    }
}

/// Flashcard generator backed by any `LlmProvider`
pub struct FlashcardGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl FlashcardGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_prompt(&self, notes: &str) -> String {
        format!(
            r#"Based on the following text, generate exactly {count} distinct questions and their corresponding answers.
Format your response as a valid JSON array of objects, where each object has a "question" key and an "answer" key.
Do not include any other text or explanation outside of the JSON array.

Here is the text:
---
{notes}
---"#,
            count = self.config.card_count,
        )
    }

    /// Generate flashcards for a block of notes.
    ///
    /// An unusable reply is an empty list, not an error. Only provider
    /// failures are returned as `Err`.
    pub async fn generate(&self, notes: &str) -> Result<Vec<Flashcard>> {
        let messages = [Message::user(self.build_prompt(notes))];

        let completion = self
            .provider
            .complete(&messages, &self.config.generation)
            .await?;

        let cards = parse_flashcards(&completion.content);
        tracing::debug!(
            provider = self.provider.name(),
            model = %completion.model,
            cards = cards.len(),
            "Parsed flashcards from completion"
        );
        Ok(cards)
    }
}
