//! Flashcard Cache
//!
//! Cards are cached by the hash of the notes they came from. The cache is
//! shared across accounts so identical notes are only sent to the model once.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{BuddyError, Result};
use crate::flashcard::Flashcard;

/// Flashcard cache storage trait
#[async_trait]
pub trait FlashcardCache: Send + Sync {
    /// Look up cards for a context hash
    async fn get(&self, context_hash: &str) -> Result<Option<Vec<Flashcard>>>;

    /// Store cards for a context hash, replacing any previous deck
    async fn put(&self, context_hash: &str, cards: &[Flashcard]) -> Result<()>;
}

/// In-memory cache (for development and tests)
#[derive(Default)]
pub struct MemoryFlashcardCache {
    decks: RwLock<HashMap<String, Vec<Flashcard>>>,
}

impl MemoryFlashcardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached decks
    pub fn len(&self) -> usize {
        self.decks.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FlashcardCache for MemoryFlashcardCache {
    async fn get(&self, context_hash: &str) -> Result<Option<Vec<Flashcard>>> {
        let decks = self
            .decks
            .read()
            .map_err(|e| BuddyError::Cache(e.to_string()))?;
        Ok(decks.get(context_hash).cloned())
    }

    async fn put(&self, context_hash: &str, cards: &[Flashcard]) -> Result<()> {
        let mut decks = self
            .decks
            .write()
            .map_err(|e| BuddyError::Cache(e.to_string()))?;
        decks.insert(context_hash.to_string(), cards.to_vec());
        Ok(())
    }
}
