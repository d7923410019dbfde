//! # buddy-runtime
//!
//! LLM backends for the flashcard generator.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use buddy_runtime::OllamaProvider;
//!
//! let provider = Arc::new(OllamaProvider::from_env());
//! let generator = FlashcardGenerator::with_defaults(provider);
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use buddy_core::{BuddyError, FlashcardGenerator, LlmProvider, Message, Result, Role};
