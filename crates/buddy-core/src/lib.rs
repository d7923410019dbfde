//! # buddy-core
//!
//! Shared domain for Study Buddy: flashcards, the JSON wire types exchanged
//! between the browser and the server, and the provider-agnostic LLM
//! abstraction used to generate cards from study notes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   FlashcardGenerator                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Prompt    │  │   Parser    │  │   LlmProvider       │  │
//! │  │  Builder    │──│ (JSON span) │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate has no platform dependencies so the browser crates can share
//! the same `Flashcard` and wire types the server serializes.

pub mod cache;
pub mod error;
pub mod flashcard;
pub mod generator;
pub mod message;
pub mod provider;
pub mod wire;

pub use cache::{FlashcardCache, MemoryFlashcardCache};
pub use error::{BuddyError, Result};
pub use flashcard::{Flashcard, context_hash, parse_flashcards};
pub use generator::{FlashcardGenerator, GeneratorConfig};
pub use message::{Message, Role};
pub use provider::LlmProvider;
