//! Flow controllers

mod flashcards;
mod payment;

pub use flashcards::{
    FlashcardController, GenerateOutcome, NO_CARDS_MESSAGE, PROGRESS_MESSAGE, PROMPT_MESSAGE,
    parse_credits,
};
pub use payment::{PaymentController, PaymentOutcome};
