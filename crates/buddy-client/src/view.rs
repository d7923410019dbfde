//! View-model seams
//!
//! Controllers never touch the DOM. The frontend implements these over its
//! reactive signals; tests implement them over plain `RefCell`s.

use std::rc::Rc;

use buddy_core::Flashcard;

/// Everything the flashcard flow writes to the page
pub trait FlashcardView {
    /// Disable or re-enable the generate trigger
    fn set_loading(&self, loading: bool);

    /// Replace the rendered cards, in order. An empty slice clears the grid.
    fn render_cards(&self, cards: &[Flashcard]);

    /// Replace the inline status text. An empty string clears it.
    fn set_status(&self, text: &str);

    /// Current text of the credit display, if there is one
    fn credits_text(&self) -> Option<String>;

    fn set_credits(&self, credits: i64);
}

/// Blocking user notification (`window.alert` in the browser)
pub trait Notifier {
    fn alert(&self, message: &str);
}

impl<T: FlashcardView + ?Sized> FlashcardView for Rc<T> {
    fn set_loading(&self, loading: bool) {
        (**self).set_loading(loading);
    }

    fn render_cards(&self, cards: &[Flashcard]) {
        (**self).render_cards(cards);
    }

    fn set_status(&self, text: &str) {
        (**self).set_status(text);
    }

    fn credits_text(&self) -> Option<String> {
        (**self).credits_text()
    }

    fn set_credits(&self, credits: i64) {
        (**self).set_credits(credits);
    }
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

/// Visible face of a flip card
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardFace {
    #[default]
    Question,
    Answer,
}

impl CardFace {
    /// The face shown after one click
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Question => Self::Answer,
            Self::Answer => Self::Question,
        }
    }

    pub const fn is_flipped(self) -> bool {
        matches!(self, Self::Answer)
    }
}
