//! Signal-backed adapters for the controllers

use leptos::prelude::*;

use buddy_client::{FlashcardView, Notifier};
use buddy_core::Flashcard;

/// Shown until `/me` answers; not an integer, so it is never decremented
pub const UNKNOWN_CREDITS: &str = "-";

/// Reactive state of the study page
#[derive(Clone, Copy)]
pub struct StudyView {
    pub loading: RwSignal<bool>,
    pub cards: RwSignal<Vec<Flashcard>>,
    pub status: RwSignal<String>,
    pub credits: RwSignal<String>,
}

impl StudyView {
    pub fn new() -> Self {
        Self {
            loading: RwSignal::new(false),
            cards: RwSignal::new(Vec::new()),
            status: RwSignal::new(String::new()),
            credits: RwSignal::new(UNKNOWN_CREDITS.into()),
        }
    }
}

impl Default for StudyView {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardView for StudyView {
    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn render_cards(&self, cards: &[Flashcard]) {
        self.cards.set(cards.to_vec());
    }

    fn set_status(&self, text: &str) {
        self.status.set(text.to_owned());
    }

    fn credits_text(&self) -> Option<String> {
        Some(self.credits.get_untracked())
    }

    fn set_credits(&self, credits: i64) {
        self.credits.set(credits.to_string());
    }
}

/// `window.alert`
#[derive(Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                tracing::warn!("alert failed: {:?}", e);
            }
        }
    }
}
