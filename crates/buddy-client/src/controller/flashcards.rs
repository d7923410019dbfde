//! Flashcard Generation Controller

use std::cell::Cell;

use crate::api::FlashcardApi;
use crate::view::FlashcardView;

pub const PROMPT_MESSAGE: &str = "Please paste some notes first!";
pub const PROGRESS_MESSAGE: &str = "Generating your flashcards... This may take a moment. 🧠";
pub const NO_CARDS_MESSAGE: &str = "Could not generate flashcards. Please try again.";

/// How a generate click ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Notes were blank; nothing was sent
    EmptyInput,
    /// A request is already in flight
    Busy,
    /// Cards rendered
    Rendered(usize),
    /// Server answered 2xx with no cards
    NoCards,
    /// Request failed; carries the displayed reason
    Failed(String),
}

/// Parse the credit display the way the page shows it: a plain integer,
/// surrounding whitespace allowed.
pub fn parse_credits(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Drives one generate button
pub struct FlashcardController<A, V> {
    api: A,
    view: V,
    in_flight: Cell<bool>,
}

impl<A: FlashcardApi, V: FlashcardView> FlashcardController<A, V> {
    pub const fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            in_flight: Cell::new(false),
        }
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.get()
    }

    /// Handle a click on the generate trigger with the raw input text
    pub async fn generate(&self, input: &str) -> GenerateOutcome {
        if self.in_flight.get() {
            return GenerateOutcome::Busy;
        }

        let notes = input.trim();
        if notes.is_empty() {
            self.view.set_status(PROMPT_MESSAGE);
            return GenerateOutcome::EmptyInput;
        }

        self.enter_loading();

        let (outcome, status) = match self.api.generate(notes).await {
            Ok(cards) => {
                self.decrement_credits();
                if cards.is_empty() {
                    (GenerateOutcome::NoCards, NO_CARDS_MESSAGE.to_string())
                } else {
                    self.view.render_cards(&cards);
                    (GenerateOutcome::Rendered(cards.len()), String::new())
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching flashcards");
                let reason = e.to_string();
                let status = format!("An error occurred: {reason}");
                (GenerateOutcome::Failed(reason), status)
            }
        };

        self.exit_loading();
        self.view.set_status(&status);
        outcome
    }

    fn enter_loading(&self) {
        self.in_flight.set(true);
        self.view.set_loading(true);
        self.view.set_status(PROGRESS_MESSAGE);
        self.view.render_cards(&[]);
    }

    fn exit_loading(&self) {
        self.view.set_loading(false);
        self.view.set_status("");
        self.in_flight.set(false);
    }

    fn decrement_credits(&self) {
        if let Some(current) = self.view.credits_text().as_deref().and_then(parse_credits) {
            self.view.set_credits(current.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use async_trait::async_trait;
    use buddy_core::Flashcard;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingView {
        loading: Cell<bool>,
        loading_history: RefCell<Vec<bool>>,
        cards: RefCell<Vec<Flashcard>>,
        status: RefCell<String>,
        credits: RefCell<Option<String>>,
    }

    impl RecordingView {
        fn with_credits(text: &str) -> Rc<Self> {
            let view = Self::default();
            *view.credits.borrow_mut() = Some(text.into());
            Rc::new(view)
        }
    }

    impl FlashcardView for RecordingView {
        fn set_loading(&self, loading: bool) {
            self.loading.set(loading);
            self.loading_history.borrow_mut().push(loading);
        }

        fn render_cards(&self, cards: &[Flashcard]) {
            *self.cards.borrow_mut() = cards.to_vec();
        }

        fn set_status(&self, text: &str) {
            *self.status.borrow_mut() = text.to_string();
        }

        fn credits_text(&self) -> Option<String> {
            self.credits.borrow().clone()
        }

        fn set_credits(&self, credits: i64) {
            *self.credits.borrow_mut() = Some(credits.to_string());
        }
    }

    struct ScriptedApi {
        view: Rc<RecordingView>,
        reply: Result<Vec<Flashcard>>,
        calls: RefCell<Vec<String>>,
        loading_during_call: Cell<Option<bool>>,
        cards_during_call: Cell<Option<usize>>,
    }

    impl ScriptedApi {
        fn new(view: &Rc<RecordingView>, reply: Result<Vec<Flashcard>>) -> Self {
            Self {
                view: view.clone(),
                reply,
                calls: RefCell::new(Vec::new()),
                loading_during_call: Cell::new(None),
                cards_during_call: Cell::new(None),
            }
        }
    }

    #[async_trait(?Send)]
    impl FlashcardApi for ScriptedApi {
        async fn generate(&self, text: &str) -> Result<Vec<Flashcard>> {
            self.calls.borrow_mut().push(text.to_string());
            self.loading_during_call.set(Some(self.view.loading.get()));
            self.cards_during_call.set(Some(self.view.cards.borrow().len()));
            self.reply.clone()
        }
    }

    fn cards(n: usize) -> Vec<Flashcard> {
        (1..=n)
            .map(|i| Flashcard::new(format!("Q{i}"), format!("A{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_blank_input_sends_nothing() {
        let view = RecordingView::with_credits("3");
        let api = ScriptedApi::new(&view, Ok(cards(1)));
        let controller = FlashcardController::new(api, view.clone());

        for input in ["", "   ", "\n\t "] {
            assert_eq!(controller.generate(input).await, GenerateOutcome::EmptyInput);
        }

        assert!(controller.api.calls.borrow().is_empty());
        assert_eq!(*view.status.borrow(), PROMPT_MESSAGE);
        assert!(view.loading_history.borrow().is_empty());
        assert_eq!(view.credits.borrow().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_renders_cards_in_response_order() {
        let view = RecordingView::with_credits("3");
        let api = ScriptedApi::new(&view, Ok(cards(4)));
        let controller = FlashcardController::new(api, view.clone());

        let outcome = controller.generate("  photosynthesis notes \n").await;

        assert_eq!(outcome, GenerateOutcome::Rendered(4));
        assert_eq!(*controller.api.calls.borrow(), vec!["photosynthesis notes"]);
        let rendered = view.cards.borrow();
        let questions: Vec<_> = rendered.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(*view.status.borrow(), "");
    }

    #[tokio::test]
    async fn test_prior_cards_cleared_before_request() {
        let view = RecordingView::with_credits("3");
        view.render_cards(&cards(2));
        let api = ScriptedApi::new(&view, Ok(Vec::new()));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;

        assert_eq!(controller.api.cards_during_call.get(), Some(0));
    }

    #[tokio::test]
    async fn test_empty_result_shows_could_not_generate() {
        let view = RecordingView::with_credits("3");
        let api = ScriptedApi::new(&view, Ok(Vec::new()));
        let controller = FlashcardController::new(api, view.clone());

        assert_eq!(controller.generate("notes").await, GenerateOutcome::NoCards);
        assert!(view.cards.borrow().is_empty());
        assert_eq!(*view.status.borrow(), NO_CARDS_MESSAGE);
    }

    #[tokio::test]
    async fn test_credits_decrement_once_on_success() {
        let view = RecordingView::with_credits(" 5 ");
        let api = ScriptedApi::new(&view, Ok(cards(2)));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;
        assert_eq!(view.credits.borrow().as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_credits_untouched_when_not_an_integer() {
        let view = RecordingView::with_credits("-");
        let api = ScriptedApi::new(&view, Ok(cards(2)));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;
        assert_eq!(view.credits.borrow().as_deref(), Some("-"));
    }

    #[tokio::test]
    async fn test_credits_untouched_on_failure() {
        let view = RecordingView::with_credits("5");
        let api = ScriptedApi::new(&view, Err(ClientError::Status(500)));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;
        assert_eq!(view.credits.borrow().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_server_error_text_surfaces() {
        let view = RecordingView::with_credits("0");
        let api = ScriptedApi::new(
            &view,
            Err(ClientError::Server("Insufficient credits. Please purchase more.".into())),
        );
        let controller = FlashcardController::new(api, view.clone());

        let outcome = controller.generate("notes").await;

        assert_eq!(
            outcome,
            GenerateOutcome::Failed("Insufficient credits. Please purchase more.".into())
        );
        assert_eq!(
            *view.status.borrow(),
            "An error occurred: Insufficient credits. Please purchase more."
        );
    }

    #[tokio::test]
    async fn test_generic_status_message() {
        let view = RecordingView::with_credits("2");
        let api = ScriptedApi::new(&view, Err(ClientError::Status(502)));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;
        assert_eq!(
            *view.status.borrow(),
            "An error occurred: HTTP error! Status: 502"
        );
    }

    #[tokio::test]
    async fn test_credits_decrement_saturates_at_minimum() {
        let minimum = i64::MIN.to_string();
        let view = RecordingView::with_credits(&minimum);
        let api = ScriptedApi::new(&view, Ok(cards(1)));
        let controller = FlashcardController::new(api, view.clone());

        controller.generate("notes").await;
        assert_eq!(view.credits.borrow().as_deref(), Some(minimum.as_str()));
    }

    #[tokio::test]
    async fn test_network_failure_status() {
        let view = RecordingView::with_credits("2");
        let api = ScriptedApi::new(&view, Err(ClientError::Network("Failed to fetch".into())));
        let controller = FlashcardController::new(api, view.clone());

        let outcome = controller.generate("notes").await;

        assert_eq!(outcome, GenerateOutcome::Failed("Failed to fetch".into()));
        assert_eq!(*view.status.borrow(), "An error occurred: Failed to fetch");
        assert_eq!(view.credits.borrow().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_unreadable_response_status() {
        let view = RecordingView::with_credits("2");
        let api = ScriptedApi::new(
            &view,
            Err(ClientError::Decode("expected value at line 1".into())),
        );
        let controller = FlashcardController::new(api, view.clone());

        let outcome = controller.generate("notes").await;

        assert_eq!(
            outcome,
            GenerateOutcome::Failed("expected value at line 1".into())
        );
        assert_eq!(
            *view.status.borrow(),
            "An error occurred: expected value at line 1"
        );
        assert!(view.cards.borrow().is_empty());
        assert_eq!(view.credits.borrow().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_trigger_disabled_only_while_in_flight() {
        for reply in [
            Ok(cards(1)),
            Ok(Vec::new()),
            Err(ClientError::Network("Failed to fetch".into())),
        ] {
            let view = RecordingView::with_credits("2");
            let api = ScriptedApi::new(&view, reply);
            let controller = FlashcardController::new(api, view.clone());

            controller.generate("notes").await;

            assert_eq!(controller.api.loading_during_call.get(), Some(true));
            assert_eq!(*view.loading_history.borrow(), vec![true, false]);
            assert!(!view.loading.get());
            assert!(!controller.is_loading());
        }
    }

    #[test]
    fn test_parse_credits() {
        assert_eq!(parse_credits("7"), Some(7));
        assert_eq!(parse_credits(" -1\n"), Some(-1));
        assert_eq!(parse_credits(""), None);
        assert_eq!(parse_credits("seven"), None);
        assert_eq!(parse_credits("7 credits"), None);
    }
}
