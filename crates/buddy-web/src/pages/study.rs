//! Study Page: notes in, flip cards out

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use buddy_client::{FlashcardController, PaymentController, PaymentOutcome};

use crate::api::{self, HttpFlashcardApi, HttpPaymentClient};
use crate::components::{CreditBadge, FlipCard};
use crate::view::{AlertNotifier, StudyView};

const PAYMENT_RECEIVED: &str = "Thanks for your purchase! Your new credits will appear shortly.";

#[component]
pub fn StudyPage() -> impl IntoView {
    let study = StudyView::new();
    let notes = RwSignal::new(String::new());
    let buying = RwSignal::new(false);
    let username = RwSignal::new(String::new());

    let flashcards = StoredValue::new_local(Rc::new(FlashcardController::new(HttpFlashcardApi, study)));
    let payments = StoredValue::new_local(Rc::new(PaymentController::new(
        HttpPaymentClient,
        AlertNotifier,
    )));

    // Back from hosted checkout
    if use_query_map().read_untracked().get("session_id").is_some() {
        study.status.set(PAYMENT_RECEIVED.into());
    }

    // Seed the credit display from the server
    leptos::task::spawn_local(async move {
        match api::fetch_account().await {
            Ok(account) => {
                username.set(account.username);
                study.credits.set(account.credits.to_string());
            }
            Err(e) => tracing::warn!("Could not load account: {}", e),
        }
    });

    let generate = move |_| {
        let controller = flashcards.get_value();
        let text = notes.get_untracked();
        leptos::task::spawn_local(async move {
            let outcome = controller.generate(&text).await;
            tracing::debug!(?outcome, "Generate finished");
        });
    };

    let buy = move |_| {
        let controller = payments.get_value();
        buying.set(true);
        leptos::task::spawn_local(async move {
            let outcome = controller.start().await;
            tracing::debug!(?outcome, "Checkout finished");
            if !matches!(outcome, PaymentOutcome::Redirected) {
                buying.set(false);
            }
        });
    };

    let navigate = use_navigate();
    let logout = move |_| {
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = api::logout().await {
                tracing::warn!("Logout failed: {}", e);
            }
            navigate("/", Default::default());
        });
    };

    view! {
        <div class="study">
            <header class="study-header">
                <h1>"AI Study Buddy"</h1>
                <div class="account">
                    <span class="username">{move || username.get()}</span>
                    <CreditBadge credits=study.credits />
                    <button
                        id="buy-credits-btn"
                        class="btn"
                        on:click=buy
                        disabled=move || buying.get()
                    >
                        "Buy 10 Credits ($5)"
                    </button>
                    <button class="btn btn-link" on:click=logout>"Log Out"</button>
                </div>
            </header>

            <section class="notes">
                <textarea
                    id="notes-input"
                    placeholder="Paste your study notes here..."
                    prop:value=move || notes.get()
                    on:input=move |ev| notes.set(event_target_value(&ev))
                />
                <button
                    id="generate-btn"
                    class="btn btn-primary"
                    on:click=generate
                    disabled=move || study.loading.get()
                >
                    {move || {
                        if study.loading.get() { "Working..." } else { "Generate Flashcards (1 Credit)" }
                    }}
                </button>
                <p id="status-message" class="status">{move || study.status.get()}</p>
            </section>

            <section id="flashcard-container" class="flashcard-grid">
                {move || {
                    study
                        .cards
                        .get()
                        .into_iter()
                        .map(|card| view! { <FlipCard card=card /> })
                        .collect_view()
                }}
            </section>
        </div>
    }
}
