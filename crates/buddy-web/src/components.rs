//! Reusable UI Components

use leptos::prelude::*;

use buddy_client::CardFace;
use buddy_core::Flashcard;

/// Question on the front, answer on the back; each click flips it
#[component]
pub fn FlipCard(card: Flashcard) -> impl IntoView {
    let face = RwSignal::new(CardFace::default());

    view! {
        <div
            class=move || {
                if face.get().is_flipped() { "flashcard is-flipped" } else { "flashcard" }
            }
            on:click=move |_| face.update(|f| *f = f.flipped())
        >
            <div class="flashcard-inner">
                <div class="flashcard-front">
                    <span class="flashcard-label">"Question"</span>
                    <p>{card.question}</p>
                </div>
                <div class="flashcard-back">
                    <span class="flashcard-label">"Answer"</span>
                    <p>{card.answer}</p>
                </div>
            </div>
        </div>
    }
}

/// Current balance, `-` until known
#[component]
pub fn CreditBadge(credits: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="credits">
            "Credits: "
            <span id="credits-display">{move || credits.get()}</span>
        </div>
    }
}
