//! Home Page: create an account or log in

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api;

#[component]
pub fn HomePage() -> impl IntoView {
    let (new_username, set_new_username) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let navigate = use_navigate();
    let register = {
        let navigate = navigate.clone();
        move |_| {
            let name = new_username.get_untracked();
            let pass = new_password.get_untracked();
            if name.trim().is_empty() || pass.is_empty() || busy.get_untracked() {
                return;
            }
            set_busy.set(true);
            set_error.set(None);

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match api::register(name.trim(), &pass).await {
                    Ok(account) => {
                        tracing::info!(username = %account.username, "Account created");
                        navigate("/study", Default::default());
                    }
                    Err(e) => set_error.set(Some(e.to_string())),
                }
                set_busy.set(false);
            });
        }
    };

    let login = move |_| {
        let name = username.get_untracked();
        let pass = password.get_untracked();
        if name.trim().is_empty() || pass.is_empty() || busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);

        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(name.trim(), &pass).await {
                Ok(account) => {
                    tracing::info!(username = %account.username, "Logged in");
                    navigate("/study", Default::default());
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="home">
            <header class="hero">
                <h1>"AI Study Buddy"</h1>
                <p class="tagline">"Paste your notes. Get flashcards. Flip to check yourself."</p>
            </header>

            <section class="auth">
                <div class="auth-card">
                    <h2>"New here?"</h2>
                    <input
                        type="text"
                        placeholder="Choose a username"
                        prop:value=move || new_username.get()
                        on:input=move |ev| set_new_username.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="Choose a password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| set_new_password.set(event_target_value(&ev))
                    />
                    <button class="btn btn-primary" on:click=register disabled=move || busy.get()>
                        "Create Account"
                    </button>
                </div>

                <div class="auth-card">
                    <h2>"Welcome back"</h2>
                    <input
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    <button class="btn" on:click=login disabled=move || busy.get()>
                        "Log In"
                    </button>
                </div>
            </section>

            {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
        </div>
    }
}
