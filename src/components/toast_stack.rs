//! Toast Stack
//!
//! Renders the toasts pushed through `Toasts`.

use leptos::prelude::*;

use crate::toast::{use_toasts, Toast};

#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast-stack" aria-live="polite">
            <For
                each=move || toasts.items.get()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.level.css_class() role="status" on:click=move |_| toasts.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
