//! Detail Modal
//!
//! Read-only key/value table for viewers without edit rights.

use leptos::prelude::*;

use crate::context::use_controllers;

#[component]
pub fn DetailModal() -> impl IntoView {
    let controllers = use_controllers();
    let modal = Memo::new(move |_| {
        controllers.detail_version.track();
        controllers.detail().snapshot()
    });
    let close = move |_| controllers.detail().close();

    view! {
        <Show when=move || modal.with(|m| m.open)>
            <div class="modal-backdrop" on:click=close>
                <div class="modal modal-detail" role="dialog" on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()>
                    <header class="modal-header">
                        <h3>{move || modal.with(|m| m.title().to_string())}</h3>
                        <button type="button" class="modal-close" on:click=close>"×"</button>
                    </header>
                    <Show
                        when=move || modal.with(|m| !m.loading)
                        fallback=|| view! { <p class="modal-loading">"Chargement…"</p> }
                    >
                        // Every value is escaped by `DetailTable::to_html`
                        <div
                            class="modal-body"
                            inner_html=move || modal.with(|m| m.table.as_ref().map(|t| t.to_html()).unwrap_or_default())
                        ></div>
                    </Show>
                    <footer class="modal-footer">
                        <button type="button" on:click=close>"Fermer"</button>
                    </footer>
                </div>
            </div>
        </Show>
    }
}
