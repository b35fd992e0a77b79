//! Event Modal
//!
//! Form bound to the `EventController` snapshot, with a participant
//! multi-select.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use super::assignment_modal::options_view;
use crate::context::{use_controllers, use_planning_context};
use crate::controllers::EventField;
use crate::models::EVENT_TYPES;

/// Values of the selected options of a `<select multiple>`
fn selected_values(ev: &web_sys::Event) -> Vec<String> {
    let Some(select) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok()) else {
        return Vec::new();
    };
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<web_sys::HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

#[component]
pub fn EventModal() -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();

    let modal = Memo::new(move |_| {
        controllers.event_version.track();
        controllers.event().snapshot()
    });
    let value = move |field: EventField| move || modal.with(|m| m.form.get(field).to_string());
    let on_input = move |field: EventField| {
        move |ev: web_sys::Event| controllers.event().set_field(field, event_target_value(&ev))
    };

    let employees: Vec<(String, String)> = ctx
        .config()
        .employees
        .iter()
        .map(|e| (e.matricule.clone(), e.display_name()))
        .collect();
    let types: Vec<(String, String)> = EVENT_TYPES.iter().map(|(v, l)| (v.to_string(), l.to_string())).collect();

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let event = controllers.event();
        spawn_local(async move { event.save().await });
    };
    let delete = move |_| {
        let event = controllers.event();
        spawn_local(async move { event.delete().await });
    };
    let close = move |_| controllers.event().close();

    view! {
        <Show when=move || modal.with(|m| m.session.is_open())>
            <div class="modal-backdrop">
                <div class="modal" role="dialog">
                    <header class="modal-header">
                        <h3>{move || modal.with(|m| m.title())}</h3>
                        <button type="button" class="modal-close" on:click=close>"×"</button>
                    </header>
                    {move || modal.with(|m| m.session.is_loading())
                        .then(|| view! { <p class="modal-loading">"Chargement…"</p> })}
                    <form class="modal-body" on:submit=save>
                        <label>"Titre"
                            <input type="text" prop:value=value(EventField::Title) on:input=on_input(EventField::Title) />
                        </label>
                        <label>"Type"
                            <select on:change=on_input(EventField::EventType)>
                                {options_view(types.clone(), value(EventField::EventType))}
                            </select>
                        </label>
                        <div class="form-row">
                            <label>"Début"
                                <input type="datetime-local" prop:value=value(EventField::Start) on:input=on_input(EventField::Start) />
                            </label>
                            <label>"Fin"
                                <input type="datetime-local" prop:value=value(EventField::End) on:input=on_input(EventField::End) />
                            </label>
                        </div>
                        <label>"Lieu"
                            <input type="text" prop:value=value(EventField::Location) on:input=on_input(EventField::Location) />
                        </label>
                        <label>"Description"
                            <textarea prop:value=value(EventField::Description) on:input=on_input(EventField::Description)></textarea>
                        </label>
                        <label>"Participants"
                            <select
                                multiple
                                class="participants"
                                on:change=move |ev| controllers.event().set_participants(selected_values(&ev))
                            >
                                {employees.clone().into_iter().map(|(matricule, name)| {
                                    let key = matricule.clone();
                                    view! {
                                        <option
                                            value=matricule
                                            prop:selected=move || modal.with(|m| m.form.participants.contains(&key))
                                        >
                                            {name}
                                        </option>
                                    }
                                }).collect_view()}
                            </select>
                        </label>
                        <footer class="modal-footer">
                            <Show when=move || modal.with(|m| m.shows_delete())>
                                <button type="button" class="danger" on:click=delete>"Supprimer"</button>
                            </Show>
                            <button type="button" on:click=close>"Annuler"</button>
                            <button type="submit" class="primary" prop:disabled=move || !modal.with(|m| m.can_submit())>
                                "Enregistrer"
                            </button>
                        </footer>
                    </form>
                </div>
            </div>
        </Show>
    }
}
