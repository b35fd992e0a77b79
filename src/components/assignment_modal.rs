//! Assignment Modal
//!
//! Form bound to the `AssignmentController` snapshot.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_controllers, use_planning_context};
use crate::controllers::{AssignmentField, AssignmentModal as ModalSnapshot};
use crate::models::ASSIGNMENT_STATUSES;

/// `<option>` list whose selection follows `current`
pub(crate) fn options_view(
    options: Vec<(String, String)>,
    current: impl Fn() -> String + Copy + Send + Sync + 'static,
) -> impl IntoView {
    options
        .into_iter()
        .map(|(value, label)| {
            let selected = value.clone();
            view! { <option value=value prop:selected=move || current() == selected>{label}</option> }
        })
        .collect_view()
}

#[component]
pub fn AssignmentModal() -> impl IntoView {
    let ctx = use_planning_context();
    let controllers = use_controllers();
    let config = ctx.config();

    let modal = Memo::new(move |_| {
        controllers.assignment_version.track();
        controllers.assignment().snapshot()
    });
    let value = move |field: AssignmentField| move || modal.with(|m: &ModalSnapshot| m.form.get(field).to_string());
    let on_input = move |field: AssignmentField| {
        move |ev: web_sys::Event| controllers.assignment().set_field(field, event_target_value(&ev))
    };

    let plannings: Vec<(String, String)> = config.plannings.iter().map(|p| (p.id.to_string(), p.nom.clone())).collect();
    let employees: Vec<(String, String)> = config
        .employees
        .iter()
        .map(|e| (e.matricule.clone(), e.display_name()))
        .collect();
    let sites: Vec<(String, String)> = config.sites.iter().map(|s| (s.id.to_string(), s.nom.clone())).collect();
    let statuses: Vec<(String, String)> = ASSIGNMENT_STATUSES
        .iter()
        .map(|(v, l)| (v.to_string(), l.to_string()))
        .collect();

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let assignment = controllers.assignment();
        spawn_local(async move { assignment.save().await });
    };
    let delete = move |_| {
        let assignment = controllers.assignment();
        spawn_local(async move { assignment.delete().await });
    };
    let close = move |_| controllers.assignment().close();

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
                        <label>"Planning"
                            <select on:change=on_input(AssignmentField::Planning)>
                                <option value="">"-- Choisir --"</option>
                                {options_view(plannings.clone(), value(AssignmentField::Planning))}
                            </select>
                        </label>
                        <label>"Employé"
                            <select on:change=on_input(AssignmentField::Employee)>
                                <option value="">"-- Choisir --"</option>
                                {options_view(employees.clone(), value(AssignmentField::Employee))}
                            </select>
                        </label>
                        <label>"Site"
                            <select on:change=move |ev| {
                                let site = event_target_value(&ev);
                                let assignment = controllers.assignment();
                                spawn_local(async move { assignment.select_site(site).await });
                            }>
                                <option value="">"-- Tous les sites --"</option>
                                {options_view(sites.clone(), value(AssignmentField::Site))}
                            </select>
                        </label>
                        <label>"Poste"
                            <select on:change=move |ev| controllers.assignment().select_post(event_target_value(&ev))>
                                <option value="">"-- Choisir --"</option>
                                {move || {
                                    let posts = modal.with(|m| {
                                        m.posts.iter().map(|p| (p.id.to_string(), p.nom.clone())).collect::<Vec<_>>()
                                    });
                                    options_view(posts, value(AssignmentField::Post))
                                }}
                            </select>
                        </label>
                        <label>"Date"
                            <input type="date" prop:value=value(AssignmentField::Date) on:input=on_input(AssignmentField::Date) />
                        </label>
                        <div class="form-row">
                            <label>"Début"
                                <input type="time" prop:value=value(AssignmentField::StartTime) on:input=on_input(AssignmentField::StartTime) />
                            </label>
                            <label>"Fin"
                                <input type="time" prop:value=value(AssignmentField::EndTime) on:input=on_input(AssignmentField::EndTime) />
                            </label>
                        </div>
                        <label>"Statut"
                            <select on:change=on_input(AssignmentField::Status)>
                                {options_view(statuses.clone(), value(AssignmentField::Status))}
                            </select>
                        </label>
                        <label>"Notes"
                            <textarea prop:value=value(AssignmentField::Notes) on:input=on_input(AssignmentField::Notes)></textarea>
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
