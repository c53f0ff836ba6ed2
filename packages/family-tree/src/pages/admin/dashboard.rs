//! Admin page: edit members and relationships

use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::components::ErrorBanner;
use crate::routes::Route;
use crate::state::{use_app_state, AppState};
use crate::types::{Gender, Member, NewMember, NewRelationship};

/// Admin page
#[component]
pub fn Admin() -> Element {
    let state = use_app_state();
    state.track();

    let error = use_signal(|| None::<String>);
    let members = state.members.members();

    rsx! {
        h1 { "Admin" }

        if let Some(message) = error() {
            ErrorBanner { message }
        }
        if let Some(message) = state.members.error() {
            ErrorBanner { message }
        }

        AddMemberForm { error }
        AddRelationshipForm { members: members.clone(), error }
        MemberTable { members: members.clone(), error }
        RelationshipTable { members, error }
    }
}

fn parse_gender(value: &str) -> Option<Gender> {
    match value {
        "male" => Some(Gender::Male),
        "female" => Some(Gender::Female),
        "unknown" => Some(Gender::Unknown),
        _ => None,
    }
}

fn member_name(members: &[Member], id: &str) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.full_name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Run a store operation, then either re-render or show its error.
fn run<F>(state: AppState, mut error: Signal<Option<String>>, op: F)
where
    F: std::future::Future<Output = crate::Result<()>> + 'static,
{
    spawn(async move {
        error.set(None);
        if let Err(e) = op.await {
            error.set(Some(e.to_string()));
        }
        state.touch();
    });
}

#[component]
fn AddMemberForm(error: Signal<Option<String>>) -> Element {
    let state = use_app_state();

    let mut full_name = use_signal(String::new);
    let mut generation = use_signal(|| "1".to_string());
    let mut gender = use_signal(String::new);
    let mut birth_date = use_signal(String::new);
    let mut birth_place = use_signal(String::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut error = error;

        let name = full_name().trim().to_string();
        if name.is_empty() {
            error.set(Some("Name is required".to_string()));
            return;
        }
        let Ok(generation_value) = generation().trim().parse::<i32>() else {
            error.set(Some("Generation must be a whole number".to_string()));
            return;
        };

        let mut data = NewMember::new(name, generation_value);
        data.gender = parse_gender(&gender());
        data.birth_date = NaiveDate::parse_from_str(birth_date().trim(), "%Y-%m-%d").ok();
        let place = birth_place().trim().to_string();
        data.birth_place = (!place.is_empty()).then_some(place);

        let members = state.members.clone();
        run(state.clone(), error, async move {
            members.add_member(data).await?;
            full_name.set(String::new());
            birth_date.set(String::new());
            birth_place.set(String::new());
            Ok(())
        });
    };

    rsx! {
        section {
            class: "generation",
            h2 { "Add member" }
            form {
                class: "stack",
                onsubmit: handle_submit,
                input {
                    placeholder: "Full name",
                    value: "{full_name}",
                    oninput: move |e| full_name.set(e.value()),
                }
                input {
                    r#type: "number",
                    placeholder: "Generation",
                    value: "{generation}",
                    oninput: move |e| generation.set(e.value()),
                }
                select {
                    value: "{gender}",
                    onchange: move |e| gender.set(e.value()),
                    option { value: "", "Gender" }
                    option { value: "male", "Male" }
                    option { value: "female", "Female" }
                    option { value: "unknown", "Unknown" }
                }
                input {
                    r#type: "date",
                    value: "{birth_date}",
                    oninput: move |e| birth_date.set(e.value()),
                }
                input {
                    placeholder: "Birth place",
                    value: "{birth_place}",
                    oninput: move |e| birth_place.set(e.value()),
                }
                button { r#type: "submit", "Add member" }
            }
        }
    }
}

#[component]
fn AddRelationshipForm(members: Vec<Member>, error: Signal<Option<String>>) -> Element {
    let state = use_app_state();

    let mut from_id = use_signal(String::new);
    let mut to_id = use_signal(String::new);
    let mut relation = use_signal(|| "parent".to_string());

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut error = error;

        let (from, to) = (from_id(), to_id());
        if from.is_empty() || to.is_empty() {
            error.set(Some("Pick both members".to_string()));
            return;
        }
        let data = if relation() == "spouse" {
            NewRelationship::spouse(from, to)
        } else {
            NewRelationship::parent(from, to)
        };

        let members = state.members.clone();
        run(state.clone(), error, async move {
            members.add_relationship(data).await?;
            Ok(())
        });
    };

    rsx! {
        section {
            class: "generation",
            h2 { "Add relationship" }
            form {
                class: "stack",
                onsubmit: handle_submit,
                select {
                    value: "{from_id}",
                    onchange: move |e| from_id.set(e.value()),
                    option { value: "", "From (parent / spouse)" }
                    for member in members.iter() {
                        option { key: "{member.id}", value: "{member.id}", "{member.full_name}" }
                    }
                }
                select {
                    value: "{relation}",
                    onchange: move |e| relation.set(e.value()),
                    option { value: "parent", "is parent of" }
                    option { value: "spouse", "is spouse of" }
                }
                select {
                    value: "{to_id}",
                    onchange: move |e| to_id.set(e.value()),
                    option { value: "", "To (child / spouse)" }
                    for member in members.iter() {
                        option { key: "{member.id}", value: "{member.id}", "{member.full_name}" }
                    }
                }
                button { r#type: "submit", "Add relationship" }
            }
        }
    }
}

#[component]
fn MemberTable(members: Vec<Member>, error: Signal<Option<String>>) -> Element {
    let state = use_app_state();

    rsx! {
        section {
            class: "generation",
            h2 { "Members" }
            table {
                tbody {
                    for member in members {
                        tr {
                            key: "{member.id}",
                            td {
                                Link {
                                    to: Route::MemberDetail { id: member.id.clone() },
                                    "{member.full_name}"
                                }
                            }
                            td { "{member.generation}" }
                            td {
                                button {
                                    onclick: {
                                        let state = state.clone();
                                        let id = member.id.clone();
                                        move |_| {
                                            let store = state.members.clone();
                                            let id = id.clone();
                                            run(state.clone(), error, async move {
                                                store.delete_member(&id).await
                                            });
                                        }
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RelationshipTable(members: Vec<Member>, error: Signal<Option<String>>) -> Element {
    let state = use_app_state();
    let relationships = state.members.relationships();

    rsx! {
        section {
            class: "generation",
            h2 { "Relationships" }
            table {
                tbody {
                    for rel in relationships {
                        tr {
                            key: "{rel.id}",
                            td { "{member_name(&members, &rel.from_member_id)}" }
                            td { class: "muted", "{rel.relation_type.label()}" }
                            td { "{member_name(&members, &rel.to_member_id)}" }
                            td {
                                button {
                                    onclick: {
                                        let state = state.clone();
                                        let id = rel.id.clone();
                                        move |_| {
                                            let store = state.members.clone();
                                            let id = id.clone();
                                            run(state.clone(), error, async move {
                                                store.delete_relationship(&id).await
                                            });
                                        }
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
