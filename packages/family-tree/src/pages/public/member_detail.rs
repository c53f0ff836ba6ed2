//! Member detail page

use dioxus::prelude::*;

use crate::components::{LoadingSpinner, MemberList};
use crate::state::use_app_state;

/// One member with their parents, spouses and children
#[component]
pub fn MemberDetail(id: String) -> Element {
    let state = use_app_state();
    state.track();

    let Some(member) = state.members.get_member_by_id(&id) else {
        if state.members.is_loading() {
            return rsx! {
                LoadingSpinner {}
            };
        }
        return rsx! {
            h1 { "Member not found" }
            p { class: "muted", "No member with id {id}." }
        };
    };

    let parents = state.members.get_parents_of(&id);
    let spouses = state.members.get_spouse_of(&id);
    let children = state.members.get_children_of(&id);

    rsx! {
        article {
            if let Some(avatar) = &member.avatar_url {
                img { src: "{avatar}", alt: "{member.full_name}", width: "120" }
            }
            h1 { "{member.full_name}" }
            if let Some(lifespan) = member.lifespan() {
                p { class: "muted", "{lifespan}" }
            }

            table {
                tbody {
                    tr {
                        th { "Generation" }
                        td { "{member.generation}" }
                    }
                    if let Some(gender) = member.gender {
                        tr {
                            th { "Gender" }
                            td { "{gender.label()}" }
                        }
                    }
                    if let Some(date) = member.birth_date {
                        tr {
                            th { "Born" }
                            td { "{date}" }
                        }
                    }
                    if let Some(date) = member.death_date {
                        tr {
                            th { "Died" }
                            td { "{date}" }
                        }
                    }
                    if let Some(place) = &member.birth_place {
                        tr {
                            th { "Birth place" }
                            td { "{place}" }
                        }
                    }
                }
            }

            if let Some(bio) = &member.bio {
                p { "{bio}" }
            }
        }

        MemberList { title: "Parents".to_string(), members: parents }
        MemberList { title: "Spouses".to_string(), members: spouses }
        MemberList { title: "Children".to_string(), members: children }
    }
}
