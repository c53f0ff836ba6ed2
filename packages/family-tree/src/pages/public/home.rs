//! Home page component

use std::collections::BTreeMap;

use dioxus::prelude::*;

use crate::components::{ErrorBanner, LoadingSpinner, MemberList};
use crate::state::use_app_state;
use crate::types::Member;

/// Home page - every member, grouped by generation
#[component]
pub fn Home() -> Element {
    let state = use_app_state();
    state.track();

    let members = state.members.members();
    let error = state.members.error();
    let is_loading = state.members.is_loading();

    // Group in list order so names stay sorted within a generation
    let mut generations: BTreeMap<i32, Vec<Member>> = BTreeMap::new();
    for member in members.iter() {
        generations
            .entry(member.generation)
            .or_default()
            .push(member.clone());
    }

    rsx! {
        h1 { "Family Tree" }

        if let Some(message) = error {
            ErrorBanner { message }
        }

        if is_loading && members.is_empty() {
            LoadingSpinner {}
        } else if members.is_empty() {
            p { class: "muted", "No members yet." }
        } else {
            for (generation, group) in generations {
                MemberList {
                    key: "{generation}",
                    title: format!("Generation {generation}"),
                    members: group,
                }
            }
        }
    }
}
