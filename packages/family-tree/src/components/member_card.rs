//! Member card component

use dioxus::prelude::*;

use crate::routes::Route;
use crate::types::Member;

/// Props for MemberCard
#[derive(Props, Clone, PartialEq)]
pub struct MemberCardProps {
    pub member: Member,
}

/// Card linking to a member's detail page
#[component]
pub fn MemberCard(props: MemberCardProps) -> Element {
    let member = &props.member;

    rsx! {
        Link {
            to: Route::MemberDetail { id: member.id.clone() },
            class: "member-card",
            div { strong { "{member.full_name}" } }
            if let Some(lifespan) = member.lifespan() {
                div { class: "muted", "{lifespan}" }
            }
            if let Some(place) = &member.birth_place {
                div { class: "muted", "{place}" }
            }
        }
    }
}

/// Titled list of member cards, hidden when empty
#[component]
pub fn MemberList(title: String, members: Vec<Member>) -> Element {
    if members.is_empty() {
        return rsx! {};
    }

    rsx! {
        section {
            class: "generation",
            h3 { "{title}" }
            div {
                class: "member-grid",
                for member in members {
                    MemberCard { key: "{member.id}", member: member.clone() }
                }
            }
        }
    }
}
