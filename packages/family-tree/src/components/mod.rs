//! Reusable UI components

mod loading;
mod member_card;
mod nav_bar;
mod route_guard;

pub use loading::*;
pub use member_card::*;
pub use nav_bar::*;
pub use route_guard::*;
