//! Public pages

mod home;
mod member_detail;

pub use home::*;
pub use member_detail::*;
