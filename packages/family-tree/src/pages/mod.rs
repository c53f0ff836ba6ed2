//! Page components, one per route

pub mod admin;
pub mod public;

pub use admin::{Admin, Login};
pub use public::{Home, MemberDetail};
