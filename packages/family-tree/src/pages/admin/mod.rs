//! Pages behind the auth guards

mod dashboard;
mod login;

pub use dashboard::*;
pub use login::*;
