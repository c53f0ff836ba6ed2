//! Family tree application core.
//!
//! - [`types`]: member and relationship rows
//! - [`backend`]: remote store / auth seams with Supabase and in-memory implementations
//! - [`state`]: the member/relationship store and the auth store
//! - [`routes`]: route table and navigation guards
//!
//! With the `web` feature the crate also carries the Dioxus UI.

#![allow(non_snake_case)]

pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod components;
#[cfg(feature = "web")]
pub mod pages;

pub use error::{FamilyError, Result};
