//! Remote store and auth service seams.
//!
//! The stores only talk to these traits:
//! - `FamilyBackend`: rows of the `members` and `relationships` tables
//! - `AuthBackend`: session lookup, password sign-in, sign-out and
//!   session-change listeners
//!
//! `SupabaseBackend` implements both over the hosted project;
//! `MemoryBackend` implements both in memory for tests and offline work.
//!
//! Browser futures are not `Send`, so on wasm32 the traits are declared
//! with `async_trait(?Send)`.

mod memory;
mod supabase;

pub use memory::{BackendCall, MemoryBackend};
pub use supabase::SupabaseBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AuthEvent, Member, MemberPatch, NewMember, NewRelationship, Relationship, Session};

/// Row access for the family tree tables.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FamilyBackend: Send + Sync {
    /// All members, ordered by generation then full name.
    async fn list_members(&self) -> Result<Vec<Member>>;

    /// All relationships, unordered.
    async fn list_relationships(&self) -> Result<Vec<Relationship>>;

    /// Create a member and return the stored row.
    async fn insert_member(&self, data: &NewMember) -> Result<Member>;

    /// Update the member with `id` and return the stored row.
    async fn update_member(&self, id: &str, patch: &MemberPatch) -> Result<Member>;

    async fn delete_member(&self, id: &str) -> Result<()>;

    /// Create a relationship and return the stored row.
    async fn insert_relationship(&self, data: &NewRelationship) -> Result<Relationship>;

    async fn delete_relationship(&self, id: &str) -> Result<()>;
}

/// Callback invoked on every pushed session change.
pub type AuthListener = Arc<dyn Fn(AuthEvent, Option<Session>) + Send + Sync>;

/// Session management against the auth service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthBackend: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self) -> Result<()>;

    /// Register `listener` for every future session change.
    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription;
}

/// Handle for a registered auth listener.
///
/// The listener stays registered while the handle is alive. Call
/// `unsubscribe` at shutdown, or drop the handle.
#[must_use = "dropping the subscription removes the listener"]
pub struct AuthSubscription {
    teardown: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl AuthSubscription {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.teardown_now();
    }

    fn teardown_now(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.teardown_now();
    }
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}
