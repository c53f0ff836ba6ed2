//! In-memory backend for testing and development.
//!
//! Behaves like the hosted store for everything the stores rely on:
//! identities and timestamps are assigned here, members come back ordered
//! by generation then name, and deleting a member cascades to its
//! relationships. Not suitable for production as data is lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{AuthBackend, AuthListener, AuthSubscription, FamilyBackend};
use crate::error::{FamilyError, Result};
use crate::types::{AuthEvent, Member, MemberPatch, NewMember, NewRelationship, Relationship, Session};

const SESSION_TTL_SECS: i64 = 3600;

/// Record of a call made to the memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCall {
    ListMembers,
    ListRelationships,
    InsertMember,
    UpdateMember,
    DeleteMember,
    InsertRelationship,
    DeleteRelationship,
    GetSession,
    SignIn,
    SignOut,
}

#[derive(Default)]
struct Tables {
    members: Vec<Member>,
    relationships: Vec<Relationship>,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, (String, String)>,
    session: Option<Session>,
    next_listener: u64,
    listeners: Vec<(u64, AuthListener)>,
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    auth: Arc<RwLock<AuthState>>,
    failures: RwLock<HashMap<BackendCall, String>>,
    calls: RwLock<Vec<BackendCall>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign in with `email` and `password`.
    pub fn with_account(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth
            .write()
            .expect("memory auth lock poisoned")
            .accounts
            .insert(email.into(), (password.into(), Uuid::new_v4().to_string()));
        self
    }

    /// Seed a member row directly, bypassing the call log.
    pub fn seed_member(&self, data: NewMember) -> Member {
        let member = build_member(data);
        self.tables
            .write()
            .expect("memory table lock poisoned")
            .members
            .push(member.clone());
        member
    }

    /// Seed a relationship row directly, bypassing the call log.
    pub fn seed_relationship(&self, data: NewRelationship) -> Relationship {
        let relationship = build_relationship(data);
        self.tables
            .write()
            .expect("memory table lock poisoned")
            .relationships
            .push(relationship.clone());
        relationship
    }

    /// Make the next `call` fail with `message`.
    pub fn fail_next(&self, call: BackendCall, message: impl Into<String>) {
        self.failures
            .write()
            .expect("memory failure lock poisoned")
            .insert(call, message.into());
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.read().expect("memory call lock poisoned").clone()
    }

    pub fn member_count(&self) -> usize {
        self.tables.read().expect("memory table lock poisoned").members.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.tables
            .read()
            .expect("memory table lock poisoned")
            .relationships
            .len()
    }

    pub fn listener_count(&self) -> usize {
        self.auth.read().expect("memory auth lock poisoned").listeners.len()
    }

    /// Replace the session as if the auth service pushed a change from
    /// elsewhere (another tab, a token refresh, a remote sign-out).
    pub fn push_session(&self, event: AuthEvent, session: Option<Session>) {
        self.auth.write().expect("memory auth lock poisoned").session = session.clone();
        notify(&self.auth, event, session);
    }

    fn record(&self, call: BackendCall) -> Result<()> {
        self.calls
            .write()
            .expect("memory call lock poisoned")
            .push(call);

        match self
            .failures
            .write()
            .expect("memory failure lock poisoned")
            .remove(&call)
        {
            Some(message) => Err(FamilyError::Remote(message)),
            None => Ok(()),
        }
    }
}

fn build_member(data: NewMember) -> Member {
    let now = Utc::now();
    Member {
        id: Uuid::new_v4().to_string(),
        full_name: data.full_name,
        gender: data.gender,
        birth_date: data.birth_date,
        death_date: data.death_date,
        birth_place: data.birth_place,
        avatar_url: data.avatar_url,
        bio: data.bio,
        generation: data.generation,
        created_at: now,
        updated_at: now,
    }
}

fn build_relationship(data: NewRelationship) -> Relationship {
    Relationship {
        id: Uuid::new_v4().to_string(),
        from_member_id: data.from_member_id,
        to_member_id: data.to_member_id,
        relation_type: data.relation_type,
        created_at: Utc::now(),
    }
}

fn notify(auth: &RwLock<AuthState>, event: AuthEvent, session: Option<Session>) {
    let listeners: Vec<AuthListener> = auth
        .read()
        .expect("memory auth lock poisoned")
        .listeners
        .iter()
        .map(|(_, l)| l.clone())
        .collect();

    for listener in listeners {
        listener(event, session.clone());
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FamilyBackend for MemoryBackend {
    async fn list_members(&self) -> Result<Vec<Member>> {
        self.record(BackendCall::ListMembers)?;
        let mut members = self
            .tables
            .read()
            .expect("memory table lock poisoned")
            .members
            .clone();
        members.sort_by(|a, b| {
            a.generation
                .cmp(&b.generation)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        Ok(members)
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>> {
        self.record(BackendCall::ListRelationships)?;
        Ok(self
            .tables
            .read()
            .expect("memory table lock poisoned")
            .relationships
            .clone())
    }

    async fn insert_member(&self, data: &NewMember) -> Result<Member> {
        self.record(BackendCall::InsertMember)?;
        Ok(self.seed_member(data.clone()))
    }

    async fn update_member(&self, id: &str, patch: &MemberPatch) -> Result<Member> {
        self.record(BackendCall::UpdateMember)?;
        let mut tables = self.tables.write().expect("memory table lock poisoned");
        let member = tables
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| {
                FamilyError::remote("JSON object requested, multiple (or no) rows returned")
            })?;

        patch.apply_to(member);
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn delete_member(&self, id: &str) -> Result<()> {
        self.record(BackendCall::DeleteMember)?;
        let mut tables = self.tables.write().expect("memory table lock poisoned");
        tables.members.retain(|m| m.id != id);
        tables.relationships.retain(|r| !r.touches(id));
        Ok(())
    }

    async fn insert_relationship(&self, data: &NewRelationship) -> Result<Relationship> {
        self.record(BackendCall::InsertRelationship)?;
        {
            let tables = self.tables.read().expect("memory table lock poisoned");
            for member_id in [&data.from_member_id, &data.to_member_id] {
                if !tables.members.iter().any(|m| &m.id == member_id) {
                    return Err(FamilyError::remote(
                        "insert or update on table \"relationships\" violates foreign key constraint",
                    ));
                }
            }
        }
        Ok(self.seed_relationship(data.clone()))
    }

    async fn delete_relationship(&self, id: &str) -> Result<()> {
        self.record(BackendCall::DeleteRelationship)?;
        self.tables
            .write()
            .expect("memory table lock poisoned")
            .relationships
            .retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthBackend for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>> {
        self.record(BackendCall::GetSession)?;
        Ok(self.auth.read().expect("memory auth lock poisoned").session.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.record(BackendCall::SignIn)?;
        let session = {
            let mut auth = self.auth.write().expect("memory auth lock poisoned");
            let user_id = match auth.accounts.get(email) {
                Some((expected, user_id)) if expected == password => user_id.clone(),
                _ => return Err(FamilyError::remote("Invalid login credentials")),
            };

            let session = Session {
                access_token: Uuid::new_v4().to_string(),
                refresh_token: Uuid::new_v4().to_string(),
                user_id,
                email: Some(email.to_string()),
                expires_at: Some(Utc::now().timestamp() + SESSION_TTL_SECS),
            };
            auth.session = Some(session.clone());
            session
        };

        notify(&self.auth, AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.record(BackendCall::SignOut)?;
        self.auth.write().expect("memory auth lock poisoned").session = None;
        notify(&self.auth, AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription {
        let (id, current) = {
            let mut auth = self.auth.write().expect("memory auth lock poisoned");
            auth.next_listener += 1;
            let id = auth.next_listener;
            auth.listeners.push((id, listener.clone()));
            (id, auth.session.clone())
        };

        listener(AuthEvent::InitialSession, current);

        let registry = Arc::downgrade(&self.auth);
        AuthSubscription::new(move || {
            if let Some(auth) = registry.upgrade() {
                auth.write()
                    .expect("memory auth lock poisoned")
                    .listeners
                    .retain(|(other, _)| *other != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn members_are_listed_by_generation_then_name() {
        let backend = MemoryBackend::new();
        backend.seed_member(NewMember::new("Minh", 2));
        backend.seed_member(NewMember::new("An", 2));
        backend.seed_member(NewMember::new("Zed", 1));

        let names: Vec<String> = backend
            .list_members()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.full_name)
            .collect();
        assert_eq!(names, vec!["Zed", "An", "Minh"]);
    }

    #[tokio::test]
    async fn delete_member_cascades_remotely() {
        let backend = MemoryBackend::new();
        let a = backend.seed_member(NewMember::new("A", 1));
        let b = backend.seed_member(NewMember::new("B", 2));
        let c = backend.seed_member(NewMember::new("C", 1));
        backend.seed_relationship(NewRelationship::parent(&a.id, &b.id));
        backend.seed_relationship(NewRelationship::spouse(&c.id, &a.id));
        backend.seed_relationship(NewRelationship::parent(&c.id, &b.id));

        backend.delete_member(&a.id).await.unwrap();

        assert_eq!(backend.member_count(), 2);
        assert_eq!(backend.relationship_count(), 1);
    }

    #[tokio::test]
    async fn injected_failure_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next(BackendCall::ListMembers, "connection reset");

        let err = backend.list_members().await.unwrap_err();
        assert_eq!(err, FamilyError::remote("connection reset"));
        assert!(backend.list_members().await.is_ok());
        assert_eq!(
            backend.calls(),
            vec![BackendCall::ListMembers, BackendCall::ListMembers]
        );
    }

    #[tokio::test]
    async fn relationship_requires_existing_members() {
        let backend = MemoryBackend::new();
        let a = backend.seed_member(NewMember::new("A", 1));

        let err = backend
            .insert_relationship(&NewRelationship::parent(&a.id, "missing"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("foreign key"));
        assert_eq!(backend.relationship_count(), 0);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let backend = MemoryBackend::new().with_account("admin@example.com", "hunter2");

        let err = backend
            .sign_in_with_password("admin@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let session = backend
            .sign_in_with_password("admin@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.email.as_deref(), Some("admin@example.com"));
    }
}
