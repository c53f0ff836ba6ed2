use async_trait::async_trait;
use supabase_client::{AuthChangeEvent, SupabaseClient};

use super::{AuthBackend, AuthListener, AuthSubscription, FamilyBackend};
use crate::error::Result;
use crate::types::{AuthEvent, Member, MemberPatch, NewMember, NewRelationship, Relationship, Session};

const MEMBERS: &str = "members";
const RELATIONSHIPS: &str = "relationships";

/// Backend over a hosted Supabase project.
#[derive(Clone)]
pub struct SupabaseBackend {
    client: SupabaseClient,
}

impl SupabaseBackend {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

impl From<supabase_client::Session> for Session {
    fn from(session: supabase_client::Session) -> Self {
        Session {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user_id: session.user.id,
            email: session.user.email,
            expires_at: session.expires_at,
        }
    }
}

impl From<AuthChangeEvent> for AuthEvent {
    fn from(event: AuthChangeEvent) -> Self {
        match event {
            AuthChangeEvent::InitialSession => AuthEvent::InitialSession,
            AuthChangeEvent::SignedIn => AuthEvent::SignedIn,
            AuthChangeEvent::SignedOut => AuthEvent::SignedOut,
            AuthChangeEvent::TokenRefreshed => AuthEvent::TokenRefreshed,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FamilyBackend for SupabaseBackend {
    async fn list_members(&self) -> Result<Vec<Member>> {
        let members = self
            .client
            .from(MEMBERS)
            .await?
            .select("*")
            .order("generation", true)
            .order("full_name", true)
            .execute()
            .await?;
        Ok(members)
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>> {
        let relationships = self
            .client
            .from(RELATIONSHIPS)
            .await?
            .select("*")
            .execute()
            .await?;
        Ok(relationships)
    }

    async fn insert_member(&self, data: &NewMember) -> Result<Member> {
        let created = self
            .client
            .from(MEMBERS)
            .await?
            .insert(data)
            .select("*")
            .single()
            .await?;
        Ok(created)
    }

    async fn update_member(&self, id: &str, patch: &MemberPatch) -> Result<Member> {
        let updated = self
            .client
            .from(MEMBERS)
            .await?
            .update(patch)
            .eq("id", id)
            .select("*")
            .single()
            .await?;
        Ok(updated)
    }

    async fn delete_member(&self, id: &str) -> Result<()> {
        self.client
            .from(MEMBERS)
            .await?
            .delete()
            .eq("id", id)
            .execute_empty()
            .await?;
        Ok(())
    }

    async fn insert_relationship(&self, data: &NewRelationship) -> Result<Relationship> {
        let created = self
            .client
            .from(RELATIONSHIPS)
            .await?
            .insert(data)
            .select("*")
            .single()
            .await?;
        Ok(created)
    }

    async fn delete_relationship(&self, id: &str) -> Result<()> {
        self.client
            .from(RELATIONSHIPS)
            .await?
            .delete()
            .eq("id", id)
            .execute_empty()
            .await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthBackend for SupabaseBackend {
    async fn get_session(&self) -> Result<Option<Session>> {
        let session = self.client.auth().get_session().await?;
        Ok(session.map(Session::from))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .client
            .auth()
            .sign_in_with_password(email, password)
            .await?;
        Ok(session.into())
    }

    async fn sign_out(&self) -> Result<()> {
        self.client.auth().sign_out().await?;
        Ok(())
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> AuthSubscription {
        let subscription = self
            .client
            .auth()
            .on_auth_state_change(move |event, session| {
                listener(event.into(), session.map(Session::from));
            });

        AuthSubscription::new(move || subscription.unsubscribe())
    }
}
