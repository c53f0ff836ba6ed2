//! Member and relationship store
//!
//! Owns the in-memory copy of both tables. Mutations go to the backend
//! first and are mirrored locally only once the backend accepted them.
//!
//! Two error policies coexist: `fetch_all` records its failure in
//! `error` and returns normally, every mutation returns its failure to the
//! caller and records nothing.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::FamilyBackend;
use crate::error::Result;
use crate::types::{Member, MemberPatch, NewMember, NewRelationship, RelationType, Relationship};

#[derive(Debug, Default)]
struct MemberState {
    /// Ordered by generation then name as of the last `fetch_all`.
    members: Vec<Member>,
    relationships: Vec<Relationship>,
    loading: bool,
    error: Option<String>,
}

/// Cloneable handle to the member/relationship cache.
#[derive(Clone)]
pub struct MemberStore {
    backend: Arc<dyn FamilyBackend>,
    state: Arc<RwLock<MemberState>>,
}

impl MemberStore {
    pub fn new(backend: Arc<dyn FamilyBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(MemberState::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MemberState> {
        self.state.read().expect("member store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemberState> {
        self.state.write().expect("member store lock poisoned")
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    pub fn members(&self) -> Vec<Member> {
        self.read().members.clone()
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.read().relationships.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Message of the last failed `fetch_all`, cleared by the next one.
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    // ------------------------------------------------------------------------
    // Remote operations
    // ------------------------------------------------------------------------

    /// Reload both tables.
    ///
    /// Both reads are in flight at once. On success both lists are replaced
    /// wholesale; on failure they keep their previous contents and the
    /// message is stored in `error`. Never returns an error.
    pub async fn fetch_all(&self) {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }

        let result = futures::try_join!(
            self.backend.list_members(),
            self.backend.list_relationships()
        );

        let mut state = self.write();
        match result {
            Ok((members, relationships)) => {
                tracing::info!(
                    members = members.len(),
                    relationships = relationships.len(),
                    "Family tree loaded"
                );
                state.members = members;
                state.relationships = relationships;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load family tree");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    /// Create a member and append it to the local list.
    ///
    /// The new member goes to the end; the list is not re-sorted until the
    /// next `fetch_all`.
    pub async fn add_member(&self, data: NewMember) -> Result<Member> {
        let created = self.backend.insert_member(&data).await?;
        tracing::debug!(member_id = %created.id, "Member created");

        self.write().members.push(created.clone());
        Ok(created)
    }

    /// Apply a partial update and replace the local copy in place.
    ///
    /// If the member is not in the local list nothing changes locally, even
    /// though the remote update went through.
    pub async fn update_member(&self, id: &str, patch: MemberPatch) -> Result<()> {
        let updated = self.backend.update_member(id, &patch).await?;
        tracing::debug!(member_id = %id, "Member updated");

        let mut state = self.write();
        if let Some(slot) = state.members.iter_mut().find(|m| m.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Delete a member, dropping every local relationship that references it.
    pub async fn delete_member(&self, id: &str) -> Result<()> {
        self.backend.delete_member(id).await?;
        tracing::debug!(member_id = %id, "Member deleted");

        let mut state = self.write();
        state.members.retain(|m| m.id != id);
        state.relationships.retain(|r| !r.touches(id));
        Ok(())
    }

    pub async fn add_relationship(&self, data: NewRelationship) -> Result<Relationship> {
        let created = self.backend.insert_relationship(&data).await?;
        tracing::debug!(
            relationship_id = %created.id,
            relation_type = created.relation_type.label(),
            "Relationship created"
        );

        self.write().relationships.push(created.clone());
        Ok(created)
    }

    pub async fn delete_relationship(&self, id: &str) -> Result<()> {
        self.backend.delete_relationship(id).await?;
        tracing::debug!(relationship_id = %id, "Relationship deleted");

        self.write().relationships.retain(|r| r.id != id);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Derived queries (local snapshot only)
    // ------------------------------------------------------------------------

    pub fn get_member_by_id(&self, id: &str) -> Option<Member> {
        self.read().members.iter().find(|m| m.id == id).cloned()
    }

    /// Members that `member_id` is a parent of.
    pub fn get_children_of(&self, member_id: &str) -> Vec<Member> {
        let state = self.read();
        let child_ids: Vec<&str> = state
            .relationships
            .iter()
            .filter(|r| r.relation_type == RelationType::Parent && r.from_member_id == member_id)
            .map(|r| r.to_member_id.as_str())
            .collect();
        members_in(&state.members, &child_ids)
    }

    /// Members that are a parent of `member_id`.
    pub fn get_parents_of(&self, member_id: &str) -> Vec<Member> {
        let state = self.read();
        let parent_ids: Vec<&str> = state
            .relationships
            .iter()
            .filter(|r| r.relation_type == RelationType::Parent && r.to_member_id == member_id)
            .map(|r| r.from_member_id.as_str())
            .collect();
        members_in(&state.members, &parent_ids)
    }

    /// Members joined to `member_id` by a spouse edge, whichever end it is on.
    pub fn get_spouse_of(&self, member_id: &str) -> Vec<Member> {
        let state = self.read();
        let spouse_ids: Vec<&str> = state
            .relationships
            .iter()
            .filter(|r| r.relation_type == RelationType::Spouse && r.touches(member_id))
            .map(|r| {
                if r.from_member_id == member_id {
                    r.to_member_id.as_str()
                } else {
                    r.from_member_id.as_str()
                }
            })
            .collect();
        members_in(&state.members, &spouse_ids)
    }
}

/// Members whose id is in `ids`, in member-list order.
fn members_in(members: &[Member], ids: &[&str]) -> Vec<Member> {
    members
        .iter()
        .filter(|m| ids.contains(&m.id.as_str()))
        .cloned()
        .collect()
}
