//! Row types for the `members` and `relationships` tables
//!
//! Field names match the table columns.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub full_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// Only used for default ordering.
    pub generation: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Short life span for display: "1920 – 1990", "b. 1950", "d. 1990".
    pub fn lifespan(&self) -> Option<String> {
        match (self.birth_date, self.death_date) {
            (Some(birth), Some(death)) => Some(format!("{} – {}", birth.year(), death.year())),
            (Some(birth), None) => Some(format!("b. {}", birth.year())),
            (None, Some(death)) => Some(format!("d. {}", death.year())),
            (None, None) => None,
        }
    }
}

/// Fields required to create a member. Identity and timestamps are assigned
/// by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub full_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub generation: i32,
}

impl NewMember {
    pub fn new(full_name: impl Into<String>, generation: i32) -> Self {
        Self {
            full_name: full_name.into(),
            gender: None,
            birth_date: None,
            death_date: None,
            birth_place: None,
            avatar_url: None,
            bio: None,
            generation,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }
}

/// Partial update of a member.
///
/// `None` leaves the column untouched. For nullable columns `Some(None)`
/// clears the value (sent as JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<Gender>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,
}

impl MemberPatch {
    /// Apply the patch to a member in place.
    pub fn apply_to(&self, member: &mut Member) {
        if let Some(full_name) = &self.full_name {
            member.full_name = full_name.clone();
        }
        if let Some(gender) = self.gender {
            member.gender = gender;
        }
        if let Some(birth_date) = self.birth_date {
            member.birth_date = birth_date;
        }
        if let Some(death_date) = self.death_date {
            member.death_date = death_date;
        }
        if let Some(birth_place) = &self.birth_place {
            member.birth_place = birth_place.clone();
        }
        if let Some(avatar_url) = &self.avatar_url {
            member.avatar_url = avatar_url.clone();
        }
        if let Some(bio) = &self.bio {
            member.bio = bio.clone();
        }
        if let Some(generation) = self.generation {
            member.generation = generation;
        }
    }
}

// ============================================================================
// Relationships
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// Directed: `from` is the parent, `to` is the child.
    Parent,
    /// Undirected: endpoint order carries no meaning.
    Spouse,
}

impl RelationType {
    pub fn label(&self) -> &'static str {
        match self {
            RelationType::Parent => "Parent",
            RelationType::Spouse => "Spouse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub from_member_id: String,
    pub to_member_id: String,
    pub relation_type: RelationType,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    /// Whether `member_id` is either endpoint.
    pub fn touches(&self, member_id: &str) -> bool {
        self.from_member_id == member_id || self.to_member_id == member_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRelationship {
    pub from_member_id: String,
    pub to_member_id: String,
    pub relation_type: RelationType,
}

impl NewRelationship {
    pub fn parent(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            from_member_id: parent_id.into(),
            to_member_id: child_id.into(),
            relation_type: RelationType::Parent,
        }
    }

    pub fn spouse(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            from_member_id: a.into(),
            to_member_id: b.into(),
            relation_type: RelationType::Spouse,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Authenticated session as seen by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub email: Option<String>,
    /// Unix timestamp (seconds).
    pub expires_at: Option<i64>,
}

/// Kinds of session change pushed by the auth backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}
