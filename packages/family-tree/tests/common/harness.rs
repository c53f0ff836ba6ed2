use std::sync::Arc;

use family_tree::backend::MemoryBackend;
use family_tree::state::{AuthStore, MemberStore};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Stores wired to one shared in-memory backend.
pub struct TestHarness {
    pub backend: Arc<MemoryBackend>,
    pub members: MemberStore,
    pub auth: AuthStore,
}

impl TestHarness {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new().with_account(ADMIN_EMAIL, ADMIN_PASSWORD));

        Self {
            members: MemberStore::new(backend.clone()),
            auth: AuthStore::new(backend.clone()),
            backend,
        }
    }

    /// Harness whose member store has already loaded the seeded rows.
    pub async fn loaded<F>(seed: F) -> (Self, super::Family)
    where
        F: FnOnce(&TestHarness) -> super::Family,
    {
        let harness = Self::new();
        let family = seed(&harness);
        harness.members.fetch_all().await;
        assert!(harness.members.error().is_none());
        (harness, family)
    }
}
