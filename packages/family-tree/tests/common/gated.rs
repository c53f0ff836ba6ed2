use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use family_tree::backend::{FamilyBackend, MemoryBackend};
use family_tree::types::{Member, MemberPatch, NewMember, NewRelationship, Relationship};
use family_tree::Result;
use tokio::sync::Semaphore;

/// Memory backend whose list reads block until `release` is called.
pub struct GatedBackend {
    pub inner: MemoryBackend,
    started: AtomicUsize,
    finished: AtomicUsize,
    gate: Semaphore,
}

impl GatedBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }

    /// Reads that have started but not yet returned.
    pub fn reads_in_flight(&self) -> usize {
        self.started.load(Ordering::SeqCst) - self.finished.load(Ordering::SeqCst)
    }

    pub fn reads_finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Let every blocked and future read through.
    pub fn release(&self) {
        self.gate.add_permits(16);
    }

    async fn pass(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
    }

    fn done(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl FamilyBackend for GatedBackend {
    async fn list_members(&self) -> Result<Vec<Member>> {
        self.pass().await;
        let result = self.inner.list_members().await;
        self.done();
        result
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>> {
        self.pass().await;
        let result = self.inner.list_relationships().await;
        self.done();
        result
    }

    async fn insert_member(&self, data: &NewMember) -> Result<Member> {
        self.inner.insert_member(data).await
    }

    async fn update_member(&self, id: &str, patch: &MemberPatch) -> Result<Member> {
        self.inner.update_member(id, patch).await
    }

    async fn delete_member(&self, id: &str) -> Result<()> {
        self.inner.delete_member(id).await
    }

    async fn insert_relationship(&self, data: &NewRelationship) -> Result<Relationship> {
        self.inner.insert_relationship(data).await
    }

    async fn delete_relationship(&self, id: &str) -> Result<()> {
        self.inner.delete_relationship(id).await
    }
}

/// Yield until `ready` holds, giving up after a bounded number of turns.
pub async fn settle(ready: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if ready() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    ready()
}
