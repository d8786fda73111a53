//! Keeps the game/character many-to-many links consistent from both sides.
//!
//! Links are validated against the peer store before an owner record is
//! persisted, and mirrored into peer records after the owner is created or
//! deleted. Mirroring is best-effort: a peer that is missing or fails to
//! persist is skipped and reported, never raised to the caller.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::entity::{EntityKind, Linked};
use crate::error::CoreError;
use crate::store::DynStore;
use crate::types::EntityId;

/// Outcome of one propagation pass over a list of peer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Peers whose reference list changed and was persisted.
    pub updated: Vec<EntityId>,
    /// Peers that already had the desired state.
    pub unchanged: Vec<EntityId>,
    /// Peer ids that resolved to no record.
    pub missing: Vec<EntityId>,
    /// Peers whose lookup or write failed, with the error message.
    pub failed: Vec<(EntityId, String)>,
}

impl PropagationReport {
    /// True when no peer failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Handle on a propagation dispatched to the runtime.
///
/// Dropping the handle detaches the task; the propagation still runs to
/// completion.
#[derive(Debug)]
pub enum Propagation {
    /// Nothing to do; the report is already final.
    Ready(PropagationReport),
    Spawned(JoinHandle<PropagationReport>),
}

impl Propagation {
    /// Wait for the propagation to finish and return its report.
    pub async fn wait(self) -> PropagationReport {
        match self {
            Self::Ready(report) => report,
            Self::Spawned(handle) => match handle.await {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(error = %e, "Propagation task did not complete");
                    PropagationReport {
                        failed: vec![(String::new(), e.to_string())],
                        ..PropagationReport::default()
                    }
                }
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LinkOp {
    Link,
    Unlink,
}

/// Mirrors an owner's links into the records of its peer kind `P`.
pub struct RelationshipSync<P> {
    peers: DynStore<P>,
}

impl<P> Clone for RelationshipSync<P> {
    fn clone(&self) -> Self {
        Self {
            peers: Arc::clone(&self.peers),
        }
    }
}

impl<P: Linked> RelationshipSync<P> {
    pub fn new(peers: DynStore<P>) -> Self {
        Self { peers }
    }

    /// Keep the candidate ids that resolve to an existing peer.
    ///
    /// Input order is preserved and duplicates are not collapsed. Unknown
    /// ids are dropped silently. Store failures propagate.
    pub async fn validate_links(
        &self,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>, CoreError> {
        let mut cleared = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.peers.find_by_id(candidate).await? {
                Some(peer) => cleared.push(peer.id().to_string()),
                None => {
                    tracing::debug!(
                        peer_kind = %P::KIND,
                        peer_id = %candidate,
                        "Dropping link to unknown peer"
                    );
                }
            }
        }
        Ok(cleared)
    }

    /// Add `owner`'s id to each peer's reference list unless already there.
    pub async fn propagate_link<O: Linked>(
        &self,
        peer_ids: &[EntityId],
        owner: &O,
    ) -> PropagationReport {
        self.propagate(LinkOp::Link, peer_ids, O::KIND, owner.id()).await
    }

    /// Remove `owner`'s id from each peer's reference list.
    pub async fn propagate_unlink<O: Linked>(
        &self,
        peer_ids: &[EntityId],
        owner: &O,
    ) -> PropagationReport {
        self.propagate(LinkOp::Unlink, peer_ids, O::KIND, owner.id()).await
    }

    /// Run [`Self::propagate_link`] on the runtime without waiting for it.
    pub fn spawn_link<O: Linked>(&self, peer_ids: Vec<EntityId>, owner: &O) -> Propagation {
        self.spawn(LinkOp::Link, peer_ids, O::KIND, owner.id().to_string())
    }

    /// Run [`Self::propagate_unlink`] on the runtime without waiting for it.
    pub fn spawn_unlink<O: Linked>(&self, peer_ids: Vec<EntityId>, owner: &O) -> Propagation {
        self.spawn(LinkOp::Unlink, peer_ids, O::KIND, owner.id().to_string())
    }

    fn spawn(
        &self,
        op: LinkOp,
        peer_ids: Vec<EntityId>,
        owner_kind: EntityKind,
        owner_id: EntityId,
    ) -> Propagation {
        if peer_ids.is_empty() {
            return Propagation::Ready(PropagationReport::default());
        }
        let sync = self.clone();
        Propagation::Spawned(tokio::spawn(async move {
            sync.propagate(op, &peer_ids, owner_kind, &owner_id).await
        }))
    }

    async fn propagate(
        &self,
        op: LinkOp,
        peer_ids: &[EntityId],
        owner_kind: EntityKind,
        owner_id: &str,
    ) -> PropagationReport {
        let mut report = PropagationReport::default();
        for peer_id in peer_ids {
            match self.apply(op, peer_id, owner_id).await {
                Ok(Some(true)) => report.updated.push(peer_id.clone()),
                Ok(Some(false)) => report.unchanged.push(peer_id.clone()),
                Ok(None) => report.missing.push(peer_id.clone()),
                Err(e) => {
                    tracing::warn!(
                        op = ?op,
                        owner_kind = %owner_kind,
                        owner_id,
                        peer_kind = %P::KIND,
                        peer_id = %peer_id,
                        error = %e,
                        "Link propagation failed; peer left as is"
                    );
                    report.failed.push((peer_id.clone(), e.to_string()));
                }
            }
        }
        tracing::debug!(
            op = ?op,
            owner_kind = %owner_kind,
            owner_id,
            updated = report.updated.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "Link propagation finished"
        );
        report
    }

    /// Fetch-mutate-persist one peer. `None` when the peer does not exist,
    /// otherwise whether the peer was written.
    async fn apply(
        &self,
        op: LinkOp,
        peer_id: &str,
        owner_id: &str,
    ) -> Result<Option<bool>, CoreError> {
        let Some(mut peer) = self.peers.find_by_id(peer_id).await? else {
            return Ok(None);
        };

        let refs = peer.peer_ids_mut();
        let changed = match op {
            LinkOp::Link => {
                if refs.iter().any(|r| r == owner_id) {
                    false
                } else {
                    refs.push(owner_id.to_string());
                    true
                }
            }
            LinkOp::Unlink => {
                let before = refs.len();
                refs.retain(|r| r != owner_id);
                refs.len() < before
            }
        };

        if changed && !self.peers.replace(peer_id, &peer).await? {
            // Deleted between the read and the write.
            return Ok(None);
        }
        Ok(Some(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{TestCharacter, TestGame};
    use crate::store::{EntityStore, MemoryStore, StoreError};
    use async_trait::async_trait;

    const UNKNOWN: &str = "ffffffffffffffffffffffff";

    async fn seed_characters(
        store: &MemoryStore<TestCharacter>,
        names: &[&str],
    ) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for name in names {
            ids.push(store.insert(TestCharacter::named(name)).await.unwrap().id);
        }
        ids
    }

    fn owner_game(id: &str) -> TestGame {
        TestGame {
            id: id.to_string(),
            ..TestGame::named("Chess")
        }
    }

    #[tokio::test]
    async fn validate_keeps_existing_in_order_with_duplicates() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop", "Rook"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store));

        let candidates = vec![
            ids[1].clone(),
            UNKNOWN.to_string(),
            ids[0].clone(),
            ids[1].clone(),
        ];
        let cleared = sync.validate_links(&candidates).await.unwrap();

        assert_eq!(cleared, vec![ids[1].clone(), ids[0].clone(), ids[1].clone()]);
    }

    #[tokio::test]
    async fn validate_empty_input_is_empty() {
        let sync: RelationshipSync<TestCharacter> =
            RelationshipSync::new(Arc::new(MemoryStore::<TestCharacter>::new()));
        assert!(sync.validate_links(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn link_is_idempotent() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store.clone()));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let first = sync.propagate_link(&ids, &owner).await;
        let second = sync.propagate_link(&ids, &owner).await;

        assert_eq!(first.updated, ids);
        assert_eq!(second.unchanged, ids);
        let bishop = store.find_by_id(&ids[0]).await.unwrap().unwrap();
        assert_eq!(bishop.game_ids, vec![owner.id.clone()]);
    }

    #[tokio::test]
    async fn link_with_duplicate_peer_ids_adds_once() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store.clone()));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        sync.propagate_link(&[ids[0].clone(), ids[0].clone()], &owner).await;

        let bishop = store.find_by_id(&ids[0]).await.unwrap().unwrap();
        assert_eq!(bishop.game_ids.len(), 1);
    }

    #[tokio::test]
    async fn missing_peers_are_skipped() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let report = sync
            .propagate_link(&[UNKNOWN.to_string(), ids[0].clone()], &owner)
            .await;

        assert_eq!(report.missing, vec![UNKNOWN.to_string()]);
        assert_eq!(report.updated, ids);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn unlink_removes_every_occurrence() {
        let store = MemoryStore::<TestCharacter>::new();
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");
        let mut bishop = TestCharacter::named("Bishop");
        bishop.game_ids = vec![
            owner.id.clone(),
            "bbbbbbbbbbbbbbbbbbbbbbbb".into(),
            owner.id.clone(),
        ];
        let bishop = store.insert(bishop).await.unwrap();
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store.clone()));

        let report = sync.propagate_unlink(&[bishop.id.clone()], &owner).await;

        assert_eq!(report.updated, vec![bishop.id.clone()]);
        let bishop = store.find_by_id(&bishop.id).await.unwrap().unwrap();
        assert_eq!(bishop.game_ids, vec!["bbbbbbbbbbbbbbbbbbbbbbbb".to_string()]);
    }

    #[tokio::test]
    async fn unlink_of_unlinked_peer_writes_nothing() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let report = sync.propagate_unlink(&ids, &owner).await;
        assert_eq!(report.unchanged, ids);
    }

    #[tokio::test]
    async fn spawned_link_completes_in_background() {
        let store = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&store, &["Bishop", "Rook"]).await;
        let sync: RelationshipSync<TestCharacter> = RelationshipSync::new(Arc::new(store.clone()));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let report = sync.spawn_link(ids.clone(), &owner).wait().await;

        assert_eq!(report.updated, ids);
        for id in &ids {
            let peer = store.find_by_id(id).await.unwrap().unwrap();
            assert!(peer.game_ids.contains(&owner.id));
        }
    }

    #[tokio::test]
    async fn spawn_with_no_peers_is_ready() {
        let sync: RelationshipSync<TestCharacter> =
            RelationshipSync::new(Arc::new(MemoryStore::<TestCharacter>::new()));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(matches!(sync.spawn_link(Vec::new(), &owner), Propagation::Ready(_)));
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore(MemoryStore<TestCharacter>);

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[async_trait]
    impl EntityStore<TestCharacter> for ReadOnlyStore {
        async fn find_all(&self) -> Result<Vec<TestCharacter>, StoreError> {
            self.0.find_all().await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<TestCharacter>, StoreError> {
            self.0.find_by_id(id).await
        }

        async fn insert(&self, record: TestCharacter) -> Result<TestCharacter, StoreError> {
            self.0.insert(record).await
        }

        async fn replace(&self, _id: &str, _record: &TestCharacter) -> Result<bool, StoreError> {
            Err(StoreError::backend(DiskFull))
        }

        async fn delete(&self, id: &str) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn write_failures_are_reported_not_raised() {
        let inner = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&inner, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> =
            RelationshipSync::new(Arc::new(ReadOnlyStore(inner.clone())));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let report = sync.propagate_link(&ids, &owner).await;

        assert!(!report.is_clean());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ids[0]);
        let bishop = inner.find_by_id(&ids[0]).await.unwrap().unwrap();
        assert!(bishop.game_ids.is_empty());
    }

    /// Deletes the record on read, as if removed by a concurrent request.
    struct VanishingStore(MemoryStore<TestCharacter>);

    #[async_trait]
    impl EntityStore<TestCharacter> for VanishingStore {
        async fn find_all(&self) -> Result<Vec<TestCharacter>, StoreError> {
            self.0.find_all().await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<TestCharacter>, StoreError> {
            let found = self.0.find_by_id(id).await?;
            self.0.delete(id).await?;
            Ok(found)
        }

        async fn insert(&self, record: TestCharacter) -> Result<TestCharacter, StoreError> {
            self.0.insert(record).await
        }

        async fn replace(&self, id: &str, record: &TestCharacter) -> Result<bool, StoreError> {
            self.0.replace(id, record).await
        }

        async fn delete(&self, id: &str) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn peer_deleted_before_write_counts_as_missing() {
        let inner = MemoryStore::<TestCharacter>::new();
        let ids = seed_characters(&inner, &["Bishop"]).await;
        let sync: RelationshipSync<TestCharacter> =
            RelationshipSync::new(Arc::new(VanishingStore(inner.clone())));
        let owner = owner_game("aaaaaaaaaaaaaaaaaaaaaaaa");

        let report = sync.propagate_link(&ids, &owner).await;

        assert!(report.updated.is_empty());
        assert_eq!(report.missing, ids);
        assert!(report.is_clean());
    }
}
