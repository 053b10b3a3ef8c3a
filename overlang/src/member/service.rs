//! Find-or-create of members keyed by external identity.
//!
//! Concurrent first logins for the same `external_id` are arbitrated by the
//! storage-level UNIQUE constraint, not by any in-process lock: every caller
//! that loses the insert race re-reads the winner's row.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::database::models::{MemberDbModel, NewMember};
use crate::database::repositories::MemberRepository;
use crate::{Error, Result};

/// Result of a reconciliation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub member: MemberDbModel,
    /// True only for the call whose insert created the row.
    pub is_new_member: bool,
}

impl ReconcileOutcome {
    fn existing(member: MemberDbModel) -> Self {
        Self {
            member,
            is_new_member: false,
        }
    }

    fn created(member: MemberDbModel) -> Self {
        Self {
            member,
            is_new_member: true,
        }
    }
}

/// Display name for a new member: the provided name, stored as given, if it
/// is not blank. Otherwise the part of `email` before its first `@`, which may
/// be empty.
pub fn resolve_display_name(display_name: Option<&str>, email: &str) -> String {
    if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }

    email.split('@').next().unwrap_or(email).to_string()
}

pub struct MemberService {
    repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(repo: Arc<dyn MemberRepository>) -> Self {
        Self { repo }
    }

    /// Return the member for `external_id`, creating it on first sight.
    ///
    /// Blank or absent emails fail with [`Error::Unauthenticated`] before any
    /// storage access. The email is stored with surrounding whitespace
    /// trimmed. Performs at most two reads and one write.
    pub async fn reconcile(
        &self,
        external_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<ReconcileOutcome> {
        if external_id.trim().is_empty() {
            return Err(Error::unauthenticated("Verified identity lacks a subject"));
        }

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::unauthenticated("Verified identity lacks a usable email"))?;

        if let Some(member) = self.repo.find_by_external_id(external_id).await? {
            debug!(member_id = member.id, "Existing member reconciled");
            return Ok(ReconcileOutcome::existing(member));
        }

        let new_member = NewMember::new(
            external_id,
            email,
            resolve_display_name(display_name, email),
        );

        match self.repo.create(&new_member).await {
            Ok(member) => {
                info!(
                    member_id = member.id,
                    external_id = %external_id,
                    "Member created"
                );
                Ok(ReconcileOutcome::created(member))
            }
            Err(conflict @ Error::Conflict { .. }) => {
                debug!(
                    external_id = %external_id,
                    "Member insert lost a uniqueness race; re-reading"
                );
                match self.repo.find_by_external_id(external_id).await? {
                    Some(member) => Ok(ReconcileOutcome::existing(member)),
                    None => {
                        // The conflict was on another unique column, e.g. email.
                        warn!(
                            external_id = %external_id,
                            error = %conflict,
                            "Member insert conflicted but no row exists for this identity"
                        );
                        Err(conflict)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Look up an existing member without ever creating one.
    ///
    /// An unknown identity is reported as [`Error::Unauthenticated`].
    pub async fn get_existing(&self, external_id: &str) -> Result<MemberDbModel> {
        self.repo
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| Error::unauthenticated("Member not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Barrier, Mutex};

    /// In-memory store enforcing the same UNIQUE columns as the schema.
    #[derive(Default)]
    struct InMemoryMemberRepository {
        rows: Mutex<Vec<MemberDbModel>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl InMemoryMemberRepository {
        async fn insert_row(&self, member: &NewMember) -> Result<MemberDbModel> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().await;
            if rows.iter().any(|r| r.external_id == member.external_id) {
                return Err(Error::conflict("member", "members.external_id"));
            }
            if rows.iter().any(|r| r.email == member.email) {
                return Err(Error::conflict("member", "members.email"));
            }
            let row = MemberDbModel {
                id: rows.len() as i64 + 1,
                external_id: member.external_id.clone(),
                email: member.email.clone(),
                display_name: member.display_name.clone(),
                created_at: 0,
                updated_at: 0,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn lookup(&self, external_id: &str) -> Option<MemberDbModel> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .await
                .iter()
                .find(|r| r.external_id == external_id)
                .cloned()
        }
    }

    #[async_trait]
    impl MemberRepository for InMemoryMemberRepository {
        async fn find_by_external_id(&self, external_id: &str) -> Result<Option<MemberDbModel>> {
            Ok(self.lookup(external_id).await)
        }
        async fn find_by_id(&self, id: i64) -> Result<Option<MemberDbModel>> {
            Ok(self.rows.lock().await.iter().find(|r| r.id == id).cloned())
        }
        async fn create(&self, member: &NewMember) -> Result<MemberDbModel> {
            self.insert_row(member).await
        }
        async fn count(&self) -> Result<i64> {
            Ok(self.rows.lock().await.len() as i64)
        }
    }

    /// Holds every caller's first lookup until all of them have missed,
    /// forcing them all into the insert path.
    struct RacingMemberRepository {
        inner: InMemoryMemberRepository,
        barrier: Barrier,
        first_lookups: AtomicUsize,
        callers: usize,
    }

    #[async_trait]
    impl MemberRepository for RacingMemberRepository {
        async fn find_by_external_id(&self, external_id: &str) -> Result<Option<MemberDbModel>> {
            let found = self.inner.lookup(external_id).await;
            if self.first_lookups.fetch_add(1, Ordering::SeqCst) < self.callers {
                self.barrier.wait().await;
            }
            Ok(found)
        }
        async fn find_by_id(&self, id: i64) -> Result<Option<MemberDbModel>> {
            self.inner.find_by_id(id).await
        }
        async fn create(&self, member: &NewMember) -> Result<MemberDbModel> {
            self.inner.insert_row(member).await
        }
        async fn count(&self) -> Result<i64> {
            self.inner.count().await
        }
    }

    /// Misses on the first lookup, conflicts on insert, then serves `winner`.
    struct ConflictThenFoundRepository {
        winner: MemberDbModel,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl MemberRepository for ConflictThenFoundRepository {
        async fn find_by_external_id(&self, _external_id: &str) -> Result<Option<MemberDbModel>> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(Some(self.winner.clone()))
            }
        }
        async fn find_by_id(&self, _id: i64) -> Result<Option<MemberDbModel>> {
            Ok(None)
        }
        async fn create(&self, _member: &NewMember) -> Result<MemberDbModel> {
            Err(Error::conflict("member", "UNIQUE constraint failed: members.external_id"))
        }
        async fn count(&self) -> Result<i64> {
            Ok(1)
        }
    }

    fn service(repo: Arc<dyn MemberRepository>) -> MemberService {
        MemberService::new(repo)
    }

    #[tokio::test]
    async fn test_reconcile_creates_then_finds() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo.clone());

        let first = service
            .reconcile("uid-1", Some("alice@example.com"), Some("Alice"))
            .await
            .unwrap();
        let second = service
            .reconcile("uid-1", Some("alice@example.com"), Some("Alice"))
            .await
            .unwrap();

        assert!(first.is_new_member);
        assert!(!second.is_new_member);
        assert_eq!(first.member.id, second.member.id);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_returning_member_path_does_not_write() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo.clone());

        service
            .reconcile("uid-1", Some("alice@example.com"), None)
            .await
            .unwrap();
        let writes_before = repo.writes.load(Ordering::SeqCst);

        // A changed email or name on a later login does not touch the row.
        let outcome = service
            .reconcile("uid-1", Some("alice@new.example.com"), Some("Alice B"))
            .await
            .unwrap();

        assert_eq!(repo.writes.load(Ordering::SeqCst), writes_before);
        assert_eq!(outcome.member.email, "alice@example.com");
        assert_eq!(outcome.member.display_name, "alice");
    }

    #[tokio::test]
    async fn test_blank_email_rejected_without_storage_access() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo.clone());

        for email in [None, Some(""), Some("   ")] {
            let err = service.reconcile("uid-1", email, Some("A")).await.unwrap_err();
            assert!(matches!(err, Error::Unauthenticated(_)));
        }

        assert_eq!(repo.reads.load(Ordering::SeqCst), 0);
        assert_eq!(repo.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_name_defaults_to_email_local_part() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo);

        let outcome = service
            .reconcile("u1", Some("alice@example.com"), None)
            .await
            .unwrap();
        assert_eq!(outcome.member.display_name, "alice");

        let outcome = service
            .reconcile("u2", Some("bob@example.com"), Some("  "))
            .await
            .unwrap();
        assert_eq!(outcome.member.display_name, "bob");

        let outcome = service
            .reconcile("u3", Some("@example.com"), None)
            .await
            .unwrap();
        assert_eq!(outcome.member.display_name, "");
    }

    #[tokio::test]
    async fn test_get_existing_never_creates() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo.clone());

        let err = service.get_existing("ghost").await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(repo.writes.load(Ordering::SeqCst), 0);

        let created = service
            .reconcile("ghost", Some("ghost@example.com"), None)
            .await
            .unwrap();
        let found = service.get_existing("ghost").await.unwrap();
        assert_eq!(found.id, created.member.id);
    }

    #[tokio::test]
    async fn test_conflict_is_masked_when_reread_succeeds() {
        let winner = MemberDbModel {
            id: 7,
            external_id: "uid-race".to_string(),
            email: "race@example.com".to_string(),
            display_name: "race".to_string(),
            created_at: 1,
            updated_at: 1,
        };
        let repo = Arc::new(ConflictThenFoundRepository {
            winner: winner.clone(),
            lookups: AtomicUsize::new(0),
        });
        let service = service(repo.clone());

        let outcome = service
            .reconcile("uid-race", Some("race@example.com"), None)
            .await
            .unwrap();

        assert_eq!(outcome.member, winner);
        assert!(!outcome.is_new_member);
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_email_conflict_is_surfaced() {
        let repo = Arc::new(InMemoryMemberRepository::default());
        let service = service(repo.clone());

        service
            .reconcile("uid-a", Some("shared@example.com"), None)
            .await
            .unwrap();

        let err = service
            .reconcile("uid-b", Some("shared@example.com"), None)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_logins_create_one_row() {
        const CALLERS: usize = 16;

        let repo = Arc::new(RacingMemberRepository {
            inner: InMemoryMemberRepository::default(),
            barrier: Barrier::new(CALLERS),
            first_lookups: AtomicUsize::new(0),
            callers: CALLERS,
        });
        let service = Arc::new(service(repo.clone()));

        let mut handles = Vec::with_capacity(CALLERS);
        for i in 0..CALLERS {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let email = format!("racer{}@example.com", i);
                let name = format!("Racer {}", i);
                service
                    .reconcile("uid-shared", Some(&email), Some(&name))
                    .await
            }));
        }

        let mut outcomes = Vec::with_capacity(CALLERS);
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        let new_count = outcomes.iter().filter(|o| o.is_new_member).count();
        assert_eq!(new_count, 1);
        let id = outcomes[0].member.id;
        assert!(outcomes.iter().all(|o| o.member.id == id));
        assert_eq!(repo.count().await.unwrap(), 1);
        // Every caller reached the insert path.
        assert_eq!(repo.inner.writes.load(Ordering::SeqCst), CALLERS);
    }

    #[test]
    fn test_resolve_display_name_edge_cases() {
        assert_eq!(resolve_display_name(Some("Alice"), "a@x.com"), "Alice");
        assert_eq!(resolve_display_name(None, "no-at-sign"), "no-at-sign");
        assert_eq!(resolve_display_name(None, "@x.com"), "");
        assert_eq!(resolve_display_name(Some("  Alice  "), "a@x.com"), "  Alice  ");
        assert_eq!(resolve_display_name(Some(" \t "), "a@x.com"), "a");
        assert_eq!(resolve_display_name(None, "a@b@c"), "a");
    }
}
