//! In-memory backends for the store, access-control and repository traits.
//!
//! These are complete enough to run the provider in tests or embedded setups.
//! Each backend can be told to fail its next calls so the degradation paths of
//! the provider can be exercised.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use itertools::Itertools;
use tracing::debug;

use crate::error::PrincipalError;
use crate::traits::{AccessControl, AdminSession, AuthorizableStore, RecordCursor, Repository};
use crate::types::{AttributeQuery, AuthorizableRecord, Permission, SecurityZone};

/// Wildcard resource for access grants.
pub const ANY_RESOURCE: &str = "*";

/// Counts down injected failures.
#[derive(Debug, Default)]
struct FaultInjector(AtomicUsize);

impl FaultInjector {
    fn arm(&self, count: usize) {
        self.0.store(count, Ordering::SeqCst);
    }

    fn trip(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Authorizable store backed by a concurrent map keyed by record id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, AuthorizableRecord>,
    lookups: AtomicUsize,
    queries: AtomicUsize,
    faults: FaultInjector,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Insert a record as-is, replacing any record with the same id.
    pub fn insert(&self, record: AuthorizableRecord) {
        self.records.insert(record.id().to_string(), record);
    }

    pub fn insert_user(&self, id: &str) {
        self.insert(AuthorizableRecord::user(id, Vec::new()));
    }

    pub fn insert_group(&self, id: &str) {
        self.insert(AuthorizableRecord::group(id, Vec::new(), Vec::new()));
    }

    /// Record `member_id` as a member of `group_id`, updating both sides.
    ///
    /// Either side may be missing; only existing records are touched.
    pub fn add_member(&self, group_id: &str, member_id: &str) {
        if let Some(mut group) = self.records.get_mut(group_id) {
            group.add_member_id(member_id);
        }
        if let Some(mut member) = self.records.get_mut(member_id) {
            member.add_group_id(group_id);
        }
    }

    pub fn remove(&self, id: &str) -> Option<AuthorizableRecord> {
        self.records.remove(id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of `find_authorizable` calls served, including failed ones.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `find_authorizables` calls served, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Make the next `count` store calls fail with `StoreError`.
    pub fn fail_next(&self, count: usize) {
        self.faults.arm(count);
    }
}

impl AuthorizableStore for MemoryStore {
    fn find_authorizable(&self, id: &str) -> Result<Option<AuthorizableRecord>, PrincipalError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.faults.trip() {
            return Err(PrincipalError::StoreError(format!(
                "injected failure looking up {id}"
            )));
        }
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    fn find_authorizables(&self, query: &AttributeQuery) -> Result<RecordCursor, PrincipalError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.faults.trip() {
            return Err(PrincipalError::StoreError(format!(
                "injected failure querying {query}"
            )));
        }
        let matches = self
            .records
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .sorted_by(|a, b| a.id().cmp(b.id()));
        debug!(event = "MemoryStore", phase = "Query", query = %query, matches = matches.len());
        Ok(Box::new(matches))
    }
}

/// Access-control engine answering from an explicit set of grants.
#[derive(Debug, Default)]
pub struct MemoryAccessControl {
    grants: DashMap<(String, SecurityZone, String), u32>,
    decisions: AtomicUsize,
    faults: FaultInjector,
}

impl MemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `permission` to `caller` on `resource` (or [`ANY_RESOURCE`]) in `zone`.
    pub fn grant(&self, caller: &str, zone: SecurityZone, resource: &str, permission: Permission) {
        *self
            .grants
            .entry((caller.to_string(), zone, resource.to_string()))
            .or_insert(0) |= permission.bits;
    }

    pub fn revoke_all(&self, caller: &str) {
        self.grants.retain(|(grantee, _, _), _| grantee != caller);
    }

    /// Number of decisions requested, including failed ones.
    pub fn decision_count(&self) -> usize {
        self.decisions.load(Ordering::SeqCst)
    }

    /// Make the next `count` decisions fail with `AccessDenied`.
    pub fn fail_next(&self, count: usize) {
        self.faults.arm(count);
    }

    fn granted(&self, caller: &str, zone: SecurityZone, resource: &str) -> u32 {
        [resource, ANY_RESOURCE]
            .into_iter()
            .filter_map(|r| {
                self.grants
                    .get(&(caller.to_string(), zone, r.to_string()))
                    .map(|bits| *bits)
            })
            .fold(0, |acc, bits| acc | bits)
    }
}

impl AccessControl for MemoryAccessControl {
    fn can(
        &self,
        caller: &AuthorizableRecord,
        zone: SecurityZone,
        resource: &str,
        permission: Permission,
    ) -> Result<bool, PrincipalError> {
        self.decisions.fetch_add(1, Ordering::SeqCst);
        if self.faults.trip() {
            return Err(PrincipalError::AccessDenied(format!(
                "injected failure checking {permission} on {zone}:{resource} for {}",
                caller.id()
            )));
        }
        let bits = self.granted(caller.id(), zone, resource);
        Ok(bits & permission.bits == permission.bits)
    }
}

/// Repository handing out sessions over a shared store and access-control engine.
#[derive(Debug)]
pub struct MemoryRepository {
    store: Arc<MemoryStore>,
    access_control: Arc<MemoryAccessControl>,
    logins: AtomicUsize,
    logouts: Arc<AtomicUsize>,
    refuse_login: AtomicBool,
    fail_logout: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub fn new(store: Arc<MemoryStore>, access_control: Arc<MemoryAccessControl>) -> Self {
        MemoryRepository {
            store,
            access_control,
            logins: AtomicUsize::new(0),
            logouts: Arc::new(AtomicUsize::new(0)),
            refuse_login: AtomicBool::new(false),
            fail_logout: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn access_control(&self) -> &Arc<MemoryAccessControl> {
        &self.access_control
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn set_refuse_login(&self, refuse: bool) {
        self.refuse_login.store(refuse, Ordering::SeqCst);
    }

    pub fn set_fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }
}

impl Repository for MemoryRepository {
    fn login_administrative(&self) -> Result<Box<dyn AdminSession>, PrincipalError> {
        if self.refuse_login.load(Ordering::SeqCst) {
            return Err(PrincipalError::SessionError(
                "administrative login refused".to_string(),
            ));
        }
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            store: Arc::clone(&self.store),
            access_control: Arc::clone(&self.access_control),
            logouts: Arc::clone(&self.logouts),
            fail_logout: Arc::clone(&self.fail_logout),
        }))
    }
}

/// Session returned by [`MemoryRepository`].
#[derive(Debug)]
pub struct MemorySession {
    store: Arc<MemoryStore>,
    access_control: Arc<MemoryAccessControl>,
    logouts: Arc<AtomicUsize>,
    fail_logout: Arc<AtomicBool>,
}

impl AdminSession for MemorySession {
    fn authorizable_store(&self) -> Arc<dyn AuthorizableStore> {
        self.store.clone()
    }

    fn access_control(&self) -> Arc<dyn AccessControl> {
        self.access_control.clone()
    }

    fn logout(&self) -> Result<(), PrincipalError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(PrincipalError::SessionError("logout failed".to_string()));
        }
        Ok(())
    }
}
