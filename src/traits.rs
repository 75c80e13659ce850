use std::sync::Arc;

use crate::error::PrincipalError;
use crate::types::{AttributeQuery, AuthorizableRecord, Permission, Principal, SecurityZone};

/// A lazily consumed set of store records.
pub type RecordCursor = Box<dyn Iterator<Item = AuthorizableRecord> + Send>;

/// Read access to the backing identity store.
pub trait AuthorizableStore: Send + Sync {
    /// Look up a single record by id. A missing record is `Ok(None)`, not an error.
    fn find_authorizable(&self, id: &str) -> Result<Option<AuthorizableRecord>, PrincipalError>;

    /// Run one attribute-equality query.
    fn find_authorizables(&self, query: &AttributeQuery) -> Result<RecordCursor, PrincipalError>;
}

/// The external access-control decision engine.
pub trait AccessControl: Send + Sync {
    /// Whether `caller` holds `permission` on `resource` within `zone`.
    fn can(
        &self,
        caller: &AuthorizableRecord,
        zone: SecurityZone,
        resource: &str,
        permission: Permission,
    ) -> Result<bool, PrincipalError>;
}

/// An administrative session held for the provider's whole lifetime.
pub trait AdminSession: Send + Sync {
    fn authorizable_store(&self) -> Arc<dyn AuthorizableStore>;

    fn access_control(&self) -> Arc<dyn AccessControl>;

    /// Release the session. Called at most once.
    fn logout(&self) -> Result<(), PrincipalError>;
}

/// Hands out administrative sessions.
pub trait Repository {
    fn login_administrative(&self) -> Result<Box<dyn AdminSession>, PrincipalError>;
}

/// Decides whether a principal built during a walk or search enters the cache.
///
/// Principals returned by `get_principal` are always cached; this policy only
/// governs principals wrapped on the membership and search paths.
pub trait CachePolicy: Send + Sync {
    fn admit(&self, principal: &Principal) -> bool;
}

/// Cache every wrapped principal.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdmitAll;

impl CachePolicy for AdmitAll {
    fn admit(&self, _principal: &Principal) -> bool {
        true
    }
}

/// Never cache wrapped principals.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdmitNone;

impl CachePolicy for AdmitNone {
    fn admit(&self, _principal: &Principal) -> bool {
        false
    }
}

impl<F> CachePolicy for F
where
    F: Fn(&Principal) -> bool + Send + Sync,
{
    fn admit(&self, principal: &Principal) -> bool {
        self(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrincipalKind;

    #[test]
    fn test_builtin_policies() {
        let alice = Principal::detached("alice", PrincipalKind::User);
        assert!(AdmitAll.admit(&alice));
        assert!(!AdmitNone.admit(&alice));
    }

    #[test]
    fn test_closure_policy() {
        let groups_only = |p: &Principal| p.is_group();
        let staff = Principal::detached("staff", PrincipalKind::Group);
        let alice = Principal::detached("alice", PrincipalKind::User);
        assert!(groups_only.admit(&staff));
        assert!(!groups_only.admit(&alice));
    }
}
