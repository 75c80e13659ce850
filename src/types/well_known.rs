//! The three system identities that never come from the store.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::principal::{Principal, PrincipalKind};

pub const EVERYONE_NAME: &str = "everyone";
pub const ADMIN_NAME: &str = "admin";
pub const ANONYMOUS_NAME: &str = "anonymous";

static STANDARD: Lazy<Arc<WellKnownPrincipals>> =
    Lazy::new(|| Arc::new(WellKnownPrincipals::new(EVERYONE_NAME, ADMIN_NAME, ANONYMOUS_NAME)));

/// Everyone, admin and anonymous principals, built once and shared.
///
/// Lookups always hand out the same `Arc`, so these principals are identical
/// across calls whether or not anything is cached.
#[derive(Debug)]
pub struct WellKnownPrincipals {
    everyone: Arc<Principal>,
    admin: Arc<Principal>,
    anonymous: Arc<Principal>,
}

impl WellKnownPrincipals {
    pub fn new(everyone: &str, admin: &str, anonymous: &str) -> Self {
        WellKnownPrincipals {
            everyone: Arc::new(Principal::detached(everyone, PrincipalKind::Everyone)),
            admin: Arc::new(Principal::detached(admin, PrincipalKind::Admin)),
            anonymous: Arc::new(Principal::detached(anonymous, PrincipalKind::Anonymous)),
        }
    }

    /// The process-wide instance using the standard names.
    pub fn standard() -> Arc<WellKnownPrincipals> {
        Arc::clone(&STANDARD)
    }

    pub fn everyone(&self) -> &Arc<Principal> {
        &self.everyone
    }

    pub fn admin(&self) -> &Arc<Principal> {
        &self.admin
    }

    pub fn anonymous(&self) -> &Arc<Principal> {
        &self.anonymous
    }

    pub fn is_everyone(&self, name: &str) -> bool {
        self.everyone.name() == name
    }

    /// Return the constant for `name`, checked in everyone, admin, anonymous order.
    pub fn lookup(&self, name: &str) -> Option<Arc<Principal>> {
        [&self.everyone, &self.admin, &self.anonymous]
            .into_iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    /// Whether `principal` is implicitly a member of everyone.
    ///
    /// With `implicit` membership every principal except everyone itself
    /// belongs to it; otherwise membership has to come from the store.
    pub fn everyone_includes(&self, principal: &Principal, implicit: bool) -> bool {
        implicit && !self.is_everyone(principal.name())
    }
}
