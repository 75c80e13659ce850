use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, PrincipalCache};
use crate::error::PrincipalError;
use crate::traits::{AdmitAll, AuthorizableStore, CachePolicy};
use crate::types::{AuthorizableRecord, Principal, WellKnownPrincipals};

/// Turns names and store records into principals, going through the shared cache.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn AuthorizableStore>,
    well_known: Arc<WellKnownPrincipals>,
    cache: Arc<PrincipalCache>,
    cache_policy: Arc<dyn CachePolicy>,
}

impl PrincipalResolver {
    pub fn new(
        store: Arc<dyn AuthorizableStore>,
        well_known: Arc<WellKnownPrincipals>,
        cache: Arc<PrincipalCache>,
    ) -> Self {
        PrincipalResolver {
            store,
            well_known,
            cache,
            cache_policy: Arc::new(AdmitAll),
        }
    }

    /// Replace the policy deciding which walked or searched principals are cached.
    pub fn with_cache_policy(mut self, cache_policy: Arc<dyn CachePolicy>) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn store(&self) -> &Arc<dyn AuthorizableStore> {
        &self.store
    }

    pub fn well_known(&self) -> &Arc<WellKnownPrincipals> {
        &self.well_known
    }

    pub fn cache(&self) -> &Arc<PrincipalCache> {
        &self.cache
    }

    /// Resolve `name` without consulting the cache.
    ///
    /// Well-known names short-circuit to their constants; everything else is
    /// looked up in the store. Store errors are returned to the caller.
    pub fn resolve(&self, name: &str) -> Result<Option<Arc<Principal>>, PrincipalError> {
        if let Some(constant) = self.well_known.lookup(name) {
            return Ok(Some(constant));
        }
        Ok(self
            .store
            .find_authorizable(name)?
            .map(|record| Arc::new(Principal::from_record(record))))
    }

    /// Cached resolution backing `get_principal`.
    ///
    /// A hit returns the cached instance. A miss resolves through the store and
    /// caches the result; unresolved names are cached as negative entries only
    /// when the cache allows it. Store errors are logged and read as "absent".
    pub fn principal(&self, name: &str) -> Option<Arc<Principal>> {
        if let Some(constant) = self.well_known.lookup(name) {
            return Some(constant);
        }

        if let Some(entry) = self.cache.get(name) {
            debug!(event = "Resolve", phase = "CacheHit", name = name);
            return entry.principal();
        }

        match self.resolve(name) {
            Ok(Some(principal)) => {
                self.cache
                    .put(name, CacheEntry::Principal(Arc::clone(&principal)));
                Some(principal)
            }
            Ok(None) => {
                debug!(event = "Resolve", phase = "NotFound", name = name);
                self.cache.put(name, CacheEntry::Negative);
                None
            }
            Err(err) => {
                debug!(event = "Resolve", phase = "StoreError", name = name, error = %err);
                None
            }
        }
    }

    /// Wrap a record already fetched from the store.
    ///
    /// Returns the cached principal for the record's id if there is one;
    /// otherwise builds a new principal and caches it if the cache policy admits it.
    pub fn wrap(&self, record: AuthorizableRecord) -> Arc<Principal> {
        if let Some(CacheEntry::Principal(cached)) = self.cache.get(record.id()) {
            return cached;
        }
        let principal = Arc::new(Principal::from_record(record));
        if self.cache_policy.admit(&principal) {
            self.cache
                .put(principal.name(), CacheEntry::Principal(Arc::clone(&principal)));
        }
        principal
    }
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver")
            .field("well_known", &self.well_known)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
