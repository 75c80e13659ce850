use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::access::AccessFilter;
use crate::cache::{CacheStats, PrincipalCache};
use crate::config::ProviderOptions;
use crate::error::PrincipalError;
use crate::membership::GroupMembership;
use crate::resolver::PrincipalResolver;
use crate::search::{PrincipalCursor, SearchAdapter};
use crate::traits::{AccessControl, AdminSession, AdmitAll, AuthorizableStore, CachePolicy, Repository};
use crate::types::{Principal, SearchType, WellKnownPrincipals};

struct Services {
    options: ProviderOptions,
    resolver: PrincipalResolver,
    search: SearchAdapter,
    access: AccessFilter,
}

enum ProviderState {
    Uninitialized,
    Ready(Arc<Services>),
    ShutDown,
}

/// Principal provider over a sparse authorizable store.
///
/// The provider logs in administratively on construction and holds that
/// session until [`shutdown`](Self::shutdown). Lookups become available after
/// [`initialize`](Self::initialize) and stop working after shutdown. The
/// provider is `Send + Sync` and meant to be shared across caller threads.
pub struct SparsePrincipalProvider {
    session: Mutex<Option<Box<dyn AdminSession>>>,
    store: Arc<dyn AuthorizableStore>,
    access_control: Arc<dyn AccessControl>,
    well_known: Arc<WellKnownPrincipals>,
    cache_policy: Arc<dyn CachePolicy>,
    state: RwLock<ProviderState>,
}

impl SparsePrincipalProvider {
    pub fn new(repository: &dyn Repository) -> Result<Self, PrincipalError> {
        let session = repository
            .login_administrative()
            .map_err(|e| PrincipalError::StoreUnavailable(e.to_string()))?;
        let store = session.authorizable_store();
        let access_control = session.access_control();

        Ok(SparsePrincipalProvider {
            session: Mutex::new(Some(session)),
            store,
            access_control,
            well_known: WellKnownPrincipals::standard(),
            cache_policy: Arc::new(AdmitAll),
            state: RwLock::new(ProviderState::Uninitialized),
        })
    }

    /// Use custom well-known principals instead of the standard ones.
    pub fn with_well_known(mut self, well_known: Arc<WellKnownPrincipals>) -> Self {
        self.well_known = well_known;
        self
    }

    /// Set the policy deciding which walked or searched principals enter the cache.
    pub fn with_cache_policy(mut self, cache_policy: Arc<dyn CachePolicy>) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn initialize(&self, options: ProviderOptions) -> Result<(), PrincipalError> {
        let mut state = self.state.write();
        if !matches!(*state, ProviderState::Uninitialized) {
            return Err(PrincipalError::AlreadyInitialized);
        }

        let cache = Arc::new(PrincipalCache::new(
            options.cache_capacity()?,
            options.cache_includes_negative,
        ));
        let resolver = PrincipalResolver::new(
            Arc::clone(&self.store),
            Arc::clone(&self.well_known),
            cache,
        )
        .with_cache_policy(Arc::clone(&self.cache_policy));

        info!(
            event = "Provider",
            phase = "Initialized",
            cache_max_size = options.cache_max_size,
            cache_includes_negative = options.cache_includes_negative,
            membership_includes_everyone = options.membership_includes_everyone
        );

        *state = ProviderState::Ready(Arc::new(Services {
            search: SearchAdapter::new(resolver.clone()),
            access: AccessFilter::new(Arc::clone(&self.store), Arc::clone(&self.access_control)),
            resolver,
            options,
        }));
        Ok(())
    }

    /// Initialize from a host property bag; see [`ProviderOptions::from_properties`].
    pub fn initialize_from_properties(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<(), PrincipalError> {
        self.initialize(ProviderOptions::from_properties(properties)?)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(*self.state.read(), ProviderState::Ready(_))
    }

    fn services(&self) -> Result<Arc<Services>, PrincipalError> {
        match &*self.state.read() {
            ProviderState::Ready(services) => Ok(Arc::clone(services)),
            ProviderState::Uninitialized | ProviderState::ShutDown => {
                Err(PrincipalError::NotInitialized)
            }
        }
    }

    pub fn options(&self) -> Result<ProviderOptions, PrincipalError> {
        Ok(self.services()?.options.clone())
    }

    /// The principal named `name`, or `None` if it does not resolve.
    pub fn get_principal(&self, name: &str) -> Result<Option<Arc<Principal>>, PrincipalError> {
        Ok(self.services()?.resolver.principal(name))
    }

    pub fn find_principals(
        &self,
        filter: Option<&str>,
        search_type: SearchType,
    ) -> Result<PrincipalCursor, PrincipalError> {
        Ok(self.services()?.search.find_principals(filter, search_type))
    }

    pub fn find_principals_all(&self, filter: Option<&str>) -> Result<PrincipalCursor, PrincipalError> {
        self.find_principals(filter, SearchType::All)
    }

    /// Search with a raw host search-type code; unknown codes are `InvalidArgument`.
    pub fn find_principals_by_code(
        &self,
        filter: Option<&str>,
        search_type: i32,
    ) -> Result<PrincipalCursor, PrincipalError> {
        let services = self.services()?;
        let search_type = SearchType::try_from(search_type)?;
        Ok(services.search.find_principals(filter, search_type))
    }

    pub fn get_principals(&self, search_type: SearchType) -> Result<PrincipalCursor, PrincipalError> {
        self.find_principals(None, search_type)
    }

    /// Lazily walk the groups reachable from `principal`.
    pub fn get_group_membership(
        &self,
        principal: &Principal,
    ) -> Result<GroupMembership, PrincipalError> {
        let services = self.services()?;
        Ok(GroupMembership::new(
            services.resolver.clone(),
            principal,
            services.options.membership_includes_everyone,
        ))
    }

    /// Whether the user behind `session_user_id` may read `principal`.
    pub fn can_read(&self, session_user_id: &str, principal: &Principal) -> Result<bool, PrincipalError> {
        Ok(self.services()?.access.can_read(session_user_id, principal))
    }

    pub fn clear_cache(&self) -> Result<(), PrincipalError> {
        self.services()?.resolver.cache().clear();
        debug!(event = "Provider", phase = "CacheCleared");
        Ok(())
    }

    pub fn cache_stats(&self) -> Result<CacheStats, PrincipalError> {
        Ok(self.services()?.resolver.cache().stats())
    }

    /// Release the administrative session. Later calls are no-ops.
    ///
    /// Logout failures are logged and otherwise ignored.
    pub fn shutdown(&self) {
        *self.state.write() = ProviderState::ShutDown;

        let Some(session) = self.session.lock().take() else {
            debug!(event = "Provider", phase = "AlreadyShutDown");
            return;
        };
        match session.logout() {
            Ok(()) => info!(event = "Provider", phase = "ShutDown"),
            Err(err) => warn!(event = "Provider", phase = "Logout", error = %err),
        }
    }
}

impl std::fmt::Debug for SparsePrincipalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparsePrincipalProvider")
            .field("initialized", &self.is_initialized())
            .field("well_known", &self.well_known)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
