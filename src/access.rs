use std::sync::Arc;

use tracing::{debug, warn};

use crate::traits::{AccessControl, AuthorizableStore};
use crate::types::{Permission, Principal, SecurityZone};

/// Decides whether a caller may see a principal.
///
/// Checks run in the authorizables zone with the read permission. A caller the
/// store does not know, a denial and any backend error all read as `false`.
#[derive(Clone)]
pub struct AccessFilter {
    store: Arc<dyn AuthorizableStore>,
    access_control: Arc<dyn AccessControl>,
}

impl AccessFilter {
    pub fn new(store: Arc<dyn AuthorizableStore>, access_control: Arc<dyn AccessControl>) -> Self {
        AccessFilter {
            store,
            access_control,
        }
    }

    pub fn can_read(&self, caller_id: &str, target: &Principal) -> bool {
        let caller = match self.store.find_authorizable(caller_id) {
            Ok(Some(caller)) => caller,
            Ok(None) => {
                debug!(event = "CanRead", phase = "UnknownCaller", caller = caller_id);
                return false;
            }
            Err(err) => {
                warn!(event = "CanRead", phase = "CallerLookup", caller = caller_id, error = %err);
                return false;
            }
        };

        match self.access_control.can(
            &caller,
            SecurityZone::Authorizables,
            target.name(),
            Permission::CAN_READ,
        ) {
            Ok(allowed) => {
                debug!(
                    event = "CanRead",
                    phase = "Decision",
                    caller = caller_id,
                    target = target.name(),
                    allowed = allowed
                );
                allowed
            }
            Err(err) => {
                warn!(
                    event = "CanRead",
                    phase = "Decision",
                    caller = caller_id,
                    target = target.name(),
                    error = %err
                );
                false
            }
        }
    }
}
