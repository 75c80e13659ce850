// src/lib.rs
pub use access::AccessFilter;
pub use cache::{CacheEntry, CacheStats, PrincipalCache};
pub use config::{
    DEFAULT_CACHE_MAX_SIZE, EVERYONE_MEMBERSHIP_KEY, MAXSIZE_KEY, NEGATIVE_ENTRY_KEY,
    ProviderOptions,
};
pub use error::{PrincipalError, Result};
pub use membership::GroupMembership;
pub use provider::SparsePrincipalProvider;
pub use resolver::PrincipalResolver;
pub use search::{PrincipalCursor, SearchAdapter};
pub use traits::{
    AccessControl, AdminSession, AdmitAll, AdmitNone, AuthorizableStore, CachePolicy,
    RecordCursor, Repository,
};
pub use types::*;

mod access;
mod cache;
mod config;
mod error;
mod membership;
pub mod memory;
mod provider;
mod resolver;
mod search;
mod traits;
pub mod types;

#[cfg(test)]
mod test_support;
