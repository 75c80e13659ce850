//! Data model types shared by the resolver, walker, search adapter and access filter.
//!
//! Canonical string forms:
//! - Record: `User::"alice"`, `Group::"staff"`
//! - Principal: `User::"alice"`, `Everyone::"everyone"`, `Admin::"admin"`
//! - Attribute query: `principalName == "alice"`, or `principalName == *` for the universal filter

mod authorizable;
mod principal;
mod search_type;
mod security;
mod well_known;

pub use authorizable::{AttributeQuery, AuthorizableKind, AuthorizableRecord, PRINCIPAL_NAME_PROPERTY};
pub use principal::{Principal, PrincipalKind};
pub use search_type::SearchType;
pub use security::{Permission, SecurityZone};
pub use well_known::{ADMIN_NAME, ANONYMOUS_NAME, EVERYONE_NAME, WellKnownPrincipals};
