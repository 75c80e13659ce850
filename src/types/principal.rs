//! Resolved principals handed out to the host.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

use super::authorizable::{AuthorizableKind, AuthorizableRecord};

/// What kind of identity a principal stands for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    StrumDisplay,
    EnumString,
)]
pub enum PrincipalKind {
    User,
    Group,
    Everyone,
    Admin,
    Anonymous,
}

impl From<AuthorizableKind> for PrincipalKind {
    fn from(kind: AuthorizableKind) -> Self {
        match kind {
            AuthorizableKind::User => PrincipalKind::User,
            AuthorizableKind::Group => PrincipalKind::Group,
        }
    }
}

/// A resolved identity. Immutable once built.
///
/// Principals built from the store keep a shared handle on the record they
/// came from so membership expansion can start without another lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    kind: PrincipalKind,
    #[serde(skip)]
    record: Option<Arc<AuthorizableRecord>>,
}

impl Principal {
    /// Wrap a store record.
    pub fn from_record(record: AuthorizableRecord) -> Self {
        Principal {
            name: record.id().to_string(),
            kind: record.kind().into(),
            record: Some(Arc::new(record)),
        }
    }

    /// A principal with no backing record, used for the well-known identities.
    pub fn detached<T: Into<String>>(name: T, kind: PrincipalKind) -> Self {
        Principal {
            name: name.into(),
            kind,
            record: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind == PrincipalKind::Group
    }

    pub fn record(&self) -> Option<&AuthorizableRecord> {
        self.record.as_deref()
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Eq for Principal {}

impl std::hash::Hash for Principal {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}::\"{}\"", self.kind, self.name)
    }
}
