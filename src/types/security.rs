//! Security zones and permissions understood by the access-control engine.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

/// A partition of the access-control policy space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsRefStr, EnumString,
)]
pub enum SecurityZone {
    /// Visibility of identities themselves.
    #[strum(serialize = "AU")]
    Authorizables,
    #[strum(serialize = "CO")]
    Content,
    #[strum(serialize = "AC")]
    AccessControl,
}

impl Display for SecurityZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

/// A permission bit together with its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Permission {
    pub name: &'static str,
    pub bits: u32,
}

impl Permission {
    pub const CAN_READ: Permission = Permission::new("read", 0x0001);
    pub const CAN_WRITE: Permission = Permission::new("write", 0x0002);
    pub const CAN_DELETE: Permission = Permission::new("delete", 0x0004);

    pub const fn new(name: &'static str, bits: u32) -> Self {
        Permission { name, bits }
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn implies(&self, other: Permission) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}
