//! Raw identity records as exposed by the authorizable store.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

/// The property every record exposes its principal name under.
pub const PRINCIPAL_NAME_PROPERTY: &str = "principalName";

/// Whether a record is a user or a group.
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
pub enum AuthorizableKind {
    User,
    Group,
}

/// An identity record owned by the external store.
///
/// `group_ids` lists the groups this record directly belongs to, in store
/// order. `member_ids` lists the direct members and is only populated for
/// groups.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorizableRecord {
    id: String,
    kind: AuthorizableKind,
    #[serde(default)]
    group_ids: Vec<String>,
    #[serde(default)]
    member_ids: Vec<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl AuthorizableRecord {
    /// Create a user record with its direct groups.
    pub fn user<T: Into<String>>(id: T, group_ids: Vec<String>) -> Self {
        let id = id.into();
        AuthorizableRecord {
            properties: principal_name_properties(&id),
            id,
            kind: AuthorizableKind::User,
            group_ids,
            member_ids: Vec::new(),
        }
    }

    /// Create a group record with its direct parent groups and members.
    pub fn group<T: Into<String>>(id: T, group_ids: Vec<String>, member_ids: Vec<String>) -> Self {
        let id = id.into();
        AuthorizableRecord {
            properties: principal_name_properties(&id),
            id,
            kind: AuthorizableKind::Group,
            group_ids,
            member_ids,
        }
    }

    /// Attach an extra property, replacing any previous value.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AuthorizableKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind == AuthorizableKind::Group
    }

    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    /// Direct members; always empty for users.
    pub fn member_ids(&self) -> &[String] {
        match self.kind {
            AuthorizableKind::Group => &self.member_ids,
            AuthorizableKind::User => &[],
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub(crate) fn add_group_id(&mut self, group_id: &str) {
        if !self.group_ids.iter().any(|g| g == group_id) {
            self.group_ids.push(group_id.to_string());
        }
    }

    pub(crate) fn add_member_id(&mut self, member_id: &str) {
        if !self.member_ids.iter().any(|m| m == member_id) {
            self.member_ids.push(member_id.to_string());
        }
    }
}

impl Display for AuthorizableRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}::\"{}\"", self.kind, self.id)
    }
}

fn principal_name_properties(id: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    properties.insert(PRINCIPAL_NAME_PROPERTY.to_string(), id.to_string());
    properties
}

/// A single attribute-equality query against the store.
///
/// A `value` of `None` matches every record carrying the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeQuery {
    pub attribute: String,
    pub value: Option<String>,
}

impl AttributeQuery {
    pub fn new(attribute: impl Into<String>, value: Option<&str>) -> Self {
        AttributeQuery {
            attribute: attribute.into(),
            value: value.map(str::to_string),
        }
    }

    /// Query on the principal name property.
    pub fn principal_name(value: Option<&str>) -> Self {
        Self::new(PRINCIPAL_NAME_PROPERTY, value)
    }

    pub fn matches(&self, record: &AuthorizableRecord) -> bool {
        match (record.property(&self.attribute), &self.value) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl Display for AttributeQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.value {
            Some(value) => write!(f, "{} == \"{}\"", self.attribute, value),
            None => write!(f, "{} == *", self.attribute),
        }
    }
}
