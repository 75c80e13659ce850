//! Principal search types and their host integer codes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::PrincipalError;

/// Which principals a search should return.
///
/// All three currently issue the same store query; no type filtering is
/// applied to the results.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    Display,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SearchType {
    #[strum(to_string = "NotGroup", serialize = "not_group")]
    NotGroup,
    Group,
    #[default]
    All,
}

impl SearchType {
    pub const NOT_GROUP_CODE: i32 = 1;
    pub const GROUP_CODE: i32 = 2;
    pub const ALL_CODE: i32 = 3;

    pub fn code(self) -> i32 {
        match self {
            SearchType::NotGroup => Self::NOT_GROUP_CODE,
            SearchType::Group => Self::GROUP_CODE,
            SearchType::All => Self::ALL_CODE,
        }
    }
}

impl TryFrom<i32> for SearchType {
    type Error = PrincipalError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            Self::NOT_GROUP_CODE => Ok(SearchType::NotGroup),
            Self::GROUP_CODE => Ok(SearchType::Group),
            Self::ALL_CODE => Ok(SearchType::All),
            other => Err(PrincipalError::InvalidArgument(format!(
                "Invalid searchType: {other}"
            ))),
        }
    }
}
