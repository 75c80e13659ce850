//! Provider options.
//!
//! Hosts usually hand the provider a flat string property bag; the
//! recognised keys are the `*_KEY` constants below. Unknown keys are
//! ignored so the same bag can carry options for other components.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PrincipalError;

/// Option name for the max size of the principal cache.
pub const MAXSIZE_KEY: &str = "cacheMaxSize";
/// Option name to enable negative cache entries.
pub const NEGATIVE_ENTRY_KEY: &str = "cacheIncludesNegative";
/// Option name to make every principal an implicit member of everyone.
pub const EVERYONE_MEMBERSHIP_KEY: &str = "membershipIncludesEveryone";

pub const DEFAULT_CACHE_MAX_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOptions {
    pub cache_max_size: usize,
    pub cache_includes_negative: bool,
    pub membership_includes_everyone: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        ProviderOptions {
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
            cache_includes_negative: false,
            membership_includes_everyone: false,
        }
    }
}

impl ProviderOptions {
    /// Parse options from a host property bag, falling back to defaults for absent keys.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, PrincipalError> {
        let mut options = ProviderOptions::default();
        if let Some(value) = properties.get(MAXSIZE_KEY) {
            options.cache_max_size = value.trim().parse()?;
        }
        if let Some(value) = properties.get(NEGATIVE_ENTRY_KEY) {
            options.cache_includes_negative = value.trim().parse()?;
        }
        if let Some(value) = properties.get(EVERYONE_MEMBERSHIP_KEY) {
            options.membership_includes_everyone = value.trim().parse()?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a JSON object using the same key names.
    pub fn from_json_str(text: &str) -> Result<Self, PrincipalError> {
        let options: ProviderOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_cache_max_size(mut self, cache_max_size: usize) -> Self {
        self.cache_max_size = cache_max_size;
        self
    }

    pub fn with_negative_caching(mut self, enabled: bool) -> Self {
        self.cache_includes_negative = enabled;
        self
    }

    pub fn with_everyone_membership(mut self, enabled: bool) -> Self {
        self.membership_includes_everyone = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), PrincipalError> {
        self.cache_capacity().map(|_| ())
    }

    pub(crate) fn cache_capacity(&self) -> Result<NonZeroUsize, PrincipalError> {
        NonZeroUsize::new(self.cache_max_size).ok_or_else(|| {
            PrincipalError::InvalidArgument(format!("{MAXSIZE_KEY} must be greater than zero"))
        })
    }
}
