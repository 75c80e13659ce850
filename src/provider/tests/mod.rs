use std::collections::HashMap;

use super::*;
use crate::memory::{ANY_RESOURCE, MemoryAccessControl, MemoryRepository, MemoryStore};
use crate::test_support::{capture_logs, names, staff_repository};
use crate::types::{Permission, PrincipalKind, SecurityZone};
use yare::parameterized;

mod listing;

fn ready_provider(repository: &MemoryRepository, options: ProviderOptions) -> SparsePrincipalProvider {
    let provider = SparsePrincipalProvider::new(repository).expect("login should succeed");
    provider.initialize(options).expect("first initialize should succeed");
    provider
}

fn default_provider(repository: &MemoryRepository) -> SparsePrincipalProvider {
    ready_provider(repository, ProviderOptions::default())
}

fn properties(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
