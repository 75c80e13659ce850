use super::*;
use crate::traits::AdmitNone;

#[parameterized(
    all = { SearchType::All },
    group = { SearchType::Group },
    not_group = { SearchType::NotGroup },
)]
fn test_find_principals_ignores_search_type(search_type: SearchType) {
    let repository = staff_repository();
    let provider = default_provider(&repository);

    let found = names(provider.find_principals(Some("alice"), search_type).unwrap());
    assert_eq!(found, vec!["alice"]);
    let found = names(provider.find_principals(Some("engineers"), search_type).unwrap());
    assert_eq!(found, vec!["engineers"]);
}

#[test]
fn test_find_principals_all_defaults_to_all() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    assert_eq!(
        names(provider.find_principals_all(Some("bob")).unwrap()),
        names(provider.find_principals(Some("bob"), SearchType::All).unwrap())
    );
}

#[parameterized(
    not_group = { 1 },
    group = { 2 },
    all = { 3 },
)]
fn test_find_principals_by_code(code: i32) {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    assert_eq!(names(provider.find_principals_by_code(Some("carol"), code).unwrap()), vec!["carol"]);
}

#[test]
fn test_find_principals_by_unknown_code() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    let result = provider.find_principals_by_code(Some("carol"), 42);
    assert!(matches!(result, Err(PrincipalError::InvalidArgument(_))));
    assert_eq!(repository.store().query_count(), 0);
}

#[test]
fn test_get_principals_lists_everything() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    assert_eq!(
        names(provider.get_principals(SearchType::NotGroup).unwrap()),
        vec!["alice", "all", "bob", "carol", "engineers", "staff"]
    );
}

#[test]
fn test_find_principals_store_error_is_empty() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    repository.store().fail_next(1);
    assert_eq!(provider.find_principals_all(None).unwrap().count(), 0);
}

#[test]
fn test_search_and_lookup_share_instances() {
    let repository = staff_repository();
    let provider = default_provider(&repository);

    let found: Vec<_> = provider.find_principals_all(Some("staff")).unwrap().collect();
    let staff = provider.get_principal("staff").unwrap().unwrap();
    assert!(Arc::ptr_eq(&found[0], &staff));
    assert_eq!(repository.store().lookup_count(), 0);
}

#[test]
fn test_group_membership() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    let staff = provider.get_principal("staff").unwrap().unwrap();

    assert_eq!(
        names(provider.get_group_membership(&staff).unwrap()),
        vec!["alice", "bob", "engineers", "staff", "all"]
    );
}

#[test]
fn test_group_membership_of_user_without_groups() {
    let store = MemoryStore::new_shared();
    store.insert_user("loner");
    let repository = MemoryRepository::new(store, Arc::new(MemoryAccessControl::new()));
    let provider = default_provider(&repository);

    let loner = provider.get_principal("loner").unwrap().unwrap();
    assert_eq!(provider.get_group_membership(&loner).unwrap().count(), 0);
}

#[test]
fn test_group_membership_with_implicit_everyone() {
    let repository = staff_repository();
    let provider = ready_provider(&repository, ProviderOptions::default().with_everyone_membership(true));
    let alice = provider.get_principal("alice").unwrap().unwrap();

    let yielded: Vec<_> = provider.get_group_membership(&alice).unwrap().collect();
    assert_eq!(yielded.len(), 1);
    assert!(Arc::ptr_eq(&yielded[0], WellKnownPrincipals::standard().everyone()));
}

#[test]
fn test_group_membership_cycle() {
    let store = MemoryStore::new_shared();
    store.insert_group("g1");
    store.insert_group("g2");
    store.insert_user("dave");
    store.add_member("g1", "g2");
    store.add_member("g2", "g1");
    store.add_member("g1", "dave");
    let repository = MemoryRepository::new(store, Arc::new(MemoryAccessControl::new()));
    let provider = default_provider(&repository);

    let g1 = provider.get_principal("g1").unwrap().unwrap();
    let yielded = names(provider.get_group_membership(&g1).unwrap());
    assert_eq!(yielded, vec!["g2", "dave", "g1"]);
}

#[test]
fn test_group_membership_survives_shutdown_midway() {
    let repository = staff_repository();
    let provider = default_provider(&repository);
    let staff = provider.get_principal("staff").unwrap().unwrap();

    let mut walk = provider.get_group_membership(&staff).unwrap();
    assert_eq!(walk.next().unwrap().name(), "alice");
    provider.shutdown();

    // The walk owns its frontier; the provider refuses new work.
    assert!(walk.next().is_some());
    assert!(matches!(provider.get_group_membership(&staff), Err(PrincipalError::NotInitialized)));
}

#[test]
fn test_cache_policy_controls_walk_caching() {
    let repository = staff_repository();
    let provider = SparsePrincipalProvider::new(&repository)
        .unwrap()
        .with_cache_policy(Arc::new(AdmitNone));
    provider.initialize(ProviderOptions::default()).unwrap();

    let staff = provider.get_principal("staff").unwrap().unwrap();
    let size_before = provider.cache_stats().unwrap().size;
    assert_eq!(provider.get_group_membership(&staff).unwrap().count(), 5);
    assert_eq!(provider.cache_stats().unwrap().size, size_before);
}
