//! Fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};

use crate::cache::PrincipalCache;
use crate::config::ProviderOptions;
use crate::memory::{MemoryAccessControl, MemoryRepository, MemoryStore};
use crate::resolver::PrincipalResolver;
use crate::types::{Principal, WellKnownPrincipals};

/// all ⊃ staff ⊃ {alice, bob, engineers}, engineers ⊃ {carol}
pub(crate) fn staff_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new_shared();
    for group in ["all", "staff", "engineers"] {
        store.insert_group(group);
    }
    for user in ["alice", "bob", "carol"] {
        store.insert_user(user);
    }
    store.add_member("all", "staff");
    store.add_member("staff", "alice");
    store.add_member("staff", "bob");
    store.add_member("staff", "engineers");
    store.add_member("engineers", "carol");
    store
}

pub(crate) fn resolver_with(
    store: Arc<MemoryStore>,
    capacity: usize,
    include_negative: bool,
) -> PrincipalResolver {
    let options = ProviderOptions::default()
        .with_cache_max_size(capacity)
        .with_negative_caching(include_negative);
    let cache = PrincipalCache::new(
        options.cache_capacity().expect("test capacity is non-zero"),
        options.cache_includes_negative,
    );
    PrincipalResolver::new(store, WellKnownPrincipals::standard(), Arc::new(cache))
}

pub(crate) fn staff_repository() -> MemoryRepository {
    MemoryRepository::new(staff_store(), Arc::new(MemoryAccessControl::new()))
}

pub(crate) fn names<I>(principals: I) -> Vec<String>
where
    I: IntoIterator<Item = Arc<Principal>>,
{
    principals
        .into_iter()
        .map(|p| p.name().to_string())
        .collect()
}

#[derive(Clone, Default)]
struct SharedLogBuffer(Arc<Mutex<Vec<u8>>>);

struct SharedLogWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(Arc::clone(&self.0))
    }
}

impl std::io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber and return everything it logged.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedLogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
