//! One-time store initialization owned by the application's composition root.

use super::{LabStore, StoreLocation, StoreResult};
use log::warn;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Hands out exactly one `LabStore` for its own lifetime.
///
/// Construct one per application and pass it by reference; there is no
/// process-wide instance.
#[derive(Debug, Default)]
pub struct StoreProvider {
    store: OnceCell<Arc<LabStore>>,
}

impl StoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store, creating and seeding it at `location_hint` on the
    /// first call.
    ///
    /// # Invariants
    /// - Concurrent first calls block until one initialization finishes; all
    ///   of them receive the same handle.
    /// - Later calls return that handle unchanged, whatever hint they pass.
    /// - A failed initialization leaves the provider empty, so a later call
    ///   retries.
    pub fn get_store(&self, location_hint: &StoreLocation) -> StoreResult<Arc<LabStore>> {
        let store = self
            .store
            .get_or_try_init(|| LabStore::open(location_hint).map(Arc::new))?;

        if store.location() != location_hint {
            warn!(
                "event=store_init module=store status=reused requested={location_hint} active={}",
                store.location()
            );
        }

        Ok(Arc::clone(store))
    }

    /// Returns the store if it was already created.
    pub fn current(&self) -> Option<Arc<LabStore>> {
        self.store.get().cloned()
    }
}
