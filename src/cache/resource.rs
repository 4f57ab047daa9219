//! Resource Cache
//!
//! Read side of a watch-populated cache. Wraps a reflector [`Store`] and
//! serves namespace-scoped snapshots to the metrics collector.

use crate::domain::ports::{ListScope, ResourceLister};
use crate::error::{Error, Result};
use kube::runtime::reflector::Store;
use kube::Resource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read-only, eventually-consistent view of one resource kind
///
/// Clones share the same underlying store.
pub struct ResourceCache<K>
where
    K: Resource<DynamicType = ()> + 'static,
{
    store: Store<K>,
    synced: Arc<AtomicBool>,
}

impl<K> Clone for ResourceCache<K>
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            synced: self.synced.clone(),
        }
    }
}

impl<K> ResourceCache<K>
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    pub(crate) fn new(store: Store<K>, synced: Arc<AtomicBool>) -> Self {
        Self { store, synced }
    }

    /// Whether the initial list has been loaded into the cache
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    /// Number of cached objects across all namespaces
    pub fn len(&self) -> usize {
        self.store.state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> ResourceLister<K> for ResourceCache<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    fn list(&self, scope: ListScope<'_>) -> Result<Vec<Arc<K>>> {
        if !self.is_synced() {
            return Err(Error::CacheNotSynced {
                kind: K::kind(&()).into_owned(),
            });
        }

        let objects = self.store.state();
        Ok(match scope {
            ListScope::All => objects,
            ListScope::Namespace(ns) => objects
                .into_iter()
                .filter(|obj| obj.meta().namespace.as_deref() == Some(ns))
                .collect(),
        })
    }
}
