//! Cache Watcher
//!
//! Write side of a resource cache: a long-lived task that keeps a reflector
//! store in sync with the API server until it is told to stop.

use super::resource::ResourceCache;
use futures::{Stream, StreamExt};
use k8s_openapi::NamespaceResourceScope;
use kube::runtime::reflector::{self, store::Writer};
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Build the API handle a cache watches
///
/// A single allowed namespace narrows the watch to that namespace. Anything
/// else watches cluster-wide and relies on the collector to filter.
pub fn watch_api<K>(client: Client, allowed_namespaces: &[String]) -> Api<K>
where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
{
    match allowed_namespaces {
        [namespace] => Api::namespaced(client, namespace),
        _ => Api::all(client),
    }
}

/// Create a cache for kind `K` together with the task that fills it
pub fn watched_cache<K>(api: Api<K>) -> (ResourceCache<K>, CacheWatcher<K>)
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    let (store, writer) = reflector::store();
    let synced = Arc::new(AtomicBool::new(false));

    let cache = ResourceCache::new(store, synced.clone());
    let watcher = CacheWatcher {
        api,
        writer,
        synced,
    };
    (cache, watcher)
}

/// Background task that is the sole writer of a [`ResourceCache`]
pub struct CacheWatcher<K>
where
    K: Resource<DynamicType = ()> + 'static,
{
    api: Api<K>,
    writer: Writer<K>,
    synced: Arc<AtomicBool>,
}

impl<K> CacheWatcher<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    /// Run the watch loop until `shutdown` is cancelled
    ///
    /// Watch errors are retried with backoff by the underlying stream and
    /// never end the task.
    pub async fn run(self, shutdown: CancellationToken) {
        let CacheWatcher {
            api,
            writer,
            synced,
        } = self;
        let kind = K::kind(&()).into_owned();

        info!(kind = %kind, "Starting cache watcher");

        let stream = reflector::reflector(
            writer,
            watcher(api, watcher::Config::default()).default_backoff(),
        );
        drive(stream, &synced, &kind, &shutdown).await;
    }
}

/// Consume watch events until the stream ends or `shutdown` is cancelled
///
/// The first `Restarted` event marks the cache synced. Later relists and
/// watch errors never clear the flag.
async fn drive<K, S>(stream: S, synced: &AtomicBool, kind: &str, shutdown: &CancellationToken)
where
    S: Stream<Item = Result<watcher::Event<K>, watcher::Error>>,
{
    let mut stream = std::pin::pin!(stream);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(kind = %kind, "Cache watcher shutting down");
                break;
            }
            event = stream.next() => match event {
                Some(Ok(watcher::Event::Restarted(objects))) => {
                    if !synced.swap(true, Ordering::AcqRel) {
                        info!(kind = %kind, count = objects.len(), "Cache synced");
                    } else {
                        debug!(kind = %kind, count = objects.len(), "Cache relisted");
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(kind = %kind, error = %e, "Watch error");
                }
                None => {
                    warn!(kind = %kind, "Watch stream ended");
                    break;
                }
            },
        }
    }
}
