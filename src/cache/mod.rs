//! Watch-Populated Resource Caches
//!
//! Each watched kind gets one [`CacheWatcher`] task (the only writer) and any
//! number of [`ResourceCache`] readers sharing the same reflector store.
//!
//! ```text
//!   API server ──watch──▶ CacheWatcher ──writes──▶ reflector Store
//!                                                      │
//!                          collector ◀──ResourceLister──┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ocs_exporter::cache::{watch_api, watched_cache};
//! use ocs_exporter::crd::CephBlockPool;
//!
//! let api = watch_api::<CephBlockPool>(client, &allowed_namespaces);
//! let (pools, watcher) = watched_cache(api);
//! tokio::spawn(watcher.run(shutdown.clone()));
//! ```

pub mod resource;
pub mod watcher;

pub use resource::ResourceCache;
pub use watcher::{watch_api, watched_cache, CacheWatcher};
