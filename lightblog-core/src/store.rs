//! The live article collection and its refresh protocol.
//!
//! ```text
//!   readers (routes, feeds)          writer (startup, version watcher)
//!          │                                   │
//!      snapshot()  ◄──── ArcSwap<Collection> ◄─┤ refresh() / RefreshTrigger::fire()
//!    (lock-free)         (atomic replace)      │  (one rebuild at a time)
//! ```
//!
//! A rebuild happens entirely off to the side and is installed with a single
//! pointer swap. Readers keep using whatever snapshot they loaded; they never
//! wait for file I/O and never see a half-built collection.

use crate::builder::CollectionBuilder;
use crate::collection::Collection;
use crate::config::{Config, ConfigError};
use crate::version::VersionMarker;
use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

type RefreshListener = Box<dyn Fn(&Arc<Collection>) + Send + Sync>;

/// Owner of the current [`Collection`]
pub struct ArticleStore {
    config: Arc<Config>,
    builder: CollectionBuilder,
    version: VersionMarker,
    current: ArcSwap<Collection>,
    refresh_lock: Mutex<()>,
    pending: AtomicBool,
    generation: AtomicU64,
    listeners: RwLock<Vec<RefreshListener>>,
}

impl ArticleStore {
    /// Validate the configuration and create a store holding an empty
    /// collection. Nothing is read until the first refresh.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let builder = CollectionBuilder::new(Arc::clone(&config))?;
        let version = VersionMarker::new(config.version_file());

        Ok(Self {
            config,
            builder,
            version,
            current: ArcSwap::from_pointee(Collection::empty()),
            refresh_lock: Mutex::new(()),
            pending: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        })
    }

    /// [`ArticleStore::new`] followed by an initial refresh
    pub fn open(config: Config) -> Result<Self, ConfigError> {
        let store = Self::new(config)?;
        store.refresh();
        Ok(store)
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn version(&self) -> &VersionMarker {
        &self.version
    }

    /// Current collection. Wait-free; the snapshot stays valid for as long
    /// as the caller holds it, even across refreshes.
    pub fn snapshot(&self) -> Arc<Collection> {
        self.current.load_full()
    }

    /// Number of completed rebuilds
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Rebuild the collection from disk and install it.
    ///
    /// Blocks while another rebuild is in flight, then rebuilds again so the
    /// result reflects the filesystem as of this call.
    pub fn refresh(&self) -> Arc<Collection> {
        let guard = self.refresh_lock.lock();
        self.pending.store(false, Ordering::Release);
        let collection = self.rebuild();
        drop(guard);

        self.drain_pending();
        collection
    }

    /// Ask for a rebuild without waiting for one already in flight.
    ///
    /// Requests that arrive while a rebuild runs are coalesced into a single
    /// follow-up rebuild. Returns whether this call performed a rebuild.
    pub fn request_refresh(&self) -> bool {
        self.pending.store(true, Ordering::Release);
        self.drain_pending()
    }

    /// Register a callback run after every installed rebuild, with the new
    /// snapshot. Route tables hang off this. Callbacks run on the refreshing
    /// thread and must not register further callbacks.
    pub fn on_refresh<F>(&self, listener: F)
    where
        F: Fn(&Arc<Collection>) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    /// Handle for an external change watcher
    pub fn trigger(self: &Arc<Self>) -> RefreshTrigger {
        RefreshTrigger {
            store: Arc::downgrade(self),
        }
    }

    fn drain_pending(&self) -> bool {
        let mut rebuilt = false;
        while self.pending.load(Ordering::Acquire) {
            // Whoever holds the lock drains the flag after releasing it.
            let Some(guard) = self.refresh_lock.try_lock() else {
                break;
            };
            while self.pending.swap(false, Ordering::AcqRel) {
                self.rebuild();
                rebuilt = true;
            }
            drop(guard);
        }
        rebuilt
    }

    // Caller holds `refresh_lock`.
    fn rebuild(&self) -> Arc<Collection> {
        let started = Instant::now();
        let collection = Arc::new(self.builder.build());
        self.current.store(Arc::clone(&collection));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            "Refreshed articles (generation {}): {} articles, {} tags, {} skipped in {:?}",
            generation,
            collection.len(),
            collection.tags().len(),
            collection.skipped().len(),
            started.elapsed()
        );

        for listener in self.listeners.read().iter() {
            listener(&collection);
        }

        collection
    }
}

/// Cloneable "on change, call refresh" handle given to change watchers.
///
/// Holds the store weakly; firing after the store is gone does nothing.
#[derive(Clone)]
pub struct RefreshTrigger {
    store: Weak<ArticleStore>,
}

impl RefreshTrigger {
    /// Request a coalesced rebuild. Returns `false` once the store is dropped.
    pub fn fire(&self) -> bool {
        match self.store.upgrade() {
            Some(store) => {
                store.request_refresh();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use tempfile::{tempdir, TempDir};

    fn article(dir: &Path, name: &str, title: &str, tag: &str) {
        fs::write(
            dir.join(format!("{}.md", name)),
            format!(
                "title: {}\ncreated_at: 2022-06-01 10:00\ntags: [{}]\n\nBody",
                title, tag
            ),
        )
        .unwrap();
    }

    fn blog() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("version"), "1").unwrap();
        article(dir.path(), "first", "First", "one");
        dir
    }

    #[test]
    fn test_new_store_starts_empty() {
        let dir = blog();
        let store = ArticleStore::new(Config::for_articles(dir.path())).unwrap();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn test_open_rejects_bad_config() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            ArticleStore::open(Config::for_articles(dir.path())),
            Err(ConfigError::UnreadableVersionFile(_))
        ));
    }

    #[test]
    fn test_refresh_swaps_whole_snapshot() {
        let dir = blog();
        let store = ArticleStore::open(Config::for_articles(dir.path())).unwrap();
        let before = store.snapshot();
        assert_eq!(before.len(), 1);

        article(dir.path(), "second", "Second", "two");
        let after = store.refresh();

        assert_eq!(after.len(), 2);
        assert_eq!(store.snapshot().len(), 2);
        // the old snapshot is untouched
        assert_eq!(before.len(), 1);
        assert_eq!(before.sorted_tags(), vec!["one"]);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_repeated_refresh_is_equal_in_content() {
        let dir = blog();
        let store = ArticleStore::open(Config::for_articles(dir.path())).unwrap();
        let first = store.snapshot();
        let second = store.refresh();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_listeners_see_new_snapshot() {
        let dir = blog();
        let store = ArticleStore::new(Config::for_articles(dir.path())).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        store.on_refresh(move |collection| {
            counter.store(collection.len(), Ordering::SeqCst);
        });

        store.refresh();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trigger_refreshes_and_outlives_store() {
        let dir = blog();
        let store = Arc::new(ArticleStore::new(Config::for_articles(dir.path())).unwrap());
        let trigger = store.trigger();

        assert!(trigger.fire());
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.generation(), 1);

        drop(store);
        assert!(!trigger.fire());
    }

    #[test]
    fn test_readers_never_see_partial_state() {
        let dir = blog();
        for i in 0..20 {
            article(
                dir.path(),
                &format!("post{}", i),
                &format!("Post {}", i),
                &format!("t{}", i),
            );
        }
        let store = Arc::new(ArticleStore::open(Config::for_articles(dir.path())).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.snapshot();
                        let from_articles: BTreeSet<String> = snapshot
                            .articles()
                            .iter()
                            .flat_map(|a| a.tags().iter().cloned())
                            .collect();
                        assert_eq!(&from_articles, snapshot.tags());
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    store.request_refresh();
                }
            })
        };

        for _ in 0..5 {
            store.refresh();
        }
        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.snapshot().len(), 21);
    }
}
