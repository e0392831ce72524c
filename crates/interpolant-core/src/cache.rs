//! Bounded caches for parsed templates and normalized keys.
//!
//! Both caches evict the least recently used entry once full. A single
//! [`CacheService`] owns all of them and is shared by every
//! [`Interpolator`](crate::Interpolator) unless one is given its own.

use crate::keys::{self, SuffixMode};
use crate::template::tokenize;
use crate::{InterpolationConfig, Token};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, trace};

/// Fixed-capacity map that evicts the least recently accessed entry.
///
/// Both `get` and `put` refresh an entry's recency; `contains_key` does not.
/// All operations take one internal lock, so a cache can be shared freely
/// between threads.
pub struct LruCache<K, V> {
    state: Mutex<LruState<K, V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

struct LruState<K, V> {
    // key -> (value, last access tick)
    entries: HashMap<K, (V, u64)>,
    // last access tick -> key, oldest first
    order: BTreeMap<u64, K>,
    tick: u64,
}

impl<K, V> LruState<K, V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(LruState {
                entries: HashMap::with_capacity(capacity.min(1024)),
                order: BTreeMap::new(),
                tick: 0,
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave `entries` and `order`
    // out of step, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, LruState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up an entry and mark it as most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.lock();
        let tick = guard.next_tick();
        let LruState { entries, order, .. } = &mut *guard;

        match entries.get_mut(key) {
            Some((value, last)) => {
                let previous = std::mem::replace(last, tick);
                if let Some(k) = order.remove(&previous) {
                    order.insert(tick, k);
                }
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or replace an entry, evicting the least recently used one if
    /// the cache grows past capacity.
    pub fn put(&self, key: K, value: V) {
        let mut guard = self.lock();
        let tick = guard.next_tick();
        let LruState { entries, order, .. } = &mut *guard;

        if let Some((slot, last)) = entries.get_mut(&key) {
            *slot = value;
            let previous = std::mem::replace(last, tick);
            if let Some(k) = order.remove(&previous) {
                order.insert(tick, k);
            }
            return;
        }

        entries.insert(key.clone(), (value, tick));
        order.insert(tick, key);

        while entries.len() > self.capacity {
            let Some((_, evicted)) = order.pop_first() else {
                break;
            };
            entries.remove(&evicted);
            trace!(capacity = self.capacity, "Evicted least recently used cache entry");
        }
    }

    /// Check for an entry without touching its recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().entries.contains_key(key)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries before eviction starts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of `get` calls that found an entry.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of `get` calls that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .state
            .lock()
            .map(|s| s.entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().entries.len());
        f.debug_struct("LruCache")
            .field("len", &len)
            .field("capacity", &self.capacity)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

static SHARED: OnceLock<Arc<CacheService>> = OnceLock::new();

/// Owner of the template cache and the key caches.
///
/// Normalized keys are cached per [`SuffixMode`], each cache keyed by the raw
/// key text and sized by `key_cache_capacity`.
///
/// The process-wide instance from [`CacheService::shared`] is created on
/// first use and lives until exit. It is never reset.
#[derive(Debug)]
pub struct CacheService {
    templates: LruCache<String, Arc<[Token]>>,
    trimmed_keys: LruCache<String, Arc<str>>,
    untrimmed_keys: LruCache<String, Arc<str>>,
}

impl CacheService {
    /// Build a private cache service.
    pub fn new(config: &InterpolationConfig) -> Self {
        Self {
            templates: LruCache::new(config.template_cache_capacity),
            trimmed_keys: LruCache::new(config.key_cache_capacity),
            untrimmed_keys: LruCache::new(config.key_cache_capacity),
        }
    }

    /// The process-wide cache service, sized from the environment on first use.
    pub fn shared() -> Arc<Self> {
        SHARED
            .get_or_init(|| {
                let config = InterpolationConfig::from_env();
                debug!(
                    template_capacity = config.template_cache_capacity,
                    key_capacity = config.key_cache_capacity,
                    "Initializing shared interpolation caches"
                );
                Arc::new(Self::new(&config))
            })
            .clone()
    }

    /// Tokens for `template`, parsed at most once while cached.
    pub fn tokens(&self, template: &str) -> Arc<[Token]> {
        if let Some(tokens) = self.templates.get(template) {
            return tokens;
        }

        debug!(len = template.len(), "Template cache miss");
        let tokens: Arc<[Token]> = tokenize(template).into();
        // Racing parsers produce identical tokens; the last write wins.
        self.templates.put(template.to_owned(), Arc::clone(&tokens));
        tokens
    }

    /// `raw` with its suffix marker removed, or `None` if it has no marker.
    pub fn normalized_key(&self, mode: SuffixMode, raw: &str) -> Option<Arc<str>> {
        let cache = self.key_cache(mode);
        if let Some(key) = cache.get(raw) {
            return Some(key);
        }

        trace!(?mode, raw, "Key cache miss");
        let key: Arc<str> = keys::strip_suffix(raw, mode)?.into();
        cache.put(raw.to_owned(), Arc::clone(&key));
        Some(key)
    }

    /// Cache of parsed templates, keyed by template text.
    pub fn template_cache(&self) -> &LruCache<String, Arc<[Token]>> {
        &self.templates
    }

    /// Cache of normalized keys for `mode`, keyed by raw key text.
    pub fn key_cache(&self, mode: SuffixMode) -> &LruCache<String, Arc<str>> {
        match mode {
            SuffixMode::Trimmed => &self.trimmed_keys,
            SuffixMode::Untrimmed => &self.untrimmed_keys,
        }
    }
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new(&InterpolationConfig::default())
    }
}
