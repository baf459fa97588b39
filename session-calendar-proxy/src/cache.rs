use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task;
use tokio::time::{sleep, Duration, Instant};

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

struct Entry<V> {
    expires: Instant,
    value: Arc<V>,
}

/// Time-bounded cache of upstream responses, keyed by mentor.
pub struct TtlCache<K, V> {
    enabled: bool,
    ttl: Duration,
    inner: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: RwLock::default(),
        })
    }

    /// Stores `value` and schedules its eviction. A disabled cache only wraps
    /// the value.
    pub async fn insert(self: &Arc<Self>, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        if !self.enabled {
            return value;
        }

        let expires = Instant::now() + self.ttl;
        self.inner.write().await.insert(
            key.clone(),
            Entry {
                expires,
                value: Arc::clone(&value),
            },
        );

        let cache = Arc::clone(self);
        task::spawn(async move {
            sleep(cache.ttl).await;
            let mut inner = cache.inner.write().await;
            // A newer insert for the same key carries its own timer.
            if inner.get(&key).is_some_and(|entry| entry.expires <= Instant::now()) {
                inner.remove(&key);
            }
        });

        value
    }

    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        let inner = self.inner.read().await;
        let entry = inner.get(key)?;
        (entry.expires > Instant::now()).then(|| Arc::clone(&entry.value))
    }
}
