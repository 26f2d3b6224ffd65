use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Staleness rule for a [`ReadThroughCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Loaded once and kept until explicitly invalidated.
    Session,
    /// Reloaded once the cached value is older than the duration.
    Ttl(Duration),
}

impl CachePolicy {
    /// `0` maps to [`CachePolicy::Session`].
    pub fn from_ttl_secs(secs: u64) -> Self {
        if secs == 0 {
            return Self::Session;
        }

        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Duration::try_seconds(secs)
            .map(Self::Ttl)
            .unwrap_or(Self::Session)
    }

    fn is_fresh(&self, loaded_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Session => true,
            Self::Ttl(ttl) => now - loaded_at < *ttl,
        }
    }
}

#[derive(Debug)]
struct CachedValue<T> {
    loaded_at: DateTime<Utc>,
    value: Arc<T>,
}

/// Single-value cache that loads on first use and reloads when stale.
///
/// Callers receive an `Arc` snapshot, so computation never runs under the lock.
/// A failed load keeps the previous value and returns the loader's error.
#[derive(Debug)]
pub struct ReadThroughCache<T> {
    policy: CachePolicy,
    slot: Mutex<Option<CachedValue<T>>>,
}

impl<T> ReadThroughCache<T> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            slot: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn get_or_load<E, F>(&self, now: DateTime<Utc>, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.get_or_load_unless(now, |_| true, loader)
    }

    /// Like [`get_or_load`](Self::get_or_load), but also reloads a fresh value
    /// when `still_valid` rejects it.
    pub fn get_or_load_unless<E, F, V>(
        &self,
        now: DateTime<Utc>,
        still_valid: V,
        loader: F,
    ) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
        V: FnOnce(&T) -> bool,
    {
        let mut slot = self.lock();

        if let Some(cached) = slot.as_ref() {
            if self.policy.is_fresh(cached.loaded_at, now) && still_valid(&cached.value) {
                return Ok(Arc::clone(&cached.value));
            }
        }

        let value = Arc::new(loader()?);
        *slot = Some(CachedValue {
            loaded_at: now,
            value: Arc::clone(&value),
        });
        Ok(value)
    }

    pub fn peek(&self) -> Option<Arc<T>> {
        self.lock().as_ref().map(|cached| Arc::clone(&cached.value))
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.lock().as_ref().map(|cached| cached.loaded_at)
    }

    pub fn invalidate(&self) {
        self.lock().take();
    }

    fn lock(&self) -> MutexGuard<'_, Option<CachedValue<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
