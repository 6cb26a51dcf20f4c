//! Per-instance cache for cached fields.
//!
//! Each page instance owns one [`FieldCache`]. Every cached field gets a
//! slot the first time it is read. A slot is filled at most once: the
//! first reader computes, concurrent readers wait for it, later readers
//! get the stored value without locking.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use serde_json::Value;
use tokio::sync::Notify;

/// One cached field. Synchronous and asynchronous readers share the
/// `running` flag, so only one of them computes at a time whichever way
/// they read.
#[derive(Debug, Default)]
pub(crate) struct FieldSlot {
    value: OnceCell<Value>,
    running: Mutex<bool>,
    // Wakes blocked synchronous readers
    finished: Condvar,
    // Wakes suspended asynchronous readers
    notify: Notify,
}

/// Clears the `running` flag when the computing reader is done, including
/// when it panics or its future is dropped.
struct RunningGuard<'a> {
    slot: &'a FieldSlot,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock_running() = false;
        self.slot.finished.notify_all();
        self.slot.notify.notify_waiters();
    }
}

impl FieldSlot {
    pub(crate) fn get(&self) -> Option<&Value> {
        self.value.get()
    }

    fn lock_running(&self) -> MutexGuard<'_, bool> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored value, computing it with `compute` if the slot
    /// is empty. Concurrent callers, synchronous or not, wait until the
    /// first one finishes. A failed computation leaves the slot empty and
    /// the next waiter computes again.
    pub(crate) fn get_or_try_init<E>(
        &self,
        compute: impl FnOnce() -> Result<Value, E>,
    ) -> Result<&Value, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let running = self.lock_running();
        let mut running = self
            .finished
            .wait_while(running, |running| *running)
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        *running = true;
        drop(running);
        let _guard = RunningGuard { slot: self };
        let value = compute()?;
        Ok(self.value.get_or_init(|| value))
    }

    /// Asynchronous form of [`FieldSlot::get_or_try_init`].
    pub(crate) async fn get_or_try_init_async<E, F>(&self, compute: F) -> Result<&Value, E>
    where
        F: std::future::Future<Output = Result<Value, E>>,
    {
        let _guard = loop {
            if let Some(value) = self.value.get() {
                return Ok(value);
            }
            let notified = {
                let mut running = self.lock_running();
                if let Some(value) = self.value.get() {
                    return Ok(value);
                }
                if !*running {
                    *running = true;
                    break RunningGuard { slot: self };
                }
                // Registered before the lock is released, so the wake-up
                // from the computing reader cannot be missed
                self.notify.notified()
            };
            notified.await;
        };
        let value = compute.await?;
        Ok(self.value.get_or_init(|| value))
    }
}

/// Storage for the cached fields of one page instance.
///
/// Embed one in every page type that registers cached fields and return
/// it from [`ItemPage::field_cache`](crate::fields::ItemPage::field_cache).
/// Cloning a page should start with an empty cache, so `Clone` yields a
/// fresh, empty cache.
#[derive(Debug, Default)]
pub struct FieldCache {
    slots: RwLock<HashMap<&'static str, Arc<FieldSlot>>>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot of `name`, creating it on first use.
    pub(crate) fn slot(&self, name: &'static str) -> Arc<FieldSlot> {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(name).or_default())
    }

    /// Returns the cached value of `name`, if it has been computed.
    pub fn get(&self, name: &str) -> Option<Value> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).and_then(|slot| slot.get().cloned())
    }

    /// Number of fields with a stored value.
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for FieldCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_slot_is_created_once() {
        let cache = FieldCache::new();
        let a = cache.slot("price");
        let b = cache.slot("price");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &cache.slot("name")));
    }

    #[test]
    fn test_failed_computation_is_not_stored() {
        let cache = FieldCache::new();
        let slot = cache.slot("price");
        let result: Result<&Value, &str> = slot.get_or_try_init(|| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(cache.get("price").is_none());

        let value = slot.get_or_try_init(|| Ok::<_, ()>(json!(9))).unwrap();
        assert_eq!(value, &json!(9));
        assert_eq!(cache.get("price"), Some(json!(9)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_sync_init_runs_once() {
        let cache = FieldCache::new();
        let calls = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let slot = cache.slot("name");
                    let value = slot
                        .get_or_try_init(|| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            Ok::<_, ()>(json!("computed"))
                        })
                        .unwrap();
                    assert_eq!(value, &json!("computed"));
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_async_init_runs_once() {
        let cache = Arc::new(FieldCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let slot = cache.slot("name");
                    let value = slot
                        .get_or_try_init_async(async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, ()>(json!("computed"))
                        })
                        .await
                        .unwrap();
                    value.clone()
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), json!("computed"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_mixed_sync_and_async_init_runs_once() {
        let cache = Arc::new(FieldCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let async_reader = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                let slot = cache.slot("name");
                let value = slot
                    .get_or_try_init_async(async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok::<_, ()>(json!("async"))
                    })
                    .await
                    .unwrap();
                value.clone()
            })
        };
        let sync_reader = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            std::thread::spawn(move || {
                let slot = cache.slot("name");
                let value = slot
                    .get_or_try_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(100));
                        Ok::<_, ()>(json!("sync"))
                    })
                    .unwrap();
                value.clone()
            })
        };

        let from_async = async_reader.await.unwrap();
        let from_sync = sync_reader.join().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(from_async, from_sync);
    }

    #[tokio::test]
    async fn test_dropped_async_reader_releases_slot() {
        let cache = FieldCache::new();
        let slot = cache.slot("name");
        let pending = slot.get_or_try_init_async(std::future::pending::<Result<Value, ()>>());
        assert!(tokio::time::timeout(Duration::from_millis(10), pending)
            .await
            .is_err());

        let value = slot.get_or_try_init(|| Ok::<_, ()>(json!(1))).unwrap();
        assert_eq!(value, &json!(1));
    }

    #[test]
    fn test_clone_starts_empty() {
        let cache = FieldCache::new();
        cache
            .slot("a")
            .get_or_try_init(|| Ok::<_, ()>(json!(1)))
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.clone().is_empty());
    }
}
