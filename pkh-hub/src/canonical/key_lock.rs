//! Per-key mutual exclusion for canonicalization runs
//!
//! Canonicalize is a read-merge-write cycle; two runs for the same product
//! key must never interleave, while runs for different keys proceed in
//! parallel. Ingestion and canonicalization share one process, so an
//! in-process lock map keyed by `ProductKey` satisfies the ordering
//! requirement without database-level locking.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::ProductKey;

/// Map of per-product-key async locks
///
/// Entries are created on first use and never evicted; the key space is
/// bounded by the product catalog.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    locks: Arc<Mutex<HashMap<ProductKey, Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one product key, waiting if another
    /// canonicalize run for that key holds it
    pub async fn acquire(&self, key: &ProductKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            map.entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
