//! Per-seller write serialization.
//!
//! Conflict detection reads the store and then writes to it. Two writers for
//! the same seller must not interleave between those steps, so the
//! lifecycle service holds the seller's lock across derive, check and write.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Keyed async mutexes, one per seller id.
///
/// An entry lives only while some caller holds or waits for it; the last
/// guard to drop removes it.
#[derive(Debug, Default)]
pub struct SellerLocks {
    locks: Arc<LockMap>,
}

/// Holds the locks of one or more sellers until dropped.
#[derive(Debug)]
pub struct SellerGuard {
    sellers: Vec<String>,
    guards: Vec<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl SellerGuard {
    pub fn sellers(&self) -> &[String] {
        &self.sellers
    }
}

impl Drop for SellerGuard {
    fn drop(&mut self) {
        self.guards.clear();
        for seller in &self.sellers {
            // Waiters and holders keep their own clone, so a count of one
            // means only the map references the mutex.
            self.locks.remove_if(seller, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

impl SellerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every seller in `sellers`.
    ///
    /// Duplicates are collapsed and locks are taken in lexical order, so two
    /// callers asking for the same pair cannot deadlock.
    pub async fn acquire(&self, sellers: &[&str]) -> SellerGuard {
        let mut ordered: Vec<String> = sellers.iter().map(|s| (*s).to_string()).collect();
        ordered.sort();
        ordered.dedup();

        let handles: Vec<_> = ordered.iter().map(|seller| self.handle(seller)).collect();
        let mut guards = Vec::with_capacity(handles.len());
        for lock in handles {
            guards.push(lock.lock_owned().await);
        }

        SellerGuard { sellers: ordered, guards, locks: Arc::clone(&self.locks) }
    }

    /// Number of sellers with a live lock entry.
    pub fn tracked_sellers(&self) -> usize {
        self.locks.len()
    }

    fn handle(&self, seller: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(seller.to_string()).or_default().value())
    }
}
