//! Per-document write locks
//!
//! Mutations of one stored document (signing, replacing) run the whole
//! read → modify → write cycle under that document's lock. Different
//! documents never contend, and readers don't lock at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct DocumentLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Only the map holds idle entries
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of documents currently locked or being waited on
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_same_document_is_exclusive() {
        let locks = DocumentLocks::new();
        let _guard = locks.acquire("doc-1").await;

        let second = timeout(Duration::from_millis(50), locks.acquire("doc-1")).await;
        assert!(second.is_err(), "second writer must wait");
    }

    #[tokio::test]
    async fn test_different_documents_do_not_contend() {
        let locks = DocumentLocks::new();
        let _a = locks.acquire("doc-a").await;

        let b = timeout(Duration::from_millis(50), locks.acquire("doc-b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let locks = DocumentLocks::new();
        {
            let _guard = locks.acquire("doc-1").await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);

        let again = timeout(Duration::from_millis(50), locks.acquire("doc-1")).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_waiters_run_one_at_a_time() {
        let locks = Arc::new(DocumentLocks::new());
        let in_section = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let max_seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_section = in_section.clone();
            let max_seen = max_seen.clone();
            tasks.push(tokio::spawn(async move {
                use std::sync::atomic::Ordering;
                let _guard = locks.acquire("shared").await;
                let now = in_section.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(max_seen.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
