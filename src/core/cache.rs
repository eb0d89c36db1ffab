use crate::core::provider::RateProvider;
use crate::core::rates::RateTable;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
/// Covers the default provider budget: three 10s requests plus two 500ms
/// retry delays.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(35);

#[derive(Clone)]
struct CacheEntry {
    table: Arc<RateTable>,
    captured_at: Instant,
    fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() < ttl
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub fetched_at: Option<DateTime<Utc>>,
    pub fresh: bool,
}

/// Single-slot cache of the latest live rate table.
///
/// Readers holding a fresh entry only take the read lock. Misses serialise on
/// `refresh`, and a miss that queued behind a running attempt takes that
/// attempt's table instead of fetching again, so concurrent misses result in
/// one fetch whether it succeeds or not. Failed or timed-out fetches return
/// the provider's fallback table and leave the entry as it was, so the next
/// call tries the source again.
pub struct RateCache {
    provider: Arc<dyn RateProvider>,
    ttl: Duration,
    fetch_timeout: Duration,
    entry: RwLock<Option<CacheEntry>>,
    /// Table produced by the most recent attempt, live or fallback.
    refresh: Mutex<Option<Arc<RateTable>>>,
    /// Completed fetch attempts.
    attempts: AtomicU64,
}

impl RateCache {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            provider,
            ttl: DEFAULT_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            entry: RwLock::new(None),
            refresh: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    async fn fresh_table(&self) -> Option<Arc<RateTable>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| Arc::clone(&e.table))
    }

    /// Returns the active rate table. Never fails.
    #[instrument(name = "RateCacheGet", skip(self), fields(provider = self.provider.name()))]
    pub async fn get(&self) -> Arc<RateTable> {
        if let Some(table) = self.fresh_table().await {
            debug!("Cache HIT");
            return table;
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_attempt = self.refresh.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(table) = self.fresh_table().await {
            debug!("Cache HIT after concurrent refresh");
            return table;
        }
        // Or tried and failed, in which case its fallback is ours too.
        let overlapped = self.attempts.load(Ordering::Acquire) != seen;
        if let Some(table) = last_attempt.as_ref().filter(|_| overlapped) {
            debug!(source = %table.source(), "Sharing result of concurrent refresh");
            return Arc::clone(table);
        }

        debug!("Cache MISS");
        let table = self.fetch_table().await;
        *last_attempt = Some(Arc::clone(&table));
        self.attempts.fetch_add(1, Ordering::Release);
        table
    }

    async fn fetch_table(&self) -> Arc<RateTable> {
        match tokio::time::timeout(self.fetch_timeout, self.provider.fetch()).await {
            Ok(Ok(table)) => {
                let table = Arc::new(table);
                let entry = CacheEntry {
                    table: Arc::clone(&table),
                    captured_at: Instant::now(),
                    fetched_at: Utc::now(),
                };
                *self.entry.write().await = Some(entry);
                info!(rates = table.len(), source = %table.source(), "Cache PUT");
                table
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Rate fetch failed, serving fallback rates");
                Arc::new(self.provider.fallback())
            }
            Err(_) => {
                warn!(
                    timeout = ?self.fetch_timeout,
                    "Rate fetch timed out, serving fallback rates"
                );
                Arc::new(self.provider.fallback())
            }
        }
    }

    /// Drops the cached entry so the next `get` goes to the source.
    pub async fn invalidate(&self) {
        let mut last_attempt = self.refresh.lock().await;
        *last_attempt = None;
        *self.entry.write().await = None;
        debug!("Cache CLEAR");
    }

    pub async fn status(&self) -> CacheStatus {
        let entry = self.entry.read().await;
        CacheStatus {
            fetched_at: entry.as_ref().map(|e| e.fetched_at),
            fresh: entry.as_ref().is_some_and(|e| e.is_fresh(self.ttl)),
        }
    }
}
