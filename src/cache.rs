//! Memoizing cache for fetched series, keyed by source identity and
//! date range.

use crate::core::Series;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Identity of a fetch: which source, over which date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A cached fetch result. Created on first successful fetch for a key,
/// never mutated afterwards; lives for the process.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub series: Series,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a cache lookup or fetch. Keeps source failure distinct
/// from a legitimately empty result, so callers cannot conflate the two.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A non-empty series, cached or freshly fetched.
    Data(Series),
    /// The source has no rows for this range (a valid answer).
    Empty,
    /// The source failed; nothing was cached.
    Unavailable(String),
}

impl FetchOutcome {
    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }

    fn from_series(series: Series) -> Self {
        if series.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(series)
        }
    }
}

/// Process-lifetime memoization of `(source_id, start, end) -> Series`.
///
/// Lookups for a cached key never invoke the fetch function. The lock is
/// released while fetching, so two concurrent misses for the same key may
/// both fetch; the first insert wins and the duplicate is dropped.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Return the cached series for the key, or invoke `fetch` and cache
    /// its result. Fetch errors are surfaced as [`FetchOutcome::Unavailable`]
    /// and are not cached, so a later call retries.
    pub fn get_or_fetch<F>(
        &self,
        source_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        fetch: F,
    ) -> FetchOutcome
    where
        F: FnOnce(&str, NaiveDate, NaiveDate) -> Result<Series>,
    {
        let key = CacheKey {
            source_id: source_id.to_string(),
            start,
            end,
        };

        if let Some(entry) = self.lock().get(&key) {
            debug!(source_id, %start, %end, "series cache hit");
            return FetchOutcome::from_series(entry.series.clone());
        }

        debug!(source_id, %start, %end, "series cache miss, fetching");
        match fetch(source_id, start, end) {
            Ok(series) => {
                let stored = self
                    .lock()
                    .entry(key)
                    .or_insert(CacheEntry {
                        series,
                        fetched_at: Utc::now(),
                    })
                    .series
                    .clone();
                FetchOutcome::from_series(stored)
            }
            Err(err) => {
                warn!(source_id, error = %err, "fetch failed, not caching");
                FetchOutcome::Unavailable(err.to_string())
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
