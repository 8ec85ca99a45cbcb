//! File-backed cache of the last successful fetch.
//!
//! The whole batch shares one timestamp and expires together. Reads never
//! fail: a missing, stale, short, or corrupted file is a [`CacheLookup::Miss`]
//! and the caller goes to the network instead.
//!
//! Writes go to a sibling temp file that is then renamed over the cache, so
//! a reader never sees a half-written document. Concurrent writers through
//! the same store are serialized by an internal mutex.

use crate::error::Result;
use crate::models::{Article, CacheDocument};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// A cached batch with fewer records than this is not worth serving.
pub const MIN_CACHED_ARTICLES: usize = 3;
const PRODUCER: &str = "news_hub";

/// Source of "now" for freshness checks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Why a read did not produce articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Absent,
    Stale,
    TooFew,
    Corrupt,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissReason::Absent => "absent",
            MissReason::Stale => "stale",
            MissReason::TooFew => "too few articles",
            MissReason::Corrupt => "corrupt",
        };
        f.write_str(s)
    }
}

#[derive(Debug, PartialEq)]
pub enum CacheLookup {
    Hit(Vec<Article>),
    Miss(MissReason),
}

pub struct CacheStore<C = SystemClock> {
    path: PathBuf,
    ttl: Duration,
    clock: C,
    write_lock: Mutex<()>,
}

impl CacheStore<SystemClock> {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self::with_clock(path, ttl, SystemClock)
    }
}

impl<C: Clock> CacheStore<C> {
    pub fn with_clock(path: impl Into<PathBuf>, ttl: Duration, clock: C) -> Self {
        Self {
            path: path.into(),
            ttl,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `articles` with the current timestamp, replacing any prior
    /// content in one step.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = articles.len()))]
    pub async fn write(&self, articles: &[Article]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let doc = CacheDocument {
            articles: articles.to_vec(),
            last_updated: self.clock.now(),
            source: PRODUCER.to_string(),
            total_articles: articles.len(),
        };
        let json = serde_json::to_string_pretty(&doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        info!("News cache saved");
        Ok(())
    }

    /// Serve the cached batch if it is fresh and large enough.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn read(&self) -> CacheLookup {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return CacheLookup::Miss(MissReason::Absent);
            }
            Err(e) => {
                warn!(error = %e, "Cache unreadable; treating as miss");
                return CacheLookup::Miss(MissReason::Corrupt);
            }
        };

        let doc: CacheDocument = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "Cache corrupted; treating as miss");
                return CacheLookup::Miss(MissReason::Corrupt);
            }
        };

        let age = self.clock.now() - doc.last_updated;
        if age < Duration::zero() || age >= self.ttl {
            debug!(age_secs = age.num_seconds(), "Cache stale");
            return CacheLookup::Miss(MissReason::Stale);
        }
        if doc.articles.len() < MIN_CACHED_ARTICLES {
            return CacheLookup::Miss(MissReason::TooFew);
        }

        info!(count = doc.articles.len(), age_secs = age.num_seconds(), "Using cached news");
        CacheLookup::Hit(doc.articles)
    }

    /// Remove the cache file. Clearing an absent cache is not an error.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "News cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
