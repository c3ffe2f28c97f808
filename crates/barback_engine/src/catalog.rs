//! Cache/refresh controller for the single upstream recipe document.
//!
//! The catalog owns one snapshot of the parsed document. Queries serve it
//! while it is younger than the TTL and refetch on demand once it is stale.
//! A failed refetch keeps serving the previous snapshot; only a catalog that
//! never loaded successfully reports the failure to its caller. Queries that
//! queue behind an in-flight fetch take its outcome instead of fetching again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use barback_core::{
    parse_document, parse_recipe, resolve_source_url, slugify, CacheState, Delimiter, ParseError,
    RawRow, Recipe, RecipeQuery, DEFAULT_TTL,
};
use barback_logging::{barback_debug, barback_info, barback_warn};
use serde::Serialize;
use thiserror::Error;

use crate::decode::{decode_text, DecodeError};
use crate::fetch::Fetcher;
use crate::FetchError;

/// Monotonic time source, injectable so tests can age the cache.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("no recipe source configured (set CSV_URL)")]
    NotConfigured,
    #[error("recipe source unavailable: {0}")]
    Upstream(#[from] FetchError),
    #[error(
        "{url} returned an HTML page instead of CSV; publish the sheet to the web \
         in CSV format and use that link"
    )]
    NotTabular { url: String },
    #[error("recipe source could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("recipe source could not be parsed: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Upstream document URL as configured, before link rewriting.
    pub source_url: Option<String>,
    pub ttl: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source_url: None,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Where a snapshot came from and how it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub configured_url: String,
    pub effective_url: String,
    pub final_url: String,
    pub delimiter: Delimiter,
    pub encoding: String,
    /// Header cells exactly as they appear in the document.
    pub fields: Vec<String>,
    pub skipped_rows: usize,
    pub fetched_utc: String,
}

/// One successful fetch and parse, replaced as a whole on refresh.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub fetched_at: Instant,
    pub source: SourceInfo,
    /// Remapped rows, including columns no recipe field reads.
    pub rows: Vec<RawRow>,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    #[serde(flatten)]
    pub source: SourceInfo,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub state: CacheState,
    pub rows: usize,
    pub age_seconds: Option<u64>,
    /// Message of the most recent failed refresh, cleared by the next success.
    pub last_error: Option<String>,
}

/// Snapshot and last failure, replaced together so readers never pair one
/// refresh's data with another's error.
#[derive(Default)]
struct CacheRecord {
    snapshot: Option<Arc<CacheSnapshot>>,
    last_error: Option<String>,
}

pub struct RecipeCatalog {
    settings: CatalogSettings,
    fetcher: Arc<dyn Fetcher>,
    clock: Clock,
    record: RwLock<CacheRecord>,
    /// Upstream attempts finished so far, bumped under `refresh_gate`.
    attempts: AtomicU64,
    /// Serialises fetches and holds the failure of the latest attempt.
    refresh_gate: tokio::sync::Mutex<Option<CatalogError>>,
}

impl RecipeCatalog {
    pub fn new(settings: CatalogSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_clock(settings, fetcher, Arc::new(Instant::now))
    }

    pub fn with_clock(settings: CatalogSettings, fetcher: Arc<dyn Fetcher>, clock: Clock) -> Self {
        Self {
            settings,
            fetcher,
            clock,
            record: RwLock::new(CacheRecord::default()),
            attempts: AtomicU64::new(0),
            refresh_gate: tokio::sync::Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source_url().is_ok()
    }

    /// Every recipe, in document order.
    pub async fn list(&self) -> Result<Vec<Recipe>, CatalogError> {
        Ok(self.snapshot().await?.recipes.clone())
    }

    pub async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, CatalogError> {
        let snapshot = self.snapshot().await?;
        Ok(query.apply(&snapshot.recipes))
    }

    /// Looks a recipe up by slug. The argument is slugified first, so
    /// `"Mojito"` finds `"mojito"`. When slugs collide the first row wins.
    pub async fn get(&self, slug: &str) -> Result<Option<Recipe>, CatalogError> {
        let wanted = slugify(slug);
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .recipes
            .iter()
            .find(|recipe| recipe.slug == wanted)
            .cloned())
    }

    /// Returns the cached snapshot, refetching first if it is empty or stale.
    pub async fn snapshot(&self) -> Result<Arc<CacheSnapshot>, CatalogError> {
        let source_url = self.source_url()?;
        if let Some(fresh) = self.fresh_snapshot() {
            barback_debug!("Serving cached recipes");
            return Ok(fresh);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.refresh_gate.lock().await;
        if let Some(fresh) = self.fresh_snapshot() {
            return Ok(fresh);
        }

        let previous = self.current();
        // An attempt finished while this task waited: share its outcome.
        if self.attempts.load(Ordering::Acquire) != seen {
            match (last_failure.clone(), previous.clone()) {
                (Some(err), previous) => return fall_back(previous, err),
                (None, Some(current)) => return Ok(current),
                (None, None) => {}
            }
        }

        let outcome = self.load(source_url).await;
        self.attempts.fetch_add(1, Ordering::Release);
        match outcome {
            Ok(snapshot) => {
                *last_failure = None;
                Ok(self.store(snapshot))
            }
            Err(err) => {
                *last_failure = Some(err.clone());
                self.record_failure(&err);
                fall_back(previous, err)
            }
        }
    }

    /// Refetches and reparses regardless of the TTL.
    pub async fn refresh(&self) -> Result<RefreshReport, CatalogError> {
        let source_url = self.source_url()?;
        let mut last_failure = self.refresh_gate.lock().await;
        let outcome = self.load(source_url).await;
        self.attempts.fetch_add(1, Ordering::Release);
        let snapshot = match outcome {
            Ok(snapshot) => {
                *last_failure = None;
                self.store(snapshot)
            }
            Err(err) => {
                *last_failure = Some(err.clone());
                self.record_failure(&err);
                return Err(err);
            }
        };
        Ok(RefreshReport {
            source: snapshot.source.clone(),
            row_count: snapshot.recipes.len(),
        })
    }

    /// Describes the cache without triggering a fetch.
    pub fn status(&self) -> CacheStatus {
        let (snapshot, last_error) = {
            let record = self.record.read().unwrap_or_else(PoisonError::into_inner);
            (record.snapshot.clone(), record.last_error.clone())
        };
        let now = (self.clock)();
        CacheStatus {
            state: self.classify(snapshot.as_deref(), now),
            rows: snapshot.as_ref().map_or(0, |s| s.recipes.len()),
            age_seconds: snapshot
                .as_ref()
                .map(|s| now.saturating_duration_since(s.fetched_at).as_secs()),
            last_error,
        }
    }

    /// Drops the cached snapshot; the next query fetches again.
    pub fn reset(&self) {
        *self.record.write().unwrap_or_else(PoisonError::into_inner) = CacheRecord::default();
    }

    fn source_url(&self) -> Result<&str, CatalogError> {
        self.settings
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(CatalogError::NotConfigured)
    }

    fn current(&self) -> Option<Arc<CacheSnapshot>> {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    fn classify(&self, snapshot: Option<&CacheSnapshot>, now: Instant) -> CacheState {
        CacheState::classify(snapshot.map(|s| s.fetched_at), now, self.settings.ttl)
    }

    fn fresh_snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        let snapshot = self.current()?;
        match self.classify(Some(snapshot.as_ref()), (self.clock)()) {
            CacheState::Fresh => Some(snapshot),
            CacheState::Empty | CacheState::Stale => None,
        }
    }

    fn store(&self, snapshot: CacheSnapshot) -> Arc<CacheSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.record.write().unwrap_or_else(PoisonError::into_inner) = CacheRecord {
            snapshot: Some(snapshot.clone()),
            last_error: None,
        };
        snapshot
    }

    fn record_failure(&self, err: &CatalogError) {
        self.record
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .last_error = Some(err.to_string());
    }

    async fn load(&self, configured_url: &str) -> Result<CacheSnapshot, CatalogError> {
        let effective_url = resolve_source_url(configured_url);
        barback_info!("Fetching recipes from {}", effective_url);

        let output = self.fetcher.fetch(&effective_url).await?;
        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())?;
        if looks_like_html(&decoded.text) {
            return Err(CatalogError::NotTabular { url: effective_url });
        }

        let document = parse_document(&decoded.text)?;
        let recipes: Vec<Recipe> = document.rows.iter().filter_map(parse_recipe).collect();
        let fields: Vec<String> = document.header_map.originals().map(str::to_string).collect();
        barback_info!(
            "Loaded {} recipes ({} delimiter, {} columns, {} rows skipped)",
            recipes.len(),
            document.delimiter,
            fields.len(),
            document.skipped_rows
        );

        Ok(CacheSnapshot {
            fetched_at: (self.clock)(),
            source: SourceInfo {
                configured_url: configured_url.to_string(),
                effective_url,
                final_url: output.metadata.final_url,
                delimiter: document.delimiter,
                encoding: decoded.encoding_label,
                fields,
                skipped_rows: document.skipped_rows,
                fetched_utc: chrono::Utc::now().to_rfc3339(),
            },
            rows: document.rows,
            recipes,
        })
    }
}

/// Serves the previous snapshot after a failed attempt, or fails if there is none.
fn fall_back(
    previous: Option<Arc<CacheSnapshot>>,
    err: CatalogError,
) -> Result<Arc<CacheSnapshot>, CatalogError> {
    match previous {
        Some(stale) => {
            barback_warn!("Refresh failed, serving stale recipes: {}", err);
            Ok(stale)
        }
        None => Err(err),
    }
}

fn looks_like_html(text: &str) -> bool {
    text.to_ascii_lowercase().contains("<html")
}

#[cfg(test)]
mod tests {
    use super::looks_like_html;

    #[test]
    fn html_marker_is_case_insensitive() {
        assert!(looks_like_html("<!DOCTYPE html>\n<HTML lang=\"en\">"));
        assert!(!looks_like_html("name,notes\nMartini,served in <b>coupe</b>\n"));
    }
}
