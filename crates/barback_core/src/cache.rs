use std::time::{Duration, Instant};

use serde::Serialize;

/// Default cache time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Freshness of the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    /// Nothing has been fetched successfully yet.
    Empty,
    /// Younger than the TTL; served without touching the network.
    Fresh,
    /// At least as old as the TTL; the next query refetches.
    Stale,
}

impl CacheState {
    pub fn classify(fetched_at: Option<Instant>, now: Instant, ttl: Duration) -> Self {
        match fetched_at {
            None => CacheState::Empty,
            Some(at) if now.saturating_duration_since(at) < ttl => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::CacheState;

    #[test]
    fn classify_by_age() {
        let ttl = Duration::from_secs(60);
        let at = Instant::now();
        assert_eq!(CacheState::classify(None, at, ttl), CacheState::Empty);
        assert_eq!(CacheState::classify(Some(at), at, ttl), CacheState::Fresh);
        assert_eq!(
            CacheState::classify(Some(at), at + Duration::from_secs(59), ttl),
            CacheState::Fresh
        );
        assert_eq!(CacheState::classify(Some(at), at + ttl, ttl), CacheState::Stale);
    }
}
