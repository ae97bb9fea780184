//! Shared handle over the merge store.
//!
//! [`SharedFeed`] wraps [`FeedState`] in `Arc<parking_lot::RwLock>` so the
//! single event-reception writer and the readiness/resolution readers can
//! share it. A lock is held for the duration of one merge or one resolution
//! pass, so readers never observe a torn fragment application.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use serde_json::Value;

use crate::types::{Fragment, MatchId, SportId};

use super::FeedState;

/// Cloneable, thread-safe handle to the merge store
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use winamax_feed::store::SharedFeed;
///
/// let feed = SharedFeed::new();
/// feed.merge_event("m", &json!({"matches": {"100": {"sportId": 1}}}));
/// assert_eq!(feed.sport_of(100), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedFeed {
    inner: Arc<RwLock<FeedState>>,
}

impl SharedFeed {
    /// Create a handle over an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment into the store under the write lock
    pub fn merge_fragment(&self, fragment: &Fragment) {
        self.inner.write().merge(fragment);
    }

    /// Decode and fold one application event under the write lock
    ///
    /// Returns whether a fragment was applied.
    pub fn merge_event(&self, event_name: &str, payload: &Value) -> bool {
        self.inner.write().merge_event(event_name, payload)
    }

    /// Acquire a read guard for a resolution or readiness pass
    pub fn read(&self) -> RwLockReadGuard<'_, FeedState> {
        self.inner.read()
    }

    /// Sport id of a match, or 0 while unknown
    pub fn sport_of(&self, match_id: MatchId) -> SportId {
        self.inner.read().sport_of(match_id)
    }

    /// Number of known matches
    pub fn match_count(&self) -> usize {
        self.inner.read().match_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_state() {
        let feed = SharedFeed::new();
        let writer = feed.clone();

        writer.merge_event("m", &json!({"matches": {"100": {"sportId": 4}}}));

        assert_eq!(feed.sport_of(100), 4);
        assert_eq!(feed.match_count(), 1);
    }

    #[test]
    fn test_read_guard_sees_whole_fragment() {
        let feed = SharedFeed::new();
        feed.merge_event(
            "m",
            &json!({
                "matches": {"100": {"sportId": 1}},
                "odds": {"1": 1.9}
            }),
        );

        let state = feed.read();
        assert_eq!(state.sport_of(100), 1);
        assert_eq!(state.price(1), Some(1.9));
    }
}
