//! Readiness monitor.
//!
//! A two-phase, deadline-bounded wait per target match: first discover the
//! match's sport id if it is not yet known, then poll until the moneyline
//! market is complete and fully priced. Exceeding either deadline is a
//! degraded result reported to the caller, never an error — downstream
//! behavior (e.g. skipping output for that match) is the caller's decision.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::market::{is_moneyline_ready, MarketTable};
use crate::store::SharedFeed;
use crate::types::{MatchId, SportId};

/// Polling intervals and deadlines for the two wait phases
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Poll interval while waiting for the sport id
    pub sport_poll: Duration,
    /// Poll interval while waiting for the moneyline
    pub moneyline_poll: Duration,
    /// Deadline for sport discovery
    pub sport_deadline: Duration,
    /// Deadline for moneyline completion
    pub moneyline_deadline: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            sport_poll: Duration::from_millis(250),
            moneyline_poll: Duration::from_millis(350),
            sport_deadline: Duration::from_millis(25_000),
            moneyline_deadline: Duration::from_millis(25_000),
        }
    }
}

/// Outcome of a readiness wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Sport id discovered for the match; 0 if discovery timed out
    pub sport_id: SportId,
    /// Whether the moneyline became complete before the deadline
    pub ready: bool,
}

/// Phase A: poll until the match's sport id becomes known
///
/// Returns 0 when the deadline elapses first; the caller proceeds anyway and
/// resolution simply finds no mapped markets.
pub async fn wait_for_sport(feed: &SharedFeed, match_id: MatchId, opts: PollOptions) -> SportId {
    let deadline = Instant::now() + opts.sport_deadline;
    loop {
        let sport_id = feed.sport_of(match_id);
        if sport_id != 0 {
            return sport_id;
        }
        if Instant::now() >= deadline {
            debug!(match_id, "sport discovery timed out");
            return 0;
        }
        sleep(opts.sport_poll).await;
    }
}

/// Phase B: poll until the match's moneyline is complete and fully priced
///
/// Returns false when the deadline elapses first.
pub async fn wait_for_moneyline(
    feed: &SharedFeed,
    table: &MarketTable,
    match_id: MatchId,
    sport_id: SportId,
    opts: PollOptions,
) -> bool {
    let deadline = Instant::now() + opts.moneyline_deadline;
    loop {
        if is_moneyline_ready(&feed.read(), table, match_id, sport_id) {
            return true;
        }
        if Instant::now() >= deadline {
            debug!(match_id, sport_id, "moneyline wait timed out");
            return false;
        }
        sleep(opts.moneyline_poll).await;
    }
}

/// Run both phases: sport discovery, then moneyline completion
///
/// `sport_hint` skips phase A when the caller already knows the sport.
pub async fn wait_until_ready(
    feed: &SharedFeed,
    table: &MarketTable,
    match_id: MatchId,
    sport_hint: SportId,
    opts: PollOptions,
) -> Readiness {
    let sport_id = if sport_hint != 0 {
        sport_hint
    } else {
        wait_for_sport(feed, match_id, opts).await
    };
    let ready = wait_for_moneyline(feed, table, match_id, sport_id, opts).await;
    Readiness { sport_id, ready }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn short_opts() -> PollOptions {
        PollOptions {
            sport_poll: Duration::from_millis(10),
            moneyline_poll: Duration::from_millis(10),
            sport_deadline: Duration::from_millis(500),
            moneyline_deadline: Duration::from_millis(500),
        }
    }

    fn ready_fragment() -> serde_json::Value {
        json!({
            "matches": {"100": {"sportId": 1}},
            "bets": {"200": {"matchId": 100, "marketId": 1, "outcomes": [1, 2, 3]}},
            "odds": {"1": 1.9, "2": 3.2, "3": 3.8}
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_ready_returns_immediately() {
        let feed = SharedFeed::new();
        feed.merge_event("m", &ready_fragment());

        let table = MarketTable::winamax();
        let result = wait_until_ready(&feed, &table, 100, 0, short_opts()).await;
        assert_eq!(result, Readiness { sport_id: 1, ready: true });
    }

    #[tokio::test(start_paused = true)]
    async fn test_becomes_ready_while_polling() {
        let feed = SharedFeed::new();
        feed.merge_event("m", &json!({"matches": {"100": {"sportId": 1}}}));

        let writer = feed.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            writer.merge_event("m", &ready_fragment());
        });

        let table = MarketTable::winamax();
        let result = wait_until_ready(&feed, &table, 100, 0, short_opts()).await;
        assert!(result.ready);
        assert_eq!(result.sport_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sport_discovered_while_polling() {
        let feed = SharedFeed::new();

        let writer = feed.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            writer.merge_event("m", &ready_fragment());
        });

        let result = wait_for_sport(&feed, 100, short_opts()).await;
        assert_eq!(result, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_without_error() {
        let feed = SharedFeed::new();
        // Sport known but odds never complete
        feed.merge_event(
            "m",
            &json!({
                "matches": {"100": {"sportId": 1}},
                "bets": {"200": {"matchId": 100, "marketId": 1, "outcomes": [1, 2, 3]}},
                "odds": {"1": 1.9, "2": 3.2}
            }),
        );

        let table = MarketTable::winamax();
        let result = wait_until_ready(&feed, &table, 100, 0, short_opts()).await;
        assert!(!result.ready);
        assert_eq!(result.sport_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sport_discovery_timeout_proceeds_with_zero() {
        let feed = SharedFeed::new();

        let table = MarketTable::winamax();
        let result = wait_until_ready(&feed, &table, 100, 0, short_opts()).await;
        assert_eq!(result.sport_id, 0);
        assert!(!result.ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sport_hint_skips_discovery() {
        let feed = SharedFeed::new();
        feed.merge_event("m", &ready_fragment());

        let table = MarketTable::winamax();
        // Hint avoids phase A entirely
        let result = wait_until_ready(&feed, &table, 100, 1, short_opts()).await;
        assert!(result.ready);
    }
}
