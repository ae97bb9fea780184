//! The mutable world model.
//!
//! [`FeedState`] folds arbitrarily-ordered, partial fragments into coherent
//! entity records. Merging is an idempotent upsert: applying the same
//! fragment twice produces the same state as applying it once, which makes
//! replay and retry safe.
//!
//! # Design Decisions
//!
//! 1. **Shallow merge per entity**: a fragment overlays only the fields it
//!    carries; previously known fields are never discarded.
//!
//! 2. **Odds replace outright**: a price is an atomic scalar, so the odds
//!    map substitutes whole values instead of merging.
//!
//! 3. **`BTreeMap` for bets**: resolution iterates bets in ascending id
//!    order, so when several bets map to the same market/line key the
//!    highest bet id wins deterministically.
//!
//! 4. **No eviction**: records live for the session; upstream never deletes.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::fragment::{id_from_key, price_from_value};
use crate::types::{
    BetId, BetRecord, Fragment, MatchId, MatchRecord, OutcomeId, Price, SportId, TournamentRecord,
};

/// Event name under which entity fragments arrive
pub const MERGE_EVENT: &str = "m";

/// The merged world model: matches, bets, odds, tournaments, sport index
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    matches: FxHashMap<MatchId, MatchRecord>,
    bets: BTreeMap<BetId, BetRecord>,
    odds: FxHashMap<OutcomeId, Price>,
    tournaments: FxHashMap<String, TournamentRecord>,
    sports_index: FxHashMap<SportId, FxHashSet<MatchId>>,
}

impl FeedState {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment into the store
    ///
    /// Entries with malformed ids are skipped individually; the rest of the
    /// fragment is still applied.
    pub fn merge(&mut self, fragment: &Fragment) {
        if let Some(sports) = &fragment.sports {
            for (key, patch) in sports {
                let Some(sport_id) = id_from_key(key).and_then(|id| SportId::try_from(id).ok())
                else {
                    warn!(%key, "skipping sports entry with malformed id");
                    continue;
                };
                if let Some(ids) = &patch.matches {
                    self.sports_index.entry(sport_id).or_default().extend(ids);
                }
            }
        }
        if let Some(matches) = &fragment.matches {
            for (key, patch) in matches {
                let Some(match_id) = id_from_key(key) else {
                    warn!(%key, "skipping matches entry with malformed id");
                    continue;
                };
                self.matches.entry(match_id).or_default().apply(patch);
            }
        }
        if let Some(bets) = &fragment.bets {
            for (key, patch) in bets {
                let Some(bet_id) = id_from_key(key) else {
                    warn!(%key, "skipping bets entry with malformed id");
                    continue;
                };
                self.bets.entry(bet_id).or_default().apply(patch);
            }
        }
        if let Some(odds) = &fragment.odds {
            for (key, value) in odds {
                let (Some(outcome_id), Some(price)) = (id_from_key(key), price_from_value(value))
                else {
                    warn!(%key, "skipping odds entry with malformed id or price");
                    continue;
                };
                self.odds.insert(outcome_id, price);
            }
        }
        if let Some(tournaments) = &fragment.tournaments {
            for (key, patch) in tournaments {
                self.tournaments
                    .entry(key.clone())
                    .or_default()
                    .apply(patch);
            }
        }
    }

    /// Decode and fold one application event
    ///
    /// Only the `"m"` event carries entity fragments; everything else is
    /// housekeeping and ignored. Returns whether a fragment was applied.
    pub fn merge_event(&mut self, event_name: &str, payload: &Value) -> bool {
        if event_name != MERGE_EVENT {
            debug!(event = event_name, "ignoring non-merge event");
            return false;
        }
        match Fragment::from_value(payload) {
            Some(fragment) => {
                self.merge(&fragment);
                true
            }
            None => {
                debug!("ignoring non-object merge payload");
                false
            }
        }
    }

    /// Look up a match record
    pub fn match_record(&self, match_id: MatchId) -> Option<&MatchRecord> {
        self.matches.get(&match_id)
    }

    /// Sport id of a match, or 0 while unknown
    pub fn sport_of(&self, match_id: MatchId) -> SportId {
        self.matches
            .get(&match_id)
            .and_then(|m| m.sport_id)
            .unwrap_or(0)
    }

    /// All matches with their ids
    pub fn matches(&self) -> impl Iterator<Item = (MatchId, &MatchRecord)> {
        self.matches.iter().map(|(&id, m)| (id, m))
    }

    /// Bets belonging to a match, in ascending bet id order
    pub fn bets_for_match(&self, match_id: MatchId) -> impl Iterator<Item = (BetId, &BetRecord)> {
        self.bets
            .iter()
            .filter(move |(_, bet)| bet.match_id == Some(match_id))
            .map(|(&id, bet)| (id, bet))
    }

    /// Price for an outcome, if already known
    ///
    /// Absence means "price not yet known", not an error.
    pub fn price(&self, outcome_id: OutcomeId) -> Option<Price> {
        self.odds.get(&outcome_id).copied()
    }

    /// Whether every listed outcome has a known price
    pub fn all_priced(&self, outcomes: &[OutcomeId]) -> bool {
        outcomes.iter().all(|id| self.odds.contains_key(id))
    }

    /// League name for a match via the tournament lookup
    ///
    /// The lookup may legitimately miss when the match arrived before its
    /// tournament data.
    pub fn league_of(&self, record: &MatchRecord) -> Option<String> {
        let tournament_id = record.tournament_id.as_deref()?;
        self.tournaments
            .get(tournament_id)?
            .tournament_name
            .clone()
    }

    /// Match ids currently indexed under a sport
    pub fn sport_matches(&self, sport_id: SportId) -> Option<&FxHashSet<MatchId>> {
        self.sports_index.get(&sport_id)
    }

    /// Number of known matches
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Number of known bets
    pub fn bet_count(&self) -> usize {
        self.bets.len()
    }

    /// Number of known prices
    pub fn odds_count(&self) -> usize {
        self.odds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Fragment {
        Fragment::from_value(&value).unwrap()
    }

    #[test]
    fn test_merge_is_idempotent() {
        let f = fragment(json!({
            "sports": {"1": {"matches": [10, 20]}},
            "matches": {"100": {"sportId": 1, "competitor1Name": "A"}},
            "bets": {"200": {"matchId": 100, "outcomes": [1, 2, 3]}},
            "odds": {"1": 1.9},
            "tournaments": {"9": {"tournamentName": "League X"}}
        }));

        let mut once = FeedState::new();
        once.merge(&f);

        let mut twice = FeedState::new();
        twice.merge(&f);
        twice.merge(&f);

        assert_eq!(once.match_record(100), twice.match_record(100));
        assert_eq!(once.match_count(), twice.match_count());
        assert_eq!(once.bet_count(), twice.bet_count());
        assert_eq!(once.odds_count(), twice.odds_count());
        assert_eq!(once.sport_matches(1), twice.sport_matches(1));
    }

    #[test]
    fn test_sports_index_unions_across_fragments() {
        let mut state = FeedState::new();
        state.merge(&fragment(json!({"sports": {"1": {"matches": [10]}}})));
        state.merge(&fragment(json!({"sports": {"1": {"matches": [20]}}})));

        let ids = state.sport_matches(1).unwrap();
        assert!(ids.contains(&10));
        assert!(ids.contains(&20));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_shallow_merge_preserves_untouched_fields() {
        let mut state = FeedState::new();
        state.merge(&fragment(
            json!({"matches": {"100": {"competitor1Name": "A"}}}),
        ));
        state.merge(&fragment(
            json!({"matches": {"100": {"competitor2Name": "B"}}}),
        ));

        let m = state.match_record(100).unwrap();
        assert_eq!(m.competitor1_name.as_deref(), Some("A"));
        assert_eq!(m.competitor2_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_odds_replace_not_merge() {
        let mut state = FeedState::new();
        state.merge(&fragment(json!({"odds": {"55": 1.5}})));
        state.merge(&fragment(json!({"odds": {"55": 1.8}})));
        assert_eq!(state.price(55), Some(1.8));
    }

    #[test]
    fn test_numeric_and_string_keys_coalesce() {
        let mut state = FeedState::new();
        state.merge(&fragment(
            json!({"matches": {"100": {"competitor1Name": "A"}}}),
        ));
        // Same logical match via a different key encoding
        state.merge(&fragment(
            json!({"matches": {" 100": {"competitor2Name": "B"}}}),
        ));
        assert_eq!(state.match_count(), 1);
        assert!(state.match_record(100).unwrap().is_real());
    }

    #[test]
    fn test_malformed_id_does_not_abort_fragment() {
        let mut state = FeedState::new();
        state.merge(&fragment(json!({
            "odds": {"bogus": 2.0, "55": 1.5},
            "matches": {"nope": {"sportId": 1}, "100": {"sportId": 1}}
        })));
        assert_eq!(state.price(55), Some(1.5));
        assert_eq!(state.odds_count(), 1);
        assert_eq!(state.sport_of(100), 1);
        assert_eq!(state.match_count(), 1);
    }

    #[test]
    fn test_merge_event_filters_by_name() {
        let mut state = FeedState::new();
        assert!(!state.merge_event("hb", &json!({"matches": {"100": {"sportId": 1}}})));
        assert_eq!(state.match_count(), 0);

        assert!(state.merge_event("m", &json!({"matches": {"100": {"sportId": 1}}})));
        assert_eq!(state.match_count(), 1);

        // Non-object payloads are housekeeping, not errors
        assert!(!state.merge_event("m", &json!("noise")));
    }

    #[test]
    fn test_sport_of_unknown_match_is_zero() {
        let state = FeedState::new();
        assert_eq!(state.sport_of(12345), 0);
    }

    #[test]
    fn test_bets_for_match_ascending_ids() {
        let mut state = FeedState::new();
        state.merge(&fragment(json!({
            "bets": {
                "205": {"matchId": 100, "marketId": 18},
                "201": {"matchId": 100, "marketId": 1},
                "300": {"matchId": 999, "marketId": 1}
            }
        })));
        let ids: Vec<_> = state.bets_for_match(100).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![201, 205]);
    }
}
