//! Entity records held by the merge store.
//!
//! Every field is optional: records are created on the first fragment that
//! mentions their id and filled in by later fragments. Merging is a shallow
//! field overlay — an incoming non-null value wins, fields the fragment
//! omits are preserved.

use super::fragment::{BetPatch, MatchPatch, TournamentPatch};
use super::{MarketId, MatchId, OutcomeId, SportId, Timestamp};

/// One match, possibly partially populated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecord {
    /// Sport this match belongs to
    pub sport_id: Option<SportId>,
    /// Owning tournament key
    pub tournament_id: Option<String>,
    /// Home competitor display name
    pub competitor1_name: Option<String>,
    /// Away competitor display name
    pub competitor2_name: Option<String>,
    /// Scheduled start, seconds since Unix epoch
    pub match_start: Option<Timestamp>,
}

impl MatchRecord {
    /// A match is "real" once both competitor names are known and non-empty
    ///
    /// Partially-populated matches (id known, names unknown) are valid
    /// transient states, not errors.
    pub fn is_real(&self) -> bool {
        fn filled(name: &Option<String>) -> bool {
            name.as_deref().is_some_and(|s| !s.is_empty())
        }
        filled(&self.competitor1_name) && filled(&self.competitor2_name)
    }

    /// Overlay the fields present in `patch` onto this record
    pub fn apply(&mut self, patch: &MatchPatch) {
        if patch.sport_id.is_some() {
            self.sport_id = patch.sport_id;
        }
        if patch.tournament_id.is_some() {
            self.tournament_id = patch.tournament_id.clone();
        }
        if patch.competitor1_name.is_some() {
            self.competitor1_name = patch.competitor1_name.clone();
        }
        if patch.competitor2_name.is_some() {
            self.competitor2_name = patch.competitor2_name.clone();
        }
        if patch.match_start.is_some() {
            self.match_start = patch.match_start;
        }
    }
}

/// One bet — a market instance attached to a match
///
/// A bet references outcomes by id but carries no price itself; prices live
/// in the odds map and are updated independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BetRecord {
    /// Owning match
    pub match_id: Option<MatchId>,
    /// Market-kind id, meaningful only relative to the match's sport
    pub market_id: Option<MarketId>,
    /// Ordered outcome ids
    pub outcomes: Vec<OutcomeId>,
    /// Encoded line value, e.g. `"total=2.5"`
    pub special_bet_value: Option<String>,
}

impl BetRecord {
    /// Overlay the fields present in `patch` onto this record
    pub fn apply(&mut self, patch: &BetPatch) {
        if patch.match_id.is_some() {
            self.match_id = patch.match_id;
        }
        if patch.market_id.is_some() {
            self.market_id = patch.market_id;
        }
        if let Some(outcomes) = &patch.outcomes {
            self.outcomes = outcomes.clone();
        }
        if patch.special_bet_value.is_some() {
            self.special_bet_value = patch.special_bet_value.clone();
        }
    }
}

/// One tournament, keyed by a canonical string id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentRecord {
    /// Tournament display name
    pub tournament_name: Option<String>,
}

impl TournamentRecord {
    /// Overlay the fields present in `patch` onto this record
    pub fn apply(&mut self, patch: &TournamentPatch) {
        if patch.tournament_name.is_some() {
            self.tournament_name = patch.tournament_name.clone();
        }
    }
}
