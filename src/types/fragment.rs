//! Incoming partial updates.
//!
//! A [`Fragment`] is one application event payload: a mapping that may carry
//! any subset of the keys `sports`, `matches`, `bets`, `odds`,
//! `tournaments`. Anything else deserializes to an empty fragment and merges
//! as a no-op — upstream sends housekeeping events the store intentionally
//! ignores.
//!
//! Decoding is deliberately lenient: ids arrive as numbers or numeric
//! strings, and a malformed value inside one entry must skip that entry
//! only, never abort the rest of the fragment.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{MarketId, MatchId, OutcomeId, SportId, Timestamp};

/// One partial update describing some subset of entities
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fragment {
    /// Sport id -> listed match ids (union into the sport index)
    #[serde(default)]
    pub sports: Option<FxHashMap<String, SportPatch>>,

    /// Match id -> field overlay
    #[serde(default)]
    pub matches: Option<FxHashMap<String, MatchPatch>>,

    /// Bet id -> field overlay
    #[serde(default)]
    pub bets: Option<FxHashMap<String, BetPatch>>,

    /// Outcome id -> price, replaced outright (a price is an atomic scalar)
    #[serde(default)]
    pub odds: Option<FxHashMap<String, Value>>,

    /// Tournament id -> field overlay
    #[serde(default)]
    pub tournaments: Option<FxHashMap<String, TournamentPatch>>,
}

impl Fragment {
    /// Decode a fragment from an event payload
    ///
    /// Returns `None` for payloads that are not an object — those are
    /// housekeeping events, not errors.
    pub fn from_value(value: &Value) -> Option<Fragment> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Whether this fragment carries no entity data at all
    pub fn is_empty(&self) -> bool {
        self.sports.is_none()
            && self.matches.is_none()
            && self.bets.is_none()
            && self.odds.is_none()
            && self.tournaments.is_none()
    }
}

/// Per-sport entry in a fragment's `sports` map
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportPatch {
    /// Match ids known to belong to this sport
    #[serde(default, deserialize_with = "de_opt_ids")]
    pub matches: Option<Vec<MatchId>>,
}

/// Field overlay for one match
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPatch {
    /// Sport this match belongs to
    #[serde(default, deserialize_with = "de_opt_sport")]
    pub sport_id: Option<SportId>,
    /// Owning tournament, normalized to a string key
    #[serde(default, deserialize_with = "de_opt_key")]
    pub tournament_id: Option<String>,
    /// Home competitor display name
    #[serde(default)]
    pub competitor1_name: Option<String>,
    /// Away competitor display name
    #[serde(default)]
    pub competitor2_name: Option<String>,
    /// Scheduled start, seconds since Unix epoch
    #[serde(default, deserialize_with = "de_opt_ts")]
    pub match_start: Option<Timestamp>,
}

/// Field overlay for one bet (market instance)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetPatch {
    /// Owning match
    #[serde(default, deserialize_with = "de_opt_id")]
    pub match_id: Option<MatchId>,
    /// Market-kind id, interpreted via the per-sport market table
    #[serde(default, deserialize_with = "de_opt_id")]
    pub market_id: Option<MarketId>,
    /// Ordered outcome ids
    #[serde(default, deserialize_with = "de_opt_ids")]
    pub outcomes: Option<Vec<OutcomeId>>,
    /// Encoded line value, e.g. `"total=2.5"`
    #[serde(default, deserialize_with = "de_opt_string_like")]
    pub special_bet_value: Option<String>,
}

/// Field overlay for one tournament
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentPatch {
    /// Tournament display name
    #[serde(default)]
    pub tournament_name: Option<String>,
}

/// Normalize a map key to a canonical integer id
pub(crate) fn id_from_key(key: &str) -> Option<u64> {
    key.trim().parse::<u64>().ok()
}

/// Normalize a JSON value to an integer id (number or numeric string)
pub(crate) fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => id_from_key(s),
        _ => None,
    }
}

/// Normalize a JSON value to a decimal price
pub(crate) fn price_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn de_opt_sport<'de, D>(deserializer: D) -> Result<Option<SportId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(id_from_value)
        .and_then(|id| SportId::try_from(id).ok()))
}

fn de_opt_ts<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

/// Tournament ids are canonically string keys; numbers are stringified
fn de_opt_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Outcome lists may mix numbers and numeric strings; bad entries are dropped
fn de_opt_ids<'de, D>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(value.map(|items| items.iter().filter_map(id_from_value).collect()))
}

fn de_opt_string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
