//! Readiness check, snapshot assembly, and match listing.
//!
//! Resolution walks the store's bet records for one match, interprets their
//! market-kind ids through the per-sport table, and assembles the normalized
//! output documents. Bets are visited in ascending bet id order, so when
//! several bets map to the same market/line key the highest bet id wins —
//! a deterministic tie-break for upstream replacement records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::FeedState;
use crate::types::{BetRecord, MatchId, Price, SportId, Timestamp};

use super::line::Line;
use super::table::MarketTable;

/// Ordered outcome prices; `None` marks a price not yet known
pub type PriceRow = Vec<Option<Price>>;

/// Decoded line value -> ordered outcome prices
pub type LineMarket = BTreeMap<Line, PriceRow>;

/// One entry of the match listing output document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListing {
    /// Match id
    pub match_id: MatchId,
    /// Sport id
    pub sport_id: SportId,
    /// League name via tournament lookup; may be unknown
    pub league: Option<String>,
    /// Home competitor name
    pub home: String,
    /// Away competitor name
    pub away: String,
    /// Scheduled start, seconds since Unix epoch
    pub match_start: Option<Timestamp>,
}

/// Normalized markets for one match
#[derive(Debug, Clone, Default, Serialize)]
pub struct Markets {
    /// Ordered moneyline prices, or `None` when no moneyline bet exists
    pub moneyline: Option<PriceRow>,
    /// Total over/under, keyed by decoded line
    pub total_ou: LineMarket,
    /// Handicap, keyed by decoded line
    pub handicap: LineMarket,
    /// Total games (sports that define it, e.g. tennis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_games: Option<LineMarket>,
    /// Handicap games (sports that define it, e.g. tennis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap_games: Option<LineMarket>,
}

/// The per-match market output document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Venue label
    pub bookmaker: String,
    /// Match id
    pub match_id: MatchId,
    /// Sport id, 0 while unknown
    pub sport_id: SportId,
    /// League name via tournament lookup; may be unknown
    pub league: Option<String>,
    /// Home competitor name
    pub home: Option<String>,
    /// Away competitor name
    pub away: Option<String>,
    /// Scheduled start, seconds since Unix epoch
    pub match_start: Option<Timestamp>,
    /// Normalized markets
    pub markets: Markets,
}

impl MarketSnapshot {
    /// Whether the snapshot carries any priced moneyline entry
    ///
    /// Callers typically skip writing output for a match whose moneyline is
    /// absent or entirely unpriced.
    pub fn has_priced_moneyline(&self) -> bool {
        self.markets
            .moneyline
            .as_ref()
            .is_some_and(|row| row.iter().any(|p| p.is_some()))
    }
}

/// Whether a match's moneyline market is complete and fully priced
///
/// True iff some bet of `match_id` carries the sport's moneyline market id,
/// exactly the sport's expected outcome count (three for sports whose
/// moneyline has a draw, two otherwise), and a known price for every
/// outcome. A missing sport mapping or the absence of a matching bet yields
/// false, not an error.
pub fn is_moneyline_ready(
    state: &FeedState,
    table: &MarketTable,
    match_id: MatchId,
    sport_id: SportId,
) -> bool {
    let Some(markets) = table.get(sport_id) else {
        return false;
    };
    let expected = markets.moneyline_shape.expected_outcomes();
    state.bets_for_match(match_id).any(|(_, bet)| {
        bet.market_id == Some(markets.moneyline)
            && bet.outcomes.len() == expected
            && state.all_priced(&bet.outcomes)
    })
}

/// Assemble the normalized market snapshot for one match
///
/// The sport id is re-derived from the match record; an unknown sport (or
/// one absent from the table) produces a snapshot with empty markets rather
/// than an error.
pub fn build_markets(
    state: &FeedState,
    table: &MarketTable,
    match_id: MatchId,
    bookmaker: &str,
) -> MarketSnapshot {
    let record = state.match_record(match_id).cloned().unwrap_or_default();
    let sport_id = record.sport_id.unwrap_or(0);
    let mapping = table.get(sport_id);

    let mut markets = Markets {
        total_games: mapping.and_then(|m| m.total_games.map(|_| LineMarket::new())),
        handicap_games: mapping.and_then(|m| m.handicap_games.map(|_| LineMarket::new())),
        ..Default::default()
    };

    if let Some(mapping) = mapping {
        // Ascending bet id order; later entries overwrite, so the highest
        // bet id wins per market/line key.
        for (_, bet) in state.bets_for_match(match_id) {
            let Some(market_id) = bet.market_id else {
                continue;
            };
            if market_id == mapping.moneyline {
                markets.moneyline = Some(price_row(state, bet));
            } else if market_id == mapping.total_ou {
                insert_line(&mut markets.total_ou, state, bet);
            } else if market_id == mapping.handicap {
                insert_line(&mut markets.handicap, state, bet);
            } else if mapping.total_games == Some(market_id) {
                if let Some(map) = markets.total_games.as_mut() {
                    insert_line(map, state, bet);
                }
            } else if mapping.handicap_games == Some(market_id) {
                if let Some(map) = markets.handicap_games.as_mut() {
                    insert_line(map, state, bet);
                }
            }
        }
    }

    MarketSnapshot {
        bookmaker: bookmaker.to_string(),
        match_id,
        sport_id,
        league: state.league_of(&record),
        home: record.competitor1_name,
        away: record.competitor2_name,
        match_start: record.match_start,
        markets,
    }
}

/// Build the match listing for the requested sports
///
/// Only "real" matches (both competitor names known) appear, ordered by
/// scheduled start with unknown starts last.
pub fn build_listing(
    state: &FeedState,
    sports: &[SportId],
) -> Vec<MatchListing> {
    let mut listing: Vec<MatchListing> = state
        .matches()
        .filter(|(_, m)| m.is_real())
        .filter_map(|(match_id, m)| {
            let sport_id = m.sport_id.unwrap_or(0);
            if !sports.contains(&sport_id) {
                return None;
            }
            Some(MatchListing {
                match_id,
                sport_id,
                league: state.league_of(m),
                home: m.competitor1_name.clone().unwrap_or_default(),
                away: m.competitor2_name.clone().unwrap_or_default(),
                match_start: m.match_start,
            })
        })
        .collect();

    listing.sort_by_key(|entry| {
        (
            entry.match_start.is_none(),
            entry.match_start.unwrap_or(0),
            entry.match_id,
        )
    });
    listing
}

/// Fraction of listing entries with a known league name
///
/// Returns 1.0 for an empty listing. Callers can re-poll and rebuild the
/// listing while coverage is low — tournament data often trails match data.
pub fn league_coverage(listing: &[MatchListing]) -> f64 {
    if listing.is_empty() {
        return 1.0;
    }
    let known = listing.iter().filter(|e| e.league.is_some()).count();
    known as f64 / listing.len() as f64
}

fn price_row(state: &FeedState, bet: &BetRecord) -> PriceRow {
    bet.outcomes.iter().map(|&o| state.price(o)).collect()
}

fn insert_line(map: &mut LineMarket, state: &FeedState, bet: &BetRecord) {
    // Bets with an absent or unparsable line are excluded, never fatal
    let Some(line) = bet.special_bet_value.as_deref().and_then(Line::parse) else {
        return;
    };
    map.insert(line, price_row(state, bet));
}
