//! Per-sport market-kind table.
//!
//! Upstream market ids are plain integers whose meaning depends on the
//! sport: market id 1 is the football *and* hockey moneyline, while the
//! basketball moneyline is 219. The table is injectable configuration, not
//! hardcoded logic — upstream ids can change.

use rustc_hash::FxHashMap;

use crate::types::{MarketId, SportId};

/// Whether a sport's moneyline carries a draw outcome
///
/// This is a sport-category property, not per-bet data: football and hockey
/// price home/draw/away, rackets and US sports price two outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneylineShape {
    /// Two outcomes (home/away)
    TwoWay,
    /// Three outcomes (home/draw/away)
    ThreeWay,
}

impl MoneylineShape {
    /// Expected outcome count for a complete moneyline bet
    pub const fn expected_outcomes(self) -> usize {
        match self {
            MoneylineShape::TwoWay => 2,
            MoneylineShape::ThreeWay => 3,
        }
    }
}

/// Market-kind ids for one sport
#[derive(Debug, Clone, Copy)]
pub struct SportMarkets {
    /// Moneyline market id
    pub moneyline: MarketId,
    /// Total over/under market id
    pub total_ou: MarketId,
    /// Handicap market id
    pub handicap: MarketId,
    /// Sport-specific total games market id (tennis)
    pub total_games: Option<MarketId>,
    /// Sport-specific handicap games market id (tennis)
    pub handicap_games: Option<MarketId>,
    /// Moneyline outcome shape for this sport
    pub moneyline_shape: MoneylineShape,
}

impl SportMarkets {
    /// Table entry without sport-specific secondary markets
    pub fn standard(
        moneyline: MarketId,
        total_ou: MarketId,
        handicap: MarketId,
        moneyline_shape: MoneylineShape,
    ) -> Self {
        Self {
            moneyline,
            total_ou,
            handicap,
            total_games: None,
            handicap_games: None,
            moneyline_shape,
        }
    }

    /// Add a total games market id
    #[must_use]
    pub fn with_total_games(mut self, market_id: MarketId) -> Self {
        self.total_games = Some(market_id);
        self
    }

    /// Add a handicap games market id
    #[must_use]
    pub fn with_handicap_games(mut self, market_id: MarketId) -> Self {
        self.handicap_games = Some(market_id);
        self
    }
}

/// Sport id -> market-kind -> market id configuration
#[derive(Debug, Clone, Default)]
pub struct MarketTable {
    sports: FxHashMap<SportId, SportMarkets>,
}

impl MarketTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of upstream-defined Winamax constants
    ///
    /// Football (1), basketball (2), hockey (4), tennis (5). Tennis carries
    /// the game-count secondary markets.
    pub fn winamax() -> Self {
        Self::new()
            .with_sport(
                1,
                SportMarkets::standard(1, 18, 7016, MoneylineShape::ThreeWay),
            )
            .with_sport(
                2,
                SportMarkets::standard(219, 225, 223, MoneylineShape::TwoWay),
            )
            .with_sport(
                4,
                SportMarkets::standard(1, 412, 410, MoneylineShape::ThreeWay),
            )
            .with_sport(
                5,
                SportMarkets::standard(186, 314, 188, MoneylineShape::TwoWay)
                    .with_total_games(189)
                    .with_handicap_games(187),
            )
    }

    /// Add or replace one sport's entry
    #[must_use]
    pub fn with_sport(mut self, sport_id: SportId, markets: SportMarkets) -> Self {
        self.sports.insert(sport_id, markets);
        self
    }

    /// Look up a sport's markets
    ///
    /// A miss means the sport is not covered; resolution treats that as "no
    /// mapped markets", not an error.
    pub fn get(&self, sport_id: SportId) -> Option<&SportMarkets> {
        self.sports.get(&sport_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winamax_constants() {
        let table = MarketTable::winamax();

        let football = table.get(1).unwrap();
        assert_eq!(football.moneyline, 1);
        assert_eq!(football.total_ou, 18);
        assert_eq!(football.handicap, 7016);
        assert_eq!(football.moneyline_shape, MoneylineShape::ThreeWay);
        assert!(football.total_games.is_none());

        let tennis = table.get(5).unwrap();
        assert_eq!(tennis.moneyline, 186);
        assert_eq!(tennis.total_games, Some(189));
        assert_eq!(tennis.handicap_games, Some(187));
        assert_eq!(tennis.moneyline_shape, MoneylineShape::TwoWay);
    }

    #[test]
    fn test_expected_outcomes() {
        assert_eq!(MoneylineShape::ThreeWay.expected_outcomes(), 3);
        assert_eq!(MoneylineShape::TwoWay.expected_outcomes(), 2);
    }

    #[test]
    fn test_unknown_sport_misses() {
        let table = MarketTable::winamax();
        assert!(table.get(0).is_none());
        assert!(table.get(99).is_none());
    }

    #[test]
    fn test_table_is_injectable() {
        let table = MarketTable::new().with_sport(
            7,
            SportMarkets::standard(500, 501, 502, MoneylineShape::TwoWay),
        );
        assert_eq!(table.get(7).unwrap().moneyline, 500);
        assert!(table.get(1).is_none());
    }
}
