//! Market resolution.
//!
//! Given the merged world model and a per-sport market-kind table, this
//! module locates the bet records for a match and assembles a normalized
//! market snapshot:
//!
//! - [`table`] - injectable sport id -> market-kind -> market id mapping
//! - [`line`] - decoding of `key=value` encoded line values
//! - [`resolver`] - readiness check, snapshot assembly, match listing
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use winamax_feed::market::{build_markets, MarketTable};
//! use winamax_feed::store::FeedState;
//! use winamax_feed::types::Fragment;
//!
//! let mut state = FeedState::new();
//! state.merge(
//!     &Fragment::from_value(&json!({
//!         "matches": {"100": {"sportId": 1, "competitor1Name": "A", "competitor2Name": "B"}},
//!         "bets": {"200": {"matchId": 100, "marketId": 1, "outcomes": [1, 2, 3]}},
//!         "odds": {"1": 1.9, "2": 3.2, "3": 3.8}
//!     }))
//!     .unwrap(),
//! );
//!
//! let table = MarketTable::winamax();
//! let snapshot = build_markets(&state, &table, 100, "winamax");
//! assert_eq!(snapshot.markets.moneyline, Some(vec![Some(1.9), Some(3.2), Some(3.8)]));
//! ```

pub mod line;
pub mod resolver;
pub mod table;

pub use line::Line;
pub use resolver::{
    build_listing, build_markets, is_moneyline_ready, league_coverage, MarketSnapshot, Markets,
    MatchListing,
};
pub use table::{MarketTable, MoneylineShape, SportMarkets};
