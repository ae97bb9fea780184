//! Entity types for the merged world model.
//!
//! - [`records`] - Entity records held by the merge store
//! - [`fragment`] - Incoming partial updates and their lenient decoding
//!
//! All entity ids come from upstream and may arrive as numbers or numeric
//! strings; they are normalized here so repeated fragments referencing the
//! same logical entity coalesce to one record.

pub mod fragment;
pub mod records;

pub use fragment::Fragment;
pub use records::{BetRecord, MatchRecord, TournamentRecord};

/// Sport id (upstream-defined, e.g. 1 = football)
pub type SportId = u32;

/// Match id
pub type MatchId = u64;

/// Bet id (one market instance)
pub type BetId = u64;

/// Outcome id, priced via the odds map
pub type OutcomeId = u64;

/// Market-kind id; meaning is sport-dependent, resolved via the market table
pub type MarketId = u64;

/// Decimal price for one outcome
pub type Price = f64;

/// Scheduled start time, seconds since Unix epoch
pub type Timestamp = i64;
