//! # winamax-feed
//!
//! A real-time state-merge and market-resolution engine for the Winamax
//! sports push feed.
//!
//! ## Features
//!
//! - **Transport Session** - Socket.IO handshake, keepalive, and
//!   subscription fan-out over WebSocket
//! - **Merge Store** - folds partial, overlapping fragments into a coherent
//!   world model of matches, tournaments, bets, and prices
//! - **Market Resolver** - assembles normalized moneyline/totals/handicap
//!   markets from the merged state
//! - **Readiness Monitor** - deadline-bounded polling until a match's
//!   moneyline is complete
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use winamax_feed::market::{build_markets, MarketTable};
//! use winamax_feed::monitor::{wait_until_ready, PollOptions};
//! use winamax_feed::{Config, FeedSession, SharedFeed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), winamax_feed::Error> {
//!     let config = Config::new();
//!     let mut session = FeedSession::connect(&config).await?;
//!     session.subscribe_sports(config.sports()).await?;
//!
//!     let feed = SharedFeed::new();
//!     let table = MarketTable::winamax();
//!
//!     // Drive merges from the event stream (typically in its own task)
//!     if let Some(event) = session.next().await {
//!         let (name, payload) = event?;
//!         feed.merge_event(&name, &payload);
//!     }
//!
//!     // Wait for a match's moneyline, then build its snapshot
//!     let readiness = wait_until_ready(&feed, &table, 100, 0, PollOptions::default()).await;
//!     if readiness.ready {
//!         let snapshot = build_markets(&feed.read(), &table, 100, config.bookmaker());
//!         println!("{}", serde_json::to_string_pretty(&snapshot)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`client`] - the Socket.IO transport session
//! - [`protocol`] - Engine.IO/Socket.IO frame codec
//! - [`store`] - the incremental merge store
//! - [`market`] - market table, line decoding, and resolution
//! - [`monitor`] - two-phase readiness polling
//! - [`types`] - entity records and fragment decoding
//! - [`config`] - endpoint and session tunables
//! - [`error`] - error types for the crate
//!
//! ## Error model
//!
//! Only transport failures are fatal and surface as [`Error`]. Malformed
//! frames and fragments are logged and dropped, missing entity references
//! resolve to `None` fields, and readiness timeouts degrade to boolean
//! results — a single bad fragment or unready match never stops the run.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod monitor;
pub mod protocol;
pub mod store;
pub mod types;

// Re-export main types at crate root for convenience
pub use client::FeedSession;
pub use config::Config;
pub use error::Error;
pub use store::{FeedState, SharedFeed};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
