//! The incremental merge store.
//!
//! This module provides the mutable world model fed by the push connection:
//!
//! - [`state`] - [`FeedState`], the entity maps and the `merge` operation
//! - [`shared`] - [`SharedFeed`], a lock-guarded handle for one writer and
//!   many readers
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use winamax_feed::store::FeedState;
//! use winamax_feed::types::Fragment;
//!
//! let mut state = FeedState::new();
//! let fragment = Fragment::from_value(&json!({
//!     "matches": {"100": {"sportId": 1, "competitor1Name": "A"}}
//! }))
//! .unwrap();
//! state.merge(&fragment);
//!
//! assert_eq!(state.sport_of(100), 1);
//! ```

pub mod shared;
pub mod state;

pub use shared::SharedFeed;
pub use state::FeedState;
