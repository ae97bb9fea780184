//! The push-feed client.
//!
//! - [`session`] - the Socket.IO transport session: handshake, keepalive,
//!   subscriptions, and the inbound event stream

pub mod session;

pub use session::FeedSession;
