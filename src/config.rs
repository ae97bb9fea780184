//! Configuration for the feed session.
//!
//! This module provides the [`Config`] struct describing the upstream
//! endpoint, the sports to subscribe to, and the session's tunables
//! (handshake timeout, subscribe stagger, collection window).

use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::monitor::PollOptions;

/// Default WebSocket endpoint for the Winamax sports push feed
pub const DEFAULT_WS_BASE: &str =
    "wss://sports-eu-west-3.winamax.fr/uof-sports-server/socket.io/";

/// Default HTTP endpoint used for the Engine.IO polling warm-up
pub const DEFAULT_HTTP_BASE: &str =
    "https://sports-eu-west-3.winamax.fr/uof-sports-server/socket.io/";

/// Sports subscribed to by default: football, basketball, hockey, tennis
pub const DEFAULT_SPORTS: [u32; 4] = [1, 2, 4, 5];

/// Configuration for a feed session
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use winamax_feed::Config;
///
/// let config = Config::new()
///     .with_sports(&[1, 5])
///     .with_initial_collect(Duration::from_secs(15));
///
/// assert_eq!(config.sports(), &[1, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket endpoint (without query string)
    ws_base_url: String,

    /// HTTP endpoint for the polling warm-up (without query string)
    http_base_url: String,

    /// Feed language sent in the query string
    language: String,

    /// Upstream client version sent in the query string
    client_version: String,

    /// Venue label stamped on output snapshots
    bookmaker: String,

    /// Sport ids subscribed on connect
    sports: Vec<u32>,

    /// Deadline for the open/connect-ack handshake
    handshake_timeout: Duration,

    /// Delay added per subscribe call in the initial fan-out
    subscribe_stagger: Duration,

    /// Broad collection window after connect, before the first listing
    initial_collect: Duration,

    /// Polling intervals and deadlines for the readiness monitor
    poll: PollOptions,
}

impl Config {
    /// Create a configuration with the default Winamax endpoints and tunables
    pub fn new() -> Self {
        Self {
            ws_base_url: DEFAULT_WS_BASE.to_string(),
            http_base_url: DEFAULT_HTTP_BASE.to_string(),
            language: "FR".to_string(),
            client_version: "3.9.1".to_string(),
            bookmaker: "winamax".to_string(),
            sports: DEFAULT_SPORTS.to_vec(),
            handshake_timeout: Duration::from_secs(10),
            subscribe_stagger: Duration::from_millis(200),
            initial_collect: Duration::from_millis(25_000),
            poll: PollOptions::default(),
        }
    }

    /// Set the WebSocket endpoint
    #[must_use]
    pub fn with_ws_base_url(mut self, url: impl Into<String>) -> Self {
        self.ws_base_url = url.into();
        self
    }

    /// Set the HTTP warm-up endpoint
    #[must_use]
    pub fn with_http_base_url(mut self, url: impl Into<String>) -> Self {
        self.http_base_url = url.into();
        self
    }

    /// Set the feed language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the venue label used on output snapshots
    #[must_use]
    pub fn with_bookmaker(mut self, bookmaker: impl Into<String>) -> Self {
        self.bookmaker = bookmaker.into();
        self
    }

    /// Set the sports subscribed on connect
    #[must_use]
    pub fn with_sports(mut self, sports: &[u32]) -> Self {
        self.sports = sports.to_vec();
        self
    }

    /// Set the handshake deadline
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Set the per-call delay for the initial subscribe fan-out
    #[must_use]
    pub fn with_subscribe_stagger(mut self, stagger: Duration) -> Self {
        self.subscribe_stagger = stagger;
        self
    }

    /// Set the broad collection window
    #[must_use]
    pub fn with_initial_collect(mut self, window: Duration) -> Self {
        self.initial_collect = window;
        self
    }

    /// Set the readiness polling options
    #[must_use]
    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Get the feed language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get the venue label
    pub fn bookmaker(&self) -> &str {
        &self.bookmaker
    }

    /// Get the sports subscribed on connect
    pub fn sports(&self) -> &[u32] {
        &self.sports
    }

    /// Get the handshake deadline
    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    /// Get the subscribe stagger
    pub fn subscribe_stagger(&self) -> Duration {
        self.subscribe_stagger
    }

    /// Get the broad collection window
    pub fn initial_collect(&self) -> Duration {
        self.initial_collect
    }

    /// Get the readiness polling options
    pub fn poll(&self) -> PollOptions {
        self.poll
    }

    /// Full WebSocket URL including the Engine.IO query string
    pub fn websocket_url(&self) -> Result<Url, Error> {
        self.endpoint_url(&self.ws_base_url, "websocket")
    }

    /// Full polling URL including the Engine.IO query string
    ///
    /// The session appends a cache-busting `t` parameter per request.
    pub fn polling_url(&self) -> Result<Url, Error> {
        self.endpoint_url(&self.http_base_url, "polling")
    }

    fn endpoint_url(&self, base: &str, transport: &str) -> Result<Url, Error> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair("EIO", "4")
            .append_pair("transport", transport)
            .append_pair("language", &self.language)
            .append_pair("version", &self.client_version)
            .append_pair("embed", "false");
        Ok(url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
