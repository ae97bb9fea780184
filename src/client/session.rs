//! Socket.IO transport session.
//!
//! [`FeedSession`] owns the handshake with the push server and translates
//! control frames into a clean subscribe / event-received interface:
//!
//! - on connect it performs the Engine.IO polling warm-up, upgrades to
//!   WebSocket, answers the open frame with a namespace connect, and waits
//!   for the connect-ack
//! - pings are answered synchronously inside the receive loop — missing a
//!   pong within the upstream's window is a fatal connection error
//! - malformed frames are logged and dropped; connection loss surfaces
//!   [`Error::ConnectionClosed`] to the caller (retry policy belongs there)
//!
//! # Example
//!
//! ```rust,no_run
//! use winamax_feed::{Config, FeedSession, SharedFeed};
//!
//! # async fn example() -> Result<(), winamax_feed::Error> {
//! let config = Config::new();
//! let mut session = FeedSession::connect(&config).await?;
//! session.subscribe_sports(config.sports()).await?;
//!
//! let feed = SharedFeed::new();
//! while let Some(event) = session.next().await {
//!     let (name, payload) = event?;
//!     feed.merge_event(&name, &payload);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::protocol::{encode_event, Frame, SessionInfo, CONNECT, PONG};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Event name used for subscription requests
const SUBSCRIBE_EVENT: &str = "m";

/// A connected, handshaken push-feed session
pub struct FeedSession {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
    session_info: Option<SessionInfo>,
    request_seq: u64,
    subscribe_stagger: Duration,
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession")
            .field("session_info", &self.session_info)
            .field("request_seq", &self.request_seq)
            .finish()
    }
}

impl FeedSession {
    /// Connect to the push feed and complete the handshake
    ///
    /// Performs the polling warm-up (non-fatal if it fails), upgrades to
    /// WebSocket, then drives the open / connect / connect-ack exchange
    /// bounded by [`Config::handshake_timeout`].
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket connection fails, the handshake
    /// does not complete within the deadline, or the connection closes
    /// during the handshake.
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        match Self::warm_up(config).await {
            Ok(status) => debug!(status, "polling warm-up"),
            Err(e) => warn!(error = %e, "polling warm-up failed, continuing"),
        }

        let url = config.websocket_url()?;
        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (write, read) = ws_stream.split();

        let mut session = Self {
            write,
            read,
            session_info: None,
            request_seq: 0,
            subscribe_stagger: config.subscribe_stagger(),
        };

        timeout(config.handshake_timeout(), session.handshake())
            .await
            .map_err(|_| Error::Timeout)??;

        info!(
            sid = session.session_info.as_ref().map(|i| i.sid.as_str()),
            "feed session connected"
        );
        Ok(session)
    }

    /// Engine.IO polling warm-up GET, mirroring the upstream client
    async fn warm_up(config: &Config) -> Result<u16, Error> {
        let mut url = config.polling_url()?;
        url.query_pairs_mut()
            .append_pair("t", &now_millis().to_string());

        let response = reqwest::Client::new().get(url.as_str()).send().await?;
        Ok(response.status().as_u16())
    }

    /// Drive the handshake until the connect-ack arrives
    async fn handshake(&mut self) -> Result<(), Error> {
        while let Some(message) = self.read.next().await {
            match message? {
                Message::Text(text) => match Frame::parse(&text) {
                    Frame::Open(info) => {
                        debug!(sid = %info.sid, "open frame received");
                        self.session_info = Some(info);
                        self.write.send(Message::Text(CONNECT.to_string())).await?;
                    }
                    Frame::Ping => {
                        self.write.send(Message::Text(PONG.to_string())).await?;
                    }
                    Frame::ConnectAck => return Ok(()),
                    other => debug!(frame = ?other, "ignoring frame during handshake"),
                },
                Message::Ping(data) => {
                    self.write.send(Message::Pong(data)).await?;
                }
                Message::Close(_) => return Err(Error::ConnectionClosed),
                _ => {}
            }
        }
        Err(Error::ConnectionClosed)
    }

    /// Session metadata from the open frame, once received
    pub fn session_info(&self) -> Option<&SessionInfo> {
        self.session_info.as_ref()
    }

    /// Request a data feed for a route with a caller-chosen request id
    ///
    /// `request_id` is an opaque echo token, not interpreted by the engine.
    pub async fn subscribe_with_id(
        &mut self,
        route: &str,
        request_id: &str,
    ) -> Result<(), Error> {
        let body = json!({"route": route, "requestId": request_id});
        let text = encode_event(SUBSCRIBE_EVENT, &body);
        debug!(route, request_id, "subscribing");
        self.write.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Request a data feed for a route, generating a unique request id
    ///
    /// Returns the request id used.
    pub async fn subscribe(&mut self, route: &str) -> Result<String, Error> {
        self.request_seq += 1;
        let request_id = request_id(now_millis(), self.request_seq);
        self.subscribe_with_id(route, &request_id).await?;
        Ok(request_id)
    }

    /// Fan out one subscribe call per sport, staggered
    ///
    /// The per-call delay avoids overwhelming the upstream; the exact value
    /// is a tunable ([`Config::with_subscribe_stagger`]), not semantically
    /// required.
    pub async fn subscribe_sports(&mut self, sports: &[u32]) -> Result<(), Error> {
        for (i, sport) in sports.iter().enumerate() {
            if i > 0 {
                sleep(self.subscribe_stagger).await;
            }
            self.subscribe(&format!("sport:{}", sport)).await?;
        }
        Ok(())
    }

    /// Request the detailed feed for one match
    pub async fn subscribe_match(&mut self, match_id: u64) -> Result<String, Error> {
        self.subscribe(&format!("match:{}", match_id)).await
    }

    /// Receive the next application event as `(event_name, payload)`
    ///
    /// Keepalive pings are answered inside this loop; malformed frames are
    /// logged and skipped. Returns `None` when the stream ends, and
    /// [`Error::ConnectionClosed`] when the upstream closes the channel.
    pub async fn next(&mut self) -> Option<Result<(String, Value), Error>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => match Frame::parse(&text) {
                    Frame::Event { name, body } => return Some(Ok((name, body))),
                    Frame::Ping => {
                        if let Err(e) = self.write.send(Message::Text(PONG.to_string())).await {
                            return Some(Err(e.into()));
                        }
                    }
                    Frame::Unknown(raw) => {
                        warn!(frame = %raw, "dropping malformed frame");
                    }
                    other => debug!(frame = ?other, "ignoring control frame"),
                },
                Ok(Message::Ping(data)) => {
                    if let Err(e) = self.write.send(Message::Pong(data)).await {
                        return Some(Err(e.into()));
                    }
                }
                Ok(Message::Close(_)) => return Some(Err(Error::ConnectionClosed)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    /// Close the session
    pub async fn close(&mut self) -> Result<(), Error> {
        self.write.close().await?;
        Ok(())
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn request_id(millis: u128, seq: u64) -> String {
    format!("req_{}_{}", millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_format() {
        assert_eq!(request_id(1_700_000_000_000, 3), "req_1700000000000_3");
    }

    #[test]
    fn test_request_ids_unique_per_seq() {
        let a = request_id(1_700_000_000_000, 1);
        let b = request_id(1_700_000_000_000, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_subscribe_event_wire_shape() {
        let body = json!({"route": "sport:1", "requestId": "req_1_1"});
        let text = encode_event(SUBSCRIBE_EVENT, &body);
        assert_eq!(text, r#"42["m",{"requestId":"req_1_1","route":"sport:1"}]"#);
    }
}
