//! Live integration test against the real push feed.
//!
//! Disabled by default: the feed sits behind consent/geo gating and the test
//! needs network access.
//!
//! # Running
//!
//! ```bash
//! WINAMAX_LIVE=1 cargo test --test integration_feed -- --nocapture
//! ```
//!
//! Optionally point at a different endpoint with WINAMAX_FEED_URL.

use std::time::Duration;

use tokio::time::timeout;
use winamax_feed::{Config, FeedSession, SharedFeed};

/// Skip unless explicitly enabled
fn live_config() -> Option<Config> {
    std::env::var("WINAMAX_LIVE").ok()?;
    let mut config = Config::new();
    if let Ok(url) = std::env::var("WINAMAX_FEED_URL") {
        config = config.with_ws_base_url(url);
    }
    Some(config)
}

#[tokio::test]
async fn test_connect_and_collect() {
    let Some(config) = live_config() else {
        eprintln!("Skipping live test: WINAMAX_LIVE not set");
        return;
    };

    let mut session = match FeedSession::connect(&config).await {
        Ok(s) => s,
        Err(e) => panic!("failed to connect: {}", e),
    };
    assert!(session.session_info().is_some());

    session
        .subscribe_sports(&[1])
        .await
        .expect("failed to subscribe");

    let feed = SharedFeed::new();
    let collected = timeout(Duration::from_secs(15), async {
        let mut merged = 0usize;
        while let Some(event) = session.next().await {
            match event {
                Ok((name, payload)) => {
                    if feed.merge_event(&name, &payload) {
                        merged += 1;
                        if merged >= 3 {
                            break;
                        }
                    }
                }
                Err(e) => {
                    eprintln!("stream error: {}", e);
                    break;
                }
            }
        }
        merged
    })
    .await;

    match collected {
        Ok(merged) => {
            println!(
                "merged {} fragments, {} matches known",
                merged,
                feed.match_count()
            );
            assert!(merged > 0, "no fragments merged");
        }
        Err(_) => println!("timeout reached before 3 fragments (feed may be quiet)"),
    }

    let _ = session.close().await;
}
