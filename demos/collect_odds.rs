//! Collect live odds: connect, merge the broad feed, then resolve markets
//! for the first few football matches.
//!
//! ```bash
//! cargo run --example collect_odds
//! ```
//!
//! This is the caller-side glue the library leaves open: it decides what to
//! do with listings, timeouts, and snapshots.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use winamax_feed::market::{build_listing, build_markets, league_coverage, MarketTable};
use winamax_feed::monitor::wait_until_ready;
use winamax_feed::{Config, FeedSession, SharedFeed};

/// How many football matches to resolve in detail
const AUTO_FOOTBALL_N: usize = 3;

#[tokio::main]
async fn main() -> Result<(), winamax_feed::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::new();
    let table = MarketTable::winamax();
    let feed = SharedFeed::new();

    let mut session = FeedSession::connect(&config).await?;
    session.subscribe_sports(config.sports()).await?;

    // Broad collection window: drain events into the store
    drain_until(&mut session, &feed, Instant::now() + config.initial_collect()).await?;

    let mut listing = build_listing(&feed.read(), config.sports());
    println!("collected {} matches", listing.len());

    // Tournament names often trail match data; give them one more chance
    if league_coverage(&listing) < 0.75 {
        drain_until(&mut session, &feed, Instant::now() + Duration::from_secs(6)).await?;
        listing = build_listing(&feed.read(), config.sports());
    }
    println!("{}", serde_json::to_string_pretty(&listing)?);

    let targets: Vec<u64> = listing
        .iter()
        .filter(|entry| entry.sport_id == 1)
        .take(AUTO_FOOTBALL_N)
        .map(|entry| entry.match_id)
        .collect();

    for match_id in targets {
        session.subscribe_match(match_id).await?;

        let sport_hint = feed.sport_of(match_id);
        let wait = wait_until_ready(&feed, &table, match_id, sport_hint, config.poll());
        tokio::pin!(wait);

        // Keep merging while the monitor polls the store
        let readiness = loop {
            tokio::select! {
                readiness = &mut wait => break readiness,
                event = session.next() => match event {
                    Some(Ok((name, payload))) => { feed.merge_event(&name, &payload); }
                    Some(Err(e)) => return Err(e),
                    None => return Err(winamax_feed::Error::ConnectionClosed),
                },
            }
        };
        if !readiness.ready {
            eprintln!("moneyline incomplete for match {} (timeout)", match_id);
        }

        // Let trailing odds land before the final build
        drain_until(&mut session, &feed, Instant::now() + Duration::from_millis(1200)).await?;

        let snapshot = build_markets(&feed.read(), &table, match_id, config.bookmaker());
        if !snapshot.has_priced_moneyline() {
            eprintln!("no priced moneyline for match {}, skipping", match_id);
            continue;
        }
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    session.close().await
}

/// Merge inbound events until the deadline; connection loss is fatal
async fn drain_until(
    session: &mut FeedSession,
    feed: &SharedFeed,
    deadline: Instant,
) -> Result<(), winamax_feed::Error> {
    loop {
        tokio::select! {
            _ = sleep_until(deadline) => return Ok(()),
            event = session.next() => match event {
                Some(Ok((name, payload))) => { feed.merge_event(&name, &payload); }
                Some(Err(e)) => return Err(e),
                None => return Err(winamax_feed::Error::ConnectionClosed),
            },
        }
    }
}
