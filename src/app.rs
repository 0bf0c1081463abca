use crate::cli::Args;
use crate::display;
use chrono::{DateTime, Utc};
use matchday_feed::config::Config;
use matchday_feed::data_fetcher::{
    DataSource, MatchBoard, MatchListing, MatchQuery, MatchRepository, RefreshTicket,
};
use matchday_feed::error::AppError;
use matchday_feed::live::{ConnectionState, DataUpdated, LiveChannel, Subscription};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

type Snapshot = (RefreshTicket, MatchListing);

/// Run the watch loop.
///
/// - Refreshes the listing on an interval, each refresh in its own task
/// - Merges refresh results and live pushes through a [`MatchBoard`]
/// - Shows the live channel state, including the offline indicator
/// - Exits on Ctrl-C
pub async fn run_watch(args: &Args, config: Config, query: MatchQuery) -> Result<(), AppError> {
    let repository = Arc::new(MatchRepository::from_config(&config)?);
    let mut board = MatchBoard::new();
    let mut source = DataSource::Sample;
    let mut fetched_at: Option<DateTime<Utc>> = None;

    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel::<Snapshot>();

    let mut updates: Option<broadcast::Receiver<DataUpdated>> = None;
    let mut status: Option<watch::Receiver<ConnectionState>> = None;
    let live_task = match LiveChannel::from_config(&config) {
        Some(mut channel) => {
            for match_id in &args.subscribe {
                channel.subscribe(Subscription::new(match_id.clone(), args.channel.clone()));
            }
            updates = Some(channel.updates());
            status = Some(channel.status());
            Some(tokio::spawn(channel.run()))
        }
        None => {
            info!("No live server configured, refreshing on interval only");
            None
        }
    };

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.refresh_interval_seconds));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let ticket = board.begin_refresh();
                let repository = Arc::clone(&repository);
                let query = query.clone();
                let tx = snapshot_tx.clone();
                tokio::spawn(async move {
                    let listing = repository.load(&query).await;
                    let _ = tx.send((ticket, listing));
                });
            }
            Some((ticket, listing)) = snapshot_rx.recv() => {
                let observed_at = listing.observed_at();
                let (listing_source, listing_fetched_at) = (listing.source, listing.fetched_at);
                if board.apply_snapshot(ticket, listing.matches, observed_at) {
                    source = listing_source;
                    fetched_at = listing_fetched_at;
                    render(args, &board, source, fetched_at)?;
                }
            }
            update = next_update(&mut updates) => match update {
                Some(update) => {
                    if args.json {
                        display::print_update_json(&update)?;
                    }
                    if board.apply_push(&update) {
                        render(args, &board, source, fetched_at)?;
                    }
                }
                None => updates = None,
            },
            state = next_status(&mut status) => match state {
                Some(state) => {
                    if !args.json {
                        display::print_connection_state(state)?;
                    }
                }
                None => status = None,
            },
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Shutting down watch mode");
                break;
            }
        }
    }

    if let Some(task) = live_task {
        task.abort();
    }
    Ok(())
}

fn render(
    args: &Args,
    board: &MatchBoard,
    source: DataSource,
    fetched_at: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    let listing = MatchListing {
        matches: board.matches(),
        source,
        fetched_at,
    };
    if args.json {
        display::print_listing_json(&listing)
    } else {
        display::print_listing(&listing)
    }
}

/// Next live update; `None` once the channel has shut down. Pends forever
/// when there is no channel.
async fn next_update(rx: &mut Option<broadcast::Receiver<DataUpdated>>) -> Option<DataUpdated> {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    loop {
        match rx.recv().await {
            Ok(update) => return Some(update),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Dropped {} live updates while busy", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

async fn next_status(rx: &mut Option<watch::Receiver<ConnectionState>>) -> Option<ConnectionState> {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    rx.changed().await.ok()?;
    Some(*rx.borrow_and_update())
}
