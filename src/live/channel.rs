use chrono::Utc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, instrument, warn};

use super::messages::{DataUpdated, PushMessage, Subscription};
use super::reconnect::{ConnectionState, NextStep, ReconnectPolicy, ReconnectState};
use super::transport::{PushConnection, PushTransport, WebSocketTransport};
use crate::config::Config;
use crate::constants::reconnect::EVENT_BUFFER;
use crate::error::AppError;

/// Registers subscriptions with a running [`LiveChannel`].
#[derive(Debug, Clone)]
pub struct LiveHandle {
    commands: mpsc::UnboundedSender<Subscription>,
}

impl LiveHandle {
    /// Returns false once the channel has stopped.
    pub fn subscribe(&self, subscription: Subscription) -> bool {
        self.commands.send(subscription).is_ok()
    }
}

/// Persistent push connection with automatic reconnection.
///
/// Incoming `matchUpdate`, `oddsUpdate` and `liveEvent` frames are
/// re-published as [`DataUpdated`] on a broadcast channel. Connection state
/// is published on a watch channel; it ends at [`ConnectionState::Stopped`]
/// once the retry budget is spent.
pub struct LiveChannel<T = WebSocketTransport> {
    transport: T,
    policy: ReconnectPolicy,
    subscriptions: Vec<Subscription>,
    commands_tx: mpsc::UnboundedSender<Subscription>,
    commands_rx: mpsc::UnboundedReceiver<Subscription>,
    updates: broadcast::Sender<DataUpdated>,
    status: watch::Sender<ConnectionState>,
}

impl LiveChannel<WebSocketTransport> {
    /// Channel for the configured live server, or `None` when no URL is set
    pub fn from_config(config: &Config) -> Option<Self> {
        let url = config.live_server_url.as_deref()?;
        Some(Self::new(
            WebSocketTransport::new(url),
            ReconnectPolicy::from(config),
        ))
    }
}

impl<T: PushTransport> LiveChannel<T> {
    pub fn new(transport: T, policy: ReconnectPolicy) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (updates, _) = broadcast::channel(EVENT_BUFFER);
        let (status, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            transport,
            policy,
            subscriptions: Vec::new(),
            commands_tx,
            commands_rx,
            updates,
            status,
        }
    }

    /// Registers a subscription sent after every (re)connect
    pub fn subscribe(&mut self, subscription: Subscription) {
        if !self.subscriptions.contains(&subscription) {
            self.subscriptions.push(subscription);
        }
    }

    pub fn handle(&self) -> LiveHandle {
        LiveHandle {
            commands: self.commands_tx.clone(),
        }
    }

    pub fn updates(&self) -> broadcast::Receiver<DataUpdated> {
        self.updates.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status.subscribe()
    }

    /// Runs the connect/read/reconnect loop until the retry budget is
    /// exhausted. Returns the terminal state.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> ConnectionState {
        let mut reconnect = ReconnectState::new(self.policy);

        loop {
            reconnect.begin_connect();
            self.publish_state(reconnect.state());

            match self.transport.connect().await {
                Ok(mut connection) => {
                    reconnect.on_connected();
                    self.publish_state(reconnect.state());
                    info!("Live channel connected");

                    self.drain_commands();
                    match self.send_subscriptions(&mut connection).await {
                        Ok(()) => self.pump(&mut connection).await,
                        Err(e) => warn!("Failed to send subscriptions: {}", e),
                    }
                    info!("Live channel disconnected");
                }
                Err(e) => warn!("Live channel connect failed: {}", e),
            }

            match reconnect.on_disconnected() {
                NextStep::Retry(delay) => {
                    self.publish_state(reconnect.state());
                    info!(
                        "Reconnecting in {:?} (attempt {}/{})",
                        delay,
                        reconnect.attempt(),
                        self.policy.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                NextStep::GiveUp => {
                    self.publish_state(reconnect.state());
                    warn!(
                        "Live channel giving up after {} reconnect attempts",
                        self.policy.max_attempts
                    );
                    return ConnectionState::Stopped;
                }
            }
        }
    }

    /// Reads frames until the connection closes or fails.
    async fn pump(&mut self, connection: &mut T::Connection) {
        loop {
            tokio::select! {
                frame = connection.next_text() => match frame {
                    Some(Ok(text)) => self.dispatch(&text),
                    Some(Err(e)) => {
                        warn!("Live channel read failed: {}", e);
                        return;
                    }
                    None => return,
                },
                Some(subscription) = self.commands_rx.recv() => {
                    if let Err(e) = connection.send_text(subscription.to_frame()).await {
                        warn!("Failed to send subscription: {}", e);
                    }
                    self.subscribe(subscription);
                }
            }
        }
    }

    fn dispatch(&self, text: &str) {
        match PushMessage::parse(text) {
            Some(PushMessage::Update { kind, data }) => {
                let update = DataUpdated {
                    kind,
                    data,
                    timestamp: Utc::now(),
                };
                // No receivers is not an error
                let _ = self.updates.send(update);
            }
            Some(PushMessage::Unknown(event)) => debug!("Ignoring push event '{}'", event),
            None => {}
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(subscription) = self.commands_rx.try_recv() {
            self.subscribe(subscription);
        }
    }

    async fn send_subscriptions(&self, connection: &mut T::Connection) -> Result<(), AppError> {
        for subscription in &self.subscriptions {
            connection.send_text(subscription.to_frame()).await?;
            debug!(
                "Subscribed to {} on channel {}",
                subscription.match_id, subscription.channel
            );
        }
        Ok(())
    }

    fn publish_state(&self, state: ConnectionState) {
        self.status.send_replace(state);
    }
}
