use matchday_feed::error::AppError;
use matchday_feed::live::{
    ConnectionState, LiveChannel, PushConnection, PushTransport, ReconnectPolicy, Subscription,
    UpdateKind,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// What the next connect attempt does
enum Step {
    Fail,
    /// Connects, delivers the frames, then the peer closes
    Connect(Vec<String>),
}

#[derive(Clone, Default)]
struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    sent: Arc<Mutex<Vec<String>>>,
    connects: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            ..Self::default()
        }
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    fn sent_frames(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect()
    }
}

struct ScriptedConnection {
    frames: VecDeque<String>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl PushTransport for ScriptedTransport {
    type Connection = ScriptedConnection;

    async fn connect(&self) -> Result<ScriptedConnection, AppError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Fail);
        match step {
            Step::Fail => Err(AppError::live_channel("ws://test", "connection refused")),
            Step::Connect(frames) => Ok(ScriptedConnection {
                frames: frames.into(),
                sent: Arc::clone(&self.sent),
            }),
        }
    }
}

impl PushConnection for ScriptedConnection {
    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String, AppError>> {
        self.frames.pop_front().map(Ok)
    }
}

/// Paused-clock timers fire on millisecond ticks
fn assert_elapsed(started: Instant, expected: Duration) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(10),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

fn frame(event: &str, data: Value) -> String {
    json!({"event": event, "data": data}).to_string()
}

#[tokio::test(start_paused = true)]
async fn test_channel_stops_after_retry_budget() {
    let transport = ScriptedTransport::new(Vec::new());
    let channel = LiveChannel::new(transport.clone(), ReconnectPolicy::default());
    let status = channel.status();

    let started = Instant::now();
    let final_state = channel.run().await;

    // 1 + 2 + 4 + 8 + 16 seconds of backoff between six failed connects
    assert_eq!(final_state, ConnectionState::Stopped);
    assert_elapsed(started, Duration::from_secs(31));
    assert_eq!(transport.connects(), 6);
    assert_eq!(*status.borrow(), ConnectionState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_successful_connect_resets_backoff() {
    let transport = ScriptedTransport::new(vec![
        Step::Fail,
        Step::Fail,
        Step::Connect(Vec::new()),
    ]);
    let channel = LiveChannel::new(transport.clone(), ReconnectPolicy::default());

    let started = Instant::now();
    channel.run().await;

    // 1 + 2 before the connect, then a fresh 1 + 2 + 4 + 8 + 16
    assert_elapsed(started, Duration::from_secs(34));
    assert_eq!(transport.connects(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_updates_are_published_and_unknown_events_ignored() {
    let transport = ScriptedTransport::new(vec![Step::Connect(vec![
        frame("matchUpdate", json!({"matchId": "m1", "score": {"home": 2, "away": 0}})),
        frame("heartbeat", json!({})),
        "not json".to_string(),
        frame("oddsUpdate", json!({"matchId": "m1", "home": 1.5})),
        frame("liveEvent", json!({"matchId": "m1", "minute": 67, "type": "goal"})),
    ])]);
    let channel = LiveChannel::new(transport, ReconnectPolicy::default());
    let mut updates = channel.updates();

    channel.run().await;

    let kinds: Vec<UpdateKind> = std::iter::from_fn(|| updates.try_recv().ok())
        .map(|update| update.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            UpdateKind::MatchUpdate,
            UpdateKind::OddsUpdate,
            UpdateKind::LiveEvent
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_subscriptions_resent_after_reconnect() {
    let transport = ScriptedTransport::new(vec![
        Step::Connect(Vec::new()),
        Step::Fail,
        Step::Connect(Vec::new()),
    ]);
    let mut channel = LiveChannel::new(transport.clone(), ReconnectPolicy::default());
    channel.subscribe(Subscription::new("m1", "match"));
    channel.subscribe(Subscription::new("m1", "match"));

    // Registered through the handle before the first connect
    let handle = channel.handle();
    assert!(handle.subscribe(Subscription::new("m2", "odds")));

    channel.run().await;

    let expected = vec![
        json!({"event": "subscribe", "data": {"matchId": "m1", "channel": "match"}}),
        json!({"event": "subscribe", "data": {"matchId": "m2", "channel": "odds"}}),
    ];
    let sent = transport.sent_frames();
    assert_eq!(sent.len(), 4, "two subscriptions on each of two connections");
    assert_eq!(sent[..2], expected[..]);
    assert_eq!(sent[2..], expected[..]);

    // Channel has stopped, handle reports it
    assert!(!handle.subscribe(Subscription::new("m3", "match")));
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy_budget() {
    let policy = ReconnectPolicy {
        base: Duration::from_millis(100),
        cap: Duration::from_millis(250),
        max_attempts: 3,
    };
    let transport = ScriptedTransport::new(Vec::new());

    let started = Instant::now();
    LiveChannel::new(transport.clone(), policy).run().await;

    // 100 + 200 + 250 (capped)
    assert_elapsed(started, Duration::from_millis(550));
    assert_eq!(transport.connects(), 4);
}
