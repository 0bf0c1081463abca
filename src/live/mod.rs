//! Live push channel: a WebSocket connection that re-publishes match,
//! odds and live-event updates and reconnects with exponential backoff.

pub mod channel;
pub mod messages;
pub mod reconnect;
pub mod transport;

pub use channel::{LiveChannel, LiveHandle};
pub use messages::{DataUpdated, PushMessage, Subscription, UpdateKind};
pub use reconnect::{ConnectionState, NextStep, ReconnectPolicy, ReconnectState};
pub use transport::{PushConnection, PushTransport, WebSocketTransport};
