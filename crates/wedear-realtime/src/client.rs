//! The realtime client.
//!
//! A [`RealtimeClient`] owns at most one connection at a time. `connect`
//! spawns a supervisor task that opens the connection, pumps physical
//! messages into [`RealtimeClient::handle_raw_message`], and reconnects on a
//! fixed delay when the connection drops. `disconnect` cancels the
//! supervisor, which closes the connection and abandons any pending retry.
//!
//! Shared state sits behind `parking_lot` locks. No lock is held across an
//! `.await` or while a handler runs, so handlers may call back into the
//! client.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;
use wedear_core::{FrameKind, InboundFrame, SessionSource, split_batch};
use wedear_settings::RealtimeSettings;

use crate::endpoint::build_url;
use crate::errors::{RealtimeError, TransportError};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::reconnect::{ReconnectPolicy, RetryDecision};
use crate::registry::{self, HandlerRegistry, MessageHandler};
use crate::state::ConnectionState;
use crate::transport::{Transport, WsTransport};

/// Handle to the realtime channel. Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct RealtimeClient {
    shared: Arc<Shared>,
}

struct Shared {
    settings: RealtimeSettings,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    registry: parking_lot::RwLock<HandlerRegistry>,
    link: parking_lot::Mutex<Link>,
}

/// Connection bookkeeping. `generation` changes on every connect and
/// disconnect; a supervisor whose generation is stale must not touch state.
struct Link {
    state: ConnectionState,
    policy: ReconnectPolicy,
    generation: u64,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

enum SessionEnd {
    Closed,
    Failed(TransportError),
    Cancelled,
}

impl RealtimeClient {
    /// Create a client over an arbitrary transport and notifier.
    pub fn new(
        settings: RealtimeSettings,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let policy = ReconnectPolicy::from_settings(&settings);
        Self {
            shared: Arc::new(Shared {
                settings,
                transport,
                notifier,
                registry: parking_lot::RwLock::new(HandlerRegistry::new()),
                link: parking_lot::Mutex::new(Link {
                    state: ConnectionState::Disconnected,
                    policy,
                    generation: 0,
                    cancel: None,
                    task: None,
                }),
            }),
        }
    }

    /// Client over WebSockets that reports notices through `tracing`.
    pub fn with_websocket(settings: RealtimeSettings) -> Self {
        let transport = Arc::new(WsTransport::new(settings.connect_timeout()));
        Self::new(settings, transport, Arc::new(TracingNotifier))
    }

    // ── Connection lifecycle ────────────────────────────────────────────

    /// Open the channel for `user_id` acting as `role`.
    ///
    /// Without an identity this logs a warning and does nothing. Otherwise any
    /// existing connection is replaced and the retry budget starts full. The
    /// handshake runs in the background; watch [`state`](Self::state) for the
    /// outcome.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self, user_id: &str, role: &str) -> Result<(), RealtimeError> {
        if user_id.is_empty() || role.is_empty() {
            warn!("user not logged in, cannot connect to realtime channel");
            return Ok(());
        }
        let url = build_url(&self.shared.settings, user_id, role)?;
        let cancel = CancellationToken::new();

        let mut link = self.shared.link.lock();
        if let Some(previous) = link.cancel.replace(cancel.clone()) {
            debug!("replacing existing realtime connection");
            previous.cancel();
        }
        // The old supervisor exits on its own once cancelled.
        let _ = link.task.take();
        link.generation += 1;
        link.state = ConnectionState::Connecting;
        link.policy.reset();
        let generation = link.generation;

        info!(user_id, role, "connecting to realtime channel");
        link.task = Some(tokio::spawn(supervise(
            Arc::clone(&self.shared),
            url,
            generation,
            cancel,
        )));
        Ok(())
    }

    /// [`connect`](Self::connect) with the identity read from `session`.
    pub fn connect_session(&self, session: &dyn SessionSource) -> Result<(), RealtimeError> {
        match session.identity() {
            Some((user_id, role)) => self.connect(&user_id, &role),
            None => {
                warn!("user not logged in, cannot connect to realtime channel");
                Ok(())
            }
        }
    }

    /// Close the connection and cancel any pending retry. No-op when idle.
    pub fn disconnect(&self) {
        let cancel = {
            let mut link = self.shared.link.lock();
            let Some(cancel) = link.cancel.take() else {
                return;
            };
            link.generation += 1;
            link.state = ConnectionState::Disconnected;
            cancel
        };
        cancel.cancel();
        info!("realtime channel disconnected");
    }

    /// [`disconnect`](Self::disconnect), then wait for the connection to close.
    pub async fn shutdown(&self) {
        self.disconnect();
        let task = self.shared.link.lock().task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "realtime supervisor task failed");
            }
        }
    }

    /// Whether the connection is open.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.link.lock().state
    }

    /// Reconnection attempts consumed since the last successful open.
    pub fn retry_attempts(&self) -> u32 {
        self.shared.link.lock().policy.attempts()
    }

    // ── Handlers ────────────────────────────────────────────────────────

    /// Register `handler` for frames of `kind`. Returns `false` if already registered.
    pub fn add_message_handler(&self, kind: FrameKind, handler: MessageHandler) -> bool {
        self.shared.registry.write().add(kind, handler)
    }

    /// Unregister `handler` from `kind`. Returns `false` if it was not registered.
    pub fn remove_message_handler(&self, kind: &FrameKind, handler: &MessageHandler) -> bool {
        self.shared.registry.write().remove(kind, handler)
    }

    // ── Inbound ─────────────────────────────────────────────────────────

    /// Decode a physical message and dispatch each frame in order.
    ///
    /// A frame that fails to decode is logged with its raw text and skipped;
    /// the rest of the batch is still delivered.
    pub fn handle_raw_message(&self, message: &str) {
        self.shared.handle_raw_message(message);
    }

    /// Deliver one frame to every handler registered for its kind.
    pub fn dispatch(&self, frame: &InboundFrame) {
        self.shared.dispatch(frame);
    }
}

impl Shared {
    fn handle_raw_message(&self, message: &str) {
        for line in split_batch(message) {
            match InboundFrame::decode(line) {
                Ok(frame) => self.dispatch(&frame),
                Err(e) => error!(error = %e, raw = line, "failed to decode realtime frame"),
            }
        }
    }

    fn dispatch(&self, frame: &InboundFrame) {
        let kind = frame.kind();
        let handlers = self.registry.read().handlers_for(&kind);
        if handlers.is_empty() {
            debug!(%kind, "no handlers for frame");
            return;
        }
        let report = registry::invoke_all(&handlers, frame);
        debug!(
            %kind,
            action = frame.action.as_str(),
            delivered = report.delivered,
            failed = report.failed,
            "frame dispatched"
        );
    }

    /// Set `state` if `generation` is still current.
    fn transition(&self, generation: u64, state: ConnectionState) -> bool {
        let mut link = self.link.lock();
        if link.generation != generation {
            return false;
        }
        link.state = state;
        true
    }

    /// Mark the connection open and refill the retry budget.
    fn mark_open(&self, generation: u64) -> bool {
        let mut link = self.link.lock();
        if link.generation != generation {
            return false;
        }
        link.state = ConnectionState::Open;
        link.policy.reset();
        true
    }

    /// Record an involuntary disconnect. `None` if this supervisor is stale.
    fn on_disconnect(&self, generation: u64) -> Option<RetryDecision> {
        let mut link = self.link.lock();
        if link.generation != generation {
            return None;
        }
        link.state = ConnectionState::Disconnected;
        Some(link.policy.on_disconnect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Supervisor
// ─────────────────────────────────────────────────────────────────────────────

async fn supervise(shared: Arc<Shared>, url: Url, generation: u64, cancel: CancellationToken) {
    let max_attempts = shared.settings.max_reconnect_attempts;
    loop {
        match run_connection(&shared, &url, generation, &cancel).await {
            SessionEnd::Cancelled => return,
            SessionEnd::Closed => info!("realtime connection closed"),
            SessionEnd::Failed(e) => {
                error!(error = %e, "realtime connection error");
                shared.notifier.notify(Notice::ConnectionError);
            }
        }

        let Some(decision) = shared.on_disconnect(generation) else {
            return;
        };
        match decision {
            RetryDecision::Exhausted { attempts } => {
                error!(attempts, "max reconnection attempts reached");
                shared.notifier.notify(Notice::ReconnectExhausted);
                return;
            }
            RetryDecision::Retry { attempt, delay } => {
                info!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "reconnecting to realtime channel"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    () = tokio::time::sleep(delay) => {}
                }
                if !shared.transition(generation, ConnectionState::Connecting) {
                    return;
                }
            }
        }
    }
}

async fn run_connection(
    shared: &Shared,
    url: &Url,
    generation: u64,
    cancel: &CancellationToken,
) -> SessionEnd {
    let opened = tokio::select! {
        biased;
        () = cancel.cancelled() => return SessionEnd::Cancelled,
        result = shared.transport.open(url) => result,
    };
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(e) => return SessionEnd::Failed(e),
    };
    if !shared.mark_open(generation) {
        conn.close().await;
        return SessionEnd::Cancelled;
    }
    info!("realtime connection established");

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            message = conn.recv() => Some(message),
        };
        match next {
            None => {
                conn.close().await;
                return SessionEnd::Cancelled;
            }
            Some(Some(Ok(text))) => shared.handle_raw_message(&text),
            Some(Some(Err(e))) => return SessionEnd::Failed(e),
            Some(None) => return SessionEnd::Closed,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
