//! User-facing error notices.
//!
//! The client reports failures the user should see through a [`Notifier`].
//! What "seeing" means is up to the host: a toast, a status line, or simply a
//! log record as with [`TracingNotifier`].

use std::fmt;

/// A user-visible failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The transport reported an error.
    ConnectionError,
    /// The retry budget is spent; no further automatic attempts.
    ReconnectExhausted,
}

impl Notice {
    /// Text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::ConnectionError => "realtime connection error",
            Self::ReconnectExhausted => "realtime connection failed, please refresh and try again",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Fire-and-forget sink for user-visible errors.
pub trait Notifier: Send + Sync {
    /// Show a notice. Must not block.
    fn notify(&self, notice: Notice);
}

/// Notifier that emits notices as `error` records on the `wedear::notify` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::error!(target: "wedear::notify", ?notice, "{}", notice.message());
    }
}
