//! Handler registration and isolated dispatch.
//!
//! Handlers are keyed by [`FrameKind`]. A handler's identity is its `Arc`
//! allocation, so registering the same `Arc` twice is a no-op and removal
//! needs a clone of the registered `Arc`.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, warn};
use wedear_core::{FrameKind, FramePayload, InboundFrame};

/// Error a handler may return; logged and otherwise ignored.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A callback invoked with the payload of every frame of its kind.
pub type MessageHandler = Arc<dyn Fn(&FramePayload) -> Result<(), HandlerError> + Send + Sync>;

/// Wrap a closure as a [`MessageHandler`].
pub fn message_handler<F>(f: F) -> MessageHandler
where
    F: Fn(&FramePayload) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Outcome of dispatching one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned `Err` or panicked.
    pub failed: usize,
}

/// Frame kind → set of handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<FrameKind, Vec<MessageHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. Returns `false` if it was already registered.
    pub fn add(&mut self, kind: FrameKind, handler: MessageHandler) -> bool {
        let set = self.handlers.entry(kind).or_default();
        if set.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            return false;
        }
        set.push(handler);
        true
    }

    /// Unregister `handler` from `kind`. Returns `false` if it was not registered.
    pub fn remove(&mut self, kind: &FrameKind, handler: &MessageHandler) -> bool {
        let Some(set) = self.handlers.get_mut(kind) else {
            return false;
        };
        let before = set.len();
        set.retain(|h| !Arc::ptr_eq(h, handler));
        let removed = set.len() != before;
        if set.is_empty() {
            let _ = self.handlers.remove(kind);
        }
        removed
    }

    /// Snapshot of the handlers registered for `kind`.
    pub fn handlers_for(&self, kind: &FrameKind) -> Vec<MessageHandler> {
        self.handlers.get(kind).cloned().unwrap_or_default()
    }

    /// Number of handlers registered for `kind`.
    pub fn count(&self, kind: &FrameKind) -> usize {
        self.handlers.get(kind).map_or(0, Vec::len)
    }

    /// Whether no handlers are registered at all.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Invoke every handler with the frame's payload.
///
/// Each call is isolated: an `Err` or a panic is logged and the remaining
/// handlers still run.
pub fn invoke_all(handlers: &[MessageHandler], frame: &InboundFrame) -> DispatchReport {
    let mut report = DispatchReport::default();
    for handler in handlers {
        match panic::catch_unwind(AssertUnwindSafe(|| handler(&frame.payload))) {
            Ok(Ok(())) => report.delivered += 1,
            Ok(Err(err)) => {
                report.failed += 1;
                warn!(kind = %frame.kind(), error = %err, "message handler failed");
            }
            Err(panic) => {
                report.failed += 1;
                error!(
                    kind = %frame.kind(),
                    panic = panic_message(panic.as_ref()),
                    "message handler panicked"
                );
            }
        }
    }
    report
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
