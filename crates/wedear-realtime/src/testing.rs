//! Scripted transport and recording notifier for client tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use url::Url;

use crate::errors::TransportError;
use crate::notify::{Notice, Notifier};
use crate::transport::{Connection, Transport};

type Inbox = mpsc::UnboundedReceiver<Result<String, TransportError>>;

/// Sender side of a scripted connection. Dropping it closes the connection.
pub(crate) type ServerSide = mpsc::UnboundedSender<Result<String, TransportError>>;

enum Step {
    Fail,
    Accept(Inbox),
}

#[derive(Default)]
struct Script {
    steps: Mutex<VecDeque<Step>>,
    urls: Mutex<Vec<Url>>,
    closes: Arc<AtomicUsize>,
}

/// Transport that plays back queued outcomes. Once the queue is empty every
/// open fails.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Script>,
}

impl ScriptedTransport {
    pub(crate) fn push_failure(&self) {
        self.script.steps.lock().push_back(Step::Fail);
    }

    pub(crate) fn push_accept(&self) -> ServerSide {
        let (tx, rx) = mpsc::unbounded_channel();
        self.script.steps.lock().push_back(Step::Accept(rx));
        tx
    }

    pub(crate) fn open_count(&self) -> usize {
        self.script.urls.lock().len()
    }

    pub(crate) fn urls(&self) -> Vec<Url> {
        self.script.urls.lock().clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.script.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, url: &Url) -> Result<Box<dyn Connection>, TransportError> {
        self.script.urls.lock().push(url.clone());
        let step = self.script.steps.lock().pop_front().unwrap_or(Step::Fail);
        match step {
            Step::Fail => Err(TransportError::Handshake {
                url: url.to_string(),
                reason: "connection refused".into(),
            }),
            Step::Accept(inbox) => Ok(Box::new(ScriptedConnection {
                inbox,
                closes: Arc::clone(&self.script.closes),
            })),
        }
    }
}

struct ScriptedConnection {
    inbox: Inbox,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        self.inbox.recv().await
    }

    async fn close(&mut self) {
        let _ = self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier that remembers every notice.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub(crate) fn count(&self, notice: Notice) -> usize {
        self.notices.lock().iter().filter(|n| **n == notice).count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
