//! # wedear-realtime
//!
//! The realtime message-delivery client.
//!
//! One [`RealtimeClient`] per process owns a single WebSocket connection to
//! the message server. Incoming physical messages are split into
//! newline-delimited frames, decoded, and routed to the handlers registered
//! for each frame kind. When the connection drops the client retries on a
//! fixed delay until its retry budget is spent.
//!
//! - [`client`]: connection lifecycle and the public API
//! - [`registry`]: handler registration and isolated dispatch
//! - [`reconnect`]: the bounded constant-delay retry policy
//! - [`transport`]: the transport abstraction and its `tokio-tungstenite` implementation
//! - [`notify`]: user-facing error notices
//! - [`endpoint`]: connection target construction

#![deny(unsafe_code)]

pub mod client;
pub mod endpoint;
pub mod errors;
pub mod notify;
pub mod reconnect;
pub mod registry;
pub mod state;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::RealtimeClient;
pub use errors::{RealtimeError, TransportError};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use reconnect::{ReconnectPolicy, RetryDecision};
pub use registry::{HandlerError, HandlerRegistry, MessageHandler, message_handler};
pub use state::ConnectionState;
pub use transport::{Connection, Transport, WsTransport};
