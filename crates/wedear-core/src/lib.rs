//! # wedear-core
//!
//! Foundation types shared by the wedear realtime client:
//!
//! - [`frame`]: the inbound wire frame (`type` / `action` / `payload`) and its
//!   newline-delimited batch decoding
//! - [`payload`]: strongly-typed payload shapes for each frame kind
//! - [`session`]: the read-only session collaborator contract
//! - [`errors`]: frame decoding errors

#![deny(unsafe_code)]

pub mod errors;
pub mod frame;
pub mod payload;
pub mod session;

pub use errors::FrameDecodeError;
pub use frame::{FrameAction, FrameKind, FramePayload, InboundFrame, split_batch};
pub use session::{SessionSource, StaticSession};
