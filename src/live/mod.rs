//! Live streaming session transport
//!
//! WebSocket client for the bidirectional audio API and the wire types the
//! session consumes.

mod client;
pub mod types;

pub use client::{LiveConfig, LiveConnection, LiveEvent, LiveInputSender};
