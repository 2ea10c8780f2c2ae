//! Connection-layer errors: failures from the codec or frame helper plus
//! state-machine violations the dispatch table itself detects.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("message type {msg_type} rejected before HelloReceived")]
    NotHelloReceived { msg_type: u16 },

    #[error("message type {msg_type} rejected before Authenticated")]
    NotAuthenticated { msg_type: u16 },

    #[error("handshake not completed within {elapsed:?}")]
    HelloTimeout { elapsed: Duration },

    #[error("idle for {elapsed:?}, exceeding keepalive disconnect window")]
    KeepaliveTimeout { elapsed: Duration },

    #[error("frame helper error: {0}")]
    Frame(#[from] esphome_frame::FrameError),

    #[error("protocol decode error: {0}")]
    Proto(#[from] esphome_proto::ProtoError),

    #[error("invalid noise PSK: {reason}")]
    InvalidPsk { reason: String },
}

impl ConnectionError {
    /// Whether the connection should simply close, vs. being worth
    /// surfacing as a warning-level log (mirrors the transient/fatal split
    /// the frame layer already makes for socket errors).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConnectionError::Frame(e) if e.is_would_block())
    }
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
