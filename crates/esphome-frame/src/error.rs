//! Frame-helper error taxonomy, pinned to the original implementation's
//! `APIError` naming so log lines read identically across ports.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("would block")]
    WouldBlock,
    #[error("bad handshake packet length")]
    BadHandshakePacketLen,
    #[error("bad frame indicator byte")]
    BadIndicator,
    #[error("bad data packet")]
    BadDataPacket,
    #[error("TCP_NODELAY failed")]
    TcpNodelayFailed,
    #[error("setting socket non-blocking failed")]
    TcpNonblockingFailed,
    #[error("close failed")]
    CloseFailed,
    #[error("shutdown failed")]
    ShutdownFailed,
    #[error("frame helper in bad state for this operation")]
    BadState,
    #[error("bad argument")]
    BadArg,
    #[error("socket read failed")]
    SocketReadFailed,
    #[error("socket write failed")]
    SocketWriteFailed,
    #[error("noise handshake state read failed")]
    HandshakeStateReadFailed,
    #[error("noise handshake state write failed")]
    HandshakeStateWriteFailed,
    #[error("noise handshake state in bad state")]
    HandshakeStateBadState,
    #[error("noise cipher state decrypt failed")]
    CipherStateDecryptFailed,
    #[error("noise cipher state encrypt failed")]
    CipherStateEncryptFailed,
    #[error("out of memory")]
    OutOfMemory,
    #[error("noise handshake setup failed")]
    HandshakeStateSetupFailed,
    #[error("noise handshake split failed")]
    HandshakeStateSplitFailed,
    #[error("bad handshake error byte")]
    BadHandshakeErrorByte,
    #[error("connection closed")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether this error is expected during normal non-blocking operation
    /// and should not be logged as a failure.
    pub fn is_would_block(self) -> bool {
        matches!(self, FrameError::WouldBlock)
    }

    /// Whether this error is fatal to the connection (anything but
    /// would-block is; kept as a named predicate for call sites that want
    /// to express intent rather than match on `!= WouldBlock`).
    pub fn is_fatal(self) -> bool {
        !self.is_would_block()
    }
}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::WouldBlock => FrameError::WouldBlock,
            ErrorKind::ConnectionReset | ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe => {
                FrameError::ConnectionClosed
            }
            _ => FrameError::SocketReadFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
