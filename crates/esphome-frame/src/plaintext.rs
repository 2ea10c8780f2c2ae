//! Plaintext frame helper: `[0x00][varint length][varint type][payload]`.
//!
//! Used when no PSK is configured. No encryption, no handshake: `init()`
//! just configures the socket and the helper is immediately in the DATA
//! state.

use std::io::{Read, Write};

use esphome_proto::varint::{read_varint, varint_size, write_varint};
use esphome_proto::ProtoError;

use crate::error::{FrameError, Result};
use crate::txqueue::TxQueue;

/// Maximum plaintext header size: 1 indicator byte + up to 3 length bytes
/// (length is capped at 65535) + up to 2 type bytes. Reserved up front so
/// the header can be written in place once the payload is known.
pub const HEADER_PADDING: usize = 6;
const MAX_PAYLOAD_LEN: usize = 65535;

pub struct PlaintextFrameHelper<S> {
    socket: S,
    rx_buf: Vec<u8>,
    tx: TxQueue,
    failed: bool,
}

impl<S: Read + Write> PlaintextFrameHelper<S> {
    pub fn new(socket: S) -> Self {
        Self {
            socket,
            rx_buf: Vec::new(),
            tx: TxQueue::new(),
            failed: false,
        }
    }

    pub fn frame_header_padding(&self) -> usize {
        HEADER_PADDING
    }

    pub fn frame_footer_size(&self) -> usize {
        0
    }

    pub fn can_write_without_blocking(&self) -> bool {
        !self.failed && self.tx.is_empty()
    }

    /// Flushes any queued bytes; a no-op beyond draining the TX queue since
    /// the plaintext helper has no handshake state to advance.
    pub fn run_loop(&mut self) -> Result<()> {
        if self.failed {
            return Err(FrameError::BadState);
        }
        self.tx.flush(&mut self.socket)
    }

    /// Reads at most one complete frame. Returns `Ok(None)` on would-block
    /// or an incomplete frame still buffering; never returns a partial
    /// frame.
    pub fn read_packet(&mut self) -> Result<Option<(u16, Vec<u8>)>> {
        if self.failed {
            return Err(FrameError::BadState);
        }
        self.fill_rx_buf()?;
        self.try_parse_frame()
    }

    fn fill_rx_buf(&mut self) -> Result<()> {
        let mut chunk = [0u8; 4096];
        match self.socket.read(&mut chunk) {
            Ok(0) => {
                self.failed = true;
                Err(FrameError::ConnectionClosed)
            }
            Ok(n) => {
                self.rx_buf.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(err) => {
                let frame_err: FrameError = err.into();
                if frame_err.is_would_block() {
                    Ok(())
                } else {
                    self.failed = true;
                    Err(frame_err)
                }
            }
        }
    }

    fn try_parse_frame(&mut self) -> Result<Option<(u16, Vec<u8>)>> {
        if self.rx_buf.is_empty() {
            return Ok(None);
        }
        if self.rx_buf[0] != 0x00 {
            self.failed = true;
            return Err(FrameError::BadIndicator);
        }
        let rest = &self.rx_buf[1..];

        let (len, len_consumed) = match read_varint(rest) {
            Ok(v) => v,
            Err(ProtoError::TruncatedVarint { .. }) => return Ok(None),
            Err(_) => {
                self.failed = true;
                return Err(FrameError::BadHandshakePacketLen);
            }
        };
        if len as usize > MAX_PAYLOAD_LEN {
            self.failed = true;
            return Err(FrameError::BadHandshakePacketLen);
        }
        let rest = &rest[len_consumed..];

        let (msg_type, type_consumed) = match read_varint(rest) {
            Ok(v) => v,
            Err(ProtoError::TruncatedVarint { .. }) => return Ok(None),
            Err(_) => {
                self.failed = true;
                return Err(FrameError::BadDataPacket);
            }
        };

        let header_len = 1 + len_consumed + type_consumed;
        let total_len = header_len + len as usize;
        if self.rx_buf.len() < total_len {
            return Ok(None);
        }

        let payload = self.rx_buf[header_len..total_len].to_vec();
        self.rx_buf.drain(..total_len);
        Ok(Some((msg_type as u16, payload)))
    }

    /// Queues one message for sending. `payload` is the already-encoded
    /// message body.
    pub fn write_protobuf_packet(&mut self, msg_type: u16, payload: &[u8]) -> Result<()> {
        self.write_protobuf_packets(&[(msg_type, payload)])
    }

    /// Queues a batch of messages as a single contiguous buffer, matching
    /// the single-`writev`-equivalent contract the deferred batcher relies
    /// on.
    pub fn write_protobuf_packets(&mut self, packets: &[(u16, &[u8])]) -> Result<()> {
        if self.failed {
            return Err(FrameError::BadState);
        }
        let mut buf = Vec::new();
        for (msg_type, payload) in packets {
            if payload.len() > MAX_PAYLOAD_LEN {
                return Err(FrameError::BadArg);
            }
            buf.push(0x00);
            write_varint(payload.len() as u64, &mut buf);
            write_varint(u64::from(*msg_type), &mut buf);
            buf.extend_from_slice(payload);
        }
        self.tx.push(buf);
        self.tx.flush(&mut self.socket)
    }

    pub fn close(&mut self) {
        self.failed = true;
    }
}

/// Size of the encoded frame for a payload of `payload_len` bytes,
/// including the indicator byte. Used by the batch pre-reservation math.
pub fn encoded_frame_len(msg_type: u16, payload_len: usize) -> usize {
    1 + varint_size(payload_len as u64) + varint_size(u64::from(msg_type)) + payload_len
}
