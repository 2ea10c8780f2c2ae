//! Noise_NNpsk0 frame helper: handshake responder plus
//! `[0x01][BE16 len][encrypted(type,len,payload)+mac]` data framing.
//!
//! Wire-level layout (client hello, server hello, and the MAC-footer
//! sizing) is grounded on a real ESPHome Noise client implementation
//! (`examples/freezereagle-Pool-Controller/Tools/Rust/src/noise_connection.rs`),
//! adapted here to the responder role the device side plays.

use std::io::{Read, Write};

use snow::{Builder, HandshakeState, TransportState};

use crate::error::{FrameError, Result};
use crate::txqueue::TxQueue;

const NOISE_PATTERN: &str = "Noise_NNpsk0_25519_ChaChaPoly_SHA256";
const MAC_LEN: usize = 16;
/// indicator(1) + BE16 length(2) + cleartext type(2) + cleartext len(2).
pub const HEADER_PADDING: usize = 7;

enum State {
    AwaitingClientHello,
    Handshaking(HandshakeState),
    Data { send: TransportState, recv: TransportState },
    Failed,
}

pub struct NoiseFrameHelper<S> {
    socket: S,
    rx_buf: Vec<u8>,
    tx: TxQueue,
    psk: [u8; 32],
    server_name: String,
    server_mac: String,
    prologue: Vec<u8>,
    state: State,
}

impl<S: Read + Write> NoiseFrameHelper<S> {
    pub fn new(socket: S, psk: [u8; 32], server_name: String, server_mac: String) -> Self {
        Self {
            socket,
            rx_buf: Vec::new(),
            tx: TxQueue::new(),
            psk,
            server_name,
            server_mac,
            prologue: b"NoiseAPIInit".to_vec(),
            state: State::AwaitingClientHello,
        }
    }

    pub fn frame_header_padding(&self) -> usize {
        HEADER_PADDING
    }

    pub fn frame_footer_size(&self) -> usize {
        MAC_LEN
    }

    pub fn can_write_without_blocking(&self) -> bool {
        matches!(self.state, State::Data { .. }) && self.tx.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Data { .. })
    }

    pub fn close(&mut self) {
        self.state = State::Failed;
    }

    /// Reads raw bytes from the socket into `rx_buf`; would-block is not
    /// an error, a zero-length read is fatal.
    fn fill_rx_buf(&mut self) -> Result<()> {
        let mut chunk = [0u8; 4096];
        match self.socket.read(&mut chunk) {
            Ok(0) => Err(FrameError::ConnectionClosed),
            Ok(n) => {
                self.rx_buf.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(err) => {
                let frame_err: FrameError = err.into();
                if frame_err.is_would_block() {
                    Ok(())
                } else {
                    Err(frame_err)
                }
            }
        }
    }

    /// Pulls one complete `[0x01][BE16 len][content]` frame out of `rx_buf`,
    /// if fully buffered.
    fn take_frame(&mut self) -> Option<Vec<u8>> {
        if self.rx_buf.len() < 3 {
            return None;
        }
        if self.rx_buf[0] != 0x01 {
            return None;
        }
        let len = u16::from_be_bytes([self.rx_buf[1], self.rx_buf[2]]) as usize;
        if self.rx_buf.len() < 3 + len {
            return None;
        }
        let content = self.rx_buf[3..3 + len].to_vec();
        self.rx_buf.drain(..3 + len);
        Some(content)
    }

    fn write_frame(&mut self, content: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(3 + content.len());
        buf.push(0x01);
        buf.extend_from_slice(&(content.len() as u16).to_be_bytes());
        buf.extend_from_slice(content);
        self.tx.push(buf);
        self.tx.flush(&mut self.socket)
    }

    fn send_handshake_error(&mut self, reason: &str) -> Result<()> {
        let mut content = vec![0x01u8];
        content.extend_from_slice(reason.as_bytes());
        let _ = self.write_frame(&content);
        self.state = State::Failed;
        Err(FrameError::HandshakeStateWriteFailed)
    }

    fn send_server_hello(&mut self) -> Result<()> {
        let mut hello = vec![0x01u8];
        hello.extend_from_slice(self.server_name.as_bytes());
        hello.push(0);
        hello.extend_from_slice(self.server_mac.as_bytes());
        hello.push(0);
        self.prologue.extend_from_slice(&hello);
        self.write_frame(&hello)
    }

    fn build_handshake(&mut self) -> Result<HandshakeState> {
        let params = NOISE_PATTERN
            .parse()
            .map_err(|_| FrameError::HandshakeStateSetupFailed)?;
        Builder::new(params)
            .psk(0, &self.psk)
            .prologue(&self.prologue)
            .build_responder()
            .map_err(|_| FrameError::HandshakeStateSetupFailed)
    }

    /// Drives the handshake and, once ready, decodes one application
    /// message. Returns `Ok(None)` if more bytes are needed.
    pub fn read_packet(&mut self) -> Result<Option<(u16, Vec<u8>)>> {
        self.fill_rx_buf()?;
        loop {
            match std::mem::replace(&mut self.state, State::Failed) {
                State::Failed => return Err(FrameError::BadState),
                State::AwaitingClientHello => {
                    let Some(content) = self.take_frame() else {
                        self.state = State::AwaitingClientHello;
                        return Ok(None);
                    };
                    self.prologue
                        .extend_from_slice(&(content.len() as u16).to_be_bytes());
                    self.prologue.extend_from_slice(&content);
                    self.send_server_hello()?;
                    let hs = match self.build_handshake() {
                        Ok(hs) => hs,
                        Err(e) => return self.send_handshake_error(&e.to_string()).map(|_| None),
                    };
                    self.state = State::Handshaking(hs);
                }
                State::Handshaking(mut hs) => {
                    if hs.is_handshake_finished() {
                        let (send, recv) = match hs.into_transport_mode() {
                            Ok(t) => t,
                            Err(_) => {
                                return self
                                    .send_handshake_error("split failed")
                                    .map(|_| None)
                            }
                        };
                        self.state = State::Data { send, recv };
                        continue;
                    }
                    if hs.is_my_turn() {
                        let mut out = vec![0u8; 512];
                        let len = match hs.write_message(&[], &mut out) {
                            Ok(n) => n,
                            Err(_) => {
                                return self
                                    .send_handshake_error("write failed")
                                    .map(|_| None)
                            }
                        };
                        out.truncate(len);
                        let mut framed = Vec::with_capacity(1 + out.len());
                        framed.push(0x00);
                        framed.extend_from_slice(&out);
                        let finished = hs.is_handshake_finished();
                        self.write_frame(&framed)?;
                        self.state = State::Handshaking(hs);
                        if finished {
                            continue;
                        }
                        if self.rx_buf.is_empty() {
                            return Ok(None);
                        }
                    } else {
                        let Some(content) = self.take_frame() else {
                            self.state = State::Handshaking(hs);
                            return Ok(None);
                        };
                        let Some((&status, message)) = content.split_first() else {
                            return self
                                .send_handshake_error("empty handshake frame")
                                .map(|_| None);
                        };
                        if status != 0x00 {
                            self.state = State::Failed;
                            return Err(FrameError::BadHandshakeErrorByte);
                        }
                        let mut out = vec![0u8; 512];
                        let n = match hs.read_message(message, &mut out) {
                            Ok(n) => n,
                            Err(_) => {
                                return self
                                    .send_handshake_error("bad handshake message")
                                    .map(|_| None)
                            }
                        };
                        out.truncate(n);
                        self.state = State::Handshaking(hs);
                    }
                }
                State::Data { mut send, mut recv } => {
                    let Some(content) = self.take_frame() else {
                        self.state = State::Data { send, recv };
                        return Ok(None);
                    };
                    let mut out = vec![0u8; content.len()];
                    let n = match recv.read_message(&content, &mut out) {
                        Ok(n) => n,
                        Err(_) => {
                            self.state = State::Failed;
                            return Err(FrameError::CipherStateDecryptFailed);
                        }
                    };
                    out.truncate(n);
                    if out.len() < 4 {
                        self.state = State::Failed;
                        return Err(FrameError::BadDataPacket);
                    }
                    let msg_type = u16::from_be_bytes([out[0], out[1]]);
                    let payload_len = u16::from_be_bytes([out[2], out[3]]) as usize;
                    if out.len() < 4 + payload_len {
                        self.state = State::Failed;
                        return Err(FrameError::BadDataPacket);
                    }
                    let payload = out[4..4 + payload_len].to_vec();
                    self.state = State::Data { send, recv };
                    return Ok(Some((msg_type, payload)));
                }
            }
        }
    }

    /// Encrypts and queues one application message.
    pub fn write_protobuf_packet(&mut self, msg_type: u16, payload: &[u8]) -> Result<()> {
        self.write_protobuf_packets(&[(msg_type, payload)])
    }

    /// Encrypts every packet and appends each resulting frame to one shared
    /// buffer before queuing and flushing it, so an N-item batch produces a
    /// single `writev` instead of N separate socket writes (mirrors
    /// `PlaintextFrameHelper::write_protobuf_packets`).
    pub fn write_protobuf_packets(&mut self, packets: &[(u16, &[u8])]) -> Result<()> {
        let State::Data { send, .. } = &mut self.state else {
            return Err(FrameError::BadState);
        };
        let mut buf = Vec::new();
        for (msg_type, payload) in packets {
            let mut cleartext = Vec::with_capacity(4 + payload.len());
            cleartext.extend_from_slice(&msg_type.to_be_bytes());
            cleartext.extend_from_slice(&(payload.len() as u16).to_be_bytes());
            cleartext.extend_from_slice(payload);
            let mut ciphertext = vec![0u8; cleartext.len() + MAC_LEN];
            let n = send
                .write_message(&cleartext, &mut ciphertext)
                .map_err(|_| FrameError::CipherStateEncryptFailed)?;
            ciphertext.truncate(n);
            buf.push(0x01);
            buf.extend_from_slice(&(ciphertext.len() as u16).to_be_bytes());
            buf.extend_from_slice(&ciphertext);
        }
        self.tx.push(buf);
        self.tx.flush(&mut self.socket)
    }
}

/// Size of the encoded, encrypted frame for a payload of `payload_len`
/// bytes, used by the batch pre-reservation math.
pub fn encoded_frame_len(payload_len: usize) -> usize {
    3 + 4 + payload_len + MAC_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_len_accounts_for_header_and_mac() {
        assert_eq!(encoded_frame_len(10), 3 + 4 + 10 + 16);
    }
}
