//! Unifies the plaintext and Noise frame helpers behind one enum so
//! `esphome-core::Connection` can be generic over the socket type without
//! caring which framing a given client negotiated.

use std::io::{Read, Write};

use crate::error::Result;
use crate::noise::NoiseFrameHelper;
use crate::plaintext::PlaintextFrameHelper;

pub enum FrameTransport<S> {
    Plaintext(PlaintextFrameHelper<S>),
    Noise(Box<NoiseFrameHelper<S>>),
}

impl<S: Read + Write> FrameTransport<S> {
    pub fn plaintext(socket: S) -> Self {
        FrameTransport::Plaintext(PlaintextFrameHelper::new(socket))
    }

    pub fn noise(socket: S, psk: [u8; 32], server_name: String, server_mac: String) -> Self {
        FrameTransport::Noise(Box::new(NoiseFrameHelper::new(
            socket,
            psk,
            server_name,
            server_mac,
        )))
    }

    pub fn frame_header_padding(&self) -> usize {
        match self {
            FrameTransport::Plaintext(h) => h.frame_header_padding(),
            FrameTransport::Noise(h) => h.frame_header_padding(),
        }
    }

    pub fn frame_footer_size(&self) -> usize {
        match self {
            FrameTransport::Plaintext(h) => h.frame_footer_size(),
            FrameTransport::Noise(h) => h.frame_footer_size(),
        }
    }

    pub fn can_write_without_blocking(&self) -> bool {
        match self {
            FrameTransport::Plaintext(h) => h.can_write_without_blocking(),
            FrameTransport::Noise(h) => h.can_write_without_blocking(),
        }
    }

    pub fn read_packet(&mut self) -> Result<Option<(u16, Vec<u8>)>> {
        match self {
            FrameTransport::Plaintext(h) => h.read_packet(),
            FrameTransport::Noise(h) => h.read_packet(),
        }
    }

    pub fn write_protobuf_packet(&mut self, msg_type: u16, payload: &[u8]) -> Result<()> {
        match self {
            FrameTransport::Plaintext(h) => h.write_protobuf_packet(msg_type, payload),
            FrameTransport::Noise(h) => h.write_protobuf_packet(msg_type, payload),
        }
    }

    pub fn write_protobuf_packets(&mut self, packets: &[(u16, &[u8])]) -> Result<()> {
        match self {
            FrameTransport::Plaintext(h) => h.write_protobuf_packets(packets),
            FrameTransport::Noise(h) => h.write_protobuf_packets(packets),
        }
    }

    pub fn close(&mut self) {
        match self {
            FrameTransport::Plaintext(h) => h.close(),
            FrameTransport::Noise(h) => h.close(),
        }
    }
}
