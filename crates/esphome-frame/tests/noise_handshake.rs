//! Drives a real Noise_NNpsk0 handshake against [`NoiseFrameHelper`] acting
//! as responder, with a hand-rolled initiator standing in for a real
//! ESPHome client (grounded on the wire format in
//! `examples/freezereagle-Pool-Controller/Tools/Rust/src/noise_connection.rs`).
//! Covers a clean handshake plus the MAC-failure disconnect path.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use esphome_frame::error::FrameError;
use esphome_frame::noise::NoiseFrameHelper;
use snow::{Builder, TransportState};

const PATTERN: &str = "Noise_NNpsk0_25519_ChaChaPoly_SHA256";

/// One direction of an in-memory duplex pipe; `WouldBlock` on an empty read,
/// same contract a non-blocking `TcpStream` gives the frame helpers.
#[derive(Clone)]
struct PipeEnd {
    inbound: Arc<Mutex<VecDeque<u8>>>,
    outbound: Arc<Mutex<VecDeque<u8>>>,
    write_calls: Arc<Mutex<usize>>,
}

impl Read for PipeEnd {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut inbound = self.inbound.lock().unwrap();
        if inbound.is_empty() {
            return Err(std::io::Error::from(std::io::ErrorKind::WouldBlock));
        }
        let n = inbound.len().min(buf.len());
        for slot in buf.iter_mut().take(n) {
            *slot = inbound.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl Write for PipeEnd {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        *self.write_calls.lock().unwrap() += 1;
        self.outbound.lock().unwrap().extend(buf.iter().copied());
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn duplex() -> (PipeEnd, PipeEnd) {
    let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
    let b_to_a = Arc::new(Mutex::new(VecDeque::new()));
    (
        PipeEnd {
            inbound: b_to_a.clone(),
            outbound: a_to_b.clone(),
            write_calls: Arc::new(Mutex::new(0)),
        },
        PipeEnd {
            inbound: a_to_b,
            outbound: b_to_a,
            write_calls: Arc::new(Mutex::new(0)),
        },
    )
}

fn write_frame(pipe: &mut PipeEnd, content: &[u8]) {
    let mut out = Vec::with_capacity(3 + content.len());
    out.push(0x01);
    out.extend_from_slice(&(content.len() as u16).to_be_bytes());
    out.extend_from_slice(content);
    pipe.write_all(&out).unwrap();
}

/// Blocks (via short sleeps) until one full `[0x01][BE16 len][content]`
/// frame is available, then returns its content.
fn read_frame_blocking(pipe: &mut PipeEnd) -> Vec<u8> {
    loop {
        {
            let mut inbound = pipe.inbound.lock().unwrap();
            if inbound.len() >= 3 {
                let len = u16::from_be_bytes([inbound[1], inbound[2]]) as usize;
                if inbound.len() >= 3 + len {
                    inbound.drain(..3);
                    return inbound.drain(..len).collect();
                }
            }
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Runs the initiator side of the handshake to completion on the calling
/// thread. Expected to run on a background thread while the responder is
/// driven concurrently, since both sides block waiting on each other.
fn client_handshake(client: &mut PipeEnd, psk: [u8; 32]) -> TransportState {
    let mut prologue = b"NoiseAPIInit".to_vec();

    // NOISE_HELLO marker: an empty frame, folded into the prologue exactly
    // as the responder folds in the client frame it reads.
    write_frame(client, &[]);
    prologue.extend_from_slice(&0u16.to_be_bytes());

    let mut handshake =
        Builder::new(PATTERN.parse().unwrap()).psk(0, &psk).prologue(&prologue).build_initiator().unwrap();

    let mut msg = vec![0u8; 256];
    let len = handshake.write_message(&[], &mut msg).unwrap();
    msg.truncate(len);
    let mut framed = vec![0x00u8];
    framed.extend_from_slice(&msg);
    write_frame(client, &framed);

    let _server_hello = read_frame_blocking(client);
    let resp = read_frame_blocking(client);
    assert_eq!(resp[0], 0x00, "handshake response must carry a success prefix");
    let mut payload = vec![0u8; 256];
    handshake.read_message(&resp[1..], &mut payload).unwrap();

    handshake.into_transport_mode().unwrap()
}

fn run_until_ready(server: &mut NoiseFrameHelper<PipeEnd>) {
    for _ in 0..2000 {
        if server.is_ready() {
            return;
        }
        match server.read_packet() {
            Ok(_) => {}
            Err(e) if e.is_would_block() => std::thread::sleep(Duration::from_millis(1)),
            Err(e) => panic!("handshake failed: {e}"),
        }
    }
    panic!("handshake did not complete in time");
}

fn handshake_pair(
    psk: [u8; 32],
) -> (NoiseFrameHelper<PipeEnd>, PipeEnd, TransportState, Arc<Mutex<usize>>) {
    let (mut client_end, server_end) = duplex();
    let client_for_thread = client_end.clone();
    let server_write_calls = server_end.write_calls.clone();
    let mut server = NoiseFrameHelper::new(server_end, psk, "device".into(), "aa:bb:cc:dd:ee:ff".into());

    let handle = std::thread::spawn(move || {
        let mut client_end = client_for_thread;
        client_handshake(&mut client_end, psk)
    });
    run_until_ready(&mut server);
    let transport = handle.join().expect("client handshake thread panicked");
    assert!(server.is_ready());

    (server, client_end, transport, server_write_calls)
}

#[test]
fn handshake_completes_and_carries_application_data() {
    let (mut server, _client_end, mut transport, _write_calls) = handshake_pair([7u8; 32]);

    let plaintext_payload = b"hello";
    let mut cleartext = Vec::new();
    cleartext.extend_from_slice(&1u16.to_be_bytes());
    cleartext.extend_from_slice(&(plaintext_payload.len() as u16).to_be_bytes());
    cleartext.extend_from_slice(plaintext_payload);
    let mut ciphertext = vec![0u8; cleartext.len() + 16];
    let n = transport.write_message(&cleartext, &mut ciphertext).unwrap();
    ciphertext.truncate(n);

    let mut client_end = _client_end;
    write_frame(&mut client_end, &ciphertext);

    let (msg_type, payload) = server.read_packet().unwrap().expect("message should be available");
    assert_eq!(msg_type, 1);
    assert_eq!(payload, plaintext_payload);
}

/// S5: a flipped MAC byte must fail decryption, never reach the dispatcher,
/// and leave the helper permanently closed.
#[test]
fn flipped_mac_byte_is_rejected_and_closes() {
    let (mut server, mut client_end, mut transport, _write_calls) = handshake_pair([9u8; 32]);

    let mut cleartext = Vec::new();
    cleartext.extend_from_slice(&1u16.to_be_bytes());
    cleartext.extend_from_slice(&0u16.to_be_bytes());
    let mut ciphertext = vec![0u8; cleartext.len() + 16];
    let n = transport.write_message(&cleartext, &mut ciphertext).unwrap();
    ciphertext.truncate(n);

    let last = ciphertext.len() - 1;
    ciphertext[last] ^= 0xFF;
    write_frame(&mut client_end, &ciphertext);

    let err = server.read_packet().expect_err("corrupted MAC must be rejected");
    assert_eq!(err, FrameError::CipherStateDecryptFailed);

    let err2 = server.read_packet().expect_err("helper must stay failed after a MAC error");
    assert_eq!(err2, FrameError::BadState);
}

/// A multi-item batch must produce exactly one socket write, matching the
/// plaintext frame helper's batching and the single-`writev`-per-batch
/// property the rest of the stack relies on.
#[test]
fn multi_item_batch_issues_a_single_socket_write() {
    let (mut server, _client_end, _transport, write_calls) = handshake_pair([3u8; 32]);

    *write_calls.lock().unwrap() = 0;
    server
        .write_protobuf_packets(&[(1, b"one".as_slice()), (2, b"two".as_slice()), (3, b"three".as_slice())])
        .unwrap();

    assert_eq!(*write_calls.lock().unwrap(), 1);
}
