//! End-to-end test of the accept loop over a real TCP socket: a plaintext
//! client drives Hello → Connect → ListEntities against a bound `Server`,
//! exercising the exact code path `main.rs` runs in production.

use std::time::Duration;

use esphome_proto::catalog;
use esphome_proto::messages::core::{ConnectRequest, ConnectResponse, HelloRequest, HelloResponse};
use esphome_proto::ProtoMessage;
use esphome_server::{Server, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn encode_plaintext_frame(msg_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x00];
    esphome_proto::varint::write_varint(payload.len() as u64, &mut out);
    esphome_proto::varint::write_varint(msg_type as u64, &mut out);
    out.extend_from_slice(payload);
    out
}

/// Reads one byte at a time since varints are self-delimiting and we don't
/// know the length up front; mirrors how the frame helper itself has to
/// read incrementally off a non-blocking socket.
async fn read_varint(stream: &mut TcpStream) -> u64 {
    let mut buf = Vec::new();
    loop {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).await.unwrap();
        let done = byte[0] & 0x80 == 0;
        buf.push(byte[0]);
        if done {
            break;
        }
    }
    let (value, _) = esphome_proto::varint::read_varint(&buf).unwrap();
    value
}

async fn read_plaintext_frame(stream: &mut TcpStream) -> (u16, Vec<u8>) {
    let mut indicator = [0u8; 1];
    stream.read_exact(&mut indicator).await.unwrap();
    assert_eq!(indicator[0], 0x00);
    let len = read_varint(stream).await as usize;
    let msg_type = read_varint(stream).await as u16;
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await.unwrap();
    (msg_type, payload)
}

#[tokio::test]
async fn hello_connect_and_list_entities_round_trip() {
    let config = ServerConfig { bind_address: "127.0.0.1:0".to_string(), ..ServerConfig::default() };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut hello_payload = Vec::new();
    HelloRequest { client_info: "test-client".into(), api_version_major: 1, api_version_minor: 10 }
        .encode(&mut hello_payload);
    stream.write_all(&encode_plaintext_frame(catalog::HELLO_REQUEST, &hello_payload)).await.unwrap();

    let (msg_type, payload) = read_plaintext_frame(&mut stream).await;
    assert_eq!(msg_type, catalog::HELLO_RESPONSE);
    let hello_response = HelloResponse::decode(&payload).unwrap();
    assert_eq!(hello_response.api_version_major, 1);

    let mut connect_payload = Vec::new();
    ConnectRequest { password: String::new() }.encode(&mut connect_payload);
    stream.write_all(&encode_plaintext_frame(catalog::CONNECT_REQUEST, &connect_payload)).await.unwrap();

    let (msg_type, payload) = read_plaintext_frame(&mut stream).await;
    assert_eq!(msg_type, catalog::CONNECT_RESPONSE);
    let connect_response = ConnectResponse::decode(&payload).unwrap();
    assert!(!connect_response.invalid_password);

    stream.write_all(&encode_plaintext_frame(catalog::LIST_ENTITIES_REQUEST, &[])).await.unwrap();

    // The demo registry has three entities; expect three ListEntities*
    // responses followed by ListEntitiesDoneResponse, in order.
    let mut seen_types = Vec::new();
    for _ in 0..4 {
        let (msg_type, _payload) =
            tokio::time::timeout(Duration::from_secs(2), read_plaintext_frame(&mut stream))
                .await
                .expect("timed out waiting for list-entities response");
        seen_types.push(msg_type);
    }
    assert_eq!(seen_types.last(), Some(&catalog::LIST_ENTITIES_DONE_RESPONSE));
    assert!(seen_types[..3].iter().all(|t| *t != catalog::LIST_ENTITIES_DONE_RESPONSE));
}
