//! Accept loop and per-connection runtime.
//!
//! Tokio drives the accept loop and owns one blocking OS thread per
//! connection (`spawn_blocking`); each thread runs a tight, non-blocking
//! poll of its socket and the [`Connection`] state machine inside it,
//! mirroring the device firmware's single cooperative loop rather than an
//! async-per-byte state machine. `esphome-core` itself never touches a
//! socket; this module is where its actions become bytes on the wire.

use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use esphome_core::connection::{Connection, ConnectionAction, DeviceIdentity};
use esphome_core::env::Environment;
use esphome_core::passthrough::GlobalSubscriptions;
use esphome_frame::FrameTransport;
use tokio::net::TcpListener;

use crate::entity_registry::EntityRegistry;
use crate::system_env::SystemEnv;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub identity: DeviceIdentity,
    pub password: Option<String>,
    /// `Some` makes every connection negotiate Noise with this PSK; `None`
    /// serves plaintext frames only.
    pub psk: Option<[u8; 32]>,
    pub batch_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:6053".to_string(),
            identity: DeviceIdentity::default(),
            password: None,
            psk: None,
            batch_delay: Duration::from_millis(100),
        }
    }
}

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    registry: Arc<EntityRegistry>,
    psk_store: Arc<Mutex<Option<[u8; 32]>>>,
    pass_through: Arc<GlobalSubscriptions>,
    next_connection_id: Arc<AtomicU64>,
    env: SystemEnv,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(&config.bind_address).await.map_err(|source| ServerError::Bind {
                addr: config.bind_address.clone(),
                source,
            })?;
        Ok(Self {
            psk_store: Arc::new(Mutex::new(config.psk)),
            config: Arc::new(config),
            listener,
            registry: Arc::new(EntityRegistry::demo()),
            pass_through: Arc::new(GlobalSubscriptions::new()),
            next_connection_id: Arc::new(AtomicU64::new(1)),
            env: SystemEnv::new(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process is killed. Each connection
    /// runs on its own blocking thread so a slow or stalled client never
    /// starves the others.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("accept failed: {e}");
                    continue;
                }
            };
            tracing::info!(%peer, "client connected");

            let config = Arc::clone(&self.config);
            let registry = Arc::clone(&self.registry);
            let psk_store = Arc::clone(&self.psk_store);
            let pass_through = Arc::clone(&self.pass_through);
            let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
            let env = self.env;

            let std_stream = match stream.into_std() {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(%peer, "failed to convert socket: {e}");
                    continue;
                }
            };

            tokio::task::spawn_blocking(move || {
                if let Err(e) =
                    handle_connection(std_stream, connection_id, config, registry, psk_store, pass_through, env)
                {
                    tracing::debug!(%peer, "connection ended: {e}");
                }
            });
        }
    }
}

fn handle_connection(
    stream: TcpStream,
    connection_id: u64,
    config: Arc<ServerConfig>,
    registry: Arc<EntityRegistry>,
    psk_store: Arc<Mutex<Option<[u8; 32]>>>,
    pass_through: Arc<GlobalSubscriptions>,
    env: SystemEnv,
) -> std::io::Result<()> {
    stream.set_nonblocking(true)?;

    let initial_psk = *psk_store.lock().expect("psk mutex poisoned");
    let mut transport = match initial_psk {
        Some(psk) => FrameTransport::noise(
            stream,
            psk,
            config.identity.name.clone(),
            config.identity.mac_address.clone(),
        ),
        None => FrameTransport::plaintext(stream),
    };

    let mut conn = Connection::new(
        connection_id,
        env.now(),
        config.identity.clone(),
        config.password.clone(),
        config.batch_delay,
    );

    loop {
        match transport.read_packet() {
            Ok(Some((msg_type, payload))) => {
                let actions = conn.handle_frame(env.now(), msg_type, &payload, registry.as_ref());
                if !execute_actions(&mut transport, &mut conn, actions, &registry, &psk_store, &pass_through) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) if e.is_would_block() => {}
            Err(e) => {
                tracing::debug!("frame error: {e}");
                break;
            }
        }

        let can_write = transport.can_write_without_blocking();
        let actions = conn.tick(
            env.now(),
            can_write,
            transport.frame_header_padding(),
            transport.frame_footer_size(),
            registry.as_ref(),
        );
        if !execute_actions(&mut transport, &mut conn, actions, &registry, &psk_store, &pass_through) {
            break;
        }
        if conn.should_remove() {
            break;
        }

        std::thread::sleep(POLL_INTERVAL);
    }

    transport.close();
    Ok(())
}

/// Executes one round of actions, returning `false` if the connection
/// should be torn down.
fn execute_actions<S: std::io::Read + std::io::Write>(
    transport: &mut FrameTransport<S>,
    conn: &mut Connection<<SystemEnv as Environment>::Instant>,
    actions: Vec<ConnectionAction>,
    registry: &EntityRegistry,
    psk_store: &Mutex<Option<[u8; 32]>>,
    pass_through: &GlobalSubscriptions,
) -> bool {
    let connection_id = conn.id();
    for action in actions {
        match action {
            ConnectionAction::Send { msg_type, payload } => {
                if let Err(e) = transport.write_protobuf_packet(msg_type, &payload) {
                    tracing::debug!("write failed: {e}");
                    return false;
                }
            }
            ConnectionAction::SendBatch { buffer, packets } => {
                let slices: Vec<(u16, &[u8])> = packets
                    .iter()
                    .map(|&(msg_type, start, len)| (msg_type, &buffer[start..start + len]))
                    .collect();
                if let Err(e) = transport.write_protobuf_packets(&slices) {
                    tracing::debug!("batched write failed: {e}");
                    return false;
                }
            }
            ConnectionAction::Command { key, command } => {
                if !registry.apply_command(key, &command) {
                    tracing::debug!(key, "command targeted unknown entity");
                }
            }
            ConnectionAction::PersistPsk { key } => {
                let mut new_psk = [0u8; 32];
                new_psk.copy_from_slice(&key);
                *psk_store.lock().expect("psk mutex poisoned") = Some(new_psk);
                let follow_up = conn.complete_psk_update(true);
                if !execute_actions(transport, conn, follow_up, registry, psk_store, pass_through) {
                    return false;
                }
            }
            ConnectionAction::ClaimPassThrough { channel } => {
                pass_through.subscribe(channel, connection_id);
            }
            ConnectionAction::ReleasePassThrough { channel } => {
                pass_through.release(channel, connection_id);
            }
            ConnectionAction::Forward { msg_type, payload } => {
                tracing::debug!(
                    msg_type,
                    len = payload.len(),
                    "forwarded pass-through message (no external collaborator wired)"
                );
            }
            ConnectionAction::Close => return false,
        }
    }
    true
}
