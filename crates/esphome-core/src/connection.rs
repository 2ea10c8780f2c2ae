//! Per-client connection state machine.
//!
//! Like `lockframe_core::connection::Connection`, this type is sans-IO: it
//! never touches a socket. It consumes decoded `(msg_type, payload)` pairs
//! and a `now: I` timestamp, and returns a list of [`ConnectionAction`]s for
//! an outer driver (`esphome-server`) to execute — sending frames,
//! persisting a rotated PSK, or tearing the connection down. This keeps the
//! dispatch table, keepalive timers, and batching logic testable without a
//! real socket or clock.

use std::ops::Sub;
use std::time::Duration;

use esphome_proto::catalog;
use esphome_proto::messages::core::{
    ConnectRequest, ConnectResponse, DeviceInfoResponse, DisconnectResponse, HelloRequest,
    HelloResponse, PingRequest, PingResponse,
};
use esphome_proto::messages::entities::{
    BinarySensorStateResponse, CoverCommandRequest, CoverStateResponse, LightCommandRequest,
    LightStateResponse, ListEntitiesBinarySensorResponse, ListEntitiesCoverResponse,
    ListEntitiesLightResponse, ListEntitiesSensorResponse, ListEntitiesSwitchResponse,
    SensorStateResponse, SwitchCommandRequest, SwitchStateResponse,
};
use esphome_proto::messages::logs::{SubscribeLogsRequest, SubscribeLogsResponse};
use esphome_proto::messages::noise::{NoiseEncryptionSetKeyRequest, NoiseEncryptionSetKeyResponse};
use esphome_proto::ProtoMessage;

use crate::batch::{Creator, DeferredBatch};
use crate::entity::{EntityId, EntityInfo, EntityKind, EntitySource, StateValue};
use crate::enumerator::{InitialStateEnumerator, ListEntitiesEnumerator};
use crate::error::ConnectionError;
use crate::passthrough::{
    is_bluetooth_message, is_home_assistant_message, is_voice_assistant_message, ConnectionId,
    PassThroughChannel,
};

pub const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);
pub const MAX_PING_RETRIES: u32 = 60;
pub const PING_RETRY_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_HELLO_TIMEOUT: Duration = Duration::from_secs(30);

fn disconnect_window() -> Duration {
    Duration::from_millis((KEEPALIVE_TIMEOUT.as_millis() as u64 * 5) / 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    AwaitingHello,
    HelloReceived,
    Authenticated,
    Closing,
}

/// A staged mutation for a writable entity, resolved by key and handed to
/// the external entity driver to actually perform. Connection only ever
/// resolves the target and forwards the "has_*"-guarded fields; it never
/// mutates entity state itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityCommand {
    Switch { state: bool },
    Light {
        has_state: bool,
        state: bool,
        has_brightness: bool,
        brightness: f32,
    },
    Cover { has_position: bool, position: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionAction {
    Send { msg_type: u16, payload: Vec<u8> },
    SendBatch { buffer: Vec<u8>, packets: Vec<(u16, usize, usize)> },
    Command { key: EntityId, command: EntityCommand },
    PersistPsk { key: Vec<u8> },
    /// Claims `channel` for this connection in the shared subscription
    /// registry, replacing whoever held it before.
    ClaimPassThrough { channel: PassThroughChannel },
    /// Releases `channel` in the shared subscription registry, a no-op if
    /// this connection is no longer the current holder.
    ReleasePassThrough { channel: PassThroughChannel },
    /// A Bluetooth/Voice-Assistant/HA-state message forwarded verbatim to
    /// the external "global" collaborator for that channel.
    Forward { msg_type: u16, payload: Vec<u8> },
    Close,
}

/// Identity fields a `DeviceInfoResponse` is built from; owned by the host
/// and handed to every Connection at construction since it never changes
/// per-connection.
#[derive(Debug, Clone, Default)]
pub struct DeviceIdentity {
    pub name: String,
    pub friendly_name: String,
    pub mac_address: String,
    pub esphome_version: String,
    pub compilation_time: String,
    pub model: String,
    pub manufacturer: String,
    pub project_name: String,
    pub project_version: String,
    pub suggested_area: String,
    pub api_encryption_supported: bool,
}

pub struct Connection<I> {
    id: ConnectionId,
    state: ConnectionState,
    identity: DeviceIdentity,
    password: Option<String>,
    hello_started_at: I,
    hello_timeout: Duration,
    last_traffic: I,
    ping_outstanding: bool,
    ping_retries: u32,
    last_ping_attempt: Option<I>,
    state_subscribed: bool,
    list_entities: Option<ListEntitiesEnumerator>,
    initial_state: Option<InitialStateEnumerator>,
    log_level: Option<i32>,
    batch: DeferredBatch<I>,
    removed: bool,
    subscribed_bluetooth: bool,
    subscribed_voice_assistant: bool,
    subscribed_home_assistant: bool,
}

impl<I: Copy + Sub<I, Output = Duration>> Connection<I> {
    pub fn new(
        id: ConnectionId,
        now: I,
        identity: DeviceIdentity,
        password: Option<String>,
        batch_delay: Duration,
    ) -> Self {
        Self {
            id,
            state: ConnectionState::AwaitingHello,
            identity,
            password,
            hello_started_at: now,
            hello_timeout: DEFAULT_HELLO_TIMEOUT,
            last_traffic: now,
            ping_outstanding: false,
            ping_retries: 0,
            last_ping_attempt: None,
            state_subscribed: false,
            list_entities: None,
            initial_state: None,
            log_level: None,
            batch: DeferredBatch::new(batch_delay),
            removed: false,
            subscribed_bluetooth: false,
            subscribed_voice_assistant: false,
            subscribed_home_assistant: false,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn should_remove(&self) -> bool {
        self.removed
    }

    fn close(&mut self) -> Vec<ConnectionAction> {
        self.state = ConnectionState::Closing;
        self.removed = true;
        let mut actions = Vec::new();
        if self.subscribed_bluetooth {
            self.subscribed_bluetooth = false;
            actions.push(ConnectionAction::ReleasePassThrough { channel: PassThroughChannel::Bluetooth });
        }
        if self.subscribed_voice_assistant {
            self.subscribed_voice_assistant = false;
            actions.push(ConnectionAction::ReleasePassThrough { channel: PassThroughChannel::VoiceAssistant });
        }
        if self.subscribed_home_assistant {
            self.subscribed_home_assistant = false;
            actions.push(ConnectionAction::ReleasePassThrough { channel: PassThroughChannel::HomeAssistant });
        }
        actions.push(ConnectionAction::Close);
        actions
    }

    /// Dispatches one decoded frame. `entities` resolves enumeration order
    /// and command targets; the connection never mutates it.
    pub fn handle_frame(
        &mut self,
        now: I,
        msg_type: u16,
        payload: &[u8],
        entities: &dyn EntitySource,
    ) -> Vec<ConnectionAction> {
        self.last_traffic = now;
        self.ping_outstanding = false;
        self.ping_retries = 0;

        if self.state == ConnectionState::AwaitingHello && msg_type != catalog::HELLO_REQUEST {
            tracing::debug!("{}", ConnectionError::NotHelloReceived { msg_type });
            return self.close();
        }
        if requires_authenticated(msg_type) && self.state != ConnectionState::Authenticated {
            tracing::debug!("{}", ConnectionError::NotAuthenticated { msg_type });
            return self.close();
        }

        match msg_type {
            catalog::HELLO_REQUEST => self.handle_hello(payload),
            catalog::CONNECT_REQUEST => self.handle_connect(payload),
            catalog::DISCONNECT_REQUEST => self.handle_disconnect(),
            catalog::DISCONNECT_RESPONSE => self.close(),
            catalog::PING_REQUEST => vec![send(catalog::PING_RESPONSE, &PingResponse)],
            catalog::PING_RESPONSE => vec![],
            catalog::DEVICE_INFO_REQUEST => vec![send(catalog::DEVICE_INFO_RESPONSE, &self.device_info())],
            catalog::LIST_ENTITIES_REQUEST => {
                self.list_entities = Some(ListEntitiesEnumerator::start());
                vec![]
            }
            catalog::SUBSCRIBE_STATES_REQUEST => {
                self.state_subscribed = true;
                self.initial_state = Some(InitialStateEnumerator::start());
                vec![]
            }
            catalog::SWITCH_COMMAND_REQUEST => self.handle_switch_command(payload, entities),
            catalog::LIGHT_COMMAND_REQUEST => self.handle_light_command(payload, entities),
            catalog::COVER_COMMAND_REQUEST => self.handle_cover_command(payload, entities),
            catalog::SUBSCRIBE_LOGS_REQUEST => self.handle_subscribe_logs(payload),
            catalog::NOISE_ENCRYPTION_SET_KEY_REQUEST => self.handle_noise_set_key(payload),
            catalog::SUBSCRIBE_BLUETOOTH_LE_ADVERTISEMENTS_REQUEST => self.handle_subscribe_bluetooth(payload),
            catalog::UNSUBSCRIBE_BLUETOOTH_LE_ADVERTISEMENTS_REQUEST => self.handle_unsubscribe_bluetooth(),
            catalog::HA_STATE_SUBSCRIBE_REQUEST => self.handle_ha_state_subscribe(payload),
            m if is_bluetooth_message(m) => self.forward(m, payload),
            m if is_voice_assistant_message(m) => self.forward(m, payload),
            m if is_home_assistant_message(m) => self.forward(m, payload),
            _ => {
                tracing::debug!(msg_type, "unhandled message type, ignoring");
                vec![]
            }
        }
    }

    fn device_info(&self) -> DeviceInfoResponse {
        DeviceInfoResponse {
            uses_password: self.password.is_some(),
            name: self.identity.name.clone(),
            friendly_name: self.identity.friendly_name.clone(),
            mac_address: self.identity.mac_address.clone(),
            esphome_version: self.identity.esphome_version.clone(),
            compilation_time: self.identity.compilation_time.clone(),
            model: self.identity.model.clone(),
            manufacturer: self.identity.manufacturer.clone(),
            project_name: self.identity.project_name.clone(),
            project_version: self.identity.project_version.clone(),
            suggested_area: self.identity.suggested_area.clone(),
            api_encryption_supported: self.identity.api_encryption_supported,
            ..Default::default()
        }
    }

    fn handle_hello(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        let Ok(_request) = HelloRequest::decode(payload) else {
            return self.close();
        };
        if self.state == ConnectionState::AwaitingHello {
            self.state = ConnectionState::HelloReceived;
        }
        let response = HelloResponse {
            api_version_major: 1,
            api_version_minor: 10,
            server_info: format!("{} (esphome v{})", self.identity.name, self.identity.esphome_version),
            name: self.identity.name.clone(),
        };
        vec![send(catalog::HELLO_RESPONSE, &response)]
    }

    fn handle_connect(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        let Ok(request) = ConnectRequest::decode(payload) else {
            return self.close();
        };
        let invalid = match &self.password {
            None => false,
            Some(expected) => !constant_time_eq(expected.as_bytes(), request.password.as_bytes()),
        };
        if !invalid {
            self.state = ConnectionState::Authenticated;
        }
        vec![send(
            catalog::CONNECT_RESPONSE,
            &ConnectResponse { invalid_password: invalid },
        )]
    }

    fn handle_disconnect(&mut self) -> Vec<ConnectionAction> {
        let mut actions = vec![send(catalog::DISCONNECT_RESPONSE, &DisconnectResponse)];
        actions.extend(self.close());
        actions
    }

    fn handle_subscribe_logs(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        let Ok(request) = SubscribeLogsRequest::decode(payload) else {
            return vec![];
        };
        self.log_level = Some(request.level);
        vec![]
    }

    fn handle_noise_set_key(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        let Ok(request) = NoiseEncryptionSetKeyRequest::decode(payload) else {
            return vec![];
        };
        if request.key.len() != 32 {
            tracing::debug!(
                "{}",
                ConnectionError::InvalidPsk { reason: format!("expected 32 bytes, got {}", request.key.len()) }
            );
            return vec![send(
                catalog::NOISE_ENCRYPTION_SET_KEY_RESPONSE,
                &NoiseEncryptionSetKeyResponse { success: false },
            )];
        }
        vec![ConnectionAction::PersistPsk { key: request.key }]
    }

    /// Called by the driver once it has attempted (and either persisted or
    /// rolled back) a PSK rotation requested via `PersistPsk`.
    pub fn complete_psk_update(&self, success: bool) -> Vec<ConnectionAction> {
        vec![send(
            catalog::NOISE_ENCRYPTION_SET_KEY_RESPONSE,
            &NoiseEncryptionSetKeyResponse { success },
        )]
    }

    fn handle_subscribe_bluetooth(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        self.subscribed_bluetooth = true;
        vec![
            ConnectionAction::ClaimPassThrough { channel: PassThroughChannel::Bluetooth },
            ConnectionAction::Forward {
                msg_type: catalog::SUBSCRIBE_BLUETOOTH_LE_ADVERTISEMENTS_REQUEST,
                payload: payload.to_vec(),
            },
        ]
    }

    fn handle_unsubscribe_bluetooth(&mut self) -> Vec<ConnectionAction> {
        self.subscribed_bluetooth = false;
        vec![ConnectionAction::ReleasePassThrough { channel: PassThroughChannel::Bluetooth }]
    }

    fn handle_ha_state_subscribe(&mut self, payload: &[u8]) -> Vec<ConnectionAction> {
        self.subscribed_home_assistant = true;
        vec![
            ConnectionAction::ClaimPassThrough { channel: PassThroughChannel::HomeAssistant },
            ConnectionAction::Forward { msg_type: catalog::HA_STATE_SUBSCRIBE_REQUEST, payload: payload.to_vec() },
        ]
    }

    /// Forwards a Bluetooth/Voice-Assistant/HA-state message verbatim to
    /// its external collaborator. Voice-Assistant messages carry no
    /// separate subscribe/unsubscribe pair in the catalog — a
    /// `VoiceAssistantRequest` both claims the slot and forwards the
    /// request in one step; `VoiceAssistantResponse`'s `error: true` (or
    /// the client simply going idle) ends the session, so there's no
    /// explicit unsubscribe message to wire.
    fn forward(&mut self, msg_type: u16, payload: &[u8]) -> Vec<ConnectionAction> {
        let mut actions = Vec::new();
        if msg_type == catalog::VOICE_ASSISTANT_REQUEST && !self.subscribed_voice_assistant {
            self.subscribed_voice_assistant = true;
            actions.push(ConnectionAction::ClaimPassThrough { channel: PassThroughChannel::VoiceAssistant });
        }
        actions.push(ConnectionAction::Forward { msg_type, payload: payload.to_vec() });
        actions
    }

    /// Called by the driver when the pass-through collaborator for
    /// `channel` produces an event, after it has confirmed via the shared
    /// registry that this Connection is the current subscriber. A no-op
    /// otherwise, mirroring `send_log_line`'s "drop unless subscribed"
    /// shape.
    pub fn deliver_pass_through(
        &self,
        channel: PassThroughChannel,
        is_subscriber: bool,
        msg_type: u16,
        payload: Vec<u8>,
    ) -> Vec<ConnectionAction> {
        let subscribed = match channel {
            PassThroughChannel::Bluetooth => self.subscribed_bluetooth,
            PassThroughChannel::VoiceAssistant => self.subscribed_voice_assistant,
            PassThroughChannel::HomeAssistant => self.subscribed_home_assistant,
        };
        if subscribed && is_subscriber {
            vec![ConnectionAction::Send { msg_type, payload }]
        } else {
            vec![]
        }
    }

    fn handle_switch_command(&mut self, payload: &[u8], entities: &dyn EntitySource) -> Vec<ConnectionAction> {
        let Ok(request) = SwitchCommandRequest::decode(payload) else {
            return vec![];
        };
        command_if_found(entities, request.key, EntityCommand::Switch { state: request.state })
    }

    fn handle_light_command(&mut self, payload: &[u8], entities: &dyn EntitySource) -> Vec<ConnectionAction> {
        let Ok(request) = LightCommandRequest::decode(payload) else {
            return vec![];
        };
        command_if_found(
            entities,
            request.key,
            EntityCommand::Light {
                has_state: request.has_state,
                state: request.state,
                has_brightness: request.has_brightness,
                brightness: request.brightness,
            },
        )
    }

    fn handle_cover_command(&mut self, payload: &[u8], entities: &dyn EntitySource) -> Vec<ConnectionAction> {
        let Ok(request) = CoverCommandRequest::decode(payload) else {
            return vec![];
        };
        command_if_found(
            entities,
            request.key,
            EntityCommand::Cover {
                has_position: request.has_position,
                position: request.position,
            },
        )
    }

    /// Queues a state update for an already-subscribed client, deduplicating
    /// against any earlier pending update of the same kind for the same
    /// entity. A no-op if the client never subscribed to state.
    pub fn send_entity_state(&mut self, now: I, info: &EntityInfo, state: StateValue) {
        if !self.state_subscribed {
            return;
        }
        let msg_type = info.kind.state_message_type();
        let bytes = encode_state(info.kind, info.key, state);
        self.batch.push(now, Some(info.key), msg_type, 32, Creator::Encoded(bytes));
    }

    /// Offers one produced log line to the connection. A no-op unless the
    /// peer subscribed and `level` is at or below the subscribed threshold
    /// (lower numbers are more severe; a higher threshold admits more).
    /// Sent immediately rather than through the deferred batch, since logs
    /// are meant to surface promptly; a write failure here is handled the
    /// same as any other send failure rather than swallowed, since on a
    /// single-threaded non-blocking poll loop a failed write almost always
    /// means the socket is already dead.
    pub fn send_log_line(&self, level: i32, message: String) -> Vec<ConnectionAction> {
        match self.log_level {
            Some(threshold) if level <= threshold => {
                vec![send(catalog::SUBSCRIBE_LOGS_RESPONSE, &SubscribeLogsResponse { level, message, send_failed: false })]
            }
            _ => vec![],
        }
    }

    pub fn report_ping_send_result(&mut self, success: bool) -> Vec<ConnectionAction> {
        if success {
            self.ping_outstanding = true;
        } else {
            self.ping_retries += 1;
            if self.ping_retries >= MAX_PING_RETRIES {
                return self.close();
            }
        }
        vec![]
    }

    /// Advances timeouts, entity enumerators, and the deferred batch by one
    /// tick. `can_write`/`header_padding`/`footer_size` come from the
    /// active frame helper.
    pub fn tick(
        &mut self,
        now: I,
        can_write: bool,
        header_padding: usize,
        footer_size: usize,
        entities: &dyn EntitySource,
    ) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Closing {
            return self.close();
        }

        if self.state == ConnectionState::AwaitingHello
            && now - self.hello_started_at >= self.hello_timeout
        {
            let elapsed = now - self.hello_started_at;
            tracing::debug!("{}", ConnectionError::HelloTimeout { elapsed });
            return self.close();
        }

        let idle = now - self.last_traffic;
        if self.ping_outstanding && idle > disconnect_window() {
            tracing::warn!("{}", ConnectionError::KeepaliveTimeout { elapsed: idle });
            return self.close();
        }
        let mut actions = Vec::new();
        if idle > KEEPALIVE_TIMEOUT {
            let ready = match self.last_ping_attempt {
                None => true,
                Some(last) => now - last >= PING_RETRY_INTERVAL,
            };
            if ready {
                self.last_ping_attempt = Some(now);
                actions.push(send(catalog::PING_REQUEST, &PingRequest));
            }
        }

        self.advance_enumerators(now, entities);

        let mut buf = Vec::new();
        if self.batch.ready(now) {
            if let Some(packets) = self
                .batch
                .flush(now, can_write, header_padding, footer_size, &mut buf)
            {
                actions.push(ConnectionAction::SendBatch { buffer: buf, packets });
            }
        }

        actions
    }

    fn advance_enumerators(&mut self, now: I, entities: &dyn EntitySource) {
        if let Some(mut en) = self.list_entities.take() {
            match en.advance(entities.entity_count()) {
                Some(idx) => {
                    if let Some(info) = entities.entity_at(idx) {
                        let msg_type = info.kind.list_entities_message_type();
                        let bytes = encode_list_entities_info(info);
                        self.batch
                            .push(now, Some(info.key), msg_type, 96, Creator::Encoded(bytes));
                    }
                    self.list_entities = Some(en);
                }
                None => {
                    self.batch.push(
                        now,
                        None,
                        catalog::LIST_ENTITIES_DONE_RESPONSE,
                        0,
                        Creator::Encoded(Vec::new()),
                    );
                }
            }
            return;
        }

        if let Some(mut en) = self.initial_state.take() {
            match en.advance(entities.entity_count()) {
                Some(idx) => {
                    if let Some(info) = entities.entity_at(idx) {
                        if let Some(state) = entities.state_of(info.key) {
                            self.send_entity_state(now, info, state);
                        }
                    }
                    self.initial_state = Some(en);
                }
                None => {}
            }
        }
    }
}

fn requires_authenticated(msg_type: u16) -> bool {
    matches!(
        msg_type,
        catalog::LIST_ENTITIES_REQUEST
            | catalog::SUBSCRIBE_STATES_REQUEST
            | catalog::SWITCH_COMMAND_REQUEST
            | catalog::LIGHT_COMMAND_REQUEST
            | catalog::COVER_COMMAND_REQUEST
            | catalog::SUBSCRIBE_LOGS_REQUEST
            | catalog::NOISE_ENCRYPTION_SET_KEY_REQUEST
            | catalog::CAMERA_IMAGE_REQUEST
            | catalog::EXECUTE_SERVICE_REQUEST
    ) || is_bluetooth_message(msg_type)
        || is_voice_assistant_message(msg_type)
        || is_home_assistant_message(msg_type)
}

fn command_if_found(
    entities: &dyn EntitySource,
    key: EntityId,
    command: EntityCommand,
) -> Vec<ConnectionAction> {
    for i in 0..entities.entity_count() {
        if let Some(info) = entities.entity_at(i) {
            if info.key == key {
                return vec![ConnectionAction::Command { key, command }];
            }
        }
    }
    vec![]
}

fn send<M: ProtoMessage>(msg_type: u16, msg: &M) -> ConnectionAction {
    debug_assert_eq!(msg_type, M::MESSAGE_TYPE);
    let mut payload = Vec::with_capacity(msg.calculate_size());
    msg.encode(&mut payload);
    ConnectionAction::Send { msg_type, payload }
}

fn encode_list_entities_info(info: &EntityInfo) -> Vec<u8> {
    let mut buf = Vec::new();
    match info.kind {
        EntityKind::BinarySensor => ListEntitiesBinarySensorResponse {
            object_id: info.object_id.clone(),
            key: info.key,
            name: info.name.clone(),
            unique_id: info.unique_id.clone(),
            disabled_by_default: info.disabled_by_default,
            icon: info.icon.clone(),
            entity_category: info.entity_category,
        }
        .encode(&mut buf),
        EntityKind::Sensor => ListEntitiesSensorResponse {
            object_id: info.object_id.clone(),
            key: info.key,
            name: info.name.clone(),
            unique_id: info.unique_id.clone(),
            disabled_by_default: info.disabled_by_default,
            icon: info.icon.clone(),
            entity_category: info.entity_category,
        }
        .encode(&mut buf),
        EntityKind::Switch => ListEntitiesSwitchResponse {
            object_id: info.object_id.clone(),
            key: info.key,
            name: info.name.clone(),
            unique_id: info.unique_id.clone(),
            disabled_by_default: info.disabled_by_default,
            icon: info.icon.clone(),
            entity_category: info.entity_category,
        }
        .encode(&mut buf),
        EntityKind::Light => ListEntitiesLightResponse {
            object_id: info.object_id.clone(),
            key: info.key,
            name: info.name.clone(),
            unique_id: info.unique_id.clone(),
            disabled_by_default: info.disabled_by_default,
            icon: info.icon.clone(),
            entity_category: info.entity_category,
        }
        .encode(&mut buf),
        EntityKind::Cover => ListEntitiesCoverResponse {
            object_id: info.object_id.clone(),
            key: info.key,
            name: info.name.clone(),
            unique_id: info.unique_id.clone(),
            disabled_by_default: info.disabled_by_default,
            icon: info.icon.clone(),
            entity_category: info.entity_category,
        }
        .encode(&mut buf),
    }
    buf
}

/// Maps the entity's live value onto its kind's concrete state message.
/// `Light` and `Cover` only carry one scalar in [`StateValue`] today (no
/// brightness/position split); this is a deliberate scope simplification
/// for the representative entity set this codec implements.
fn encode_state(kind: EntityKind, key: EntityId, state: StateValue) -> Vec<u8> {
    let mut buf = Vec::new();
    match (kind, state) {
        (EntityKind::BinarySensor, StateValue::Bool(b)) => BinarySensorStateResponse {
            key,
            state: b,
            missing_state: false,
        }
        .encode(&mut buf),
        (EntityKind::Sensor, StateValue::Float(f)) => SensorStateResponse {
            key,
            state: f,
            missing_state: false,
        }
        .encode(&mut buf),
        (EntityKind::Switch, StateValue::Bool(b)) => {
            SwitchStateResponse { key, state: b }.encode(&mut buf)
        }
        (EntityKind::Light, StateValue::Bool(b)) => LightStateResponse {
            key,
            state: b,
            brightness: 0.0,
        }
        .encode(&mut buf),
        (EntityKind::Cover, StateValue::Float(f)) => CoverStateResponse {
            key,
            position: f,
            current_operation: 0,
        }
        .encode(&mut buf),
        _ => {}
    }
    buf
}

/// Constant-time comparison for the connect password, to avoid leaking
/// length-dependent timing on a mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
