//! Bluetooth / Voice-Assistant / Home-Assistant-state pass-through: these
//! message families carry no entity-driver logic here, they forward
//! verbatim to a single external "global" collaborator (a BLE radio, a
//! voice pipeline, a Home-Assistant state cache). Only one Connection may
//! hold each subscription at a time; a later subscriber replaces the
//! earlier one, and the slot is released when that Connection drops.
//!
//! `Connection` never reaches across to other connections itself (each
//! runs on its own thread in `esphome-server`), so ownership lives in this
//! shared, lock-guarded registry instead, mirroring the `psk_store` the
//! server already threads through `Arc<Mutex<_>>` for the same reason.

use std::sync::Mutex;

/// Assigned by the driver when a Connection is created; stable for the
/// life of that Connection.
pub type ConnectionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassThroughChannel {
    Bluetooth,
    VoiceAssistant,
    HomeAssistant,
}

/// Whether `msg_type` belongs to the Bluetooth LE/GATT cluster
/// (`catalog::BLUETOOTH_*`, ids 66-88 plus the scanner-state pair 126/127).
pub fn is_bluetooth_message(msg_type: u16) -> bool {
    (66..=88).contains(&msg_type) || matches!(msg_type, 126 | 127)
}

/// Whether `msg_type` belongs to the Voice-Assistant cluster
/// (`catalog::VOICE_ASSISTANT_*`, ids 89-92, 106, 115, 119-123).
pub fn is_voice_assistant_message(msg_type: u16) -> bool {
    matches!(msg_type, 89..=92 | 106 | 115 | 119..=123)
}

/// Whether `msg_type` is one of the Home-Assistant state/service messages
/// forwarded to the HA-state collaborator (`HaStateSubscribe`,
/// `HaStateResponse`, `HaServiceCallResponse`).
pub fn is_home_assistant_message(msg_type: u16) -> bool {
    use esphome_proto::catalog::{HA_SERVICE_CALL_RESPONSE, HA_STATE_RESPONSE, HA_STATE_SUBSCRIBE_REQUEST};
    matches!(msg_type, HA_STATE_SUBSCRIBE_REQUEST | HA_STATE_RESPONSE | HA_SERVICE_CALL_RESPONSE)
}

/// Tracks which Connection currently owns each pass-through subscription.
/// One instance is shared by the whole server.
#[derive(Debug, Default)]
pub struct GlobalSubscriptions {
    bluetooth: Mutex<Option<ConnectionId>>,
    voice_assistant: Mutex<Option<ConnectionId>>,
    home_assistant: Mutex<Option<ConnectionId>>,
}

impl GlobalSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, channel: PassThroughChannel) -> &Mutex<Option<ConnectionId>> {
        match channel {
            PassThroughChannel::Bluetooth => &self.bluetooth,
            PassThroughChannel::VoiceAssistant => &self.voice_assistant,
            PassThroughChannel::HomeAssistant => &self.home_assistant,
        }
    }

    /// Claims `channel` for `id`, replacing whoever held it before.
    pub fn subscribe(&self, channel: PassThroughChannel, id: ConnectionId) {
        *self.slot(channel).lock().expect("subscription mutex poisoned") = Some(id);
    }

    /// Releases `channel`, but only if `id` is still the current holder —
    /// a stale release from a Connection that already lost the slot to a
    /// later subscriber must not clobber the new holder.
    pub fn release(&self, channel: PassThroughChannel, id: ConnectionId) {
        let mut slot = self.slot(channel).lock().expect("subscription mutex poisoned");
        if *slot == Some(id) {
            *slot = None;
        }
    }

    pub fn is_subscriber(&self, channel: PassThroughChannel, id: ConnectionId) -> bool {
        *self.slot(channel).lock().expect("subscription mutex poisoned") == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_then_replace_moves_ownership() {
        let subs = GlobalSubscriptions::new();
        subs.subscribe(PassThroughChannel::Bluetooth, 1);
        assert!(subs.is_subscriber(PassThroughChannel::Bluetooth, 1));
        subs.subscribe(PassThroughChannel::Bluetooth, 2);
        assert!(!subs.is_subscriber(PassThroughChannel::Bluetooth, 1));
        assert!(subs.is_subscriber(PassThroughChannel::Bluetooth, 2));
    }

    #[test]
    fn stale_release_does_not_clobber_new_holder() {
        let subs = GlobalSubscriptions::new();
        subs.subscribe(PassThroughChannel::VoiceAssistant, 1);
        subs.subscribe(PassThroughChannel::VoiceAssistant, 2);
        subs.release(PassThroughChannel::VoiceAssistant, 1);
        assert!(subs.is_subscriber(PassThroughChannel::VoiceAssistant, 2));
    }

    #[test]
    fn release_by_current_holder_clears_slot() {
        let subs = GlobalSubscriptions::new();
        subs.subscribe(PassThroughChannel::HomeAssistant, 5);
        subs.release(PassThroughChannel::HomeAssistant, 5);
        assert!(!subs.is_subscriber(PassThroughChannel::HomeAssistant, 5));
    }

    #[test]
    fn bluetooth_range_classification() {
        assert!(is_bluetooth_message(66));
        assert!(is_bluetooth_message(88));
        assert!(is_bluetooth_message(126));
        assert!(is_bluetooth_message(127));
        assert!(!is_bluetooth_message(89));
        assert!(!is_bluetooth_message(65));
    }

    #[test]
    fn voice_assistant_range_classification() {
        assert!(is_voice_assistant_message(89));
        assert!(is_voice_assistant_message(92));
        assert!(is_voice_assistant_message(106));
        assert!(is_voice_assistant_message(115));
        assert!(is_voice_assistant_message(119));
        assert!(is_voice_assistant_message(123));
        assert!(!is_voice_assistant_message(93));
        assert!(!is_voice_assistant_message(124));
    }
}
