//! Stable message-type ids shared by every frame helper and connection.
//!
//! Ids are assigned per message name and never reused; a peer sending an id
//! this crate does not recognize is tolerated (the frame helper just hands
//! the raw payload up, and nothing consumes it).

pub const HELLO_REQUEST: u16 = 1;
pub const HELLO_RESPONSE: u16 = 2;
pub const CONNECT_REQUEST: u16 = 3;
pub const CONNECT_RESPONSE: u16 = 4;
pub const DISCONNECT_REQUEST: u16 = 5;
pub const DISCONNECT_RESPONSE: u16 = 6;
pub const PING_REQUEST: u16 = 7;
pub const PING_RESPONSE: u16 = 8;
pub const DEVICE_INFO_REQUEST: u16 = 9;
pub const DEVICE_INFO_RESPONSE: u16 = 10;
pub const LIST_ENTITIES_REQUEST: u16 = 11;

pub const LIST_ENTITIES_BINARY_SENSOR_RESPONSE: u16 = 12;
pub const LIST_ENTITIES_COVER_RESPONSE: u16 = 13;
pub const LIST_ENTITIES_FAN_RESPONSE: u16 = 14;
pub const LIST_ENTITIES_LIGHT_RESPONSE: u16 = 15;
pub const LIST_ENTITIES_SENSOR_RESPONSE: u16 = 16;
pub const LIST_ENTITIES_SWITCH_RESPONSE: u16 = 17;
pub const LIST_ENTITIES_TEXT_SENSOR_RESPONSE: u16 = 18;
pub const LIST_ENTITIES_DONE_RESPONSE: u16 = 19;
pub const SUBSCRIBE_STATES_REQUEST: u16 = 20;

pub const BINARY_SENSOR_STATE_RESPONSE: u16 = 21;
pub const COVER_STATE_RESPONSE: u16 = 22;
pub const FAN_STATE_RESPONSE: u16 = 23;
pub const LIGHT_STATE_RESPONSE: u16 = 24;
pub const SENSOR_STATE_RESPONSE: u16 = 25;
pub const SWITCH_STATE_RESPONSE: u16 = 26;
pub const TEXT_SENSOR_STATE_RESPONSE: u16 = 27;

pub const SUBSCRIBE_LOGS_REQUEST: u16 = 28;
pub const SUBSCRIBE_LOGS_RESPONSE: u16 = 29;

pub const COVER_COMMAND_REQUEST: u16 = 30;
pub const FAN_COMMAND_REQUEST: u16 = 31;
pub const LIGHT_COMMAND_REQUEST: u16 = 32;
pub const SWITCH_COMMAND_REQUEST: u16 = 33;

pub const SUBSCRIBE_HA_SERVICES_REQUEST: u16 = 34;
pub const HA_SERVICE_CALL_RESPONSE: u16 = 35;
pub const GET_TIME_REQUEST: u16 = 36;
pub const GET_TIME_RESPONSE: u16 = 37;
pub const HA_STATE_SUBSCRIBE_REQUEST: u16 = 38;
pub const HA_STATE_RESPONSE_SUBSCRIBE: u16 = 39;
pub const HA_STATE_RESPONSE: u16 = 40;
pub const LIST_ENTITIES_SERVICES_RESPONSE: u16 = 41;
pub const EXECUTE_SERVICE_REQUEST: u16 = 42;

pub const LIST_ENTITIES_CAMERA_RESPONSE: u16 = 43;
pub const CAMERA_IMAGE_RESPONSE: u16 = 44;
pub const CAMERA_IMAGE_REQUEST: u16 = 45;

pub const LIST_ENTITIES_CLIMATE_RESPONSE: u16 = 46;
pub const CLIMATE_STATE_RESPONSE: u16 = 47;
pub const CLIMATE_COMMAND_REQUEST: u16 = 48;

pub const LIST_ENTITIES_NUMBER_RESPONSE: u16 = 49;
pub const NUMBER_STATE_RESPONSE: u16 = 50;
pub const NUMBER_COMMAND_REQUEST: u16 = 51;

pub const LIST_ENTITIES_SELECT_RESPONSE: u16 = 52;
pub const SELECT_STATE_RESPONSE: u16 = 53;
pub const SELECT_COMMAND_REQUEST: u16 = 54;

pub const LIST_ENTITIES_SIREN_RESPONSE: u16 = 55;
pub const SIREN_STATE_RESPONSE: u16 = 56;
pub const SIREN_COMMAND_REQUEST: u16 = 57;

pub const LIST_ENTITIES_LOCK_RESPONSE: u16 = 58;
pub const LOCK_STATE_RESPONSE: u16 = 59;
pub const LOCK_COMMAND_REQUEST: u16 = 60;

pub const LIST_ENTITIES_BUTTON_RESPONSE: u16 = 61;
pub const BUTTON_COMMAND_REQUEST: u16 = 62;

pub const LIST_ENTITIES_MEDIA_PLAYER_RESPONSE: u16 = 63;
pub const MEDIA_PLAYER_STATE_RESPONSE: u16 = 64;
pub const MEDIA_PLAYER_COMMAND_REQUEST: u16 = 65;

pub const BLUETOOTH_LE_RAW_ADVERTISEMENTS_RESPONSE: u16 = 66;
pub const BLUETOOTH_DEVICE_REQUEST: u16 = 67;
pub const BLUETOOTH_DEVICE_CONNECTION_RESPONSE: u16 = 68;
pub const BLUETOOTH_GATT_GET_SERVICES_REQUEST: u16 = 69;
pub const BLUETOOTH_GATT_GET_SERVICES_RESPONSE: u16 = 70;
pub const BLUETOOTH_GATT_GET_SERVICES_DONE_RESPONSE: u16 = 71;
pub const BLUETOOTH_GATT_READ_REQUEST: u16 = 72;
pub const BLUETOOTH_GATT_READ_RESPONSE: u16 = 73;
pub const BLUETOOTH_GATT_WRITE_REQUEST: u16 = 74;
pub const BLUETOOTH_GATT_READ_DESCRIPTOR_REQUEST: u16 = 75;
pub const BLUETOOTH_GATT_WRITE_DESCRIPTOR_REQUEST: u16 = 76;
pub const BLUETOOTH_GATT_NOTIFY_REQUEST: u16 = 77;
pub const BLUETOOTH_GATT_NOTIFY_DATA_RESPONSE: u16 = 78;
pub const SUBSCRIBE_BLUETOOTH_LE_ADVERTISEMENTS_REQUEST: u16 = 79;
pub const BLUETOOTH_DEVICE_PAIRING_RESPONSE: u16 = 80;
pub const BLUETOOTH_DEVICE_UNPAIRING_RESPONSE: u16 = 81;
pub const UNSUBSCRIBE_BLUETOOTH_LE_ADVERTISEMENTS_REQUEST: u16 = 82;
pub const BLUETOOTH_DEVICE_CLEAR_CACHE_RESPONSE: u16 = 83;
pub const BLUETOOTH_SCANNER_STATE_RESPONSE: u16 = 126;
pub const BLUETOOTH_SCANNER_SET_MODE_REQUEST: u16 = 127;
pub const BLUETOOTH_CONNECTIONS_FREE_RESPONSE: u16 = 84;
pub const BLUETOOTH_GATT_ERROR_RESPONSE: u16 = 85;
pub const BLUETOOTH_GATT_WRITE_RESPONSE: u16 = 86;
pub const BLUETOOTH_GATT_NOTIFY_RESPONSE: u16 = 87;
pub const BLUETOOTH_LE_RAW_ADVERTISEMENT: u16 = 88;

pub const VOICE_ASSISTANT_REQUEST: u16 = 89;
pub const VOICE_ASSISTANT_RESPONSE: u16 = 90;
pub const VOICE_ASSISTANT_EVENT_RESPONSE: u16 = 91;
pub const VOICE_ASSISTANT_AUDIO: u16 = 106;
pub const VOICE_ASSISTANT_TIMER_EVENT_RESPONSE: u16 = 115;
pub const VOICE_ASSISTANT_ANNOUNCE_REQUEST: u16 = 119;
pub const VOICE_ASSISTANT_ANNOUNCE_FINISHED: u16 = 120;
pub const VOICE_ASSISTANT_CONFIGURATION_REQUEST: u16 = 121;
pub const VOICE_ASSISTANT_CONFIGURATION_RESPONSE: u16 = 122;
pub const VOICE_ASSISTANT_SET_CONFIGURATION: u16 = 123;
pub const VOICE_ASSISTANT_WAKE_WORD: u16 = 92;

pub const LIST_ENTITIES_ALARM_CONTROL_PANEL_RESPONSE: u16 = 94;
pub const ALARM_CONTROL_PANEL_STATE_RESPONSE: u16 = 95;
pub const ALARM_CONTROL_PANEL_COMMAND_REQUEST: u16 = 96;

pub const LIST_ENTITIES_TEXT_RESPONSE: u16 = 97;
pub const TEXT_STATE_RESPONSE: u16 = 98;
pub const TEXT_COMMAND_REQUEST: u16 = 99;

pub const LIST_ENTITIES_DATE_RESPONSE: u16 = 100;
pub const DATE_STATE_RESPONSE: u16 = 101;
pub const DATE_COMMAND_REQUEST: u16 = 102;

pub const LIST_ENTITIES_TIME_RESPONSE: u16 = 103;
pub const TIME_STATE_RESPONSE: u16 = 104;
pub const TIME_COMMAND_REQUEST: u16 = 105;

pub const LIST_ENTITIES_EVENT_RESPONSE: u16 = 107;
pub const EVENT_RESPONSE: u16 = 108;

pub const LIST_ENTITIES_VALVE_RESPONSE: u16 = 109;
pub const VALVE_STATE_RESPONSE: u16 = 110;
pub const VALVE_COMMAND_REQUEST: u16 = 111;

pub const LIST_ENTITIES_DATETIME_RESPONSE: u16 = 112;
pub const DATETIME_STATE_RESPONSE: u16 = 113;
pub const DATETIME_COMMAND_REQUEST: u16 = 114;

pub const LIST_ENTITIES_UPDATE_RESPONSE: u16 = 116;
pub const UPDATE_STATE_RESPONSE: u16 = 117;
pub const UPDATE_COMMAND_REQUEST: u16 = 118;

pub const NOISE_ENCRYPTION_SET_KEY_REQUEST: u16 = 124;
pub const NOISE_ENCRYPTION_SET_KEY_RESPONSE: u16 = 125;
