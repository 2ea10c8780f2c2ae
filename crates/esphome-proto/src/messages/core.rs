//! Session-layer messages: hello, auth, keepalive, device info, disconnect.

use crate::catalog;
use crate::error::Result;
use crate::wire::{
    as_string, bool_field_size, decode_fields, int32_field_size, string_field_size,
    varint_field_size, write_bool_field, write_int32_field, write_string_field,
    write_varint_field, FieldValue, ProtoMessage,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloRequest {
    pub client_info: String,
    pub api_version_major: u32,
    pub api_version_minor: u32,
}

impl ProtoMessage for HelloRequest {
    const MESSAGE_TYPE: u16 = catalog::HELLO_REQUEST;
    const ESTIMATED_SIZE: u32 = 32;

    fn calculate_size(&self) -> usize {
        string_field_size(1, &self.client_info)
            + varint_field_size(2, self.api_version_major as u64)
            + varint_field_size(3, self.api_version_minor as u64)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_string_field(1, &self.client_info, out);
        write_varint_field(2, self.api_version_major as u64, out);
        write_varint_field(3, self.api_version_minor as u64, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::LengthDelimited(b)) => msg.client_info = as_string(1, b)?,
                (2, FieldValue::Varint(v)) => msg.api_version_major = v as u32,
                (3, FieldValue::Varint(v)) => msg.api_version_minor = v as u32,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloResponse {
    pub api_version_major: u32,
    pub api_version_minor: u32,
    pub server_info: String,
    pub name: String,
}

impl ProtoMessage for HelloResponse {
    const MESSAGE_TYPE: u16 = catalog::HELLO_RESPONSE;
    const ESTIMATED_SIZE: u32 = 64;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.api_version_major as u64)
            + varint_field_size(2, self.api_version_minor as u64)
            + string_field_size(3, &self.server_info)
            + string_field_size(4, &self.name)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.api_version_major as u64, out);
        write_varint_field(2, self.api_version_minor as u64, out);
        write_string_field(3, &self.server_info, out);
        write_string_field(4, &self.name, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.api_version_major = v as u32,
                (2, FieldValue::Varint(v)) => msg.api_version_minor = v as u32,
                (3, FieldValue::LengthDelimited(b)) => msg.server_info = as_string(3, b)?,
                (4, FieldValue::LengthDelimited(b)) => msg.name = as_string(4, b)?,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectRequest {
    pub password: String,
}

impl ProtoMessage for ConnectRequest {
    const MESSAGE_TYPE: u16 = catalog::CONNECT_REQUEST;
    const ESTIMATED_SIZE: u32 = 32;

    fn calculate_size(&self) -> usize {
        string_field_size(1, &self.password)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_string_field(1, &self.password, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            if let (1, FieldValue::LengthDelimited(b)) = (field, value) {
                msg.password = as_string(1, b)?;
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectResponse {
    pub invalid_password: bool,
}

impl ProtoMessage for ConnectResponse {
    const MESSAGE_TYPE: u16 = catalog::CONNECT_RESPONSE;
    const ESTIMATED_SIZE: u32 = 8;

    fn calculate_size(&self) -> usize {
        bool_field_size(1, self.invalid_password)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_bool_field(1, self.invalid_password, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            if let (1, FieldValue::Varint(v)) = (field, value) {
                msg.invalid_password = v != 0;
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectRequest;

impl ProtoMessage for DisconnectRequest {
    const MESSAGE_TYPE: u16 = catalog::DISCONNECT_REQUEST;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectResponse;

impl ProtoMessage for DisconnectResponse {
    const MESSAGE_TYPE: u16 = catalog::DISCONNECT_RESPONSE;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PingRequest;

impl ProtoMessage for PingRequest {
    const MESSAGE_TYPE: u16 = catalog::PING_REQUEST;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PingResponse;

impl ProtoMessage for PingResponse {
    const MESSAGE_TYPE: u16 = catalog::PING_RESPONSE;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfoRequest;

impl ProtoMessage for DeviceInfoRequest {
    const MESSAGE_TYPE: u16 = catalog::DEVICE_INFO_REQUEST;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfoResponse {
    pub uses_password: bool,
    pub name: String,
    pub mac_address: String,
    pub esphome_version: String,
    pub compilation_time: String,
    pub model: String,
    pub has_deep_sleep: bool,
    pub project_name: String,
    pub project_version: String,
    pub webserver_port: i32,
    pub legacy_bluetooth_proxy_version: i32,
    pub manufacturer: String,
    pub friendly_name: String,
    pub voice_assistant_feature_flags: u32,
    pub suggested_area: String,
    pub bluetooth_proxy_feature_flags: u32,
    pub api_encryption_supported: bool,
}

impl ProtoMessage for DeviceInfoResponse {
    const MESSAGE_TYPE: u16 = catalog::DEVICE_INFO_RESPONSE;
    const ESTIMATED_SIZE: u32 = 256;

    fn calculate_size(&self) -> usize {
        bool_field_size(1, self.uses_password)
            + string_field_size(2, &self.name)
            + string_field_size(3, &self.mac_address)
            + string_field_size(4, &self.esphome_version)
            + string_field_size(5, &self.compilation_time)
            + string_field_size(6, &self.model)
            + bool_field_size(7, self.has_deep_sleep)
            + string_field_size(8, &self.project_name)
            + string_field_size(9, &self.project_version)
            + int32_field_size(10, self.webserver_port)
            + int32_field_size(11, self.legacy_bluetooth_proxy_version)
            + string_field_size(12, &self.manufacturer)
            + string_field_size(13, &self.friendly_name)
            + varint_field_size(15, self.voice_assistant_feature_flags as u64)
            + string_field_size(16, &self.suggested_area)
            + varint_field_size(17, self.bluetooth_proxy_feature_flags as u64)
            + bool_field_size(18, self.api_encryption_supported)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_bool_field(1, self.uses_password, out);
        write_string_field(2, &self.name, out);
        write_string_field(3, &self.mac_address, out);
        write_string_field(4, &self.esphome_version, out);
        write_string_field(5, &self.compilation_time, out);
        write_string_field(6, &self.model, out);
        write_bool_field(7, self.has_deep_sleep, out);
        write_string_field(8, &self.project_name, out);
        write_string_field(9, &self.project_version, out);
        write_int32_field(10, self.webserver_port, out);
        write_int32_field(11, self.legacy_bluetooth_proxy_version, out);
        write_string_field(12, &self.manufacturer, out);
        write_string_field(13, &self.friendly_name, out);
        write_varint_field(15, self.voice_assistant_feature_flags as u64, out);
        write_string_field(16, &self.suggested_area, out);
        write_varint_field(17, self.bluetooth_proxy_feature_flags as u64, out);
        write_bool_field(18, self.api_encryption_supported, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.uses_password = v != 0,
                (2, FieldValue::LengthDelimited(b)) => msg.name = as_string(2, b)?,
                (3, FieldValue::LengthDelimited(b)) => msg.mac_address = as_string(3, b)?,
                (4, FieldValue::LengthDelimited(b)) => msg.esphome_version = as_string(4, b)?,
                (5, FieldValue::LengthDelimited(b)) => msg.compilation_time = as_string(5, b)?,
                (6, FieldValue::LengthDelimited(b)) => msg.model = as_string(6, b)?,
                (7, FieldValue::Varint(v)) => msg.has_deep_sleep = v != 0,
                (8, FieldValue::LengthDelimited(b)) => msg.project_name = as_string(8, b)?,
                (9, FieldValue::LengthDelimited(b)) => msg.project_version = as_string(9, b)?,
                (10, FieldValue::Varint(v)) => msg.webserver_port = v as i32,
                (11, FieldValue::Varint(v)) => msg.legacy_bluetooth_proxy_version = v as i32,
                (12, FieldValue::LengthDelimited(b)) => msg.manufacturer = as_string(12, b)?,
                (13, FieldValue::LengthDelimited(b)) => msg.friendly_name = as_string(13, b)?,
                (15, FieldValue::Varint(v)) => msg.voice_assistant_feature_flags = v as u32,
                (16, FieldValue::LengthDelimited(b)) => msg.suggested_area = as_string(16, b)?,
                (17, FieldValue::Varint(v)) => msg.bluetooth_proxy_feature_flags = v as u32,
                (18, FieldValue::Varint(v)) => msg.api_encryption_supported = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trip() {
        let msg = HelloRequest {
            client_info: "esphome".into(),
            api_version_major: 1,
            api_version_minor: 10,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(HelloRequest::decode(&out).unwrap(), msg);
    }

    #[test]
    fn device_info_round_trip() {
        let msg = DeviceInfoResponse {
            uses_password: false,
            name: "livingroom".into(),
            friendly_name: "Living Room".into(),
            mac_address: "AA:BB:CC:DD:EE:FF".into(),
            esphome_version: "2024.6.0".into(),
            model: "esp32dev".into(),
            api_encryption_supported: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(DeviceInfoResponse::decode(&out).unwrap(), msg);
    }

    #[test]
    fn empty_messages_encode_to_nothing() {
        assert_eq!(PingRequest.calculate_size(), 0);
        assert_eq!(DisconnectRequest.calculate_size(), 0);
    }
}
