//! Entity enumeration, state, and command messages for the representative
//! entity kinds implemented by this codec: binary_sensor, sensor, switch,
//! light, cover. Other catalog ids (fan, climate, lock, …) are assigned in
//! [`crate::catalog`] but not given concrete structs here; peers that send
//! them are tolerated by the generic decode skip, same as any unknown id.

use crate::catalog;
use crate::error::Result;
use crate::wire::{
    as_string, bool_field_size, decode_fields, float_field_size, string_field_size,
    varint_field_size, write_bool_field, write_float_field, write_string_field,
    write_varint_field, FieldValue, ProtoMessage,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntitiesRequest;

impl ProtoMessage for ListEntitiesRequest {
    const MESSAGE_TYPE: u16 = catalog::LIST_ENTITIES_REQUEST;
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
pub struct ListEntitiesDoneResponse;

impl ProtoMessage for ListEntitiesDoneResponse {
    const MESSAGE_TYPE: u16 = catalog::LIST_ENTITIES_DONE_RESPONSE;
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
pub struct SubscribeStatesRequest;

impl ProtoMessage for SubscribeStatesRequest {
    const MESSAGE_TYPE: u16 = catalog::SUBSCRIBE_STATES_REQUEST;
    const ESTIMATED_SIZE: u32 = 0;

    fn calculate_size(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn decode(_data: &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// Shared info-message fields every entity kind's `ListEntities*Response`
/// carries (object id key, names, entity category, disabled-by-default).
/// Concrete per-kind structs embed this instead of a macro, mirroring how
/// the original schema repeats the same leading fields per message.
macro_rules! entity_info_fields {
    ($name:ident, $type_const:path, $estimated:expr) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub object_id: String,
            pub key: u32,
            pub name: String,
            pub unique_id: String,
            pub disabled_by_default: bool,
            pub icon: String,
            pub entity_category: u32,
        }

        impl $name {
            fn common_size(&self) -> usize {
                string_field_size(1, &self.object_id)
                    + varint_field_size(2, self.key as u64)
                    + string_field_size(3, &self.name)
                    + string_field_size(4, &self.unique_id)
                    + bool_field_size(9, self.disabled_by_default)
                    + string_field_size(10, &self.icon)
                    + varint_field_size(11, self.entity_category as u64)
            }

            fn encode_common(&self, out: &mut Vec<u8>) {
                write_string_field(1, &self.object_id, out);
                write_varint_field(2, self.key as u64, out);
                write_string_field(3, &self.name, out);
                write_string_field(4, &self.unique_id, out);
                write_bool_field(9, self.disabled_by_default, out);
                write_string_field(10, &self.icon, out);
                write_varint_field(11, self.entity_category as u64, out);
            }

            fn decode_common_field(&mut self, field: u32, value: &FieldValue<'_>) -> Result<bool> {
                match (field, value) {
                    (1, FieldValue::LengthDelimited(b)) => self.object_id = as_string(1, b)?,
                    (2, FieldValue::Varint(v)) => self.key = *v as u32,
                    (3, FieldValue::LengthDelimited(b)) => self.name = as_string(3, b)?,
                    (4, FieldValue::LengthDelimited(b)) => self.unique_id = as_string(4, b)?,
                    (9, FieldValue::Varint(v)) => self.disabled_by_default = *v != 0,
                    (10, FieldValue::LengthDelimited(b)) => self.icon = as_string(10, b)?,
                    (11, FieldValue::Varint(v)) => self.entity_category = *v as u32,
                    _ => return Ok(false),
                }
                Ok(true)
            }
        }

        impl ProtoMessage for $name {
            const MESSAGE_TYPE: u16 = $type_const;
            const ESTIMATED_SIZE: u32 = $estimated;

            fn calculate_size(&self) -> usize {
                self.common_size()
            }

            fn encode(&self, out: &mut Vec<u8>) {
                self.encode_common(out);
            }

            fn decode(data: &[u8]) -> Result<Self> {
                let mut msg = Self::default();
                decode_fields(data, |field, value| {
                    msg.decode_common_field(field, &value)?;
                    Ok(())
                })?;
                Ok(msg)
            }
        }
    };
}

entity_info_fields!(
    ListEntitiesBinarySensorResponse,
    catalog::LIST_ENTITIES_BINARY_SENSOR_RESPONSE,
    96
);
entity_info_fields!(
    ListEntitiesSensorResponse,
    catalog::LIST_ENTITIES_SENSOR_RESPONSE,
    96
);
entity_info_fields!(
    ListEntitiesSwitchResponse,
    catalog::LIST_ENTITIES_SWITCH_RESPONSE,
    96
);
entity_info_fields!(
    ListEntitiesLightResponse,
    catalog::LIST_ENTITIES_LIGHT_RESPONSE,
    96
);
entity_info_fields!(
    ListEntitiesCoverResponse,
    catalog::LIST_ENTITIES_COVER_RESPONSE,
    96
);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinarySensorStateResponse {
    pub key: u32,
    pub state: bool,
    pub missing_state: bool,
}

impl ProtoMessage for BinarySensorStateResponse {
    const MESSAGE_TYPE: u16 = catalog::BINARY_SENSOR_STATE_RESPONSE;
    const ESTIMATED_SIZE: u32 = 16;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + bool_field_size(2, self.state)
            + bool_field_size(3, self.missing_state)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.state, out);
        write_bool_field(3, self.missing_state, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.state = v != 0,
                (3, FieldValue::Varint(v)) => msg.missing_state = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorStateResponse {
    pub key: u32,
    pub state: f32,
    pub missing_state: bool,
}

impl ProtoMessage for SensorStateResponse {
    const MESSAGE_TYPE: u16 = catalog::SENSOR_STATE_RESPONSE;
    const ESTIMATED_SIZE: u32 = 16;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + float_field_size(2, self.state)
            + bool_field_size(3, self.missing_state)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_float_field(2, self.state, out);
        write_bool_field(3, self.missing_state, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Fixed32(v)) => msg.state = f32::from_bits(v),
                (3, FieldValue::Varint(v)) => msg.missing_state = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchStateResponse {
    pub key: u32,
    pub state: bool,
}

impl ProtoMessage for SwitchStateResponse {
    const MESSAGE_TYPE: u16 = catalog::SWITCH_STATE_RESPONSE;
    const ESTIMATED_SIZE: u32 = 8;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64) + bool_field_size(2, self.state)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.state, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.state = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchCommandRequest {
    pub key: u32,
    pub state: bool,
}

impl ProtoMessage for SwitchCommandRequest {
    const MESSAGE_TYPE: u16 = catalog::SWITCH_COMMAND_REQUEST;
    const ESTIMATED_SIZE: u32 = 8;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64) + bool_field_size(2, self.state)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.state, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.state = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightStateResponse {
    pub key: u32,
    pub state: bool,
    pub brightness: f32,
}

impl ProtoMessage for LightStateResponse {
    const MESSAGE_TYPE: u16 = catalog::LIGHT_STATE_RESPONSE;
    const ESTIMATED_SIZE: u32 = 48;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + bool_field_size(2, self.state)
            + float_field_size(3, self.brightness)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.state, out);
        write_float_field(3, self.brightness, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.state = v != 0,
                (3, FieldValue::Fixed32(v)) => msg.brightness = f32::from_bits(v),
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCommandRequest {
    pub key: u32,
    pub has_state: bool,
    pub state: bool,
    pub has_brightness: bool,
    pub brightness: f32,
}

impl ProtoMessage for LightCommandRequest {
    const MESSAGE_TYPE: u16 = catalog::LIGHT_COMMAND_REQUEST;
    const ESTIMATED_SIZE: u32 = 48;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + bool_field_size(2, self.has_state)
            + bool_field_size(3, self.state)
            + bool_field_size(4, self.has_brightness)
            + float_field_size(5, self.brightness)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.has_state, out);
        write_bool_field(3, self.state, out);
        write_bool_field(4, self.has_brightness, out);
        write_float_field(5, self.brightness, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.has_state = v != 0,
                (3, FieldValue::Varint(v)) => msg.state = v != 0,
                (4, FieldValue::Varint(v)) => msg.has_brightness = v != 0,
                (5, FieldValue::Fixed32(v)) => msg.brightness = f32::from_bits(v),
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverStateResponse {
    pub key: u32,
    pub position: f32,
    pub current_operation: u32,
}

impl ProtoMessage for CoverStateResponse {
    const MESSAGE_TYPE: u16 = catalog::COVER_STATE_RESPONSE;
    const ESTIMATED_SIZE: u32 = 32;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + float_field_size(2, self.position)
            + varint_field_size(3, self.current_operation as u64)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_float_field(2, self.position, out);
        write_varint_field(3, self.current_operation as u64, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Fixed32(v)) => msg.position = f32::from_bits(v),
                (3, FieldValue::Varint(v)) => msg.current_operation = v as u32,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverCommandRequest {
    pub key: u32,
    pub has_position: bool,
    pub position: f32,
}

impl ProtoMessage for CoverCommandRequest {
    const MESSAGE_TYPE: u16 = catalog::COVER_COMMAND_REQUEST;
    const ESTIMATED_SIZE: u32 = 32;

    fn calculate_size(&self) -> usize {
        varint_field_size(1, self.key as u64)
            + bool_field_size(2, self.has_position)
            + float_field_size(3, self.position)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_varint_field(1, self.key as u64, out);
        write_bool_field(2, self.has_position, out);
        write_float_field(3, self.position, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.key = v as u32,
                (2, FieldValue::Varint(v)) => msg.has_position = v != 0,
                (3, FieldValue::Fixed32(v)) => msg.position = f32::from_bits(v),
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
    fn binary_sensor_info_round_trip() {
        let msg = ListEntitiesBinarySensorResponse {
            object_id: "front_door".into(),
            key: 0xdead_beef,
            name: "Front Door".into(),
            unique_id: "front_door_binary_sensor".into(),
            disabled_by_default: false,
            icon: "mdi:door".into(),
            entity_category: 0,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(ListEntitiesBinarySensorResponse::decode(&out).unwrap(), msg);
    }

    #[test]
    fn sensor_state_round_trip_with_negative_value() {
        let msg = SensorStateResponse {
            key: 7,
            state: -12.5,
            missing_state: false,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        let decoded = SensorStateResponse::decode(&out).unwrap();
        assert_eq!(decoded.state, msg.state);
        assert_eq!(decoded.key, msg.key);
    }

    #[test]
    fn light_command_has_flags_round_trip() {
        let msg = LightCommandRequest {
            key: 42,
            has_state: true,
            state: true,
            has_brightness: true,
            brightness: 0.75,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(
            LightCommandRequest::decode(&out).unwrap().brightness,
            msg.brightness
        );
    }

    #[test]
    fn cover_command_without_position_omits_field() {
        let msg = CoverCommandRequest {
            key: 1,
            has_position: false,
            position: 0.0,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), varint_field_size(1, 1));
    }
}
