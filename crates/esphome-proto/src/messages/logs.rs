//! Log subscription messages.

use crate::catalog;
use crate::error::Result;
use crate::wire::{
    as_string, decode_fields, int32_field_size, string_field_size, write_int32_field,
    write_string_field, FieldValue, ProtoMessage,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeLogsRequest {
    /// Minimum severity the peer wants to receive, matching the device's
    /// log-level enum (NONE=0 .. VERY_VERBOSE=7).
    pub level: i32,
    pub dump_config: bool,
}

impl ProtoMessage for SubscribeLogsRequest {
    const MESSAGE_TYPE: u16 = catalog::SUBSCRIBE_LOGS_REQUEST;
    const ESTIMATED_SIZE: u32 = 8;

    fn calculate_size(&self) -> usize {
        int32_field_size(1, self.level) + crate::wire::bool_field_size(2, self.dump_config)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_int32_field(1, self.level, out);
        crate::wire::write_bool_field(2, self.dump_config, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.level = v as i32,
                (2, FieldValue::Varint(v)) => msg.dump_config = v != 0,
                _ => {}
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeLogsResponse {
    pub level: i32,
    pub message: String,
    pub send_failed: bool,
}

impl ProtoMessage for SubscribeLogsResponse {
    const MESSAGE_TYPE: u16 = catalog::SUBSCRIBE_LOGS_RESPONSE;
    const ESTIMATED_SIZE: u32 = 256;

    fn calculate_size(&self) -> usize {
        int32_field_size(1, self.level) + string_field_size(3, &self.message)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_int32_field(1, self.level, out);
        write_string_field(3, &self.message, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            match (field, value) {
                (1, FieldValue::Varint(v)) => msg.level = v as i32,
                (3, FieldValue::LengthDelimited(b)) => msg.message = as_string(3, b)?,
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
    fn subscribe_logs_round_trip() {
        let msg = SubscribeLogsRequest {
            level: 4,
            dump_config: true,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(SubscribeLogsRequest::decode(&out).unwrap(), msg);
    }

    #[test]
    fn log_line_round_trip() {
        let msg = SubscribeLogsResponse {
            level: 2,
            message: "[W][sensor:123]: timeout".into(),
            send_failed: false,
        };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        let decoded = SubscribeLogsResponse::decode(&out).unwrap();
        assert_eq!(decoded.message, msg.message);
    }
}
